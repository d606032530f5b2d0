use vercel_runtime::{Body, Response, StatusCode};

const ALL_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

/// Either a wildcard or an explicit allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowed {
    Any,
    List(Vec<String>),
}

impl Allowed {
    /// Parses a comma-separated list; `*` anywhere in it means any.
    pub fn parse(raw: &str) -> Self {
        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if items.is_empty() || items.iter().any(|s| s == "*") {
            Allowed::Any
        } else {
            Allowed::List(items)
        }
    }

    fn permits(&self, value: &str) -> bool {
        match self {
            Allowed::Any => true,
            Allowed::List(items) => items.iter().any(|item| item == value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub origins: Allowed,
    pub methods: Allowed,
    pub headers: Allowed,
    pub allow_credentials: bool,
    pub max_age_secs: u32,
}

impl CorsPolicy {
    /// Any origin, method and header, with credentials.
    pub fn permissive() -> Self {
        Self {
            origins: Allowed::Any,
            methods: Allowed::Any,
            headers: Allowed::Any,
            allow_credentials: true,
            max_age_secs: crate::config::DEFAULT_CORS_MAX_AGE_SECS,
        }
    }

    // Browsers refuse `*` together with credentials, so the origin is echoed instead.
    fn allow_origin(&self, origin: Option<&str>) -> Option<(String, bool)> {
        match (origin, &self.origins) {
            (Some(o), Allowed::Any) if self.allow_credentials => Some((o.to_string(), true)),
            (_, Allowed::Any) => Some(("*".to_string(), false)),
            (Some(o), list) if list.permits(o) => Some((o.to_string(), true)),
            _ => None,
        }
    }
}

fn set_header(resp: &mut Response<Body>, name: &'static str, value: &str) {
    if let Ok(value) = value.parse() {
        resp.headers_mut().insert(name, value);
    }
}

fn set_origin_headers(resp: &mut Response<Body>, policy: &CorsPolicy, allow_origin: &str, echoed: bool) {
    set_header(resp, "Access-Control-Allow-Origin", allow_origin);
    if echoed {
        set_header(resp, "Vary", "Origin");
    }
    if policy.allow_credentials {
        set_header(resp, "Access-Control-Allow-Credentials", "true");
    }
}

/// Decorates a regular (non-preflight) response.
pub fn add_cors(mut resp: Response<Body>, policy: &CorsPolicy, origin: Option<&str>) -> Response<Body> {
    if let Some((allow_origin, echoed)) = policy.allow_origin(origin) {
        set_origin_headers(&mut resp, policy, &allow_origin, echoed);
    }
    resp
}

/// Answers an `OPTIONS` preflight.
pub fn preflight(
    policy: &CorsPolicy,
    origin: Option<&str>,
    requested_headers: Option<&str>,
) -> anyhow::Result<Response<Body>> {
    let Some((allow_origin, echoed)) = policy.allow_origin(origin) else {
        return Ok(Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "text/plain")
            .body("Disallowed CORS origin".to_string().into())?);
    };

    let mut resp = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Body::Empty)?;
    set_origin_headers(&mut resp, policy, &allow_origin, echoed);

    let methods = match &policy.methods {
        Allowed::Any => ALL_METHODS.to_string(),
        Allowed::List(items) => items.join(", "),
    };
    set_header(&mut resp, "Access-Control-Allow-Methods", &methods);

    let headers = match (&policy.headers, requested_headers) {
        (Allowed::Any, Some(requested)) => requested.to_string(),
        (Allowed::Any, None) => "*".to_string(),
        (Allowed::List(items), _) => items.join(", "),
    };
    if !headers.is_empty() {
        set_header(&mut resp, "Access-Control-Allow-Headers", &headers);
    }
    set_header(&mut resp, "Access-Control-Max-Age", &policy.max_age_secs.to_string());
    Ok(resp)
}
