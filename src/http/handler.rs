use std::sync::Arc;

use serde_json::{json, Value};
use vercel_runtime::{Body, Error, Request, Response, StatusCode};

use crate::{
    clients::Completer,
    error::{AppError, Result},
    http::{
        cors::{self, add_cors, CorsPolicy},
        response::{error_response, json_response},
    },
    models::profile::EmotionalProfileResponse,
    services::profile::generate_profile,
};

/// Built once per cold start and shared by every invocation.
pub struct AppState {
    pub completer: Arc<dyn Completer>,
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(completer: Arc<dyn Completer>, cors: CorsPolicy) -> Self {
        Self { completer, cors }
    }
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// `POST /generate_emotional_profile`
pub async fn handler(state: &AppState, req: Request) -> std::result::Result<Response<Body>, Error> {
    let origin = header(&req, "origin");
    if req.method().as_str() == "OPTIONS" {
        return Ok(cors::preflight(
            &state.cors,
            origin,
            header(&req, "access-control-request-headers"),
        )?);
    }

    let resp = generate(state, &req).await?;
    Ok(add_cors(resp, &state.cors, origin))
}

async fn generate(state: &AppState, req: &Request) -> anyhow::Result<Response<Body>> {
    if req.method().as_str() != "POST" {
        return Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "POST")
            .header("Content-Type", "application/json")
            .body(json!({"error": "Use POST with a JSON emotional profile body"}).to_string().into())?);
    }

    let payload = match parse_body(req.body()) {
        Ok(v) => v,
        Err(err) => return reject(&err),
    };

    match generate_profile(state.completer.as_ref(), &payload).await {
        Ok(profile) => json_response(StatusCode::OK, &EmotionalProfileResponse { profile }),
        Err(err) => reject(&err),
    }
}

fn parse_body(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty body".into()));
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))
}

fn reject(err: &AppError) -> anyhow::Result<Response<Body>> {
    let (status, body) = error_response(err);
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %err, "profile generation failed");
    } else {
        tracing::warn!(status = status.as_u16(), error = %err, "request rejected");
    }
    json_response(status, &body)
}

/// `GET /health`
pub fn health(cors_policy: &CorsPolicy, req: &Request) -> std::result::Result<Response<Body>, Error> {
    let origin = header(req, "origin");
    let resp = match req.method().as_str() {
        "OPTIONS" => {
            return Ok(cors::preflight(
                cors_policy,
                origin,
                header(req, "access-control-request-headers"),
            )?)
        }
        "GET" | "HEAD" => json_response(
            StatusCode::OK,
            &json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}),
        )?,
        _ => Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "GET, HEAD")
            .body(Body::Empty)?,
    };
    Ok(add_cors(resp, cors_policy, origin))
}
