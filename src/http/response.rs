use serde_json::{Value, json};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::AppError;

pub fn error_response(err: &AppError) -> (StatusCode, Value) {
    match err {
        AppError::Validation(issues) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"error":"Validation","detail":issues.join(", "),"issues":issues}),
        ),
        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({"error":"BadRequest","detail":msg})),
        AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, json!({"error":"Upstream","detail":msg})),
        // Config problems may name env keys; keep them out of the body.
        AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!({"error":"Internal"})),
        AppError::Other(e) => (StatusCode::INTERNAL_SERVER_ERROR, json!({"error":"Internal","detail":e.to_string()})),
    }
}

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> anyhow::Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())?)
}
