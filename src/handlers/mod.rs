use axum::Json;
use serde::Serialize;

use crate::utils::error::AppError;

pub mod events;
pub mod organizations;
pub mod tags;

#[derive(Serialize)]
pub struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Json<HealthPayload> {
    Json(HealthPayload {
        status: "ok",
        service: "event-hub-api",
    })
}

/// Treat empty form values the same as missing ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_id(raw: Option<String>, field: &str) -> Result<i64, AppError> {
    let raw = non_empty(raw).ok_or_else(|| AppError::bad_request(format!("{field} is required")))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("{field} must be an integer, got '{raw}'")))
}
