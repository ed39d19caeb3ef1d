//! Plain-text responses. Entities and lists go out as `Json` directly.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

fn text(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

/// `201 Created` with a confirmation message.
pub fn created(message: impl Into<String>) -> Response {
    text(StatusCode::CREATED, message.into())
}

/// `200 OK` with a confirmation message.
pub fn message(message: impl Into<String>) -> Response {
    text(StatusCode::OK, message.into())
}

pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    text(status, message.into())
}
