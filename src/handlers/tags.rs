use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::models::{NewTag, Tag};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::message;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTagForm {
    pub name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_tag))
        .route("/all", get(list_tags))
}

/// Names are not validated; a missing name is stored as an empty string.
pub async fn add_tag(
    State(state): State<AppState>,
    Form(form): Form<CreateTagForm>,
) -> Result<Response, AppError> {
    let tag = state
        .tags
        .save(NewTag {
            name: form.name.unwrap_or_default(),
        })
        .await?;

    tracing::info!(tag_id = tag.id, "Tag saved");
    Ok(message(format!("Tag saved with ID: {}", tag.id)))
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(state.tags.find_all().await?))
}
