use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use super::non_empty;
use crate::models::{NewOrganization, Organization};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::created;

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrganizationForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_organization))
        .route("/all", get(list_organizations))
        .route("/:id", get(get_organization))
}

pub async fn add_organization(
    State(state): State<AppState>,
    Form(form): Form<CreateOrganizationForm>,
) -> Result<Response, AppError> {
    let name = form
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Name is required"))?;

    let organization = state
        .organizations
        .save(NewOrganization {
            name,
            description: non_empty(form.description),
        })
        .await?;

    tracing::info!(organization_id = organization.id, "Organization saved");
    Ok(created(format!(
        "Organization saved with ID: {}",
        organization.id
    )))
}

pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organization>>, AppError> {
    Ok(Json(state.organizations.find_all().await?))
}

pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Organization>, AppError> {
    state
        .organizations
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Organization not found"))
}
