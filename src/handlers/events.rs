use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Form, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use super::{non_empty, parse_id};
use crate::models::{Event, NewEvent, Tag};
use crate::repositories::{DateRange, EventSearch, TagRepository};
use crate::state::AppState;
use crate::utils::datetime::{parse_date, parse_time};
use crate::utils::error::AppError;
use crate::utils::response::{created, message};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `yyyy-MM-dd`
    pub date: Option<String>,
    /// `HH:mm`
    pub time: Option<String>,
    pub location: Option<String>,
    pub organization_id: Option<String>,
    /// Comma-separated tag ids, e.g. `1,4,7`.
    pub tag_ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_event))
        .route("/all", get(list_events))
        .route("/search", get(search_events))
        .route("/:id", get(get_event).delete(delete_event))
}

pub async fn add_event(
    State(state): State<AppState>,
    Form(form): Form<CreateEventForm>,
) -> Result<Response, AppError> {
    let title = form
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Title is required"))?;

    let (Some(date), Some(time)) = (non_empty(form.date), non_empty(form.time)) else {
        return Err(AppError::bad_request("Date and time are required"));
    };
    let date = parse_date(&date).ok_or_else(|| {
        AppError::bad_request(format!("Invalid date '{date}', expected yyyy-MM-dd"))
    })?;
    let time = parse_time(&time)
        .ok_or_else(|| AppError::bad_request(format!("Invalid time '{time}', expected HH:mm")))?;

    let organization_id = parse_id(form.organization_id, "Organization ID")?;
    let organization = state
        .organizations
        .find_by_id(organization_id)
        .await?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    let tags = resolve_tags(state.tags.as_ref(), form.tag_ids.as_deref()).await?;

    let event = state
        .events
        .save(NewEvent {
            title,
            description: non_empty(form.description),
            date,
            time,
            location: form.location.unwrap_or_default(),
            organization,
            tags,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Error saving event");
            AppError::Internal("Error saving event".to_string())
        })?;

    info!(event_id = event.id, "Event saved with ID: {}", event.id);
    Ok(created(format!("Event saved with ID: {}", event.id)))
}

/// Resolve a comma-separated id list. Tokens that are not integers or that
/// name no existing tag are logged and skipped.
async fn resolve_tags(
    repository: &dyn TagRepository,
    raw: Option<&str>,
) -> Result<Vec<Tag>, AppError> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    let mut tags: Vec<Tag> = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        let tag_id = match token.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                warn!("Invalid tag ID format: {}", token);
                continue;
            }
        };

        if tags.iter().any(|tag| tag.id == tag_id) {
            continue;
        }

        match repository.find_by_id(tag_id).await? {
            Some(tag) => tags.push(tag),
            None => warn!("Tag with ID {} not found", tag_id),
        }
    }

    Ok(tags)
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.events.find_all().await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, AppError> {
    state
        .events
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Event not found"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.events.delete(id).await? {
        return Err(AppError::not_found("Event not found"));
    }

    info!(event_id = id, "Event deleted");
    Ok(message("Event successfully deleted"))
}

pub async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Event>>, AppError> {
    let start = parse_search_date(params.start_date, "startDate")?;
    let end = parse_search_date(params.end_date, "endDate")?;

    let search = EventSearch {
        title: params.title.unwrap_or_default(),
        location: params.location.unwrap_or_default(),
        dates: DateRange::new(start, end),
    };

    Ok(Json(state.events.search(&search).await?))
}

fn parse_search_date(raw: Option<String>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    non_empty(raw)
        .map(|raw| {
            parse_date(&raw).ok_or_else(|| {
                AppError::bad_request(format!("Invalid {field} '{raw}', expected yyyy-MM-dd"))
            })
        })
        .transpose()
}
