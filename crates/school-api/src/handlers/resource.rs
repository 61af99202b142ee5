//! Handlers and response builders shared by every resource.
//!
//! Collection responses look like
//! `{"success": true, "students": [...], "total_students": 42}`; write and
//! delete responses add `created`, `updated` or `deleted` with the row id.

use axum::{extract::State, Json};
use serde_json::{Map, Value};
use tracing::info;

use crate::database::{Changes, Resource};
use crate::state::AppState;
use crate::utils::{ApiError, Page, PageParams, Paginated, ValidPath, ValidQuery};

/// Which write produced the response.
#[derive(Debug, Clone, Copy)]
pub enum Written {
    Created(i32),
    Updated(i32),
    Deleted(i32),
}

impl Written {
    fn key_and_id(self) -> (&'static str, i32) {
        match self {
            Written::Created(id) => ("created", id),
            Written::Updated(id) => ("updated", id),
            Written::Deleted(id) => ("deleted", id),
        }
    }
}

pub fn collection_body<R: Resource>(listing: Paginated<R>) -> Result<Map<String, Value>, ApiError> {
    let items = serde_json::to_value(&listing.items)
        .map_err(|e| ApiError::Internal(format!("serializing {}: {}", R::COLLECTION, e)))?;

    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert(R::COLLECTION.into(), items);
    body.insert(format!("total_{}", R::COLLECTION), Value::from(listing.total));
    Ok(body)
}

/// Search branch of the create/edit convention.
pub async fn search<R: Resource>(
    state: &AppState,
    term: &str,
    page: Page,
) -> Result<Json<Value>, ApiError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ApiError::Validation("search term must not be empty".into()));
    }
    if R::SEARCH_COLUMN.is_none() {
        return Err(ApiError::Validation(format!(
            "{} cannot be searched",
            R::COLLECTION
        )));
    }

    let listing = state.repository.list::<R>(Some(term), page).await?;
    Ok(Json(Value::Object(collection_body(listing)?)))
}

/// Response after a successful write: the id plus the unfiltered page.
pub async fn written<R: Resource>(
    state: &AppState,
    what: Written,
    page: Page,
) -> Result<Json<Value>, ApiError> {
    let listing = state.repository.list::<R>(None, page).await?;
    let mut body = collection_body(listing)?;
    let (key, id) = what.key_and_id();
    body.insert(key.into(), Value::from(id));
    Ok(Json(Value::Object(body)))
}

pub fn ensure_changes<C: Changes>(changes: &C) -> Result<(), ApiError> {
    if changes.is_empty() {
        return Err(ApiError::Validation("no fields to update".into()));
    }
    Ok(())
}

/// GET /<collection>?page=n
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;
    let listing = state.repository.list::<R>(None, page).await?;

    if listing.is_past_end() {
        return Err(ApiError::NotFound(format!(
            "page {} is past the last page of {}",
            page.number,
            R::COLLECTION
        )));
    }

    Ok(Json(Value::Object(collection_body(listing)?)))
}

/// GET /<collection>/{id}
pub async fn show<R: Resource>(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<Value>, ApiError> {
    let row = state
        .repository
        .find::<R>(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} {} not found", R::SINGULAR, id)))?;

    let row = serde_json::to_value(&row)
        .map_err(|e| ApiError::Internal(format!("serializing {}: {}", R::SINGULAR, e)))?;

    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert(R::SINGULAR.into(), row);
    Ok(Json(Value::Object(body)))
}

/// DELETE /<collection>/{id}
///
/// A missing id is reported as 422, matching what existing clients expect.
pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    if !state.repository.delete::<R>(id).await? {
        return Err(ApiError::Unprocessable(format!(
            "{} {} does not exist",
            R::SINGULAR,
            id
        )));
    }

    info!("Deleted {} {}", R::SINGULAR, id);
    written::<R>(&state, Written::Deleted(id), page).await
}
