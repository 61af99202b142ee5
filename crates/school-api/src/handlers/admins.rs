use axum::{extract::State, Json};
use serde_json::Value;

use super::resource::{self, Written};
use crate::auth::PasswordService;
use crate::database::{Admin, AdminChanges, NewAdmin, SearchOr};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

pub async fn create_admin(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewAdmin>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    let admin = match body {
        // Admins have no search column; this reports it as a validation error.
        SearchOr::Search { search } => {
            return resource::search::<Admin>(&state, &search, page).await;
        }
        SearchOr::Write(admin) => admin,
    };

    let password_hash = PasswordService::hash_optional(admin.admin_password.clone()).await?;

    let id = state
        .repository
        .insert_admin(&admin, password_hash.as_deref())
        .await?;
    resource::written::<Admin>(&state, Written::Created(id), page).await
}

pub async fn edit_admin(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<AdminChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    let changes = match body {
        SearchOr::Search { search } => {
            return resource::search::<Admin>(&state, &search, page).await;
        }
        SearchOr::Write(changes) => changes,
    };

    resource::ensure_changes(&changes)?;
    let password_hash = PasswordService::hash_optional(changes.admin_password.clone()).await?;

    state
        .repository
        .update_admin(id, &changes, password_hash.as_deref())
        .await?;
    resource::written::<Admin>(&state, Written::Updated(id), page).await
}
