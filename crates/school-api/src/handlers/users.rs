use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use super::resource::{self, Written};
use crate::auth::{PasswordService, Role};
use crate::database::{NewUser, SearchOr, User, UserChanges, UserRecord};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

fn normalize_role(role: &str) -> Result<String, ApiError> {
    role.parse::<Role>()
        .map(|r| r.as_str().to_string())
        .map_err(ApiError::Validation)
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewUser>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    let user = match body {
        SearchOr::Search { search } => {
            return resource::search::<User>(&state, &search, page).await;
        }
        SearchOr::Write(user) => user,
    };

    user.validate()?;
    let role = normalize_role(&user.role)?;

    let actual_password = PasswordService::hash(user.password).await?;
    let default_password = PasswordService::hash_optional(user.default_password).await?;

    let record = UserRecord {
        first_name: user.first_name,
        last_name: user.last_name,
        other_names: user.other_names,
        role,
        email: user.email,
        username: user.username,
        default_password,
        actual_password,
        phone_number: user.phone_number,
        address: user.address,
    };

    let id = state.repository.insert_user(&record).await?;
    resource::written::<User>(&state, Written::Created(id), page).await
}

/// PATCH /users/{id}/edit
pub async fn edit_user(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<UserChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    let mut changes = match body {
        SearchOr::Search { search } => {
            return resource::search::<User>(&state, &search, page).await;
        }
        SearchOr::Write(changes) => changes,
    };

    resource::ensure_changes(&changes)?;
    changes.validate()?;
    if let Some(role) = changes.role.take() {
        changes.role = Some(normalize_role(&role)?);
    }

    let password_hash = PasswordService::hash_optional(changes.password.take()).await?;

    state
        .repository
        .update_user(id, &changes, password_hash.as_deref())
        .await?;
    resource::written::<User>(&state, Written::Updated(id), page).await
}
