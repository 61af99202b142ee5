use axum::{extract::State, Json};
use serde_json::Value;

use super::resource::{self, Written};
use crate::database::{NewStudent, SearchOr, Student, StudentChanges};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

/// POST /students
pub async fn create_student(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewStudent>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Student>(&state, &search, page).await,
        SearchOr::Write(student) => {
            let id = state.repository.insert_student(&student).await?;
            resource::written::<Student>(&state, Written::Created(id), page).await
        }
    }
}

/// PATCH /students/{id}/edit
pub async fn edit_student(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<StudentChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Student>(&state, &search, page).await,
        SearchOr::Write(changes) => {
            resource::ensure_changes(&changes)?;
            state.repository.update_student(id, &changes).await?;
            resource::written::<Student>(&state, Written::Updated(id), page).await
        }
    }
}
