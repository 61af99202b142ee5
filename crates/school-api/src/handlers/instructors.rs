use axum::{extract::State, Json};
use serde_json::Value;

use super::resource::{self, Written};
use crate::database::{Instructor, InstructorChanges, NewInstructor, SearchOr};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

pub async fn create_instructor(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewInstructor>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => {
            resource::search::<Instructor>(&state, &search, page).await
        }
        SearchOr::Write(instructor) => {
            let id = state.repository.insert_instructor(&instructor).await?;
            resource::written::<Instructor>(&state, Written::Created(id), page).await
        }
    }
}

pub async fn edit_instructor(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<InstructorChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => {
            resource::search::<Instructor>(&state, &search, page).await
        }
        SearchOr::Write(changes) => {
            resource::ensure_changes(&changes)?;
            state.repository.update_instructor(id, &changes).await?;
            resource::written::<Instructor>(&state, Written::Updated(id), page).await
        }
    }
}
