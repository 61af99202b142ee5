use axum::{extract::State, Json};
use serde_json::Value;

use super::resource::{self, Written};
use crate::database::{Course, CourseChanges, NewCourse, SearchOr};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

/// POST /courses
///
/// `{"search": "..."}` matches `course_title` instead of creating a course.
pub async fn create_course(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewCourse>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Course>(&state, &search, page).await,
        SearchOr::Write(course) => {
            if course.course_title.trim().is_empty() {
                return Err(ApiError::Validation("course_title must not be empty".into()));
            }
            if let (Some(start), Some(end)) = (course.course_start_date, course.course_end_date) {
                if end < start {
                    return Err(ApiError::Validation(
                        "course_end_date is before course_start_date".into(),
                    ));
                }
            }
            let id = state.repository.insert_course(&course).await?;
            resource::written::<Course>(&state, Written::Created(id), page).await
        }
    }
}

/// POST /courses/{id}/edit
pub async fn edit_course(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<CourseChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Course>(&state, &search, page).await,
        SearchOr::Write(changes) => {
            resource::ensure_changes(&changes)?;
            state.repository.update_course(id, &changes).await?;
            resource::written::<Course>(&state, Written::Updated(id), page).await
        }
    }
}
