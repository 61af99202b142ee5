use axum::{extract::State, Json};
use serde_json::Value;

use super::resource::{self, Written};
use crate::database::{NewSponsor, SearchOr, Sponsor, SponsorChanges};
use crate::state::AppState;
use crate::utils::{ApiError, PageParams, ValidJson, ValidPath, ValidQuery};

pub async fn create_sponsor(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<NewSponsor>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Sponsor>(&state, &search, page).await,
        SearchOr::Write(sponsor) => {
            let id = state.repository.insert_sponsor(&sponsor).await?;
            resource::written::<Sponsor>(&state, Written::Created(id), page).await
        }
    }
}

pub async fn edit_sponsor(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidQuery(params): ValidQuery<PageParams>,
    ValidJson(body): ValidJson<SearchOr<SponsorChanges>>,
) -> Result<Json<Value>, ApiError> {
    let page = params.into_page(state.page_size())?;

    match body {
        SearchOr::Search { search } => resource::search::<Sponsor>(&state, &search, page).await,
        SearchOr::Write(changes) => {
            resource::ensure_changes(&changes)?;
            state.repository.update_sponsor(id, &changes).await?;
            resource::written::<Sponsor>(&state, Written::Updated(id), page).await
        }
    }
}
