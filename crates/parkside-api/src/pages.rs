use axum::{Json, extract::State, http::StatusCode};
use tracing::error;

use parkside_db::models::RealtorRow;
use parkside_types::api::{AboutResponse, HomeResponse, RealtorResponse};
use parkside_types::choices::SearchChoices;

use crate::accounts::AppState;
use crate::listings::listing_response;

pub const HOME_PREVIEW_COUNT: i64 = 3;

/// `GET /`: the three newest published listings plus the search-form
/// choice metadata.
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.latest_published(HOME_PREVIEW_COUNT))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("home preview query failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(HomeResponse {
        listings: rows.into_iter().map(listing_response).collect(),
        search_choices: SearchChoices::current(),
    }))
}

/// `GET /about`: every realtor plus the featured (MVP) subset.
pub async fn about(State(state): State<AppState>) -> Result<Json<AboutResponse>, StatusCode> {
    let db = state.clone();
    let (realtors, mvp_realtors) = tokio::task::spawn_blocking(move || {
        let all = db.db.list_realtors()?;
        let mvps = db.db.mvp_realtors()?;
        Ok::<_, anyhow::Error>((all, mvps))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("realtor query failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AboutResponse {
        realtors: realtors.into_iter().map(realtor_response).collect(),
        mvp_realtors: mvp_realtors.into_iter().map(realtor_response).collect(),
    }))
}

fn realtor_response(row: RealtorRow) -> RealtorResponse {
    RealtorResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        photo: row.photo,
        hire_date: row.hire_date,
        is_mvp: row.is_mvp,
    }
}
