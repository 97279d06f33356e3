use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use client::export::WINNERS_CSV_FILENAME;
use storage::{
    dto::common::{PaginatedResponse, PaginationParams},
    models::Winner,
};

use crate::{error::WebError, state::AppState};

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/winners",
    params(PaginationParams),
    responses(
        (status = 200, description = "Winners page retrieved successfully", body = PaginatedResponse<Winner>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 502, description = "Upstream function failed")
    ),
    security(("bearer_auth" = [])),
    tag = "winners"
)]
pub async fn list_winners(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let page = services::list_winners(state.functions(), &params).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/winners.csv",
    responses(
        (status = 200, description = "Winners exported as CSV", body = String, content_type = "text/csv"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 502, description = "Upstream function failed")
    ),
    security(("bearer_auth" = [])),
    tag = "winners"
)]
pub async fn export_winners_csv(State(state): State<AppState>) -> Result<Response, WebError> {
    let csv = services::export_winners(state.functions()).await?;
    let disposition = format!("attachment; filename=\"{}\"", WINNERS_CSV_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
