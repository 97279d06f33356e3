use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use client::gateway::functions;

use crate::{error::WebError, state::AppState};

#[utoipa::path(
    post,
    path = "/api/ocr/create-repartition",
    request_body(content = String, description = "JSON payload relayed as is", content_type = "application/json"),
    responses(
        (status = 200, description = "Upstream answer, status and body relayed verbatim"),
        (status = 502, description = "Upstream function unreachable")
    ),
    tag = "proxy"
)]
pub async fn create_repartition(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, WebError> {
    let forwarded = state
        .gateway
        .forward(functions::CREATE_REPARTITION, body.to_vec(), &state.service_key)
        .await?;

    let status = StatusCode::from_u16(forwarded.status).map_err(|e| {
        WebError::InternalServerError(format!("invalid upstream status: {}", e))
    })?;

    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        forwarded.body,
    )
        .into_response())
}
