use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let url = match request.url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return Err(AppError::MalformedInput("url is a required parameter".into())),
    };

    state.shortener().submit(&url)?;
    info!(url = %url, "shortening enqueued");

    Ok((StatusCode::ACCEPTED, Json(CreateUrlResponse::enqueued())))
}

pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<GetUrlResponse>> {
    match state.shortener().resolve(&short_code).await? {
        Some(record) => Ok(Json(GetUrlResponse {
            url: record.original,
        })),
        None => Err(AppError::NotFound(format!(
            "no url found for short code '{short_code}'"
        ))),
    }
}
