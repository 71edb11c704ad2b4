mod health;
mod url;
mod ws;

pub use health::HealthResponse;
pub use url::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse};
pub use ws::{ClientMessage, ServerMessage, UrlList};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
