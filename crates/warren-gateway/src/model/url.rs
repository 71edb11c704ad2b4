use serde::{Deserialize, Serialize};

pub const ENQUEUED_MESSAGE: &str = "shortening successfully enqueued";

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub message: &'static str,
}

impl CreateUrlResponse {
    pub fn enqueued() -> Self {
        Self {
            message: ENQUEUED_MESSAGE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetUrlResponse {
    pub url: String,
}
