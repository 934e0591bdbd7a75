//! Wire types shared by the service and the widget's HTTP backend.
//!
//! The JSON shapes here are the whole contract between the two sides:
//!
//! - `POST /api/chat`: [`ChatRequest`] → [`ChatResponse`]
//! - `GET /api/news`: `Vec<`[`NewsItem`]`>`
//! - `GET /health`: [`HealthResponse`]

use serde::{Deserialize, Serialize};

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";
/// Path of the news endpoint.
pub const NEWS_PATH: &str = "/api/news";
/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text.
    pub response: String,
    /// Server-side local time of the reply, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// One entry of the news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Optional cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewsItem {
    /// Create an item without an image.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
            image: None,
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Error body returned by the service for any non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Format used for every human-facing timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
