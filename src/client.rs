//! HTTP implementation of the widget's backends.

use url::Url;

use crate::api::{CHAT_PATH, ChatRequest, ChatResponse, NEWS_PATH, NewsItem};
use crate::error::ClientError;
use crate::widget::{ChatBackend, NewsBackend};

/// Talks to `POST /api/chat` and `GET /api/news` on one base URL.
///
/// ```rust,no_run
/// use chat_news_widget::client::HttpBackend;
/// use chat_news_widget::widget::NewsBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8000")?;
/// let news = backend.fetch_news().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a backend with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Decode a 2xx body; anything else is a failure.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(ClientError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let req = ChatRequest {
            message: message.to_string(),
        };
        let response = self
            .http
            .post(self.url(CHAT_PATH)?)
            .json(&req)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[async_trait::async_trait]
impl NewsBackend for HttpBackend {
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, ClientError> {
        let response = self.http.get(self.url(NEWS_PATH)?).send().await?;
        Self::handle_response(response).await
    }
}
