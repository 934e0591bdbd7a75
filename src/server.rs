//! HTTP service: chat proxy, news feed, health check and the page shell.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api::{
    CHAT_PATH, ChatRequest, ChatResponse, HEALTH_PATH, HealthResponse, NEWS_PATH, NewsItem,
    local_timestamp,
};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::llm::{ChatCompletionsDriver, LlmSettings};
use crate::news::NewsCatalog;

/// Build the router for `state`.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    Router::new()
        .route(CHAT_PATH, post(api_chat))
        .route(NEWS_PATH, get(api_news))
        .route(HEALTH_PATH, get(health))
        .route("/", get(index_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the service with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let settings = LlmSettings::from(&config.llm);
    if settings.api_url.trim().is_empty() {
        anyhow::bail!("llm.api_url is not set (WIDGET_LLM__API_URL or ai_api_url)");
    }
    info!(
        name: "llm.config.loaded",
        api_url = %settings.api_url,
        model = %settings.model,
        "LLM configuration loaded"
    );
    let llm = Arc::new(ChatCompletionsDriver::new(settings)?);

    let news = Arc::new(NewsCatalog::from_optional_file(config.news.file.as_deref())?);
    info!(name: "news.catalog.ready", count = news.len(), "News catalog ready");

    let state = AppState {
        config: Arc::clone(&config),
        llm,
        news,
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %format!("http://{addr}"),
        "Server started"
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/chat - Answer one message.
async fn api_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    tracing::info!(message_length = req.message.len(), "Received chat request");

    match state.llm.complete(&req.message).await {
        Ok(response) => {
            tracing::debug!(response_length = response.len(), "Chat reply ready");
            Ok(Json(ChatResponse {
                response,
                timestamp: local_timestamp(),
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream model call failed");
            Err(e.into())
        }
    }
}

/// GET /api/news - The whole catalog.
async fn api_news(State(state): State<AppState>) -> Json<Vec<NewsItem>> {
    Json(state.news.items().to_vec())
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Index page handler.
async fn index_handler() -> impl IntoResponse {
    Html(page_shell())
}

/// The page a browser host binds the widget to.
///
/// Element ids are the widget's attachment points: `chatMessages`,
/// `messageInput`, `sendButton`, `newsContainer`, `newsPagination`,
/// `currentPage`, `totalPages`, `prevBtn`, `nextBtn`, `backToTop`.
pub fn page_shell() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="AI Q&amp;A with a news feed">
    <title>AI Q&amp;A</title>
    <link rel="stylesheet" href="/static/style.css">
    <script type="module" src="/static/widget.js"></script>
</head>
<body>
    <header class="header">
        <h1>AI Q&amp;A</h1>
    </header>
    <main class="container">
        <section class="chat-section">
            <div id="chatMessages" class="chat-messages" aria-live="polite"></div>
            <div class="chat-input">
                <textarea id="messageInput" rows="1" placeholder="Type your question..."></textarea>
                <button id="sendButton"><span class="send-icon">📤</span>Send</button>
            </div>
        </section>
        <section class="news-section">
            <h2>Latest news</h2>
            <div id="newsContainer" class="news-container"></div>
            <div id="newsPagination" class="news-pagination" style="display: none">
                <button id="prevBtn">‹</button>
                <span><span id="currentPage">1</span> / <span id="totalPages">1</span></span>
                <button id="nextBtn">›</button>
            </div>
        </section>
    </main>
    <button id="backToTop" class="back-to-top" aria-label="Back to top">↑</button>
</body>
</html>"#
        .to_string()
}
