//! Chat + news-feed widget service.
//!
//! `serve` (the default) runs the HTTP service. `ask` and `news` drive the
//! widget from a terminal against a running service.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_news_widget::client::HttpBackend;
use chat_news_widget::config::{AppConfig, Cli, Command};
use chat_news_widget::server::start_server;
use chat_news_widget::widget::console::ConsoleView;
use chat_news_widget::widget::{
    ChatWidget, Dispatched, LoadState, SendOutcome, UiEvent, WidgetSettings,
};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load_from_cli(&cli).context("Configuration error")?);

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => start_server(config).await,
        Command::Ask { question } => ask(&config, &question).await,
        Command::News { page } => news(&config, page).await,
    }
}

fn console_widget(config: &AppConfig) -> anyhow::Result<ChatWidget> {
    let view = Arc::new(ConsoleView::stdout());
    let backend = Arc::new(HttpBackend::new(&config.widget.base_url)?);
    Ok(ChatWidget::new(
        view.ports(),
        backend.clone(),
        backend,
        WidgetSettings::from(&config.widget),
    ))
}

async fn ask(config: &AppConfig, question: &str) -> anyhow::Result<()> {
    let mut widget = console_widget(config)?;
    match widget.dispatch(UiEvent::Send(question.to_string())).await {
        Dispatched::Sent(SendOutcome::Replied) => Ok(()),
        Dispatched::Sent(SendOutcome::Rejected) => anyhow::bail!("question must not be empty"),
        _ => anyhow::bail!("chat request to {} failed", config.widget.base_url),
    }
}

async fn news(config: &AppConfig, page: usize) -> anyhow::Result<()> {
    let mut widget = console_widget(config)?;
    let (_, pager) = widget.parts_mut();
    match pager.load_at(page).await {
        LoadState::Loaded => Ok(()),
        _ => anyhow::bail!("news request to {} failed", config.widget.base_url),
    }
}
