use clap::{Parser, Subcommand};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant embedded next to a news feed. \
Answer questions about current affairs, the economy and technology in short, plain language, \
and relate theory to concrete examples where you can.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "BIND_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the service the widget talks to
    #[arg(long, env = "WIDGET_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Send one chat turn through the widget and print it
    Ask {
        /// Question to send
        question: String,
    },
    /// Fetch the news feed through the widget and print one page
    News {
        /// Page to show (clamped to the available range)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub news: NewsConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Full URL of the chat completions endpoint.
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub timeout_secs: f64,
    pub system_prompt: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewsConfig {
    /// YAML/JSON catalog; the built-in catalog is used when unset.
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub base_url: String,
    pub page_size: usize,
    pub toast_ms: u64,
    pub toast_exit_ms: u64,
    pub back_to_top_threshold: f64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::load_from_cli(&cli)
    }

    pub fn load_from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.static_dir", "static")?
            .set_default("llm.api_url", "")?
            .set_default("llm.model", "qwen-plus")?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.max_tokens", 800)?
            .set_default("llm.top_p", 0.9)?
            .set_default("llm.timeout_secs", 30.0)?
            .set_default("llm.system_prompt", DEFAULT_SYSTEM_PROMPT)?
            .set_default("widget.base_url", "http://127.0.0.1:8000")?
            .set_default("widget.page_size", 2)?
            .set_default("widget.toast_ms", 3000)?
            .set_default("widget.toast_exit_ms", 300)?
            .set_default("widget.back_to_top_threshold", 300.0)?;

        // 2. Config file: explicit path, else ./config.yaml when present
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml));
        }

        // 3. Prefixed environment, e.g. WIDGET_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Variables of the original deployment's .env
        for (keys, target) in [
            (["ai_api_url", "AI_API_URL"], "llm.api_url"),
            (["ai_api_key", "AI_API_KEY"], "llm.api_key"),
            (["ai_model", "AI_MODEL"], "llm.model"),
        ] {
            if let Some(val) = first_env(&keys) {
                builder = builder.set_override(target, val)?;
            }
        }
        for (keys, target) in [
            (["ai_temperature", "AI_TEMPERATURE"], "llm.temperature"),
            (["ai_top_p", "AI_TOP_P"], "llm.top_p"),
            (["ai_timeout", "AI_TIMEOUT"], "llm.timeout_secs"),
        ] {
            if let Some(val) = first_env_parsed::<f64>(&keys)? {
                builder = builder.set_override(target, val)?;
            }
        }
        if let Some(val) = first_env_parsed::<u32>(&["ai_max_tokens", "AI_MAX_TOKENS"])? {
            builder = builder.set_override("llm.max_tokens", val)?;
        }

        // 5. CLI flags (clap already folded in BIND_HOST/PORT/WIDGET_BASE_URL)
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(base_url) = &cli.base_url {
            builder = builder.set_override("widget.base_url", base_url.as_str())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.widget.page_size == 0 {
            return Err(config::ConfigError::Message(
                "widget.page_size must be at least 1".to_string(),
            ));
        }
        if self.llm.timeout_secs <= 0.0 {
            return Err(config::ConfigError::Message(
                "llm.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the service binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| env::var(k).ok())
        .filter(|v| !v.trim().is_empty())
}

/// Like [`first_env`], but a value that does not parse is an error.
fn first_env_parsed<T>(keys: &[&str]) -> Result<Option<T>, config::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = first_env(keys) else {
        return Ok(None);
    };
    raw.trim().parse().map(Some).map_err(|e| {
        config::ConfigError::Message(format!("{}: invalid value {raw:?}: {e}", keys.join("/")))
    })
}
