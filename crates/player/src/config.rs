//! Runtime configuration read from the environment
//!
//! Desktop builds load `.env` (via dotenvy) and then read the process
//! environment. Browser builds have no environment at runtime, so they use
//! whatever was present at compile time (`option_env!`).
//!
//! # Environment Variables
//!
//! - `EXPLORERS_REPLY_ENDPOINT` - Chat-completions URL (unset: local replies only)
//! - `EXPLORERS_REPLY_API_KEY` - Bearer token for the endpoint
//! - `EXPLORERS_REPLY_MODEL` - Model name (default: deepseek-chat)
//! - `EXPLORERS_REPLY_TIMEOUT_MS` - Remote reply timeout (default: 15000)
//! - `EXPLORERS_CHAT_HISTORY_CAP` - Max messages kept and persisted (default: 50)
//! - `EXPLORERS_REPLY_HISTORY_WINDOW` - Messages sent as context (default: 8)
//! - `EXPLORERS_SHELL` - `desktop` or `mobile` layout (default: desktop)

use std::str::FromStr;

use crate::infrastructure::reply_client::DEFAULT_REPLY_MODEL;

pub const ENV_REPLY_ENDPOINT: &str = "EXPLORERS_REPLY_ENDPOINT";
pub const ENV_REPLY_API_KEY: &str = "EXPLORERS_REPLY_API_KEY";
pub const ENV_REPLY_MODEL: &str = "EXPLORERS_REPLY_MODEL";
pub const ENV_REPLY_TIMEOUT_MS: &str = "EXPLORERS_REPLY_TIMEOUT_MS";
pub const ENV_CHAT_HISTORY_CAP: &str = "EXPLORERS_CHAT_HISTORY_CAP";
pub const ENV_REPLY_HISTORY_WINDOW: &str = "EXPLORERS_REPLY_HISTORY_WINDOW";
pub const ENV_SHELL: &str = "EXPLORERS_SHELL";

pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_CHAT_HISTORY_CAP: usize = 50;
pub const DEFAULT_REPLY_HISTORY_WINDOW: usize = 8;

/// Shell variant for UI layout selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShellKind {
    #[default]
    Desktop,
    Mobile,
}

impl FromStr for ShellKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown shell kind: {other}")),
        }
    }
}

/// Remote reply settings
#[derive(Clone, Debug, PartialEq)]
pub struct ReplyConfig {
    /// Chat-completions URL; `None` means replies are always local
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
    /// Number of most recent messages sent along as context
    pub history_window: usize,
}

impl ReplyConfig {
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: DEFAULT_REPLY_MODEL.to_string(),
            timeout_ms: DEFAULT_REPLY_TIMEOUT_MS,
            history_window: DEFAULT_REPLY_HISTORY_WINDOW,
        }
    }
}

/// Everything the composition root needs to wire the player
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub reply: ReplyConfig,
    /// Chat history cap; older messages are evicted first
    pub history_cap: usize,
    pub shell: ShellKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reply: ReplyConfig::default(),
            history_cap: DEFAULT_CHAT_HISTORY_CAP,
            shell: ShellKind::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration captured at compile time.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            match key {
                ENV_REPLY_ENDPOINT => option_env!("EXPLORERS_REPLY_ENDPOINT"),
                ENV_REPLY_API_KEY => option_env!("EXPLORERS_REPLY_API_KEY"),
                ENV_REPLY_MODEL => option_env!("EXPLORERS_REPLY_MODEL"),
                ENV_REPLY_TIMEOUT_MS => option_env!("EXPLORERS_REPLY_TIMEOUT_MS"),
                ENV_CHAT_HISTORY_CAP => option_env!("EXPLORERS_CHAT_HISTORY_CAP"),
                ENV_REPLY_HISTORY_WINDOW => option_env!("EXPLORERS_REPLY_HISTORY_WINDOW"),
                ENV_SHELL => option_env!("EXPLORERS_SHELL"),
                _ => None,
            }
            .map(str::to_string)
        })
    }

    /// Build a configuration from any key lookup. Missing or unparseable
    /// values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let reply = ReplyConfig {
            endpoint: non_blank(ENV_REPLY_ENDPOINT),
            api_key: non_blank(ENV_REPLY_API_KEY),
            model: non_blank(ENV_REPLY_MODEL).unwrap_or(defaults.reply.model),
            timeout_ms: parse_or(&lookup, ENV_REPLY_TIMEOUT_MS, defaults.reply.timeout_ms),
            history_window: parse_or(
                &lookup,
                ENV_REPLY_HISTORY_WINDOW,
                defaults.reply.history_window,
            ),
        };

        Self {
            reply,
            history_cap: parse_or(&lookup, ENV_CHAT_HISTORY_CAP, defaults.history_cap).max(1),
            shell: parse_or(&lookup, ENV_SHELL, defaults.shell),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparseable setting, using default");
                default
            }
        },
    }
}
