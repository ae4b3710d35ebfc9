use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{strip_whitespace, WatchList};

/// Default advisory page (Korea Meteorological Administration special reports).
pub const DEFAULT_SOURCE_URL: &str = "https://www.weather.go.kr/w/special-report/overall.do";

const TOKEN_ENV: &str = "ADVISORY_WATCH_TELEGRAM_TOKEN";
const CHAT_ID_ENV: &str = "ADVISORY_WATCH_TELEGRAM_CHAT_ID";

/// Root configuration structure, deserialized from `.advisory-watch/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub state: StateConfig,
    /// Telegram credentials. Absent means no remote delivery.
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Areas to track, in the order they are reported.
#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    pub areas: Vec<String>,
}

impl Default for WatchConfig {
    /// West-coast areas of South Chungcheong.
    fn default() -> Self {
        WatchConfig {
            areas: ["보령시", "서천군", "홍성군", "태안군", "당진시", "서산시"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: default_source_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Default, Deserialize)]
pub struct StateConfig {
    /// Persisted-state file. Defaults to [`default_state_path`].
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifyConfig {
    /// Send a liveness message on runs with no active advisories.
    #[serde(default)]
    pub heartbeat: bool,
}

impl Config {
    pub fn watch_list(&self) -> WatchList {
        WatchList::new(self.watch.areas.clone())
    }

    /// State file location: explicit override, then config, then the default.
    pub fn state_path(&self, state_override: Option<&Path>) -> PathBuf {
        state_override
            .map(Path::to_path_buf)
            .or_else(|| self.state.path.clone())
            .unwrap_or_else(default_state_path)
    }

    /// Reject watch-lists that are empty or contain blank entries.
    pub fn validate(&self) -> Result<()> {
        if self.watch.areas.is_empty() {
            bail!("watch.areas must name at least one area");
        }
        if let Some(pos) = self
            .watch
            .areas
            .iter()
            .position(|a| strip_whitespace(a).is_empty())
        {
            bail!("watch.areas[{}] is blank", pos);
        }
        Ok(())
    }

    /// Fill Telegram credentials from the environment, overriding the file.
    fn apply_env(&mut self, token: Option<String>, chat_id: Option<String>) {
        if let Some(tg) = self.telegram.as_mut() {
            if let Some(token) = token {
                tg.bot_token = token;
            }
            if let Some(chat_id) = chat_id {
                tg.chat_id = chat_id;
            }
        } else if let (Some(bot_token), Some(chat_id)) = (token, chat_id) {
            self.telegram = Some(TelegramConfig { bot_token, chat_id });
        }
    }
}

/// `<data_dir>/advisory-watch/state.json`, or `./advisory-state.json` when no
/// data directory is known.
pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("advisory-watch").join("state.json"))
        .unwrap_or_else(|| PathBuf::from("advisory-state.json"))
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.advisory-watch/config.toml`
/// 3. `~/.config/advisory-watch/config.toml`
/// 4. Built-in [`Config::default`]
///
/// Telegram credentials in the environment take precedence over the file.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let mut config = match find_config_file(config_override) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };

    config.apply_env(
        std::env::var(TOKEN_ENV).ok().filter(|v| !v.is_empty()),
        std::env::var(CHAT_ID_ENV).ok().filter(|v| !v.is_empty()),
    );
    config.validate()?;
    Ok(config)
}

fn find_config_file(config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".advisory-watch").join("config.toml");
    if local.exists() {
        return Some(local);
    }

    dirs::home_dir()
        .map(|home| {
            home.join(".config")
                .join("advisory-watch")
                .join("config.toml")
        })
        .filter(|p| p.exists())
}
