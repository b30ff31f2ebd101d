use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "TRANSFORMO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime settings for the client window and its backend connection.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL of the processing service, without a trailing slash.
    pub base_url: String,
    /// Sent as the raw `Authorization` header when present.
    pub auth_token: Option<String>,
    pub window_width: f32,
    pub window_height: f32,
    /// `#rrggbb` or `#rgb`.
    pub accent_color: String,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            auth_token: None,
            window_width: 600.0,
            window_height: 600.0,
            accent_color: "#a159e1".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

/// Every key is optional in the TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    auth_token: Option<String>,
    window_width: Option<f32>,
    window_height: Option<f32>,
    accent_color: Option<String>,
    log_filter: Option<String>,
}

impl AppConfig {
    /// Defaults, then the file named by `TRANSFORMO_CONFIG`, then environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            config = config.merge_file(Path::new(&path))?;
        }
        Ok(config.merge_env(|key| std::env::var(key).ok()))
    }

    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.merge(file))
    }

    fn merge(self, file: FileConfig) -> Self {
        Self {
            base_url: file.base_url.map(normalize_base_url).unwrap_or(self.base_url),
            auth_token: file.auth_token.or(self.auth_token),
            window_width: file.window_width.unwrap_or(self.window_width),
            window_height: file.window_height.unwrap_or(self.window_height),
            accent_color: file.accent_color.unwrap_or(self.accent_color),
            log_filter: file.log_filter.unwrap_or(self.log_filter),
        }
    }

    pub fn merge_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str, fallback: f32| {
            lookup(key)
                .and_then(|value| value.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            base_url: lookup("TRANSFORMO_BASE_URL")
                .map(normalize_base_url)
                .unwrap_or(self.base_url),
            auth_token: lookup("TRANSFORMO_AUTH_TOKEN").or(self.auth_token),
            window_width: parsed("TRANSFORMO_WINDOW_WIDTH", self.window_width),
            window_height: parsed("TRANSFORMO_WINDOW_HEIGHT", self.window_height),
            accent_color: lookup("TRANSFORMO_ACCENT_COLOR").unwrap_or(self.accent_color),
            log_filter: self.log_filter,
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
