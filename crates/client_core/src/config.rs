use std::{fs, io, path::Path};

use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, ConfigError};

pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    log_filter: Option<String>,
}

impl ClientSettings {
    pub fn merge_toml(&mut self, raw: &str) -> Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.base_url {
            self.base_url = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    /// Later keys in each list win over earlier ones.
    pub fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in ["ROSTER_BASE_URL", "APP__BASE_URL"] {
            if let Some(v) = lookup(key) {
                self.base_url = v;
            }
        }
        for key in ["ROSTER_LOG", "APP__LOG_FILTER"] {
            if let Some(v) = lookup(key) {
                self.log_filter = v;
            }
        }
    }
}

/// Defaults, then the optional config file, then the process environment.
pub fn load_settings(config_path: &Path) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => settings
            .merge_toml(&raw)
            .map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })
        }
    }

    settings.merge_env(|key| std::env::var(key).ok());
    Ok(settings)
}

/// Parses the API base address. The scheme is matched case-insensitively and
/// normalized, so every endpoint built from the result shares one scheme.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|err| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
