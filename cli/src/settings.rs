use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_PATH_ENV: &str = "BOOKSHELF_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "bookshelf.toml";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Configuration layered from `bookshelf.toml` and `BOOKSHELF__*` variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load `.env`, then the config file named by `BOOKSHELF_CONFIG` (or
    /// `bookshelf.toml`), then the environment.
    pub fn load() -> anyhow::Result<Self> {
        // A missing `.env` is fine.
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from an optional file at `path`, overlaid by the environment.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        cfg.try_deserialize()
            .with_context(|| "failed to deserialize configuration")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "ApiSettings::default_base_url")]
    pub base_url: String,
}

impl ApiSettings {
    fn default_base_url() -> String {
        bookshelf_core::DEFAULT_BASE_URL.to_string()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "StorageSettings::default_path")]
    pub path: PathBuf,
}

impl StorageSettings {
    fn default_path() -> PathBuf {
        PathBuf::from("favorites.redb")
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_filter: Self::default_log_filter(),
        }
    }
}
