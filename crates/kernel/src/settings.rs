use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKS_ENV";
const CONFIG_DIR_ENV: &str = "BOOKS_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Default to repo root `config` directory.
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .expect("unable to resolve current directory")
            });

        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment);
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix("BOOKS").separator("_"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        settings.api.validate()?;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Contract-level knobs: accepted API versions, pagination bounds, and
/// review content limits. Fixed for the lifetime of the process once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "ApiSettings::default_valid_versions")]
    pub valid_versions: Vec<String>,
    #[serde(default = "ApiSettings::default_version")]
    pub default_version: String,
    #[serde(default = "ApiSettings::default_limit")]
    pub default_limit: usize,
    #[serde(default = "ApiSettings::default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "ApiSettings::default_max_review_length")]
    pub max_review_length: usize,
}

impl ApiSettings {
    fn default_valid_versions() -> Vec<String> {
        vec!["v1".to_string(), "v2".to_string()]
    }

    fn default_version() -> String {
        "v2".to_string()
    }

    fn default_limit() -> usize {
        20
    }

    fn default_max_limit() -> usize {
        1000
    }

    fn default_max_review_length() -> usize {
        1000
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.valid_versions.contains(&self.default_version) {
            return Err(anyhow!(
                "default version '{}' is not in the valid version set {:?}",
                self.default_version,
                self.valid_versions
            ));
        }
        if self.default_limit > self.max_limit {
            return Err(anyhow!(
                "default page limit {} exceeds the maximum {}",
                self.default_limit,
                self.max_limit
            ));
        }
        Ok(())
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            valid_versions: Self::default_valid_versions(),
            default_version: Self::default_version(),
            default_limit: Self::default_limit(),
            max_limit: Self::default_max_limit(),
            max_review_length: Self::default_max_review_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
