//! Settings that feed the fetcher and the reconciler.
//!
//! `config.toml` lives in the roster home directory. Every key is optional;
//! [`ConfigOverrides`] (typically from CLI flags) take precedence over the
//! file, which takes precedence over built-in defaults.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use roster_api::Provider;
use roster_api::provider::DEFAULT_DEV_MODELS_URL;
use roster_api::provider::DEFAULT_MODELS_PATH;
use roster_client::DEFAULT_REQUEST_TIMEOUT;
use roster_utils_home_dir::find_roster_home;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::models_manager::exclusion::DEFAULT_EXCLUDE_PATTERNS;
use crate::models_manager::exclusion::PatternExclusion;
use crate::models_manager::model_presets::PREFERRED_DEFAULT_MODEL;
use crate::models_manager::model_presets::builtin_fallback_models;
use crate::models_manager::reconcile::DefaultSource;
use crate::models_manager::reconcile::ReconcileOptions;

pub const CONFIG_TOML_FILE: &str = "config.toml";

/// Origin used when none is configured; a local development host.
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to locate roster home: {0}")]
    Home(#[source] std::io::Error),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex_lite::Error),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// On-disk form of the configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    /// Origin the chat application is served from.
    pub app_origin: Option<String>,
    /// Models listing used when the origin is a local development host.
    pub dev_models_url: Option<String>,
    /// Same-origin path of the models listing.
    pub models_path: Option<String>,
    pub request_timeout_ms: Option<u64>,

    /// Custom models configured for the whole application.
    pub app_custom_models: Option<String>,
    /// Custom models configured by the user.
    pub user_custom_models: Option<String>,
    /// Model pre-selected for new conversations (`name` or `name@provider`).
    pub default_model: Option<String>,

    pub preferred_default_model: Option<String>,
    pub default_source: Option<DefaultSource>,
    /// Regular expressions; matching remote model ids are hidden.
    pub exclude_patterns: Option<Vec<String>>,
    pub include_fallback_models: Option<bool>,
}

/// Values supplied at startup that win over `config.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub app_origin: Option<String>,
    pub user_custom_models: Option<String>,
    pub default_model: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub include_fallback_models: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub roster_home: PathBuf,
    pub app_origin: Url,
    pub dev_models_url: String,
    pub models_path: String,
    pub request_timeout: Duration,
    pub app_custom_models: String,
    pub user_custom_models: String,
    pub default_model: Option<String>,
    pub preferred_default_model: Option<String>,
    pub default_source: DefaultSource,
    pub exclude_patterns: Vec<String>,
    pub include_fallback_models: bool,
}

impl Config {
    /// Locate the roster home, read `config.toml` from it and apply
    /// `overrides`.
    pub async fn load_with_overrides(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let roster_home = find_roster_home().map_err(ConfigError::Home)?;
        let cfg = load_config_as_toml(&roster_home).await?;
        Self::load_from_base_config_with_overrides(cfg, overrides, roster_home)
    }

    pub fn load_from_base_config_with_overrides(
        cfg: ConfigToml,
        overrides: ConfigOverrides,
        roster_home: PathBuf,
    ) -> Result<Self, ConfigError> {
        let ConfigOverrides {
            app_origin,
            user_custom_models,
            default_model,
            request_timeout_ms,
            include_fallback_models,
        } = overrides;

        let app_origin = app_origin
            .or(cfg.app_origin)
            .unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string());
        let app_origin = Url::parse(&app_origin).map_err(|source| ConfigError::InvalidUrl {
            value: app_origin.clone(),
            source,
        })?;

        let request_timeout = request_timeout_ms
            .or(cfg.request_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let default_model = default_model
            .or(cfg.default_model)
            .filter(|model| !model.trim().is_empty());

        let config = Self {
            roster_home,
            app_origin,
            dev_models_url: cfg
                .dev_models_url
                .unwrap_or_else(|| DEFAULT_DEV_MODELS_URL.to_string()),
            models_path: cfg
                .models_path
                .unwrap_or_else(|| DEFAULT_MODELS_PATH.to_string()),
            request_timeout,
            app_custom_models: cfg.app_custom_models.unwrap_or_default(),
            user_custom_models: user_custom_models
                .or(cfg.user_custom_models)
                .unwrap_or_default(),
            default_model,
            preferred_default_model: cfg
                .preferred_default_model
                .or_else(|| Some(PREFERRED_DEFAULT_MODEL.to_string())),
            default_source: cfg.default_source.unwrap_or_default(),
            exclude_patterns: cfg.exclude_patterns.unwrap_or_else(|| {
                DEFAULT_EXCLUDE_PATTERNS
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }),
            include_fallback_models: include_fallback_models
                .or(cfg.include_fallback_models)
                .unwrap_or(true),
        };

        // Endpoint settings and patterns are validated at load time.
        config.provider()?;
        config.reconcile_options()?;
        Ok(config)
    }

    /// Application-wide custom models followed by the user's, so the user's
    /// segments are applied last.
    pub fn local_custom_models(&self) -> String {
        [
            self.app_custom_models.as_str(),
            self.user_custom_models.as_str(),
        ]
        .join(",")
    }

    pub fn provider(&self) -> Result<Provider, ConfigError> {
        let provider = Provider::for_origin(&self.app_origin, &self.dev_models_url, &self.models_path)
            .map_err(|source| ConfigError::InvalidUrl {
                value: format!("{} + {}", self.app_origin, self.models_path),
                source,
            })?;
        Ok(provider.with_timeout(self.request_timeout))
    }

    pub fn reconcile_options(&self) -> Result<ReconcileOptions, ConfigError> {
        let fallback_models = if self.include_fallback_models {
            builtin_fallback_models()
        } else {
            Vec::new()
        };
        Ok(ReconcileOptions {
            exclusion: Arc::new(PatternExclusion::new(&self.exclude_patterns)?),
            fallback_models,
            preferred_default: self.preferred_default_model.clone(),
            default_source: self.default_source,
        })
    }
}

/// Read `config.toml` from `roster_home`. A missing file is an empty config.
pub async fn load_config_as_toml(roster_home: &Path) -> Result<ConfigToml, ConfigError> {
    let path = roster_home.join(CONFIG_TOML_FILE);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(ConfigToml::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}
