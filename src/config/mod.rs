mod api;
mod defaults;
mod expand;

use crate::api::DispatchSettings;
use crate::cli::Args;
use crate::error::{ChatError, Result};
use crate::models::{is_known_model, AVAILABLE_MODELS, DEFAULT_MODEL};
use crate::render::RenderOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use expand::expand_vars_with;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub collapse_thinking: Option<bool>,
    #[serde(default)]
    pub resegment_escaped: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// On-disk configuration. YAML or JSON, every field optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub dispatch: DispatchSettings,
    pub model: String,
    /// `None` means the platform default location.
    pub storage_path: Option<PathBuf>,
    pub verbose: bool,
    pub render: RenderOptions,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::resolve(args, file_config, |name| std::env::var(name).ok())
    }

    /// Precedence: CLI args > environment > config file > defaults.
    pub fn resolve<F>(args: &Args, file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env("RELAYCHAT_API_ENDPOINT"))
            .or(file.api.endpoint)
            .map(|endpoint| expand_vars_with(&endpoint, &env))
            .unwrap_or_else(|| DispatchSettings::default().endpoint);

        let model = args
            .model
            .clone()
            .or_else(|| env("RELAYCHAT_MODEL"))
            .or(file.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        validate_model(&model)?;

        let origin = env("RELAYCHAT_ORIGIN").or(file.api.origin);

        let storage_path = env("RELAYCHAT_STORAGE_PATH")
            .or(file.storage.path)
            .map(|path| PathBuf::from(expand_vars_with(&path, &env)));

        let verbose = args.verbose
            || env("RELAYCHAT_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.session.verbose)
                .unwrap_or(false);

        let direct_timeout = Duration::from_millis(
            file.api
                .direct_timeout_ms
                .unwrap_or_else(defaults::default_direct_timeout_ms),
        );
        let relay_timeout = Duration::from_secs(
            file.api
                .relay_timeout_secs
                .unwrap_or_else(defaults::default_relay_timeout_secs),
        );
        if direct_timeout.is_zero() || relay_timeout.is_zero() {
            return Err(ChatError::ConfigError(
                "Request timeouts must be greater than zero".into(),
            ));
        }

        let dispatch = DispatchSettings {
            endpoint,
            direct_timeout,
            relay_timeout,
            relays: file
                .api
                .relays
                .unwrap_or_else(|| DispatchSettings::default().relays),
            origin,
            fallback_on_empty_response: file.api.fallback_on_empty_response.unwrap_or(false),
        };

        let render = RenderOptions {
            collapse_thinking: args.collapse_thinking
                || file
                    .render
                    .collapse_thinking
                    .unwrap_or_else(defaults::default_collapse_thinking),
            resegment_escaped: file
                .render
                .resegment_escaped
                .unwrap_or_else(defaults::default_resegment_escaped),
        };

        Ok(Config {
            dispatch,
            model,
            storage_path,
            verbose,
            render,
        })
    }
}

pub fn validate_model(model: &str) -> Result<()> {
    if is_known_model(model) {
        Ok(())
    } else {
        Err(ChatError::ConfigError(format!(
            "Unknown model '{}'. Available: {}",
            model,
            AVAILABLE_MODELS.join(", ")
        )))
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Ok(Self::load_from(&path)?);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory overrides the global config
            PathBuf::from(".relaychat.yaml"),
            PathBuf::from(".relaychat.yml"),
            PathBuf::from(".relaychat.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("relaychat");
            paths.push(config_dir.join("relaychat.yaml"));
            paths.push(config_dir.join("relaychat.yml"));
            paths.push(config_dir.join("relaychat.json"));
        }

        paths
    }
}
