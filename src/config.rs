use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "ticketsmith";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// On-disk configuration, managed by `ticketsmith config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_max_tokens: Option<u32>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to serialize config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

/// Environment values that take precedence over the stored file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_key: env_value("OPENAI_API_KEY"),
            model: env_value("TICKETSMITH_MODEL"),
            max_tokens: env_value("TICKETSMITH_MAX_TOKENS"),
        }
    }
}

/// Runtime view of the configuration: stored file values with environment
/// overrides applied. Model and token budget defaults are applied by the
/// client, not here, so "unset" stays observable.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_max_tokens: Option<u32>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::merge(StoredConfig::load()?, EnvOverrides::from_env())
    }

    pub fn merge(stored: StoredConfig, env: EnvOverrides) -> AppResult<Self> {
        let openai_max_tokens = match env.max_tokens {
            Some(raw) => Some(raw.parse().map_err(|_| {
                AppError::Configuration(format!("invalid max token override: {raw}"))
            })?),
            None => stored.openai_max_tokens,
        };

        Ok(Self {
            openai_api_key: env.api_key.or(stored.openai_api_key),
            openai_model: env.model.or(stored.openai_model),
            openai_max_tokens,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn config_directory() -> AppResult<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok_or_else(|| {
            AppError::Configuration("cannot determine a configuration directory".to_string())
        })?;
    Ok(base.join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
