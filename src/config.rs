use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_PROJECT_KEY: &str = "DCM";
pub const DEFAULT_ISSUE_TYPE: &str = "Task";
pub const DEFAULT_LOCATION_FIELD: &str = "customfield_10001";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

pub fn config_directory() -> AppResult<PathBuf> {
    if let Ok(dir) = env::var("WOES_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("woes"));
    }
    let home = env::var("HOME")
        .map_err(|_| AppError::Configuration("cannot locate config directory: HOME not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("woes"))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// On-disk configuration, managed by `woes config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_project_key: Option<String>,
    pub jira_issue_type: Option<String>,
    pub jira_location_field: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
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
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

/// Resolved runtime configuration: stored values with environment overrides
/// and defaults applied.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_project_key: String,
    pub jira_issue_type: String,
    pub jira_location_field: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub listen_addr: String,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Ok(Self::resolve(StoredConfig::load()?))
    }

    fn resolve(stored: StoredConfig) -> Self {
        Self {
            jira_base_url: env_or("JIRA_URL", stored.jira_base_url),
            jira_email: env_or("JIRA_EMAIL", stored.jira_email),
            jira_token: env_or("JIRA_TOKEN", stored.jira_token),
            jira_project_key: env_or("JIRA_PROJECT_KEY", stored.jira_project_key)
                .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string()),
            jira_issue_type: env_or("JIRA_ISSUE_TYPE", stored.jira_issue_type)
                .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            jira_location_field: env_or("JIRA_LOCATION_FIELD", stored.jira_location_field)
                .unwrap_or_else(|| DEFAULT_LOCATION_FIELD.to_string()),
            gemini_api_key: env_or("GEMINI_API_KEY", stored.gemini_api_key),
            gemini_model: env_or("GEMINI_MODEL", stored.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            listen_addr: env::var("WOES_ADDR")
                .ok()
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }
}

fn env_or(var: &str, stored: Option<String>) -> Option<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_applies_defaults_over_empty_store() {
        let config = AppConfig::resolve(StoredConfig::default());
        assert_eq!(config.jira_project_key, DEFAULT_PROJECT_KEY);
        assert_eq!(config.jira_issue_type, DEFAULT_ISSUE_TYPE);
        assert_eq!(config.jira_location_field, DEFAULT_LOCATION_FIELD);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn stored_config_round_trips() {
        let stored = StoredConfig {
            jira_base_url: Some("https://jira.example.com".to_string()),
            jira_token: Some("secret".to_string()),
            ..StoredConfig::default()
        };
        let json = serde_json::to_string(&stored).unwrap();
        let back: StoredConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.jira_base_url.as_deref(), Some("https://jira.example.com"));
        assert_eq!(back.jira_token.as_deref(), Some("secret"));
    }
}
