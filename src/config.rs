// Engine configuration: JSON file with environment overrides.
use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,

    // Standings points awarded per decided match.
    pub points_for_win: i32,
    pub points_for_loss: i32,

    // Used when a grouped competition has no group size of its own.
    pub default_group_size: u32,

    // Place bye winners into the second round as soon as the bracket is drawn.
    pub propagate_byes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://club_competition.db?mode=rwc".to_string(),
            max_connections: 5,
            busy_timeout_ms: 5000,
            points_for_win: 2,
            points_for_loss: 1,
            default_group_size: 4,
            propagate_byes: false,
        }
    }
}

impl EngineConfig {
    pub const ENV_DATABASE_URL: &str = "CLUB_COMPETITION_DATABASE_URL";
    pub const ENV_MAX_CONNECTIONS: &str = "CLUB_COMPETITION_MAX_CONNECTIONS";
    pub const ENV_BUSY_TIMEOUT_MS: &str = "CLUB_COMPETITION_BUSY_TIMEOUT_MS";
    pub const ENV_PROPAGATE_BYES: &str = "CLUB_COMPETITION_PROPAGATE_BYES";

    // Load the configuration from an optional JSON file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Ok(config.apply_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::validation(format!("No se pudo leer la configuración {}: {e}", path.display())))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| EngineError::validation(format!("Configuración inválida: {e}")))
    }

    // Override fields with any environment variables that are set.
    pub fn apply_env(mut self) -> Self {
        if let Some(value) = env_value(Self::ENV_DATABASE_URL) {
            self.database_url = value;
        }
        if let Some(value) = env_value(Self::ENV_MAX_CONNECTIONS).and_then(|v| v.parse().ok()) {
            self.max_connections = value;
        }
        if let Some(value) = env_value(Self::ENV_BUSY_TIMEOUT_MS).and_then(|v| v.parse().ok()) {
            self.busy_timeout_ms = value;
        }
        if let Some(value) = env_value(Self::ENV_PROPAGATE_BYES) {
            self.propagate_byes = is_truthy(&value);
        }
        self
    }

    // Resolve the group size of a competition, 0 meaning "not set".
    pub fn group_size_or_default(&self, group_size: u32) -> u32 {
        match group_size {
            0 => self.default_group_size,
            n => n,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
