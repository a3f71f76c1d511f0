// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use telecare_diagnosis::{EncoderMode, EngineConfig};

/// Telecare Server Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:5000")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,
}

fn default_http_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_enable_cors() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
            cors_origins: vec![],
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - TELECARE_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:5000)
    /// - TELECARE_ENABLE_CORS: Enable CORS (default: true)
    /// - TELECARE_LOG_JSON: JSON log output (default: false)
    /// - TELECARE_SYMPTOM_MAP: Symptom mapping JSON (default: data/symptom_mapping.json)
    /// - TELECARE_CONDITION_MAP: Condition list JSON (default: data/condition_mapping.json)
    /// - TELECARE_MODEL_PATH: Dense network artifact (default: none)
    /// - TELECARE_ENCODER: presence | severity_weighted (default: presence)
    /// - TELECARE_TOP_K: Ranked diagnoses per request (default: 3)
    /// - TELECARE_REQUIRE_BACKEND: Refuse to start without a model (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load configuration with priority: file > env > defaults
    ///
    /// Environment variables that are explicitly set still override file values.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config.apply_env();

        Ok(config)
    }

    /// Override fields whose environment variable is set. Unparseable values are
    /// ignored with a warning.
    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("TELECARE_HTTP_ADDR") {
            self.server.listen_addr = addr;
        }

        if let Some(cors) = env_parse::<bool>("TELECARE_ENABLE_CORS") {
            self.server.enable_cors = cors;
        }

        if let Some(json) = env_parse::<bool>("TELECARE_LOG_JSON") {
            self.server.log_json = json;
        }

        if let Ok(path) = std::env::var("TELECARE_SYMPTOM_MAP") {
            self.engine.symptom_mapping_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("TELECARE_CONDITION_MAP") {
            self.engine.condition_mapping_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("TELECARE_MODEL_PATH") {
            self.engine.model_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Some(mode) = env_parse::<EncoderMode>("TELECARE_ENCODER") {
            self.engine.encoder = mode;
        }

        if let Some(top_k) = env_parse::<usize>("TELECARE_TOP_K") {
            self.engine.top_k = top_k;
        }

        if let Some(required) = env_parse::<bool>("TELECARE_REQUIRE_BACKEND") {
            self.engine.require_backend = required;
        }
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.server.listen_addr))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.engine.top_k == 0 {
            anyhow::bail!("engine.top_k must be at least 1");
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:5000");
        assert!(config.server.enable_cors);
        assert_eq!(config.engine.top_k, 3);
        assert!(config.engine.model_path.is_none());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
listen_addr = "0.0.0.0:8080"

[engine]
model_path = "models/reference.json"
encoder = "severity_weighted"
top_k = 5
"#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert!(config.server.enable_cors);
        assert_eq!(
            config.engine.model_path,
            Some(PathBuf::from("models/reference.json"))
        );
        assert_eq!(config.engine.encoder, EncoderMode::SeverityWeighted);
        assert_eq!(config.engine.top_k, 5);
        assert_eq!(
            config.engine.symptom_mapping_path,
            PathBuf::from("data/symptom_mapping.json")
        );
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nlisten_addr = ").unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.engine.top_k = 0;
        assert!(config.validate().is_err());

        config.engine.top_k = 3;
        config.server.listen_addr = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    // Single test touches the process environment so parallel tests don't race on it.
    #[test]
    fn test_env_overrides() {
        std::env::set_var("TELECARE_HTTP_ADDR", "0.0.0.0:9090");
        std::env::set_var("TELECARE_TOP_K", "2");
        std::env::set_var("TELECARE_ENCODER", "severity");
        std::env::set_var("TELECARE_REQUIRE_BACKEND", "true");
        std::env::set_var("TELECARE_ENABLE_CORS", "maybe");

        let config = ServerConfig::from_env();
        assert_eq!(config.server.listen_addr, "0.0.0.0:9090");
        assert_eq!(config.engine.top_k, 2);
        assert_eq!(config.engine.encoder, EncoderMode::SeverityWeighted);
        assert!(config.engine.require_backend);
        assert!(config.server.enable_cors);

        let missing = ServerConfig::load(Some(PathBuf::from("/nonexistent/telecare.toml"))).unwrap();
        assert_eq!(missing.server.listen_addr, "0.0.0.0:9090");

        for key in [
            "TELECARE_HTTP_ADDR",
            "TELECARE_TOP_K",
            "TELECARE_ENCODER",
            "TELECARE_REQUIRE_BACKEND",
            "TELECARE_ENABLE_CORS",
        ] {
            std::env::remove_var(key);
        }
    }
}
