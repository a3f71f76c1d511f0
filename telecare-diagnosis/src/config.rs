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

use crate::encoder::EncoderMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Diagnosis engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// JSON object mapping symptom name to feature index
    #[serde(default = "default_symptom_mapping_path")]
    pub symptom_mapping_path: PathBuf,

    /// JSON array of condition labels in output-class order
    #[serde(default = "default_condition_mapping_path")]
    pub condition_mapping_path: PathBuf,

    /// Dense network artifact (optional; rule-based diagnosis when absent)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Feature encoding (presence or severity_weighted)
    #[serde(default)]
    pub encoder: EncoderMode,

    /// Number of ranked diagnoses returned from the model path
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Refuse to start without a verified backend
    #[serde(default)]
    pub require_backend: bool,
}

fn default_symptom_mapping_path() -> PathBuf {
    PathBuf::from("data/symptom_mapping.json")
}

fn default_condition_mapping_path() -> PathBuf {
    PathBuf::from("data/condition_mapping.json")
}

fn default_top_k() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symptom_mapping_path: default_symptom_mapping_path(),
            condition_mapping_path: default_condition_mapping_path(),
            model_path: None,
            encoder: EncoderMode::default(),
            top_k: default_top_k(),
            require_backend: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.encoder, EncoderMode::Presence);
        assert!(config.model_path.is_none());
        assert!(!config.require_backend);
    }

    #[test]
    fn test_encoder_mode_deserializes_snake_case() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"encoder": "severity_weighted", "top_k": 5}"#).unwrap();
        assert_eq!(config.encoder, EncoderMode::SeverityWeighted);
        assert_eq!(config.top_k, 5);
    }
}
