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

//! Error taxonomy shared by the engine, server and CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or verifying engine configuration.
///
/// These never abort a running process on their own: vocabulary problems degrade to an
/// empty vocabulary and backend problems degrade to the rule-based path. Only
/// `BackendRequired` is meant to stop startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid vocabulary in {path:?}: {reason}")]
    InvalidVocabulary { path: PathBuf, reason: String },

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Backend shape mismatch: {what} expected {expected}, backend has {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot attach an inference backend to an empty {0} vocabulary")]
    EmptyVocabulary(&'static str),

    #[error("Inference backend required but unavailable: {0}")]
    BackendRequired(String),
}

/// Errors surfaced by a diagnosis call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosisError {
    /// Caller supplied no observations. Maps to a 400 at the HTTP boundary.
    #[error("No symptoms provided")]
    NoSymptoms,

    /// A decoded class index has no condition label.
    #[error("Condition index {index} out of range for vocabulary of {len} conditions")]
    VocabularyMismatch { index: usize, len: usize },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
