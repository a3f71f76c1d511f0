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

//! Telecare Diagnosis
//!
//! Turns a list of reported symptoms into ranked diagnoses.
//!
//! ## Pipeline
//!
//! 1. **Encode**: observations become a fixed-width feature vector over the symptom
//!    vocabulary ([`FeatureEncoder`]).
//! 2. **Infer**: an optional [`InferenceBackend`] (by default a JSON-described
//!    [`DenseNetwork`]) scores every condition. The backend is verified against the
//!    vocabularies once at startup and any failure at call time is contained.
//! 3. **Decode**: the top-k scores become [`RankedCondition`]s, each enriched with a
//!    severity tier and recommendations.
//! 4. **Fallback**: when no backend is available or a call fails, a fixed rule cascade
//!    answers instead ([`fallback_diagnose`]).
//!
//! ## Example
//!
//! ```no_run
//! use telecare_diagnosis::{DiagnosisEngine, EngineConfig};
//! use telecare_core::SymptomObservation;
//!
//! let engine = DiagnosisEngine::from_config(&EngineConfig::default())?;
//! let results = engine.diagnose(&[
//!     SymptomObservation::named("fever"),
//!     SymptomObservation::named("cough"),
//! ])?;
//! println!("{}", results[0].diagnosis);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod config;
pub mod decoder;
pub mod dense;
pub mod encoder;
pub mod engine;
pub mod recommendations;
pub mod rules;
pub mod severity;

pub use backend::{BackendError, BackendState, InferenceAdapter, InferenceBackend};
pub use config::EngineConfig;
pub use decoder::{decode, top_k_indices, RankedCondition};
pub use dense::{Activation, DenseNetwork, LayerSpec, NetworkSpec};
pub use encoder::{EncoderMode, FeatureEncoder};
pub use engine::{DiagnosisEngine, EngineStatus};
pub use recommendations::recommendations;
pub use rules::{fallback_diagnose, FallbackRule, FALLBACK_RULES};
pub use severity::classify;
