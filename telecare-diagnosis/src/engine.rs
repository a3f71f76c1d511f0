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

//! The diagnosis engine
//!
//! Built once at startup and shared by reference (`Arc<DiagnosisEngine>`) with every
//! request handler. Nothing is mutated after construction, so concurrent calls need
//! no locking.

use crate::backend::{BackendError, InferenceAdapter, InferenceBackend};
use crate::config::EngineConfig;
use crate::decoder::decode;
use crate::dense::DenseNetwork;
use crate::encoder::{EncoderMode, FeatureEncoder};
use crate::recommendations::recommendations;
use crate::rules::fallback_diagnose;
use crate::severity;
use serde::Serialize;
use std::sync::Arc;
use telecare_core::{
    ConfigError, DiagnosisError, DiagnosisResult, DiagnosisSource, FeatureVector,
    SymptomObservation, Vocabulary,
};
use tracing::{debug, error, info, warn};

/// Snapshot of how the engine was configured, for health and verify reports.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_unavailable_reason: Option<String>,
    pub encoder: EncoderMode,
    pub top_k: usize,
    pub symptoms: usize,
    pub conditions: usize,
    pub warnings: Vec<String>,
}

pub struct DiagnosisEngine {
    vocabulary: Vocabulary,
    encoder: FeatureEncoder,
    adapter: InferenceAdapter,
    top_k: usize,
}

impl DiagnosisEngine {
    /// Build an engine. A backend that does not match the vocabularies is dropped and
    /// the engine runs on the rule-based path.
    pub fn new(
        vocabulary: Vocabulary,
        backend: Option<Arc<dyn InferenceBackend>>,
        config: &EngineConfig,
    ) -> Self {
        let adapter = match backend {
            Some(backend) => InferenceAdapter::attach(backend, &vocabulary),
            None => InferenceAdapter::unavailable("no model configured"),
        };
        Self::with_adapter(vocabulary, adapter, config)
    }

    fn with_adapter(vocabulary: Vocabulary, adapter: InferenceAdapter, config: &EngineConfig) -> Self {
        let engine = Self {
            vocabulary,
            encoder: FeatureEncoder::new(config.encoder),
            adapter,
            top_k: config.top_k.max(1),
        };
        info!(
            "Diagnosis engine ready: encoder={}, model_available={}, top_k={}",
            engine.encoder.mode(),
            engine.adapter.is_available(),
            engine.top_k
        );
        engine
    }

    /// Rule-based engine with no backend.
    pub fn rules_only(vocabulary: Vocabulary, config: &EngineConfig) -> Self {
        Self::new(vocabulary, None, config)
    }

    /// Load vocabularies and the optional model named by `config`.
    ///
    /// Load problems degrade (empty vocabulary, no backend) and are recorded as
    /// warnings. The only error is a missing backend when `require_backend` is set.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut vocabulary =
            Vocabulary::load(&config.symptom_mapping_path, &config.condition_mapping_path);

        let adapter = match &config.model_path {
            None => InferenceAdapter::unavailable("no model configured"),
            Some(path) => match DenseNetwork::load(path) {
                Ok(network) => InferenceAdapter::attach(Arc::new(network), &vocabulary),
                Err(e) => {
                    warn!("Model unavailable, using rule-based diagnosis: {}", e);
                    vocabulary.warnings.push(e.to_string());
                    InferenceAdapter::unavailable(e.to_string())
                }
            },
        };

        if let Some(reason) = adapter.unavailable_reason() {
            if config.require_backend {
                return Err(ConfigError::BackendRequired(reason.to_string()));
            }
        }

        Ok(Self::with_adapter(vocabulary, adapter, config))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn encoder_mode(&self) -> EncoderMode {
        self.encoder.mode()
    }

    pub fn model_available(&self) -> bool {
        self.adapter.is_available()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            model_available: self.adapter.is_available(),
            backend: self.adapter.backend_name().map(str::to_string),
            backend_unavailable_reason: self.adapter.unavailable_reason().map(str::to_string),
            encoder: self.encoder.mode(),
            top_k: self.top_k,
            symptoms: self.vocabulary.symptoms.len(),
            conditions: self.vocabulary.conditions.len(),
            warnings: self.vocabulary.warnings.clone(),
        }
    }

    pub fn encode(&self, observations: &[SymptomObservation]) -> FeatureVector {
        self.encoder.encode(&self.vocabulary.symptoms, observations)
    }

    /// Diagnose a non-empty symptom list.
    ///
    /// Backend failures never surface here: they are logged and the rule-based
    /// cascade answers instead. The only error is an empty observation list.
    pub fn diagnose(
        &self,
        observations: &[SymptomObservation],
    ) -> Result<Vec<DiagnosisResult>, DiagnosisError> {
        if observations.is_empty() {
            return Err(DiagnosisError::NoSymptoms);
        }

        let features = self.encode(observations);
        debug!(
            "Encoded {} observations into {} active features",
            observations.len(),
            features.active_count()
        );

        match self.adapter.infer(&features) {
            Ok(scores) => match self.decode_scores(&scores, observations) {
                Ok(results) if !results.is_empty() => Ok(results),
                Ok(_) => {
                    warn!("Model returned no classes, using rule-based diagnosis");
                    Ok(fallback_diagnose(observations))
                }
                Err(e) => {
                    error!("Model/vocabulary mismatch while decoding: {}", e);
                    Ok(fallback_diagnose(observations))
                }
            },
            Err(BackendError::Unavailable(_)) => Ok(fallback_diagnose(observations)),
            Err(e) => {
                error!("Inference failed, using rule-based diagnosis: {}", e);
                Ok(fallback_diagnose(observations))
            }
        }
    }

    fn decode_scores(
        &self,
        scores: &[f32],
        observations: &[SymptomObservation],
    ) -> Result<Vec<DiagnosisResult>, DiagnosisError> {
        let ranked = decode(scores, self.top_k, &self.vocabulary.conditions)?;
        Ok(ranked
            .into_iter()
            .map(|condition| {
                let tier = severity::classify(&condition.label, observations);
                let recommendations = recommendations(&condition.label);
                DiagnosisResult::new(
                    condition.label,
                    condition.score,
                    tier,
                    recommendations,
                    DiagnosisSource::Model,
                )
            })
            .collect())
    }
}
