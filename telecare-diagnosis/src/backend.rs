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

//! Inference backend abstraction and the adapter that guards it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use telecare_core::{ConfigError, FeatureVector, Vocabulary};
use thiserror::Error;
use tracing::{error, info};

/// A trained classifier with one input of width N and one output of width M.
pub trait InferenceBackend: Send + Sync {
    /// Backend name for logs and health reports
    fn name(&self) -> &str;

    /// Expected feature vector width (N)
    fn input_width(&self) -> usize;

    /// Number of output classes (M)
    fn output_width(&self) -> usize;

    /// Raw class scores for one feature vector
    fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Backend invocation failed: {0}")]
    Invocation(String),

    #[error("Input width mismatch: expected {expected}, got {actual}")]
    InputShape { expected: usize, actual: usize },

    #[error("Output width mismatch: expected {expected}, got {actual}")]
    OutputShape { expected: usize, actual: usize },

    #[error("Backend produced non-finite scores")]
    NonFinite,

    #[error("Backend score {score} at class {index} is outside [0, 1]")]
    OutOfRange { index: usize, score: f32 },

    #[error("Backend panicked: {0}")]
    Panicked(String),
}

/// Whether a verified backend is attached.
#[derive(Clone)]
pub enum BackendState {
    Available(Arc<dyn InferenceBackend>),
    Unavailable { reason: String },
}

impl std::fmt::Debug for BackendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendState::Available(backend) => {
                f.debug_tuple("Available").field(&backend.name()).finish()
            }
            BackendState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Single best-effort pass-through to the configured backend.
#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    state: BackendState,
}

impl InferenceAdapter {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: BackendState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Check a backend's shape against the vocabularies it will be decoded with.
    pub fn verify(
        backend: &dyn InferenceBackend,
        vocabulary: &Vocabulary,
    ) -> Result<(), ConfigError> {
        if vocabulary.symptoms.is_empty() {
            return Err(ConfigError::EmptyVocabulary("symptom"));
        }
        if vocabulary.conditions.is_empty() {
            return Err(ConfigError::EmptyVocabulary("condition"));
        }
        if backend.input_width() != vocabulary.symptoms.len() {
            return Err(ConfigError::ShapeMismatch {
                what: "input width",
                expected: vocabulary.symptoms.len(),
                actual: backend.input_width(),
            });
        }
        if backend.output_width() != vocabulary.conditions.len() {
            return Err(ConfigError::ShapeMismatch {
                what: "output width",
                expected: vocabulary.conditions.len(),
                actual: backend.output_width(),
            });
        }
        Ok(())
    }

    /// Attach a backend after verifying it; a backend that fails verification is
    /// dropped and the adapter reports unavailable.
    pub fn attach(backend: Arc<dyn InferenceBackend>, vocabulary: &Vocabulary) -> Self {
        match Self::verify(backend.as_ref(), vocabulary) {
            Ok(()) => {
                info!(
                    "Inference backend '{}' attached ({} -> {})",
                    backend.name(),
                    backend.input_width(),
                    backend.output_width()
                );
                Self {
                    state: BackendState::Available(backend),
                }
            }
            Err(e) => {
                error!(
                    "Inference backend '{}' failed verification, using rule-based diagnosis: {}",
                    backend.name(),
                    e
                );
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn state(&self) -> &BackendState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, BackendState::Available(_))
    }

    pub fn backend_name(&self) -> Option<&str> {
        match &self.state {
            BackendState::Available(backend) => Some(backend.name()),
            BackendState::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            BackendState::Available(_) => None,
            BackendState::Unavailable { reason } => Some(reason),
        }
    }

    /// Run the backend once. Every failure, including a panic inside the backend,
    /// comes back as a `BackendError`. Scores must be finite and within `[0, 1]`.
    pub fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>, BackendError> {
        let backend = match &self.state {
            BackendState::Available(backend) => backend,
            BackendState::Unavailable { reason } => {
                return Err(BackendError::Unavailable(reason.clone()))
            }
        };

        if features.len() != backend.input_width() {
            return Err(BackendError::InputShape {
                expected: backend.input_width(),
                actual: features.len(),
            });
        }

        let scores = panic::catch_unwind(AssertUnwindSafe(|| backend.infer(features)))
            .map_err(|payload| BackendError::Panicked(panic_message(payload.as_ref())))??;

        if scores.len() != backend.output_width() {
            return Err(BackendError::OutputShape {
                expected: backend.output_width(),
                actual: scores.len(),
            });
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(BackendError::NonFinite);
        }
        if let Some((index, &score)) = scores
            .iter()
            .enumerate()
            .find(|(_, s)| !(0.0..=1.0).contains(*s))
        {
            return Err(BackendError::OutOfRange { index, score });
        }

        Ok(scores)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn reference() -> Vocabulary {
        Vocabulary::reference()
    }

    #[test]
    fn test_attach_verified_backend() {
        let backend = Arc::new(FixedScores {
            input_width: 50,
            scores: vec![0.1; 10],
        });
        let adapter = InferenceAdapter::attach(backend, &reference());

        assert!(adapter.is_available());
        assert_eq!(adapter.backend_name(), Some("fixed"));
        assert_eq!(adapter.infer(&FeatureVector::zeros(50)).unwrap().len(), 10);
    }

    #[test]
    fn test_output_width_mismatch_degrades() {
        let backend = Arc::new(FixedScores {
            input_width: 50,
            scores: vec![0.1; 12],
        });
        let adapter = InferenceAdapter::attach(backend, &reference());

        assert!(!adapter.is_available());
        assert!(adapter.unavailable_reason().unwrap().contains("output width"));
        assert!(matches!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn test_verify_rejects_empty_vocabulary() {
        let backend = FixedScores {
            input_width: 0,
            scores: vec![],
        };
        let result = InferenceAdapter::verify(&backend, &Vocabulary::default());
        assert!(matches!(result, Err(ConfigError::EmptyVocabulary(_))));
    }

    #[test]
    fn test_invocation_error_is_reported() {
        let adapter = InferenceAdapter::attach(
            Arc::new(AlwaysFails {
                input_width: 50,
                output_width: 10,
            }),
            &reference(),
        );
        assert!(matches!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::Invocation(_))
        ));
    }

    #[test]
    fn test_panic_is_contained() {
        let adapter = InferenceAdapter::attach(
            Arc::new(Panics {
                input_width: 50,
                output_width: 10,
            }),
            &reference(),
        );
        match adapter.infer(&FeatureVector::zeros(50)) {
            Err(BackendError::Panicked(msg)) => assert!(msg.contains("tensor allocation")),
            other => panic!("expected Panicked, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_output_length_rejected() {
        let adapter = InferenceAdapter::attach(
            Arc::new(LiesAboutShape {
                input_width: 50,
                output_width: 10,
            }),
            &reference(),
        );
        assert_eq!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::OutputShape {
                expected: 10,
                actual: 11
            })
        );
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        let mut scores = vec![0.1; 10];
        scores[3] = f32::NAN;
        let adapter =
            InferenceAdapter::attach(Arc::new(FixedScores { input_width: 50, scores }), &reference());
        assert_eq!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::NonFinite)
        );
    }

    #[test]
    fn test_scores_outside_unit_interval_rejected() {
        let mut scores = vec![0.1; 10];
        scores[1] = 3.5;
        let adapter =
            InferenceAdapter::attach(Arc::new(FixedScores { input_width: 50, scores }), &reference());
        assert_eq!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::OutOfRange {
                index: 1,
                score: 3.5
            })
        );

        let mut scores = vec![0.1; 10];
        scores[7] = -0.2;
        let adapter =
            InferenceAdapter::attach(Arc::new(FixedScores { input_width: 50, scores }), &reference());
        assert!(matches!(
            adapter.infer(&FeatureVector::zeros(50)),
            Err(BackendError::OutOfRange { index: 7, .. })
        ));
    }
}
