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

//! Telecare Core
//!
//! Data model shared by the diagnosis engine and its front ends: symptom observations,
//! feature vectors, vocabularies, diagnosis results and the error taxonomy.

pub mod diagnosis;
pub mod error;
pub mod feature;
pub mod observation;
pub mod vocabulary;

pub use diagnosis::{
    DiagnosisResult, DiagnosisSource, ReferralUrgency, RequiredActions, SeverityTier,
    SpecialistReferral,
};
pub use error::{ConfigError, DiagnosisError, Result};
pub use feature::FeatureVector;
pub use observation::{
    normalize_symptom, RatedSymptom, SeverityLabel, SymptomObservation, DEFAULT_INTENSITY,
};
pub use vocabulary::{
    ConditionVocabulary, SymptomVocabulary, Vocabulary, REFERENCE_CONDITIONS, REFERENCE_SYMPTOMS,
};
