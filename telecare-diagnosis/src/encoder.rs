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

//! Feature encoding of symptom observations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use telecare_core::{FeatureVector, SymptomObservation, SymptomVocabulary};
use tracing::debug;

/// How an observation is written into its feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderMode {
    /// 1.0 for every reported symptom.
    #[default]
    Presence,
    /// Intensity of the severity label (0.3 / 0.6 / 1.0, 0.6 when missing).
    SeverityWeighted,
}

impl EncoderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EncoderMode::Presence => "presence",
            EncoderMode::SeverityWeighted => "severity_weighted",
        }
    }
}

impl fmt::Display for EncoderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "presence" => Ok(EncoderMode::Presence),
            "severity_weighted" | "severity" => Ok(EncoderMode::SeverityWeighted),
            other => Err(format!("unknown encoder mode: {}", other)),
        }
    }
}

/// Encodes observations against a symptom vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    mode: EncoderMode,
}

impl FeatureEncoder {
    pub fn new(mode: EncoderMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EncoderMode {
        self.mode
    }

    /// Encode into a vector of width `vocabulary.len()`.
    ///
    /// Unknown symptoms are skipped. A symptom reported more than once keeps its
    /// highest value, so the result does not depend on observation order.
    pub fn encode(
        &self,
        vocabulary: &SymptomVocabulary,
        observations: &[SymptomObservation],
    ) -> FeatureVector {
        let mut vector = FeatureVector::zeros(vocabulary.len());

        for observation in observations {
            match vocabulary.index_of(observation.name()) {
                Some(index) => {
                    let value = match self.mode {
                        EncoderMode::Presence => 1.0,
                        EncoderMode::SeverityWeighted => observation.intensity(),
                    };
                    vector.set_max(index, value);
                }
                None => debug!("Skipping unknown symptom: {:?}", observation.name()),
            }
        }

        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use telecare_core::{SeverityLabel, Vocabulary};

    fn vocabulary() -> SymptomVocabulary {
        Vocabulary::reference().symptoms
    }

    #[test]
    fn test_presence_encoding() {
        let encoder = FeatureEncoder::new(EncoderMode::Presence);
        let observations = vec![
            SymptomObservation::named("Fever"),
            SymptomObservation::rated("cough", SeverityLabel::Mild),
            SymptomObservation::named("headache"),
        ];
        let vector = encoder.encode(&vocabulary(), &observations);

        assert_eq!(vector.len(), 50);
        assert_eq!(vector.get(0), Some(1.0));
        assert_eq!(vector.get(1), Some(1.0));
        assert_eq!(vector.get(2), Some(1.0));
        assert_eq!(vector.as_slice().iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn test_severity_weighted_encoding() {
        let encoder = FeatureEncoder::new(EncoderMode::SeverityWeighted);
        let observations = vec![
            SymptomObservation::rated("fever", SeverityLabel::Severe),
            SymptomObservation::rated("cough", SeverityLabel::Mild),
            SymptomObservation::named("headache"),
        ];
        let vector = encoder.encode(&vocabulary(), &observations);

        assert_eq!(vector.get(0), Some(1.0));
        assert_eq!(vector.get(1), Some(0.3));
        assert_eq!(vector.get(2), Some(0.6));
    }

    #[test]
    fn test_unknown_symptoms_ignored() {
        let encoder = FeatureEncoder::default();
        let observations = vec![
            SymptomObservation::named("unknown_symptom1"),
            SymptomObservation::named("unknown_symptom2"),
        ];
        let vector = encoder.encode(&vocabulary(), &observations);

        assert_eq!(vector.len(), 50);
        assert_eq!(vector.active_count(), 0);
    }

    #[test]
    fn test_empty_vocabulary_yields_empty_vector() {
        let encoder = FeatureEncoder::default();
        let vector = encoder.encode(
            &SymptomVocabulary::empty(),
            &[SymptomObservation::named("fever")],
        );
        assert!(vector.is_empty());
    }

    #[test]
    fn test_repeated_symptom_keeps_highest_intensity() {
        let encoder = FeatureEncoder::new(EncoderMode::SeverityWeighted);
        let forward = vec![
            SymptomObservation::rated("fever", SeverityLabel::Severe),
            SymptomObservation::rated("fever", SeverityLabel::Mild),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        assert_eq!(
            encoder.encode(&vocabulary(), &forward),
            encoder.encode(&vocabulary(), &reversed)
        );
        assert_eq!(encoder.encode(&vocabulary(), &forward).get(0), Some(1.0));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("presence".parse::<EncoderMode>(), Ok(EncoderMode::Presence));
        assert_eq!(
            "Severity-Weighted".parse::<EncoderMode>(),
            Ok(EncoderMode::SeverityWeighted)
        );
        assert!("onehot".parse::<EncoderMode>().is_err());
    }

    fn observation_strategy() -> impl Strategy<Value = SymptomObservation> {
        let known = proptest::sample::select(telecare_core::REFERENCE_SYMPTOMS.to_vec());
        let label = proptest::option::of(prop_oneof![
            Just("mild".to_string()),
            Just("moderate".to_string()),
            Just("severe".to_string()),
            "[a-z]{1,8}",
        ]);
        prop_oneof![
            known.prop_map(|name| SymptomObservation::named(name)),
            "[a-zA-Z ]{0,24}".prop_map(|name| SymptomObservation::named(name)),
            (known_names(), label).prop_map(|(name, severity)| {
                SymptomObservation::Rated(telecare_core::RatedSymptom {
                    id: name,
                    severity,
                })
            }),
        ]
    }

    fn known_names() -> impl Strategy<Value = String> {
        proptest::sample::select(telecare_core::REFERENCE_SYMPTOMS.to_vec())
            .prop_map(|name| name.to_uppercase())
    }

    fn mode_strategy() -> impl Strategy<Value = EncoderMode> {
        prop_oneof![
            Just(EncoderMode::Presence),
            Just(EncoderMode::SeverityWeighted)
        ]
    }

    proptest! {
        #[test]
        fn prop_width_is_vocabulary_size(
            mode in mode_strategy(),
            observations in proptest::collection::vec(observation_strategy(), 0..200),
        ) {
            let vocab = vocabulary();
            let vector = FeatureEncoder::new(mode).encode(&vocab, &observations);
            prop_assert_eq!(vector.len(), vocab.len());
        }

        #[test]
        fn prop_encoding_is_idempotent(
            mode in mode_strategy(),
            observations in proptest::collection::vec(observation_strategy(), 0..50),
        ) {
            let vocab = vocabulary();
            let encoder = FeatureEncoder::new(mode);
            prop_assert_eq!(
                encoder.encode(&vocab, &observations),
                encoder.encode(&vocab, &observations)
            );
        }

        #[test]
        fn prop_values_in_unit_interval(
            mode in mode_strategy(),
            observations in proptest::collection::vec(observation_strategy(), 0..50),
        ) {
            let vector = FeatureEncoder::new(mode).encode(&vocabulary(), &observations);
            prop_assert!(vector.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
