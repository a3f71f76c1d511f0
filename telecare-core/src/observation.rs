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

//! Symptom observations as reported by callers.
//!
//! Two input shapes are accepted on the wire:
//!
//! ```json
//! ["fever", "cough"]
//! [{"id": "fever", "severity": "severe"}, {"name": "cough", "severity": "mild"}]
//! ```
//!
//! Both shapes may be mixed within one list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intensity used when a severity label is missing or not recognised.
pub const DEFAULT_INTENSITY: f32 = 0.6;

/// Normalise a symptom name for vocabulary lookups and rule matching.
pub fn normalize_symptom(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Patient-reported intensity of a single symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLabel {
    Mild,
    Moderate,
    Severe,
}

impl SeverityLabel {
    /// Numeric intensity written into the feature vector by the severity-weighted encoder.
    pub fn intensity(self) -> f32 {
        match self {
            SeverityLabel::Mild => 0.3,
            SeverityLabel::Moderate => 0.6,
            SeverityLabel::Severe => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLabel::Mild => "mild",
            SeverityLabel::Moderate => "moderate",
            SeverityLabel::Severe => "severe",
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(SeverityLabel::Mild),
            "moderate" => Ok(SeverityLabel::Moderate),
            "severe" => Ok(SeverityLabel::Severe),
            other => Err(format!("unknown severity label: {}", other)),
        }
    }
}

/// A symptom reported together with an optional severity label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatedSymptom")]
pub struct RatedSymptom {
    pub id: String,
    /// Label as sent by the caller; unrecognised labels are kept so they can be logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Deserialize)]
struct RawRatedSymptom {
    id: Option<String>,
    name: Option<String>,
    severity: Option<String>,
}

impl TryFrom<RawRatedSymptom> for RatedSymptom {
    type Error = String;

    fn try_from(raw: RawRatedSymptom) -> Result<Self, Self::Error> {
        // `name` wins over `id`: clients that send both use `id` as a row key.
        let id = raw
            .name
            .or(raw.id)
            .ok_or_else(|| "symptom object needs an `id` or `name`".to_string())?;
        Ok(RatedSymptom {
            id,
            severity: raw.severity,
        })
    }
}

/// One entry of the caller's symptom list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymptomObservation {
    /// Bare symptom name.
    Name(String),
    /// Symptom with a severity label.
    Rated(RatedSymptom),
}

impl SymptomObservation {
    pub fn named(name: impl Into<String>) -> Self {
        SymptomObservation::Name(name.into())
    }

    pub fn rated(name: impl Into<String>, severity: SeverityLabel) -> Self {
        SymptomObservation::Rated(RatedSymptom {
            id: name.into(),
            severity: Some(severity.as_str().to_string()),
        })
    }

    /// Symptom name exactly as supplied.
    pub fn name(&self) -> &str {
        match self {
            SymptomObservation::Name(name) => name,
            SymptomObservation::Rated(rated) => &rated.id,
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_symptom(self.name())
    }

    /// Parsed severity label, if one was supplied and recognised.
    pub fn severity_label(&self) -> Option<SeverityLabel> {
        match self {
            SymptomObservation::Name(_) => None,
            SymptomObservation::Rated(rated) => rated.severity.as_deref()?.parse().ok(),
        }
    }

    /// Intensity in `[0, 1]`, falling back to [`DEFAULT_INTENSITY`].
    pub fn intensity(&self) -> f32 {
        self.severity_label()
            .map(SeverityLabel::intensity)
            .unwrap_or(DEFAULT_INTENSITY)
    }
}

impl From<&str> for SymptomObservation {
    fn from(name: &str) -> Self {
        SymptomObservation::named(name)
    }
}

impl From<String> for SymptomObservation {
    fn from(name: String) -> Self {
        SymptomObservation::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_shapes() {
        let json = r#"["Fever", {"id": "cough", "severity": "mild"}, {"name": "Headache"}]"#;
        let observations: Vec<SymptomObservation> = serde_json::from_str(json).unwrap();

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0], SymptomObservation::named("Fever"));
        assert_eq!(observations[1].name(), "cough");
        assert_eq!(observations[1].severity_label(), Some(SeverityLabel::Mild));
        assert_eq!(observations[2].name(), "Headache");
        assert_eq!(observations[2].severity_label(), None);
    }

    #[test]
    fn test_name_preferred_over_id() {
        let json = r#"{"id": "3", "name": "Headache", "severity": "moderate"}"#;
        let observation: SymptomObservation = serde_json::from_str(json).unwrap();
        assert_eq!(observation.name(), "Headache");
    }

    #[test]
    fn test_object_without_name_rejected() {
        let result: Result<SymptomObservation, _> =
            serde_json::from_str(r#"{"severity": "mild"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_intensity_mapping() {
        assert_eq!(SymptomObservation::rated("fever", SeverityLabel::Mild).intensity(), 0.3);
        assert_eq!(
            SymptomObservation::rated("fever", SeverityLabel::Moderate).intensity(),
            0.6
        );
        assert_eq!(
            SymptomObservation::rated("fever", SeverityLabel::Severe).intensity(),
            1.0
        );
    }

    #[test]
    fn test_unknown_or_missing_label_defaults() {
        let unknown: SymptomObservation =
            serde_json::from_str(r#"{"id": "fever", "severity": "excruciating"}"#).unwrap();
        assert_eq!(unknown.severity_label(), None);
        assert_eq!(unknown.intensity(), DEFAULT_INTENSITY);

        assert_eq!(SymptomObservation::named("fever").intensity(), DEFAULT_INTENSITY);
    }

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("SEVERE".parse::<SeverityLabel>(), Ok(SeverityLabel::Severe));
        assert_eq!(" Mild ".parse::<SeverityLabel>(), Ok(SeverityLabel::Mild));
        assert!("sharp".parse::<SeverityLabel>().is_err());
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(
            SymptomObservation::named("  Shortness of Breath ").normalized_name(),
            "shortness of breath"
        );
    }
}
