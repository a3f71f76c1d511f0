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

//! Diagnosis results returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse urgency classification attached to every diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
        }
    }

    /// Immediate and follow-up actions for this tier.
    pub fn required_actions(self) -> RequiredActions {
        let (immediate, follow_up): (&[&str], &[&str]) = match self {
            SeverityTier::Low => (&["Rest", "Stay hydrated"], &["Monitor symptoms"]),
            SeverityTier::Medium => (
                &["Rest", "Stay hydrated", "Take prescribed medication"],
                &["Schedule follow-up in 48 hours"],
            ),
            SeverityTier::High => (
                &["Seek immediate medical attention", "Take prescribed medication"],
                &["Urgent medical review required"],
            ),
        };

        RequiredActions {
            immediate: immediate.iter().map(|s| s.to_string()).collect(),
            follow_up: follow_up.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn specialist_referral(self) -> SpecialistReferral {
        match self {
            SeverityTier::High => SpecialistReferral {
                required: true,
                urgency: ReferralUrgency::Emergency,
            },
            SeverityTier::Low | SeverityTier::Medium => SpecialistReferral {
                required: false,
                urgency: ReferralUrgency::Routine,
            },
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisSource {
    /// Trained classifier output.
    Model,
    /// Rule-based fallback.
    Rules,
}

impl DiagnosisSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosisSource::Model => "model",
            DiagnosisSource::Rules => "rules",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredActions {
    pub immediate: Vec<String>,
    pub follow_up: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralUrgency {
    Routine,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistReferral {
    pub required: bool,
    pub urgency: ReferralUrgency,
}

/// A single ranked diagnosis.
///
/// Produced fresh for each request and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Condition label
    pub diagnosis: String,

    /// Confidence score in `[0, 1]`
    pub confidence: f32,

    pub severity: SeverityTier,

    pub recommendations: Vec<String>,

    pub required_actions: RequiredActions,

    pub specialist_referral: SpecialistReferral,

    pub source: DiagnosisSource,
}

impl DiagnosisResult {
    /// Build a result, deriving the tier-dependent fields from `severity`.
    pub fn new(
        diagnosis: impl Into<String>,
        confidence: f32,
        severity: SeverityTier,
        recommendations: Vec<String>,
        source: DiagnosisSource,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            confidence,
            severity,
            recommendations,
            required_actions: severity.required_actions(),
            specialist_referral: severity.specialist_referral(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SeverityTier::High).unwrap(), "\"HIGH\"");
        let tier: SeverityTier = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(tier, SeverityTier::Medium);
    }

    #[test]
    fn test_referral_follows_tier() {
        assert!(SeverityTier::High.specialist_referral().required);
        assert_eq!(
            SeverityTier::High.specialist_referral().urgency,
            ReferralUrgency::Emergency
        );
        assert!(!SeverityTier::Medium.specialist_referral().required);
        assert!(!SeverityTier::Low.specialist_referral().required);
    }

    #[test]
    fn test_result_json_shape() {
        let result = DiagnosisResult::new(
            "Possible Migraine",
            0.7,
            SeverityTier::Medium,
            vec!["Rest in dark room".to_string()],
            DiagnosisSource::Rules,
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["diagnosis"], "Possible Migraine");
        assert_eq!(json["severity"], "MEDIUM");
        assert_eq!(json["source"], "rules");
        assert_eq!(json["recommendations"][0], "Rest in dark room");
        assert_eq!(
            json["required_actions"]["follow_up"][0],
            "Schedule follow-up in 48 hours"
        );
        assert_eq!(json["specialist_referral"]["urgency"], "routine");
    }
}
