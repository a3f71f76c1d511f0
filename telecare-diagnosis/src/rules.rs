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

//! Rule-based fallback diagnosis
//!
//! Used when no trained backend is attached or a backend call fails. Rules are
//! evaluated in order against the case-insensitive set of reported symptom names and
//! the first match wins. Each rule carries its own recommendations.

use std::collections::HashSet;
use telecare_core::{DiagnosisResult, DiagnosisSource, SeverityTier, SymptomObservation};
use tracing::debug;

/// One entry of the fallback cascade.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    /// All of these symptoms must be reported
    pub requires: &'static [&'static str],
    /// None of these symptoms may be reported
    pub excludes: &'static [&'static str],
    pub diagnosis: &'static str,
    pub confidence: f32,
    pub severity: SeverityTier,
    pub recommendations: &'static [&'static str],
}

impl FallbackRule {
    fn matches(&self, reported: &HashSet<String>) -> bool {
        self.requires.iter().all(|s| reported.contains(*s))
            && !self.excludes.iter().any(|s| reported.contains(*s))
    }

    fn to_result(self) -> DiagnosisResult {
        DiagnosisResult::new(
            self.diagnosis,
            self.confidence,
            self.severity,
            self.recommendations.iter().map(|s| s.to_string()).collect(),
            DiagnosisSource::Rules,
        )
    }
}

pub const FALLBACK_RULES: [FallbackRule; 3] = [
    FallbackRule {
        requires: &["fever", "cough", "shortness of breath"],
        excludes: &[],
        diagnosis: "Possible Pneumonia",
        confidence: 0.75,
        severity: SeverityTier::High,
        recommendations: &["Seek medical attention", "Rest", "Stay hydrated"],
    },
    FallbackRule {
        requires: &["fever", "cough"],
        excludes: &["shortness of breath"],
        diagnosis: "Common Cold or Influenza",
        confidence: 0.85,
        severity: SeverityTier::Medium,
        recommendations: &["Rest", "Fluids", "Over-the-counter medication"],
    },
    FallbackRule {
        requires: &["headache", "nausea"],
        excludes: &[],
        diagnosis: "Possible Migraine",
        confidence: 0.70,
        severity: SeverityTier::Medium,
        recommendations: &["Rest in dark room", "Stay hydrated", "Pain relievers"],
    },
];

/// Result when no rule matches.
pub const UNSPECIFIED: FallbackRule = FallbackRule {
    requires: &[],
    excludes: &[],
    diagnosis: "Unspecified Condition",
    confidence: 0.50,
    severity: SeverityTier::Low,
    recommendations: &[
        "Monitor symptoms",
        "Consult with healthcare provider if symptoms persist",
    ],
};

/// Diagnose from the rule cascade. Always returns exactly one result, including for
/// an empty observation list.
pub fn fallback_diagnose(observations: &[SymptomObservation]) -> Vec<DiagnosisResult> {
    let reported: HashSet<String> = observations
        .iter()
        .map(SymptomObservation::normalized_name)
        .collect();

    let rule = FALLBACK_RULES
        .iter()
        .find(|rule| rule.matches(&reported))
        .copied()
        .unwrap_or(UNSPECIFIED);

    debug!("Fallback rule matched: {}", rule.diagnosis);
    vec![rule.to_result()]
}
