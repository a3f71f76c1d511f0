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

//! Severity tier assignment.
//!
//! Ordered rules, first match wins:
//!
//! 1. any high-risk symptom reported -> HIGH
//! 2. condition label contains a high-severity condition -> HIGH
//! 3. condition label contains a medium-severity condition -> MEDIUM
//! 4. otherwise LOW
//!
//! Condition matching is substring containment, so "Possible Pneumonia" and
//! "Asthma Attack" still match.

use telecare_core::{SeverityTier, SymptomObservation};

/// Symptoms that force a HIGH tier regardless of the condition (lower-case).
pub const HIGH_RISK_SYMPTOMS: [&str; 4] =
    ["shortness of breath", "chest pain", "confusion", "severe pain"];

pub const HIGH_SEVERITY_CONDITIONS: [&str; 2] = ["Pneumonia", "Asthma"];

pub const MEDIUM_SEVERITY_CONDITIONS: [&str; 3] = ["Influenza", "Hypertension", "Type 2 Diabetes"];

pub fn has_high_risk_symptom(observations: &[SymptomObservation]) -> bool {
    observations
        .iter()
        .any(|o| HIGH_RISK_SYMPTOMS.contains(&o.normalized_name().as_str()))
}

/// Classify a diagnosed condition. Pure and deterministic.
pub fn classify(condition: &str, observations: &[SymptomObservation]) -> SeverityTier {
    if has_high_risk_symptom(observations) {
        SeverityTier::High
    } else if HIGH_SEVERITY_CONDITIONS.iter().any(|c| condition.contains(c)) {
        SeverityTier::High
    } else if MEDIUM_SEVERITY_CONDITIONS.iter().any(|c| condition.contains(c)) {
        SeverityTier::Medium
    } else {
        SeverityTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn named(names: &[&str]) -> Vec<SymptomObservation> {
        names.iter().map(|n| SymptomObservation::named(*n)).collect()
    }

    #[test]
    fn test_high_risk_symptom_overrides_condition() {
        assert_eq!(
            classify("Common Cold", &named(&["Chest Pain"])),
            SeverityTier::High
        );
        assert_eq!(
            classify("Pneumonia", &named(&["shortness of breath", "fever"])),
            SeverityTier::High
        );
    }

    #[test]
    fn test_condition_tiers() {
        assert_eq!(classify("Asthma", &named(&["wheezing"])), SeverityTier::High);
        assert_eq!(
            classify("Influenza", &named(&["fever", "cough"])),
            SeverityTier::Medium
        );
        assert_eq!(
            classify("Type 2 Diabetes", &named(&["increased thirst"])),
            SeverityTier::Medium
        );
        assert_eq!(
            classify("Common Cold", &named(&["runny nose"])),
            SeverityTier::Low
        );
    }

    #[test]
    fn test_condition_matching_is_containment() {
        assert_eq!(classify("Asthma Attack", &[]), SeverityTier::High);
        assert_eq!(classify("Possible Pneumonia", &[]), SeverityTier::High);
        assert_eq!(
            classify("Common Cold or Influenza", &[]),
            SeverityTier::Medium
        );
    }

    fn observation_strategy() -> impl Strategy<Value = SymptomObservation> {
        let mut pool: Vec<&str> = HIGH_RISK_SYMPTOMS.to_vec();
        pool.extend(["fever", "cough", "headache", "Chest Pain", "dizziness"]);
        (proptest::sample::select(pool), "[a-z ]{0,12}").prop_map(|(known, random)| {
            if random.len() % 2 == 0 {
                SymptomObservation::named(known)
            } else {
                SymptomObservation::named(random)
            }
        })
    }

    fn condition_strategy() -> impl Strategy<Value = String> {
        let labels = vec![
            "Pneumonia",
            "Asthma Attack",
            "Influenza",
            "Type 2 Diabetes",
            "Common Cold",
            "Migraine",
        ];
        prop_oneof![
            proptest::sample::select(labels).prop_map(String::from),
            "[A-Za-z0-9 ]{0,24}",
        ]
    }

    proptest! {
        #[test]
        fn prop_classification_is_pure(
            condition in condition_strategy(),
            observations in proptest::collection::vec(observation_strategy(), 0..8),
        ) {
            let first = classify(&condition, &observations);
            prop_assert_eq!(classify(&condition, &observations), first);

            let reversed: Vec<_> = observations.iter().rev().cloned().collect();
            prop_assert_eq!(classify(&condition, &reversed), first);
        }

        #[test]
        fn prop_high_risk_symptom_always_high(
            condition in condition_strategy(),
            mut observations in proptest::collection::vec(observation_strategy(), 0..8),
            risk in proptest::sample::select(HIGH_RISK_SYMPTOMS.to_vec()),
        ) {
            observations.push(SymptomObservation::named(risk.to_uppercase()));
            prop_assert_eq!(classify(&condition, &observations), SeverityTier::High);
        }
    }
}
