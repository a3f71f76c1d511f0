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

//! Symptom and condition vocabularies.
//!
//! Both vocabularies are loaded once at startup from externally authored JSON:
//!
//! - symptom mapping: `{"fever": 0, "cough": 1, ...}`
//! - condition list: `["Common Cold", "Influenza", ...]`
//!
//! They are immutable afterwards. A missing or malformed source degrades to an empty
//! vocabulary instead of failing startup; see [`Vocabulary::load`].

use crate::error::{ConfigError, Result};
use crate::observation::normalize_symptom;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Symptom names used by the reference model, in feature-index order.
pub const REFERENCE_SYMPTOMS: [&str; 50] = [
    "fever",
    "cough",
    "headache",
    "fatigue",
    "sore throat",
    "runny nose",
    "body aches",
    "chills",
    "nausea",
    "vomiting",
    "diarrhea",
    "shortness of breath",
    "chest pain",
    "dizziness",
    "rash",
    "joint pain",
    "back pain",
    "abdominal pain",
    "loss of appetite",
    "weight loss",
    "increased thirst",
    "frequent urination",
    "blurred vision",
    "numbness",
    "tingling",
    "swelling",
    "itching",
    "sneezing",
    "wheezing",
    "congestion",
    "ear pain",
    "eye pain",
    "vision changes",
    "hearing changes",
    "difficulty swallowing",
    "hoarseness",
    "muscle weakness",
    "confusion",
    "memory problems",
    "anxiety",
    "depression",
    "insomnia",
    "excessive sweating",
    "dry mouth",
    "excessive hunger",
    "blood in stool",
    "blood in urine",
    "irregular heartbeat",
    "fainting",
    "seizures",
];

/// Condition labels of the reference model, in output-class order.
pub const REFERENCE_CONDITIONS: [&str; 10] = [
    "Common Cold",
    "Influenza",
    "Hypertension",
    "Type 2 Diabetes",
    "Migraine",
    "Gastroenteritis",
    "Urinary Tract Infection",
    "Asthma",
    "Allergic Rhinitis",
    "Anxiety Disorder",
];

/// Ordered set of known symptom names, each bound to a feature index in `[0, N)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomVocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from names in index order. Fails on blank or duplicate names.
    pub fn from_names<I, S>(names: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mapping = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref().to_string(), i))
            .collect::<Vec<_>>();
        Self::from_pairs(mapping)
    }

    /// Build from a name→index mapping.
    ///
    /// Names are trimmed and lower-cased. Indices must cover `0..N` exactly once.
    pub fn from_mapping(mapping: HashMap<String, usize>) -> std::result::Result<Self, String> {
        Self::from_pairs(mapping.into_iter().collect())
    }

    fn from_pairs(pairs: Vec<(String, usize)>) -> std::result::Result<Self, String> {
        let width = pairs.len();
        let mut slots: Vec<Option<String>> = vec![None; width];
        let mut index = HashMap::with_capacity(width);

        for (raw, i) in pairs {
            let name = normalize_symptom(&raw);
            if name.is_empty() {
                return Err("blank symptom name".to_string());
            }
            if i >= width {
                return Err(format!(
                    "index {} for {:?} outside 0..{}",
                    i, name, width
                ));
            }
            if let Some(existing) = &slots[i] {
                return Err(format!(
                    "index {} assigned to both {:?} and {:?}",
                    i, existing, name
                ));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("duplicate symptom name {:?}", name));
            }
            slots[i] = Some(name);
        }

        // Every slot is filled: `width` distinct in-range indices were written.
        let names = slots.into_iter().flatten().collect();
        Ok(Self { names, index })
    }

    /// Load a JSON name→index mapping. Strict: any problem is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read(path)?;
        let mapping: HashMap<String, usize> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_mapping(mapping).map_err(|reason| ConfigError::InvalidVocabulary {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Feature index of a symptom, matched case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(&normalize_symptom(name)).copied()
    }

    /// Symptom names in feature-index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Ordered sequence of condition labels, each bound to an output-class index in `[0, M)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionVocabulary {
    labels: Vec<String>,
}

impl ConditionVocabulary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, S>(labels: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if let Some(pos) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(format!("blank condition label at index {}", pos));
        }
        Ok(Self { labels })
    }

    /// Load a JSON array of labels. Strict: any problem is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read(path)?;
        let labels: Vec<String> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(labels).map_err(|reason| ConfigError::InvalidVocabulary {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The pair of vocabularies an engine is built from.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub symptoms: SymptomVocabulary,
    pub conditions: ConditionVocabulary,
    /// Problems found while loading, kept for health and verify reports.
    pub warnings: Vec<String>,
}

impl Vocabulary {
    pub fn new(symptoms: SymptomVocabulary, conditions: ConditionVocabulary) -> Self {
        Self {
            symptoms,
            conditions,
            warnings: Vec::new(),
        }
    }

    /// The vocabularies the reference model was trained with.
    pub fn reference() -> Self {
        Self::new(
            SymptomVocabulary::from_names(REFERENCE_SYMPTOMS)
                .unwrap_or_else(|_| SymptomVocabulary::empty()),
            ConditionVocabulary::new(REFERENCE_CONDITIONS)
                .unwrap_or_else(|_| ConditionVocabulary::empty()),
        )
    }

    /// Load both vocabularies, degrading each to empty on failure.
    ///
    /// Never fails: the rule-based path works with empty vocabularies.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(symptom_path: P, condition_path: Q) -> Self {
        let mut warnings = Vec::new();

        let symptoms = match SymptomVocabulary::load(symptom_path) {
            Ok(symptoms) => symptoms,
            Err(e) => {
                warn!("Symptom vocabulary unavailable, using empty mapping: {}", e);
                warnings.push(e.to_string());
                SymptomVocabulary::empty()
            }
        };

        let conditions = match ConditionVocabulary::load(condition_path) {
            Ok(conditions) => conditions,
            Err(e) => {
                warn!("Condition vocabulary unavailable, using empty list: {}", e);
                warnings.push(e.to_string());
                ConditionVocabulary::empty()
            }
        };

        info!(
            "Vocabularies loaded: {} symptoms, {} conditions",
            symptoms.len(),
            conditions.len()
        );

        Self {
            symptoms,
            conditions,
            warnings,
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
