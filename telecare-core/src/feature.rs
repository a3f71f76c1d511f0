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

//! Fixed-width numeric encoding of reported symptoms.

use serde::{Deserialize, Serialize};

/// Index `i` holds the presence or intensity of symptom `i` of the symptom vocabulary.
///
/// The width is fixed at construction and always equals the vocabulary size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0.0; width],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Record `value` at `index`, keeping the larger value when the slot is already set.
    ///
    /// Out-of-range indices are ignored; the width never changes.
    pub fn set_max(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.values.get_mut(index) {
            if value > *slot {
                *slot = value;
            }
        }
    }

    /// Number of non-zero entries.
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_set_max_keeps_width() {
        let mut vector = FeatureVector::zeros(3);
        vector.set_max(1, 0.3);
        vector.set_max(1, 1.0);
        vector.set_max(1, 0.6);
        vector.set_max(7, 1.0);

        assert_eq!(vector.len(), 3);
        assert_eq!(vector.as_slice(), &[0.0, 1.0, 0.0]);
        assert_eq!(vector.active_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_width_never_changes(
            width in 0usize..64,
            writes in proptest::collection::vec((0usize..128, 0.0f32..=1.0), 0..32),
        ) {
            let mut vector = FeatureVector::zeros(width);
            for (index, value) in writes {
                vector.set_max(index, value);
            }
            prop_assert_eq!(vector.len(), width);
            prop_assert!(vector.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
