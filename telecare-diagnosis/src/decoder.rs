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

//! Decoding of raw class scores into ranked conditions.

use telecare_core::{ConditionVocabulary, DiagnosisError};

/// A condition selected from the classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCondition {
    pub index: usize,
    pub label: String,
    /// Raw score, passed through unclamped
    pub score: f32,
}

/// Indices of the `k` highest scores, highest first. Equal scores keep index order.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    indices.truncate(k);
    indices
}

/// Map the top `k` scores to condition labels.
///
/// An index without a label means the backend and vocabulary disagree on the class
/// count; that is reported as [`DiagnosisError::VocabularyMismatch`].
pub fn decode(
    scores: &[f32],
    top_k: usize,
    conditions: &ConditionVocabulary,
) -> Result<Vec<RankedCondition>, DiagnosisError> {
    top_k_indices(scores, top_k)
        .into_iter()
        .map(|index| -> Result<RankedCondition, DiagnosisError> {
            let label = conditions
                .label(index)
                .ok_or(DiagnosisError::VocabularyMismatch {
                    index,
                    len: conditions.len(),
                })?;
            Ok(RankedCondition {
                index,
                label: label.to_string(),
                score: scores[index],
            })
        })
        .collect()
}
