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

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    /// Symptom names in feature-index order
    pub symptoms: Vec<String>,
    /// Condition labels in output-class order
    pub conditions: Vec<String>,
}

/// GET /api/vocabulary - Symptoms and conditions the engine understands
pub async fn get_vocabulary(State(state): State<AppState>) -> Json<VocabularyResponse> {
    let vocabulary = state.engine.vocabulary();
    Json(VocabularyResponse {
        symptoms: vocabulary.symptoms.names().to_vec(),
        conditions: vocabulary.conditions.labels().to_vec(),
    })
}
