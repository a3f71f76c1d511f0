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

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use telecare_core::{DiagnosisResult, SymptomObservation};
use tracing::debug;

use crate::api::{ApiError, AppState};

/// Body of `POST /api/diagnose`
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Reported symptoms: bare names or `{"id", "severity"}` objects
    #[serde(default)]
    pub symptoms: Option<Vec<SymptomObservation>>,
}

/// POST /api/diagnose - Rank likely conditions for a list of symptoms
pub async fn diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Json<Vec<DiagnosisResult>>, ApiError> {
    let Json(request) = payload?;
    let symptoms = request.symptoms.unwrap_or_default();

    debug!("Diagnose request with {} symptoms", symptoms.len());

    let results = state.engine.diagnose(&symptoms)?;
    Ok(Json(results))
}
