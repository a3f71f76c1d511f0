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

//! Care recommendations per condition.

/// Returned for any condition without its own entry.
pub const DEFAULT_RECOMMENDATIONS: [&str; 2] = [
    "Monitor symptoms",
    "Consult with healthcare provider if symptoms persist",
];

/// Recommendations keyed by exact condition label.
const TABLE: [(&str, &[&str]); 10] = [
    (
        "Common Cold",
        &["Rest", "Stay hydrated", "Take over-the-counter cold medicine"],
    ),
    (
        "Influenza",
        &[
            "Rest and stay home",
            "Drink plenty of fluids",
            "Take fever reducers as directed",
            "Consult a doctor if breathing becomes difficult",
        ],
    ),
    (
        "Hypertension",
        &[
            "Reduce salt intake",
            "Monitor blood pressure regularly",
            "Consult a doctor about medication",
        ],
    ),
    (
        "Type 2 Diabetes",
        &[
            "Monitor blood sugar levels",
            "Follow a balanced diet",
            "Exercise regularly",
            "Consult a doctor for a treatment plan",
        ],
    ),
    (
        "Migraine",
        &["Rest in dark room", "Stay hydrated", "Pain relievers"],
    ),
    (
        "Gastroenteritis",
        &[
            "Drink oral rehydration solution",
            "Eat bland foods",
            "Seek care if unable to keep fluids down",
        ],
    ),
    (
        "Urinary Tract Infection",
        &[
            "Drink plenty of water",
            "Consult a doctor for antibiotics",
            "Avoid caffeine and alcohol",
        ],
    ),
    (
        "Asthma",
        &[
            "Use prescribed inhaler",
            "Avoid known triggers",
            "Seek emergency care if breathing worsens",
        ],
    ),
    (
        "Allergic Rhinitis",
        &[
            "Avoid allergens",
            "Take antihistamines",
            "Use saline nasal rinse",
        ],
    ),
    (
        "Anxiety Disorder",
        &[
            "Practice relaxation techniques",
            "Maintain regular sleep",
            "Consult a mental health professional",
        ],
    ),
];

/// Ordered recommendations for `condition`, or the generic default.
pub fn recommendations(condition: &str) -> Vec<String> {
    let items: &[&str] = TABLE
        .iter()
        .find(|(label, _)| *label == condition)
        .map(|(_, items)| *items)
        .unwrap_or(&DEFAULT_RECOMMENDATIONS);

    items.iter().map(|s| s.to_string()).collect()
}
