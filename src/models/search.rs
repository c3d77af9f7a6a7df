use serde::{Deserialize, Serialize};

use crate::models::place::Coordinate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Event date plus start/end times, passed through to prompts as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeWindow {
    pub date: String,
    pub start: String,
    pub end: String,
}

/// The immutable input bundle for one planning request.
///
/// Passed by reference through the whole pipeline and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin: Coordinate,
    #[serde(rename = "radiusMeters")]
    pub radius_meters: f64,
    pub description: String,
    #[serde(rename = "ageRange")]
    pub age_range: AgeRange,
    #[serde(rename = "budgetPerPerson", skip_serializing_if = "Option::is_none")]
    pub budget_per_person: Option<f64>,
    #[serde(rename = "timeWindow")]
    pub time_window: TimeWindow,
    #[serde(rename = "durationHours")]
    pub duration_hours: f64,
    #[serde(rename = "partySize")]
    pub party_size: u32,
}

impl PlanRequest {
    /// True when the party may include guests under the legal drinking age.
    pub fn includes_minors(&self) -> bool {
        self.age_range.min < 21
    }
}
