use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::itinerary::{Itinerary, RouteOption};

/// Response for a single-plan request.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    pub itinerary: Itinerary,
    #[serde(rename = "placesFound")]
    pub places_found: usize,
    #[serde(rename = "usedFallback")]
    pub used_fallback: bool,
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

/// Response for a multi-route request.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub success: bool,
    pub routes: Vec<RouteOption>,
    #[serde(rename = "placesFound")]
    pub places_found: usize,
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

/// Structured failure body. `details` carries technical diagnostics and is
/// never a raw panic or backtrace dump.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: Some(details.into()),
        }
    }
}
