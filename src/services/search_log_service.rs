use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use std::path::Path;

use crate::models::place::Place;
use crate::models::search::PlanRequest;

#[derive(Debug, Serialize)]
struct SearchLogEntry {
    #[serde(rename = "loggedAt")]
    logged_at: DateTime<Utc>,
    constraints: PlanRequest,
    places: Vec<Place>,
}

/// Write one JSON document per search request, named by timestamp, into
/// `SEARCH_LOG_DIR`. Fire-and-forget: every failure is logged and swallowed,
/// and nothing in the pipeline reads these files back.
pub async fn log_search_results(request: PlanRequest, places: Vec<Place>) {
    let Ok(dir) = env::var("SEARCH_LOG_DIR") else {
        return;
    };

    let logged_at = Utc::now();
    let file_name = format!("search-{}.json", logged_at.format("%Y%m%dT%H%M%S%3f"));
    let path = Path::new(&dir).join(file_name);

    let entry = SearchLogEntry {
        logged_at,
        constraints: request,
        places,
    };

    match serde_json::to_vec_pretty(&entry) {
        Ok(bytes) => {
            if let Err(e) = tokio::fs::write(&path, bytes).await {
                eprintln!("Failed to write search log {}: {}", path.display(), e);
            }
        }
        Err(e) => eprintln!("Failed to serialize search log entry: {}", e),
    }
}
