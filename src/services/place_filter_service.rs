use serde::Deserialize;
use std::collections::HashSet;

use crate::models::place::Place;
use crate::models::search::PlanRequest;
use crate::services::gemini_service::{extract_json_payload, GeminiService};

// Only a sample of the result set goes into the prompt; the returned id set
// filters the full list.
const MAX_PROMPT_PLACES: usize = 15;
const MAX_OUTPUT_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.2;

const SYSTEM_INSTRUCTION: &str = "You are an event-planning assistant. Answer with a JSON \
array of objects shaped like {\"id\": \"...\"} and nothing else.";

#[derive(Debug, Deserialize)]
struct SelectedId {
    id: String,
}

/// Asks the model to narrow a place list down to the venues that suit the
/// event. Non-fatal by design: any failure returns the input unchanged, since
/// an itinerary over an unfiltered list is still useful.
pub struct PlaceFilterService {
    gemini: Option<GeminiService>,
}

impl PlaceFilterService {
    pub fn new(gemini: Option<GeminiService>) -> Self {
        Self { gemini }
    }

    pub async fn filter_places(&self, places: &[Place], request: &PlanRequest) -> Vec<Place> {
        if places.is_empty() {
            return Vec::new();
        }

        let Some(gemini) = &self.gemini else {
            return places.to_vec();
        };

        let prompt = build_filter_prompt(places, request);
        match gemini
            .generate_text(&prompt, Some(SYSTEM_INSTRUCTION), MAX_OUTPUT_TOKENS, TEMPERATURE)
            .await
        {
            Ok(text) => apply_selection(places, &text),
            Err(e) => {
                eprintln!("Place filtering failed: {}. Keeping the full list.", e);
                places.to_vec()
            }
        }
    }
}

fn build_filter_prompt(places: &[Place], request: &PlanRequest) -> String {
    let sample = &places[..places.len().min(MAX_PROMPT_PLACES)];
    let place_lines: Vec<String> = sample
        .iter()
        .map(|place| {
            format!(
                "- id: {} | name: {} | category: {} | rating: {} | price level: {}",
                place.id,
                place.display_name,
                place.category.as_str(),
                place
                    .rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "unknown".to_string()),
                place
                    .price_level
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })
        .collect();

    let budget_line = match request.budget_per_person {
        Some(budget) => format!("Budget per person: up to ${:.0}", budget),
        None => "Budget per person: unspecified".to_string(),
    };

    format!(
        "Select between 3 and 8 venues from this list that best fit the event.\n\n\
         Event description: {}\n\
         Guest ages: {} to {}\n\
         {}\n\
         Duration: {} hours, party of {}\n\n\
         Venues:\n{}\n\n\
         Respond with a JSON array of objects shaped like {{\"id\": \"...\"}}.",
        request.description,
        request.age_range.min,
        request.age_range.max,
        budget_line,
        request.duration_hours,
        request.party_size,
        place_lines.join("\n"),
    )
}

/// Filter the FULL place list by the ids the model picked. A malformed
/// answer, or one selecting nothing that exists, keeps the full list.
fn apply_selection(places: &[Place], response_text: &str) -> Vec<Place> {
    let payload = extract_json_payload(response_text);
    let selected: Vec<SelectedId> = match serde_json::from_str(&payload) {
        Ok(selected) => selected,
        Err(e) => {
            eprintln!("Unparsable filter answer: {}. Keeping the full list.", e);
            return places.to_vec();
        }
    };

    let allowed: HashSet<String> = selected.into_iter().map(|s| s.id).collect();
    let filtered: Vec<Place> = places
        .iter()
        .filter(|place| allowed.contains(&place.id))
        .cloned()
        .collect();

    if filtered.is_empty() {
        eprintln!("Filter answer matched no known ids. Keeping the full list.");
        return places.to_vec();
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::{Coordinate, PlaceCategory};

    fn place(id: &str, name: &str) -> Place {
        Place {
            id: id.to_string(),
            display_name: name.to_string(),
            location: Coordinate { lat: 40.0, lng: -105.0 },
            category: PlaceCategory::Dining,
            rating: Some(4.0),
            user_rating_count: Some(50),
            price_level: Some(2),
            formatted_address: None,
            raw_types: Vec::new(),
        }
    }

    fn fifteen_places() -> Vec<Place> {
        (0..15)
            .map(|i| place(&format!("id{}", i), &format!("Venue {}", i)))
            .collect()
    }

    #[test]
    fn malformed_answer_returns_the_original_list() {
        let places = fifteen_places();
        let filtered = apply_selection(&places, "not json");
        assert_eq!(filtered.len(), places.len());
    }

    #[test]
    fn filters_the_full_list_by_selected_ids() {
        let places = fifteen_places();
        let filtered =
            apply_selection(&places, r#"[{"id": "id1"}, {"id": "id7"}, {"id": "id12"}]"#);
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["id1", "id7", "id12"]);
    }

    #[test]
    fn unknown_ids_only_keeps_the_full_list() {
        let places = fifteen_places();
        let filtered = apply_selection(&places, r#"[{"id": "nope"}]"#);
        assert_eq!(filtered.len(), places.len());
    }

    #[test]
    fn prompt_samples_at_most_fifteen_places() {
        let places: Vec<Place> = (0..30)
            .map(|i| place(&format!("id{}", i), &format!("Venue {}", i)))
            .collect();
        let req = PlanRequest {
            origin: Coordinate { lat: 40.0, lng: -105.0 },
            radius_meters: 2000.0,
            description: "team outing".to_string(),
            age_range: crate::models::search::AgeRange { min: 22, max: 45 },
            budget_per_person: None,
            time_window: crate::models::search::TimeWindow {
                date: "2026-10-01".to_string(),
                start: "12:00".to_string(),
                end: "17:00".to_string(),
            },
            duration_hours: 5.0,
            party_size: 10,
        };
        let prompt = build_filter_prompt(&places, &req);
        assert!(prompt.contains("id14"));
        assert!(!prompt.contains("id15 "));
        assert!(!prompt.contains("id: id20"));
    }

    #[actix_web::test]
    async fn missing_provider_passes_places_through() {
        let places = fifteen_places();
        let req = PlanRequest {
            origin: Coordinate { lat: 40.0, lng: -105.0 },
            radius_meters: 2000.0,
            description: "team outing".to_string(),
            age_range: crate::models::search::AgeRange { min: 22, max: 45 },
            budget_per_person: None,
            time_window: crate::models::search::TimeWindow {
                date: "2026-10-01".to_string(),
                start: "12:00".to_string(),
                end: "17:00".to_string(),
            },
            duration_hours: 5.0,
            party_size: 10,
        };
        let service = PlaceFilterService::new(None);
        let filtered = service.filter_places(&places, &req).await;
        assert_eq!(filtered.len(), places.len());
    }
}
