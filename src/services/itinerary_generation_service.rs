use std::cmp::Ordering;

use crate::models::place::{Place, PlaceCategory};
use crate::models::search::PlanRequest;
use crate::services::gemini_service::GeminiService;

const MAX_OUTPUT_TOKENS: u32 = 1024;
const SINGLE_ROUTE_TEMPERATURE: f32 = 0.7;
// Slightly higher when producing one of several alternatives, to spread the
// outputs across routes.
const ALTERNATIVE_ROUTE_TEMPERATURE: f32 = 0.9;

const SYSTEM_INSTRUCTION: &str = "You are an event-planning assistant. Write plans in plain \
text without any markdown punctuation.";

/// Which kind of itinerary is being generated; controls sampling temperature.
#[derive(Debug, Clone, Copy)]
pub enum ItineraryVariant {
    Single,
    Alternative(usize),
}

impl ItineraryVariant {
    fn temperature(&self) -> f32 {
        match self {
            ItineraryVariant::Single => SINGLE_ROUTE_TEMPERATURE,
            ItineraryVariant::Alternative(_) => ALTERNATIVE_ROUTE_TEMPERATURE,
        }
    }
}

/// Turns a filtered place list into itinerary text.
///
/// When the generative provider is unavailable or errors, a deterministic
/// template-based plan is rendered instead, so the caller always receives
/// some itinerary text.
pub struct ItineraryGenerationService {
    gemini: Option<GeminiService>,
}

impl ItineraryGenerationService {
    pub fn new(gemini: Option<GeminiService>) -> Self {
        Self { gemini }
    }

    /// Returns the itinerary text and whether the fallback produced it.
    pub async fn generate_itinerary(
        &self,
        places: &[Place],
        request: &PlanRequest,
        variant: ItineraryVariant,
    ) -> (String, bool) {
        if let Some(gemini) = &self.gemini {
            let prompt = build_itinerary_prompt(places, request);
            match gemini
                .generate_text(
                    &prompt,
                    Some(SYSTEM_INSTRUCTION),
                    MAX_OUTPUT_TOKENS,
                    variant.temperature(),
                )
                .await
            {
                Ok(text) if !text.trim().is_empty() => return (text, false),
                Ok(_) => {
                    eprintln!("Gemini returned empty itinerary text. Using the fallback plan.")
                }
                Err(e) => eprintln!("Itinerary generation failed: {}. Using the fallback plan.", e),
            }
        }

        (fallback_itinerary(places, request), true)
    }
}

fn build_itinerary_prompt(places: &[Place], request: &PlanRequest) -> String {
    let places_json = serde_json::to_string_pretty(places).unwrap_or_default();
    let budget_line = match request.budget_per_person {
        Some(budget) => format!("Budget per person: up to ${:.0}", budget),
        None => "Budget per person: unspecified".to_string(),
    };

    format!(
        "Write an itinerary for this event using only the venues listed below.\n\n\
         Event description: {}\n\
         Guest ages: {} to {}\n\
         {}\n\
         Date: {} from {} to {}\n\
         Duration: {} hours, party of {}\n\n\
         Venues (JSON):\n{}\n\n\
         Formatting requirements:\n\
         - Plain text only. No markdown symbols such as *, #, or backticks.\n\
         - A short opening paragraph, then a numbered list of stops.\n\
         - Refer to each venue by its exact displayName.\n\
         - Close with one sentence wishing the group a great event.",
        request.description,
        request.age_range.min,
        request.age_range.max,
        budget_line,
        request.time_window.date,
        request.time_window.start,
        request.time_window.end,
        request.duration_hours,
        request.party_size,
        places_json,
    )
}

/// Number of fallback stops implied by the event duration.
fn max_stops(duration_hours: f64) -> usize {
    if duration_hours <= 4.0 {
        2
    } else if duration_hours <= 8.0 {
        3
    } else {
        4
    }
}

fn rating_or_lowest(place: &Place) -> f64 {
    place.rating.unwrap_or(f64::NEG_INFINITY)
}

/// Deterministic template plan: top-rated place per category, in stable
/// category order, capped by the duration-implied stop count.
pub fn fallback_itinerary(places: &[Place], request: &PlanRequest) -> String {
    let stop_limit = max_stops(request.duration_hours);
    let mut picks: Vec<&Place> = Vec::new();

    for category in PlaceCategory::ALL {
        if picks.len() == stop_limit {
            break;
        }
        let best = places
            .iter()
            .filter(|place| place.category == category)
            .max_by(|a, b| {
                rating_or_lowest(a)
                    .partial_cmp(&rating_or_lowest(b))
                    .unwrap_or(Ordering::Equal)
            });
        if let Some(place) = best {
            picks.push(place);
        }
    }

    if picks.is_empty() {
        return "No suitable venues were found for this event. Try widening the search radius \
                or adjusting the description."
            .to_string();
    }

    let hours_per_stop = ((request.duration_hours / picks.len() as f64).round() as u32).max(1);

    let mut lines = Vec::new();
    lines.push(format!(
        "Here is a ready-to-go {}-hour plan for your group of {}.",
        request.duration_hours, request.party_size
    ));
    lines.push(String::new());

    for (i, place) in picks.iter().enumerate() {
        let address = place
            .formatted_address
            .as_deref()
            .unwrap_or("address unavailable");
        lines.push(format!("{}. {} ({})", i + 1, place.display_name, address));
        lines.push(format!("   Estimated time: {} hours", hours_per_stop));
    }

    lines.push(String::new());
    lines.push("Have a wonderful event, and adjust timings on the day as needed.".to_string());
    lines.join("\n")
}
