use std::collections::HashSet;

use crate::models::search::PlanRequest;
use crate::services::gemini_service::{extract_json_payload, GeminiService};

/// Provider place-type tags the selector may choose from. Tags outside this
/// list are discarded from the model's answer.
pub const ALLOWED_PLACE_TYPES: &[&str] = &[
    // dining
    "american_restaurant",
    "bakery",
    "barbecue_restaurant",
    "breakfast_restaurant",
    "brunch_restaurant",
    "cafe",
    "chinese_restaurant",
    "coffee_shop",
    "dessert_shop",
    "donut_shop",
    "fast_food_restaurant",
    "french_restaurant",
    "greek_restaurant",
    "hamburger_restaurant",
    "ice_cream_shop",
    "indian_restaurant",
    "italian_restaurant",
    "japanese_restaurant",
    "korean_restaurant",
    "mexican_restaurant",
    "middle_eastern_restaurant",
    "pizza_restaurant",
    "ramen_restaurant",
    "restaurant",
    "sandwich_shop",
    "seafood_restaurant",
    "spanish_restaurant",
    "steak_house",
    "sushi_restaurant",
    "tea_house",
    "thai_restaurant",
    "turkish_restaurant",
    "vegan_restaurant",
    "vegetarian_restaurant",
    "vietnamese_restaurant",
    // outdoor
    "adventure_sports_center",
    "beach",
    "botanical_garden",
    "campground",
    "cycling_park",
    "dog_park",
    "farm",
    "garden",
    "golf_course",
    "hiking_area",
    "marina",
    "national_park",
    "park",
    "picnic_ground",
    "playground",
    "ski_resort",
    "sports_complex",
    "state_park",
    "swimming_pool",
    "wildlife_park",
    "zoo",
    // nightlife
    "bar",
    "brewery",
    "casino",
    "comedy_club",
    "dance_hall",
    "karaoke",
    "night_club",
    "pub",
    "wine_bar",
    // culture
    "art_gallery",
    "art_studio",
    "auditorium",
    "concert_hall",
    "cultural_center",
    "historical_landmark",
    "library",
    "monument",
    "museum",
    "opera_house",
    "performing_arts_theater",
    "sculpture",
    "tourist_attraction",
    // entertainment
    "amusement_center",
    "amusement_park",
    "aquarium",
    "banquet_hall",
    "bowling_alley",
    "event_venue",
    "ferris_wheel",
    "ice_skating_rink",
    "market",
    "movie_theater",
    "plaza",
    "roller_coaster",
    "shopping_mall",
    "skateboard_park",
    "spa",
    "video_arcade",
    "water_park",
];

/// Used whenever the model's answer is unusable.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["restaurant", "park", "cafe"];

const MAX_CATEGORIES: usize = 8;
const MAX_OUTPUT_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.3;

const SYSTEM_INSTRUCTION: &str = "You are an event-planning assistant. Answer with a JSON \
array of place-type strings and nothing else.";

/// Picks 3-8 search category tags for an event description.
///
/// Best-effort by design: any provider failure or malformed answer degrades
/// to `DEFAULT_CATEGORIES` rather than failing the request.
pub struct CategorySelectionService {
    gemini: Option<GeminiService>,
}

impl CategorySelectionService {
    pub fn new(gemini: Option<GeminiService>) -> Self {
        Self { gemini }
    }

    pub async fn select_categories(&self, request: &PlanRequest) -> Vec<String> {
        let Some(gemini) = &self.gemini else {
            return default_categories();
        };

        let prompt = build_category_prompt(request);
        match gemini
            .generate_text(&prompt, Some(SYSTEM_INSTRUCTION), MAX_OUTPUT_TOKENS, TEMPERATURE)
            .await
        {
            Ok(text) => {
                let selected = parse_category_response(&text);
                if selected.is_empty() {
                    eprintln!("Category selection returned no usable tags. Using defaults.");
                    default_categories()
                } else {
                    selected
                }
            }
            Err(e) => {
                eprintln!("Category selection failed: {}. Using defaults.", e);
                default_categories()
            }
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|tag| tag.to_string()).collect()
}

fn build_category_prompt(request: &PlanRequest) -> String {
    let budget_line = match request.budget_per_person {
        Some(budget) => format!("Budget per person: up to ${:.0}", budget),
        None => "Budget per person: unspecified".to_string(),
    };

    // Advisory rules only; nothing here is enforced in code.
    let mut rules = vec![
        "Pick between 3 and 8 tags that best fit the event.",
        "Prefer dining tags when the description implies eating or drinking out.",
        "Prefer parks and outdoor tags for nature-oriented or family events.",
    ];
    if request.includes_minors() {
        rules.push("The group includes minors, so exclude bars, night clubs and casinos.");
    }

    format!(
        "Choose search categories for this event.\n\n\
         Event description: {}\n\
         Guest ages: {} to {}\n\
         {}\n\
         Date: {} from {} to {}\n\
         Duration: {} hours, party of {}\n\n\
         Rules:\n- {}\n\n\
         Allowed tags:\n{}\n\n\
         Respond with a JSON array of tag strings chosen from the allowed list.",
        request.description,
        request.age_range.min,
        request.age_range.max,
        budget_line,
        request.time_window.date,
        request.time_window.start,
        request.time_window.end,
        request.duration_hours,
        request.party_size,
        rules.join("\n- "),
        ALLOWED_PLACE_TYPES.join(", "),
    )
}

/// Parse the model's answer into allow-listed tags, deduplicated in answer
/// order and capped at `MAX_CATEGORIES`. Returns empty on any parse failure.
fn parse_category_response(text: &str) -> Vec<String> {
    let payload = extract_json_payload(text);
    let tags: Vec<String> = match serde_json::from_str(&payload) {
        Ok(tags) => tags,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if ALLOWED_PLACE_TYPES.contains(&tag.as_str()) && seen.insert(tag.clone()) {
            selected.push(tag);
            if selected.len() == MAX_CATEGORIES {
                break;
            }
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Coordinate;
    use crate::models::search::{AgeRange, TimeWindow};

    fn request() -> PlanRequest {
        PlanRequest {
            origin: Coordinate { lat: 40.0, lng: -105.0 },
            radius_meters: 3000.0,
            description: "birthday dinner with friends".to_string(),
            age_range: AgeRange { min: 18, max: 30 },
            budget_per_person: Some(60.0),
            time_window: TimeWindow {
                date: "2026-09-12".to_string(),
                start: "18:00".to_string(),
                end: "23:00".to_string(),
            },
            duration_hours: 5.0,
            party_size: 6,
        }
    }

    #[test]
    fn keeps_only_allow_listed_tags() {
        let selected =
            parse_category_response(r#"["restaurant", "rocket_pad", "park", "Night_Club"]"#);
        assert_eq!(selected, vec!["restaurant", "park", "night_club"]);
    }

    #[test]
    fn dedupes_and_caps_at_eight() {
        let selected = parse_category_response(
            r#"["restaurant", "restaurant", "park", "cafe", "bar", "museum", "zoo",
                "beach", "bakery", "pub", "spa"]"#,
        );
        assert_eq!(selected.len(), 8);
        assert_eq!(selected[0], "restaurant");
        assert_eq!(selected[1], "park");
    }

    #[test]
    fn unparsable_answer_yields_empty() {
        assert!(parse_category_response("not json").is_empty());
        assert!(parse_category_response(r#"{"tags": []}"#).is_empty());
    }

    #[test]
    fn parses_fenced_answers() {
        let selected = parse_category_response("```json\n[\"cafe\", \"park\"]\n```");
        assert_eq!(selected, vec!["cafe", "park"]);
    }

    #[test]
    fn minors_rule_appears_in_prompt_only_for_underage_groups() {
        let mut req = request();
        req.age_range = AgeRange { min: 12, max: 17 };
        assert!(build_category_prompt(&req).contains("includes minors"));

        req.age_range = AgeRange { min: 25, max: 40 };
        assert!(!build_category_prompt(&req).contains("includes minors"));
    }

    #[actix_web::test]
    async fn missing_provider_degrades_to_defaults() {
        let service = CategorySelectionService::new(None);
        let selected = service.select_categories(&request()).await;
        assert_eq!(selected, vec!["restaurant", "park", "cafe"]);
    }
}
