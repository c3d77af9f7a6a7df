use std::cmp::Ordering;
use std::time::Duration;

use crate::models::itinerary::{Itinerary, RouteOption};
use crate::models::place::{Place, PlaceCategory};
use crate::models::search::PlanRequest;
use crate::services::gemini_service::GeminiService;
use crate::services::itinerary_generation_service::{
    ItineraryGenerationService, ItineraryVariant,
};
use crate::services::location_extraction_service::extract_locations;

// Pause between successive generation calls to respect provider rate limits.
const ROUTE_REQUEST_DELAY_MS: u64 = 500;
const MIN_PLACES_PER_ROUTE: usize = 3;
const TOP_RATED_THRESHOLD: f64 = 4.0;
const MAX_PLACES_PER_ROUTE: usize = 8;
const CATEGORY_QUOTAS: [(PlaceCategory, usize); 3] = [
    (PlaceCategory::Dining, 3),
    (PlaceCategory::Outdoor, 2),
    (PlaceCategory::Nightlife, 2),
];

/// A named place-selection policy. Kept as data so strategies can be added
/// or swapped without touching the driver loop.
pub struct FilterStrategy {
    pub name: &'static str,
    pub apply: fn(&[Place]) -> Vec<Place>,
}

pub fn default_strategies() -> Vec<FilterStrategy> {
    vec![
        FilterStrategy {
            name: "Premium Experience",
            apply: top_rated,
        },
        FilterStrategy {
            name: "Local Mix",
            apply: category_mix,
        },
        FilterStrategy {
            name: "Budget Friendly",
            apply: budget_sorted,
        },
    ]
}

fn rating_desc(a: &Place, b: &Place) -> Ordering {
    b.rating
        .partial_cmp(&a.rating)
        .unwrap_or(Ordering::Equal)
}

fn top_rated(places: &[Place]) -> Vec<Place> {
    let mut selected: Vec<Place> = places
        .iter()
        .filter(|place| place.rating.unwrap_or(0.0) >= TOP_RATED_THRESHOLD)
        .cloned()
        .collect();
    selected.sort_by(rating_desc);
    selected.truncate(MAX_PLACES_PER_ROUTE);
    selected
}

fn category_mix(places: &[Place]) -> Vec<Place> {
    let mut selected = Vec::new();
    for (category, quota) in CATEGORY_QUOTAS {
        let mut bucket: Vec<Place> = places
            .iter()
            .filter(|place| place.category == category)
            .cloned()
            .collect();
        bucket.sort_by(rating_desc);
        selected.extend(bucket.into_iter().take(quota));
    }
    selected
}

fn budget_sorted(places: &[Place]) -> Vec<Place> {
    let mut selected: Vec<Place> = places
        .iter()
        .filter(|place| place.price_level.map(|level| level <= 2).unwrap_or(false))
        .cloned()
        .collect();
    selected.sort_by_key(|place| place.price_level);
    selected.truncate(MAX_PLACES_PER_ROUTE);
    selected
}

/// Top up a thin selection with arbitrary additional places, in input order,
/// skipping ones already chosen.
fn pad_places(mut selected: Vec<Place>, all: &[Place], minimum: usize) -> Vec<Place> {
    for place in all {
        if selected.len() >= minimum {
            break;
        }
        if !selected.iter().any(|chosen| chosen.id == place.id) {
            selected.push(place.clone());
        }
    }
    selected
}

/// Produces several alternative itineraries over one search result set by
/// cycling through the filter strategies.
pub struct RouteGenerationService {
    generator: ItineraryGenerationService,
    strategies: Vec<FilterStrategy>,
}

impl RouteGenerationService {
    pub fn new(gemini: Option<GeminiService>) -> Self {
        Self {
            generator: ItineraryGenerationService::new(gemini),
            strategies: default_strategies(),
        }
    }

    pub async fn generate_routes(
        &self,
        places: &[Place],
        request: &PlanRequest,
        count: usize,
    ) -> Vec<RouteOption> {
        let mut routes = Vec::with_capacity(count);

        for i in 0..count {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(ROUTE_REQUEST_DELAY_MS)).await;
            }

            let strategy = &self.strategies[i % self.strategies.len()];
            let selected = pad_places((strategy.apply)(places), places, MIN_PLACES_PER_ROUTE);

            let (text, used_fallback) = self
                .generator
                .generate_itinerary(&selected, request, ItineraryVariant::Alternative(i))
                .await;
            if used_fallback {
                println!("Route {} used the fallback itinerary generator", i + 1);
            }

            let locations = extract_locations(&text, &selected);
            routes.push(RouteOption {
                route_name: format!("{} (Route {})", strategy.name, i + 1),
                itinerary: Itinerary { text, locations },
                constraints: request.clone(),
            });
        }

        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Coordinate;
    use crate::models::search::{AgeRange, TimeWindow};
    use std::collections::HashSet;

    fn place(
        id: &str,
        name: &str,
        category: PlaceCategory,
        rating: Option<f64>,
        price_level: Option<u8>,
    ) -> Place {
        Place {
            id: id.to_string(),
            display_name: name.to_string(),
            location: Coordinate { lat: 40.0, lng: -105.0 },
            category,
            rating,
            user_rating_count: Some(25),
            price_level,
            formatted_address: Some("5 High St".to_string()),
            raw_types: Vec::new(),
        }
    }

    fn twenty_places() -> Vec<Place> {
        let mut places = Vec::new();
        for i in 0..8 {
            places.push(place(
                &format!("d{}", i),
                &format!("Diner {}", i),
                PlaceCategory::Dining,
                Some(3.5 + (i as f64) * 0.1),
                Some((i % 4) as u8),
            ));
        }
        for i in 0..6 {
            places.push(place(
                &format!("o{}", i),
                &format!("Park {}", i),
                PlaceCategory::Outdoor,
                Some(4.0 + (i as f64) * 0.1),
                Some(0),
            ));
        }
        for i in 0..6 {
            places.push(place(
                &format!("n{}", i),
                &format!("Club {}", i),
                PlaceCategory::Nightlife,
                Some(3.0 + (i as f64) * 0.2),
                Some(3),
            ));
        }
        places
    }

    fn request() -> PlanRequest {
        PlanRequest {
            origin: Coordinate { lat: 40.0, lng: -105.0 },
            radius_meters: 3000.0,
            description: "weekend celebration".to_string(),
            age_range: AgeRange { min: 21, max: 40 },
            budget_per_person: Some(80.0),
            time_window: TimeWindow {
                date: "2026-09-26".to_string(),
                start: "15:00".to_string(),
                end: "23:00".to_string(),
            },
            duration_hours: 8.0,
            party_size: 8,
        }
    }

    #[test]
    fn top_rated_keeps_only_well_rated_places_sorted_descending() {
        let selected = top_rated(&twenty_places());
        assert!(selected.len() <= MAX_PLACES_PER_ROUTE);
        assert!(selected.iter().all(|p| p.rating.unwrap_or(0.0) >= 4.0));
        for pair in selected.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
    }

    #[test]
    fn category_mix_honors_quotas() {
        let selected = category_mix(&twenty_places());
        let dining = selected
            .iter()
            .filter(|p| p.category == PlaceCategory::Dining)
            .count();
        let outdoor = selected
            .iter()
            .filter(|p| p.category == PlaceCategory::Outdoor)
            .count();
        let nightlife = selected
            .iter()
            .filter(|p| p.category == PlaceCategory::Nightlife)
            .count();
        assert_eq!(dining, 3);
        assert_eq!(outdoor, 2);
        assert_eq!(nightlife, 2);
    }

    #[test]
    fn budget_sorted_excludes_expensive_and_unpriced_places() {
        let selected = budget_sorted(&twenty_places());
        assert!(selected.iter().all(|p| p.price_level.unwrap_or(5) <= 2));
        for pair in selected.windows(2) {
            assert!(pair[0].price_level <= pair[1].price_level);
        }
    }

    #[test]
    fn thin_selections_are_padded_to_the_minimum() {
        let places = twenty_places();
        let padded = pad_places(vec![places[0].clone()], &places, MIN_PLACES_PER_ROUTE);
        assert_eq!(padded.len(), MIN_PLACES_PER_ROUTE);
        let ids: HashSet<&str> = padded.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), MIN_PLACES_PER_ROUTE);
    }

    #[actix_web::test]
    async fn three_routes_cycle_through_distinct_strategy_labels() {
        let service = RouteGenerationService::new(None);
        let routes = service.generate_routes(&twenty_places(), &request(), 3).await;

        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].route_name, "Premium Experience (Route 1)");
        assert_eq!(routes[1].route_name, "Local Mix (Route 2)");
        assert_eq!(routes[2].route_name, "Budget Friendly (Route 3)");

        let labels: HashSet<&str> = routes.iter().map(|r| r.route_name.as_str()).collect();
        assert_eq!(labels.len(), 3);

        for route in &routes {
            assert!(!route.itinerary.text.trim().is_empty());
        }
    }
}
