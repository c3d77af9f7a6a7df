use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::models::place::{category_for_tag, Coordinate, Place};

const NEARBY_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";
// Only the fields the normalized Place model carries.
const FIELD_MASK: &str = "places.id,places.displayName,places.location,places.rating,places.userRatingCount,places.priceLevel,places.types,places.formattedAddress";
const MAX_RESULTS_PER_CATEGORY: u32 = 20;
// Courtesy pause between per-category requests to stay under the provider's
// rate limit. Not a retry/backoff policy.
const CATEGORY_REQUEST_DELAY_MS: u64 = 200;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct NearbySearchRequest {
    #[serde(rename = "includedTypes")]
    included_types: Vec<String>,
    #[serde(rename = "maxResultCount")]
    max_result_count: u32,
    #[serde(rename = "locationRestriction")]
    location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    places: Option<Vec<RawPlace>>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    id: String,
    #[serde(rename = "displayName")]
    display_name: Option<LocalizedText>,
    location: Option<LatLng>,
    rating: Option<f64>,
    #[serde(rename = "userRatingCount")]
    user_rating_count: Option<u32>,
    #[serde(rename = "priceLevel")]
    price_level: Option<String>,
    types: Option<Vec<String>>,
    #[serde(rename = "formattedAddress")]
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: Option<String>,
}

#[derive(Debug)]
pub enum PlaceSearchError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlaceSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceSearchError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            PlaceSearchError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PlaceSearchError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PlaceSearchError {}

impl From<reqwest::Error> for PlaceSearchError {
    fn from(err: reqwest::Error) -> Self {
        PlaceSearchError::HttpError(err)
    }
}

/// Adapter over the Places nearby-search endpoint.
///
/// The endpoint accepts a single included type per call, so one request is
/// issued per category tag and the results merged afterwards.
#[derive(Clone)]
pub struct PlaceSearchService {
    client: Client,
    api_key: String,
}

impl PlaceSearchService {
    pub fn new() -> Result<Self, PlaceSearchError> {
        let api_key = env::var("GOOGLE_PLACES_API_KEY").map_err(|_| {
            PlaceSearchError::EnvironmentError("GOOGLE_PLACES_API_KEY not set".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, api_key })
    }

    /// Search each category in turn and return the merged, deduplicated
    /// place list. A failed category is logged and skipped; partial results
    /// are acceptable.
    pub async fn search_places(
        &self,
        center: Coordinate,
        radius_meters: f64,
        categories: &[String],
    ) -> Result<Vec<Place>, PlaceSearchError> {
        let mut batches = Vec::with_capacity(categories.len());

        for (i, category) in categories.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(CATEGORY_REQUEST_DELAY_MS)).await;
            }

            match self.search_category(center, radius_meters, category).await {
                Ok(raw_places) => {
                    println!(
                        "Nearby search for '{}' returned {} places",
                        category,
                        raw_places.len()
                    );
                    batches.push((category.clone(), raw_places));
                }
                Err(e) => {
                    eprintln!("Nearby search for '{}' failed: {}. Skipping.", category, e);
                }
            }
        }

        collect_results(batches, categories.len())
    }

    async fn search_category(
        &self,
        center: Coordinate,
        radius_meters: f64,
        category: &str,
    ) -> Result<Vec<RawPlace>, PlaceSearchError> {
        let request = NearbySearchRequest {
            included_types: vec![category.to_string()],
            max_result_count: MAX_RESULTS_PER_CATEGORY,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: center.lat,
                        longitude: center.lng,
                    },
                    radius: radius_meters,
                },
            },
        };

        let response = self
            .client
            .post(NEARBY_SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlaceSearchError::ResponseError(format!(
                "Nearby search failed with status {}: {}",
                status, error_text
            )));
        }

        let search_response: NearbySearchResponse = response.json().await.map_err(|e| {
            PlaceSearchError::ResponseError(format!("Failed to parse response: {}", e))
        })?;

        Ok(search_response.places.unwrap_or_default())
    }
}

/// A skipped category is a partial failure, but when every category request
/// failed there is nothing to degrade to and the error surfaces. Successful
/// requests with zero places still count as results (the caller reports
/// those as "no places found").
fn collect_results(
    batches: Vec<(String, Vec<RawPlace>)>,
    attempted: usize,
) -> Result<Vec<Place>, PlaceSearchError> {
    if attempted > 0 && batches.is_empty() {
        return Err(PlaceSearchError::ResponseError(format!(
            "All {} category searches failed",
            attempted
        )));
    }
    Ok(merge_and_dedupe(batches))
}

/// Merge per-category result batches in category-iteration order, keeping the
/// first-seen occurrence of each place id.
fn merge_and_dedupe(batches: Vec<(String, Vec<RawPlace>)>) -> Vec<Place> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for (category_tag, raw_places) in batches {
        for raw in raw_places {
            if let Some(place) = normalize_place(raw, &category_tag) {
                if seen.insert(place.id.clone()) {
                    merged.push(place);
                }
            }
        }
    }

    merged
}

/// Validate a raw provider record at the adapter boundary. Records missing a
/// display name or coordinates are dropped rather than passed downstream.
fn normalize_place(raw: RawPlace, category_tag: &str) -> Option<Place> {
    let display_name = raw.display_name.and_then(|name| name.text)?;
    if display_name.is_empty() {
        return None;
    }
    let location = raw.location?;

    Some(Place {
        id: raw.id,
        display_name,
        location: Coordinate {
            lat: location.latitude,
            lng: location.longitude,
        },
        category: category_for_tag(category_tag),
        rating: raw.rating,
        user_rating_count: raw.user_rating_count,
        price_level: raw.price_level.as_deref().and_then(parse_price_level),
        formatted_address: raw.formatted_address,
        raw_types: raw.types.unwrap_or_default(),
    })
}

fn parse_price_level(raw: &str) -> Option<u8> {
    match raw {
        "PRICE_LEVEL_FREE" => Some(0),
        "PRICE_LEVEL_INEXPENSIVE" => Some(1),
        "PRICE_LEVEL_MODERATE" => Some(2),
        "PRICE_LEVEL_EXPENSIVE" => Some(3),
        "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
        _ => None,
    }
}
