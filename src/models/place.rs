use serde::{Deserialize, Serialize};

/// Latitude/longitude pair as returned by the places provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Normalized venue category used for bucketing and the multi-route quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Dining,
    Outdoor,
    Nightlife,
    Culture,
    Entertainment,
}

impl PlaceCategory {
    /// Stable iteration order for category buckets.
    pub const ALL: [PlaceCategory; 5] = [
        PlaceCategory::Dining,
        PlaceCategory::Outdoor,
        PlaceCategory::Nightlife,
        PlaceCategory::Culture,
        PlaceCategory::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Dining => "dining",
            PlaceCategory::Outdoor => "outdoor",
            PlaceCategory::Nightlife => "nightlife",
            PlaceCategory::Culture => "culture",
            PlaceCategory::Entertainment => "entertainment",
        }
    }
}

/// Map a provider place-type tag to a normalized category.
///
/// Unrecognized tags fall back to `Dining`.
pub fn category_for_tag(tag: &str) -> PlaceCategory {
    match tag {
        "park" | "national_park" | "state_park" | "hiking_area" | "beach"
        | "botanical_garden" | "garden" | "campground" | "dog_park" | "marina"
        | "picnic_ground" | "playground" | "zoo" | "wildlife_park" | "farm" | "ski_resort"
        | "golf_course" | "sports_complex" | "swimming_pool" | "cycling_park"
        | "adventure_sports_center" => PlaceCategory::Outdoor,
        "bar" | "night_club" | "casino" | "karaoke" | "pub" | "comedy_club" | "dance_hall"
        | "wine_bar" | "brewery" => PlaceCategory::Nightlife,
        "museum" | "art_gallery" | "art_studio" | "historical_landmark" | "monument"
        | "cultural_center" | "performing_arts_theater" | "library" | "tourist_attraction"
        | "auditorium" | "opera_house" | "concert_hall" | "sculpture" => PlaceCategory::Culture,
        "movie_theater" | "bowling_alley" | "amusement_park" | "amusement_center"
        | "video_arcade" | "water_park" | "ice_skating_rink" | "skateboard_park"
        | "ferris_wheel" | "roller_coaster" | "event_venue" | "banquet_hall" | "plaza"
        | "shopping_mall" | "market" | "aquarium" | "spa" => PlaceCategory::Entertainment,
        _ => PlaceCategory::Dining,
    }
}

/// A normalized point of interest from the places provider.
///
/// `display_name` is kept verbatim from the provider because the location
/// extractor later matches it against generated itinerary text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub location: Coordinate,
    pub category: PlaceCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "userRatingCount", skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,
    #[serde(rename = "priceLevel", skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(rename = "formattedAddress", skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(rename = "rawTypes", default)]
    pub raw_types: Vec<String>,
}
