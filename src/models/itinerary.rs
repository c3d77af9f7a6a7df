use serde::{Deserialize, Serialize};

use crate::models::place::Place;
use crate::models::search::PlanRequest;

/// A place annotated with its 1-based visit order, derived from where its
/// name first appears in the itinerary text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedLocation {
    #[serde(flatten)]
    pub place: Place,
    pub order: u32,
}

/// Generated itinerary text plus the ordered places it mentions.
///
/// Every referenced place comes from the search result set handed to the
/// generator for this request; the extractor never fabricates entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub text: String,
    pub locations: Vec<OrderedLocation>,
}

/// One labeled alternative itinerary among several generated for the same
/// request. Selection among routes is a UI concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOption {
    #[serde(rename = "routeName")]
    pub route_name: String,
    pub itinerary: Itinerary,
    pub constraints: PlanRequest,
}
