pub mod itinerary;
pub mod place;
pub mod response;
pub mod search;
