pub mod category_selection_service;
pub mod gemini_service;
pub mod itinerary_generation_service;
pub mod location_extraction_service;
pub mod place_filter_service;
pub mod place_search_service;
pub mod route_generation_service;
pub mod search_log_service;
