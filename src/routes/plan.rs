use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;

use crate::models::itinerary::Itinerary;
use crate::models::place::Place;
use crate::models::response::{ErrorBody, PlanResponse, RoutesResponse};
use crate::models::search::PlanRequest;
use crate::services::category_selection_service::CategorySelectionService;
use crate::services::gemini_service::GeminiService;
use crate::services::itinerary_generation_service::{
    ItineraryGenerationService, ItineraryVariant,
};
use crate::services::location_extraction_service::extract_locations;
use crate::services::place_filter_service::PlaceFilterService;
use crate::services::place_search_service::PlaceSearchService;
use crate::services::route_generation_service::RouteGenerationService;
use crate::services::search_log_service;

const ROUTE_COUNT: usize = 3;

const NO_PLACES_MESSAGE: &str =
    "No places found for the selected categories. Try a wider radius or a different description.";

/// Shared front half of both planning endpoints: category selection, place
/// search, and the fire-and-forget search log. Returns an error response
/// when the request cannot proceed.
async fn gather_places(
    request: &PlanRequest,
    gemini: &Option<GeminiService>,
) -> Result<Vec<Place>, HttpResponse> {
    let place_search = match PlaceSearchService::new() {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Place search unavailable: {}", e);
            return Err(HttpResponse::InternalServerError().json(ErrorBody::with_details(
                "The service is not configured for place search.",
                e.to_string(),
            )));
        }
    };

    let categories = CategorySelectionService::new(gemini.clone())
        .select_categories(request)
        .await;
    println!("Selected categories: {:?}", categories);

    let places = match place_search
        .search_places(request.origin, request.radius_meters, &categories)
        .await
    {
        Ok(places) => places,
        Err(e) => {
            eprintln!("Place search failed: {}", e);
            return Err(HttpResponse::BadGateway().json(ErrorBody::with_details(
                "Place search is currently unavailable.",
                e.to_string(),
            )));
        }
    };

    if places.is_empty() {
        return Err(HttpResponse::NotFound().json(ErrorBody::new(NO_PLACES_MESSAGE)));
    }

    tokio::spawn(search_log_service::log_search_results(
        request.clone(),
        places.clone(),
    ));

    Ok(places)
}

/*
    POST /api/plan
*/
pub async fn create_plan(input: web::Json<PlanRequest>) -> impl Responder {
    let request = input.into_inner();
    println!("Planning request: {:?}", request);

    let gemini = match GeminiService::new() {
        Ok(service) => Some(service),
        Err(e) => {
            eprintln!("Gemini unavailable: {}. Planning will use fallbacks.", e);
            None
        }
    };

    let places = match gather_places(&request, &gemini).await {
        Ok(places) => places,
        Err(response) => return response,
    };
    let places_found = places.len();

    let filtered = PlaceFilterService::new(gemini.clone())
        .filter_places(&places, &request)
        .await;
    println!("{} of {} places kept after filtering", filtered.len(), places_found);

    let (text, used_fallback) = ItineraryGenerationService::new(gemini)
        .generate_itinerary(&filtered, &request, ItineraryVariant::Single)
        .await;
    let locations = extract_locations(&text, &filtered);

    HttpResponse::Ok().json(PlanResponse {
        success: true,
        itinerary: Itinerary { text, locations },
        places_found,
        used_fallback,
        request_id: Uuid::new_v4(),
        generated_at: Utc::now(),
    })
}

/*
    POST /api/plan/routes
*/
pub async fn create_plan_routes(input: web::Json<PlanRequest>) -> impl Responder {
    let request = input.into_inner();
    println!("Multi-route planning request: {:?}", request);

    let gemini = match GeminiService::new() {
        Ok(service) => Some(service),
        Err(e) => {
            eprintln!("Gemini unavailable: {}. Planning will use fallbacks.", e);
            None
        }
    };

    let places = match gather_places(&request, &gemini).await {
        Ok(places) => places,
        Err(response) => return response,
    };
    let places_found = places.len();

    let routes = RouteGenerationService::new(gemini)
        .generate_routes(&places, &request, ROUTE_COUNT)
        .await;

    HttpResponse::Ok().json(RoutesResponse {
        success: true,
        routes,
        places_found,
        request_id: Uuid::new_v4(),
        generated_at: Utc::now(),
    })
}
