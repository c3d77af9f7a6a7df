use actix_web::{test, web, App};
use serde_json::json;
use serial_test::serial;

use event_planner_api::routes;

fn plan_body() -> serde_json::Value {
    json!({
        "origin": { "lat": 40.0150, "lng": -105.2705 },
        "radiusMeters": 3000.0,
        "description": "birthday dinner with friends",
        "ageRange": { "min": 21, "max": 35 },
        "budgetPerPerson": 60.0,
        "timeWindow": { "date": "2026-09-12", "start": "18:00", "end": "23:00" },
        "durationHours": 5.0,
        "partySize": 6
    })
}

macro_rules! planning_app {
    () => {
        test::init_service(
            App::new()
                .route("/health", web::get().to(routes::health::health))
                .service(
                    web::scope("/api")
                        .route("/plan", web::post().to(routes::plan::create_plan))
                        .route(
                            "/plan/routes",
                            web::post().to(routes::plan::create_plan_routes),
                        ),
                ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = planning_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert_eq!(body, "OK");
}

#[actix_rt::test]
#[serial]
async fn test_plan_without_places_credential_is_a_config_error() {
    std::env::remove_var("GOOGLE_PLACES_API_KEY");
    std::env::remove_var("GEMINI_API_KEY");

    let app = planning_app!();

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .set_json(plan_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("not configured"));
    assert!(body["details"].as_str().is_some());
}

#[actix_rt::test]
#[serial]
async fn test_plan_routes_without_places_credential_is_a_config_error() {
    std::env::remove_var("GOOGLE_PLACES_API_KEY");
    std::env::remove_var("GEMINI_API_KEY");

    let app = planning_app!();

    let req = test::TestRequest::post()
        .uri("/api/plan/routes")
        .set_json(plan_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_plan_rejects_malformed_body() {
    let app = planning_app!();

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .set_json(json!({ "description": "missing everything else" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_unknown_route_is_not_found() {
    let app = planning_app!();

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}
