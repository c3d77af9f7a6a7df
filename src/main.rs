use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use event_planner_api::routes;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .route("/health", web::get().to(routes::health::health))
            .service(
                web::scope("/api")
                    .route("/plan", web::post().to(routes::plan::create_plan))
                    .route(
                        "/plan/routes",
                        web::post().to(routes::plan::create_plan_routes),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
