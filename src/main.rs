use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use order_management::infrastructure::log_client::HttpLogForwarder;
use order_management::infrastructure::order_repo::DieselOrderRepository;
use order_management::pipeline::{StatusPipeline, DEFAULT_TICK_PERIOD};
use order_management::{build_server, create_pool, run_migrations};

const DEFAULT_LOG_SERVICE_URL: &str = "http://order-processing-log-service:8090/logs";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let log_service_url =
        env::var("LOG_SERVICE_URL").unwrap_or_else(|_| DEFAULT_LOG_SERVICE_URL.to_string());
    let tick_period = env::var("PROCESS_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TICK_PERIOD);

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let pipeline = Arc::new(StatusPipeline::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(HttpLogForwarder::new(log_service_url)),
    ));
    pipeline.spawn(tick_period);

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(pool, &host, port)?.await
}
