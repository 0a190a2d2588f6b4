// src/main.rs
use actix_web::{web, App, HttpServer}; // HTTP server and app builder
use pendulum::config::AppConfig;
use pendulum::ui; // Route handlers
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();
    info!(host = %addr.0, port = addr.1, "starting pendulum server");

    let data = web::Data::new(config);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(ui::configure))
        .bind(addr)?
        .run()
        .await
}
