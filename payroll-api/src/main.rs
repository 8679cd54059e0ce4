use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use payroll_api::{Config, build_service, logging, routes};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init_logging(config.log_file.as_deref())?;

    let seed_options = config.seed_options();
    let service = build_service(&config.db_config(), seed_options.as_ref()).await?;
    let service = Data::new(service);

    info!(bind = %config.bind, backend = %config.backend, "server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .app_data(service.clone())
            .configure(routes::configure)
    })
    .bind(&config.bind)
    .with_context(|| format!("Failed to bind {}", config.bind))?
    .run()
    .await
    .context("HTTP server failed")
}
