// Asset inventory service: categories, locations, employees, vendors and assets over SQLite
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Module declarations
mod asset_handlers;
mod config;
mod db;
mod error;
mod handlers;
mod identity;
mod models;
mod monitoring;
mod repositories;
mod usecases;

use config::{load_config, Config, DatabaseConfig};
use error::ApiError;
use monitoring::{Metrics, RequestLogger};
use usecases::Usecases;

// ==================== MAIN ====================

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (this calls load_env_file internally)
    let config = load_config()?;

    setup_logging(&config)?;
    config.print_startup_info();

    let pool = create_database_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let usecases = Usecases::new(pool.clone());
    let metrics = Arc::new(Metrics::new());

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let server_config = config.server.clone();
    let mut server = HttpServer::new(move || {
        let json_config = web::JsonConfig::default()
            .limit(config.security.max_request_size)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

        App::new()
            .wrap(setup_cors(&config.security.allowed_origins))
            .wrap(setup_security_headers())
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(RequestLogger::new(metrics.clone()))
            .app_data(json_config)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::from(metrics.clone()))
            .configure(monitoring::configure_health)
            .configure(|cfg| handlers::configure_api(cfg, &usecases))
    })
    .keep_alive(Duration::from_secs(server_config.keep_alive))
    .client_request_timeout(Duration::from_secs(server_config.client_timeout))
    .client_disconnect_timeout(Duration::from_secs(server_config.client_shutdown));

    if let Some(workers) = server_config.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server failed to run")?;

    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

fn setup_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        log::warn!("⚠️  Using wildcard CORS (*)");
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .filter(|origin| !origin.is_empty())
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

async fn create_database_pool(db_config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .with_context(|| format!("Invalid database url: {}", db_config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .idle_timeout(Duration::from_secs(db_config.idle_timeout))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to database: {}", db_config.url))?;

    log::info!(
        "Database pool ready ({}..{} connections)",
        db_config.min_connections,
        db_config.max_connections
    );
    Ok(pool)
}

fn setup_security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
}
