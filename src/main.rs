// src/main.rs

use std::{sync::Arc, time::Duration};

use dotenvy::dotenv;
use formgrade::{
    config::Config,
    generator::{OpenAiQuizGenerator, QuizGenerator},
    routes,
    state::AppState,
    store::{MemoryStore, PgStore, Store},
    utils::jwt::JwtIdentityProvider,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store: Arc<dyn Store> = if config.uses_memory_store() {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let pool = connect_with_retry(&config).await;

        // Run Migrations Automatically
        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Migrations applied successfully.");

        Arc::new(PgStore::new(pool))
    };

    let generator: Option<Arc<dyn QuizGenerator>> = match &config.generator {
        Some(gen_config) => {
            let generator = OpenAiQuizGenerator::new(
                &gen_config.api_key,
                &gen_config.base_url,
                &gen_config.model,
                gen_config.timeout_secs,
            )
            .expect("Failed to build generator HTTP client");
            tracing::info!("Quiz generation enabled (model {})", gen_config.model);
            Some(Arc::new(generator))
        }
        None => {
            tracing::info!("GENERATOR_API_KEY not set, quiz generation disabled");
            None
        }
    };

    let state = AppState {
        store,
        identity: Arc::new(JwtIdentityProvider::new(&config.jwt_secret)),
        generator,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listening address");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

/// Initializes the database pool, retrying while Postgres starts up.
async fn connect_with_retry(config: &Config) -> PgPool {
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };
    tracing::info!("Database connected...");
    pool
}
