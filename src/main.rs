// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hrms_backend::config::Config;
use hrms_backend::mail::BrevoClient;
use hrms_backend::models::user::{Role, UserProfile};
use hrms_backend::routes;
use hrms_backend::services::{IdentityError, IdentityProvider, LocalIdentityProvider};
use hrms_backend::state::AppState;
use hrms_backend::store::{
    DocumentStore, MemoryDocumentStore, PgDocumentStore, collections, to_document,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env()?;

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

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let pool = connect(url).await?;

            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied successfully.");

            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let mailer = Arc::new(BrevoClient::new(config.email.clone())?);
    if config.email.api_key.is_none() {
        tracing::warn!("BREVO_API_KEY is not set; every email will fail");
    }

    let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new(store.clone()));

    // Seed Admin User
    if let Err(e) = seed_admin_user(store.as_ref(), identity.as_ref(), &config).await {
        tracing::error!("Failed to seed admin user: {}", e);
    }

    let state = AppState::new(config.clone(), store, mailer, identity);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Connects with a short retry loop so the service can start alongside the
/// database container.
async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return Ok(pool);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries");
                    return Err(e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

async fn seed_admin_user(
    store: &dyn DocumentStore,
    identity: &dyn IdentityProvider,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let uid = match identity.create_account(email, password, true).await {
        Ok(uid) => uid,
        Err(IdentityError::AlreadyExists) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Seeding admin user: {}", email);
    let profile = UserProfile::new(&uid, &email.trim().to_lowercase(), Role::Admin, Utc::now());
    store
        .set(collections::USERS, &uid, to_document(&profile)?)
        .await?;
    tracing::info!("Admin user created successfully.");
    Ok(())
}
