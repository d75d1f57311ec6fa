mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

#[cfg(test)]
mod test_support;

use axum::{Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        credential_repository::SeaOrmCredentialRepository,
        in_memory_attempt_tracker::InMemoryAttemptTracker,
    },
    presentation::handlers::login_handler::create_login_router,
    usecase::{login_usecase::LoginUsecase, verify_credential_usecase::CredentialVerifier},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(true);
    let db = Database::connect(opt).await?;

    let credential_repository = SeaOrmCredentialRepository::new(db);
    let attempt_tracker = InMemoryAttemptTracker::new(config.verifier.lockout);
    let password_hasher = Argon2PasswordHasher::new(config.verifier.hashing)?;
    let verifier = CredentialVerifier::new(
        credential_repository,
        attempt_tracker,
        password_hasher,
        &config.verifier,
    )?;
    let login_usecase = LoginUsecase::new(verifier, config.verifier.verify_timeout);

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .nest("/api", create_login_router(login_usecase));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
