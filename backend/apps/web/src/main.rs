//! Web Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are handled by
//! the crates' own error types and the redirect policy of the routes.

use auth::middleware::{AuthMiddlewareState, require_identity};
use auth::models::Provider;
use auth::{AuthConfig, PgAuthRepository, auth_router, config::ProviderSettings};
use axum::Router;
use base64::Engine;
use base64::engine::general_purpose;
use secrets::{PgSecretRepository, secrets_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,auth=info,secrets=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection; a storage failure here is fatal
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: purge expired sessions
    // Errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Auth configuration
    let config = build_auth_config()?;

    // Protected routes: the secrets router behind the identity gate
    let gate = AuthMiddlewareState {
        repo: Arc::new(auth_repo.clone()),
        config: Arc::new(config.clone()),
    };

    let secrets_repo = PgSecretRepository::new(pool.clone());
    let protected = secrets_router(secrets_repo).layer(axum::middleware::from_fn_with_state(
        gate,
        require_identity::<PgAuthRepository>,
    ));

    // Build router
    let app = Router::new()
        .merge(auth_router(auth_repo, config))
        .merge(protected)
        .layer(TraceLayer::new_for_http());

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the auth configuration from the environment
///
/// The session secret is required in production builds; development builds
/// fall back to a random per-process secret and an insecure cookie.
/// Providers are optional: each is enabled only when its client id/secret
/// pair is present.
fn build_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            session_secret: secret,
            ..AuthConfig::default()
        }
    };

    let base_url =
        env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    match (env::var("GOOGLE_CLIENT_ID"), env::var("GOOGLE_CLIENT_SECRET")) {
        (Ok(client_id), Ok(client_secret)) => {
            config = config.with_provider(
                Provider::Google,
                ProviderSettings::google(client_id, client_secret, &base_url),
            );
        }
        _ => {
            tracing::warn!("Google sign-in disabled (GOOGLE_CLIENT_ID/SECRET not set)");
        }
    }

    match (
        env::var("FACEBOOK_CLIENT_ID"),
        env::var("FACEBOOK_CLIENT_SECRET"),
    ) {
        (Ok(client_id), Ok(client_secret)) => {
            config = config.with_provider(
                Provider::Facebook,
                ProviderSettings::facebook(client_id, client_secret, &base_url),
            );
        }
        _ => {
            tracing::warn!("Facebook sign-in disabled (FACEBOOK_CLIENT_ID/SECRET not set)");
        }
    }

    Ok(config)
}
