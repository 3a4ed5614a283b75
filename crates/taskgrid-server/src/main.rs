//! Taskgrid Server — application entry point.
//!
//! Wires the in-memory store, the auth service, and the request gate.
//! The HTTP transport is a separate layer and is mounted on top of
//! [`RequestGate`]; every protected route must pass through it.

use taskgrid_auth::{AuthConfig, AuthService, RequestGate};
use taskgrid_store::MemoryStore;
use tracing_subscriber::EnvFilter;

fn env_config() -> Option<AuthConfig> {
    let token_secret = match std::env::var("TASKGRID_TOKEN_SECRET") {
        Ok(s) if !s.is_empty() => s,
        _ => return None,
    };

    let defaults = AuthConfig::default();
    let token_ttl_secs = std::env::var("TASKGRID_TOKEN_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.token_ttl_secs);
    let pepper = std::env::var("TASKGRID_PASSWORD_PEPPER").ok();

    Some(AuthConfig {
        token_secret,
        token_ttl_secs,
        pepper,
        ..defaults
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("taskgrid=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Taskgrid server...");

    let Some(config) = env_config() else {
        tracing::error!("TASKGRID_TOKEN_SECRET must be set to a non-empty value");
        std::process::exit(1);
    };

    tracing::info!(token_ttl_secs = config.token_ttl_secs, "auth core configured");

    let store = MemoryStore::new();
    let auth = AuthService::new(store.clone(), store.clone(), config);
    let _gate = RequestGate::new(auth.codec().clone());

    // TODO: mount the HTTP router on top of the gate once the
    // transport layer lands.

    tracing::info!("Taskgrid server stopped.");
}
