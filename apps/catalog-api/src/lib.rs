//! # Catalog API
//!
//! HTTP server for the catalog manager dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog API Routes                              │
//! │                                                                         │
//! │  Public                        Protected (Bearer JWT)                   │
//! │  ┌────────────────┐            ┌────────────────────────────────────┐  │
//! │  │ GET  /health   │            │ /products                          │  │
//! │  │ POST /auth/login│           │   GET, POST                        │  │
//! │  └────────────────┘            │ /products/{id}                     │  │
//! │                                │   GET, PUT, PATCH, DELETE          │  │
//! │                                │ /variants                          │  │
//! │                                │   GET (?productId&search&          │  │
//! │                                │        createdBy&sort), POST       │  │
//! │                                │ /variants/{id}                     │  │
//! │                                │   GET, PUT, PATCH, DELETE          │  │
//! │                                └────────────────────────────────────┘  │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                   catalog-db (SQLite, reindex on delete)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 5000)
//! - `BIND_ADDR` - listen address (default: 0.0.0.0)
//! - `DATABASE_PATH` - SQLite file (default: ./catalog.db)
//! - `DATABASE_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 3600)
//! - `SEED_USERNAME` / `SEED_PASSWORD` - default account (default: test/test)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use catalog_core::validation::validate_username;
use catalog_db::Database;

// Re-exports
pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_access_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}

/// Builds the full router. Used by the binary and by the black-box tests.
pub fn build_app(state: AppState) -> Router {
    routes::router(state)
}

/// Creates the configured default account if it does not exist yet.
///
/// Returns `true` when a user was created.
pub async fn seed_default_user(state: &AppState) -> ApiResult<bool> {
    if !state.config.seeding_enabled() {
        return Ok(false);
    }

    let username = validate_username(&state.config.seed_username)?;
    let users = state.db.users();
    if users.exists(&username).await? {
        return Ok(false);
    }

    let hash = auth::hash_password(&state.config.seed_password)?;
    users.insert(&username, &hash).await?;

    info!(username = %username, "Seeded default user");
    Ok(true)
}
