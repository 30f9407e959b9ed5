//! HTTP routes.
//!
//! Handlers validate input first, then call exactly one repository method.

pub mod auth;
pub mod health;
pub mod products;
pub mod variants;

use axum::routing::{get, post};
use axum::Router;

use crate::auth::auth_middleware;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::update)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/variants", get(variants::list).post(variants::create))
        .route(
            "/variants/{id}",
            get(variants::get)
                .put(variants::update)
                .patch(variants::update)
                .delete(variants::delete),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}
