//! `/products` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use catalog_core::validation::{validate_name, validate_optional_name, validate_uuid};
use catalog_core::{CreateProductRequest, DeleteConfirmation, Product, UpdateProductRequest};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /products`, ordered by index.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list().await?))
}

/// `GET /products/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = validate_uuid("id", &id)?;

    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::product_not_found(&id))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(req) = body?;
    let name = validate_name(&req.name)?;

    let product = state.db.products().create(&name).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT|PATCH /products/{id}`. Only the name can change.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = validate_uuid("id", &id)?;
    let Json(req) = body?;
    let name = validate_optional_name(req.name.as_deref())?;

    state
        .db
        .products()
        .update_name(&id, name.as_deref())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::product_not_found(&id))
}

/// `DELETE /products/{id}`. Variants go with it; the rest are renumbered.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteConfirmation>> {
    let id = validate_uuid("id", &id)?;
    Ok(Json(state.db.products().delete(&id).await?))
}
