//! `/variants` handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use catalog_core::validation::{
    validate_name, validate_optional_name, validate_search_query, validate_uuid,
};
use catalog_core::{
    CreateVariantRequest, DeleteConfirmation, SortOrder, UpdateVariantRequest, ValidationError,
    Variant, VariantFilter, VariantListing, DEFAULT_CREATED_BY,
};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query string of `GET /variants`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantQuery {
    pub product_id: Option<String>,
    pub search: Option<String>,
    pub created_by: Option<String>,
    pub sort: Option<String>,
}

impl VariantQuery {
    /// Validates the raw query into a repository filter. Blank values count
    /// as absent.
    pub fn into_filter(self) -> Result<VariantFilter, ValidationError> {
        let non_blank = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        let product_id = match non_blank(self.product_id) {
            Some(id) => Some(validate_uuid("productId", &id)?),
            None => None,
        };

        let search = match self.search {
            Some(q) => validate_search_query(&q)?,
            None => None,
        };

        let sort = match non_blank(self.sort) {
            Some(s) => s.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        Ok(VariantFilter {
            product_id,
            created_by: non_blank(self.created_by),
            search,
            sort,
        })
    }
}

/// `GET /variants?productId&search&createdBy&sort=ASC|DESC`. Each variant
/// carries its owning product.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<VariantQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<VariantListing>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    Ok(Json(state.db.variants().find(&filter).await?))
}

/// `GET /variants/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Variant>> {
    let id = validate_uuid("id", &id)?;

    state
        .db
        .variants()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::variant_not_found(&id))
}

/// `POST /variants`. The caller's username becomes `createdBy`.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<CreateVariantRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Variant>)> {
    let Json(req) = body?;
    let product_id = validate_uuid("productId", &req.product_id)?;
    let name = validate_name(&req.name)?;

    let created_by = match user.username.trim() {
        "" => DEFAULT_CREATED_BY,
        username => username,
    };

    let variant = state
        .db
        .variants()
        .create(&product_id, &name, created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// `PUT|PATCH /variants/{id}`. Only the name can change.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateVariantRequest>, JsonRejection>,
) -> ApiResult<Json<Variant>> {
    let id = validate_uuid("id", &id)?;
    let Json(req) = body?;
    let name = validate_optional_name(req.name.as_deref())?;

    state
        .db
        .variants()
        .update_name(&id, name.as_deref())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::variant_not_found(&id))
}

/// `DELETE /variants/{id}`. Siblings are renumbered and get new SKU codes.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteConfirmation>> {
    let id = validate_uuid("id", &id)?;
    Ok(Json(state.db.variants().delete(&id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_unfiltered_ascending() {
        let filter = VariantQuery::default().into_filter().unwrap();
        assert_eq!(filter, VariantFilter::default());
    }

    #[test]
    fn test_query_blank_values_are_absent() {
        let filter = VariantQuery {
            product_id: Some("  ".to_string()),
            search: Some("".to_string()),
            created_by: Some(" ".to_string()),
            sort: Some("".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, VariantFilter::default());
    }

    #[test]
    fn test_query_validation() {
        let bad_sort = VariantQuery {
            sort: Some("UP".to_string()),
            ..Default::default()
        };
        assert!(bad_sort.into_filter().is_err());

        let bad_id = VariantQuery {
            product_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert!(bad_id.into_filter().is_err());

        let upper_id = VariantQuery {
            product_id: Some("550E8400-E29B-41D4-A716-446655440000".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(
            upper_id.product_id.as_deref(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );

        let ok = VariantQuery {
            created_by: Some("alice".to_string()),
            sort: Some("desc".to_string()),
            search: Some(" red ".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(ok.sort, SortOrder::Desc);
        assert_eq!(ok.created_by.as_deref(), Some("alice"));
        assert_eq!(ok.search.as_deref(), Some("red"));
    }
}
