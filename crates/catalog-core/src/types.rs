//! # Domain Types
//!
//! Core domain and wire types used throughout the catalog manager.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1   *  ┌─────────────────┐   ┌────────────────┐  │
//! │  │    Product      │────────►│    Variant      │   │     User       │  │
//! │  │  ─────────────  │         │  ─────────────  │   │  ────────────  │  │
//! │  │  id (UUID)      │         │  id (UUID)      │   │  id (UUID)     │  │
//! │  │  name           │         │  name           │   │  username      │  │
//! │  │  index 1..N     │         │  index 1..M     │   │  password_hash │  │
//! │  └─────────────────┘         │  sku_code "p_v" │   └────────────────┘  │
//! │                              │  created_by     │                       │
//! │                              │  product_id(FK) │                       │
//! │                              └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names go over the wire in camelCase (`skuCode`, `productId`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, 1..=120 characters.
    pub name: String,

    /// Position in the global product list, dense 1..N.
    pub index: i64,
}

// =============================================================================
// Variant
// =============================================================================

/// A variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variant {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, 1..=120 characters.
    pub name: String,

    /// Position among the variants of the same product, dense 1..M.
    pub index: i64,

    /// `"<productIndex>_<variantIndex>"`, rewritten whenever either index moves.
    pub sku_code: String,

    /// Username of whoever created the variant.
    pub created_by: String,

    /// Owning product.
    pub product_id: String,
}

/// A variant with its owning product, as returned by `GET /variants`.
///
/// The variant's own fields stay at the top level; the product sits under
/// `product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantListing {
    #[serde(flatten)]
    pub variant: Variant,

    pub product: Product,
}

// =============================================================================
// User
// =============================================================================

/// A dashboard user account.
///
/// Never serialized as a whole; see [`UserSummary`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        UserSummary {
            id: u.id,
            username: u.username,
        }
    }
}

// =============================================================================
// Variant Listing
// =============================================================================

/// Ordering of a variant listing by `index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this ordering.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: vec!["ASC".to_string(), "DESC".to_string()],
            }),
        }
    }
}

/// Filters for listing variants. Every filter is optional and they combine
/// with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantFilter {
    /// Only variants of this product.
    pub product_id: Option<String>,

    /// Only variants created by this user (exact match).
    pub created_by: Option<String>,

    /// Case-insensitive substring match on name OR SKU code.
    pub search: Option<String>,

    /// Order by index.
    pub sort: SortOrder,
}

impl VariantFilter {
    pub fn for_product(product_id: impl Into<String>) -> Self {
        VariantFilter {
            product_id: Some(product_id.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Requests / Responses
// =============================================================================

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateProductRequest {
    pub name: String,
}

/// Body of `PUT/PATCH /products/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /variants`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateVariantRequest {
    pub product_id: String,
    pub name: String,
}

/// Body of `PUT/PATCH /variants/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateVariantRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// Result of a delete (with the reindex that followed it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteConfirmation {
    pub id: String,
    pub deleted: bool,
    pub message: String,
}

impl DeleteConfirmation {
    pub fn product(id: impl Into<String>) -> Self {
        DeleteConfirmation {
            id: id.into(),
            deleted: true,
            message: "Product deleted successfully".to_string(),
        }
    }

    pub fn variant(id: impl Into<String>) -> Self {
        DeleteConfirmation {
            id: id.into(),
            deleted: true,
            message: "Variant deleted successfully".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn test_variant_serializes_camel_case() {
        let v = Variant {
            id: "v1".to_string(),
            name: "Red 42".to_string(),
            index: 1,
            sku_code: "1_1".to_string(),
            created_by: "test".to_string(),
            product_id: "p1".to_string(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["skuCode"], "1_1");
        assert_eq!(json["createdBy"], "test");
        assert_eq!(json["productId"], "p1");
    }

    #[test]
    fn test_variant_listing_nests_product() {
        let listing = VariantListing {
            variant: Variant {
                id: "v1".to_string(),
                name: "Red 42".to_string(),
                index: 1,
                sku_code: "2_1".to_string(),
                created_by: "test".to_string(),
                product_id: "p2".to_string(),
            },
            product: Product {
                id: "p2".to_string(),
                name: "Classic Shoes".to_string(),
                index: 2,
            },
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["skuCode"], "2_1");
        assert_eq!(json["product"]["name"], "Classic Shoes");
        assert_eq!(json["product"]["index"], 2);
    }

    #[test]
    fn test_create_variant_request_reads_camel_case() {
        let req: CreateVariantRequest =
            serde_json::from_str(r#"{"productId":"p1","name":"Blue 43"}"#).unwrap();
        assert_eq!(req.product_id, "p1");
        assert_eq!(req.name, "Blue 43");
    }

    #[test]
    fn test_update_request_name_is_optional() {
        let req: UpdateProductRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
    }

    #[test]
    fn test_delete_confirmation_messages() {
        let c = DeleteConfirmation::product("p1");
        assert!(c.deleted);
        assert_eq!(c.message, "Product deleted successfully");
        assert_eq!(
            DeleteConfirmation::variant("v1").message,
            "Variant deleted successfully"
        );
    }
}
