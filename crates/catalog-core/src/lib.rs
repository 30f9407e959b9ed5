//! # catalog-core: Pure Business Logic for the Catalog Manager
//!
//! This crate holds the rules that keep the catalog consistent, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Manager Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (browser)                          │   │
//! │  │       Products table ──► Variants table ──► Forms               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-api (axum)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  reindex  │  │ validation│  │   error   │  │   │
//! │  │   │  Product  │  │   plan    │  │   names   │  │ CoreError │  │   │
//! │  │   │  Variant  │  │  SKU code │  │    ids    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  catalog-db (Database Layer)                    │   │
//! │  │         SQLite queries, migrations, reindex transactions        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain and wire types (Product, Variant, filters, requests)
//! - [`reindex`] - Dense renumbering plan, SKU derivation, invariant checks
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::reindex::{plan, Slot};
//!
//! // Products "b" and "c" survive after index 1 was deleted.
//! let survivors = vec![Slot::new("b", 2), Slot::new("c", 3)];
//! let moves = plan(&survivors);
//!
//! assert_eq!(moves.len(), 2);
//! assert_eq!((moves[0].id.as_str(), moves[0].to), ("b", 1));
//! assert_eq!((moves[1].id.as_str(), moves[1].to), ("c", 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reindex;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use reindex::derive_sku;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length (in characters) of a product or variant name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a variant search term.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Recorded as `created_by` when a variant is created without an
/// authenticated identity.
pub const DEFAULT_CREATED_BY: &str = "system";
