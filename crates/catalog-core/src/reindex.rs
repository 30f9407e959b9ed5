//! # Reindexing
//!
//! Pure rules behind the dense `1..N` ordering of products (globally) and
//! variants (per product).
//!
//! ## Delete Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                Delete + Reindex (one write transaction)                 │
//! │                                                                         │
//! │  before:   A(1)   B(2)   C(3)   D(4)                                   │
//! │                    ▲                                                    │
//! │                    └── delete B                                         │
//! │                                                                         │
//! │  survivors ordered by old index:  A(1)  C(3)  D(4)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan()  ← THIS MODULE                                                 │
//! │       │   A stays 1 (not emitted)                                      │
//! │       │   C 3 → 2                                                      │
//! │       │   D 4 → 3                                                      │
//! │       ▼                                                                 │
//! │  repository writes only C and D, then ensure_dense() before COMMIT     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Survivors keep their relative order; only the gap collapses.

use crate::error::{CoreError, CoreResult};

/// A sibling row as seen by the reindexer: its id and current index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: String,
    pub index: i64,
}

impl Slot {
    pub fn new(id: impl Into<String>, index: i64) -> Self {
        Slot {
            id: id.into(),
            index,
        }
    }
}

/// One row whose index has to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renumber {
    pub id: String,
    pub from: i64,
    pub to: i64,
}

/// Computes the renumbering that turns `slots` into the dense sequence
/// `1..=slots.len()`.
///
/// Slots are ordered by current index ascending (id breaks ties, so the
/// result is deterministic). Rows already in place are left out.
///
/// The returned moves are in ascending target order. Applied one at a time,
/// a move after a deletion always targets an index that is already free, so
/// a UNIQUE index on the column never trips mid-way.
pub fn plan(slots: &[Slot]) -> Vec<Renumber> {
    let mut ordered: Vec<&Slot> = slots.iter().collect();
    ordered.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));

    ordered
        .into_iter()
        .zip(1_i64..)
        .filter(|(slot, target)| slot.index != *target)
        .map(|(slot, target)| Renumber {
            id: slot.id.clone(),
            from: slot.index,
            to: target,
        })
        .collect()
}

/// Checks that `indices` is exactly `{1, ..., N}` with no gaps or duplicates.
///
/// ## Arguments
/// * `scope` - Human-readable name of the sibling set, used in the error
/// * `indices` - The indices to check, in any order
pub fn ensure_dense<I>(scope: &str, indices: I) -> CoreResult<()>
where
    I: IntoIterator<Item = i64>,
{
    let mut found: Vec<i64> = indices.into_iter().collect();
    found.sort_unstable();

    let dense = found.iter().zip(1_i64..).all(|(index, want)| *index == want);

    if dense {
        Ok(())
    } else {
        Err(CoreError::IndexNotDense {
            scope: scope.to_string(),
            expected: found.len(),
            found,
        })
    }
}

/// Derives a variant SKU code: `"<productIndex>_<variantIndex>"`.
///
/// ## Example
/// ```rust
/// use catalog_core::derive_sku;
///
/// assert_eq!(derive_sku(5, 2), "5_2");
/// ```
pub fn derive_sku(product_index: i64, variant_index: i64) -> String {
    format!("{}_{}", product_index, variant_index)
}

// =============================================================================
// Unit Tests
// =============================================================================
