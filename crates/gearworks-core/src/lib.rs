//! Gearworks Core -- flattens a nested gear catalogue into costed records.
//!
//! The raw catalogue maps a *base id* to one or more *tiers*, and every tier
//! references up to three sub-items through its slots. This crate turns that
//! tree into a flat list of [`record::GearRecord`]s where each record knows its
//! own build cost, the accumulated cost of its whole crafting chain, and the
//! summed raw materials that chain consumes.
//!
//! # Two-Phase Pipeline
//!
//! 1. **Normalize** -- [`normalizer::normalize`] produces one record per
//!    (base id, tier) pair, classifies materials and final items, coerces
//!    numeric-looking fields and builds the base-id lookup table.
//! 2. **Aggregate** -- [`aggregator::aggregate_all`] walks every record's slot
//!    references and writes the resulting [`aggregator::Tally`] back onto it.
//!
//! ```rust,ignore
//! let catalogue = RawItemCatalogue::from_json_str(json)?;
//! let transformed = transform(&catalogue, DEFAULT_MAX_DEPTH)?;
//! for record in &transformed.records {
//!     println!("{} costs {}", record.gear_id, record.total_cost);
//! }
//! ```
//!
//! # Key Types
//!
//! - [`catalogue::RawItemCatalogue`] -- Ordered raw input as read from the store.
//! - [`value::FieldValue`] -- Integer-or-text result of numeric coercion.
//! - [`value::Cost`] -- Build cost that may carry the not-a-number sentinel.
//! - [`record::GearRecord`] -- One flattened, costed item.
//! - [`aggregator::Aggregator`] -- Recursive requirement walk over the records.

pub mod aggregator;
pub mod catalogue;
pub mod id;
pub mod normalizer;
pub mod record;
pub mod transform;
pub mod validation;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregator::{AggregateError, Aggregator, DEFAULT_MAX_DEPTH, Tally, aggregate_all};
pub use catalogue::{CatalogueError, Document, GearFamily, ItemFields, RawFields, RawItemCatalogue};
pub use id::GearId;
pub use normalizer::{GearLookup, Normalized, normalize};
pub use record::{GearMaterial, GearRecord, SlotPosition, SlotRef};
pub use transform::{Transformed, transform};
pub use validation::{CostDefect, NormalizeReport};
pub use value::{Cost, FieldValue};
