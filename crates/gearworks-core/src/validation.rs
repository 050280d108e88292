//! Data-quality reporting for a transform run.
//!
//! Nothing here stops a run. Cost defects are collected by the normalizer;
//! [`dangling_references`] lets callers list every unresolved slot reference
//! up front instead of stopping at the first one during aggregation.

use crate::id::GearId;
use crate::normalizer::GearLookup;
use crate::record::{GearRecord, SlotPosition};

/// A record whose raw cost did not parse as an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostDefect {
    pub gear_id: GearId,
    /// The raw cost text as found in the catalogue.
    pub raw: String,
}

/// Defects found while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub cost_defects: Vec<CostDefect>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.cost_defects.is_empty()
    }
}

/// A slot reference naming a base id that has no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub gear_id: GearId,
    pub position: SlotPosition,
    pub reference: String,
}

/// Every slot reference in `records` that the lookup cannot resolve.
///
/// Material records are skipped: they are never walked, so their slots are
/// never resolved.
pub fn dangling_references(records: &[GearRecord], lookup: &GearLookup) -> Vec<DanglingReference> {
    records
        .iter()
        .filter(|record| !record.is_material)
        .flat_map(|record| {
            record
                .slot_refs()
                .filter(move |slot| !lookup.contains(&slot.reference))
                .map(move |slot| DanglingReference {
                    gear_id: record.gear_id.clone(),
                    position: slot.position,
                    reference: slot.reference,
                })
        })
        .collect()
}
