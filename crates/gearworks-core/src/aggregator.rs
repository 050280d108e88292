//! Recursive requirement walk.
//!
//! For every record, [`Aggregator::tally`] walks the slot references of the
//! record and of every non-material item beneath it, adding each visited
//! item's direct cost to the root's total and merging material leaves into
//! the root's material list with counts scaled by the path multiplier.
//!
//! Two behaviors are pinned by tests:
//!
//! - Costs are added *unscaled*; only material counts carry the multiplier.
//! - References resolve by base id, so a reference to a multi-tier base id
//!   always lands on that base id's last tier.
//!
//! The walk state (the root being tallied) is an explicit `&mut Tally`
//! argument, so independent roots can be tallied in any order or in parallel.

use crate::id::GearId;
use crate::normalizer::GearLookup;
use crate::record::{GearMaterial, GearRecord, SlotPosition, SlotRef};
use crate::value::Cost;

/// Deepest chain of non-material items a walk may descend before it is
/// treated as a cycle.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that abort aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// A slot names a base id that has no record.
    #[error("'{gear_id}' slot {position:?} references unknown base id '{reference}'")]
    UnresolvedReference {
        gear_id: GearId,
        position: SlotPosition,
        reference: String,
    },

    /// A non-empty slot whose count is missing or not an integer.
    #[error("'{gear_id}' slot {position:?} has non-integer count '{raw}'")]
    InvalidSlotCount {
        gear_id: GearId,
        position: SlotPosition,
        raw: String,
    },

    /// A cost sum or scaled count left the `i64` range.
    #[error("arithmetic overflow while tallying '{root}' at '{gear_id}'")]
    Overflow { root: GearId, gear_id: GearId },

    /// The walk went deeper than allowed; the reference graph is cyclic or
    /// unreasonably deep.
    #[error("tallying '{root}' exceeded depth {max_depth} at '{gear_id}'")]
    CycleOrDepthExceeded {
        root: GearId,
        gear_id: GearId,
        max_depth: usize,
    },
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// The accumulators of one root. Written back onto the root record once its
/// walk is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub root: GearId,
    pub total_cost: Cost,
    pub materials: Vec<GearMaterial>,
}

impl Tally {
    pub fn new(root: &GearId) -> Self {
        Self {
            root: root.clone(),
            total_cost: Cost::ZERO,
            materials: Vec::new(),
        }
    }

    /// Add `count` of `material`, summing into an existing entry if one has
    /// the same gear id.
    pub fn merge_material(&mut self, material: &GearRecord, count: i64) -> Result<(), AggregateError> {
        match self
            .materials
            .iter_mut()
            .find(|entry| entry.gear_id == material.gear_id)
        {
            Some(entry) => {
                entry.count = entry
                    .count
                    .checked_add(count)
                    .ok_or_else(|| overflow(&self.root, &material.gear_id))?;
            }
            None => self.materials.push(GearMaterial {
                gear_id: material.gear_id.clone(),
                display_name: material.display_name.clone(),
                count,
            }),
        }
        Ok(())
    }

    /// Write the accumulators onto `record`.
    pub fn apply_to(self, record: &mut GearRecord) {
        debug_assert_eq!(record.gear_id, self.root);
        record.total_cost = self.total_cost;
        record.gear_materials = self.materials;
    }
}

fn overflow(root: &GearId, gear_id: &GearId) -> AggregateError {
    AggregateError::Overflow {
        root: root.clone(),
        gear_id: gear_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Read-only view over the normalized records used to tally roots.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    records: &'a [GearRecord],
    lookup: &'a GearLookup,
    max_depth: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(records: &'a [GearRecord], lookup: &'a GearLookup) -> Self {
        Self {
            records,
            lookup,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The record a reference to `source_id` resolves to.
    pub fn resolve(&self, source_id: &str) -> Option<&'a GearRecord> {
        self.lookup
            .get(source_id)
            .and_then(|index| self.records.get(index))
    }

    /// Walk `root` with multiplier 1 and return its accumulators.
    pub fn tally(&self, root: &GearRecord) -> Result<Tally, AggregateError> {
        let mut tally = Tally::new(&root.gear_id);
        self.accumulate(&mut tally, root, 1)?;
        Ok(tally)
    }

    /// One step of the walk: fold `current`, scaled by `multiplier`, into
    /// `root`. A material `current` contributes nothing.
    pub fn accumulate(
        &self,
        root: &mut Tally,
        current: &GearRecord,
        multiplier: i64,
    ) -> Result<(), AggregateError> {
        self.walk(root, current, multiplier, 0)
    }

    fn walk(
        &self,
        root: &mut Tally,
        current: &GearRecord,
        multiplier: i64,
        depth: usize,
    ) -> Result<(), AggregateError> {
        if current.is_material {
            return Ok(());
        }
        if depth > self.max_depth {
            return Err(AggregateError::CycleOrDepthExceeded {
                root: root.root.clone(),
                gear_id: current.gear_id.clone(),
                max_depth: self.max_depth,
            });
        }

        // Unscaled: the multiplier only applies to material counts.
        root.total_cost = root
            .total_cost
            .checked_add(current.cost)
            .ok_or_else(|| overflow(&root.root, &current.gear_id))?;

        for slot in current.slot_refs() {
            let count = slot_count(current, &slot)?;
            let scaled = count
                .checked_mul(multiplier)
                .ok_or_else(|| overflow(&root.root, &current.gear_id))?;

            let child = self.resolve(&slot.reference).ok_or_else(|| {
                AggregateError::UnresolvedReference {
                    gear_id: current.gear_id.clone(),
                    position: slot.position,
                    reference: slot.reference.clone(),
                }
            })?;

            if child.is_material {
                root.merge_material(child, scaled)?;
            } else {
                self.walk(root, child, scaled, depth + 1)?;
            }
        }

        Ok(())
    }
}

fn slot_count(current: &GearRecord, slot: &SlotRef<'_>) -> Result<i64, AggregateError> {
    slot.count.ok_or_else(|| AggregateError::InvalidSlotCount {
        gear_id: current.gear_id.clone(),
        position: slot.position,
        raw: slot
            .raw_count
            .map_or_else(|| "<missing>".to_string(), ToString::to_string),
    })
}

// ---------------------------------------------------------------------------
// Whole-collection pass
// ---------------------------------------------------------------------------

/// Tally every record and write the results back in place.
#[cfg(not(feature = "parallel"))]
pub fn aggregate_all(
    records: &mut [GearRecord],
    lookup: &GearLookup,
    max_depth: usize,
) -> Result<(), AggregateError> {
    for index in 0..records.len() {
        let tally = Aggregator::new(records, lookup)
            .with_max_depth(max_depth)
            .tally(&records[index])?;
        tally.apply_to(&mut records[index]);
    }
    tracing::debug!(records = records.len(), "aggregated requirements");
    Ok(())
}

/// Tally every record and write the results back in place.
///
/// Roots are tallied in parallel against the read-only records, then
/// written back in order.
#[cfg(feature = "parallel")]
pub fn aggregate_all(
    records: &mut [GearRecord],
    lookup: &GearLookup,
    max_depth: usize,
) -> Result<(), AggregateError> {
    use rayon::prelude::*;

    let tallies: Vec<Tally> = {
        let aggregator = Aggregator::new(records, lookup).with_max_depth(max_depth);
        records
            .par_iter()
            .map(|record| aggregator.tally(record))
            .collect::<Result<_, _>>()?
    };

    for (record, tally) in records.iter_mut().zip(tallies) {
        tally.apply_to(record);
    }
    tracing::debug!(records = records.len(), "aggregated requirements");
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
