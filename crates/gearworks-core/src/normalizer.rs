//! Flattens the raw catalogue into [`GearRecord`]s.
//!
//! One record is produced per (base id, tier) pair, in catalogue order. The
//! accompanying [`GearLookup`] is keyed by *base id*; for a multi-tier base id
//! the last tier produced is the one slot references resolve to.

use crate::catalogue::{ItemFields, RawFields, RawItemCatalogue};
use crate::id::GearId;
use crate::record::{FieldMap, GearRecord, SlotPosition};
use crate::validation::{CostDefect, NormalizeReport};
use crate::value::{Cost, FieldValue};
use std::collections::HashMap;

/// Slot field holding the direct cost. Parsed on its own, never coerced into
/// the slot map.
pub const COST_KEY: &str = "cost";

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

/// Base id to record index. Holds exactly one entry per base id.
#[derive(Debug, Clone, Default)]
pub struct GearLookup {
    by_source: HashMap<String, usize>,
}

impl GearLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `source_id` at `index`, replacing any earlier tier.
    pub fn insert(&mut self, source_id: &str, index: usize) {
        self.by_source.insert(source_id.to_string(), index);
    }

    /// Index of the record a reference to `source_id` resolves to.
    pub fn get(&self, source_id: &str) -> Option<usize> {
        self.by_source.get(source_id).copied()
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.by_source.contains_key(source_id)
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<GearRecord>,
    pub lookup: GearLookup,
    pub report: NormalizeReport,
}

/// Flatten a catalogue. Never fails; unparseable costs are listed in the
/// report instead.
pub fn normalize(catalogue: &RawItemCatalogue) -> Normalized {
    let mut out = Normalized {
        records: Vec::with_capacity(catalogue.item_count()),
        ..Normalized::default()
    };

    for family in catalogue.families() {
        let apply_prefix = family.is_multi_tier();

        for (tier, fields) in &family.tiers {
            let record = build_record(&family.base_id, tier, fields, apply_prefix);

            if !record.cost.is_valid() {
                let raw = fields.slot_text(COST_KEY).into_owned();
                tracing::warn!(gear_id = %record.gear_id, raw_cost = %raw, "cost is not a number");
                out.report.cost_defects.push(CostDefect {
                    gear_id: record.gear_id.clone(),
                    raw,
                });
            }

            let index = out.records.len();
            out.records.push(record);
            out.lookup.insert(&family.base_id, index);
        }
    }

    tracing::debug!(
        records = out.records.len(),
        base_ids = out.lookup.len(),
        "normalized catalogue"
    );
    out
}

fn build_record(base_id: &str, tier: &str, fields: &ItemFields, apply_prefix: bool) -> GearRecord {
    let is_material = !apply_prefix
        && SlotPosition::ALL
            .iter()
            .all(|p| fields.slot_text(p.id_key()).is_empty());

    GearRecord {
        gear_id: GearId::for_tier(base_id, tier, apply_prefix),
        source_id: base_id.to_string(),
        tier: tier.to_string(),
        display_name: fields.name.clone(),
        picture: fields.pic.clone(),
        stats: coerce_fields(&fields.stats),
        slots: coerce_fields(&fields.slots),
        cost: Cost::parse(&fields.slot_text(COST_KEY)),
        total_cost: Cost::ZERO,
        gear_materials: Vec::new(),
        is_material,
        is_final: apply_prefix,
    }
}

/// Coerce every field except `cost`.
fn coerce_fields(raw: &RawFields) -> FieldMap {
    raw.iter()
        .filter(|(key, _)| key.as_str() != COST_KEY)
        .map(|(key, value)| (key.clone(), FieldValue::coerce(&value.as_text())))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================
