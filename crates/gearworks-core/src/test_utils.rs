//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalogue::{ItemFields, RawItemCatalogue};
use crate::id::GearId;
use crate::record::{GearRecord, SlotPosition};
use crate::value::{Cost, FieldValue};

// ===========================================================================
// Item fields
// ===========================================================================

/// Fields of a raw material: a cost and three empty slot references.
pub fn material_fields(name: &str, cost: &str) -> ItemFields {
    crafted_fields(name, cost, &[])
}

/// Fields of a crafted item. `parts` fills slots p1..p3 in order with
/// `(reference, count)`; unused slots get empty references.
pub fn crafted_fields(name: &str, cost: &str, parts: &[(&str, &str)]) -> ItemFields {
    assert!(parts.len() <= 3, "an item has at most three slots");

    let mut fields = ItemFields {
        name: name.to_string(),
        pic: format!("{}.png", name.to_lowercase().replace(' ', "_")),
        ..ItemFields::default()
    };
    fields.slots.insert("cost".to_string(), cost.into());

    for (i, position) in SlotPosition::ALL.iter().enumerate() {
        let (reference, count) = parts.get(i).copied().unwrap_or(("", ""));
        fields.slots.insert(position.id_key().to_string(), reference.into());
        fields.slots.insert(position.count_key().to_string(), count.into());
    }
    fields
}

// ===========================================================================
// Catalogue builder
// ===========================================================================

/// Builds a [`RawItemCatalogue`] in insertion order.
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    catalogue: RawItemCatalogue,
}

impl CatalogueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A base id with exactly one tier, `"1"`.
    pub fn single(self, base_id: &str, fields: ItemFields) -> Self {
        self.tiered(base_id, vec![("1", fields)])
    }

    pub fn tiered(mut self, base_id: &str, tiers: Vec<(&str, ItemFields)>) -> Self {
        let tiers = tiers
            .into_iter()
            .map(|(tier, fields)| (tier.to_string(), fields))
            .collect();
        self.catalogue.push_family(base_id, tiers);
        self
    }

    pub fn build(self) -> RawItemCatalogue {
        self.catalogue
    }
}

/// A linear chain `L0 -> L1 -> ... -> L{depth-1} -> ORE`, each step needing
/// `count` of the next, plus the `ORE` material. Every link costs 1.
pub fn linear_chain(depth: usize, count: u32) -> RawItemCatalogue {
    let mut builder = CatalogueBuilder::new();
    for level in 0..depth {
        let next = if level + 1 == depth {
            "ORE".to_string()
        } else {
            format!("L{}", level + 1)
        };
        let count = count.to_string();
        builder = builder.single(
            &format!("L{level}"),
            crafted_fields(&format!("Link {level}"), "1", &[(next.as_str(), count.as_str())]),
        );
    }
    builder.single("ORE", material_fields("Ore", "1")).build()
}

// ===========================================================================
// Records
// ===========================================================================

/// A standalone non-material record with the given slots, bypassing the
/// normalizer.
pub fn record_with_slots(gear_id: &str, parts: &[(&str, &str)]) -> GearRecord {
    let fields = crafted_fields(gear_id, "1", parts);
    GearRecord {
        gear_id: GearId::from(gear_id),
        source_id: gear_id.to_string(),
        tier: "1".to_string(),
        display_name: fields.name.clone(),
        picture: fields.pic.clone(),
        stats: Default::default(),
        slots: fields
            .slots
            .iter()
            .filter(|(key, _)| key.as_str() != "cost")
            .map(|(key, value)| (key.clone(), FieldValue::coerce(&value.as_text())))
            .collect(),
        cost: Cost::Valid(1),
        total_cost: Cost::ZERO,
        gear_materials: Vec::new(),
        is_material: false,
        is_final: false,
    }
}
