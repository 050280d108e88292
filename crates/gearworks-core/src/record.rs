use crate::id::GearId;
use crate::value::{Cost, FieldValue};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// Coerced stats or slots of a record, in source key order.
pub type FieldMap = IndexMap<String, FieldValue>;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One of the three sub-component slots of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotPosition {
    P1,
    P2,
    P3,
}

impl SlotPosition {
    /// Walk order.
    pub const ALL: [SlotPosition; 3] = [SlotPosition::P1, SlotPosition::P2, SlotPosition::P3];

    pub fn id_key(self) -> &'static str {
        match self {
            SlotPosition::P1 => "p1_ID",
            SlotPosition::P2 => "p2_ID",
            SlotPosition::P3 => "p3_ID",
        }
    }

    pub fn count_key(self) -> &'static str {
        match self {
            SlotPosition::P1 => "p1_Count",
            SlotPosition::P2 => "p2_Count",
            SlotPosition::P3 => "p3_Count",
        }
    }
}

/// A non-empty slot reference read off a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRef<'a> {
    pub position: SlotPosition,
    /// Base id of the referenced item.
    pub reference: String,
    /// Required count, `None` when missing or not an integer.
    pub count: Option<i64>,
    pub raw_count: Option<&'a FieldValue>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One raw-material requirement on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearMaterial {
    pub gear_id: GearId,
    pub display_name: String,
    pub count: i64,
}

/// A flattened, costed gear item. Serializes to the wire shape of the output
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearRecord {
    pub gear_id: GearId,
    #[serde(rename = "msf_gg_id")]
    pub source_id: String,
    #[serde(rename = "msf_gg_tier")]
    pub tier: String,
    pub display_name: String,
    #[serde(rename = "pic")]
    pub picture: String,
    pub stats: FieldMap,
    pub slots: FieldMap,
    /// Direct build cost of this item alone.
    pub cost: Cost,
    /// Direct cost plus the cost of every non-material descendant.
    pub total_cost: Cost,
    pub gear_materials: Vec<GearMaterial>,
    pub is_material: bool,
    pub is_final: bool,
}

impl GearRecord {
    /// The slot at `position`, or `None` when its reference is empty.
    pub fn slot(&self, position: SlotPosition) -> Option<SlotRef<'_>> {
        let reference = self.slots.get(position.id_key())?;
        if reference.is_empty_text() {
            return None;
        }

        let raw_count = self.slots.get(position.count_key());
        Some(SlotRef {
            position,
            reference: reference.to_text(),
            count: raw_count.and_then(FieldValue::as_int),
            raw_count,
        })
    }

    /// Non-empty slots in walk order.
    pub fn slot_refs(&self) -> impl Iterator<Item = SlotRef<'_>> {
        SlotPosition::ALL.into_iter().filter_map(|p| self.slot(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record_with_slots;

    #[test]
    fn empty_slots_are_skipped() {
        let record = record_with_slots("A", &[("B", "2"), ("", ""), ("C", "1")]);
        let refs: Vec<_> = record.slot_refs().map(|s| (s.position, s.reference)).collect();
        assert_eq!(
            refs,
            vec![
                (SlotPosition::P1, "B".to_string()),
                (SlotPosition::P3, "C".to_string())
            ]
        );
    }

    #[test]
    fn missing_reference_field_reads_as_empty() {
        let mut record = record_with_slots("A", &[("B", "1")]);
        record.slots.remove("p1_ID");
        assert!(record.slot(SlotPosition::P1).is_none());
    }

    #[test]
    fn numeric_reference_resolves_through_text() {
        let record = record_with_slots("A", &[("105", "3")]);
        let slot = record.slot(SlotPosition::P1).unwrap();
        assert_eq!(slot.reference, "105");
        assert_eq!(slot.count, Some(3));
    }

    #[test]
    fn non_numeric_count_is_none() {
        let record = record_with_slots("A", &[("B", "lots")]);
        let slot = record.slot(SlotPosition::P1).unwrap();
        assert_eq!(slot.count, None);
        assert_eq!(slot.raw_count, Some(&FieldValue::Text("lots".to_string())));
    }

    #[test]
    fn serializes_wire_field_names() {
        let record = record_with_slots("A", &[]);
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "gear_id",
            "msf_gg_id",
            "msf_gg_tier",
            "display_name",
            "pic",
            "stats",
            "slots",
            "cost",
            "total_cost",
            "gear_materials",
            "is_material",
            "is_final",
        ] {
            assert!(object.contains_key(key), "missing wire field {key}");
        }
        assert_eq!(object.len(), 12);
    }
}
