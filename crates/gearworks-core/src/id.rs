use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a flattened gear record.
///
/// Equal to the base id for single-tier items and `T{tier}_{base}` when the
/// base id has several tiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GearId(pub String);

impl GearId {
    /// Build the identifier for one tier of a base id.
    pub fn for_tier(base_id: &str, tier: &str, apply_prefix: bool) -> Self {
        if apply_prefix {
            GearId(format!("T{tier}_{base_id}"))
        } else {
            GearId(base_id.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GearId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GearId {
    fn from(value: &str) -> Self {
        GearId(value.to_string())
    }
}

impl PartialEq<str> for GearId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GearId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
