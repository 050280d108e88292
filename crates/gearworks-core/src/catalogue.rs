//! Raw gear catalogue as supplied by the store.
//!
//! A catalogue document maps every *base id* to a mapping of *tier id* to
//! [`ItemFields`]. Iteration order is the document's order and drives the
//! order of the flattened output.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::borrow::Cow;

/// Raw stats or slots of one tier, in document order.
pub type RawFields = IndexMap<String, RawScalar>;

/// A store document: an ordered JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Key under which the store keeps its own document id. Never a gear family.
pub const DOCUMENT_ID_KEY: &str = "_id";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors raised while reading a catalogue document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The document is valid JSON but not an object.
    #[error("catalogue document must be an object")]
    NotAnObject,

    /// A base id maps to something other than a tier table.
    #[error("gear family '{base_id}' is not a table of tiers")]
    NotAFamily { base_id: String },

    /// A tier's fields could not be read.
    #[error("invalid item '{base_id}' tier '{tier}': {detail}")]
    InvalidItem {
        base_id: String,
        tier: String,
        detail: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// ===========================================================================
// Raw fields
// ===========================================================================

/// A raw scalar as found in the document. The catalogue normally stores
/// strings, but numbers and booleans are accepted and read through their text.
/// `null` reads as empty text, the same as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl RawScalar {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawScalar::Text(text) => Cow::Borrowed(text),
            RawScalar::Int(value) => Cow::Owned(value.to_string()),
            RawScalar::Float(value) => Cow::Owned(value.to_string()),
            RawScalar::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            RawScalar::Null => Cow::Borrowed(""),
        }
    }
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        RawScalar::Text(value.to_string())
    }
}

/// The fields of one tier of one base id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pic: String,
    #[serde(default)]
    pub stats: RawFields,
    /// Direct cost plus `p{1,2,3}_ID` / `p{1,2,3}_Count` references and any
    /// stat-like extras.
    #[serde(default)]
    pub slots: RawFields,
}

impl ItemFields {
    /// Raw text of a slot field. A missing field reads as empty.
    pub fn slot_text(&self, key: &str) -> Cow<'_, str> {
        self.slots
            .get(key)
            .map_or(Cow::Borrowed(""), RawScalar::as_text)
    }
}

// ===========================================================================
// Catalogue
// ===========================================================================

/// All tiers of one base id, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct GearFamily {
    pub base_id: String,
    pub tiers: Vec<(String, ItemFields)>,
}

impl GearFamily {
    /// Whether tier ids must be folded into the gear ids of this family.
    pub fn is_multi_tier(&self) -> bool {
        self.tiers.len() > 1
    }
}

/// The full raw input. Immutable once read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItemCatalogue {
    families: Vec<GearFamily>,
}

impl RawItemCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a catalogue from a store document, skipping the document id.
    pub fn from_document(document: &Document) -> Result<Self, CatalogueError> {
        let mut catalogue = Self::new();

        for (base_id, family) in document {
            if base_id == DOCUMENT_ID_KEY {
                continue;
            }

            let tiers = family
                .as_object()
                .ok_or_else(|| CatalogueError::NotAFamily {
                    base_id: base_id.clone(),
                })?;

            let mut parsed = Vec::with_capacity(tiers.len());
            for (tier, fields) in tiers {
                let fields = ItemFields::deserialize(fields).map_err(|e| {
                    CatalogueError::InvalidItem {
                        base_id: base_id.clone(),
                        tier: tier.clone(),
                        detail: e.to_string(),
                    }
                })?;
                parsed.push((tier.clone(), fields));
            }

            catalogue.push_family(base_id, parsed);
        }

        Ok(catalogue)
    }

    /// Read a catalogue from a JSON object string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Object(document) => Self::from_document(&document),
            _ => Err(CatalogueError::NotAnObject),
        }
    }

    /// Add a family. A base id that is already present has its tiers replaced
    /// in place, the same way a repeated object key would.
    pub fn push_family(&mut self, base_id: &str, tiers: Vec<(String, ItemFields)>) {
        if let Some(existing) = self.families.iter_mut().find(|f| f.base_id == base_id) {
            existing.tiers = tiers;
            return;
        }
        self.families.push(GearFamily {
            base_id: base_id.to_string(),
            tiers,
        });
    }

    pub fn families(&self) -> &[GearFamily] {
        &self.families
    }

    /// Number of base ids.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Number of (base id, tier) pairs, i.e. the number of records the
    /// normalizer will produce.
    pub fn item_count(&self) -> usize {
        self.families.iter().map(|f| f.tiers.len()).sum()
    }

    /// Convert back into a store document.
    pub fn to_document(&self) -> Result<Document, CatalogueError> {
        let mut document = Document::new();
        for family in &self.families {
            let mut tiers = serde_json::Map::new();
            for (tier, fields) in &family.tiers {
                tiers.insert(tier.clone(), serde_json::to_value(fields)?);
            }
            document.insert(family.base_id.clone(), serde_json::Value::Object(tiers));
        }
        Ok(document)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
