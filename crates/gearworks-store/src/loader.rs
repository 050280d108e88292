//! Collection files: format detection, discovery and (de)serialization.
//!
//! A collection named `raw_gear` lives in `raw_gear.ron`, `raw_gear.toml` or
//! `raw_gear.json` inside the store directory. Every format holds a list of
//! documents; TOML keeps the list under a top-level `documents` key.
//! Collections are always written back as JSON.

use gearworks_core::Document;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// TOML has no top-level arrays; documents sit under this key.
pub const TOML_DOCUMENTS_KEY: &str = "documents";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors raised by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files for the same collection but in different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An entry of a collection file is not an object.
    #[error("entry {index} in {file} is not a document")]
    NotADocument { file: PathBuf, index: usize },

    /// Inserting into a collection held in a format we only read.
    #[error("collection file {file} is read-only; only JSON collections accept inserts")]
    ReadOnlyFormat { file: PathBuf },

    /// Collection names become file names.
    #[error("invalid collection name '{name}'")]
    InvalidCollectionName { name: String },

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported collection file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, StoreError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(StoreError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Reject names that would escape the store directory.
pub fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollectionName {
            name: name.to_string(),
        })
    }
}

/// Scan a directory for the file backing `collection`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// the collection exists in more than one format.
pub fn find_collection_file(dir: &Path, collection: &str) -> Result<Option<PathBuf>, StoreError> {
    validate_collection_name(collection)?;
    let mut found: Option<PathBuf> = None;

    for format in Format::ALL {
        let candidate = dir.join(format!("{collection}.{}", format.extension()));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(StoreError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, StoreError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| StoreError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(e.to_string()))
        }
    }
}

/// Read every document of a collection file.
pub fn read_documents(path: &Path) -> Result<Vec<Document>, StoreError> {
    let values: Vec<serde_json::Value> = deserialize_list(path, TOML_DOCUMENTS_KEY)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            serde_json::Value::Object(document) => Ok(document),
            _ => Err(StoreError::NotADocument {
                file: path.to_path_buf(),
                index,
            }),
        })
        .collect()
}

/// Write `documents` to `path` as pretty JSON, replacing the file atomically:
/// the data goes to a sibling temp file that is then renamed over `path`.
pub fn write_documents(path: &Path, documents: &[Document]) -> Result<(), StoreError> {
    let mut body = serde_json::to_string_pretty(documents)?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gearworks_loader_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_known_extensions() {
        assert_eq!(detect_format(Path::new("raw_gear.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("raw_gear.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("raw_gear.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["raw_gear.yaml", "raw_gear"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(StoreError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // Collection names and discovery
    // -----------------------------------------------------------------------

    #[test]
    fn collection_names_are_validated() {
        assert!(validate_collection_name("raw_gear").is_ok());
        assert!(validate_collection_name("gear-v2").is_ok());
        for bad in ["", "../gear", "a/b", "gear.json"] {
            assert!(
                matches!(
                    validate_collection_name(bad),
                    Err(StoreError::InvalidCollectionName { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn find_collection_file_found() {
        let dir = make_test_dir("find_found");
        fs::write(dir.join("raw_gear.ron"), "[]").unwrap();

        let result = find_collection_file(&dir, "raw_gear").unwrap();
        assert_eq!(result, Some(dir.join("raw_gear.ron")));

        cleanup(&dir);
    }

    #[test]
    fn find_collection_file_missing() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_collection_file(&dir, "raw_gear").unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_collection_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("raw_gear.ron"), "[]").unwrap();
        fs::write(dir.join("raw_gear.json"), "[]").unwrap();

        let result = find_collection_file(&dir, "raw_gear");
        assert!(matches!(result, Err(StoreError::ConflictingFormats { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // read_documents
    // -----------------------------------------------------------------------

    #[test]
    fn read_documents_json() {
        let dir = make_test_dir("read_json");
        let path = dir.join("raw_gear.json");
        fs::write(&path, r#"[{"ORE": {"1": {"name": "Ore"}}}]"#).unwrap();

        let documents = read_documents(&path).unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].contains_key("ORE"));

        cleanup(&dir);
    }

    #[test]
    fn read_documents_ron() {
        let dir = make_test_dir("read_ron");
        let path = dir.join("raw_gear.ron");
        fs::write(&path, r#"[{"ORE": {"1": {"name": "Ore"}}}, {"FLUX": {}}]"#).unwrap();

        let documents = read_documents(&path).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[1].contains_key("FLUX"));

        cleanup(&dir);
    }

    #[test]
    fn read_documents_toml() {
        let dir = make_test_dir("read_toml");
        let path = dir.join("raw_gear.toml");
        fs::write(
            &path,
            r#"
[[documents]]
[documents.ORE.1]
name = "Ore"
slots = { cost = "1", p1_ID = "", p2_ID = "", p3_ID = "" }
"#,
        )
        .unwrap();

        let documents = read_documents(&path).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["ORE"]["1"]["name"], "Ore");

        cleanup(&dir);
    }

    #[test]
    fn read_documents_toml_keeps_table_order() {
        let dir = make_test_dir("read_toml_order");
        let path = dir.join("raw_gear.toml");
        fs::write(
            &path,
            r#"
[[documents]]
[documents.ZKIT.1]
name = "Kit"
[documents.BLADE.2]
name = "Blade II"
[documents.BLADE.10]
name = "Blade X"
[documents.ORE.1]
name = "Ore"
"#,
        )
        .unwrap();

        let documents = read_documents(&path).unwrap();
        let base_ids: Vec<_> = documents[0].keys().map(String::as_str).collect();
        assert_eq!(base_ids, vec!["ZKIT", "BLADE", "ORE"]);
        let tiers: Vec<_> = documents[0]["BLADE"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(tiers, vec!["2", "10"]);

        cleanup(&dir);
    }

    #[test]
    fn read_documents_toml_missing_key() {
        let dir = make_test_dir("read_toml_missing");
        let path = dir.join("raw_gear.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result = read_documents(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn read_documents_rejects_non_objects() {
        let dir = make_test_dir("read_non_object");
        let path = dir.join("raw_gear.json");
        fs::write(&path, r#"[{}, 42]"#).unwrap();

        let result = read_documents(&path);
        assert!(matches!(result, Err(StoreError::NotADocument { index: 1, .. })));

        cleanup(&dir);
    }

    #[test]
    fn read_documents_parse_error() {
        let dir = make_test_dir("read_parse_err");
        let path = dir.join("raw_gear.json");
        fs::write(&path, "this is not valid JSON {{{").unwrap();

        assert!(matches!(read_documents(&path), Err(StoreError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // write_documents
    // -----------------------------------------------------------------------

    #[test]
    fn write_then_read_keeps_key_order() {
        let dir = make_test_dir("write_order");
        let path = dir.join("gear.json");
        let mut document = Document::new();
        document.insert("zeta".into(), 1.into());
        document.insert("alpha".into(), 2.into());

        write_documents(&path, &[document]).unwrap();
        let back = read_documents(&path).unwrap();
        let keys: Vec<_> = back[0].keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert!(!dir.join("gear.json.tmp").exists());

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = StoreError::ConflictingFormats {
            a: PathBuf::from("raw_gear.ron"),
            b: PathBuf::from("raw_gear.json"),
        };
        let msg = format!("{e}");
        assert!(msg.contains("raw_gear.ron"));
        assert!(msg.contains("raw_gear.json"));

        let e = StoreError::ReadOnlyFormat {
            file: PathBuf::from("gear.toml"),
        };
        assert!(format!("{e}").contains("gear.toml"));

        let e = StoreError::InvalidCollectionName {
            name: "../x".to_string(),
        };
        assert!(format!("{e}").contains("../x"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(format!("{err}").contains("file not found"));
    }
}
