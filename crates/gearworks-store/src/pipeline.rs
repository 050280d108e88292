//! The transform run against a store.
//!
//! A run clears the target collection, reads the source collection, and only
//! if it holds exactly one catalogue document transforms it and bulk-inserts
//! the records. Any fatal error after the clear leaves the target empty; it
//! never holds a partial or stale result.

use crate::loader::StoreError;
use crate::store::DocumentStore;
use gearworks_core::validation::{DanglingReference, dangling_references};
use gearworks_core::{
    AggregateError, CatalogueError, CostDefect, DEFAULT_MAX_DEPTH, Document, GearId,
    RawItemCatalogue, Transformed, aggregate_all, normalize, transform,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which collections a run uses and how deep the walk may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub source_collection: String,
    pub target_collection: String,
    pub max_depth: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            source_collection: "raw_gear".to_string(),
            target_collection: "gear".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes and errors
// ---------------------------------------------------------------------------

/// Fatal errors of a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// A record did not encode to a JSON object.
    #[error("record '{gear_id}' did not encode to a document")]
    NotADocument { gear_id: GearId },
}

/// What a completed run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub inserted: usize,
    pub materials: usize,
    pub finals: usize,
    /// Records whose cost is the not-a-number sentinel.
    pub cost_defects: Vec<CostDefect>,
}

impl RunSummary {
    fn from_transformed(transformed: &Transformed, inserted: usize) -> Self {
        Self {
            inserted,
            materials: transformed.records.iter().filter(|r| r.is_material).count(),
            finals: transformed.records.iter().filter(|r| r.is_final).count(),
            cost_defects: transformed.report.cost_defects.clone(),
        }
    }
}

/// Result of [`run_transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Completed(RunSummary),
    /// The source did not hold exactly one document; nothing was inserted.
    Skipped { documents_found: usize },
}

/// Result of [`dry_run`].
#[derive(Debug, Clone)]
pub enum DryRun {
    Skipped { documents_found: usize },
    /// The catalogue references base ids it does not define.
    Dangling(Vec<DanglingReference>),
    Ready(Transformed),
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Clear the target, transform the single source document and insert the
/// result.
pub fn run_transform<S: DocumentStore + ?Sized>(
    store: &mut S,
    config: &TransformConfig,
) -> Result<TransformOutcome, PipelineError> {
    store.clear(&config.target_collection)?;
    tracing::info!(collection = %config.target_collection, "cleared target collection");

    let catalogue = match load_single_catalogue(&*store, &config.source_collection)? {
        Ok(catalogue) => catalogue,
        Err(documents_found) => return Ok(TransformOutcome::Skipped { documents_found }),
    };

    let transformed = transform(&catalogue, config.max_depth)?;
    let documents = to_documents(&transformed)?;
    let inserted = store.insert_many(&config.target_collection, documents)?;
    tracing::info!(
        collection = %config.target_collection,
        inserted,
        "inserted gear records"
    );

    Ok(TransformOutcome::Completed(RunSummary::from_transformed(
        &transformed,
        inserted,
    )))
}

/// Everything [`run_transform`] does except touching the target. Unresolved
/// references are all reported instead of stopping at the first.
pub fn dry_run<S: DocumentStore + ?Sized>(
    store: &S,
    config: &TransformConfig,
) -> Result<DryRun, PipelineError> {
    let catalogue = match load_single_catalogue(store, &config.source_collection)? {
        Ok(catalogue) => catalogue,
        Err(documents_found) => return Ok(DryRun::Skipped { documents_found }),
    };

    let mut normalized = normalize(&catalogue);
    let dangling = dangling_references(&normalized.records, &normalized.lookup);
    if !dangling.is_empty() {
        return Ok(DryRun::Dangling(dangling));
    }

    aggregate_all(&mut normalized.records, &normalized.lookup, config.max_depth)?;
    Ok(DryRun::Ready(Transformed {
        records: normalized.records,
        report: normalized.report,
    }))
}

/// The catalogue in `collection`, or the number of documents found when that
/// is not exactly one.
fn load_single_catalogue<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
) -> Result<Result<RawItemCatalogue, usize>, PipelineError> {
    let documents = store.fetch_all(collection)?;
    match documents.as_slice() {
        [document] => {
            let catalogue = RawItemCatalogue::from_document(document)?;
            tracing::info!(
                collection,
                base_ids = catalogue.len(),
                items = catalogue.item_count(),
                "loaded raw catalogue"
            );
            Ok(Ok(catalogue))
        }
        _ => {
            tracing::warn!(
                collection,
                found = documents.len(),
                "expected exactly one catalogue document; skipping run"
            );
            Ok(Err(documents.len()))
        }
    }
}

fn to_documents(transformed: &Transformed) -> Result<Vec<Document>, PipelineError> {
    transformed
        .records
        .iter()
        .map(|record| -> Result<Document, PipelineError> {
            match serde_json::to_value(record)? {
                serde_json::Value::Object(document) => Ok(document),
                _ => Err(PipelineError::NotADocument {
                    gear_id: record.gear_id.clone(),
                }),
            }
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================
