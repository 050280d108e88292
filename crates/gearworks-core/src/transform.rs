//! Whole-dataset transform: normalize, then aggregate every record.

use crate::aggregator::{AggregateError, aggregate_all};
use crate::catalogue::RawItemCatalogue;
use crate::normalizer::normalize;
use crate::record::GearRecord;
use crate::validation::NormalizeReport;

/// Result of a successful transform.
#[derive(Debug, Clone, Default)]
pub struct Transformed {
    /// Flattened records in catalogue order, with accumulators filled in.
    pub records: Vec<GearRecord>,
    pub report: NormalizeReport,
}

/// Run the full transform over one catalogue.
///
/// Either every record is tallied or an error is returned and nothing is
/// produced.
pub fn transform(catalogue: &RawItemCatalogue, max_depth: usize) -> Result<Transformed, AggregateError> {
    let mut normalized = normalize(catalogue);
    aggregate_all(&mut normalized.records, &normalized.lookup, max_depth)?;

    let materials = normalized.records.iter().filter(|r| r.is_material).count();
    let finals = normalized.records.iter().filter(|r| r.is_final).count();
    tracing::info!(
        records = normalized.records.len(),
        materials,
        finals,
        cost_defects = normalized.report.cost_defects.len(),
        "transformed catalogue"
    );

    Ok(Transformed {
        records: normalized.records,
        report: normalized.report,
    })
}
