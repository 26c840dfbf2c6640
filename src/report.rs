use anyhow::{Context, Result};

use crate::config::ReportConfig;
use crate::data::aggregate::group_stats;
use crate::data::join::inner_join;
use crate::data::loader::{load_file, require_columns};
use crate::data::transform::{derive_column, drop_missing, square};
use crate::data::writer::write_csv;
use crate::data::Table;
use crate::source::RowSource;

/// Everything the pipeline produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Per-category mean / std of the derived column (as written to disk).
    pub summary: Table,
    /// Cleaned rows joined with the external source.
    pub merged: Table,
    /// Rows removed for holding a missing value.
    pub dropped: usize,
}

/// Extract, transform, aggregate, write, and join.
///
/// Steps run in order and the first failure aborts the run. The source is
/// borrowed; closing it is left to the caller.
pub fn run_report<S: RowSource>(source: &mut S, cfg: &ReportConfig) -> Result<ReportOutcome> {
    let mut data = source.query(&cfg.query)?;
    log::info!("Extracted {} rows", data.len());

    require_columns(&data, &[cfg.source_column.as_str(), cfg.category_column.as_str()])?;

    derive_column(&mut data, &cfg.source_column, &cfg.derived_column, square)
        .context("deriving column")?;

    let dropped = drop_missing(&mut data);
    if dropped > 0 {
        log::warn!("Dropped {dropped} rows with missing values");
    }
    log::info!("{} complete rows after cleaning", data.len());

    let summary = group_stats(&data, &cfg.category_column, &cfg.derived_column)
        .context("aggregating report")?;
    write_csv(&summary, &cfg.report_path)?;
    log::info!(
        "Wrote {} categories to {}",
        summary.len(),
        cfg.report_path.display()
    );

    let external = load_file(&cfg.external_path)?;
    log::info!(
        "Loaded {} rows from {}",
        external.len(),
        cfg.external_path.display()
    );

    let merged = inner_join(&data, &external, &cfg.join_key)
        .with_context(|| format!("joining on '{}'", cfg.join_key))?;
    log::info!("Joined dataset has {} rows", merged.len());

    if let Some(path) = &cfg.merged_path {
        write_csv(&merged, path)?;
        log::info!("Wrote joined dataset to {}", path.display());
    }

    Ok(ReportOutcome {
        summary,
        merged,
        dropped,
    })
}
