use std::path::{Path, PathBuf};

use eframe::egui::Color32;

use crate::color::{ColorMap, SINGLE_SERIES};
use crate::config::HistogramConfig;
use crate::data::loader::load_file;
use crate::data::Table;
use crate::histogram::{Histogram, split_by};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// One set of bars on the plot.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    pub histogram: Histogram,
}

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Loaded table (None until a file loads successfully).
    pub table: Option<Table>,

    /// File the table came from.
    pub source: Option<PathBuf>,

    /// Column, grouping, bins and labels.
    pub config: HistogramConfig,

    /// Bars to draw, recomputed whenever the table or settings change.
    pub series: Vec<Series>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(config: HistogramConfig) -> Self {
        Self {
            table: None,
            source: None,
            config,
            series: Vec::new(),
            status_message: None,
        }
    }

    /// Load `path` and recompute the histogram. Errors end up in
    /// `status_message` and the log; the previous table is kept.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.len(),
                    table.columns
                );
                self.set_table(table, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load the configured input for the first window. Unlike [`open`], a
    /// missing file or column is an error so the run ends before any window
    /// is shown.
    ///
    /// [`open`]: ViewerState::open
    pub fn load(config: HistogramConfig) -> anyhow::Result<Self> {
        let input = config.input.clone();
        let table = load_file(&input)?;
        log::info!(
            "Loaded {} rows with columns {:?}",
            table.len(),
            table.columns
        );

        let mut state = ViewerState::new(config);
        state.set_table(table, &input);
        if let Some(msg) = &state.status_message {
            anyhow::bail!("{}: {msg}", input.display());
        }
        Ok(state)
    }

    /// Ingest a newly loaded table. A missing column or grouping column is
    /// reported through `status_message`; nothing is substituted.
    pub fn set_table(&mut self, table: Table, path: &Path) {
        self.table = Some(table);
        self.source = Some(path.to_path_buf());
        self.recompute();
    }

    /// Rebuild `series` from the current table and settings.
    pub fn recompute(&mut self) {
        self.series.clear();
        let Some(table) = &self.table else {
            return;
        };

        let result = match &self.config.group_by {
            None => Histogram::for_column(table, &self.config.column, self.config.bins).map(
                |histogram| {
                    vec![Series {
                        name: self.config.column.clone(),
                        color: SINGLE_SERIES,
                        histogram,
                    }]
                },
            ),
            Some(group) => split_by(table, &self.config.column, group, self.config.bins).map(
                |parts| {
                    let colors = ColorMap::new(parts.iter().map(|(k, _)| k));
                    parts
                        .into_iter()
                        .map(|(k, histogram)| Series {
                            name: format!("{group} = {k}"),
                            color: colors.color_for(&k),
                            histogram,
                        })
                        .collect()
                },
            ),
        };

        match result {
            Ok(series) => {
                self.series = series;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot build histogram: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn set_column(&mut self, column: String) {
        self.config.column = column;
        self.recompute();
    }

    pub fn set_group_by(&mut self, group: Option<String>) {
        self.config.group_by = group;
        self.recompute();
    }

    pub fn set_bins(&mut self, bins: usize) {
        self.config.bins = bins.max(1);
        self.recompute();
    }

    /// Total values plotted across all series.
    pub fn plotted(&self) -> u64 {
        self.series.iter().map(|s| s.histogram.total()).sum()
    }
}
