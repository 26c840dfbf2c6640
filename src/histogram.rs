use std::collections::BTreeMap;

use crate::data::{DataError, Table, Value};

/// Number of bins used when none is requested.
pub const DEFAULT_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Histogram – equal-width bin counts
// ---------------------------------------------------------------------------

/// Frequency distribution over `counts.len()` equal-width bins.
/// `edges` has one more entry than `counts`; the last bin is closed on the
/// right so the maximum value is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range.
    /// NaN and infinite values are ignored.
    ///
    /// * no values → range `[0, 1]`, all counts zero
    /// * all values equal → range `[v - 0.5, v + 0.5]`
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let edges = edges_for(&finite, bins);
        Self::with_edges(&finite, edges)
    }

    /// Bin `values` into the bins described by `edges`. Values outside the
    /// edges are ignored.
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0u64; bins];
        if bins == 0 {
            return Histogram { edges, counts };
        }

        let lo = edges[0];
        let hi = edges[bins];
        let width = (hi - lo) / bins as f64;
        for &v in values {
            if !(lo..=hi).contains(&v) {
                continue;
            }
            // Division can land one bin off next to an edge; the edges decide.
            let mut idx = (((v - lo) / width) as usize).min(bins - 1);
            if v < edges[idx] {
                idx -= 1;
            } else if idx < bins - 1 && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }
        Histogram { edges, counts }
    }

    /// Histogram of one column of `table`. Missing cells are skipped.
    pub fn for_column(table: &Table, column: &str, bins: usize) -> Result<Self, DataError> {
        let values = numeric_values(table, column)?;
        Ok(Self::compute(&values, bins))
    }

    /// Total number of counted values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, .., last] if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Midpoint of each bin, for drawing bars.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// One histogram per distinct value of `group`, all on the same edges so the
/// bars line up.
pub fn split_by(
    table: &Table,
    column: &str,
    group: &str,
    bins: usize,
) -> Result<Vec<(Value, Histogram)>, DataError> {
    let all = numeric_values(table, column)?;
    let edges = edges_for(&all, bins);

    let col_idx = table.column_index(column)?;
    let grp_idx = table.column_index(group)?;
    let mut groups: BTreeMap<Value, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        if let Some(x) = row[col_idx].as_f64().filter(|x| !x.is_nan()) {
            groups.entry(row[grp_idx].clone()).or_default().push(x);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(k, vals)| (k, Histogram::with_edges(&vals, edges.clone())))
        .collect())
}

/// Numeric cells of a column, skipping missing ones. Infinite values have no
/// place on a finite axis and are rejected.
pub fn numeric_values(table: &Table, column: &str) -> Result<Vec<f64>, DataError> {
    let mut out = Vec::with_capacity(table.len());
    for (row, v) in table.column_values(column)?.into_iter().enumerate() {
        if v.is_missing() {
            continue;
        }
        let x = v.as_f64().ok_or_else(|| DataError::NotNumeric {
            column: column.to_string(),
            row,
            value: v.to_string(),
        })?;
        if x.is_infinite() {
            return Err(DataError::NotFinite {
                column: column.to_string(),
                row,
            });
        }
        out.push(x);
    }
    Ok(out)
}

fn edges_for(values: &[f64], bins: usize) -> Vec<f64> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if values.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_does_not_fail() {
        let h = Histogram::compute(&[], DEFAULT_BINS);
        assert_eq!(h.counts, vec![0; 10]);
        assert_eq!(h.edges.first(), Some(&0.0));
        assert_eq!(h.edges.last(), Some(&1.0));
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn counts_every_value_including_max() {
        let values: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let h = Histogram::compute(&values, DEFAULT_BINS);
        assert_eq!(h.total(), 11);
        assert_eq!(h.counts[9], 2);
        assert_eq!(h.counts[0], 1);
        assert!((h.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn values_on_edges_fall_in_the_upper_bin() {
        // 0.1 + 0.07 * k does not divide back to exact integers.
        for n in 2..200 {
            let values: Vec<f64> = (0..n).map(|k| 0.1 + 0.07 * k as f64).collect();
            for bins in [3, 4, 7, 10] {
                let h = Histogram::compute(&values, bins);
                let mut expected = vec![0u64; bins];
                for &v in &values {
                    let idx = (0..bins)
                        .rev()
                        .find(|&i| v >= h.edges[i])
                        .unwrap_or(0);
                    expected[idx] += 1;
                }
                assert_eq!(h.counts, expected, "n={n} bins={bins}");
            }
        }
    }

    #[test]
    fn value_equal_to_first_inner_edge() {
        let edges = vec![0.0, 0.1, 0.2, 0.30000000000000004];
        let h = Histogram::with_edges(&[0.1, 0.2, 0.30000000000000004], edges);
        assert_eq!(h.counts, vec![0, 1, 2]);
    }

    #[test]
    fn infinite_values_do_not_blank_the_chart() {
        let h = Histogram::compute(&[1.0, f64::INFINITY, 3.0, f64::NAN], 2);
        assert_eq!(h.edges, vec![1.0, 2.0, 3.0]);
        assert_eq!(h.counts, vec![1, 1]);
    }

    #[test]
    fn infinite_cell_is_an_error() {
        let mut t = Table::new(vec!["columna_existente".into()]);
        t.push_row(vec![Value::Float(1.0)]).unwrap();
        t.push_row(vec![Value::infer("inf")]).unwrap();
        assert!(matches!(
            Histogram::for_column(&t, "columna_existente", DEFAULT_BINS),
            Err(DataError::NotFinite { row: 1, .. })
        ));
    }

    #[test]
    fn constant_values_get_unit_range() {
        let h = Histogram::compute(&[3.0, 3.0, 3.0], 4);
        assert_eq!(h.edges, vec![2.5, 2.75, 3.0, 3.25, 3.5]);
        assert_eq!(h.counts, vec![0, 0, 3, 0]);
    }

    #[test]
    fn column_skips_missing_and_rejects_text() {
        let mut t = Table::new(vec!["columna_existente".into()]);
        t.push_row(vec![Value::Integer(1)]).unwrap();
        t.push_row(vec![Value::Null]).unwrap();
        t.push_row(vec![Value::Float(2.0)]).unwrap();
        let h = Histogram::for_column(&t, "columna_existente", 2).unwrap();
        assert_eq!(h.counts, vec![1, 1]);

        t.push_row(vec![Value::String("x".into())]).unwrap();
        assert!(Histogram::for_column(&t, "columna_existente", 2).is_err());
    }

    #[test]
    fn empty_column_renders() {
        let t = Table::new(vec!["columna_existente".into()]);
        let h = Histogram::for_column(&t, "columna_existente", DEFAULT_BINS).unwrap();
        assert_eq!(h.total(), 0);
        assert_eq!(h.centers().len(), 10);
    }

    #[test]
    fn groups_share_edges() {
        let mut t = Table::new(vec!["v".into(), "g".into()]);
        for (v, g) in [(0.0, "a"), (1.0, "a"), (4.0, "b")] {
            t.push_row(vec![Value::Float(v), Value::String(g.into())]).unwrap();
        }
        let parts = split_by(&t, "v", "g", 4).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].1.edges, parts[1].1.edges);
        assert_eq!(parts[0].1.counts, vec![1, 1, 0, 0]);
        assert_eq!(parts[1].1.counts, vec![0, 0, 0, 1]);
    }
}
