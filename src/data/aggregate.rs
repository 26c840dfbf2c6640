use std::collections::BTreeMap;

use super::DataError;
use super::model::{Table, Value};

/// Mean and sample standard deviation of `value`, one row per distinct `key`.
///
/// Output columns are `key`, `<value>_mean`, `<value>_std`, rows sorted by
/// key. Missing values of `value` are skipped. Standard deviation uses the
/// n − 1 denominator, so a group with a single value has a NaN deviation.
pub fn group_stats(table: &Table, key: &str, value: &str) -> Result<Table, DataError> {
    let key_idx = table.column_index(key)?;
    let val_idx = table.column_index(value)?;

    let mut groups: BTreeMap<Value, Vec<f64>> = BTreeMap::new();
    for (row, values) in table.rows.iter().enumerate() {
        let samples = groups.entry(values[key_idx].clone()).or_default();
        let v = &values[val_idx];
        if v.is_missing() {
            continue;
        }
        let x = v.as_f64().ok_or_else(|| DataError::NotNumeric {
            column: value.to_string(),
            row,
            value: v.to_string(),
        })?;
        samples.push(x);
    }

    let mut out = Table::new(vec![
        key.to_string(),
        format!("{value}_mean"),
        format!("{value}_std"),
    ]);
    for (k, samples) in groups {
        let (mean, std) = mean_std(&samples);
        out.push_row(vec![k, Value::Float(mean), Value::Float(std)])?;
    }
    Ok(out)
}

/// `(mean, sample std)`; NaN where undefined.
fn mean_std(samples: &[f64]) -> (f64, f64) {
    let n = samples.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, f64::NAN);
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, variance.sqrt())
}
