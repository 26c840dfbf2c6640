use super::DataError;
use super::model::{Table, Value};

/// Element-wise square.
pub fn square(x: f64) -> f64 {
    x * x
}

/// Compute `target` from `source` with `f`, appending it as the last column
/// (or overwriting it in place when a column of that name already exists).
///
/// Missing inputs produce `Null`. Any other non-numeric input is an error.
pub fn derive_column<F>(
    table: &mut Table,
    source: &str,
    target: &str,
    f: F,
) -> Result<(), DataError>
where
    F: Fn(f64) -> f64,
{
    let src = table.column_index(source)?;

    let derived = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, values)| {
            let v = &values[src];
            if v.is_missing() {
                return Ok(Value::Null);
            }
            v.as_f64()
                .map(|x| Value::Float(f(x)))
                .ok_or_else(|| DataError::NotNumeric {
                    column: source.to_string(),
                    row,
                    value: v.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match table.column_index(target) {
        Ok(dst) => {
            for (values, v) in table.rows.iter_mut().zip(derived) {
                values[dst] = v;
            }
        }
        Err(_) => {
            table.columns.push(target.to_string());
            for (values, v) in table.rows.iter_mut().zip(derived) {
                values.push(v);
            }
        }
    }
    Ok(())
}

/// Remove every row that has a missing value in any column.
/// Returns the number of rows dropped.
pub fn drop_missing(table: &mut Table) -> usize {
    let before = table.len();
    table.rows.retain(|row| !row.iter().any(Value::is_missing));
    before - table.len()
}
