use std::collections::HashMap;

use super::DataError;
use super::model::{Table, Value};

/// Inner join of `left` and `right` on the column `key`, present in both.
///
/// Output columns are every left column followed by every right column
/// except the key. A non-key name present on both sides is suffixed with
/// `_x` (left) and `_y` (right). Rows come out in left order; a left row
/// matching several right rows expands in right order. Missing keys never
/// match.
pub fn inner_join(left: &Table, right: &Table, key: &str) -> Result<Table, DataError> {
    let lkey = left.column_index(key)?;
    let rkey = right.column_index(key)?;

    let right_cols: Vec<usize> = (0..right.columns.len()).filter(|&i| i != rkey).collect();

    let mut columns: Vec<String> = left
        .columns
        .iter()
        .map(|c| {
            if c != key && right.has_column(c) {
                format!("{c}_x")
            } else {
                c.clone()
            }
        })
        .collect();
    columns.extend(right_cols.iter().map(|&i| {
        let c = &right.columns[i];
        if left.has_column(c) {
            format!("{c}_y")
        } else {
            c.clone()
        }
    }));

    let mut index: HashMap<Value, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        if let Some(k) = join_key(&row[rkey]) {
            index.entry(k).or_default().push(i);
        }
    }

    let mut out = Table::new(columns);
    for lrow in &left.rows {
        let Some(k) = join_key(&lrow[lkey]) else {
            continue;
        };
        let Some(matches) = index.get(&k) else {
            continue;
        };
        for &ri in matches {
            let rrow = &right.rows[ri];
            let mut row = lrow.clone();
            row.extend(right_cols.iter().map(|&i| rrow[i].clone()));
            out.push_row(row)?;
        }
    }
    Ok(out)
}

/// Normalised key: integral floats compare equal to integers.
fn join_key(v: &Value) -> Option<Value> {
    if v.is_missing() {
        return None;
    }
    match v {
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(Value::Integer(*f as i64))
        }
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> Table {
        let mut t = Table::new(vec!["id_cliente".into(), "categoria".into(), "score".into()]);
        for (id, c, s) in [(1, "A", 0.1), (2, "B", 0.2), (3, "A", 0.3), (4, "C", 0.4)] {
            t.push_row(vec![
                Value::Integer(id),
                Value::String(c.into()),
                Value::Float(s),
            ])
            .unwrap();
        }
        t
    }

    fn right() -> Table {
        let mut t = Table::new(vec!["id_cliente".into(), "region".into(), "score".into()]);
        t.push_row(vec![Value::Float(3.0), Value::String("sur".into()), Value::Integer(9)])
            .unwrap();
        t.push_row(vec![Value::Integer(1), Value::String("norte".into()), Value::Integer(7)])
            .unwrap();
        t.push_row(vec![Value::Integer(1), Value::String("este".into()), Value::Integer(8)])
            .unwrap();
        t.push_row(vec![Value::Integer(9), Value::String("oeste".into()), Value::Integer(0)])
            .unwrap();
        t.push_row(vec![Value::Null, Value::String("nada".into()), Value::Integer(0)])
            .unwrap();
        t
    }

    #[test]
    fn keeps_only_shared_keys() {
        let out = inner_join(&left(), &right(), "id_cliente").unwrap();
        let ids: Vec<Value> = out
            .column_values("id_cliente")
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(
            ids,
            vec![Value::Integer(1), Value::Integer(1), Value::Integer(3)]
        );
    }

    #[test]
    fn overlapping_columns_get_suffixes() {
        let out = inner_join(&left(), &right(), "id_cliente").unwrap();
        assert_eq!(
            out.columns,
            vec!["id_cliente", "categoria", "score_x", "region", "score_y"]
        );
        assert_eq!(out.rows[0][3], Value::String("norte".into()));
        assert_eq!(out.rows[1][3], Value::String("este".into()));
        assert_eq!(out.rows[2][4], Value::Integer(9));
    }

    #[test]
    fn no_common_keys_gives_empty_result() {
        let mut r = Table::new(vec!["id_cliente".into()]);
        r.push_row(vec![Value::Integer(100)]).unwrap();
        let out = inner_join(&left(), &r, "id_cliente").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns.len(), 3);
    }

    #[test]
    fn key_must_exist_on_both_sides() {
        let r = Table::new(vec!["cliente".into()]);
        assert!(matches!(
            inner_join(&left(), &r, "id_cliente"),
            Err(DataError::MissingColumn(_))
        ));
    }
}
