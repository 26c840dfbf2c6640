use std::collections::BTreeSet;
use std::fmt;

use super::DataError;

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a grouping and join key downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet / BTreeMap --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// `Null` and NaN floats count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Text written to CSV. Missing values become an empty field and floats
    /// keep full precision (unlike `Display`, which is meant for the UI).
    pub fn to_field(&self) -> String {
        match self {
            v if v.is_missing() => String::new(),
            Value::Float(v) => v.to_string(),
            other => other.to_string(),
        }
    }

    /// Infer a value from its text form (CSV cells, database text results).
    pub fn infer(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        if looks_like_date(s) {
            return Value::Date(s.to_string());
        }
        Value::String(s.to_string())
    }
}

/// `YYYY-MM-DD`, digits only.
fn looks_like_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Table – an ordered collection of rows
// ---------------------------------------------------------------------------

/// Row-oriented tabular dataset. Every row holds exactly one value per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Rows, each `columns.len()` wide.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, rejecting rows whose width differs from the header.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), DataError> {
        if row.len() != self.columns.len() {
            return Err(DataError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>, DataError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Sorted set of distinct values of one column.
    pub fn unique_values(&self, name: &str) -> Result<BTreeSet<Value>, DataError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("42"), Value::Integer(42));
        assert_eq!(Value::infer("2.5"), Value::Float(2.5));
        assert_eq!(Value::infer("true"), Value::Bool(true));
        assert_eq!(Value::infer("2022-01-01"), Value::Date("2022-01-01".into()));
        assert_eq!(Value::infer("norte"), Value::String("norte".into()));
        assert!(Value::infer("NaN").is_missing());
    }

    #[test]
    fn push_row_checks_width() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Value::Integer(1), Value::Null]).unwrap();
        let err = t.push_row(vec![Value::Integer(1)]).unwrap_err();
        assert!(matches!(err, DataError::RowWidth { expected: 2, found: 1, .. }));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let t = Table::new(vec!["a".into()]);
        assert!(matches!(
            t.column_index("b"),
            Err(DataError::MissingColumn(c)) if c == "b"
        ));
    }

    #[test]
    fn unique_values_are_sorted() {
        let mut t = Table::new(vec!["categoria".into()]);
        for c in ["B", "A", "B", "C"] {
            t.push_row(vec![Value::String(c.into())]).unwrap();
        }
        let unique: Vec<String> = t
            .unique_values("categoria")
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(unique, vec!["A", "B", "C"]);
    }

    #[test]
    fn csv_fields_drop_missing_and_keep_precision() {
        assert_eq!(Value::Float(f64::NAN).to_field(), "");
        assert_eq!(Value::Null.to_field(), "");
        assert_eq!(Value::Float(0.123456789).to_field(), "0.123456789");
        assert_eq!(Value::Integer(-3).to_field(), "-3");
    }
}
