use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::DataError;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per row (the usual case)
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.columns,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row gives the column names; every cell is type-inferred with
/// [`Value::infer`].
pub fn load_csv(path: &Path) -> Result<Table> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Same as [`load_csv`] but over any reader, so tests can feed strings.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Vec<Value> = record.iter().map(Value::infer).collect();
        table.push_row(row)?;
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id_cliente": 1, "categoria": "A", "columna_existente": 1.5 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys, in order of first appearance. Keys a
/// record lacks are `Null`.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(columns);
    for rec in records {
        // Already validated as objects above.
        let Some(obj) = rec.as_object() else { continue };
        let row = table
            .columns
            .iter()
            .map(|col| obj.get(col).map(json_to_value).unwrap_or(Value::Null))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::infer(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(columns);

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = batch
                .columns()
                .iter()
                .map(|col| extract_value(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            table.push_row(values)?;
        }
    }

    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }

    macro_rules! downcast {
        ($ty:ty) => {
            col.as_any()
                .downcast_ref::<$ty>()
                .with_context(|| format!("expected {}", stringify!($ty)))?
        };
    }

    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast!(Int32Array).value(row) as i64),
        DataType::Int64 => Value::Integer(downcast!(Int64Array).value(row)),
        DataType::Float32 => Value::Float(downcast!(Float32Array).value(row) as f64),
        DataType::Float64 => Value::Float(downcast!(Float64Array).value(row)),
        DataType::Boolean => Value::Bool(downcast!(BooleanArray).value(row)),
        DataType::Date32 => match downcast!(Date32Array).value_as_date(row) {
            Some(d) => Value::Date(d.to_string()),
            None => Value::Null,
        },
        other => {
            log::warn!("Unsupported parquet column type {other:?}, reading as text");
            Value::String(format!("{other:?}"))
        }
    };
    Ok(value)
}

/// Guard used by callers that require a specific set of columns up front.
pub fn require_columns(table: &Table, names: &[&str]) -> Result<()> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|n| !table.has_column(n))
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn csv_with_missing_cells() {
        let data = "id_cliente,categoria,columna_existente\n1,A,2\n2,B,\n3,,1.5\n";
        let table = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(
            table.columns,
            vec!["id_cliente", "categoria", "columna_existente"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0][2], Value::Integer(2));
        assert_eq!(table.rows[1][2], Value::Null);
        assert_eq!(table.rows[2][1], Value::Null);
        assert_eq!(table.rows[2][2], Value::Float(1.5));
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let data = "a,b\n1,2\n3\n";
        assert!(read_csv(csv::Reader::from_reader(data.as_bytes())).is_err());
    }

    #[test]
    fn json_records_union_columns() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id_cliente": 1, "score": 0.5}}, {{"id_cliente": 2, "region": "sur"}}]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("region"));
        let region = table.column_index("region").unwrap();
        assert_eq!(table.rows[0][region], Value::Null);
        assert_eq!(table.rows[1][region], Value::String("sur".into()));
    }

    #[test]
    fn parquet_scalar_columns() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id_cliente", DataType::Int64, false),
            Field::new("categoria", DataType::Utf8, true),
            Field::new("columna_existente", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(arrow::array::StringArray::from(vec![Some("A"), None])),
                Arc::new(Float64Array::from(vec![None, Some(2.5)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(
            table.columns,
            vec!["id_cliente", "categoria", "columna_existente"]
        );
        assert_eq!(
            table.rows,
            vec![
                vec![Value::Integer(1), Value::String("A".into()), Value::Null],
                vec![Value::Integer(2), Value::Null, Value::Float(2.5)],
            ]
        );
    }

    #[test]
    fn unknown_extension_fails() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn require_columns_lists_missing() {
        let table = Table::new(vec!["a".into()]);
        let err = require_columns(&table, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required columns: b, c");
    }
}
