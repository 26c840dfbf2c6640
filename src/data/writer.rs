use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;

/// Write a table as CSV, replacing any existing file at `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let writer = csv::Writer::from_writer(file);
    write_records(table, writer).with_context(|| format!("writing {}", path.display()))
}

fn write_records<W: std::io::Write>(table: &Table, mut writer: csv::Writer<W>) -> Result<()> {
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_field()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::Value;

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("informe.csv");
        std::fs::write(&path, "stale,content\nthat,is\nlonger,than,the,new,one\n").unwrap();

        let mut table = Table::new(vec!["categoria".into(), "media".into()]);
        table
            .push_row(vec![Value::String("A".into()), Value::Float(2.5)])
            .unwrap();
        table
            .push_row(vec![Value::String("B".into()), Value::Float(f64::NAN)])
            .unwrap();
        write_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "categoria,media\nA,2.5\nB,\n");

        let back = load_file(&path).unwrap();
        assert_eq!(back.columns, table.columns);
        assert_eq!(back.rows[1][1], Value::Null);
    }
}
