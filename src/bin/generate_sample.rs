//! Writes deterministic sample inputs: `datos.csv`, `datos_externos.csv`
//! and `datos.parquet`, in the current directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Record {
    id_cliente: i64,
    fecha: String,
    categoria: &'static str,
    columna_existente: Option<f64>,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let categories = [("A", 10.0, 2.0), ("B", 15.0, 4.0), ("C", 5.0, 1.0)];
    let n_clients = 60;

    let mut records = Vec::with_capacity(n_clients);
    for i in 0..n_clients {
        let (categoria, mean, sd) = categories[i % categories.len()];
        // Roughly one in twelve values missing, to exercise cleaning.
        let value = if rng.next_f64() < 1.0 / 12.0 {
            None
        } else {
            Some((rng.gauss(mean, sd) * 100.0).round() / 100.0)
        };
        records.push(Record {
            id_cliente: i as i64 + 1,
            fecha: format!("2022-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
            categoria,
            columna_existente: value,
        });
    }

    // ---- datos.csv ----
    let mut w = csv::Writer::from_path("datos.csv").context("creating datos.csv")?;
    w.write_record(["id_cliente", "fecha", "categoria", "columna_existente"])?;
    for r in &records {
        w.write_record([
            r.id_cliente.to_string(),
            r.fecha.clone(),
            r.categoria.to_string(),
            r.columna_existente.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    w.flush()?;

    // ---- datos_externos.csv: every other client, plus some unknown ids ----
    let regions = ["norte", "sur", "este", "oeste"];
    let mut w =
        csv::Writer::from_path("datos_externos.csv").context("creating datos_externos.csv")?;
    w.write_record(["id_cliente", "region", "antiguedad"])?;
    let mut n_external = 0;
    for id in (1..=n_clients as i64 + 10).step_by(2) {
        let region = regions[(rng.next_u64() % regions.len() as u64) as usize];
        let antiguedad = rng.next_u64() % 20;
        w.write_record([id.to_string(), region.to_string(), antiguedad.to_string()])?;
        n_external += 1;
    }
    w.flush()?;

    // ---- datos.parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("id_cliente", DataType::Int64, false),
        Field::new("fecha", DataType::Utf8, false),
        Field::new("categoria", DataType::Utf8, false),
        Field::new("columna_existente", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.id_cliente))),
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.fecha.as_str()))),
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.categoria))),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.columna_existente).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create("datos.parquet").context("creating datos.parquet")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!(
        "Wrote {} rows to datos.csv / datos.parquet and {n_external} rows to datos_externos.csv",
        records.len()
    );
    Ok(())
}
