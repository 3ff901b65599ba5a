use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use dadal_viewer::data::model::CanonicalField;
use dadal_viewer::data::schema::raw_name;

/// Write a synthetic VTOL survey flight with the acquisition software's raw headers.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "Simulated_UAV_Meteorological_Data.csv")]
    output: PathBuf,

    /// Number of readings (one per second)
    #[arg(long, default_value_t = 1200)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

/// One reading: timestamp text plus the ten numeric fields in canonical order.
struct Reading {
    timestamp: String,
    values: [f64; 10],
}

fn timestamp(second: usize) -> String {
    // Flight starts 2025-06-14 09:00:00 and stays within the day.
    let s = 9 * 3600 + second;
    format!(
        "2025-06-14 {:02}:{:02}:{:02}",
        (s / 3600) % 24,
        (s / 60) % 60,
        s % 60
    )
}

/// Spiral climb to 300 m, then a lawn-mower pass at altitude.
fn simulate(rows: usize, rng: &mut SimpleRng) -> Vec<Reading> {
    let (lon0, lat0) = (116.3975, 39.9087);
    let climb = rows / 2;

    (0..rows)
        .map(|i| {
            let (dx, dy, alt) = if i < climb {
                let f = i as f64 / climb.max(1) as f64;
                let theta = f * 6.0 * std::f64::consts::PI;
                (0.0015 * theta.cos(), 0.0015 * theta.sin(), 20.0 + 280.0 * f)
            } else {
                let k = (i - climb) as f64;
                let leg = (k / 60.0).floor();
                let along = (k % 60.0) / 60.0;
                let x = if leg as i64 % 2 == 0 { along } else { 1.0 - along };
                (-0.003 + 0.006 * x, -0.003 + 0.0006 * leg, 300.0)
            };
            let alt = alt + rng.gauss(0.0, 1.5);

            // Standard atmosphere with a morning inversion near 120 m.
            let inversion = 1.8 * (-(alt - 120.0).powi(2) / 800.0).exp();
            let temperature = 24.0 - 0.0065 * alt + inversion + rng.gauss(0.0, 0.15);
            let humidity = (62.0 - 0.04 * alt + rng.gauss(0.0, 1.0)).clamp(5.0, 100.0);
            let pressure = 1013.25 * (1.0 - 2.25577e-5 * alt).powf(5.25588) + rng.gauss(0.0, 0.1);

            // Pollution trapped below the inversion, plus a plume east of the pad.
            let mixing = (-(alt / 150.0)).exp();
            let plume = 25.0 * (-((dx - 0.002).powi(2) + dy.powi(2)) / 2e-6).exp();
            let pm25 = (12.0 + 40.0 * mixing + plume + rng.gauss(0.0, 2.0)).max(0.0);
            let pm10 = (pm25 * 1.6 + rng.gauss(0.0, 3.0)).max(0.0);
            let no2 = (8.0 + 30.0 * mixing + 0.4 * plume + rng.gauss(0.0, 1.5)).max(0.0);
            let so2 = (3.0 + 6.0 * mixing + rng.gauss(0.0, 0.5)).max(0.0);

            Reading {
                timestamp: timestamp(i),
                values: [
                    lon0 + dx,
                    lat0 + dy,
                    alt,
                    temperature,
                    humidity,
                    pressure,
                    pm25,
                    pm10,
                    no2,
                    so2,
                ],
            }
        })
        .collect()
}

fn write_csv(path: &Path, readings: &[Reading]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record(CanonicalField::ALL.iter().map(|f| raw_name(*f)))?;
    for r in readings {
        let mut row = vec![r.timestamp.clone()];
        row.extend(r.values.iter().map(|v| format!("{v:.6}")));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, readings: &[Reading]) -> Result<()> {
    let mut fields = vec![Field::new(raw_name(CanonicalField::Timestamp), DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        readings.iter().map(|r| r.timestamp.as_str()).collect::<Vec<_>>(),
    ))];
    for (j, field) in CanonicalField::ALL[1..].iter().enumerate() {
        fields.push(Field::new(raw_name(*field), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(
            readings.iter().map(|r| r.values[j]).collect::<Vec<_>>(),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let readings = simulate(args.rows, &mut rng);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&args.output, &readings)?;
    } else {
        write_csv(&args.output, &readings)?;
    }

    println!("Wrote {} readings to {}", readings.len(), args.output.display());
    Ok(())
}
