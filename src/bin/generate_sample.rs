use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic wine-quality dataset for local runs.
#[derive(Parser, Debug)]
struct Args {
    /// Output file; `.csv` or `.parquet`.
    #[arg(default_value = "winequality.csv")]
    output: PathBuf,

    /// Number of rows to generate.
    #[arg(default_value_t = 6497)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// `(name, mean, std_dev, shift per quality point above 6, lower bound)`
const FEATURES: [(&str, f64, f64, f64, f64); 11] = [
    ("fixed acidity", 7.2, 1.3, -0.05, 3.8),
    ("volatile acidity", 0.34, 0.16, -0.05, 0.08),
    ("citric acid", 0.32, 0.14, 0.01, 0.0),
    ("residual sugar", 5.4, 4.7, -0.3, 0.6),
    ("chlorides", 0.056, 0.035, -0.006, 0.009),
    ("free sulfur dioxide", 30.5, 17.7, 0.5, 1.0),
    ("total sulfur dioxide", 115.7, 56.5, -5.0, 6.0),
    ("density", 0.9947, 0.003, -0.0008, 0.987),
    ("pH", 3.22, 0.16, 0.01, 2.72),
    ("sulphates", 0.53, 0.15, 0.02, 0.22),
    ("alcohol", 10.5, 1.1, 0.45, 8.0),
];

/// Relative frequency of quality scores 3..=9.
const QUALITY_WEIGHTS: [u32; 7] = [30, 216, 2138, 2836, 1079, 193, 5];

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

    fn quality(&mut self) -> i64 {
        let total: u32 = QUALITY_WEIGHTS.iter().sum();
        let mut pick = (self.next_f64() * total as f64) as u32;
        for (i, &w) in QUALITY_WEIGHTS.iter().enumerate() {
            if pick < w {
                return 3 + i as i64;
            }
            pick -= w;
        }
        9
    }
}

/// Round to the precision the published dataset uses for a value's magnitude.
fn round_like_source(v: f64) -> f64 {
    let scale = if v.abs() < 1.0 { 1e4 } else { 1e2 };
    (v * scale).round() / scale
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut qualities: Vec<i64> = Vec::with_capacity(args.rows);
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(args.rows); FEATURES.len()];

    for _ in 0..args.rows {
        let quality = rng.quality();
        for (col, &(_, mean, std_dev, shift, floor)) in columns.iter_mut().zip(FEATURES.iter()) {
            let v = rng.gauss(mean + shift * (quality - 6) as f64, std_dev);
            col.push(round_like_source(v.max(floor)));
        }
        qualities.push(quality);
    }

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &columns, &qualities)?,
        "parquet" | "pq" => write_parquet(&args.output, &columns, &qualities)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!(
        "Wrote {} rows ({} features + quality) to {}",
        args.rows,
        FEATURES.len(),
        args.output.display()
    );
    Ok(())
}

fn write_csv(path: &Path, columns: &[Vec<f64>], qualities: &[i64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    let header = FEATURES.iter().map(|f| f.0).chain(["quality"]);
    writer.write_record(header).context("writing CSV header")?;

    for (row, quality) in qualities.iter().enumerate() {
        let record = columns
            .iter()
            .map(|col| col[row].to_string())
            .chain([quality.to_string()]);
        writer.write_record(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, columns: &[Vec<f64>], qualities: &[i64]) -> Result<()> {
    let fields: Vec<Field> = FEATURES
        .iter()
        .map(|f| Field::new(f.0, DataType::Float64, false))
        .chain([Field::new("quality", DataType::Int64, false)])
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|col| Arc::new(Float64Array::from(col.clone())) as ArrayRef)
        .chain([Arc::new(Int64Array::from(qualities.to_vec())) as ArrayRef])
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
