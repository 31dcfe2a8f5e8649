use std::sync::Arc;

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

/// Writes `sample_data.csv` and `sample_data.parquet`: one reading per
/// row with a temperature (about 5% missing), a pressure and the site name.
fn main() {
    let mut rng = SimpleRng::new(42);

    let sites = [("north", 12.0), ("south", 24.0), ("east", 18.0)];
    let rows_per_site = 200;

    let mut ids: Vec<String> = Vec::new();
    let mut temperature: Vec<Option<f64>> = Vec::new();
    let mut pressure: Vec<i64> = Vec::new();
    let mut site: Vec<&str> = Vec::new();

    for &(name, mean_temp) in &sites {
        for i in 0..rows_per_site {
            ids.push(format!("{name}-{i:04}"));
            temperature.push(if rng.next_f64() < 0.05 {
                None
            } else {
                Some((rng.gauss(mean_temp, 4.0) * 100.0).round() / 100.0)
            });
            pressure.push(rng.gauss(1013.0, 8.0).round() as i64);
            site.push(name);
        }
    }

    // CSV
    let csv_path = "sample_data.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    csv_writer
        .write_record(["row_id", "temperature", "pressure", "site"])
        .expect("Failed to write CSV header");
    for i in 0..ids.len() {
        let temp = temperature[i].map(|t| t.to_string()).unwrap_or_default();
        let pres = pressure[i].to_string();
        let record: [&str; 4] = [&ids[i], &temp, &pres, site[i]];
        csv_writer
            .write_record(record)
            .expect("Failed to write CSV row");
    }
    csv_writer.flush().expect("Failed to flush CSV file");

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("row_id", DataType::Utf8, false),
        Field::new("temperature", DataType::Float64, true),
        Field::new("pressure", DataType::Int64, false),
        Field::new("site", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                ids.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(temperature)),
            Arc::new(Int64Array::from(pressure)),
            Arc::new(StringArray::from(site)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} readings from {} sites to {csv_path} and {parquet_path}",
        ids.len(),
        sites.len()
    );
}
