use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use clap::Parser;
use enviro_insights::config::SampleArgs;
use enviro_insights::{Field, Record};
use parquet::arrow::ArrowWriter;

const STATIONS: [&str; 12] = [
    "Aotizhongxin",
    "Changping",
    "Dingling",
    "Dongsi",
    "Guanyuan",
    "Gucheng",
    "Huairou",
    "Nongzhanguan",
    "Shunyi",
    "Tiantan",
    "Wanliu",
    "Wanshouxigong",
];

/// Probability that any single reading is left out.
const MISSING_RATE: f64 = 0.03;

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

    fn maybe(&mut self, value: f64) -> Option<f64> {
        (self.next_f64() >= MISSING_RATE).then_some((value * 10.0).round() / 10.0)
    }
}

/// One reading per station per day, with winter smog, summer rain and a
/// seasonal temperature cycle.
fn generate_records(args: &SampleArgs) -> Result<Vec<Record>> {
    let mut rng = SimpleRng::new(args.seed);
    let stations = &STATIONS[..args.stations.clamp(1, STATIONS.len())];
    let first = NaiveDate::from_ymd_opt(args.start_year, 1, 1)
        .with_context(|| format!("invalid start year {}", args.start_year))?;
    let end = NaiveDate::from_ymd_opt(args.start_year + args.years.max(1), 1, 1)
        .context("end year out of range")?;

    let mut records = Vec::new();
    for (k, station) in stations.iter().enumerate() {
        let urban = 1.0 + 0.15 * k as f64;
        let mut date = first;
        while date < end {
            let season = (date.ordinal0() as f64 / 365.25 * std::f64::consts::TAU).cos();
            let temp = 13.0 - 15.0 * season + rng.gauss(0.0, 3.0);
            let dewp = temp - 8.0 - 6.0 * season.max(0.0) + rng.gauss(0.0, 2.0);
            let pres = 1012.0 + 12.0 * season + rng.gauss(0.0, 4.0);
            let rain = if rng.next_f64() < 0.12 + 0.2 * (-season).max(0.0) {
                rng.gauss(4.0, 3.0).abs()
            } else {
                0.0
            };
            let pm25 = (rng.gauss(3.7 + 0.5 * season, 0.8)).exp() * urban;
            let pm10 = pm25 * rng.gauss(1.4, 0.2).max(1.0);

            let readings = [
                rng.maybe(pm25),
                rng.maybe(pm10),
                rng.maybe(temp),
                rng.maybe(pres),
                rng.maybe(dewp),
                rng.maybe(rain),
            ];
            records.push(Record::new(date, *station, readings));
            date += Duration::days(1);
        }
    }
    Ok(records)
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["No", "year", "month", "day", "station"];
    header.extend(Field::ALL.iter().map(|f| f.column()));
    writer.write_record(&header)?;

    for (i, r) in records.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            r.year().to_string(),
            r.month().to_string(),
            r.day().to_string(),
            r.station.clone(),
        ];
        row.extend(
            Field::ALL
                .iter()
                .map(|f| r.value(*f).map_or_else(|| "NA".to_string(), |v| v.to_string())),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let int_column = |f: fn(&Record) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![
        ArrowField::new("year", DataType::Int64, false),
        ArrowField::new("month", DataType::Int64, false),
        ArrowField::new("day", DataType::Int64, false),
        ArrowField::new("station", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        int_column(|r| r.year() as i64),
        int_column(|r| r.month() as i64),
        int_column(|r| r.day() as i64),
        Arc::new(StringArray::from(
            records.iter().map(|r| r.station.as_str()).collect::<Vec<_>>(),
        )),
    ];
    for field in Field::ALL {
        fields.push(ArrowField::new(field.column(), DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(
            records.iter().map(|r| r.value(field)).collect::<Vec<_>>(),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = SampleArgs::parse();

    let records = generate_records(&args)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let csv_path = args.out_dir.join("sample.csv");
    write_csv(&csv_path, &records)?;
    let parquet_path = args.out_dir.join("sample.parquet");
    write_parquet(&parquet_path, &records)?;

    log::info!(
        "Wrote {} rows to {} and {}",
        records.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
