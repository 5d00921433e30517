//! Command-line configuration for the two binaries.

use std::path::PathBuf;

use clap::Parser;

/// Default dataset looked up in the working directory.
pub const DEFAULT_DATA_PATH: &str = "clean.csv";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "enviro-insights",
    version,
    about = "Air-quality and meteorological insights per station and year"
)]
pub struct DashboardArgs {
    /// Dataset to open at startup (.csv, .json or .parquet).
    #[arg(long, short, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "generate_sample",
    version,
    about = "Write deterministic sample sensor datasets"
)]
pub struct SampleArgs {
    /// Directory receiving sample.csv and sample.parquet.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of monitoring stations.
    #[arg(long, default_value_t = 4)]
    pub stations: usize,

    /// First year of daily readings.
    #[arg(long, default_value_t = 2013)]
    pub start_year: i32,

    /// Number of consecutive years.
    #[arg(long, default_value_t = 3)]
    pub years: i32,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_defaults_to_clean_csv() {
        let args = DashboardArgs::parse_from(["enviro-insights"]);
        assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_PATH));

        let args = DashboardArgs::parse_from(["enviro-insights", "--data", "beijing.parquet"]);
        assert_eq!(args.data, PathBuf::from("beijing.parquet"));
    }

    #[test]
    fn sample_overrides() {
        let args = SampleArgs::parse_from(["generate_sample", "--stations", "2", "--seed", "7"]);
        assert_eq!(args.stations, 2);
        assert_eq!(args.seed, 7);
        assert_eq!(args.years, 3);
    }
}
