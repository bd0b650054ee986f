use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;

use lcmeter::MeterConfig;
use lcmeter::simulation::{MeasurementError, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "range_sweep")]
#[command(about = "Sweep input frequencies through the simulated meter and report accuracy", long_about = None)]
struct Args {
    /// Meter configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lowest input frequency in Hz
    #[arg(long, default_value_t = 100.0)]
    min: f64,

    /// Highest input frequency in Hz
    #[arg(long, default_value_t = 1.0e9)]
    max: f64,

    /// Number of log-spaced frequencies
    #[arg(short, long, default_value_t = 25)]
    points: usize,

    /// Input frequency error per window, standard deviation in ppm
    #[arg(long, default_value_t = 0.0)]
    jitter_ppm: f64,

    /// Real CPU oscillator rate in Hz (default: corrected nominal clock)
    #[arg(long)]
    oscillator_hz: Option<f64>,

    /// Base seed for reproducibility
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct RangeSummary {
    division_factor: u32,
    count: usize,
    mean_ppm: f64,
    std_dev_ppm: f64,
    max_abs_ppm: f64,
}

#[derive(Debug, Serialize)]
struct SweepReport {
    points: Vec<MeasurementError>,
    ranges: Vec<RangeSummary>,
}

fn sweep_frequencies(min: f64, max: f64, points: usize) -> Vec<f64> {
    if points <= 1 {
        return vec![min];
    }
    let ratio = max / min;
    (0..points)
        .map(|i| min * ratio.powf(i as f64 / (points - 1) as f64))
        .collect()
}

fn summarise(points: &[MeasurementError]) -> Vec<RangeSummary> {
    let mut by_range: BTreeMap<u32, (Stats<f64>, f64)> = BTreeMap::new();
    for point in points {
        let ppm = point.relative_error * 1e6;
        let (stats, max_abs) = by_range
            .entry(point.division_factor)
            .or_insert_with(|| (Stats::new(), 0.0));
        stats.update(ppm);
        *max_abs = max_abs.max(ppm.abs());
    }

    by_range
        .into_iter()
        .map(|(division_factor, (stats, max_abs_ppm))| RangeSummary {
            division_factor,
            count: stats.count,
            mean_ppm: stats.mean,
            std_dev_ppm: stats.std_dev,
            max_abs_ppm,
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    if !(args.min > 0.0 && args.max >= args.min) {
        anyhow::bail!("Need 0 < min <= max, got {} and {}", args.min, args.max);
    }

    let config = match &args.config {
        Some(path) => MeterConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => MeterConfig::default(),
    };

    let mut points = Vec::with_capacity(args.points);
    for (i, hz) in sweep_frequencies(args.min, args.max, args.points)
        .into_iter()
        .enumerate()
    {
        let sim = SimulationConfig {
            oscillator_hz: args.oscillator_hz,
            jitter_ppm: args.jitter_ppm,
            seed: Some(args.seed + i as u64),
            realtime: false,
        };
        let point = MeasurementError::for_frequency(&config, sim, hz)
            .with_context(|| format!("Measurement at {} Hz failed", hz))?;
        log::info!(
            "{:.3} Hz -> {:.0} Hz (/{})",
            hz,
            point.measured_hz,
            point.division_factor
        );
        points.push(point);
    }

    let ranges = summarise(&points);

    match args.format {
        OutputFormat::Text => {
            println!(
                "{:>16} {:>16} {:>6} {:>12}",
                "input_hz", "measured_hz", "div", "error_ppm"
            );
            for p in &points {
                println!(
                    "{:>16.3} {:>16.0} {:>6} {:>12.2}",
                    p.expected_hz,
                    p.measured_hz,
                    p.division_factor,
                    p.relative_error * 1e6
                );
            }
            println!();
            println!(
                "{:>6} {:>6} {:>12} {:>12} {:>12}",
                "div", "n", "mean_ppm", "std_ppm", "max_ppm"
            );
            for r in &ranges {
                println!(
                    "{:>6} {:>6} {:>12.2} {:>12.2} {:>12.2}",
                    r.division_factor, r.count, r.mean_ppm, r.std_dev_ppm, r.max_abs_ppm
                );
            }
        }
        OutputFormat::Json => {
            let report = SweepReport { points, ranges };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_endpoints() {
        let hz = sweep_frequencies(10.0, 1000.0, 3);
        assert_eq!(hz.len(), 3);
        assert!((hz[0] - 10.0).abs() < 1e-9);
        assert!((hz[1] - 100.0).abs() < 1e-9);
        assert!((hz[2] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_point_sweep() {
        assert_eq!(sweep_frequencies(42.0, 1000.0, 1), vec![42.0]);
    }
}
