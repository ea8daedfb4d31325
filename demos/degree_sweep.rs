//! Residual of the fit as the truncation degree grows
//!
//! Fits the same normalized cloud at increasing degrees and prints the RMS
//! radial error, the numerical rank and the conditioning of each fit.

use clap::Parser;
use sphcrate_core::normalize_point_cloud;
use sphcrate_harmonics::{FitConfig, SphericalHarmonicModel};
use sphcrate_io::load_point_cloud_or_fallback;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "degree_sweep", about = "Compare fit quality across harmonic degrees")]
struct Args {
    /// PLY file to fit; the built-in shape is used when missing or unreadable
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Degrees to try
    #[arg(long, value_delimiter = ',', default_values_t = [0, 2, 4, 8, 16, 24, 32])]
    degrees: Vec<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let loaded = load_point_cloud_or_fallback(args.input)?;
    let (normalized, _) = normalize_point_cloud(&loaded.cloud)?;
    let n = normalized.len() as f64;

    println!("{} points from {}", normalized.len(), loaded.source);
    println!("{:>6} {:>8} {:>8} {:>14} {:>14}", "l_max", "coeffs", "rank", "rms error", "condition");
    for l_max in args.degrees {
        let config = FitConfig::default().with_l_max(l_max);
        match SphericalHarmonicModel::fit(&normalized, &config) {
            Ok(model) => {
                let fit = model.fit_result();
                println!(
                    "{:>6} {:>8} {:>8} {:>14.6e} {:>14.6e}",
                    l_max,
                    config.num_coefficients(),
                    fit.rank,
                    fit.residual_norm / n.sqrt(),
                    fit.condition_number()
                );
            }
            Err(e) => println!("{:>6} {:>8} failed: {}", l_max, config.num_coefficients(), e),
        }
    }

    Ok(())
}
