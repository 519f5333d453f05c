use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use log;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Serialize;
use sha2::{Digest, Sha256};

use rusty_snn_stats::binning::{Binner, BinningConfig, BoundaryPolicy};
use rusty_snn_stats::coincidence::{spike_coincidence, Coincidence, Normalization};
use rusty_snn_stats::error::SNNError;
use rusty_snn_stats::kernel::Kernel;
use rusty_snn_stats::plot;
use rusty_snn_stats::recording::load_from;
use rusty_snn_stats::spike_train::{jittered_copies, rand_poisson};

#[derive(Parser, Debug)]
struct Args {
    /// A JSON file with the spike trains, i.e., an array of arrays of firing times.
    /// Without it, jittered copies of a random reference spike train are sampled.
    #[arg(long)]
    input: Option<PathBuf>,
    /// The seed used for spike train sampling
    #[arg(long, default_value = "0")]
    seed: u64,
    /// The number of sampled trials
    #[arg(short = 'N', long, default_value = "20")]
    num_trains: usize,
    /// The duration of the sampled trials (ms)
    #[arg(short = 'T', long, default_value = "1000.0")]
    duration: f64,
    /// The firing rate of the sampled reference (spikes per ms)
    #[arg(long, default_value = "0.02")]
    firing_rate: f64,
    /// The standard deviation of the jitter applied to the sampled trials (ms)
    #[arg(long, default_value = "1.0")]
    jitter: f64,
    /// The bin width (ms)
    #[arg(long, default_value = "1.0")]
    dt: f64,
    /// The number of bins; by default, the bins cover the whole recording
    #[arg(long)]
    num_bins: Option<usize>,
    /// The smoothing kernel, must be one of: identity, boxcar:<width>, gaussian:<sigma>, exponential:<tau>
    #[arg(long, default_value = "identity")]
    kernel: String,
    /// The rule for spikes before the first bin, must be one of: clamp, wrap
    #[arg(long, default_value = "clamp")]
    boundary: String,
    /// The coincidence normalization, must be one of: none, energy
    #[arg(long, default_value = "none")]
    normalization: String,
    /// Where to write the JSON report
    #[arg(long)]
    report: Option<PathBuf>,
    /// Where to render the spike raster (SVG)
    #[arg(long)]
    raster: Option<PathBuf>,
    /// The directory of the log files
    #[arg(long, default_value = "log")]
    log_dir: PathBuf,
}

#[derive(Serialize, Debug)]
struct Report {
    binning: BinningConfig,
    normalization: Normalization,
    num_trials: usize,
    correlation: f64,
    degenerate_trials: Vec<usize>,
    coincidence: Vec<Vec<f64>>,
}

impl Report {
    fn new(binning: &BinningConfig, normalization: Normalization, coincidence: Coincidence) -> Self {
        Report {
            binning: binning.clone(),
            normalization,
            num_trials: coincidence.num_trials(),
            correlation: coincidence.correlation,
            coincidence: coincidence.matrix_rows(),
            degenerate_trials: coincidence.degenerate_trials,
        }
    }
}

/// Load spike trains from a JSON file. The recording lasts until one bin after the last spike.
fn load_trains(path: &Path, dt: f64) -> Result<(Vec<Vec<f64>>, f64), SNNError> {
    let trains: Vec<Vec<f64>> = load_from(path)?;
    let last = trains
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);
    Ok((trains, last + dt))
}

fn init_logging(args: &Args) -> Result<(), SNNError> {
    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", args));
    let hash = hasher.finalize();
    let log_path = args.log_dir.join(format!("{:x}.log", hash));

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build(log_path)
        .map_err(|e| SNNError::IOError(e.to_string()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("logfile")
                .build(LevelFilter::Info),
        )
        .map_err(|e| SNNError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SNNError::IOError(e.to_string()))?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SNNError> {
    let args = Args::parse();
    init_logging(&args)?;

    log::info!("{:?}", args);

    // Load (or sample) the spike trains
    let (trains, duration) = match &args.input {
        Some(path) => {
            let (trains, duration) = load_trains(path, args.dt)?;
            log::info!(
                "Spike trains loading: done! {} trains from {}",
                trains.len(),
                path.display()
            );
            (trains, duration)
        }
        None => {
            let reference = rand_poisson(1, args.duration, args.firing_rate, args.seed)?.remove(0);
            let trains = jittered_copies(
                &reference,
                args.num_trains,
                args.jitter,
                args.duration,
                args.seed,
            )?;
            log::info!(
                "Spike trains sampling: done! {} jittered copies of {} spikes",
                trains.len(),
                reference.len()
            );
            (trains, args.duration)
        }
    };

    // Bin the spike trains
    let kernel = Kernel::parse(&args.kernel, args.dt)?;
    let mut config = BinningConfig::from_duration(duration, args.dt, kernel)?;
    if let Some(num_bins) = args.num_bins {
        config.num_bins = num_bins;
    }
    config.boundary = BoundaryPolicy::from_str(&args.boundary)?;

    let binner = Binner::build(config)?;
    let binned = binner.bin_all(&trains)?;
    log::info!("Binning: done! {} bins per trial", binner.num_bins());

    // Measure the coincidence
    let normalization = Normalization::from_str(&args.normalization)?;
    let coincidence = spike_coincidence(&binned, normalization)?;
    log::info!(
        "Coincidence: done! Correlation is {:.6} over {} trials",
        coincidence.correlation,
        coincidence.num_trials()
    );

    if let Some(path) = &args.report {
        let report = Report::new(binner.config(), normalization, coincidence);
        serde_json::to_writer_pretty(File::create(path)?, &report)?;
        log::info!("Report saving: done! Saved to {}", path.display());
    }

    if let Some(path) = &args.raster {
        plot::raster(&trains, path)?;
        log::info!("Raster rendering: done! Saved to {}", path.display());
    }

    Ok(())
}
