use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use argh::FromArgs;
use chrono::Local;
use color_eyre::eyre::WrapErr;
use evo_stream::{ByteSource, Config, SensorSession, SessionEvent, StreamingEstimator};
use tracing::info;

/// Default configuration file path.
const DEFAULT_CONFIG: &str = "evo-stream.toml";

/// Streams TeraRanger Evo distance readings and reports their dominant repetition rate.
#[derive(FromArgs)]
struct Args {
    /// path to the configuration file
    #[argh(option, short = 'c', default = "PathBuf::from(DEFAULT_CONFIG)")]
    config: PathBuf,

    /// serial port to open, overrides the configuration file
    #[argh(option, short = 'p')]
    port: Option<String>,

    /// decode a captured byte stream from this file instead of a serial port
    #[argh(option, short = 'r')]
    replay: Option<PathBuf>,

    /// stop after this many validated frames
    #[argh(option, short = 'n')]
    frames: Option<usize>,

    /// verbose mode
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn print_event(event: SessionEvent) {
    match event {
        SessionEvent::Reading(distance) => println!("{} - {}", timestamp(), distance),
        SessionEvent::Estimate(estimate) => println!(
            "{} - dominant frequency {:.3} Hz, {:.1} per minute (after {} samples)",
            timestamp(),
            estimate.dominant_frequency_hz,
            estimate.rate_per_minute,
            estimate.computed_at_sample_count
        ),
    }
}

fn stream<S: ByteSource>(mut session: SensorSession<S>) -> color_eyre::Result<()> {
    let stop = session.stop_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nCtrl+C detected! Stopping after the current read...");
        stop.store(true, Ordering::Relaxed);
    })
    .wrap_err("failed to install Ctrl+C handler")?;

    session.set_callback(print_event);
    let summary = session.run();

    info!(
        reason = ?summary.reason,
        frames = summary.stats.frames,
        measured = summary.stats.measured,
        checksum_errors = summary.stats.checksum_errors,
        estimates = summary.stats.estimates,
        "Stream ended"
    );
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args: Args = argh::from_env();

    let default_filter = if args.verbose {
        "evo_stream=debug"
    } else {
        "evo_stream=info"
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = if args.config.exists() {
        info!(path = ?args.config, "Loading configuration");
        Config::load(&args.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };
    if args.port.is_some() {
        config.serial.port = args.port;
    }
    let max_frames = args.frames.or(config.session.max_frames);

    let estimator = StreamingEstimator::new(config.estimator_config()?)?;

    match args.replay {
        Some(path) => {
            info!(path = ?path, "Replaying capture");
            let file = File::open(&path)
                .wrap_err_with(|| format!("failed to open capture {}", path.display()))?;
            let session =
                SensorSession::new(BufReader::new(file), estimator).with_frame_limit(max_frames);
            stream(session)
        }
        None => {
            let session =
                SensorSession::open(&config.serial, estimator)?.with_frame_limit(max_frames);
            stream(session)
        }
    }
}
