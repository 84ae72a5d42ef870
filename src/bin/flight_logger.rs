use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;

use rocket_ascent::io::{create_log_file, DEFAULT_LOG_PATH};
use rocket_ascent::link::krpc::{Endpoint, KrpcLink};
use rocket_ascent::link::WallClock;
use rocket_ascent::recorder::{FlightRecorder, RecorderConfig};

#[derive(Parser, Debug)]
#[command(name = "flight-logger")]
#[command(about = "Record pitch, altitude, speed and mass of the active vessel from ignition until Ctrl-C")]
#[command(version)]
struct Cli {
    /// Output log file; parent directories are created
    #[arg(short, long, default_value = DEFAULT_LOG_PATH)]
    output: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 50000)]
    rpc_port: u16,

    #[arg(long, default_value_t = 50001)]
    stream_port: u16,

    /// Stop by itself after this many seconds of game time
    #[arg(long)]
    duration: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
    let cli = Cli::parse();

    let endpoint = Endpoint {
        name: "flight-logger".into(),
        host: cli.host,
        rpc_port: cli.rpc_port,
        stream_port: cli.stream_port,
    };
    let link = KrpcLink::connect(&endpoint)?;
    let writer = create_log_file(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let config = RecorderConfig { max_duration: cli.duration, ..RecorderConfig::default() };
    let recorder = FlightRecorder::new(link, WallClock::new(), writer, config);

    let stop = recorder.stop_flag();
    ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
        .context("installing Ctrl-C handler")?;

    // Closes the file and the connection even when recording failed.
    let summary = recorder.run_and_finish()?;

    log::info!("recording stopped");
    println!(
        "{} rows ({:.1} s) saved to {}",
        summary.rows,
        summary.duration,
        cli.output.display()
    );
    Ok(())
}
