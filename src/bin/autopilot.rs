use anyhow::Result;
use clap::Parser;

use rocket_ascent::autopilot::{Ascent, AscentPlan};
use rocket_ascent::link::krpc::{Endpoint, KrpcLink};
use rocket_ascent::link::WallClock;

#[derive(Parser, Debug)]
#[command(name = "ascent-autopilot")]
#[command(about = "Fly the Luna-9 stack from the pad to a 210 km circular orbit over kRPC")]
#[command(version)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 50000)]
    rpc_port: u16,

    #[arg(long, default_value_t = 50001)]
    stream_port: u16,

    /// Give up waiting for the coast threshold after this many seconds
    #[arg(long)]
    coast_timeout: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
    let cli = Cli::parse();

    let endpoint = Endpoint {
        name: "ascent-autopilot".into(),
        host: cli.host,
        rpc_port: cli.rpc_port,
        stream_port: cli.stream_port,
    };
    let plan = AscentPlan { coast_timeout: cli.coast_timeout, ..AscentPlan::default() };

    let link = KrpcLink::connect(&endpoint)?;
    let (_, report) = Ascent::new(link, WallClock::new()).fly(&plan)?;

    println!();
    println!("  Ascent complete");
    println!("  Apoapsis after steering: {:>8.1} km", report.steer_apoapsis / 1000.0);
    println!(
        "  Circularization:         {:>8.1} m/s over {:.1} s",
        report.orbit.plan.delta_v, report.orbit.plan.burn_time
    );
    println!(
        "  Final orbit:             {:>8.1} x {:.1} km",
        report.orbit.apoapsis / 1000.0,
        report.orbit.periapsis / 1000.0
    );
    println!("  Stages fired:            {:>8}", report.stages_fired);
    Ok(())
}
