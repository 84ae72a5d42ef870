use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use rocket_ascent::io::{self, csv, json, FlightLog};
use rocket_ascent::report::{overlays, ComparisonSummary, ModelSeries};
use rocket_ascent::sim::{simulate_planar, simulate_vertical, SimConfig};
use rocket_ascent::vehicle::presets;

#[derive(Parser, Debug)]
#[command(name = "rocket-ascent")]
#[command(about = "Euler ascent models of the Luna-9 launch, compared against a recorded flight")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    model: Model,
}

#[derive(Subcommand, Debug)]
enum Model {
    /// Vertical-only model over the booster burn (height, velocity, mass)
    Vertical(ModelArgs),
    /// Gravity-turn model in the downrange/altitude plane (adds pitch)
    Planar(ModelArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Flight log recorded by `flight-logger`
    #[arg(long, default_value = io::DEFAULT_LOG_PATH)]
    log: PathBuf,

    /// Directory for charts and the JSON summary
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Integration step (s)
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Model horizon (s); 70 for the vertical model, 150 for the planar one
    #[arg(long)]
    horizon: Option<f64>,

    /// Also write the model trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_plots: bool,
}

impl ModelArgs {
    fn config(&self, default_horizon: f64) -> Result<SimConfig> {
        let config = SimConfig {
            dt: self.dt,
            max_time: self.horizon.unwrap_or(default_horizon),
        };
        if !config.is_valid() {
            bail!(
                "--dt must be positive and --horizon non-negative, both finite (got dt={}, horizon={})",
                config.dt,
                config.max_time
            );
        }
        Ok(config)
    }
}

const RULE: &str = "====================================================================";
const THIN: &str = "──────────────────────────────────────────────────────────────────";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match Cli::parse().model {
        Model::Vertical(args) => run_vertical(&args),
        Model::Planar(args) => run_planar(&args),
    }
}

fn run_vertical(args: &ModelArgs) -> Result<()> {
    let vehicle = presets::luna_vertical();
    let config = args.config(vehicle.propulsion.cutoff)?;

    println!();
    println!("{}", RULE);
    println!("  VERTICAL ASCENT MODEL: {}", vehicle.name);
    println!("{}", RULE);
    println!("  Vehicle Parameters");
    println!("  {}", THIN);
    println!(
        "  Initial mass:  {:>8.1} t     Propellant:   {:>8.1} t",
        vehicle.initial_mass / 1000.0,
        vehicle.propellant_used() / 1000.0
    );
    println!(
        "  Burn time:     {:>8.1} s     Flow rate:    {:>8.1} kg/s",
        vehicle.propulsion.cutoff, vehicle.propulsion.mass_flow
    );
    println!(
        "  Thrust:        {:>8.2} MN    TWR:          {:>8.2}",
        vehicle.propulsion.thrust / 1e6,
        vehicle.twr()
    );
    println!(
        "  Boosters:      {} x {:.1} t dropped at {:.1} s",
        vehicle.boosters.count,
        vehicle.boosters.unit_mass / 1000.0,
        vehicle.boosters.time
    );
    println!("  Final mass:    {:>8.1} t     (unfloored)", vehicle.final_mass() / 1000.0);
    if vehicle.final_mass() < 0.0 {
        log::warn!("burn and jettison exceed the initial mass; model mass is floored at 0");
    }
    println!();

    let run = simulate_vertical(&vehicle, &config);
    let model = ModelSeries::vertical(&vehicle.name, &config, &run);

    if let Some(path) = &args.csv {
        csv::write_vertical_file(path, &run.trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("trajectory written to {}", path.display());
    }

    compare(args, &config, &model)
}

fn run_planar(args: &ModelArgs) -> Result<()> {
    let vehicle = presets::luna_planar();
    let config = args.config(vehicle.core.cutoff)?;

    println!();
    println!("{}", RULE);
    println!("  PLANAR ASCENT MODEL: {}", vehicle.name);
    println!("{}", RULE);
    println!("  Vehicle Parameters");
    println!("  {}", THIN);
    println!("  Initial mass:  {:>8.1} t", vehicle.initial_mass / 1000.0);
    println!(
        "  Boost:         {:>8.2} MN    {:>8.1} kg/s  until {:.1} s",
        vehicle.boost.thrust / 1e6,
        vehicle.boost.mass_flow,
        vehicle.boost.cutoff
    );
    println!(
        "  Core:          {:>8.2} MN    {:>8.1} kg/s  until {:.1} s",
        vehicle.core.thrust / 1e6,
        vehicle.core.mass_flow,
        vehicle.core.cutoff
    );
    println!(
        "  Boosters:      {} x {:.1} t dropped at {:.1} s",
        vehicle.boosters.count,
        vehicle.boosters.unit_mass / 1000.0,
        vehicle.boosters.time
    );
    let program: Vec<String> = vehicle
        .pitch_program
        .points()
        .iter()
        .map(|(h, p)| format!("{:.0}km:{:.0}", h / 1000.0, p))
        .collect();
    println!("  Pitch program: {}", program.join(" "));
    println!();

    let run = simulate_planar(&vehicle, &config);
    let model = ModelSeries::planar(&vehicle.name, &config, &run);

    if let Some(path) = &args.csv {
        csv::write_planar_file(path, &run.trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("trajectory written to {}", path.display());
    }

    compare(args, &config, &model)
}

fn load_log(path: &Path, cutoff: f64) -> FlightLog {
    match io::load_log_file(path, Some(cutoff)) {
        Ok(log) => {
            if log.skipped > 1 {
                log::warn!("{}: skipped {} malformed lines", path.display(), log.skipped - 1);
            }
            log
        }
        Err(e) => {
            log::warn!("cannot read flight log {}: {}; plotting the model alone", path.display(), e);
            FlightLog::default()
        }
    }
}

/// Events, log comparison, charts and the JSON summary.
fn compare(args: &ModelArgs, config: &SimConfig, model: &ModelSeries) -> Result<()> {
    println!("  Model Events");
    println!("  {}", THIN);
    if model.events.is_empty() {
        println!("  (none)");
    }
    for event in &model.events {
        println!("  {}", event.describe());
    }
    println!();

    let log = load_log(&args.log, config.max_time);
    let summary = ComparisonSummary::build(model, &log);

    println!("  Comparison");
    println!("  {}", THIN);
    println!(
        "  Model final:   h={:>9.0} m   v={:>7.1} m/s   m={:>9.0} kg",
        summary.final_altitude, summary.final_speed, summary.final_mass
    );
    println!("  Logged points: {:>8}      (t <= {:.1} s)", summary.logged_points, config.max_time);
    if let Some(m) = summary.logged_mass {
        println!("  Logged mass:   initial {:.2} kg, final {:.2} kg, change {:.2} kg", m.initial, m.final_mass, m.delta);
    }
    if let Some(r) = summary.residuals {
        println!(
            "  RMS error:     h={:.1} m   v={:.1} m/s   m={:.1} kg   ({} samples)",
            r.altitude_rms, r.speed_rms, r.mass_rms, r.samples
        );
    }
    println!();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    if !args.no_plots {
        println!("  Charts");
        println!("  {}", THIN);
        for chart in overlays(model, &log) {
            let files = chart
                .render(&args.out_dir)
                .with_context(|| format!("rendering {}", chart.stem))?;
            for f in files {
                println!("  {}", f.display());
            }
        }
        println!();
    }

    let summary_path = args.out_dir.join("comparison_summary.json");
    json::write_summary_file(&summary_path, &summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    println!("  Summary: {}", summary_path.display());
    println!("  Simulation: {} steps, dt={} s", model.altitude.len(), config.dt);
    println!("{}", RULE);
    println!();
    Ok(())
}
