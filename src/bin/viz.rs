use std::path::PathBuf;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use rocket_ascent::io::{self, FlightLog};
use rocket_ascent::report::ModelSeries;
use rocket_ascent::sim::{simulate_planar, simulate_vertical, SimConfig};
use rocket_ascent::vehicle::presets;

fn main() -> eframe::Result {
    env_logger::init();

    let log_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(io::DEFAULT_LOG_PATH));

    let vertical_vehicle = presets::luna_vertical();
    let vertical_config = SimConfig::with_horizon(vertical_vehicle.propulsion.cutoff);
    let vertical = ModelSeries::vertical(
        &vertical_vehicle.name,
        &vertical_config,
        &simulate_vertical(&vertical_vehicle, &vertical_config),
    );

    let planar_vehicle = presets::luna_planar();
    let planar_config = SimConfig::with_horizon(planar_vehicle.core.cutoff);
    let planar = ModelSeries::planar(
        &planar_vehicle.name,
        &planar_config,
        &simulate_planar(&planar_vehicle, &planar_config),
    );

    let log = io::load_log_file(&log_path, Some(planar_config.max_time)).unwrap_or_else(|e| {
        log::warn!("cannot read {}: {}", log_path.display(), e);
        FlightLog::default()
    });

    let app = AscentViz { log, log_path, vertical, planar };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Ascent: log vs models", options, Box::new(|_| Ok(Box::new(app))))
}

struct AscentViz {
    log: FlightLog,
    log_path: PathBuf,
    vertical: ModelSeries,
    planar: ModelSeries,
}

fn series(points: &[[f64; 2]]) -> PlotPoints<'static> {
    let step = (points.len() / 2000).max(1);
    points.iter().step_by(step).copied().collect()
}

impl AscentViz {
    fn chart(
        &self,
        ui: &mut egui::Ui,
        id: &str,
        size: egui::Vec2,
        logged: Vec<[f64; 2]>,
        models: &[(&str, &[[f64; 2]])],
    ) {
        Plot::new(id)
            .width(size.x)
            .height(size.y)
            .x_axis_label("Time (s)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.points(Points::new("Logged", series(&logged)).radius(2.0));
                for (name, points) in models {
                    plot_ui.line(Line::new(*name, series(points)).width(2.5));
                }
            });
    }
}

impl eframe::App for AscentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Vehicle: {}", self.vertical.vehicle));
            ui.label(format!(
                "Log: {}  |  {} points  |  {} lines skipped",
                self.log_path.display(),
                self.log.len(),
                self.log.skipped
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half = egui::vec2(available.x / 2.0 - 8.0, available.y / 2.0 - 24.0);
            let (v, p) = (&self.vertical, &self.planar);

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    self.chart(
                        ui,
                        "altitude",
                        half,
                        self.log.altitude_series(),
                        &[("Vertical model", v.altitude.as_slice()), ("Planar model", p.altitude.as_slice())],
                    );
                });
                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    self.chart(
                        ui,
                        "speed",
                        half,
                        self.log.speed_series(),
                        &[("Vertical model", v.speed.as_slice()), ("Planar model", p.speed.as_slice())],
                    );
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Mass (kg)");
                    self.chart(
                        ui,
                        "mass",
                        half,
                        self.log.mass_series(),
                        &[("Vertical model", v.mass.as_slice()), ("Planar model", p.mass.as_slice())],
                    );
                });
                ui.vertical(|ui| {
                    ui.label("Pitch (deg)");
                    let pitch = p.pitch.as_deref().unwrap_or(&[]);
                    self.chart(ui, "pitch", half, self.log.pitch_series(), &[("Planar model", pitch)]);
                });
            });
        });
    }
}
