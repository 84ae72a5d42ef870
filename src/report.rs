//! Model-versus-log comparison: overlay charts and summary numbers.

use plotters::style::{BLUE, GREEN, MAGENTA, RGBColor};

use crate::io::flight_log::FlightLog;
use crate::plot::{Overlay, KINEMATIC_MARGIN, MASS_MARGIN};
use crate::sim::{PlanarRun, SimConfig, SimEvent, VerticalRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Vertical,
    Planar,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Vertical => "vertical",
            ModelKind::Planar => "planar",
        }
    }
}

/// Time series of one model run, in the same units as the flight log.
#[derive(Debug, Clone)]
pub struct ModelSeries {
    pub vehicle: String,
    pub kind: ModelKind,
    pub dt: f64,
    pub horizon: f64,
    pub altitude: Vec<[f64; 2]>,
    pub speed: Vec<[f64; 2]>,
    pub mass: Vec<[f64; 2]>,
    pub pitch: Option<Vec<[f64; 2]>>,
    pub events: Vec<SimEvent>,
}

impl ModelSeries {
    pub fn vertical(vehicle: &str, config: &SimConfig, run: &VerticalRun) -> Self {
        let t = &run.trajectory;
        Self {
            vehicle: vehicle.to_string(),
            kind: ModelKind::Vertical,
            dt: config.dt,
            horizon: config.max_time,
            altitude: t.iter().map(|s| [s.time, s.altitude]).collect(),
            speed: t.iter().map(|s| [s.time, s.velocity]).collect(),
            mass: t.iter().map(|s| [s.time, s.mass]).collect(),
            pitch: None,
            events: run.events.clone(),
        }
    }

    pub fn planar(vehicle: &str, config: &SimConfig, run: &PlanarRun) -> Self {
        let t = &run.trajectory;
        Self {
            vehicle: vehicle.to_string(),
            kind: ModelKind::Planar,
            dt: config.dt,
            horizon: config.max_time,
            altitude: t.iter().map(|s| [s.time, s.altitude()]).collect(),
            speed: t.iter().map(|s| [s.time, s.speed()]).collect(),
            mass: t.iter().map(|s| [s.time, s.mass]).collect(),
            pitch: Some(t.iter().map(|s| [s.time, s.pitch]).collect()),
            events: run.events.clone(),
        }
    }

    fn label(&self) -> String {
        format!("{} model ({})", self.kind.as_str(), self.vehicle)
    }
}

/// Linear interpolation of `series` (sorted by time) at `t`; `None` outside
/// its time span.
pub fn interpolate(series: &[[f64; 2]], t: f64) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    if t < first[0] || t > last[0] {
        return None;
    }
    let i = series.partition_point(|p| p[0] < t);
    if i == 0 {
        return Some(first[1]);
    }
    let [t1, y1] = series[i.min(series.len() - 1)];
    let [t0, y0] = series[i - 1];
    if t1 <= t0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (t - t0) / (t1 - t0))
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn overlay(
    stem: &str,
    title: &str,
    y_label: &str,
    logged: Vec<[f64; 2]>,
    model: &[[f64; 2]],
    model_label: &str,
    margin: f64,
    color: RGBColor,
) -> Overlay {
    Overlay {
        stem: stem.into(),
        title: title.into(),
        y_label: y_label.into(),
        logged,
        model: model.to_vec(),
        model_label: model_label.into(),
        margin,
        color,
    }
}

/// Height, velocity and mass overlays, plus pitch when the model has one.
pub fn overlays(model: &ModelSeries, log: &FlightLog) -> Vec<Overlay> {
    let label = model.label();
    let mut charts = vec![
        overlay(
            "graph_height_comparison",
            "Height: logged flight vs model",
            "Height, m",
            log.altitude_series(),
            &model.altitude,
            &label,
            KINEMATIC_MARGIN,
            BLUE,
        ),
        overlay(
            "graph_velocity_comparison",
            "Velocity: logged flight vs model",
            "Velocity, m/s",
            log.speed_series(),
            &model.speed,
            &label,
            KINEMATIC_MARGIN,
            GREEN,
        ),
        overlay(
            "graph_mass_comparison",
            "Mass: logged flight vs model",
            "Mass, kg",
            log.mass_series(),
            &model.mass,
            &label,
            MASS_MARGIN,
            MAGENTA,
        ),
    ];
    if let Some(pitch) = &model.pitch {
        charts.push(overlay(
            "graph_pitch_comparison",
            "Pitch: logged flight vs model",
            "Pitch, deg",
            log.pitch_series(),
            pitch,
            &label,
            KINEMATIC_MARGIN,
            RGBColor(255, 140, 0),
        ));
    }
    charts
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassChange {
    pub initial: f64,
    pub final_mass: f64,
    pub delta: f64,
}

/// Root-mean-square model error at the logged sample times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residuals {
    pub samples: usize,
    pub altitude_rms: f64,
    pub speed_rms: f64,
    pub mass_rms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSummary {
    pub vehicle: String,
    pub kind: ModelKind,
    pub dt: f64,
    pub horizon: f64,
    pub final_altitude: f64,
    pub final_speed: f64,
    pub final_mass: f64,
    pub events: Vec<SimEvent>,
    pub logged_points: usize,
    pub skipped_lines: usize,
    pub logged_mass: Option<MassChange>,
    pub residuals: Option<Residuals>,
}

fn rms(sum_sq: f64, n: usize) -> f64 {
    (sum_sq / n as f64).sqrt()
}

pub fn residuals(model: &ModelSeries, log: &FlightLog) -> Option<Residuals> {
    let mut n = 0;
    let (mut alt, mut spd, mut mass) = (0.0, 0.0, 0.0);
    for r in &log.records {
        if ![r.altitude, r.speed, r.mass].iter().all(|x| x.is_finite()) {
            continue;
        }
        let (Some(h), Some(v), Some(m)) = (
            interpolate(&model.altitude, r.time),
            interpolate(&model.speed, r.time),
            interpolate(&model.mass, r.time),
        ) else {
            continue;
        };
        alt += (h - r.altitude).powi(2);
        spd += (v - r.speed).powi(2);
        mass += (m - r.mass).powi(2);
        n += 1;
    }
    (n > 0).then(|| Residuals {
        samples: n,
        altitude_rms: rms(alt, n),
        speed_rms: rms(spd, n),
        mass_rms: rms(mass, n),
    })
}

impl ComparisonSummary {
    pub fn build(model: &ModelSeries, log: &FlightLog) -> Self {
        let last = |s: &[[f64; 2]]| s.last().map_or(0.0, |p| p[1]);
        let logged_mass = match (log.first(), log.last()) {
            (Some(a), Some(b)) => Some(MassChange {
                initial: a.mass,
                final_mass: b.mass,
                delta: a.mass - b.mass,
            }),
            _ => None,
        };
        Self {
            vehicle: model.vehicle.clone(),
            kind: model.kind,
            dt: model.dt,
            horizon: model.horizon,
            final_altitude: last(&model.altitude),
            final_speed: last(&model.speed),
            final_mass: last(&model.mass),
            events: model.events.clone(),
            logged_points: log.len(),
            skipped_lines: log.skipped,
            logged_mass,
            residuals: residuals(model, log),
        }
    }
}
