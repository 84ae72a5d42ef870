use crate::vehicle::VerticalVehicle;

use super::event::{EventKind, SimEvent};
use super::state::{SimConfig, VerticalState};

/// Output of the vertical model.
#[derive(Debug, Clone)]
pub struct VerticalRun {
    pub trajectory: Vec<VerticalState>,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// Forward-Euler vertical ascent
// ---------------------------------------------------------------------------

/// Integrate the vertical-only model from ignition to `config.max_time`.
///
/// Step order: burn propellant, evaluate forces with the post-burn mass,
/// advance velocity and altitude (altitude with the old velocity), advance
/// time, then drop the boosters once their jettison time is reached.
pub fn simulate_vertical(vehicle: &VerticalVehicle, config: &SimConfig) -> VerticalRun {
    let dt = config.dt;
    let mut t = 0.0;
    let mut h = vehicle.initial_altitude;
    let mut v = vehicle.initial_velocity;
    let mut m = vehicle.initial_mass;

    let mut trajectory = Vec::with_capacity(config.samples().saturating_add(1).min(200_000));
    let mut events = Vec::new();
    trajectory.push(VerticalState { time: t, altitude: h, velocity: v, mass: m });

    log::debug!("vertical model: start m={:.0} kg, dt={} s, horizon={} s", m, dt, config.max_time);

    if !config.is_valid() {
        log::warn!("invalid model config (dt={}, horizon={}); returning the initial state", dt, config.max_time);
        return VerticalRun { trajectory, events };
    }

    let mut boosters_attached = true;
    let mut burning = true;
    let mut depleted = false;

    while t < config.max_time {
        if t + dt <= t {
            log::warn!("step {} s no longer advances time at t={} s; stopping", dt, t);
            break;
        }
        // Propellant
        let (thrust, flow) = vehicle.propulsion.at(t);
        m = (m - flow * dt).max(0.0);

        // Forces
        let weight = vehicle.body.weight(m, h);
        let drag = vehicle.aero.drag_1d(vehicle.atmosphere.density(h), v);
        let a = if m > 0.0 { (thrust - weight - drag) / m } else { 0.0 };

        // Integrate
        let v_new = v + a * dt;
        let h_new = h + v * dt;
        t += dt;

        // Staging after the physics of this step
        if boosters_attached && t >= vehicle.boosters.time {
            boosters_attached = false;
            let before = m;
            m = (m - vehicle.boosters.total_mass()).max(0.0);
            log::info!(
                "jettison {} at {:.1} s: {:.0} kg -> {:.0} kg, v={:.1} m/s",
                vehicle.boosters.name, t, before, m, v_new
            );
            events.push(SimEvent::new(
                t,
                EventKind::Jettison {
                    name: vehicle.boosters.name.clone(),
                    mass_before: before,
                    mass_after: m,
                },
            ));
        }

        if burning && vehicle.propulsion.at(t).0 == 0.0 {
            burning = false;
            events.push(SimEvent::new(t, EventKind::Burnout));
        }

        if !depleted && m <= 0.0 {
            depleted = true;
            log::warn!("vehicle mass reached zero at {:.1} s; acceleration held at zero", t);
            events.push(SimEvent::new(t, EventKind::MassDepleted));
        }

        v = v_new;
        h = h_new;
        trajectory.push(VerticalState { time: t, altitude: h, velocity: v, mass: m });
    }

    VerticalRun { trajectory, events }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
