use nalgebra::Vector2;

use crate::vehicle::PlanarVehicle;

use super::event::{EventKind, SimEvent};
use super::state::{PlanarState, SimConfig};

/// Output of the planar model.
#[derive(Debug, Clone)]
pub struct PlanarRun {
    pub trajectory: Vec<PlanarState>,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// Forward-Euler ascent in the downrange/altitude plane
// ---------------------------------------------------------------------------

/// Integrate the planar model from ignition to `config.max_time`.
///
/// Same step order as the vertical model. Thrust points along the pitch
/// program's angle for the current altitude, drag opposes the velocity and
/// gravity acts along -y (flat ground, inverse-square magnitude). The
/// booster jettison switches thrust and flow to the core values.
pub fn simulate_planar(vehicle: &PlanarVehicle, config: &SimConfig) -> PlanarRun {
    let dt = config.dt;
    let mut t = 0.0;
    let mut pos = Vector2::new(0.0, vehicle.initial_altitude);
    let mut vel = Vector2::new(0.0, vehicle.initial_velocity);
    let mut m = vehicle.initial_mass;

    let mut trajectory = Vec::with_capacity(config.samples().saturating_add(1).min(200_000));
    let mut events = Vec::new();
    trajectory.push(PlanarState {
        time: t,
        pos,
        vel,
        mass: m,
        pitch: vehicle.pitch_program.pitch_at(pos.y),
    });

    if !config.is_valid() {
        log::warn!("invalid model config (dt={}, horizon={}); returning the initial state", dt, config.max_time);
        return PlanarRun { trajectory, events };
    }

    let mut boosters_attached = true;
    let mut burning = true;
    let mut depleted = false;

    while t < config.max_time {
        if t + dt <= t {
            log::warn!("step {} s no longer advances time at t={} s; stopping", dt, t);
            break;
        }
        let (thrust, flow) = vehicle.propulsion(t, boosters_attached);
        m = (m - flow * dt).max(0.0);

        let altitude = pos.y;
        let pitch = vehicle.pitch_program.pitch_at(altitude);
        let pitch_rad = pitch.to_radians();
        let thrust_vec = Vector2::new(pitch_rad.cos(), pitch_rad.sin()) * thrust;
        let drag = vehicle.aero.drag_2d(vehicle.atmosphere.density(altitude), &vel);
        let gravity = Vector2::new(0.0, -vehicle.body.gravity(altitude));

        let acc = if m > 0.0 {
            (thrust_vec + drag) / m + gravity
        } else {
            Vector2::zeros()
        };

        let vel_new = vel + acc * dt;
        let pos_new = pos + vel * dt;
        t += dt;

        if boosters_attached && t >= vehicle.boosters.time {
            boosters_attached = false;
            let before = m;
            m = (m - vehicle.boosters.total_mass()).max(0.0);
            log::info!(
                "jettison {} at {:.1} s: {:.0} kg -> {:.0} kg, switching to core propulsion",
                vehicle.boosters.name, t, before, m
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

        if burning && vehicle.propulsion(t, boosters_attached).0 == 0.0 {
            burning = false;
            events.push(SimEvent::new(t, EventKind::Burnout));
        }

        if !depleted && m <= 0.0 {
            depleted = true;
            log::warn!("vehicle mass reached zero at {:.1} s; acceleration held at zero", t);
            events.push(SimEvent::new(t, EventKind::MassDepleted));
        }

        vel = vel_new;
        pos = pos_new;
        trajectory.push(PlanarState { time: t, pos, vel, mass: m, pitch });
    }

    PlanarRun { trajectory, events }
}
