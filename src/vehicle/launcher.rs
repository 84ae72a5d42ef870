use crate::gnc::PitchProgram;
use crate::physics::{Aero, Body, ExponentialAtmosphere};

use super::stage::{Jettison, Propulsion};

// ---------------------------------------------------------------------------
// Vertical-ascent vehicle (1-D model)
// ---------------------------------------------------------------------------

/// Vehicle for the vertical-only model: one constant-thrust burn and a single
/// booster jettison.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalVehicle {
    pub name: String,
    pub initial_mass: f64,     // kg, at ignition
    pub initial_altitude: f64, // m, height of the control part above the pad
    pub initial_velocity: f64, // m/s
    pub propulsion: Propulsion,
    pub boosters: Jettison,
    pub aero: Aero,
    pub atmosphere: ExponentialAtmosphere,
    pub body: Body,
}

impl VerticalVehicle {
    /// Propellant burned over the whole phase.
    pub fn propellant_used(&self) -> f64 {
        self.propulsion.mass_flow * self.propulsion.cutoff
    }

    /// Mass left after burnout and jettison.
    ///
    /// The calibration data for the logged flight counts booster propellant
    /// both in the flow rate and in the jettisoned mass, so this can be
    /// negative; the model floors mass at zero.
    pub fn final_mass(&self) -> f64 {
        self.initial_mass - self.propellant_used() - self.boosters.total_mass()
    }

    /// Thrust-to-weight ratio at ignition.
    pub fn twr(&self) -> f64 {
        self.propulsion.thrust / self.body.weight(self.initial_mass, self.initial_altitude)
    }
}

// ---------------------------------------------------------------------------
// Planar-ascent vehicle (2-D model)
// ---------------------------------------------------------------------------

/// Vehicle for the planar model: boosters plus core burn until jettison,
/// then core only, steered by an altitude-keyed pitch program.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarVehicle {
    pub name: String,
    pub initial_mass: f64,
    pub initial_altitude: f64,
    pub initial_velocity: f64,
    /// Combined thrust and flow while the boosters are attached.
    pub boost: Propulsion,
    /// Core-only thrust and flow after jettison.
    pub core: Propulsion,
    pub boosters: Jettison,
    pub pitch_program: PitchProgram,
    pub aero: Aero,
    pub atmosphere: ExponentialAtmosphere,
    pub body: Body,
}

impl PlanarVehicle {
    /// Active propulsion at time `t` given the booster attachment state.
    pub fn propulsion(&self, t: f64, boosters_attached: bool) -> (f64, f64) {
        if boosters_attached {
            self.boost.at(t)
        } else {
            self.core.at(t)
        }
    }
}

// ---------------------------------------------------------------------------
// Planar vehicle builder
// ---------------------------------------------------------------------------

pub struct PlanarVehicleBuilder {
    vehicle: PlanarVehicle,
}

impl PlanarVehicleBuilder {
    /// Starts from the calibrated "Luna-9" configuration.
    pub fn new(name: impl Into<String>) -> Self {
        let mut vehicle = presets::luna_planar();
        vehicle.name = name.into();
        Self { vehicle }
    }

    pub fn initial_mass(mut self, v: f64) -> Self { self.vehicle.initial_mass = v; self }
    pub fn boost(mut self, v: Propulsion) -> Self { self.vehicle.boost = v; self }
    pub fn core(mut self, v: Propulsion) -> Self { self.vehicle.core = v; self }
    pub fn boosters(mut self, v: Jettison) -> Self { self.vehicle.boosters = v; self }
    pub fn pitch_program(mut self, v: PitchProgram) -> Self { self.vehicle.pitch_program = v; self }
    pub fn aero(mut self, v: Aero) -> Self { self.vehicle.aero = v; self }
    pub fn atmosphere(mut self, v: ExponentialAtmosphere) -> Self { self.vehicle.atmosphere = v; self }
    pub fn body(mut self, v: Body) -> Self { self.vehicle.body = v; self }

    pub fn build(self) -> PlanarVehicle {
        self.vehicle
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Vertical model of the logged "Luna-9" launch: 186.4 t at ignition,
    /// 110.2 t of propellant over 70 s at 3.84 MN, four 24 t boosters dropped
    /// at 62.7 s.
    pub fn luna_vertical() -> VerticalVehicle {
        VerticalVehicle {
            name: "Luna-9".into(),
            initial_mass: 186_417.95,
            initial_altitude: 11.15,
            initial_velocity: 0.74,
            propulsion: Propulsion::from_burn(3_840_000.0, 110_166.31, 70.0),
            boosters: Jettison {
                name: "SRB".into(),
                unit_mass: 24_000.0,
                count: 4,
                time: 62.7,
            },
            aero: Aero::default(),
            atmosphere: ExponentialAtmosphere::default(),
            body: Body::default(),
        }
    }

    /// Planar model of the same launch. Booster and core values are fitted
    /// to the log, not derived from part data.
    pub fn luna_planar() -> PlanarVehicle {
        PlanarVehicle {
            name: "Luna-9".into(),
            initial_mass: 186_417.95,
            initial_altitude: 11.15,
            initial_velocity: 0.74,
            boost: Propulsion { thrust: 3_840_000.0, mass_flow: 1_200.0, cutoff: 62.7 },
            core: Propulsion { thrust: 650_000.0, mass_flow: 215.0, cutoff: 150.0 },
            boosters: Jettison {
                name: "SRB".into(),
                unit_mass: 18_000.0,
                count: 4,
                time: 62.7,
            },
            pitch_program: PitchProgram::default(),
            aero: Aero::default(),
            atmosphere: ExponentialAtmosphere::default(),
            body: Body::default(),
        }
    }
}
