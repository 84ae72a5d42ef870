//! In-crate fakes for the link and clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{bail, Result};

use super::{AttitudeFrame, BodyInfo, Clock, FlightLink, NodeId};

/// Clock that only moves when slept on. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub(crate) struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn shared(time: &Rc<Cell<f64>>) -> Self {
        Self { time: Rc::clone(time) }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }

    fn sleep(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.time.set(self.time.get() + seconds);
        }
    }
}

/// Command issued to the fake vessel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Throttle(f64),
    Sas(bool),
    ActionGroup(u32),
    Stage,
    Engage(AttitudeFrame),
    Disengage,
    WaitAttitude,
    Roll(f64),
    PitchHeading(f64, f64),
    AddNode { ut: f64, prograde: f64 },
    RemoveNode(NodeId),
}

/// Scripted vessel.
///
/// Apoapsis moves by `apoapsis_gain` metres per degree of pitch each time a
/// pitch is commanded. Booster fuel runs out at `boosters_empty_at`, engines
/// light at `ignition_at`, apoapsis is reached at `apoapsis_ut`; all times are
/// read from the shared clock cell.
#[derive(Debug)]
pub(crate) struct FakeVessel {
    pub time: Rc<Cell<f64>>,
    pub commands: Rc<RefCell<Vec<(f64, Command)>>>,
    pub stage: u32,
    pub apoapsis: f64,
    pub apoapsis_gain: f64,
    pub periapsis: f64,
    pub apoapsis_ut: f64,
    pub heading: f64,
    pub body: BodyInfo,
    pub mass: f64,
    pub thrust: f64,
    pub isp: f64,
    pub ignition_at: f64,
    pub boosters_empty_at: f64,
    pub fail_pitch_reads: bool,
    pub fail_apoapsis_reads: bool,
    next_node: u64,
}

impl FakeVessel {
    pub fn new(time: &Rc<Cell<f64>>) -> Self {
        Self {
            time: Rc::clone(time),
            commands: Rc::new(RefCell::new(Vec::new())),
            stage: 0,
            apoapsis: 300_000.0,
            apoapsis_gain: 0.0,
            periapsis: -200_000.0,
            apoapsis_ut: 1_000.0,
            heading: 90.0,
            body: BodyInfo { equatorial_radius: 600_000.0, mu: 3.531_6e12 },
            mass: 20_000.0,
            thrust: 200_000.0,
            isp: 345.0,
            ignition_at: 0.0,
            boosters_empty_at: 0.0,
            fail_pitch_reads: false,
            fail_apoapsis_reads: false,
            next_node: 1,
        }
    }

    fn now(&self) -> f64 {
        self.time.get()
    }

    fn push(&self, cmd: Command) {
        self.commands.borrow_mut().push((self.now(), cmd));
    }

    /// Snapshot of the commands issued so far, without timestamps.
    pub fn issued(&self) -> Vec<Command> {
        self.commands.borrow().iter().map(|(_, c)| c.clone()).collect()
    }
}

impl FlightLink for FakeVessel {
    fn universal_time(&self) -> Result<f64> {
        Ok(self.now())
    }

    fn surface_altitude(&self) -> Result<f64> {
        Ok(100.0 * self.now())
    }

    fn apoapsis_altitude(&self) -> Result<f64> {
        if self.fail_apoapsis_reads {
            bail!("connection reset");
        }
        Ok(self.apoapsis)
    }

    fn periapsis_altitude(&self) -> Result<f64> {
        Ok(self.periapsis)
    }

    fn time_to_apoapsis(&self) -> Result<f64> {
        Ok(self.apoapsis_ut - self.now())
    }

    fn semi_major_axis(&self) -> Result<f64> {
        Ok((self.apoapsis + self.periapsis) / 2.0 + self.body.equatorial_radius)
    }

    fn body(&self) -> Result<BodyInfo> {
        Ok(self.body)
    }

    fn heading(&self) -> Result<f64> {
        Ok(self.heading)
    }

    fn pitch(&self) -> Result<f64> {
        if self.fail_pitch_reads {
            bail!("connection reset");
        }
        Ok(90.0 - self.now())
    }

    fn speed(&self) -> Result<f64> {
        Ok(10.0 * self.now())
    }

    fn mass(&self) -> Result<f64> {
        Ok(self.mass)
    }

    fn available_thrust(&self) -> Result<f64> {
        Ok(self.thrust)
    }

    fn specific_impulse(&self) -> Result<f64> {
        Ok(self.isp)
    }

    fn any_engine_active(&self) -> Result<bool> {
        Ok(self.now() >= self.ignition_at)
    }

    fn resource_in_decouple_stage(&self, _stage: i32, _resource: &str) -> Result<f64> {
        Ok(if self.now() >= self.boosters_empty_at { 0.0 } else { 500.0 })
    }

    fn set_throttle(&mut self, throttle: f64) -> Result<()> {
        self.push(Command::Throttle(throttle));
        Ok(())
    }

    fn set_sas(&mut self, enabled: bool) -> Result<()> {
        self.push(Command::Sas(enabled));
        Ok(())
    }

    fn toggle_action_group(&mut self, group: u32) -> Result<()> {
        self.push(Command::ActionGroup(group));
        Ok(())
    }

    fn activate_next_stage(mut self) -> Result<Self> {
        self.push(Command::Stage);
        self.stage += 1;
        Ok(self)
    }

    fn engage_autopilot(&mut self, frame: AttitudeFrame) -> Result<()> {
        self.push(Command::Engage(frame));
        Ok(())
    }

    fn disengage_autopilot(&mut self) -> Result<()> {
        self.push(Command::Disengage);
        Ok(())
    }

    fn wait_for_attitude(&mut self) -> Result<()> {
        self.push(Command::WaitAttitude);
        Ok(())
    }

    fn set_target_roll(&mut self, roll: f64) -> Result<()> {
        self.push(Command::Roll(roll));
        Ok(())
    }

    fn set_pitch_and_heading(&mut self, pitch: f64, heading: f64) -> Result<()> {
        self.push(Command::PitchHeading(pitch, heading));
        self.apoapsis += self.apoapsis_gain * pitch;
        Ok(())
    }

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeId> {
        self.push(Command::AddNode { ut, prograde });
        let id = NodeId(self.next_node);
        self.next_node += 1;
        Ok(id)
    }

    fn remove_maneuver_node(&mut self, node: NodeId) -> Result<()> {
        self.push(Command::RemoveNode(node));
        Ok(())
    }
}
