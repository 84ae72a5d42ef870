//! Scripted ascent: boosters, apoapsis steering, coast, circularization.
//!
//! Each phase takes the [`Ascent`] context by value and hands it back, so the
//! vessel handle replaced by a staging event is never reachable afterwards.

mod plan;
mod steer;
mod burn;

pub use plan::{AscentPlan, OrbitPlan, SteerPlan};
pub use burn::BurnOutcome;

use anyhow::{Context, Result};

use crate::link::{poll_until, Clock, FlightLink, PollOutcome};

/// Results worth reporting after a full ascent.
#[derive(Debug, Clone, PartialEq)]
pub struct AscentReport {
    pub steer_apoapsis: f64, // m, apoapsis when steering ended
    pub orbit: BurnOutcome,
    pub stages_fired: u32,
}

/// Context threaded through every ascent phase.
pub struct Ascent<L, C> {
    pub link: L,
    pub clock: C,
    stages_fired: u32,
}

impl<L: FlightLink, C: Clock> Ascent<L, C> {
    pub fn new(link: L, clock: C) -> Self {
        Self { link, clock, stages_fired: 0 }
    }

    pub fn stages_fired(&self) -> u32 {
        self.stages_fired
    }

    /// Fire the next stage and continue with the vessel active afterwards.
    pub fn stage(self) -> Result<Self> {
        let Self { link, clock, stages_fired } = self;
        let link = link
            .activate_next_stage()
            .with_context(|| format!("staging event {}", stages_fired + 1))?;
        log::info!("stage {} activated", stages_fired + 1);
        Ok(Self { link, clock, stages_fired: stages_fired + 1 })
    }

    /// Stage, then let the separation settle.
    fn stage_and_settle(self, settle: f64) -> Result<Self> {
        let mut next = self.stage()?;
        next.clock.sleep(settle);
        Ok(next)
    }

    // -- phases -----------------------------------------------------------

    /// Full throttle, SAS on, ignite.
    pub fn launch(mut self, plan: &AscentPlan) -> Result<Self> {
        log::info!("launch: throttle up, SAS on");
        self.link.set_throttle(1.0)?;
        self.link.set_sas(true)?;
        self.clock.sleep(plan.pre_ignition_wait);
        let mut next = self.stage()?;
        next.clock.sleep(plan.post_ignition_wait);
        Ok(next)
    }

    /// Wait until the solid boosters report no fuel left.
    pub fn burn_boosters(mut self, plan: &AscentPlan) -> Result<Self> {
        let Self { link, clock, .. } = &mut self;
        let stage = plan.booster_decouple_stage;
        let resource = plan.booster_resource.as_str();
        let start = clock.now();
        poll_until(clock, plan.booster_poll, None, || {
            Ok(link.resource_in_decouple_stage(stage, resource)? <= 0.0)
        })?;
        log::info!("boosters burned out after {:.1} s", self.clock.since(start));
        Ok(self)
    }

    /// Drop the spent boosters and idle the core.
    pub fn drop_boosters(self, plan: &AscentPlan) -> Result<Self> {
        let mut next = self.stage()?;
        next.link.set_throttle(0.0)?;
        next.clock.sleep(plan.separation_settle);
        Ok(next)
    }

    /// Steer apoapsis into the target band; returns the final apoapsis (m).
    pub fn steer_to_apoapsis_band(mut self, plan: &SteerPlan) -> Result<(Self, f64)> {
        let apoapsis = self.steer(plan)?;
        Ok((self, apoapsis))
    }

    /// Cut the engine, stage, and coast until apoapsis clears the threshold.
    pub fn coast(mut self, plan: &AscentPlan) -> Result<Self> {
        self.link.set_throttle(0.0)?;
        let mut next = self.stage_and_settle(plan.separation_settle)?;
        let Self { link, clock, .. } = &mut next;
        let threshold = plan.coast_apoapsis;
        let outcome = poll_until(clock, plan.coast_poll, plan.coast_timeout, || {
            Ok(link.apoapsis_altitude()? >= threshold)
        })?;
        if outcome == PollOutcome::TimedOut {
            log::warn!("apoapsis still below {:.0} m; continuing", threshold);
        }
        Ok(next)
    }

    /// Jettison the transfer hardware and arm the orbital stage.
    pub fn prepare_orbit_stage(mut self, plan: &AscentPlan) -> Result<Self> {
        for _ in 0..plan.orbit_stage_events {
            self = self.stage_and_settle(plan.separation_settle)?;
        }
        self.link.toggle_action_group(plan.orbit_action_group)?;
        Ok(self)
    }

    /// Plan and execute the circularization burn.
    pub fn circularize(mut self, plan: &OrbitPlan) -> Result<(Self, BurnOutcome)> {
        let outcome = self.execute_circularization(plan)?;
        Ok((self, outcome))
    }

    /// Final separations once in orbit.
    pub fn separate_payload(mut self, plan: &AscentPlan) -> Result<Self> {
        for _ in 0..plan.payload_stage_events {
            self = self.stage_and_settle(plan.separation_settle)?;
        }
        Ok(self)
    }

    /// Run every phase in order.
    pub fn fly(self, plan: &AscentPlan) -> Result<(Self, AscentReport)> {
        let ascent = self
            .launch(plan)
            .context("launch")?
            .burn_boosters(plan)
            .context("booster burn")?
            .drop_boosters(plan)
            .context("booster separation")?;

        let (ascent, steer_apoapsis) = ascent
            .steer_to_apoapsis_band(&plan.steer)
            .context("apoapsis steering")?;
        log::info!("steering done, apoapsis {:.1} km", steer_apoapsis / 1000.0);

        let ascent = ascent
            .coast(plan)
            .context("coast")?
            .prepare_orbit_stage(plan)
            .context("orbit stage")?;

        let (mut ascent, orbit) = ascent.circularize(&plan.orbit).context("circularization")?;
        ascent.clock.sleep(plan.orbit.settle);
        let ascent = ascent.separate_payload(plan).context("payload separation")?;

        let report = AscentReport {
            steer_apoapsis,
            orbit,
            stages_fired: ascent.stages_fired,
        };
        Ok((ascent, report))
    }
}
