use anyhow::Result;

use crate::gnc::{remaining_delta_v, BurnPlan, OrbitSnapshot};
use crate::link::{poll_until, AttitudeFrame, Clock, FlightLink};

use super::plan::OrbitPlan;
use super::Ascent;

/// What the circularization burn was planned as and where it left the orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnOutcome {
    pub plan: BurnPlan,
    pub apoapsis: f64,  // m
    pub periapsis: f64, // m
}

impl<L: FlightLink, C: Clock> Ascent<L, C> {
    fn orbit_snapshot(&self) -> Result<OrbitSnapshot> {
        let body = self.link.body()?;
        Ok(OrbitSnapshot {
            apoapsis_altitude: self.link.apoapsis_altitude()?,
            periapsis_altitude: self.link.periapsis_altitude()?,
            semi_major_axis: self.link.semi_major_axis()?,
            body_radius: body.equatorial_radius,
            mu: body.mu,
        })
    }

    /// Node at apoapsis, align, burn centred on apoapsis, clean up.
    pub(super) fn execute_circularization(&mut self, plan: &OrbitPlan) -> Result<BurnOutcome> {
        let orbit = self.orbit_snapshot()?;
        let delta_v = BurnPlan::delta_v(&orbit, plan.target_apoapsis, plan.target_periapsis);

        let node_ut = self.link.universal_time()? + self.link.time_to_apoapsis()?;
        let node = self.link.add_maneuver_node(node_ut, delta_v)?;
        self.link.engage_autopilot(AttitudeFrame::ManeuverNode(node))?;
        self.link.wait_for_attitude()?;

        let burn = BurnPlan {
            delta_v,
            burn_time: BurnPlan::burn_time(
                delta_v,
                self.link.available_thrust()?,
                self.link.specific_impulse()?,
                self.link.mass()?,
            ),
        };
        log::info!(
            "circularization: {:.1} m/s over {:.1} s, node at UT {:.1}",
            burn.delta_v,
            burn.burn_time,
            node_ut
        );

        if burn.burn_time > 0.0 {
            let lead = burn.burn_time / 2.0;
            let Self { link, clock, .. } = &mut *self;
            poll_until(clock, plan.align_poll, None, || Ok(link.time_to_apoapsis()? <= lead))?;

            self.link.set_throttle(1.0)?;
            let burn_start = self.clock.now();
            loop {
                let elapsed = self.clock.since(burn_start);
                let remaining = remaining_delta_v(burn.delta_v, elapsed, burn.burn_time);
                if elapsed >= burn.burn_time || remaining <= plan.cutoff_delta_v {
                    break;
                }
                log::debug!("burning: {:.1} m/s to go", remaining);
                self.clock.sleep(plan.burn_poll);
            }
            self.link.set_throttle(0.0)?;
        } else {
            log::warn!("no usable burn for {:.1} m/s; skipping throttle", burn.delta_v);
        }

        self.link.disengage_autopilot()?;
        self.link.remove_maneuver_node(node)?;
        self.clock.sleep(plan.settle);

        let apoapsis = self.link.apoapsis_altitude()?;
        let periapsis = self.link.periapsis_altitude()?;
        log::info!("orbit {:.1} x {:.1} km", apoapsis / 1000.0, periapsis / 1000.0);
        Ok(BurnOutcome { plan: burn, apoapsis, periapsis })
    }
}
