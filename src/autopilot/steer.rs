use anyhow::Result;

use crate::gnc::{ApoapsisOscillator, HeadingHold, OscillatorStep};
use crate::link::{AttitudeFrame, Clock, FlightLink};

use super::plan::SteerPlan;
use super::Ascent;

impl<L: FlightLink, C: Clock> Ascent<L, C> {
    /// Apoapsis band loop, final nudge and heading hold. Returns the
    /// apoapsis (m) once the time budget is spent.
    pub(super) fn steer(&mut self, plan: &SteerPlan) -> Result<f64> {
        let start = self.clock.now();
        let heading = plan.heading;

        self.link.engage_autopilot(AttitudeFrame::Surface)?;
        self.link.set_target_roll(0.0)?;
        self.link.set_pitch_and_heading(plan.initial_pitch, heading)?;
        self.clock.sleep(1.0);

        let setup_hold = HeadingHold::new(heading, plan.initial_heading_tolerance);
        if setup_hold.needs_correction(self.link.heading()?) {
            log::debug!("heading off before steering; re-commanding");
            self.link.set_pitch_and_heading(plan.initial_pitch, heading)?;
            self.link.wait_for_attitude()?;
            self.clock.sleep(1.0);
        }

        self.link.set_throttle(1.0)?;

        let mut osc = ApoapsisOscillator::new(plan.band, plan.limits, plan.initial_pitch, plan.max_oscillations);
        let loop_hold = HeadingHold::new(heading, plan.loop_heading_tolerance);

        while self.clock.since(start) < plan.duration && !osc.exhausted() {
            let apoapsis_km = self.link.apoapsis_altitude()? / 1000.0;
            let current_heading = self.link.heading()?;

            match osc.step(apoapsis_km) {
                OscillatorStep::Adjust(pitch) => {
                    self.link.set_pitch_and_heading(pitch, heading)?;
                    if loop_hold.needs_correction(current_heading) {
                        self.link.set_pitch_and_heading(pitch, heading)?;
                    }
                }
                OscillatorStep::Switched(mode) => {
                    log::info!(
                        "apoapsis {:.1} km: {:?} (oscillation {}/{})",
                        apoapsis_km,
                        mode,
                        osc.oscillations(),
                        osc.max_oscillations
                    );
                }
            }

            self.clock.sleep(plan.cadence);
        }

        // Final nudge toward the band midpoint
        let apoapsis_km = self.link.apoapsis_altitude()? / 1000.0;
        if let Some(pitch) = osc.final_nudge(apoapsis_km) {
            log::info!("apoapsis {:.1} km off band centre; pitch {:.1} deg", apoapsis_km, pitch);
            self.link.set_pitch_and_heading(pitch, heading)?;
            self.clock.sleep(plan.nudge_settle);
        }

        // Hold the last pitch for what is left of the budget
        let remaining = (plan.duration - self.clock.since(start)).max(0.0);
        if remaining > 0.0 {
            let hold = HeadingHold::new(heading, plan.hold_heading_tolerance);
            let phase_start = self.clock.now();
            while self.clock.since(phase_start) < remaining {
                if hold.needs_correction(self.link.heading()?) {
                    self.link.set_pitch_and_heading(osc.pitch(), heading)?;
                }
                self.clock.sleep(plan.cadence);
            }
        }

        self.link.disengage_autopilot()?;
        let apoapsis = self.link.apoapsis_altitude()?;
        if !plan.band.contains(apoapsis / 1000.0) {
            log::warn!(
                "apoapsis {:.1} km ended outside {:.0}-{:.0} km",
                apoapsis / 1000.0,
                plan.band.low_km,
                plan.band.high_km
            );
        }
        Ok(apoapsis)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::link::testing::{Command, FakeVessel, ManualClock};

    fn ascent(vessel: impl FnOnce(&mut FakeVessel)) -> Ascent<FakeVessel, ManualClock> {
        let time = Rc::new(Cell::new(0.0));
        let mut v = FakeVessel::new(&time);
        vessel(&mut v);
        Ascent::new(v, ManualClock::shared(&time))
    }

    fn pitch_commands(issued: &[Command]) -> Vec<f64> {
        issued
            .iter()
            .filter_map(|c| match c {
                Command::PitchHeading(p, _) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn setup_engages_surface_frame_then_throttles_up() {
        let mut a = ascent(|v| v.apoapsis = 212_000.0);
        let plan = SteerPlan { duration: 2.0, ..SteerPlan::default() };
        a.steer(&plan).unwrap();
        let issued = a.link.issued();
        assert_eq!(issued[0], Command::Engage(AttitudeFrame::Surface));
        assert_eq!(issued[1], Command::Roll(0.0));
        assert_eq!(issued[2], Command::PitchHeading(90.0, 90.0));
        assert_eq!(issued[3], Command::Throttle(1.0));
        assert_eq!(issued.last(), Some(&Command::Disengage));
    }

    #[test]
    fn unresponsive_apoapsis_times_out_and_nudges() {
        // Apoapsis stuck at 300 km: the loop pitches down to the floor for
        // the whole budget, then the nudge stays clamped.
        let mut a = ascent(|v| v.apoapsis = 300_000.0);
        let plan = SteerPlan::default();
        let apo = a.steer(&plan).unwrap();
        assert_eq!(apo, 300_000.0);

        let issued = a.link.issued();
        let pitches = pitch_commands(&issued);
        assert_eq!(pitches[0], 90.0);
        // Lowering only clamps from below: a steady pitch-down from vertical.
        assert!(pitches.windows(2).all(|w| w[1] <= w[0]));
        assert!(pitches.iter().all(|p| *p >= -30.0));
        assert_eq!(*pitches.last().unwrap(), -30.0);

        // Budget plus the nudge settle.
        let now = a.clock.now();
        assert!(now >= 80.0 + 2.0 && now < 80.0 + 2.0 + 0.2, "ended at {}", now);
    }

    #[test]
    fn oscillation_cap_ends_loop_early_then_holds() {
        let mut a = ascent(|v| {
            v.apoapsis = 180_000.0;
            v.apoapsis_gain = 60.0;
        });
        let plan = SteerPlan::default();
        let apo = a.steer(&plan).unwrap();

        // Ends within the budget (hold phase fills it) and near the band.
        let now = a.clock.now();
        assert!(now >= 80.0 && now < 80.2, "ended at {}", now);
        assert!(apo > 190_000.0 && apo < 235_000.0, "apoapsis {}", apo);

        let pitches = pitch_commands(&a.link.issued());
        assert!(pitches[1..].iter().all(|p| (-30.0..=10.0).contains(p)));
    }

    #[test]
    fn heading_drift_forces_recommand() {
        let mut steady = ascent(|v| v.apoapsis = 300_000.0);
        let mut drifting = ascent(|v| {
            v.apoapsis = 300_000.0;
            v.heading = 93.0;
        });
        let plan = SteerPlan { duration: 5.0, ..SteerPlan::default() };
        steady.steer(&plan).unwrap();
        drifting.steer(&plan).unwrap();

        let n_steady = pitch_commands(&steady.link.issued()).len();
        let n_drifting = pitch_commands(&drifting.link.issued()).len();
        assert!(n_drifting > n_steady);
        assert!(drifting.link.issued().contains(&Command::WaitAttitude));
        assert!(!steady.link.issued().contains(&Command::WaitAttitude));
    }
}
