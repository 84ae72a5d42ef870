use crate::physics::gravity::vis_viva_speed;

/// Gravity constant used to turn specific impulse into exhaust velocity.
pub const ISP_TO_EXHAUST: f64 = 9.82;

/// Longest burn the planner will command (s).
pub const MAX_BURN_TIME: f64 = 300.0;

/// Orbit and body values read from the game before planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSnapshot {
    pub apoapsis_altitude: f64,  // m above the surface
    pub periapsis_altitude: f64, // m above the surface
    pub semi_major_axis: f64,    // m
    pub body_radius: f64,        // m
    pub mu: f64,                 // m^3/s^2
}

// ---------------------------------------------------------------------------
// Circularization burn: vis-viva delta-v + rocket-equation duration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnPlan {
    pub delta_v: f64,   // m/s, prograde at apoapsis
    pub burn_time: f64, // s, clamped into [0, MAX_BURN_TIME]
}

impl BurnPlan {
    /// Prograde delta-v at the current apoapsis to reach the target orbit's
    /// semi-major axis.
    pub fn delta_v(orbit: &OrbitSnapshot, target_apoapsis: f64, target_periapsis: f64) -> f64 {
        let r_apo = orbit.apoapsis_altitude + orbit.body_radius;
        let target_sma = (target_apoapsis + target_periapsis) / 2.0 + orbit.body_radius;
        let v_now = vis_viva_speed(orbit.mu, r_apo, orbit.semi_major_axis);
        let v_target = vis_viva_speed(orbit.mu, r_apo, target_sma);
        v_target - v_now
    }

    /// Burn duration for `delta_v` from thrust, specific impulse and mass.
    ///
    /// Zero when the flow rate is zero or the result is not finite.
    pub fn burn_time(delta_v: f64, thrust: f64, isp: f64, mass: f64) -> f64 {
        let ve = isp * ISP_TO_EXHAUST;
        let m1 = mass / (delta_v / ve).exp();
        let flow_rate = thrust / ve;
        let t = if flow_rate > 0.0 { (mass - m1) / flow_rate } else { 0.0 };
        if t.is_finite() {
            t.clamp(0.0, MAX_BURN_TIME)
        } else {
            0.0
        }
    }

    pub fn compute(
        orbit: &OrbitSnapshot,
        target_apoapsis: f64,
        target_periapsis: f64,
        thrust: f64,
        isp: f64,
        mass: f64,
    ) -> Self {
        let delta_v = Self::delta_v(orbit, target_apoapsis, target_periapsis);
        Self {
            delta_v,
            burn_time: Self::burn_time(delta_v, thrust, isp, mass),
        }
    }
}

/// Linearly decaying estimate of delta-v still to burn. Not fed back into
/// the burn; the duration is purely predictive.
pub fn remaining_delta_v(delta_v: f64, elapsed: f64, burn_time: f64) -> f64 {
    if burn_time <= 0.0 {
        return 0.0;
    }
    (delta_v * (1.0 - elapsed / burn_time)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KERBIN_MU: f64 = 3.531_6e12;
    const KERBIN_R: f64 = 600_000.0;

    fn suborbital() -> OrbitSnapshot {
        // 210 km apoapsis, periapsis deep inside the planet.
        let apo = 210_000.0;
        let peri = -300_000.0;
        OrbitSnapshot {
            apoapsis_altitude: apo,
            periapsis_altitude: peri,
            semi_major_axis: (apo + peri) / 2.0 + KERBIN_R,
            body_radius: KERBIN_R,
            mu: KERBIN_MU,
        }
    }

    #[test]
    fn circularization_delta_v_reaches_circular_speed() {
        let orbit = suborbital();
        let dv = BurnPlan::delta_v(&orbit, 210_000.0, 210_000.0);
        let r = 810_000.0;
        let v_apo = vis_viva_speed(KERBIN_MU, r, orbit.semi_major_axis);
        assert!(dv > 0.0);
        assert!((v_apo + dv - (KERBIN_MU / r).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn already_circular_needs_nothing() {
        let orbit = OrbitSnapshot {
            apoapsis_altitude: 210_000.0,
            periapsis_altitude: 210_000.0,
            semi_major_axis: 810_000.0,
            body_radius: KERBIN_R,
            mu: KERBIN_MU,
        };
        let plan = BurnPlan::compute(&orbit, 210_000.0, 210_000.0, 60_000.0, 345.0, 5_000.0);
        assert!(plan.delta_v.abs() < 1e-9);
        assert!(plan.burn_time.abs() < 1e-6);
    }

    #[test]
    fn burn_time_from_rocket_equation() {
        let t = BurnPlan::burn_time(500.0, 60_000.0, 345.0, 5_000.0);
        let ve = 345.0 * ISP_TO_EXHAUST;
        let expected = (5_000.0 - 5_000.0 / (500.0 / ve).exp()) / (60_000.0 / ve);
        assert!((t - expected).abs() < 1e-9);
        assert!(t > 0.0 && t < MAX_BURN_TIME);
    }

    #[test]
    fn burn_time_always_clamped() {
        let dvs = [-2_000.0, -1.0, 0.0, 1.0, 800.0, 5_000.0, 1e9];
        let thrusts = [0.0, 1.0, 60_000.0, 1e9];
        let isps = [0.0, 1.0, 345.0, 10_000.0];
        let masses = [0.0, 1.0, 5_000.0, 1e8];
        for &dv in &dvs {
            for &f in &thrusts {
                for &isp in &isps {
                    for &m in &masses {
                        let t = BurnPlan::burn_time(dv, f, isp, m);
                        assert!(
                            (0.0..=MAX_BURN_TIME).contains(&t),
                            "dv={} F={} isp={} m={} -> {}",
                            dv, f, isp, m, t
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn zero_flow_rate_gives_zero() {
        assert_eq!(BurnPlan::burn_time(500.0, 0.0, 345.0, 5_000.0), 0.0);
        assert_eq!(BurnPlan::burn_time(f64::NAN, 60_000.0, 345.0, 5_000.0), 0.0);
    }

    #[test]
    fn long_burns_cap_at_limit() {
        let t = BurnPlan::burn_time(3_000.0, 1_000.0, 345.0, 50_000.0);
        assert_eq!(t, MAX_BURN_TIME);
    }

    #[test]
    fn remaining_delta_v_decays_linearly() {
        assert_eq!(remaining_delta_v(400.0, 0.0, 40.0), 400.0);
        assert!((remaining_delta_v(400.0, 10.0, 40.0) - 300.0).abs() < 1e-12);
        assert_eq!(remaining_delta_v(400.0, 50.0, 40.0), 0.0);
        assert_eq!(remaining_delta_v(400.0, 1.0, 0.0), 0.0);
    }
}
