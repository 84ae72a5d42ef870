// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Hardware dropped; mass before and after the drop.
    Jettison { name: String, mass_before: f64, mass_after: f64 },
    /// Active propulsion phase stopped producing thrust.
    Burnout,
    /// Mass floored at zero: the vehicle data is inconsistent.
    MassDepleted,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
}

impl SimEvent {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    /// One-line description for reports.
    pub fn describe(&self) -> String {
        match &self.kind {
            EventKind::Jettison { name, mass_before, mass_after } => format!(
                "t={:>6.1}s  JETTISON {}  {:.0} kg -> {:.0} kg",
                self.time, name, mass_before, mass_after
            ),
            EventKind::Burnout => format!("t={:>6.1}s  BURNOUT", self.time),
            EventKind::MassDepleted => format!("t={:>6.1}s  MASS DEPLETED", self.time),
        }
    }
}
