use anyhow::Result;

use super::clock::Clock;

/// How a [`poll_until`] wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Satisfied,
    TimedOut,
}

/// Evaluate `condition` every `interval` seconds until it holds or `timeout`
/// seconds have passed. The condition is checked before the first sleep.
/// Errors from the condition end the wait immediately.
pub fn poll_until<C, F>(clock: &mut C, interval: f64, timeout: Option<f64>, mut condition: F) -> Result<PollOutcome>
where
    C: Clock,
    F: FnMut() -> Result<bool>,
{
    let start = clock.now();
    loop {
        if condition()? {
            return Ok(PollOutcome::Satisfied);
        }
        if let Some(limit) = timeout {
            if clock.since(start) >= limit {
                return Ok(PollOutcome::TimedOut);
            }
        }
        clock.sleep(interval);
    }
}
