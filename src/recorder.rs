//! Telemetry recorder: waits for ignition, then samples the vessel into a
//! flight log until told to stop.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::io::flight_log::{LogRecord, LogWriter};
use crate::link::{poll_until, Clock, FlightLink, PollOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    pub ignition_poll: f64,  // s between engine checks before launch
    pub sample_poll: f64,    // s between time checks while recording
    pub write_interval: f64, // s of game time between rows
    /// Stop on its own after this much game time (s).
    pub max_duration: Option<f64>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            ignition_poll: 0.1,
            sample_poll: 0.01,
            write_interval: 0.1,
            max_duration: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingSummary {
    pub rows: usize,
    pub duration: f64, // s of game time since ignition
}

pub struct FlightRecorder<L, C, W: Write> {
    link: L,
    clock: C,
    writer: LogWriter<W>,
    config: RecorderConfig,
    stop: Arc<AtomicBool>,
}

impl<L: FlightLink, C: Clock, W: Write> FlightRecorder<L, C, W> {
    pub fn new(link: L, clock: C, writer: LogWriter<W>, config: RecorderConfig) -> Self {
        Self {
            link,
            clock,
            writer,
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends waiting and recording once set, e.g. from a Ctrl-C
    /// handler.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Block until any engine is active. `false` if stopped first.
    pub fn wait_for_ignition(&mut self) -> Result<bool> {
        let Self { link, clock, stop, config, .. } = &mut *self;
        let outcome = poll_until(clock, config.ignition_poll, None, || {
            Ok(stop.load(Ordering::SeqCst) || link.any_engine_active()?)
        })
        .context("waiting for ignition")?;
        Ok(outcome == PollOutcome::Satisfied && !self.stopped())
    }

    fn sample(&self, elapsed: f64) -> Result<LogRecord> {
        Ok(LogRecord {
            time: elapsed,
            pitch: self.link.pitch()?,
            altitude: self.link.surface_altitude()?,
            speed: self.link.speed()?,
            mass: self.link.mass()?,
        })
    }

    /// Write a row every `write_interval` of game time until stopped.
    pub fn record(&mut self) -> Result<RecordingSummary> {
        let mission_start = self.link.universal_time()?;
        let mut last_write = mission_start;
        let mut elapsed = 0.0;

        while !self.stopped() {
            let now = self.link.universal_time()?;
            elapsed = now - mission_start;
            if self.config.max_duration.is_some_and(|max| elapsed >= max) {
                break;
            }

            if now - last_write >= self.config.write_interval {
                let record = self.sample(elapsed).context("sampling telemetry")?;
                self.writer.write(&record).context("writing log row")?;
                last_write = now;

                if elapsed.trunc() != (elapsed - self.config.write_interval).trunc() {
                    log::info!(
                        "[{:.1} s] H={:.0} m, V={:.0} m/s, pitch={:.1} deg",
                        elapsed,
                        record.altitude,
                        record.speed,
                        record.pitch
                    );
                }
            }

            self.clock.sleep(self.config.sample_poll);
        }

        self.writer.flush().context("flushing log")?;
        Ok(RecordingSummary { rows: self.writer.rows(), duration: elapsed })
    }

    /// Wait for ignition and record. No rows if stopped before launch.
    pub fn run(&mut self) -> Result<RecordingSummary> {
        log::info!("waiting for ignition...");
        if !self.wait_for_ignition()? {
            log::info!("stopped before ignition");
            return Ok(RecordingSummary { rows: 0, duration: 0.0 });
        }
        log::info!("ignition detected, recording");
        self.record()
    }

    /// Flush and release the writer and the link.
    pub fn finish(self) -> Result<(L, W)> {
        let inner = self.writer.into_inner().context("closing log")?;
        Ok((self.link, inner))
    }

    /// [`run`](Self::run), then [`finish`](Self::finish) even when recording
    /// failed. A recording error wins over a close error, which is logged.
    pub fn run_and_finish(mut self) -> Result<RecordingSummary> {
        let result = self.run();
        let closed = self.finish();
        match (result, closed) {
            (Ok(summary), Ok(_)) => Ok(summary),
            (Ok(_), Err(close)) => Err(close),
            (Err(run), Ok(_)) => Err(run),
            (Err(run), Err(close)) => {
                log::warn!("closing the log after a failed recording also failed: {:#}", close);
                Err(run)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::io::flight_log::read_log;
    use crate::link::testing::{FakeVessel, ManualClock};

    fn recorder(
        config: RecorderConfig,
        vessel: impl FnOnce(&mut FakeVessel),
    ) -> FlightRecorder<FakeVessel, ManualClock, Vec<u8>> {
        let time = Rc::new(Cell::new(0.0));
        let mut v = FakeVessel::new(&time);
        vessel(&mut v);
        let writer = LogWriter::new(Vec::new()).unwrap();
        FlightRecorder::new(v, ManualClock::shared(&time), writer, config)
    }

    #[test]
    fn waits_for_engines_before_recording() {
        let mut rec = recorder(RecorderConfig::default(), |v| v.ignition_at = 5.0);
        assert!(rec.wait_for_ignition().unwrap());
        let t = rec.clock.now();
        assert!(t >= 5.0 - 1e-9 && t < 5.1 + 1e-9, "ignition seen at {}", t);
    }

    #[test]
    fn rows_are_spaced_by_write_interval() {
        let config = RecorderConfig { max_duration: Some(10.0), ..RecorderConfig::default() };
        let mut rec = recorder(config, |v| v.ignition_at = 2.0);
        let summary = rec.run().unwrap();
        assert!(summary.rows >= 85 && summary.rows <= 100, "{} rows", summary.rows);

        let (_, bytes) = rec.finish().unwrap();
        let log = read_log(bytes.as_slice(), None).unwrap();
        assert_eq!(log.len(), summary.rows);
        assert_eq!(log.skipped, 1);

        for w in log.records.windows(2) {
            assert!(w[1].time >= w[0].time);
            assert!(w[1].time - w[0].time >= 0.1 - 0.01 - 1e-9);
        }
        // Elapsed time restarts at ignition; the fake's pitch and altitude
        // both follow absolute time.
        let first = log.first().unwrap();
        assert!(first.time >= 0.09 && first.time < 0.2);
        assert!(first.pitch < 88.0);
        assert!((first.altitude - 100.0 * (90.0 - first.pitch)).abs() < 1.0);
        assert_eq!(first.mass, 20_000.0);
    }

    #[test]
    fn stop_before_ignition_writes_nothing() {
        let mut rec = recorder(RecorderConfig::default(), |v| v.ignition_at = 1e9);
        rec.stop_flag().store(true, Ordering::SeqCst);
        let summary = rec.run().unwrap();
        assert_eq!(summary.rows, 0);

        let (_, bytes) = rec.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim(), crate::io::flight_log::HEADER);
    }

    #[test]
    fn telemetry_errors_stop_recording() {
        let config = RecorderConfig { max_duration: Some(1.0), ..RecorderConfig::default() };
        let mut rec = recorder(config, |v| v.fail_pitch_reads = true);
        let err = rec.run().unwrap_err();
        let text = format!("{:#}", err);
        assert!(text.contains("sampling telemetry"), "{}", text);
    }

    /// Accepts writes, refuses to flush.
    struct FlushFails(Vec<u8>);

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    fn unflushable(
        config: RecorderConfig,
        vessel: impl FnOnce(&mut FakeVessel),
    ) -> FlightRecorder<FakeVessel, ManualClock, FlushFails> {
        let time = Rc::new(Cell::new(0.0));
        let mut v = FakeVessel::new(&time);
        vessel(&mut v);
        let writer = LogWriter::new(FlushFails(Vec::new())).unwrap();
        FlightRecorder::new(v, ManualClock::shared(&time), writer, config)
    }

    #[test]
    fn recording_error_wins_over_close_error() {
        let config = RecorderConfig { max_duration: Some(1.0), ..RecorderConfig::default() };
        let rec = unflushable(config, |v| v.fail_pitch_reads = true);
        let text = format!("{:#}", rec.run_and_finish().unwrap_err());
        assert!(text.contains("sampling telemetry"), "{}", text);
    }

    #[test]
    fn close_error_reported_after_clean_recording() {
        let rec = unflushable(RecorderConfig::default(), |v| v.ignition_at = 1e9);
        rec.stop_flag().store(true, Ordering::SeqCst);
        let text = format!("{:#}", rec.run_and_finish().unwrap_err());
        assert!(text.contains("closing log"), "{}", text);
    }

    #[test]
    fn run_and_finish_returns_summary() {
        let config = RecorderConfig { max_duration: Some(2.0), ..RecorderConfig::default() };
        let rec = recorder(config, |v| v.ignition_at = 0.5);
        let summary = rec.run_and_finish().unwrap();
        assert!(summary.rows > 0);
    }
}
