use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// First line of every flight log.
pub const HEADER: &str = "Time Pitch Altitude Speed Mass";

/// Default location the logger writes to and the model CLI reads from.
pub const DEFAULT_LOG_PATH: &str = "data/ksp_launch.log";

/// One telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub time: f64,     // s since ignition
    pub pitch: f64,    // deg
    pub altitude: f64, // m above the surface
    pub speed: f64,    // m/s, body frame
    pub mass: f64,     // kg
}

impl LogRecord {
    /// Parse a whitespace-separated row. Fields past the fifth are ignored;
    /// `None` for short rows or any non-numeric or non-finite field among
    /// the first five.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        let mut next = || fields.next()?.ok().filter(|v| v.is_finite());
        Some(Self {
            time: next()?,
            pitch: next()?,
            altitude: next()?,
            speed: next()?,
            mass: next()?,
        })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{:.2} {:.2} {:.2} {:.2} {:.2}",
            self.time, self.pitch, self.altitude, self.speed, self.mass
        )
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Appends rows after writing the header once.
pub struct LogWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> LogWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{}", HEADER)?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write(&mut self, record: &LogRecord) -> io::Result<()> {
        writeln!(self.inner, "{}", record.to_line())?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Create (truncating) a log file, making parent directories as needed.
pub fn create_log_file(path: impl AsRef<Path>) -> io::Result<LogWriter<BufWriter<File>>> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    LogWriter::new(BufWriter::new(File::create(path)?))
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parsed log plus the number of lines that were not usable rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightLog {
    pub records: Vec<LogRecord>,
    pub skipped: usize,
}

impl FlightLog {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn column(&self, f: impl Fn(&LogRecord) -> f64) -> Vec<[f64; 2]> {
        self.records.iter().map(|r| [r.time, f(r)]).collect()
    }

    /// `[time, altitude]` pairs.
    pub fn altitude_series(&self) -> Vec<[f64; 2]> {
        self.column(|r| r.altitude)
    }

    pub fn speed_series(&self) -> Vec<[f64; 2]> {
        self.column(|r| r.speed)
    }

    pub fn mass_series(&self) -> Vec<[f64; 2]> {
        self.column(|r| r.mass)
    }

    pub fn pitch_series(&self) -> Vec<[f64; 2]> {
        self.column(|r| r.pitch)
    }

    pub fn first(&self) -> Option<&LogRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&LogRecord> {
        self.records.last()
    }
}

/// Read rows, keeping those with `time <= cutoff` when a cutoff is given.
/// Blank lines are ignored; the header and malformed lines are counted as
/// skipped, as are lines that are not valid UTF-8. Rows beyond the cutoff
/// are dropped without counting.
pub fn read_log<R: BufRead>(mut reader: R, cutoff: Option<f64>) -> io::Result<FlightLog> {
    let mut log = FlightLog::default();
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line,
            Err(_) => {
                log::debug!("skipping non-UTF-8 log line: {:?}", String::from_utf8_lossy(&raw));
                log.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match LogRecord::parse(line) {
            Some(record) if cutoff.map_or(true, |c| record.time <= c) => log.records.push(record),
            Some(_) => {}
            None => {
                if line.trim() != HEADER {
                    log::debug!("skipping malformed log line: {:?}", line.trim_end());
                }
                log.skipped += 1;
            }
        }
    }
    Ok(log)
}

pub fn load_log_file(path: impl AsRef<Path>, cutoff: Option<f64>) -> io::Result<FlightLog> {
    let file = File::open(path)?;
    read_log(BufReader::new(file), cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_row() {
        let r = LogRecord::parse("12.30 87.51 1534.02 210.44 181234.50").unwrap();
        assert_eq!(r.time, 12.3);
        assert_eq!(r.pitch, 87.51);
        assert_eq!(r.mass, 181_234.5);
    }

    #[test]
    fn parse_rejects_short_and_text() {
        assert!(LogRecord::parse("1.0 2.0 3.0 4.0").is_none());
        assert!(LogRecord::parse(HEADER).is_none());
        assert!(LogRecord::parse("1.0 2.0 abc 4.0 5.0").is_none());
        assert!(LogRecord::parse("").is_none());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let r = LogRecord::parse("1 2 3 4 5 6 7").unwrap();
        assert_eq!(r.mass, 5.0);
    }

    #[test]
    fn writer_output_reads_back_within_rounding() {
        let samples = [
            LogRecord { time: 0.1034, pitch: 89.996, altitude: 11.151, speed: 0.744, mass: 186_417.951 },
            LogRecord { time: 0.2, pitch: 89.9, altitude: 14.7, speed: 35.123, mass: 186_260.0 },
            LogRecord { time: 61.05, pitch: 71.25, altitude: 9_876.555, speed: 612.0, mass: 101_000.0 },
        ];

        let mut writer = LogWriter::new(Vec::new()).unwrap();
        for s in &samples {
            writer.write(s).unwrap();
        }
        assert_eq!(writer.rows(), 3);
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with(HEADER));

        let log = read_log(bytes.as_slice(), None).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log.skipped, 1); // header
        for (read, written) in log.records.iter().zip(&samples) {
            assert!((read.time - written.time).abs() <= 0.005 + 1e-9);
            assert!((read.pitch - written.pitch).abs() <= 0.005 + 1e-9);
            assert!((read.altitude - written.altitude).abs() <= 0.005 + 1e-9);
            assert!((read.speed - written.speed).abs() <= 0.005 + 1e-9);
            assert!((read.mass - written.mass).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn reader_survives_garbage() {
        let text = "\
Time Pitch Altitude Speed Mass
0.10 90.00 11.20 0.80 186400.00

0.20 90.00 12.00
not a row at all
0.30 89.90 14.00 9.10 186300.00
0.40 89.80 nan? 10.00 186200.00
";
        let log = read_log(text.as_bytes(), None).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.skipped, 4);
        assert_eq!(log.last().map(|r| r.time), Some(0.3));
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut bytes = format!("{}\n0.10 90.00 11.20 0.80 186400.00\n", HEADER).into_bytes();
        bytes.extend_from_slice(b"0.20 90.00 \xff\xfe 0.80 186400.00\n");
        bytes.extend_from_slice(b"0.30 89.90 14.00 9.10 186300.00\n");

        let log = read_log(bytes.as_slice(), None).unwrap();
        let times: Vec<f64> = log.records.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0.1, 0.3]);
        assert_eq!(log.skipped, 2);
    }

    #[test]
    fn non_finite_fields_are_malformed() {
        assert!(LogRecord::parse("0.10 90.00 nan 0.80 186400.00").is_none());
        assert!(LogRecord::parse("0.10 90.00 11.20 inf 186400.00").is_none());

        let text = format!("{}\n0.10 90.00 NaN 0.80 186400.00\n0.20 90.00 12.00 1.00 186300.00\n", HEADER);
        let log = read_log(text.as_bytes(), None).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.skipped, 2);
    }

    #[test]
    fn crlf_rows_parse() {
        let text = format!("{}\r\n0.10 90.00 11.20 0.80 186400.00\r\n", HEADER);
        let log = read_log(text.as_bytes(), None).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.skipped, 1);
    }

    #[test]
    fn cutoff_keeps_only_early_rows() {
        let text = format!(
            "{}\n69.90 1 2 3 4\n70.00 1 2 3 4\n70.10 1 2 3 4\n",
            HEADER
        );
        let log = read_log(text.as_bytes(), Some(70.0)).unwrap();
        let times: Vec<f64> = log.records.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![69.9, 70.0]);
        assert_eq!(log.skipped, 1);
    }

    #[test]
    fn series_pair_time_with_column() {
        let text = "1 2 3 4 5\n6 7 8 9 10\n";
        let log = read_log(text.as_bytes(), None).unwrap();
        assert_eq!(log.altitude_series(), vec![[1.0, 3.0], [6.0, 8.0]]);
        assert_eq!(log.speed_series(), vec![[1.0, 4.0], [6.0, 9.0]]);
        assert_eq!(log.mass_series(), vec![[1.0, 5.0], [6.0, 10.0]]);
        assert_eq!(log.pitch_series(), vec![[1.0, 2.0], [6.0, 7.0]]);
    }

    #[test]
    fn log_file_lands_in_new_directory() {
        let dir = std::env::temp_dir().join(format!("rocket-ascent-log-{}", std::process::id()));
        let path = dir.join("nested").join("flight.log");
        let mut writer = create_log_file(&path).unwrap();
        writer
            .write(&LogRecord { time: 0.1, pitch: 90.0, altitude: 11.0, speed: 1.0, mass: 5.0 })
            .unwrap();
        writer.into_inner().unwrap();

        let log = load_log_file(&path, None).unwrap();
        assert_eq!(log.len(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_log_file("definitely/not/here.log", None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
