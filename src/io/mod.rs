pub mod flight_log;
pub mod csv;
pub mod json;

pub use flight_log::{
    create_log_file, load_log_file, read_log, FlightLog, LogRecord, LogWriter, DEFAULT_LOG_PATH, HEADER,
};
