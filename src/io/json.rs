use std::io::{self, Write};
use std::path::Path;

use crate::report::ComparisonSummary;
use crate::sim::{EventKind, SimEvent};

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// JSON has no NaN or infinity; those are written as `null`.
fn number(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        "null".to_string()
    }
}

fn write_event<W: Write>(writer: &mut W, event: &SimEvent, last: bool) -> io::Result<()> {
    let sep = if last { "" } else { "," };
    match &event.kind {
        EventKind::Jettison { name, mass_before, mass_after } => writeln!(
            writer,
            "    {{ \"time_s\": {}, \"kind\": \"jettison\", \"name\": \"{}\", \"mass_before_kg\": {}, \"mass_after_kg\": {} }}{}",
            number(event.time, 2),
            escape(name),
            number(*mass_before, 2),
            number(*mass_after, 2),
            sep
        ),
        EventKind::Burnout => writeln!(
            writer,
            "    {{ \"time_s\": {}, \"kind\": \"burnout\" }}{}",
            number(event.time, 2),
            sep
        ),
        EventKind::MassDepleted => writeln!(
            writer,
            "    {{ \"time_s\": {}, \"kind\": \"mass_depleted\" }}{}",
            number(event.time, 2),
            sep
        ),
    }
}

/// Write the comparison summary as JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &ComparisonSummary) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"model\": {{")?;
    writeln!(writer, "    \"vehicle\": \"{}\",", escape(&summary.vehicle))?;
    writeln!(writer, "    \"kind\": \"{}\",", summary.kind.as_str())?;
    writeln!(writer, "    \"dt_s\": {},", number(summary.dt, 3))?;
    writeln!(writer, "    \"horizon_s\": {},", number(summary.horizon, 1))?;
    writeln!(writer, "    \"final_altitude_m\": {},", number(summary.final_altitude, 2))?;
    writeln!(writer, "    \"final_speed_ms\": {},", number(summary.final_speed, 2))?;
    writeln!(writer, "    \"final_mass_kg\": {}", number(summary.final_mass, 2))?;
    writeln!(writer, "  }},")?;

    writeln!(writer, "  \"events\": [")?;
    for (i, event) in summary.events.iter().enumerate() {
        write_event(writer, event, i + 1 == summary.events.len())?;
    }
    writeln!(writer, "  ],")?;

    writeln!(writer, "  \"log\": {{")?;
    writeln!(writer, "    \"points\": {},", summary.logged_points)?;
    writeln!(writer, "    \"skipped_lines\": {},", summary.skipped_lines)?;
    match &summary.logged_mass {
        Some(m) => {
            writeln!(writer, "    \"mass_initial_kg\": {},", number(m.initial, 2))?;
            writeln!(writer, "    \"mass_final_kg\": {},", number(m.final_mass, 2))?;
            writeln!(writer, "    \"mass_delta_kg\": {}", number(m.delta, 2))?;
        }
        None => writeln!(writer, "    \"mass_initial_kg\": null")?,
    }
    writeln!(writer, "  }},")?;

    match &summary.residuals {
        Some(r) => {
            writeln!(writer, "  \"residuals\": {{")?;
            writeln!(writer, "    \"samples\": {},", r.samples)?;
            writeln!(writer, "    \"altitude_rms_m\": {},", number(r.altitude_rms, 3))?;
            writeln!(writer, "    \"speed_rms_ms\": {},", number(r.speed_rms, 3))?;
            writeln!(writer, "    \"mass_rms_kg\": {}", number(r.mass_rms, 3))?;
            writeln!(writer, "  }}")?;
        }
        None => writeln!(writer, "  \"residuals\": null")?,
    }
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write the comparison summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &ComparisonSummary) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, summary)?;
    file.flush()
}
