use std::io::{self, Write};
use std::path::Path;

use crate::sim::{PlanarState, VerticalState};

/// Write a vertical-model trajectory as CSV.
///
/// Columns: time, altitude, velocity, mass
pub fn write_vertical<W: Write>(writer: &mut W, trajectory: &[VerticalState]) -> io::Result<()> {
    writeln!(writer, "time,altitude,velocity,mass")?;
    for s in trajectory {
        writeln!(writer, "{:.2},{:.3},{:.3},{:.3}", s.time, s.altitude, s.velocity, s.mass)?;
    }
    Ok(())
}

/// Write a planar-model trajectory as CSV.
///
/// Columns: time, downrange, altitude, vel_x, vel_y, speed, mass, pitch_deg,
///          flight_path_deg
pub fn write_planar<W: Write>(writer: &mut W, trajectory: &[PlanarState]) -> io::Result<()> {
    writeln!(
        writer,
        "time,downrange,altitude,vel_x,vel_y,speed,mass,pitch_deg,flight_path_deg"
    )?;
    for s in trajectory {
        writeln!(
            writer,
            "{:.2},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.2},{:.2}",
            s.time,
            s.downrange(),
            s.altitude(),
            s.vel.x,
            s.vel.y,
            s.speed(),
            s.mass,
            s.pitch,
            s.flight_path_angle(),
        )?;
    }
    Ok(())
}

pub fn write_vertical_file(path: impl AsRef<Path>, trajectory: &[VerticalState]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_vertical(&mut file, trajectory)?;
    file.flush()
}

pub fn write_planar_file(path: impl AsRef<Path>, trajectory: &[PlanarState]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_planar(&mut file, trajectory)?;
    file.flush()
}
