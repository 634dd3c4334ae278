// hexrotor_sim/src/output.rs

//! CSV export of a run's time series.
//!
//! Column order is the positional contract consumers (plotting scripts,
//! log tooling) depend on:
//! `t, x, y, z, vx, vy, vz, dist_x, dist_y, dist_z, health_0..health_{N-1}`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::driver::SimulationHistory;

/// Writes the history to `path` as CSV, creating or truncating the file.
pub fn write_csv(history: &SimulationHistory, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv_to(history, &mut writer)?;
    writer.flush()
}

/// Writes the history as CSV to any `Write` sink.
pub fn write_csv_to<W: Write>(history: &SimulationHistory, writer: &mut W) -> io::Result<()> {
    write!(writer, "t,x,y,z,vx,vy,vz,dist_x,dist_y,dist_z")?;
    for k in 0..history.num_rotors {
        write!(writer, ",health_{k}")?;
    }
    writeln!(writer)?;

    for record in &history.records {
        write!(writer, "{}", record.time)?;
        for value in record.state.iter() {
            write!(writer, ",{value}")?;
        }
        for value in record.disturbance_estimate.iter() {
            write!(writer, ",{value}")?;
        }
        for value in record.rotor_health.iter() {
            write!(writer, ",{value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::TickRecord;
    use nalgebra::{DVector, Vector3, Vector6};

    fn tiny_history() -> SimulationHistory {
        SimulationHistory {
            dt: 0.01,
            num_rotors: 2,
            records: vec![TickRecord {
                time: 0.0,
                state: Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
                disturbance_estimate: Vector3::new(0.5, 0.25, 0.0),
                rotor_health: DVector::from_column_slice(&[1.0, 0.0]),
            }],
        }
    }

    #[test]
    fn header_and_row_follow_the_positional_contract() {
        let mut buffer = Vec::new();
        write_csv_to(&tiny_history(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "t,x,y,z,vx,vy,vz,dist_x,dist_y,dist_z,health_0,health_1"
        );
        assert_eq!(lines.next().unwrap(), "0,1,2,3,4,5,6,0.5,0.25,0,1,0");
        assert!(lines.next().is_none());
    }
}
