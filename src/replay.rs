// LteBed: LTE testbed scenarios on a discrete-event substrate
// Copyright (C) 2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Replay of recorded radio measurements.
//!
//! The radio layer is not simulated. Instead, measurements recorded elsewhere can be fed into the
//! trace hub at the times they were recorded. A measurement file contains one record per line:
//!
//! ```text
//! # time  cell  rnti  rsrp  sinr
//! 0.0     1     1     -80   12
//! 0.1     1     2     -85   9
//! ```
//!
//! Fields are separated by whitespace. Empty lines and lines starting with `#` are ignored.

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use cellsim::types::{CellId, Rnti, UeMeasurement};
use thiserror::Error;

/// Error thrown while reading a measurement file.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The file cannot be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// The file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
    /// A line is malformed.
    #[error("Line {line}: {msg}")]
    Parse {
        /// Line number, starting at 1
        line: usize,
        /// Description of the problem
        msg: String,
    },
    /// The records are not sorted by time.
    #[error("Line {line}: time {time} is earlier than the previous record")]
    Unsorted {
        /// Line number, starting at 1
        line: usize,
        /// Time of the record
        time: f64,
    },
}

/// A recorded measurement, and when it was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recorded {
    /// Time in seconds
    pub time: f64,
    /// The measurement
    pub measurement: UeMeasurement,
}

/// Parse the content of a measurement file. Records must be sorted by time.
pub fn parse_measurements(content: &str) -> Result<Vec<Recorded>, ReplayError> {
    let mut records: Vec<Recorded> = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ReplayError::Parse {
                line,
                msg: format!("expected 5 fields, found {}", fields.len()),
            });
        }
        let err = |what: &str, field: &str| ReplayError::Parse {
            line,
            msg: format!("invalid {what}: {field:?}"),
        };
        let time: f64 = fields[0].parse().map_err(|_| err("time", fields[0]))?;
        if !(time.is_finite() && time >= 0.0) {
            return Err(err("time", fields[0]));
        }
        let cell: u16 = fields[1].parse().map_err(|_| err("cell id", fields[1]))?;
        let rnti: u16 = fields[2].parse().map_err(|_| err("rnti", fields[2]))?;
        let rsrp: f64 = fields[3].parse().map_err(|_| err("rsrp", fields[3]))?;
        let sinr: f64 = fields[4].parse().map_err(|_| err("sinr", fields[4]))?;

        if records.last().map(|r| r.time > time).unwrap_or(false) {
            return Err(ReplayError::Unsorted { line, time });
        }
        records.push(Recorded {
            time,
            measurement: UeMeasurement {
                cell: CellId(cell),
                rnti: Rnti(rnti),
                rsrp,
                sinr,
            },
        });
    }
    Ok(records)
}

/// Read and parse a measurement file.
pub fn read_measurements(path: &Path) -> Result<Vec<Recorded>, ReplayError> {
    let content = read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_measurements(&content)?;
    log::info!(
        "Read {} measurements from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
