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

//! Sinks that buffer traces during the simulation, and write them to plain-text files once the
//! simulation has ended.
//!
//! A sink is flushed exactly once. Failing to write one file never aborts the flush of the
//! remaining files: the error is logged, the affected buffer is dropped, and the failure is listed
//! in the returned [`FlushReport`].

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

mod gnuplot;
mod measurement;
mod position;

pub use gnuplot::{enb_labels, ue_labels, write_labels};
pub use measurement::{MeasurementSink, MEASUREMENT_PATH};
pub use position::{PositionTrace, POSITION_TRACE_FILE};

/// Error thrown while writing a trace file.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The file could not be opened or written.
    #[error("Cannot write {}: {source}", path.display())]
    Io {
        /// The file that should have been written
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of flushing one or more sinks.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Files that were written successfully
    pub written: Vec<PathBuf>,
    /// Files that could not be written, and the reason for it.
    pub failed: Vec<(PathBuf, TraceError)>,
}

impl FlushReport {
    /// Returns `true` if no file failed.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// Add all entries of `other` to `self`.
    pub fn merge(&mut self, other: FlushReport) {
        self.written.extend(other.written);
        self.failed.extend(other.failed);
    }

    /// Record the outcome of writing `path`. Failures are logged.
    pub(crate) fn record(&mut self, path: PathBuf, result: Result<(), TraceError>) {
        match result {
            Ok(()) => {
                log::debug!("Wrote {}", path.display());
                self.written.push(path)
            }
            Err(e) => {
                log::error!("{e}. Dropping the trace.");
                self.failed.push((path, e))
            }
        }
    }
}

/// Write all `lines` to `path`, truncating the file if it already exists.
pub(crate) fn write_lines<I>(path: &Path, lines: I) -> Result<(), TraceError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let io_err = |source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut f = BufWriter::new(File::create(path).map_err(io_err)?);
    for line in lines {
        writeln!(f, "{}", line.as_ref()).map_err(io_err)?;
    }
    f.flush().map_err(io_err)
}
