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

//! Trace of terminal positions, sampled by the periodic reports.

use std::path::Path;

use cellsim::types::Vector;

use super::{write_lines, FlushReport};

/// Name of the position trace file.
pub const POSITION_TRACE_FILE: &str = "PositionTrace.txt";

/// Buffered position records. Each record is a line `<index>\t<time>\t<x>\t<y>\t<z>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTrace {
    lines: Vec<String>,
}

impl PositionTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the position of the terminal with relative index `index` at `time`.
    pub fn record(&mut self, index: usize, time: f64, pos: Vector) {
        self.lines
            .push(format!("{index}\t{time:.6}\t{}\t{}\t{}", pos.x, pos.y, pos.z));
    }

    /// All records in the order in which they were captured.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write the trace to `<dir>/PositionTrace.txt`, consuming the trace.
    pub fn flush(self, dir: &Path) -> FlushReport {
        let mut report = FlushReport::default();
        let path = dir.join(POSITION_TRACE_FILE);
        let result = write_lines(&path, &self.lines);
        report.record(path, result);
        report
    }
}
