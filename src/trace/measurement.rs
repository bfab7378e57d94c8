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

//! Per-terminal capture of RSRP and SINR measurements.

use std::{collections::BTreeMap, path::Path};

use cellsim::{
    trace::TraceHub,
    types::{CellId, Rnti, SimError, UeMeasurement},
};
use itertools::Itertools;

use super::{write_lines, FlushReport};

/// Trace source on which every UE reports the RSRP and SINR of its serving cell.
pub const MEASUREMENT_PATH: &str = "/NodeList/*/DeviceList/*/LteUePhy/ReportCurrentCellRsrpSinr";

/// Buffers of measurement records, one for each terminal, identified by its serving cell and its
/// RNTI. Each record is a line `<time>\t<rsrp>\t<sinr>`, with the time in seconds printed with six
/// decimals.
///
/// When flushed, the buffer of each terminal is written to `ue<rnti>Traces.txt` if all records
/// stem from a single cell, and to `ue<cell>_<rnti>Traces.txt` otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSink {
    buffers: BTreeMap<(CellId, Rnti), Vec<String>>,
    multi_cell: bool,
}

impl MeasurementSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sink for a scenario with `num_cells` cells. With more than one cell, file
    /// names always contain the cell id, even if only a single cell reported any measurement.
    pub fn for_cells(num_cells: usize) -> Self {
        Self {
            buffers: BTreeMap::new(),
            multi_cell: num_cells > 1,
        }
    }

    /// Append a record for the measurement at `time`.
    pub fn record(&mut self, time: f64, m: &UeMeasurement) {
        self.buffers
            .entry((m.cell, m.rnti))
            .or_default()
            .push(format!("{time:.6}\t{}\t{}", m.rsrp, m.sinr));
    }

    /// All records of the terminal `rnti` in `cell`, in the order in which they were captured.
    pub fn lines(&self, cell: CellId, rnti: Rnti) -> &[String] {
        self.buffers
            .get(&(cell, rnti))
            .map(|b| b.as_slice())
            .unwrap_or_default()
    }

    /// All terminals for which at least one record was captured.
    pub fn terminals(&self) -> impl Iterator<Item = (CellId, Rnti)> + '_ {
        self.buffers.keys().copied()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.buffers.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing was captured yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe a sink to all measurement sources matching `pattern`. Every event is captured
    /// into the sink returned by `accessor`, without any filtering.
    pub fn register<S, A>(
        hub: &mut TraceHub<S, UeMeasurement>,
        pattern: &str,
        accessor: A,
    ) -> Result<usize, SimError>
    where
        S: 'static,
        A: Fn(&mut S) -> &mut MeasurementSink + 'static,
    {
        hub.connect(
            pattern,
            Box::new(move |state: &mut S, time: f64, _: &str, m: &UeMeasurement| {
                accessor(state).record(time, m)
            }),
        )
    }

    /// Write the buffer of each terminal into `dir`, consuming the sink.
    pub fn flush(self, dir: &Path) -> FlushReport {
        let qualified = self.multi_cell
            || self
                .buffers
                .keys()
                .map(|(cell, _)| cell)
                .dedup()
                .nth(1)
                .is_some();
        let mut report = FlushReport::default();
        for ((cell, rnti), lines) in self.buffers {
            let name = if qualified {
                format!("ue{}_{rnti}Traces.txt", cell.0)
            } else {
                format!("ue{rnti}Traces.txt")
            };
            let path = dir.join(name);
            let result = write_lines(&path, &lines);
            report.record(path, result);
        }
        report
    }
}
