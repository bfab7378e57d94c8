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

//! Export the outcome of a run to a json file, including all metadata.

use std::{
    fs::{create_dir_all, File},
    io::Write,
    path::{Path, PathBuf},
};

use cellsim::{
    simulator::RunSummary,
    types::{CellId, NodeId, Rnti, Vector},
};
use serde::{Deserialize, Serialize};
use time::{format_description, OffsetDateTime};

use crate::{
    scenario::ScenarioConfig,
    testbed::{TerminalKind, Testbed},
    trace::FlushReport,
};

/// Description of a single terminal in the exported record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UeRecord {
    /// Node id
    pub node: NodeId,
    /// IMSI
    pub imsi: u64,
    /// Serving cell
    pub cell: CellId,
    /// RNTI
    pub rnti: Rnti,
    /// Static or mobile
    pub kind: TerminalKind,
    /// Position at time zero
    pub initial: Vector,
}

/// Everything that is known about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// The scenario that was simulated
    pub scenario: ScenarioConfig,
    /// Fading trace that was found, if any
    pub fading_trace: Option<PathBuf>,
    /// All terminals
    pub ues: Vec<UeRecord>,
    /// Number of fired events
    pub fired: usize,
    /// Number of events dropped at the end of the run
    pub discarded: usize,
    /// Simulation time at which the run ended
    pub end_time: f64,
    /// Trace files that were written
    pub written: Vec<PathBuf>,
    /// Trace files that could not be written, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl RunRecord {
    /// Collect the record of a run. Must be called before the testbed is finished.
    pub fn new(
        scenario: &ScenarioConfig,
        testbed: &Testbed,
        fading_trace: Option<PathBuf>,
        summary: &RunSummary,
    ) -> Self {
        Self {
            scenario: scenario.clone(),
            fading_trace,
            ues: testbed
                .ues()
                .iter()
                .map(|ue| UeRecord {
                    node: ue.node,
                    imsi: ue.imsi,
                    cell: ue.cell,
                    rnti: ue.rnti,
                    kind: ue.kind,
                    initial: ue.initial,
                })
                .collect(),
            fired: summary.fired,
            discarded: summary.discarded,
            end_time: summary.end_time,
            written: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Add the outcome of flushing the trace sinks.
    pub fn with_flush(mut self, report: &FlushReport) -> Self {
        self.written = report.written.clone();
        self.failed = report
            .failed
            .iter()
            .map(|(p, e)| (p.clone(), e.to_string()))
            .collect();
        self
    }

    /// Write the record to a json file. This function will overwrite any existing file.
    pub fn write_json(&self, file: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        let mut f = File::create(file)?;
        f.write_all(json.as_bytes())
    }
}

/// Create a new folder `{parent}/ltebed_{name}_{DATE}`, appending an increasing number if the
/// folder already exists, and return its path.
pub fn generate_folder(parent: impl AsRef<Path>, name: &str) -> Result<PathBuf, std::io::Error> {
    let cur_time = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(
            &format_description::parse("[year]-[month]-[day]_[hour]-[minute]-[second]")
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
        )
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let mut offset: Option<usize> = None;
    let path = loop {
        let folder = if let Some(offset) = offset {
            format!("ltebed_{name}_{cur_time}_{offset}")
        } else {
            format!("ltebed_{name}_{cur_time}")
        };
        let path = parent.as_ref().join(folder);
        if !path.exists() {
            break path;
        }
        offset = Some(offset.unwrap_or_default() + 1);
    };
    create_dir_all(&path)?;
    Ok(path)
}
