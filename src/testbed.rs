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

//! Assembly of a complete testbed from a [`ScenarioConfig`].
//!
//! The [`Testbed`] is the state on which all simulation callbacks operate. It owns the eNodeBs,
//! the terminals with their mobility models, the trace hub, and the trace sinks. The trace hub
//! and the sinks are disjoint fields, so a callback can fire the hub while the observers write
//! into the sinks.

use std::path::{Path, PathBuf};

use cellsim::{
    event::{FmtTime, Scheduler},
    mobility::{
        ConstantPosition, ListPositionAllocator, MobilityModel, PositionAllocator, RandomWaypoint,
    },
    simulator::Simulator,
    trace::TraceHub,
    types::{CellId, NodeId, Rnti, SimError, UeMeasurement, Vector},
};
use rand::prelude::*;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    placement::{place_mobile_seed, place_static, Cell, ConfigError, WaypointSampler},
    replay::{Recorded, ReplayError},
    report::{schedule_periodic_reports, ReportError},
    scenario::{CellConfig, FadingConfig, ScenarioConfig, StartPoint, WaypointConfig},
    trace::{enb_labels, ue_labels, write_labels, FlushReport, MeasurementSink, PositionTrace},
};

/// Error thrown while building or driving a testbed.
#[derive(Debug, Error)]
pub enum TestbedError {
    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Reports could not be scheduled.
    #[error("{0}")]
    Report(#[from] ReportError),
    /// The simulator refused an operation.
    #[error("{0}")]
    Sim(#[from] SimError),
    /// Measurements could not be replayed.
    #[error("{0}")]
    Replay(#[from] ReplayError),
}

/// Kind of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKind {
    /// The terminal never moves.
    Static,
    /// The terminal moves according to random waypoint mobility.
    Mobile,
}

/// An eNodeB serving a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnbNode {
    /// Node id
    pub node: NodeId,
    /// The cell served by the eNodeB
    pub cell: Cell,
}

/// A terminal attached to a cell.
#[derive(Debug)]
pub struct UeNode {
    /// Node id
    pub node: NodeId,
    /// IMSI, starting at 1
    pub imsi: u64,
    /// Serving cell
    pub cell: CellId,
    /// RNTI assigned by the serving cell, starting at 1
    pub rnti: Rnti,
    /// Kind of terminal
    pub kind: TerminalKind,
    /// Position at time zero
    pub initial: Vector,
    mobility: Box<dyn MobilityModel>,
}

impl UeNode {
    /// Position at `time`. Must be queried with non-decreasing time.
    pub fn position(&mut self, time: f64) -> Vector {
        self.mobility.position(time)
    }

    /// Velocity at `time`. Must be queried with non-decreasing time.
    pub fn velocity(&mut self, time: f64) -> Vector {
        self.mobility.velocity(time)
    }
}

/// A terminal that is reported periodically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported {
    /// Index of the terminal among all reported terminals. This index is written to the position
    /// trace.
    pub index: usize,
    /// Index into [`Testbed::ues`]
    pub ue: usize,
}

/// All trace sinks of a testbed.
#[derive(Debug, Default)]
pub struct Recorders {
    /// RSRP and SINR per RNTI
    pub measurements: MeasurementSink,
    /// Periodic positions of the reported terminals
    pub positions: PositionTrace,
}

/// A testbed of eNodeBs and terminals.
#[derive(Debug)]
pub struct Testbed {
    name: String,
    enbs: Vec<EnbNode>,
    ues: Vec<UeNode>,
    remote: NodeId,
    reported: Vec<Reported>,
    hub: TraceHub<Recorders, UeMeasurement>,
    recorders: Recorders,
    gnuplot: bool,
    fading: Option<FadingConfig>,
}

impl Testbed {
    /// Build the testbed, and the simulator with all periodic reports scheduled and the stop time
    /// set to the horizon. The configuration is validated before anything is built.
    pub fn build(config: &ScenarioConfig) -> Result<(Self, Simulator<Self>), TestbedError> {
        config.validate()?;
        log::info!("Building scenario {}", config.name);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let enbs = config
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| -> Result<EnbNode, ConfigError> {
                let id = u16::try_from(i + 1)
                    .map_err(|_| ConfigError::TooManyCells(config.cells.len()))?;
                Ok(EnbNode {
                    node: NodeId(i as u32),
                    cell: Cell::new(CellId(id), c.center, c.radius)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut ues = Vec::with_capacity(config.num_ues());
        for (enb, cell_config) in enbs.iter().zip(config.cells.iter()) {
            add_ues(&mut ues, enbs.len(), &enb.cell, cell_config, &mut rng)?;
        }
        let remote = NodeId((enbs.len() + ues.len()) as u32);
        log::info!(
            "Created {} eNodeBs, {} UEs, and the remote host {remote}",
            enbs.len(),
            ues.len()
        );

        let reported: Vec<Reported> = ues
            .iter()
            .enumerate()
            .filter(|(_, ue)| config.report_static || ue.kind == TerminalKind::Mobile)
            .enumerate()
            .map(|(index, (ue, _))| Reported { index, ue })
            .collect();

        let mut sim = Simulator::new();
        schedule_periodic_reports(
            &mut sim,
            &reported,
            config.horizon,
            |tb: &mut Testbed, time, r: &Reported| tb.report_position(r, time),
        )?;

        if let Some(interval) = config.progress_interval {
            let mut k = 0u64;
            loop {
                let t = k as f64 * interval;
                if t > config.horizon {
                    break;
                }
                sim.schedule_at(
                    t,
                    Box::new(|_: &mut Testbed, now: f64| log::info!("Simulation: {now:.2}s")),
                )?;
                k += 1;
            }
        }

        let mut hub = TraceHub::new();
        if let Some(pattern) = config.measurement_path.as_deref() {
            MeasurementSink::register(&mut hub, pattern, |r: &mut Recorders| &mut r.measurements)?;
        }

        sim.stop_at(config.horizon)?;

        let recorders = Recorders {
            measurements: MeasurementSink::for_cells(enbs.len()),
            positions: PositionTrace::new(),
        };
        let testbed = Self {
            name: config.name.clone(),
            enbs,
            ues,
            remote,
            reported,
            hub,
            recorders,
            gnuplot: config.gnuplot,
            fading: config.fading.clone(),
        };
        Ok((testbed, sim))
    }

    /// Name of the scenario
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All eNodeBs
    pub fn enbs(&self) -> &[EnbNode] {
        &self.enbs
    }

    /// All terminals, ordered by their node id.
    pub fn ues(&self) -> &[UeNode] {
        &self.ues
    }

    /// Mutable access to a terminal.
    pub fn ue_mut(&mut self, idx: usize) -> Option<&mut UeNode> {
        self.ues.get_mut(idx)
    }

    /// Node id of the remote host
    pub fn remote(&self) -> NodeId {
        self.remote
    }

    /// All terminals that are reported periodically.
    pub fn reported(&self) -> &[Reported] {
        &self.reported
    }

    /// All trace sinks
    pub fn recorders(&self) -> &Recorders {
        &self.recorders
    }

    /// Locate the fading trace, if the scenario uses one.
    pub fn fading_trace(&self, dir: Option<&Path>) -> Option<PathBuf> {
        self.fading.as_ref().and_then(|f| f.resolve(dir))
    }

    /// Find the terminal served by `cell` with `rnti`.
    pub fn find_ue(&self, cell: CellId, rnti: Rnti) -> Option<&UeNode> {
        self.ues.iter().find(|ue| ue.cell == cell && ue.rnti == rnti)
    }

    /// Emit a measurement on the trace source at `path`. Returns the number of observers.
    pub fn fire_measurement(&mut self, time: f64, path: &str, m: &UeMeasurement) -> usize {
        self.hub.fire(&mut self.recorders, time, path, m)
    }

    /// Schedule the recorded measurements on the measurement source of the terminal that reported
    /// them. Records of unknown terminals are skipped. Returns the number of scheduled records.
    pub fn schedule_replay(
        &self,
        sim: &mut Simulator<Self>,
        records: Vec<Recorded>,
    ) -> Result<usize, TestbedError> {
        let mut scheduled = 0;
        for r in records {
            let m = r.measurement;
            let Some(ue) = self.find_ue(m.cell, m.rnti) else {
                log::warn!("No UE with RNTI {} in {}. Skipping the record", m.rnti, m.cell);
                continue;
            };
            let path = ue_measurement_path(ue.node);
            sim.schedule_at(
                r.time,
                Box::new(move |tb: &mut Testbed, now: f64| {
                    tb.fire_measurement(now, &path, &m);
                }),
            )?;
            scheduled += 1;
        }
        log::info!("Scheduled {scheduled} recorded measurements");
        Ok(scheduled)
    }

    /// Record the current position of a reported terminal.
    fn report_position(&mut self, r: &Reported, time: f64) {
        let Some(ue) = self.ues.get_mut(r.ue) else {
            return;
        };
        let pos = ue.mobility.position(time);
        let vel = ue.mobility.velocity(time);
        for c in ue.mobility.take_course_changes() {
            log::debug!(
                "{} {} course change POS: {} VEL: {}",
                c.time.fmt_time(),
                ue.node,
                c.position,
                c.velocity
            );
        }
        log::debug!("{} {} POS: {pos} VEL: {vel}", time.fmt_time(), ue.node);
        self.recorders.positions.record(r.index, time, pos);
    }

    /// Write all traces into `dir`, consuming the testbed. `time` is the simulation time at which
    /// the run ended, used for exporting the final positions.
    pub fn finish(mut self, dir: &Path, time: f64) -> FlushReport {
        let mut report = FlushReport::default();

        if self.gnuplot {
            let enbs = self
                .enbs
                .iter()
                .map(|e| (e.cell.id, e.cell.center))
                .collect::<Vec<_>>();
            let ues = self
                .ues
                .iter_mut()
                .map(|ue| (ue.imsi, ue.mobility.position(time)))
                .collect::<Vec<_>>();
            let path = dir.join("enbs.txt");
            let result = write_labels(&path, &enb_labels(enbs.iter().map(|(c, p)| (*c, p))));
            report.record(path, result);
            let path = dir.join("ues.txt");
            let result = write_labels(&path, &ue_labels(ues.iter().map(|(i, p)| (*i, p))));
            report.record(path, result);
        }

        report.merge(self.recorders.measurements.flush(dir));
        if !self.reported.is_empty() {
            report.merge(self.recorders.positions.flush(dir));
        }
        log::info!(
            "Wrote {} trace files ({} failed)",
            report.written.len(),
            report.failed.len()
        );
        report
    }
}

/// Path of the measurement source of the UE `node`.
pub fn ue_measurement_path(node: NodeId) -> String {
    format!("/NodeList/{}/DeviceList/0/LteUePhy/ReportCurrentCellRsrpSinr", node.0)
}

/// Place all terminals of a cell, and attach them to it. Static terminals are attached first.
fn add_ues(
    ues: &mut Vec<UeNode>,
    num_enbs: usize,
    cell: &Cell,
    config: &CellConfig,
    rng: &mut StdRng,
) -> Result<(), ConfigError> {
    let mut rnti: u16 = 0;
    let mut attach = |ues: &mut Vec<UeNode>,
                      kind: TerminalKind,
                      initial: Vector,
                      mobility: Box<dyn MobilityModel>|
     -> Result<(), ConfigError> {
        rnti = rnti
            .checked_add(1)
            .ok_or(ConfigError::TooManyTerminals(cell.id))?;
        let node = NodeId((num_enbs + ues.len()) as u32);
        log::debug!("Attach {node} ({kind:?}) at {initial} to {}", cell.id);
        ues.push(UeNode {
            node,
            imsi: ues.len() as u64 + 1,
            cell: cell.id,
            rnti: Rnti(rnti),
            kind,
            initial,
            mobility,
        });
        Ok(())
    };

    let s = &config.static_ues;
    if s.count > 0 {
        let radius = cell.radius * s.radius_fraction;
        for pos in place_static(cell.center, radius, s.count, s.height, rng)? {
            attach(ues, TerminalKind::Static, pos, Box::new(ConstantPosition(pos)))?;
        }
    }

    let m = &config.mobile_ues;
    if m.count > 0 {
        let starts = match &m.start {
            StartPoint::Offset { dx, dy, height } => {
                let seed = cell.center + Vector::new(*dx, *dy, 0.0);
                place_mobile_seed(seed, m.count, *height)?
            }
            StartPoint::Points(points) => {
                let mut alloc = ListPositionAllocator::new(points.clone(), 0)
                    .ok_or(ConfigError::EmptyList("start points"))?;
                (0..m.count).map(|_| alloc.next_position(rng)).collect()
            }
            StartPoint::Annulus {
                min_fraction,
                max_fraction,
                height,
            } => {
                let center = Vector::new(cell.center.x, cell.center.y, *height);
                let sampler = WaypointSampler::new(center, *min_fraction, *max_fraction, cell.radius)?;
                sampler.sample_iter(&mut *rng).take(m.count).collect()
            }
        };
        let speed = m.speed.build()?;
        let pause = m.pause.build()?;
        for (i, start) in starts.into_iter().enumerate() {
            let waypoints: Box<dyn PositionAllocator> = match &m.waypoints {
                WaypointConfig::Annulus {
                    min_fraction,
                    max_fraction,
                    height,
                } => {
                    let center = Vector::new(cell.center.x, cell.center.y, *height);
                    Box::new(WaypointSampler::new(
                        center,
                        *min_fraction,
                        *max_fraction,
                        cell.radius,
                    )?)
                }
                WaypointConfig::Points(points) => Box::new(
                    ListPositionAllocator::new(points.clone(), i)
                        .ok_or(ConfigError::EmptyList("waypoints"))?,
                ),
            };
            let model = RandomWaypoint::new(start, waypoints, speed.clone(), pause.clone(), rng.gen());
            attach(ues, TerminalKind::Mobile, start, Box::new(model))?;
        }
    }

    Ok(())
}
