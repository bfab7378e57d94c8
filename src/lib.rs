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

//! # LteBed: LTE testbed scenarios on a discrete-event substrate
//!
//! This crate builds LTE testbeds: a set of eNodeBs, each serving a circular cell, and a
//! population of static and mobile terminals (UEs) attached to these cells. The testbed runs on
//! the discrete-event substrate [`cellsim`], which provides the clock, node mobility, and trace
//! sources. The radio layer is not simulated. Recorded radio measurements can be replayed into the
//! trace sources instead.
//!
//! ## Structure
//! The source code of this program is structured as follows:
//! - The module [`placement`] samples the initial positions of terminals ([`placement::place_static`]
//!   and [`placement::place_mobile_seed`]), and the targets of mobile terminals
//!   ([`placement::WaypointSampler`]).
//! - The module [`report`] schedules the periodic position reports
//!   ([`report::schedule_periodic_reports`]).
//! - The module [`trace`] contains the sinks that capture measurements and positions, and write
//!   them to plain-text files once the simulation has ended.
//! - The module [`replay`] reads recorded measurements.
//! - The module [`scenario`] defines the configuration of a testbed, and the predefined scenarios
//!   ([`scenario::Preset`]).
//! - The module [`testbed`] assembles everything into a [`Testbed`].
//! - The module [`experiment`] exports the outcome of a run.
//!
//! ## Example usage
//!
//! ```
//! use ltebed::{scenario::Preset, Testbed};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Preset::FourCell.config();
//! config.seed = 42;
//! let (mut testbed, mut sim) = Testbed::build(&config)?;
//! let summary = sim.run(&mut testbed);
//!
//! // two mobile UEs per cell, reported at t = 0, 1, 2, 3
//! assert_eq!(summary.fired, 4 * 2 * 4);
//! assert_eq!(testbed.recorders().positions.lines().len(), 32);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "experiment")]
#[cfg_attr(docsrs, doc(cfg(feature = "experiment")))]
pub mod experiment;
pub mod placement;
pub mod replay;
pub mod report;
pub mod scenario;
pub mod testbed;
pub mod trace;
#[cfg(test)]
mod test;

pub use placement::{Cell, ConfigError};
pub use scenario::{Preset, ScenarioConfig};
pub use testbed::{Testbed, TestbedError};
