// CellSim: Cellular Network Simulation Substrate written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
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

#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # CellSim
//!
//! This is a small discrete-event substrate on which cellular network scenarios are built. It
//! provides the simulation clock, node mobility, and path-addressed trace sources, but no radio
//! physics.
//!
//! ## Main Concepts
//!
//! The [`simulator::Simulator`] owns a queue of one-shot callbacks, and fires them in the order of
//! their due time on a user-defined state. Callbacks due at the same time fire in the order in
//! which they were scheduled. The default queue is the [`event::TimedEventQueue`], but any queue
//! implementing [`event::EventQueue`] can be used instead.
//!
//! Nodes move according to a [`mobility::MobilityModel`]. The [`mobility::RandomWaypoint`] model
//! draws its targets from a [`mobility::PositionAllocator`], and its speed and pause time from a
//! [`random::Sampler`], which is built from the serializable [`random::RandomVariable`].
//!
//! Observers subscribe to trace sources on the [`trace::TraceHub`] using path patterns like
//! `/NodeList/*/DeviceList/*/LteUePhy/ReportUeMeasurements`.
//!
//! ## Example usage
//!
//! ```
//! use cellsim::prelude::*;
//!
//! fn main() -> Result<(), SimError> {
//!     let mut hub: TraceHub<Vec<(f64, String)>, UeMeasurement> = TraceHub::new();
//!     hub.connect(
//!         "/NodeList/*/DeviceList/*/LteUePhy/ReportUeMeasurements",
//!         Box::new(|log: &mut Vec<(f64, String)>, t: f64, path: &str, _: &UeMeasurement| {
//!             log.push((t, path.to_string()))
//!         }),
//!     )?;
//!
//!     let report = UeMeasurement {
//!         cell: CellId(1),
//!         rnti: Rnti(1),
//!         rsrp: -80.0,
//!         sinr: 12.0,
//!     };
//!     let mut log = Vec::new();
//!     let n = hub.fire(
//!         &mut log,
//!         0.5,
//!         "/NodeList/2/DeviceList/0/LteUePhy/ReportUeMeasurements",
//!         &report,
//!     );
//!     assert_eq!(n, 1);
//!     assert_eq!(log.len(), 1);
//!
//!     Ok(())
//! }
//! ```

pub mod event;
pub mod mobility;
pub mod prelude;
pub mod random;
pub mod simulator;
pub mod trace;
pub mod types;

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod test;
