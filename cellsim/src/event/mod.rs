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

//! Module for defining events and the interface to schedule them.

mod queue;
pub use queue::{BasicEventQueue, EventQueue, FmtTime, TimedEventQueue};

use crate::types::SimError;

/// Identifier of an enqueued event.
pub type EventId = u64;

/// One-shot callback that is fired when the simulation clock reaches its due time. The callback
/// receives the simulation state and the current time (in seconds).
pub type Callback<S> = Box<dyn FnOnce(&mut S, f64)>;

/// Interface of anything that can schedule callbacks on a simulation clock.
pub trait Scheduler<S> {
    /// Register `callback` to be fired when the simulated time reaches `time` (in seconds).
    /// Callbacks that are due at the same time fire in the order in which they were registered.
    fn schedule_at(&mut self, time: f64, callback: Callback<S>) -> Result<EventId, SimError>;

    /// Current simulation time in seconds.
    fn now(&self) -> f64;
}
