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

//! The discrete-event simulator that drives all callbacks.
//!
//! The [`Simulator`] owns an [`EventQueue`] of one-shot callbacks. Calling [`Simulator::run`] pops
//! the callbacks in order of their due time and fires them on the simulation state `S`. Every
//! callback fires at most once, and is dropped right after it was fired. Once the stop time is
//! reached, all remaining callbacks are dropped without firing.
//!
//! ```
//! use cellsim::prelude::*;
//!
//! # fn main() -> Result<(), SimError> {
//! let mut sim: Simulator<Vec<f64>> = Simulator::new();
//! sim.schedule_at(2.0, Box::new(|log: &mut Vec<f64>, t| log.push(t)))?;
//! sim.schedule_at(1.0, Box::new(|log: &mut Vec<f64>, t| log.push(t)))?;
//! sim.schedule_at(5.0, Box::new(|log: &mut Vec<f64>, t| log.push(t)))?;
//! sim.stop_at(3.0)?;
//!
//! let mut log = Vec::new();
//! let summary = sim.run(&mut log);
//! assert_eq!(log, vec![1.0, 2.0]);
//! assert_eq!(summary.fired, 2);
//! assert_eq!(summary.discarded, 1);
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use ordered_float::NotNan;

use crate::{
    event::{Callback, EventId, EventQueue, FmtTime, Scheduler, TimedEventQueue},
    types::SimError,
};

/// Summary of a single simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Number of callbacks that were fired.
    pub fired: usize,
    /// Number of callbacks that were dropped without firing, because they were due after the stop
    /// time.
    pub discarded: usize,
    /// Simulation time at which the run ended.
    pub end_time: f64,
}

/// Discrete-event simulator, generic over the simulation state `S` and the queue `Q`.
pub struct Simulator<S, Q = TimedEventQueue<Callback<S>>> {
    queue: Q,
    stop_time: Option<NotNan<f64>>,
    phantom: PhantomData<fn(&mut S)>,
}

impl<S, Q: EventQueue<Callback<S>>> std::fmt::Debug for Simulator<S, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("now", &self.queue.get_time())
            .field("pending", &self.queue.len())
            .field("stop_time", &self.stop_time.map(|t| t.into_inner()))
            .finish()
    }
}

impl<S> Default for Simulator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Simulator<S> {
    /// Create a new simulator with an empty [`TimedEventQueue`].
    pub fn new() -> Self {
        Self::with_queue(TimedEventQueue::new())
    }
}

impl<S, Q: EventQueue<Callback<S>>> Simulator<S, Q> {
    /// Create a new simulator using the given queue.
    pub fn with_queue(queue: Q) -> Self {
        Self {
            queue,
            stop_time: None,
            phantom: PhantomData,
        }
    }

    /// Stop the simulation at `time`. Callbacks that are due exactly at `time` will still fire.
    pub fn stop_at(&mut self, time: f64) -> Result<(), SimError> {
        let time = NotNan::new(time).map_err(|_| SimError::InvalidTime(time))?;
        self.stop_time = Some(time);
        Ok(())
    }

    /// Get the configured stop time.
    pub fn stop_time(&self) -> Option<f64> {
        self.stop_time.map(|t| t.into_inner())
    }

    /// Number of pending callbacks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Get a reference to the queue.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Run the simulation until either the queue is empty or the stop time is reached. All
    /// callbacks still enqueued afterwards are dropped.
    pub fn run(&mut self, state: &mut S) -> RunSummary {
        let mut summary = RunSummary::default();
        let stop = self.stop_time.map(|t| t.into_inner());

        while let Some(next) = self.queue.peek_time() {
            if stop.map(|stop| next > stop).unwrap_or(false) {
                break;
            }
            let Some((time, callback)) = self.queue.pop() else {
                break;
            };
            log::trace!("fire event {}", time.fmt_time());
            callback(state, time);
            summary.fired += 1;
        }

        summary.discarded = self.queue.len();
        if summary.discarded > 0 {
            log::debug!(
                "Dropping {} events scheduled after the stop time",
                summary.discarded
            );
        }
        self.queue.clear();
        summary.end_time = stop.unwrap_or_else(|| self.queue.get_time());
        summary
    }
}

impl<S, Q: EventQueue<Callback<S>>> Scheduler<S> for Simulator<S, Q> {
    fn schedule_at(&mut self, time: f64, callback: Callback<S>) -> Result<EventId, SimError> {
        self.queue.push(time, callback)
    }

    fn now(&self) -> f64 {
        self.queue.get_time()
    }
}
