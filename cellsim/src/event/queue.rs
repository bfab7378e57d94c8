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

//! Module containing the definitions for the event queues.

use ordered_float::NotNan;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Reverse,
    collections::{HashMap, VecDeque},
};

use crate::types::SimError;

use super::EventId;

/// Interface of an event queue.
pub trait EventQueue<T> {
    /// Enqueue a new item that is due at `time`. The returned id is unique for this queue.
    fn push(&mut self, time: f64, item: T) -> Result<EventId, SimError>;

    /// Pop the next item, and advance the time of the queue to the due time of that item.
    fn pop(&mut self) -> Option<(f64, T)>;

    /// Get the due time of the next item
    fn peek_time(&self) -> Option<f64>;

    /// Get the number of enqueued items
    fn len(&self) -> usize;

    /// Return `True` if no item is enqueued.
    fn is_empty(&self) -> bool;

    /// Remove all items from the queue. The time of the queue is not changed.
    fn clear(&mut self);

    /// Get the current time of the queue, i.e., the due time of the last popped item.
    fn get_time(&self) -> f64;
}

/// Check that `time` is a valid due time, given the current time `now`.
fn check_time(now: NotNan<f64>, time: f64) -> Result<NotNan<f64>, SimError> {
    let time = NotNan::new(time).map_err(|_| SimError::InvalidTime(time))?;
    if time < now {
        return Err(SimError::TimeInPast {
            now: now.into_inner(),
            time: time.into_inner(),
        });
    }
    Ok(time)
}

/// Earliest-deadline-first queue. Items that are due at the same time are popped in the order in
/// which they were pushed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEventQueue<T> {
    q: PriorityQueue<EventId, Reverse<(NotNan<f64>, EventId)>>,
    items: HashMap<EventId, T>,
    next_id: EventId,
    current_time: NotNan<f64>,
}

impl<T> Default for TimedEventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimedEventQueue<T> {
    /// Create a new empty event queue
    pub fn new() -> Self {
        Self {
            q: PriorityQueue::new(),
            items: HashMap::new(),
            next_id: 0,
            current_time: NotNan::default(),
        }
    }

    /// Reset the current time to zero. This function will only have an effect if the
    /// queue is empty. Otherwise, nothing will happen.
    pub fn reset_time(&mut self) {
        if self.is_empty() {
            self.current_time = Default::default();
        }
    }
}

impl<T> EventQueue<T> for TimedEventQueue<T> {
    fn push(&mut self, time: f64, item: T) -> Result<EventId, SimError> {
        let time = check_time(self.current_time, time)?;
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(id, item);
        // the id breaks ties, which keeps events that are due at the same time in FIFO order.
        self.q.push(id, Reverse((time, id)));
        Ok(id)
    }

    fn pop(&mut self) -> Option<(f64, T)> {
        let (id, Reverse((time, _))) = self.q.pop()?;
        self.current_time = time;
        self.items.remove(&id).map(|item| (time.into_inner(), item))
    }

    fn peek_time(&self) -> Option<f64> {
        self.q.peek().map(|(_, Reverse((t, _)))| t.into_inner())
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    fn clear(&mut self) {
        self.q.clear();
        self.items.clear();
    }

    fn get_time(&self) -> f64 {
        self.current_time.into_inner()
    }
}

/// Basic event queue, which pops items in the order in which they were pushed, ignoring their due
/// time. Use it to drive callbacks without a clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicEventQueue<T> {
    q: VecDeque<(NotNan<f64>, EventId, T)>,
    next_id: EventId,
    current_time: NotNan<f64>,
}

impl<T> Default for BasicEventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BasicEventQueue<T> {
    /// Create a new empty event queue
    pub fn new() -> Self {
        Self {
            q: VecDeque::new(),
            next_id: 0,
            current_time: NotNan::default(),
        }
    }
}

impl<T> EventQueue<T> for BasicEventQueue<T> {
    fn push(&mut self, time: f64, item: T) -> Result<EventId, SimError> {
        let time = NotNan::new(time).map_err(|_| SimError::InvalidTime(time))?;
        let id = self.next_id;
        self.next_id += 1;
        self.q.push_back((time, id, item));
        Ok(id)
    }

    fn pop(&mut self) -> Option<(f64, T)> {
        let (time, _, item) = self.q.pop_front()?;
        self.current_time = time;
        Some((time.into_inner(), item))
    }

    fn peek_time(&self) -> Option<f64> {
        self.q.front().map(|(t, _, _)| t.into_inner())
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    fn clear(&mut self) {
        self.q.clear()
    }

    fn get_time(&self) -> f64 {
        self.current_time.into_inner()
    }
}

/// Display type for the time of an event
pub trait FmtTime {
    /// Display the time
    fn fmt_time(&self) -> String;
}

impl FmtTime for f64 {
    fn fmt_time(&self) -> String {
        format!("(time: {self:.6}s)")
    }
}

impl FmtTime for NotNan<f64> {
    fn fmt_time(&self) -> String {
        self.into_inner().fmt_time()
    }
}
