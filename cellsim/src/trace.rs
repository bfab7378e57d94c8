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

//! Path-addressed trace sources.
//!
//! Trace sources are identified by slash-separated paths, e.g.,
//! `/NodeList/3/DeviceList/0/LteUePhy/ReportUeMeasurements`. Observers connect to a pattern, in
//! which a single segment may be replaced by `*` to match any value in that segment. Whenever a
//! source fires, every observer with a matching pattern is invoked with the simulation state, the
//! current time, the concrete path of the source, and the event payload.

use crate::types::SimError;

/// Callback of an observer connected to the [`TraceHub`].
pub type Observer<S, E> = Box<dyn FnMut(&mut S, f64, &str, &E)>;

/// Pattern that is matched against trace source paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePattern {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Wildcard,
    Exact(String),
}

impl TracePattern {
    /// Parse a pattern. It must start with `/`, and must not contain any empty segment.
    pub fn parse(pattern: &str) -> Result<Self, SimError> {
        let err = || SimError::InvalidTracePath(pattern.to_string());
        let rest = pattern.strip_prefix('/').ok_or_else(err)?;
        let segments = rest
            .split('/')
            .map(|s| match s {
                "" => Err(err()),
                "*" => Ok(Segment::Wildcard),
                s => Ok(Segment::Exact(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Check if the concrete `path` matches the pattern.
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let mut parts = rest.split('/');
        for segment in self.segments.iter() {
            match (segment, parts.next()) {
                (_, None) | (_, Some("")) => return false,
                (Segment::Wildcard, Some(_)) => {}
                (Segment::Exact(s), Some(p)) if s == p => {}
                (Segment::Exact(_), Some(_)) => return false,
            }
        }
        parts.next().is_none()
    }
}

/// Registry of observers, indexed by the pattern to which they are connected.
pub struct TraceHub<S, E> {
    observers: Vec<(TracePattern, Observer<S, E>)>,
}

impl<S, E> std::fmt::Debug for TraceHub<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(p, _)| p))
            .finish()
    }
}

impl<S, E> Default for TraceHub<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> TraceHub<S, E> {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Connect `observer` to all sources matching `pattern`. Returns the number of observers
    /// connected to the hub afterwards.
    pub fn connect(&mut self, pattern: &str, observer: Observer<S, E>) -> Result<usize, SimError> {
        let pattern = TracePattern::parse(pattern)?;
        log::debug!("Connect observer to {pattern:?}");
        self.observers.push((pattern, observer));
        Ok(self.observers.len())
    }

    /// Number of connected observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observer is connected.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Fire the source at `path`, notifying every matching observer in the order in which they
    /// were connected. Returns the number of notified observers.
    pub fn fire(&mut self, state: &mut S, time: f64, path: &str, event: &E) -> usize {
        let mut notified = 0;
        for (pattern, observer) in self.observers.iter_mut() {
            if pattern.matches(path) {
                observer(state, time, path, event);
                notified += 1;
            }
        }
        if notified == 0 {
            log::trace!("No observer for {path}");
        }
        notified
    }
}
