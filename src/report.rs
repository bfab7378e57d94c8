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

//! Scheduling of periodic reports on the simulation clock.

use std::rc::Rc;

use cellsim::{event::Scheduler, types::SimError};
use itertools::iproduct;
use thiserror::Error;

use crate::placement::ConfigError;

/// Upper bound on the number of events of one kind that a scenario may schedule.
pub const MAX_SCHEDULED_EVENTS: usize = 10_000_000;

/// Check that `count` events of kind `what` stay within [`MAX_SCHEDULED_EVENTS`].
pub(crate) fn check_event_count(what: &'static str, count: f64) -> Result<(), ConfigError> {
    if count <= MAX_SCHEDULED_EVENTS as f64 {
        Ok(())
    } else {
        Err(ConfigError::TooManyEvents { what, count })
    }
}

/// A report that is due at `time` for `terminal`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReport<T> {
    /// Due time in seconds
    pub time: f64,
    /// The terminal to report on
    pub terminal: T,
}

/// Error thrown while scheduling reports.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportError {
    /// The horizon is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The scheduler refused the report.
    #[error("{0}")]
    Schedule(#[from] SimError),
}

/// Generate one report for each terminal and each whole second in `[0, horizon]`. The reports are
/// ordered terminal-major, then by time. Fails if more than [`MAX_SCHEDULED_EVENTS`] reports would
/// be generated.
pub fn periodic_reports<T: Clone>(
    terminals: &[T],
    horizon: f64,
) -> Result<Vec<ScheduledReport<T>>, ConfigError> {
    if !(horizon.is_finite() && horizon >= 0.0) {
        return Err(ConfigError::InvalidHorizon(horizon));
    }
    check_event_count("reports", (horizon.floor() + 1.0) * terminals.len() as f64)?;
    let last = horizon.floor() as u64;
    Ok(iproduct!(terminals.iter(), 0..=last)
        .map(|(t, s)| ScheduledReport {
            time: s as f64,
            terminal: t.clone(),
        })
        .collect())
}

/// Register `callback` on `scheduler` for each terminal and each whole second in `[0, horizon]`,
/// and return the registered reports in order of registration. Reports due at the same time fire
/// in the order of `terminals`.
pub fn schedule_periodic_reports<S, T, Sch, F>(
    scheduler: &mut Sch,
    terminals: &[T],
    horizon: f64,
    callback: F,
) -> Result<Vec<ScheduledReport<T>>, ReportError>
where
    S: 'static,
    Sch: Scheduler<S>,
    T: Clone + 'static,
    F: Fn(&mut S, f64, &T) + 'static,
{
    let reports = periodic_reports(terminals, horizon)?;
    let callback = Rc::new(callback);
    for report in reports.iter() {
        let callback = callback.clone();
        let terminal = report.terminal.clone();
        scheduler.schedule_at(
            report.time,
            Box::new(move |state: &mut S, now| callback(state, now, &terminal)),
        )?;
    }
    log::debug!(
        "Scheduled {} reports for {} terminals",
        reports.len(),
        terminals.len()
    );
    Ok(reports)
}
