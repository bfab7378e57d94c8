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

//! Test the periodic reports

use std::collections::HashSet;

use crate::{
    placement::ConfigError,
    report::{periodic_reports, MAX_SCHEDULED_EVENTS, schedule_periodic_reports, ReportError, ScheduledReport},
};
use cellsim::{
    event::{Callback, EventId, Scheduler},
    simulator::Simulator,
    types::SimError,
};

use pretty_assertions::assert_eq;
use test_log::test;

type Log = Vec<(f64, usize)>;

/// Clock that only collects the callbacks, and fires them on demand in order of registration.
struct FakeClock {
    pending: Vec<(f64, Callback<Log>)>,
}

impl FakeClock {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    fn drain(&mut self, log: &mut Log) {
        for (t, callback) in self.pending.drain(..) {
            callback(log, t);
        }
    }
}

impl Scheduler<Log> for FakeClock {
    fn schedule_at(&mut self, time: f64, callback: Callback<Log>) -> Result<EventId, SimError> {
        self.pending.push((time, callback));
        Ok(self.pending.len() as EventId - 1)
    }

    fn now(&self) -> f64 {
        0.0
    }
}

fn push_report(log: &mut Log, now: f64, terminal: &usize) {
    log.push((now, *terminal))
}

#[test]
fn report_count() {
    let terminals = vec![0usize, 1, 2];
    let reports = periodic_reports(&terminals, 7.5).unwrap();
    assert_eq!(reports.len(), 3 * 8);
    let unique: HashSet<(usize, u64)> = reports
        .iter()
        .map(|r| (r.terminal, r.time as u64))
        .collect();
    assert_eq!(unique.len(), reports.len());
}

#[test]
fn report_order() {
    let reports = periodic_reports(&["a", "b"], 1.0).unwrap();
    assert_eq!(
        reports,
        vec![
            ScheduledReport { time: 0.0, terminal: "a" },
            ScheduledReport { time: 1.0, terminal: "a" },
            ScheduledReport { time: 0.0, terminal: "b" },
            ScheduledReport { time: 1.0, terminal: "b" },
        ]
    );
}

#[test]
fn zero_horizon() {
    let reports = periodic_reports(&[0usize], 0.0).unwrap();
    assert_eq!(reports, vec![ScheduledReport { time: 0.0, terminal: 0 }]);
    assert!(periodic_reports::<usize>(&[], 10.0).unwrap().is_empty());
}

#[test]
fn invalid_horizon() {
    assert_eq!(
        periodic_reports(&[0usize], -1.0),
        Err(ConfigError::InvalidHorizon(-1.0))
    );
    assert!(matches!(
        periodic_reports(&[0usize], f64::NAN),
        Err(ConfigError::InvalidHorizon(_))
    ));
    let mut clock = FakeClock::new();
    assert!(matches!(
        schedule_periodic_reports(&mut clock, &[0usize], f64::INFINITY, push_report),
        Err(ReportError::Config(ConfigError::InvalidHorizon(_)))
    ));
    assert!(clock.pending.is_empty());
}

#[test]
fn report_count_is_bounded() {
    assert_eq!(
        periodic_reports(&[0usize, 1], 1e12),
        Err(ConfigError::TooManyEvents {
            what: "reports",
            count: 2.0 * (1e12 + 1.0)
        })
    );
    assert!(periodic_reports::<usize>(&[], 1e300).unwrap().is_empty());

    let per_terminal = MAX_SCHEDULED_EVENTS / 2;
    let horizon = (per_terminal - 1) as f64;
    assert!(periodic_reports(&[0usize, 1], horizon + 1.0).is_err());

    let mut clock = FakeClock::new();
    assert!(matches!(
        schedule_periodic_reports(&mut clock, &[0usize], 1e18, push_report),
        Err(ReportError::Config(ConfigError::TooManyEvents { .. }))
    ));
    assert!(clock.pending.is_empty());
}

#[test]
fn fake_clock_fires_every_report() {
    let mut clock = FakeClock::new();
    let reports = schedule_periodic_reports(&mut clock, &[0usize, 1], 2.0, push_report).unwrap();
    assert_eq!(reports.len(), 6);
    assert_eq!(clock.pending.len(), 6);

    let mut log = Log::new();
    clock.drain(&mut log);
    assert_eq!(
        log,
        vec![(0.0, 0), (1.0, 0), (2.0, 0), (0.0, 1), (1.0, 1), (2.0, 1)]
    );
}

#[test]
fn simulator_fires_in_time_order() {
    let mut sim: Simulator<Log> = Simulator::new();
    let reports = schedule_periodic_reports(&mut sim, &[0usize, 1], 5.0, push_report).unwrap();
    assert_eq!(reports.len(), 12);
    sim.stop_at(5.0).unwrap();

    let mut log = Log::new();
    let summary = sim.run(&mut log);
    assert_eq!(summary.fired, 12);
    assert_eq!(summary.discarded, 0);

    let expected: Log = (0..=5)
        .flat_map(|s| [(s as f64, 0), (s as f64, 1)])
        .collect();
    assert_eq!(log, expected);
}

#[test]
fn reports_after_stop_time_are_discarded() {
    let mut sim: Simulator<Log> = Simulator::new();
    schedule_periodic_reports(&mut sim, &[7usize], 10.0, push_report).unwrap();
    sim.stop_at(3.5).unwrap();
    let mut log = Log::new();
    let summary = sim.run(&mut log);
    assert_eq!(log, vec![(0.0, 7), (1.0, 7), (2.0, 7), (3.0, 7)]);
    assert_eq!(summary.discarded, 7);
}
