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

//! Test the simulator

use crate::{
    event::{BasicEventQueue, Callback, Scheduler},
    simulator::Simulator,
    types::SimError,
};

use pretty_assertions::assert_eq;
use test_log::test;

type Log = Vec<(f64, &'static str)>;

fn push(name: &'static str) -> Callback<Log> {
    Box::new(move |log: &mut Log, t| log.push((t, name)))
}

#[test]
fn fires_in_order() {
    let mut sim: Simulator<Log> = Simulator::new();
    sim.schedule_at(1.0, push("b")).unwrap();
    sim.schedule_at(0.0, push("a")).unwrap();
    sim.schedule_at(1.0, push("c")).unwrap();
    let mut log = Log::new();
    let summary = sim.run(&mut log);
    assert_eq!(log, vec![(0.0, "a"), (1.0, "b"), (1.0, "c")]);
    assert_eq!(summary.fired, 3);
    assert_eq!(summary.discarded, 0);
    assert_eq!(summary.end_time, 1.0);
    assert_eq!(sim.now(), 1.0);
}

#[test]
fn events_at_stop_time_fire() {
    let mut sim: Simulator<Log> = Simulator::new();
    sim.stop_at(2.0).unwrap();
    sim.schedule_at(2.0, push("at")).unwrap();
    sim.schedule_at(2.0 + 1e-9, push("after")).unwrap();
    let mut log = Log::new();
    let summary = sim.run(&mut log);
    assert_eq!(log, vec![(2.0, "at")]);
    assert_eq!(summary.fired, 1);
    assert_eq!(summary.discarded, 1);
    assert_eq!(summary.end_time, 2.0);
    assert_eq!(sim.pending(), 0);
}

#[test]
fn run_without_events() {
    let mut sim: Simulator<Log> = Simulator::default();
    sim.stop_at(5.0).unwrap();
    let mut log = Log::new();
    let summary = sim.run(&mut log);
    assert!(log.is_empty());
    assert_eq!(summary.fired, 0);
    assert_eq!(summary.end_time, 5.0);
}

#[test]
fn invalid_stop_time() {
    let mut sim: Simulator<Log> = Simulator::new();
    assert!(matches!(sim.stop_at(f64::NAN), Err(SimError::InvalidTime(_))));
    assert_eq!(sim.stop_time(), None);
}

#[test]
fn custom_queue() {
    let mut sim: Simulator<Log, _> = Simulator::with_queue(BasicEventQueue::new());
    sim.schedule_at(3.0, push("first")).unwrap();
    sim.schedule_at(1.0, push("second")).unwrap();
    let mut log = Log::new();
    sim.run(&mut log);
    assert_eq!(log, vec![(3.0, "first"), (1.0, "second")]);
}
