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

//! Test the trace hub

use crate::{
    trace::{TraceHub, TracePattern},
    types::SimError,
};

use pretty_assertions::assert_eq;
use test_log::test;

const REPORT: &str = "/NodeList/*/DeviceList/*/LteUePhy/ReportUeMeasurements";

type Seen = Vec<(u32, String)>;

#[test]
fn pattern_matching() {
    let p = TracePattern::parse(REPORT).unwrap();
    assert!(p.matches("/NodeList/4/DeviceList/0/LteUePhy/ReportUeMeasurements"));
    assert!(p.matches("/NodeList/12/DeviceList/3/LteUePhy/ReportUeMeasurements"));
    assert!(!p.matches("/NodeList/4/DeviceList/0/LteUePhy"));
    assert!(!p.matches("/NodeList/4/DeviceList/0/LteUePhy/ReportUeMeasurements/x"));
    assert!(!p.matches("/NodeList/4/DeviceList/0/LteEnbPhy/ReportUeMeasurements"));
    assert!(!p.matches("/NodeList//DeviceList/0/LteUePhy/ReportUeMeasurements"));
    assert!(!p.matches("NodeList/4/DeviceList/0/LteUePhy/ReportUeMeasurements"));
}

#[test]
fn invalid_patterns() {
    for p in ["", "NodeList/*", "/NodeList//x", "/NodeList/"] {
        assert_eq!(
            TracePattern::parse(p),
            Err(SimError::InvalidTracePath(p.to_string()))
        );
    }
}

#[test]
fn fire_notifies_matching_observers() {
    let mut hub: TraceHub<Seen, u32> = TraceHub::new();
    hub.connect(
        REPORT,
        Box::new(|seen: &mut Seen, _: f64, path: &str, e: &u32| {
            seen.push((*e, path.to_string()))
        }),
    )
    .unwrap();
    hub.connect(
        "/NodeList/1/DeviceList/*/LteUePhy/ReportUeMeasurements",
        Box::new(|seen: &mut Seen, _: f64, _: &str, e: &u32| seen.push((*e + 100, "one".into()))),
    )
    .unwrap();
    assert_eq!(hub.len(), 2);

    let mut seen = Seen::new();
    let p0 = "/NodeList/0/DeviceList/0/LteUePhy/ReportUeMeasurements";
    let p1 = "/NodeList/1/DeviceList/0/LteUePhy/ReportUeMeasurements";
    assert_eq!(hub.fire(&mut seen, 0.0, p0, &1), 1);
    assert_eq!(hub.fire(&mut seen, 0.1, p1, &2), 2);
    assert_eq!(hub.fire(&mut seen, 0.2, "/NodeList/1/Other", &3), 0);
    assert_eq!(
        seen,
        vec![
            (1, p0.to_string()),
            (2, p1.to_string()),
            (102, "one".to_string())
        ]
    );
}

#[test]
fn connect_rejects_invalid_pattern() {
    let mut hub: TraceHub<Seen, u32> = TraceHub::default();
    let res = hub.connect("relative/path", Box::new(|_: &mut Seen, _: f64, _: &str, _: &u32| {}));
    assert!(res.is_err());
    assert!(hub.is_empty());
}
