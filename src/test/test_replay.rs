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

//! Test parsing of recorded measurements

use std::fs::write;

use crate::replay::{parse_measurements, read_measurements, Recorded, ReplayError};
use cellsim::types::{CellId, Rnti, UeMeasurement};

use pretty_assertions::assert_eq;
use test_log::test;

#[test]
fn parse_file() {
    let content = "# time cell rnti rsrp sinr\n\
                   0.0\t1\t1\t-80\t12\n\
                   \n\
                   0.1   1   2   -85.5   9.25\n\
                   0.1 2 1 -90 -3\n";
    assert_eq!(
        parse_measurements(content).unwrap(),
        vec![
            Recorded {
                time: 0.0,
                measurement: UeMeasurement {
                    cell: CellId(1),
                    rnti: Rnti(1),
                    rsrp: -80.0,
                    sinr: 12.0
                }
            },
            Recorded {
                time: 0.1,
                measurement: UeMeasurement {
                    cell: CellId(1),
                    rnti: Rnti(2),
                    rsrp: -85.5,
                    sinr: 9.25
                }
            },
            Recorded {
                time: 0.1,
                measurement: UeMeasurement {
                    cell: CellId(2),
                    rnti: Rnti(1),
                    rsrp: -90.0,
                    sinr: -3.0
                }
            },
        ]
    );
}

#[test]
fn parse_empty() {
    assert!(parse_measurements("").unwrap().is_empty());
    assert!(parse_measurements("# nothing\n\n").unwrap().is_empty());
}

#[test]
fn parse_errors() {
    match parse_measurements("0.0 1 1 -80\n") {
        Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 1),
        r => panic!("unexpected result: {r:?}"),
    }
    match parse_measurements("# header\n0.0 1 1 -80 12\n0.5 1 x -80 12\n") {
        Err(ReplayError::Parse { line, msg }) => {
            assert_eq!(line, 3);
            assert!(msg.contains("rnti"));
        }
        r => panic!("unexpected result: {r:?}"),
    }
    match parse_measurements("-1.0 1 1 -80 12\n") {
        Err(ReplayError::Parse { line, msg }) => {
            assert_eq!(line, 1);
            assert!(msg.contains("time"));
        }
        r => panic!("unexpected result: {r:?}"),
    }
    assert!(matches!(
        parse_measurements("0.0 1 70000 -80 12\n"),
        Err(ReplayError::Parse { line: 1, .. })
    ));
}

#[test]
fn parse_unsorted() {
    match parse_measurements("0.2 1 1 -80 12\n0.1 1 2 -85 9\n") {
        Err(ReplayError::Unsorted { line, time }) => {
            assert_eq!(line, 2);
            approx::assert_abs_diff_eq!(time, 0.1);
        }
        r => panic!("unexpected result: {r:?}"),
    }
}

#[test]
fn read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("measurements.txt");
    write(&path, "0.0 1 1 -80 12\n0.1 1 2 -85 9\n").unwrap();
    let records = read_measurements(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].measurement.rnti, Rnti(2));

    assert!(matches!(
        read_measurements(&dir.path().join("missing.txt")),
        Err(ReplayError::Io { .. })
    ));
}
