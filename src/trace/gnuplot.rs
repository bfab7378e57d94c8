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

//! Export node positions as gnuplot labels.

use std::path::Path;

use cellsim::types::{CellId, Vector};

use super::{write_lines, TraceError};

/// Labels for eNodeBs, named after their cell id.
pub fn enb_labels<'a>(enbs: impl IntoIterator<Item = (CellId, &'a Vector)>) -> Vec<String> {
    enbs.into_iter()
        .map(|(cell, pos)| {
            format!(
                "set label \"{}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"white\" front point pt 2 ps 0.3 lc rgb \"white\" offset 0,0",
                cell.0, pos.x, pos.y
            )
        })
        .collect()
}

/// Labels for UEs, named after their IMSI.
pub fn ue_labels<'a>(ues: impl IntoIterator<Item = (u64, &'a Vector)>) -> Vec<String> {
    ues.into_iter()
        .map(|(imsi, pos)| {
            format!(
                "set label \"{imsi}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"grey\" front point pt 1 ps 0.3 lc rgb \"grey\" offset 0,0",
                pos.x, pos.y
            )
        })
        .collect()
}

/// Write the labels into `path`.
pub fn write_labels(path: &Path, labels: &[String]) -> Result<(), TraceError> {
    write_lines(path, labels)
}
