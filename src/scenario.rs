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

//! Scenario configuration, and the predefined scenarios.
//!
//! A [`ScenarioConfig`] fully describes a testbed: the cells, the terminals in each cell, how they
//! move, and what is traced. It is stored as JSON.

use std::{
    fs::{read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
};

use cellsim::{random::RandomVariable, types::Vector};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    placement::{ConfigError, HANDSET_HEIGHT},
    report::check_event_count,
    trace::MEASUREMENT_PATH,
};

/// Error thrown while loading or storing a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON is malformed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The scenario is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Complete description of a testbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Name of the scenario, used for naming output folders.
    pub name: String,
    /// Seed of the random source.
    #[serde(default)]
    pub seed: u64,
    /// Duration of the simulation in seconds.
    pub horizon: f64,
    /// All cells. The cell ids are assigned in order, starting at 1.
    pub cells: Vec<CellConfig>,
    /// Also report the positions of static terminals.
    #[serde(default)]
    pub report_static: bool,
    /// Trace source to which the measurement sink subscribes. No measurements are captured if it
    /// is missing.
    #[serde(default)]
    pub measurement_path: Option<String>,
    /// Interval (in seconds) at which the simulation progress is logged.
    #[serde(default)]
    pub progress_interval: Option<f64>,
    /// Export the final positions of all nodes as gnuplot labels.
    #[serde(default)]
    pub gnuplot: bool,
    /// Fading model of the radio channel.
    #[serde(default)]
    pub fading: Option<FadingConfig>,
}

/// Configuration of a single cell, and the terminals attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellConfig {
    /// Position of the eNodeB
    pub center: Vector,
    /// Radius of the cell in meters
    pub radius: f64,
    /// Terminals that do not move
    #[serde(default)]
    pub static_ues: StaticConfig,
    /// Terminals that move according to random waypoint mobility
    #[serde(default)]
    pub mobile_ues: MobileConfig,
}

/// Population of static terminals, distributed uniformly in a disc around the eNodeB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticConfig {
    /// Number of terminals
    pub count: usize,
    /// Radius of the disc, relative to the cell radius.
    pub radius_fraction: f64,
    /// Height above ground
    pub height: f64,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            count: 0,
            radius_fraction: 1.0,
            height: HANDSET_HEIGHT,
        }
    }
}

/// Population of mobile terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileConfig {
    /// Number of terminals
    pub count: usize,
    /// Where the terminals start
    pub start: StartPoint,
    /// Where the terminals travel to
    pub waypoints: WaypointConfig,
    /// Speed in meters per second
    pub speed: RandomVariable,
    /// Pause time in seconds
    pub pause: RandomVariable,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            count: 0,
            start: StartPoint::Offset {
                dx: 0.0,
                dy: 0.0,
                height: HANDSET_HEIGHT,
            },
            waypoints: WaypointConfig::Annulus {
                min_fraction: 0.0,
                max_fraction: 1.0,
                height: HANDSET_HEIGHT,
            },
            speed: RandomVariable::constant(1.0),
            pause: RandomVariable::constant(0.0),
        }
    }
}

/// Initial position of mobile terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPoint {
    /// All terminals start at the same point, offset from the eNodeB.
    Offset {
        /// Offset along x
        dx: f64,
        /// Offset along y
        dy: f64,
        /// Height above ground
        height: f64,
    },
    /// Terminal `i` starts at `points[i % points.len()]`.
    Points(Vec<Vector>),
    /// Each terminal starts at a random point of an annulus around the eNodeB.
    Annulus {
        /// Inner radius, relative to the cell radius
        min_fraction: f64,
        /// Outer radius, relative to the cell radius
        max_fraction: f64,
        /// Height above ground
        height: f64,
    },
}

/// Waypoint targets of mobile terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointConfig {
    /// Targets are drawn from an annulus around the eNodeB.
    Annulus {
        /// Inner radius, relative to the cell radius
        min_fraction: f64,
        /// Outer radius, relative to the cell radius
        max_fraction: f64,
        /// Height above ground
        height: f64,
    },
    /// Terminal `i` visits the points in order, starting at `points[i % points.len()]`.
    Points(Vec<Vector>),
}

/// Trace-based fading of the radio channel. The fading model itself is not simulated, but the
/// trace file is located and checked for presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadingConfig {
    /// File name of the fading trace, relative to the fading directory.
    pub trace: String,
    /// Length of the trace in seconds
    pub trace_length: f64,
    /// Number of samples in the trace
    pub samples: usize,
    /// Size of the fading window in seconds
    pub window_size: f64,
    /// Number of resource blocks
    pub rb_num: usize,
}

impl FadingConfig {
    fn new(trace: &str) -> Self {
        Self {
            trace: trace.to_string(),
            trace_length: 10.0,
            samples: 10000,
            window_size: 0.5,
            rb_num: 100,
        }
    }

    /// Locate the trace file in `dir` (or the current directory). Returns `None` and logs a
    /// warning if the file does not exist.
    pub fn resolve(&self, dir: Option<&Path>) -> Option<PathBuf> {
        let path = dir
            .map(|d| d.join(&self.trace))
            .unwrap_or_else(|| PathBuf::from(&self.trace));
        if path.is_file() {
            log::info!("Using fading trace {}", path.display());
            Some(path)
        } else {
            log::warn!(
                "Fading trace {} not found. Running without fading.",
                path.display()
            );
            None
        }
    }
}

impl ScenarioConfig {
    /// Check the entire configuration. Populations of size zero are valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.horizon.is_finite() && self.horizon >= 0.0) {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        if self.cells.is_empty() {
            return Err(ConfigError::NoCells);
        }
        if let Some(interval) = self.progress_interval {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(ConfigError::NotFinite("progress interval"));
            }
            check_event_count("progress reports", (self.horizon / interval).floor() + 1.0)?;
        }
        for cell in self.cells.iter() {
            cell.validate()?;
        }
        let reported: usize = self
            .cells
            .iter()
            .map(|c| {
                c.mobile_ues.count
                    + if self.report_static {
                        c.static_ues.count
                    } else {
                        0
                    }
            })
            .sum();
        check_event_count("reports", (self.horizon.floor() + 1.0) * reported as f64)?;
        Ok(())
    }

    /// Total number of terminals in the scenario.
    pub fn num_ues(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.static_ues.count + c.mobile_ues.count)
            .sum()
    }

    /// Read the configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let config: Self = serde_json::from_str(&read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Store the configuration as JSON, overwriting any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let mut f = File::create(path)?;
        f.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}

/// Fractions of an annulus must satisfy `0 <= min <= max <= 1`, keeping the annulus inside the cell.
fn check_fractions(min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && 0.0 <= min && min <= max && max <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFractions { min, max })
    }
}

fn check_height(height: f64) -> Result<(), ConfigError> {
    if height.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite("height"))
    }
}

impl CellConfig {
    /// Fails if a point `distance` meters away from the eNodeB lies outside of the cell.
    fn check_inside(&self, what: &'static str, distance: f64) -> Result<(), ConfigError> {
        if distance <= self.radius {
            Ok(())
        } else {
            Err(ConfigError::OutsideCell {
                what,
                distance,
                radius: self.radius,
            })
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(ConfigError::NotFinite("cell center"));
        }

        let s = &self.static_ues;
        if s.count > 0 {
            let r = s.radius_fraction * self.radius;
            if !(r.is_finite() && r > 0.0) {
                return Err(ConfigError::InvalidRadius(r));
            }
            self.check_inside("static terminal disc", r)?;
            check_height(s.height)?;
        }

        let m = &self.mobile_ues;
        if m.count > 0 {
            match &m.start {
                StartPoint::Offset { dx, dy, height } => {
                    if !(dx.is_finite() && dy.is_finite()) {
                        return Err(ConfigError::NotFinite("start offset"));
                    }
                    self.check_inside("start point", dx.hypot(*dy))?;
                    check_height(*height)?;
                }
                StartPoint::Points(p) if p.is_empty() => {
                    return Err(ConfigError::EmptyList("start points"))
                }
                StartPoint::Points(p) => {
                    for point in p {
                        if !point.is_finite() {
                            return Err(ConfigError::NotFinite("start point"));
                        }
                        self.check_inside("start point", point.distance_xy(&self.center))?;
                    }
                }
                StartPoint::Annulus {
                    min_fraction,
                    max_fraction,
                    height,
                } => {
                    check_fractions(*min_fraction, *max_fraction)?;
                    check_height(*height)?;
                }
            }
            match &m.waypoints {
                WaypointConfig::Annulus {
                    min_fraction,
                    max_fraction,
                    height,
                } => {
                    check_fractions(*min_fraction, *max_fraction)?;
                    check_height(*height)?;
                }
                WaypointConfig::Points(p) if p.is_empty() => {
                    return Err(ConfigError::EmptyList("waypoints"))
                }
                WaypointConfig::Points(p) => {
                    for point in p {
                        if !point.is_finite() {
                            return Err(ConfigError::NotFinite("waypoint"));
                        }
                        self.check_inside("waypoint", point.distance_xy(&self.center))?;
                    }
                }
            }
            m.speed.build()?;
            m.pause.build()?;
        }
        Ok(())
    }
}

/// Predefined scenarios.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, ValueEnum, Deserialize, Serialize)]
pub enum Preset {
    /// One cell with four static terminals, and two terminals roaming near the cell edge.
    OneCell,
    /// Four cells, each with two static terminals and two fast mobile terminals.
    FourCell,
    /// Two terminals moving away from the eNodeB on straight lines, capturing RSRP and SINR.
    SinrDistance,
    /// A single large urban cell with ten terminals.
    Urban,
    /// Two terminals moving randomly in a cell with trace-based fading.
    Fading,
    /// Two slow terminals moving randomly, as for a VoIP call.
    Voip,
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Preset::OneCell => "one-cell",
            Preset::FourCell => "four-cell",
            Preset::SinrDistance => "sinr-distance",
            Preset::Urban => "urban",
            Preset::Fading => "fading",
            Preset::Voip => "voip",
        };
        f.write_str(s)
    }
}

impl Preset {
    /// Generate the configuration of the predefined scenario.
    pub fn config(&self) -> ScenarioConfig {
        let name = self.to_string();
        match self {
            Preset::OneCell => ScenarioConfig {
                name,
                seed: 0,
                horizon: 15.0,
                cells: vec![CellConfig {
                    center: Vector::new(0.0, 0.0, 30.0),
                    radius: 500.0,
                    static_ues: StaticConfig {
                        count: 4,
                        ..Default::default()
                    },
                    mobile_ues: MobileConfig {
                        count: 2,
                        start: StartPoint::Offset {
                            dx: 0.0,
                            dy: 0.0,
                            height: 0.0,
                        },
                        waypoints: WaypointConfig::Annulus {
                            min_fraction: 0.98,
                            max_fraction: 1.0,
                            height: 0.0,
                        },
                        speed: RandomVariable::constant(16.67),
                        pause: RandomVariable::constant(0.0),
                    },
                }],
                report_static: false,
                measurement_path: None,
                progress_interval: None,
                gnuplot: false,
                fading: Some(FadingConfig::new("fading_trace_EVA_60kmph.fad")),
            },
            Preset::FourCell => {
                let r = 500.0;
                let centers = [
                    Vector::new(-1.5 * r, 0.0, 10.0),
                    Vector::new(0.0, 0.866 * r, 10.0),
                    Vector::new(0.0, -0.866 * r, 10.0),
                    Vector::new(1.5 * r, 0.0, 10.0),
                ];
                ScenarioConfig {
                    name,
                    seed: 0,
                    horizon: 3.0,
                    cells: centers
                        .into_iter()
                        .map(|center| CellConfig {
                            center,
                            radius: r,
                            static_ues: StaticConfig {
                                count: 2,
                                radius_fraction: 0.866,
                                height: HANDSET_HEIGHT,
                            },
                            mobile_ues: MobileConfig {
                                count: 2,
                                start: StartPoint::Offset {
                                    dx: 50.0,
                                    dy: 50.0,
                                    height: HANDSET_HEIGHT,
                                },
                                waypoints: WaypointConfig::Annulus {
                                    min_fraction: 0.8,
                                    max_fraction: 0.866,
                                    height: HANDSET_HEIGHT,
                                },
                                speed: RandomVariable::constant(33.36),
                                pause: RandomVariable::constant(0.5),
                            },
                        })
                        .collect(),
                    report_static: false,
                    measurement_path: None,
                    progress_interval: None,
                    gnuplot: false,
                    fading: None,
                }
            }
            Preset::SinrDistance => ScenarioConfig {
                name,
                seed: 0,
                horizon: 60.0,
                cells: vec![CellConfig {
                    center: Vector::new(0.0, 0.0, 30.0),
                    radius: 1000.0,
                    static_ues: StaticConfig::default(),
                    mobile_ues: MobileConfig {
                        count: 2,
                        start: StartPoint::Points(vec![
                            Vector::new(100.0, 0.0, 1.0),
                            Vector::new(0.0, 100.0, 1.0),
                        ]),
                        waypoints: WaypointConfig::Points(vec![
                            Vector::new(1000.0, 0.0, 1.0),
                            Vector::new(0.0, 1000.0, 1.0),
                        ]),
                        speed: RandomVariable::constant(16.67),
                        pause: RandomVariable::constant(0.5),
                    },
                }],
                report_static: false,
                measurement_path: Some(MEASUREMENT_PATH.to_string()),
                progress_interval: None,
                gnuplot: false,
                fading: Some(FadingConfig::new("fading_trace_EVA_60kmph.fad")),
            },
            Preset::Urban => ScenarioConfig {
                name,
                seed: 0,
                horizon: 20.0,
                cells: vec![CellConfig {
                    center: Vector::new(1500.0, 1500.0, 30.0),
                    radius: 1500.0,
                    static_ues: StaticConfig::default(),
                    mobile_ues: MobileConfig {
                        count: 10,
                        start: StartPoint::Offset {
                            dx: 0.0,
                            dy: 0.0,
                            height: HANDSET_HEIGHT,
                        },
                        waypoints: WaypointConfig::Annulus {
                            min_fraction: 0.0,
                            max_fraction: 1.0,
                            height: 0.0,
                        },
                        speed: RandomVariable::constant(16.67),
                        pause: RandomVariable::constant(0.5),
                    },
                }],
                report_static: false,
                measurement_path: None,
                progress_interval: Some(0.25),
                gnuplot: false,
                fading: Some(FadingConfig::new("fading_trace_EVA_60kmph.fad")),
            },
            Preset::Fading | Preset::Voip => {
                let (speed, horizon, fading) = if *self == Preset::Fading {
                    (8.3, 5.0, Some(FadingConfig::new("fading_trace_ETU_3kmph.fad")))
                } else {
                    (0.9, 20.0, None)
                };
                let (min_fraction, max_fraction, height) = (0.0, 1.0, 0.0);
                ScenarioConfig {
                    name,
                    seed: 0,
                    horizon,
                    cells: vec![CellConfig {
                        center: Vector::new(0.0, 0.0, 30.0),
                        radius: 1000.0,
                        static_ues: StaticConfig::default(),
                        mobile_ues: MobileConfig {
                            count: 2,
                            start: StartPoint::Annulus {
                                min_fraction,
                                max_fraction,
                                height,
                            },
                            waypoints: WaypointConfig::Annulus {
                                min_fraction,
                                max_fraction,
                                height,
                            },
                            speed: RandomVariable::constant(speed),
                            pause: RandomVariable::constant(0.5),
                        },
                    }],
                    report_static: false,
                    measurement_path: Some(MEASUREMENT_PATH.to_string()),
                    progress_interval: None,
                    gnuplot: *self == Preset::Fading,
                    fading,
                }
            }
        }
    }
}
