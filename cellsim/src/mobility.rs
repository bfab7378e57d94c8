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

//! Mobility models that own the position and velocity of every node.
//!
//! A mobility model is installed once at setup, and is then only queried for the position and
//! velocity at a given time. Models that move advance their internal state lazily up to the time
//! of the query, so queries must happen with non-decreasing time, as they do when they are issued
//! from simulation callbacks.

use rand::prelude::*;
use rand_distr::Distribution;

use crate::{random::Sampler, types::Vector};

/// Source of positions, used both for initial positions and for waypoint targets.
pub trait PositionAllocator: std::fmt::Debug {
    /// Draw the next position.
    fn next_position(&mut self, rng: &mut dyn RngCore) -> Vector;
}

/// Position allocator that cycles through a fixed list of positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPositionAllocator {
    positions: Vec<Vector>,
    next: usize,
}

impl ListPositionAllocator {
    /// Create a new allocator, returning `None` if `positions` is empty. The first call to
    /// `next_position` returns `positions[offset % positions.len()]`.
    pub fn new(positions: Vec<Vector>, offset: usize) -> Option<Self> {
        if positions.is_empty() {
            None
        } else {
            let next = offset % positions.len();
            Some(Self { positions, next })
        }
    }
}

impl PositionAllocator for ListPositionAllocator {
    fn next_position(&mut self, _: &mut dyn RngCore) -> Vector {
        let pos = self.positions[self.next];
        self.next = (self.next + 1) % self.positions.len();
        pos
    }
}

/// A change of course of a moving node, i.e., the start of a new leg or pause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseChange {
    /// Time of the change
    pub time: f64,
    /// Position at which the course changed
    pub position: Vector,
    /// New velocity
    pub velocity: Vector,
}

/// Interface of a mobility model.
pub trait MobilityModel: std::fmt::Debug {
    /// Position at time `time`.
    fn position(&mut self, time: f64) -> Vector;

    /// Velocity at time `time`.
    fn velocity(&mut self, time: f64) -> Vector;

    /// Take all course changes that happened since the last call.
    fn take_course_changes(&mut self) -> Vec<CourseChange> {
        Vec::new()
    }
}

/// A node that never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPosition(pub Vector);

impl MobilityModel for ConstantPosition {
    fn position(&mut self, _: f64) -> Vector {
        self.0
    }

    fn velocity(&mut self, _: f64) -> Vector {
        Vector::default()
    }
}

/// Upper bound on consecutive legs without any duration. Reaching it means that the node can never
/// make progress in time, so it is parked.
const MAX_EMPTY_LEGS: usize = 1000;

/// The state of a random-waypoint node.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    /// Standing still at `at` until `until`.
    Paused { at: Vector, until: f64 },
    /// Travelling from `from` to `to`, starting at `start` and arriving at `arrive`.
    Moving {
        from: Vector,
        to: Vector,
        start: f64,
        arrive: f64,
    },
}

impl Leg {
    fn end(&self) -> f64 {
        match self {
            Leg::Paused { until, .. } => *until,
            Leg::Moving { arrive, .. } => *arrive,
        }
    }
}

/// Random waypoint mobility. The node pauses, picks a target from its waypoint allocator and a
/// speed from its speed distribution, travels there in a straight line, pauses again, and so on.
#[derive(Debug)]
pub struct RandomWaypoint {
    rng: StdRng,
    waypoints: Box<dyn PositionAllocator>,
    speed: Sampler,
    pause: Sampler,
    leg: Leg,
    course_changes: Vec<CourseChange>,
}

impl RandomWaypoint {
    /// Create a new random waypoint model starting at `initial` at time zero. The model owns its
    /// random source, which is seeded with `seed`.
    pub fn new(
        initial: Vector,
        waypoints: Box<dyn PositionAllocator>,
        speed: Sampler,
        pause: Sampler,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let until = sanitize_pause(pause.sample(&mut rng));
        Self {
            rng,
            waypoints,
            speed,
            pause,
            leg: Leg::Paused { at: initial, until },
            course_changes: vec![CourseChange {
                time: 0.0,
                position: initial,
                velocity: Vector::default(),
            }],
        }
    }

    /// Advance the state until the current leg contains `time`.
    fn advance(&mut self, time: f64) {
        let mut empty_legs = 0;
        while time > self.leg.end() {
            let start = self.leg.end();
            let next = match self.leg {
                Leg::Paused { at, .. } => {
                    let to = self.waypoints.next_position(&mut self.rng);
                    let speed = self.speed.sample(&mut self.rng);
                    if !(speed.is_finite() && speed > 0.0) {
                        log::warn!("Invalid speed sample {speed}. Parking the node at {at}");
                        Leg::Paused {
                            at,
                            until: f64::INFINITY,
                        }
                    } else {
                        Leg::Moving {
                            from: at,
                            to,
                            start,
                            arrive: start + at.distance_to(&to) / speed,
                        }
                    }
                }
                Leg::Moving { to, .. } => Leg::Paused {
                    at: to,
                    until: start + sanitize_pause(self.pause.sample(&mut self.rng)),
                },
            };

            if next.end() > start {
                empty_legs = 0;
            } else {
                empty_legs += 1;
            }
            self.leg = next;
            self.course_changes.push(CourseChange {
                time: start,
                position: self.current_position(start),
                velocity: self.current_velocity(),
            });

            if empty_legs >= MAX_EMPTY_LEGS {
                let at = self.current_position(start);
                log::warn!("Node cannot advance in time. Parking it at {at}");
                self.leg = Leg::Paused {
                    at,
                    until: f64::INFINITY,
                };
            }
        }
    }

    fn current_position(&self, time: f64) -> Vector {
        match self.leg {
            Leg::Paused { at, .. } => at,
            Leg::Moving {
                from,
                to,
                start,
                arrive,
            } => {
                if arrive <= start {
                    to
                } else {
                    let frac = ((time - start) / (arrive - start)).clamp(0.0, 1.0);
                    from + (to - from) * frac
                }
            }
        }
    }

    fn current_velocity(&self) -> Vector {
        match self.leg {
            Leg::Paused { .. } => Vector::default(),
            Leg::Moving {
                from,
                to,
                start,
                arrive,
            } => {
                if arrive <= start {
                    Vector::default()
                } else {
                    (to - from) * (1.0 / (arrive - start))
                }
            }
        }
    }
}

/// Negative or non-finite pause times are treated as no pause at all.
fn sanitize_pause(pause: f64) -> f64 {
    if pause.is_finite() && pause > 0.0 {
        pause
    } else {
        0.0
    }
}

impl MobilityModel for RandomWaypoint {
    fn position(&mut self, time: f64) -> Vector {
        self.advance(time);
        self.current_position(time)
    }

    fn velocity(&mut self, time: f64) -> Vector {
        self.advance(time);
        self.current_velocity()
    }

    fn take_course_changes(&mut self) -> Vec<CourseChange> {
        std::mem::take(&mut self.course_changes)
    }
}
