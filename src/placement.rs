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

//! Cell geometry, and sampling of initial positions and waypoint targets.
//!
//! All functions in this module are pure given the random source: calling them twice with
//! identically seeded generators yields identical positions.

use std::f64::consts::TAU;

use cellsim::{
    mobility::PositionAllocator,
    types::{CellId, SimError, Vector},
};
use rand::prelude::*;
use rand_distr::Distribution;
use thiserror::Error;

/// Height of a handset above ground, in meters.
pub const HANDSET_HEIGHT: f64 = 1.5;

/// Error thrown when a scenario is configured with invalid parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The radius of a cell or disc must be finite and strictly positive.
    #[error("Radius must be positive and finite, but it is {0}")]
    InvalidRadius(f64),
    /// A population of terminals must not be empty.
    #[error("Cannot place an empty population of terminals")]
    EmptyPopulation,
    /// The radius fractions of an annulus are invalid.
    #[error("Invalid radius fractions: min = {min}, max = {max}")]
    InvalidFractions {
        /// Lower fraction
        min: f64,
        /// Upper fraction
        max: f64,
    },
    /// A coordinate or height is not finite.
    #[error("{0} is not finite")]
    NotFinite(&'static str),
    /// The simulation horizon is invalid.
    #[error("Horizon must be finite and not negative, but it is {0}")]
    InvalidHorizon(f64),
    /// A list of points is empty.
    #[error("The list of {0} is empty")]
    EmptyList(&'static str),
    /// The scenario has no cell.
    #[error("The scenario has no cell")]
    NoCells,
    /// The scenario has more cells than there are cell ids.
    #[error("Too many cells: {0}")]
    TooManyCells(usize),
    /// Too many terminals are attached to a single cell.
    #[error("Too many terminals in {0}")]
    TooManyTerminals(CellId),
    /// A terminal or waypoint would lie outside of its cell.
    #[error("The {what} lies {distance}m from the eNodeB, outside of the cell radius {radius}m")]
    OutsideCell {
        /// What is misplaced
        what: &'static str,
        /// Horizontal distance to the eNodeB
        distance: f64,
        /// Radius of the cell
        radius: f64,
    },
    /// The scenario would schedule more events than the simulator can hold.
    #[error("Too many {what}: {count}")]
    TooManyEvents {
        /// Kind of events
        what: &'static str,
        /// Number of events that would be scheduled
        count: f64,
    },
    /// A random variable is invalid.
    #[error("{0}")]
    Distribution(#[from] SimError),
}

fn check_finite(v: &Vector, what: &'static str) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite(what))
    }
}

fn check_radius(radius: f64) -> Result<(), ConfigError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRadius(radius))
    }
}

/// Coverage area of a single eNodeB, modeled as a disc around the eNodeB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Cell identifier
    pub id: CellId,
    /// Position of the eNodeB
    pub center: Vector,
    /// Radius of the cell in meters
    pub radius: f64,
}

impl Cell {
    /// Create a new cell, checking that the radius is positive and the center is finite.
    pub fn new(id: CellId, center: Vector, radius: f64) -> Result<Self, ConfigError> {
        check_radius(radius)?;
        check_finite(&center, "cell center")?;
        Ok(Self { id, center, radius })
    }

    /// Check if `pos`, projected to the ground plane, lies within the cell.
    pub fn contains_xy(&self, pos: &Vector) -> bool {
        pos.distance_xy(&self.center) <= self.radius
    }
}

/// Draw `count` positions uniformly distributed inside the disc of `radius` around `center`. All
/// positions are placed at `height` above ground.
pub fn place_static<R: Rng + ?Sized>(
    center: Vector,
    radius: f64,
    count: usize,
    height: f64,
    rng: &mut R,
) -> Result<Vec<Vector>, ConfigError> {
    check_radius(radius)?;
    check_finite(&center, "center")?;
    if !height.is_finite() {
        return Err(ConfigError::NotFinite("height"));
    }
    if count == 0 {
        return Err(ConfigError::EmptyPopulation);
    }

    Ok((0..count)
        .map(|_| {
            // sqrt keeps the density uniform over the area of the disc.
            let r = radius * rng.gen::<f64>().sqrt();
            let theta = rng.gen_range(0.0..TAU);
            Vector::new(
                center.x + r * theta.cos(),
                center.y + r * theta.sin(),
                height,
            )
        })
        .collect())
}

/// Return `count` copies of the starting point above `center` at `height`.
pub fn place_mobile_seed(
    center: Vector,
    count: usize,
    height: f64,
) -> Result<Vec<Vector>, ConfigError> {
    check_finite(&center, "center")?;
    if !height.is_finite() {
        return Err(ConfigError::NotFinite("height"));
    }
    if count == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    Ok(vec![Vector::new(center.x, center.y, height); count])
}

/// Sampler of points in an annulus around a center. The distance to the center is drawn
/// uniformly from `[min_radius, max_radius]`, and the angle uniformly from `[0, 2π)`. The sampled
/// points have the same height as the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointSampler {
    center: Vector,
    min_radius: f64,
    max_radius: f64,
}

impl WaypointSampler {
    /// Create a sampler for the annulus between `min_fraction * cell_radius` and
    /// `max_fraction * cell_radius` around `center`.
    pub fn new(
        center: Vector,
        min_fraction: f64,
        max_fraction: f64,
        cell_radius: f64,
    ) -> Result<Self, ConfigError> {
        check_radius(cell_radius)?;
        check_finite(&center, "center")?;
        if !(min_fraction.is_finite()
            && max_fraction.is_finite()
            && 0.0 <= min_fraction
            && min_fraction <= max_fraction)
        {
            return Err(ConfigError::InvalidFractions {
                min: min_fraction,
                max: max_fraction,
            });
        }
        Ok(Self {
            center,
            min_radius: min_fraction * cell_radius,
            max_radius: max_fraction * cell_radius,
        })
    }

    /// The center of the annulus
    pub fn center(&self) -> Vector {
        self.center
    }

    /// Inner and outer radius of the annulus
    pub fn radius_range(&self) -> (f64, f64) {
        (self.min_radius, self.max_radius)
    }
}

impl Distribution<Vector> for WaypointSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector {
        let r = if self.min_radius < self.max_radius {
            rng.gen_range(self.min_radius..=self.max_radius)
        } else {
            self.min_radius
        };
        let theta = rng.gen_range(0.0..TAU);
        Vector::new(
            self.center.x + r * theta.cos(),
            self.center.y + r * theta.sin(),
            self.center.z,
        )
    }
}

impl PositionAllocator for WaypointSampler {
    fn next_position(&mut self, rng: &mut dyn RngCore) -> Vector {
        self.sample(rng)
    }
}
