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

//! Typed random variables used to parametrize mobility models.
//!
//! A [`RandomVariable`] is the serializable description of a distribution. Before sampling, it
//! must be turned into a [`Sampler`] with [`RandomVariable::build`], which checks all parameters
//! exactly once.

use rand::prelude::*;
use rand_distr::{Beta, Distribution, Exp, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::types::SimError;

/// Description of a random variable.
///
/// ```
/// use cellsim::random::RandomVariable;
/// use rand::prelude::*;
///
/// # fn main() -> Result<(), cellsim::types::SimError> {
/// let speed = RandomVariable::Uniform { min: 10.0, max: 20.0 }.build()?;
/// let mut rng = StdRng::seed_from_u64(42);
/// let v: f64 = speed.sample(&mut rng);
/// assert!((10.0..20.0).contains(&v));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RandomVariable {
    /// Always returns `value`.
    Constant {
        /// The constant
        value: f64,
    },
    /// Uniform in `[min, max)`.
    Uniform {
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (exclusive)
        max: f64,
    },
    /// Exponential distribution with the given mean.
    Exponential {
        /// Mean value
        mean: f64,
    },
    /// Normal distribution.
    Normal {
        /// Mean value
        mean: f64,
        /// Standard deviation
        std_dev: f64,
    },
    /// `offset + scale * Beta(alpha, beta)`
    Beta {
        /// Alpha parameter
        alpha: f64,
        /// Beta parameter
        beta: f64,
        /// Offset
        offset: f64,
        /// Scale factor
        scale: f64,
    },
}

impl RandomVariable {
    /// Create a constant random variable
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    /// Check the parameters and create the sampler.
    pub fn build(&self) -> Result<Sampler, SimError> {
        let err = |msg: &str| SimError::InvalidDistribution(format!("{msg} in {self:?}"));
        match *self {
            RandomVariable::Constant { value } if value.is_finite() => Ok(Sampler::Constant(value)),
            RandomVariable::Constant { .. } => Err(err("non-finite constant")),
            RandomVariable::Uniform { min, max } if !(min.is_finite() && max.is_finite()) => {
                Err(err("non-finite bounds"))
            }
            RandomVariable::Uniform { min, max } if min > max => Err(err("min is larger than max")),
            RandomVariable::Uniform { min, max } if min == max => Ok(Sampler::Constant(min)),
            RandomVariable::Uniform { min, max } => Ok(Sampler::Uniform(Uniform::new(min, max))),
            RandomVariable::Exponential { mean } if mean.is_finite() && mean > 0.0 => {
                Exp::new(1.0 / mean)
                    .map(Sampler::Exponential)
                    .map_err(|e| err(&e.to_string()))
            }
            RandomVariable::Exponential { .. } => Err(err("mean must be positive")),
            RandomVariable::Normal { mean, std_dev } if mean.is_finite() => {
                Normal::new(mean, std_dev)
                    .map(Sampler::Normal)
                    .map_err(|e| err(&e.to_string()))
            }
            RandomVariable::Normal { .. } => Err(err("non-finite mean")),
            RandomVariable::Beta {
                alpha,
                beta,
                offset,
                scale,
            } if offset.is_finite() && scale.is_finite() => Beta::new(alpha, beta)
                .map(|dist| Sampler::Beta {
                    dist,
                    offset,
                    scale,
                })
                .map_err(|e| err(&e.to_string())),
            RandomVariable::Beta { .. } => Err(err("non-finite offset or scale")),
        }
    }
}

/// A checked random variable, ready to be sampled.
#[derive(Debug, Clone)]
pub enum Sampler {
    /// Constant value
    Constant(f64),
    /// Uniform distribution
    Uniform(Uniform<f64>),
    /// Exponential distribution
    Exponential(Exp<f64>),
    /// Normal distribution
    Normal(Normal<f64>),
    /// Scaled and shifted beta distribution
    Beta {
        /// Distribution
        dist: Beta<f64>,
        /// Offset
        offset: f64,
        /// Scale factor
        scale: f64,
    },
}

impl Distribution<f64> for Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Constant(x) => *x,
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Exponential(d) => d.sample(rng),
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Beta {
                dist,
                offset,
                scale,
            } => dist.sample(rng) * scale + offset,
        }
    }
}
