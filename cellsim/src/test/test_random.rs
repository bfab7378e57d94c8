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

//! Test the random variables

use crate::{
    random::{RandomVariable, Sampler},
    types::SimError,
};

use approx::assert_abs_diff_eq;
use rand::prelude::*;
use test_log::test;

fn mean(s: &Sampler, n: usize) -> f64 {
    let mut rng = StdRng::seed_from_u64(1);
    (0..n).map(|_| s.sample(&mut rng)).sum::<f64>() / n as f64
}

#[test]
fn constant() {
    let s = RandomVariable::constant(16.67).build().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..10 {
        assert_eq!(s.sample(&mut rng), 16.67);
    }
}

#[test]
fn uniform_bounds() {
    let s = RandomVariable::Uniform { min: 2.0, max: 3.0 }.build().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..1000 {
        let x = s.sample(&mut rng);
        assert!((2.0..3.0).contains(&x));
    }
    assert_abs_diff_eq!(mean(&s, 10000), 2.5, epsilon = 0.05);
}

#[test]
fn degenerate_uniform_is_constant() {
    let s = RandomVariable::Uniform { min: 0.5, max: 0.5 }.build().unwrap();
    assert!(matches!(s, Sampler::Constant(x) if x == 0.5));
}

#[test]
fn exponential_mean() {
    let s = RandomVariable::Exponential { mean: 4.0 }.build().unwrap();
    assert_abs_diff_eq!(mean(&s, 20000), 4.0, epsilon = 0.2);
}

#[test]
fn beta_range() {
    let s = RandomVariable::Beta {
        alpha: 2.0,
        beta: 5.0,
        offset: 1.0,
        scale: 2.0,
    }
    .build()
    .unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..1000 {
        let x = s.sample(&mut rng);
        assert!((1.0..=3.0).contains(&x));
    }
}

#[test]
fn invalid_parameters() {
    let invalid = [
        RandomVariable::constant(f64::NAN),
        RandomVariable::Uniform { min: 3.0, max: 1.0 },
        RandomVariable::Uniform {
            min: 0.0,
            max: f64::INFINITY,
        },
        RandomVariable::Exponential { mean: 0.0 },
        RandomVariable::Normal {
            mean: 0.0,
            std_dev: -1.0,
        },
        RandomVariable::Beta {
            alpha: -1.0,
            beta: 1.0,
            offset: 0.0,
            scale: 1.0,
        },
    ];
    for rv in invalid {
        assert!(
            matches!(rv.build(), Err(SimError::InvalidDistribution(_))),
            "{rv:?} should be invalid"
        );
    }
}

#[test]
fn deserialize() {
    let rv: RandomVariable =
        serde_json::from_str(r#"{"kind": "uniform", "min": 0.0, "max": 1.0}"#).unwrap();
    assert_eq!(rv, RandomVariable::Uniform { min: 0.0, max: 1.0 });
    let rv: RandomVariable = serde_json::from_str(r#"{"kind": "constant", "value": 0.5}"#).unwrap();
    assert_eq!(rv, RandomVariable::constant(0.5));
}
