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

//! Test the placement of terminals

use crate::placement::{
    place_mobile_seed, place_static, Cell, ConfigError, WaypointSampler, HANDSET_HEIGHT,
};
use cellsim::{
    mobility::PositionAllocator,
    types::{CellId, Vector},
};

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rand::prelude::*;
use test_log::test;

#[test]
fn static_positions_within_radius() {
    let mut rng = StdRng::seed_from_u64(1);
    let center = Vector::new(-750.0, 20.0, 10.0);
    let positions = place_static(center, 433.0, 1000, HANDSET_HEIGHT, &mut rng).unwrap();
    assert_eq!(positions.len(), 1000);
    for p in positions {
        assert!(p.distance_xy(&center) <= 433.0, "{p} is outside of the disc");
        assert_eq!(p.z, HANDSET_HEIGHT);
    }
}

#[test]
fn static_positions_single_cell() {
    let mut rng = StdRng::seed_from_u64(0);
    let cell = Cell::new(CellId(1), Vector::new(0.0, 0.0, 30.0), 500.0).unwrap();
    let positions = place_static(cell.center, cell.radius, 4, 1.5, &mut rng).unwrap();
    assert_eq!(positions.len(), 4);
    for p in positions.iter() {
        assert!(p.distance_xy(&Vector::new(0.0, 0.0, 0.0)) <= 500.0);
        assert!(cell.contains_xy(p));
        assert_eq!(p.z, 1.5);
    }
}

#[test]
fn static_positions_cover_the_disc() {
    // half of the points should lie within radius / sqrt(2)
    let mut rng = StdRng::seed_from_u64(3);
    let center = Vector::default();
    let positions = place_static(center, 100.0, 10000, 0.0, &mut rng).unwrap();
    let inner = positions
        .iter()
        .filter(|p| p.distance_xy(&center) <= 100.0 / 2f64.sqrt())
        .count();
    assert_abs_diff_eq!(inner as f64 / 10000.0, 0.5, epsilon = 0.03);
}

#[test]
fn placement_is_deterministic() {
    let center = Vector::new(0.0, 0.0, 30.0);
    let a = place_static(center, 500.0, 10, 1.5, &mut StdRng::seed_from_u64(7)).unwrap();
    let b = place_static(center, 500.0, 10, 1.5, &mut StdRng::seed_from_u64(7)).unwrap();
    let c = place_static(center, 500.0, 10, 1.5, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let s = WaypointSampler::new(center, 0.5, 1.0, 500.0).unwrap();
    let a: Vec<Vector> = s.sample_iter(StdRng::seed_from_u64(7)).take(10).collect();
    let b: Vec<Vector> = s.sample_iter(StdRng::seed_from_u64(7)).take(10).collect();
    assert_eq!(a, b);
}

#[test]
fn static_placement_rejects_invalid_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let c = Vector::default();
    assert_eq!(
        place_static(c, 0.0, 4, 1.5, &mut rng),
        Err(ConfigError::InvalidRadius(0.0))
    );
    assert_eq!(
        place_static(c, -10.0, 4, 1.5, &mut rng),
        Err(ConfigError::InvalidRadius(-10.0))
    );
    assert!(matches!(
        place_static(c, f64::INFINITY, 4, 1.5, &mut rng),
        Err(ConfigError::InvalidRadius(_))
    ));
    assert_eq!(
        place_static(c, 10.0, 0, 1.5, &mut rng),
        Err(ConfigError::EmptyPopulation)
    );
    assert!(Cell::new(CellId(1), c, 0.0).is_err());
}

#[test]
fn mobile_seed() {
    let center = Vector::new(100.0, 200.0, 30.0);
    let seeds = place_mobile_seed(center, 3, 1.5).unwrap();
    assert_eq!(seeds, vec![Vector::new(100.0, 200.0, 1.5); 3]);
    assert_eq!(
        place_mobile_seed(center, 0, 1.5),
        Err(ConfigError::EmptyPopulation)
    );
    assert_eq!(
        place_mobile_seed(center, 1, f64::NAN),
        Err(ConfigError::NotFinite("height"))
    );
}

#[test]
fn waypoints_within_annulus() {
    let mut rng = StdRng::seed_from_u64(2);
    let center = Vector::new(10.0, 20.0, 1.5);
    let mut sampler = WaypointSampler::new(center, 0.8, 0.866, 500.0).unwrap();
    let (min, max) = sampler.radius_range();
    assert_abs_diff_eq!(min, 400.0, epsilon = 1e-9);
    assert_abs_diff_eq!(max, 433.0, epsilon = 1e-9);
    for _ in 0..1000 {
        let w = sampler.next_position(&mut rng);
        let d = w.distance_to(&center);
        assert!((min - 1e-9..=max + 1e-9).contains(&d), "{w} at distance {d}");
        assert_eq!(w.z, 1.5);
    }
}

#[test]
fn waypoints_on_circle() {
    let mut rng = StdRng::seed_from_u64(2);
    let center = Vector::default();
    let sampler = WaypointSampler::new(center, 1.0, 1.0, 250.0).unwrap();
    for _ in 0..100 {
        let w: Vector = sampler.sample(&mut rng);
        assert_abs_diff_eq!(w.norm(), 250.0, epsilon = 1e-9);
    }
}

#[test]
fn waypoints_are_isotropic() {
    let mut rng = StdRng::seed_from_u64(5);
    let sampler = WaypointSampler::new(Vector::default(), 0.0, 1.0, 1.0).unwrap();
    let n = 10000;
    let right = (0..n)
        .map(|_| sampler.sample(&mut rng))
        .filter(|w: &Vector| w.x > 0.0)
        .count();
    assert_abs_diff_eq!(right as f64 / n as f64, 0.5, epsilon = 0.03);
}

#[test]
fn waypoint_sampler_rejects_invalid_input() {
    let c = Vector::default();
    assert_eq!(
        WaypointSampler::new(c, 0.9, 0.8, 500.0),
        Err(ConfigError::InvalidFractions { min: 0.9, max: 0.8 })
    );
    assert_eq!(
        WaypointSampler::new(c, -0.1, 0.8, 500.0),
        Err(ConfigError::InvalidFractions {
            min: -0.1,
            max: 0.8
        })
    );
    assert_eq!(
        WaypointSampler::new(c, 0.0, 1.0, 0.0),
        Err(ConfigError::InvalidRadius(0.0))
    );
}
