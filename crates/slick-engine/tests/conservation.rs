//! Integration tests: mass accounting over whole runs.

use std::sync::Arc;

use proptest::prelude::*;
use slick_core::Vec2;
use slick_engine::{InitialCondition, SimulationConfig, SimulationEngine};
use slick_schemes::{DiffusionField, VelocityField};
use slick_test_utils::fixtures;

fn bay_engine(
    mesh: slick_mesh::Mesh,
    diffusion: f64,
    initial: Vec<f64>,
    t_end: f64,
) -> SimulationEngine {
    let config = SimulationConfig::new(
        t_end,
        VelocityField::bay_circulation(),
        DiffusionField::Uniform {
            coefficient: diffusion,
        },
    );
    let mut engine = SimulationEngine::new(Arc::new(mesh), config);
    engine
        .initialize(InitialCondition::PerCell { values: initial })
        .unwrap();
    engine
}

#[test]
fn no_transport_leaves_quantities_unchanged() {
    let mesh = fixtures::perturbed_tri_grid(6, 6, 0.15);
    let initial = fixtures::gaussian(&mesh, Vec2::new(0.35, 0.45), 1.0, 0.01);
    let config = SimulationConfig::new(
        2.0,
        VelocityField::still(),
        DiffusionField::none(),
    )
    .with_num_steps(20);
    let mut engine = SimulationEngine::new(Arc::new(mesh), config);
    engine
        .initialize(InitialCondition::PerCell {
            values: initial.clone(),
        })
        .unwrap();
    engine.run().unwrap();

    assert_eq!(engine.quantities(), initial.as_slice());
    for snap in engine.results().snapshots() {
        assert_eq!(snap.quantities, initial);
    }
}

#[test]
fn closed_bay_spreads_slick_without_losing_mass() {
    let mesh = fixtures::tri_grid(12, 12);
    let initial = fixtures::gaussian(&mesh, Vec2::new(0.35, 0.45), 1.0, 0.01);
    let mut engine = bay_engine(mesh, 0.001, initial, 0.2);
    let start = engine.total_mass();
    let peak_before = engine.quantities().iter().cloned().fold(0.0, f64::max);

    engine.run().unwrap();

    let m = engine.last_metrics();
    let drift = engine.total_mass() - start - m.cumulative_clamped_mass;
    assert!(drift.abs() < 1e-12 * start.max(1.0), "drift {drift}");
    assert_eq!(m.cumulative_open_sea_outflow, 0.0);
    let peak_after = engine.quantities().iter().cloned().fold(0.0, f64::max);
    assert!(peak_after < peak_before);
}

#[test]
fn open_sea_loss_matches_mass_drop() {
    let mesh = fixtures::open_tri_grid(8, 8);
    let initial = fixtures::gaussian(&mesh, Vec2::new(0.35, 0.45), 1.0, 0.05);
    let mut engine = bay_engine(mesh, 0.01, initial, 0.5);
    let start = engine.total_mass();

    engine.run().unwrap();

    let m = engine.last_metrics();
    assert!(m.cumulative_open_sea_outflow > 0.0);
    let balance = engine.total_mass() + m.cumulative_open_sea_outflow - m.cumulative_clamped_mass;
    assert!((balance - start).abs() < 1e-10, "balance {balance} vs {start}");
    assert!(engine.total_mass() < start);
}

#[test]
fn identical_runs_are_bitwise_equal() {
    let run = || {
        let mesh = fixtures::perturbed_tri_grid(7, 5, 0.2);
        let initial = fixtures::gaussian(&mesh, Vec2::new(0.5, 0.5), 2.0, 0.02);
        let mut engine = bay_engine(mesh, 0.005, initial, 0.3);
        engine.run().unwrap();
        engine.into_results().into_snapshots()
    };
    assert_eq!(run(), run());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn quantities_stay_non_negative(
        values in prop::collection::vec(0.0f64..10.0, 50),
        diffusion in 0.0f64..0.01,
    ) {
        // 5 × 5 quads split in two: 50 cells.
        let mesh = fixtures::tri_grid(5, 5);
        let mut engine = bay_engine(mesh, diffusion, values, 0.2);
        for _ in 0..10 {
            engine.step().unwrap();
            prop_assert!(engine.quantities().iter().all(|q| *q >= 0.0 && q.is_finite()));
        }
    }

    #[test]
    fn coast_only_mass_never_increases(
        values in prop::collection::vec(0.0f64..5.0, 50),
        diffusion in 0.0f64..0.02,
    ) {
        let mesh = fixtures::tri_grid(5, 5);
        let mut engine = bay_engine(mesh, diffusion, values, 0.2);
        let mut previous = engine.total_mass();
        for _ in 0..10 {
            let clamped = engine.step().unwrap().clamped_mass;
            let mass = engine.total_mass();
            prop_assert!(
                mass <= previous + clamped + 1e-12 * previous.max(1.0),
                "mass rose from {} to {} (clamped {})", previous, mass, clamped
            );
            previous = mass;
        }
    }
}
