//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests, integration tests and benches so each builds replicas the same way.

use bevy_ecs::prelude::World;

use crate::entities::{Customer, CustomerId, ServerClass};
use crate::generator::{CustomerGenerator, GeneratorConfig};
use crate::registry::Registry;
use crate::runner::{finalize_replica, initialize_simulation, run_until_horizon, simulation_schedule};
use crate::scenario::{build_replica, ReplicaParams, ServerSpec};
use crate::telemetry::ReplicaMetrics;

/// Seed used across test files for consistency.
pub const TEST_SEED: u64 = 42;

/// Scan time per item used by most tests, in minutes.
pub const TEST_SCAN: f64 = 0.05;

/// Registry with `n` standard counters and a generator seeded with [TEST_SEED].
pub fn standard_registry(n: usize) -> Registry {
    let mut registry = Registry::new(CustomerGenerator::from_seed(
        TEST_SEED,
        GeneratorConfig::default(),
    ));
    for _ in 0..n {
        registry.add_server(ServerClass::Standard, TEST_SCAN, None);
    }
    registry
}

/// Customer with a fixed basket and overhead, arriving at `arrival`.
pub fn test_customer(id: u64, items: u32, overhead: f64, arrival: f64) -> Customer {
    Customer::new(CustomerId(id), items, overhead).arriving_at(arrival)
}

/// World with a replica built but no arrival scheduled yet.
pub fn create_test_world(layout: &[ServerSpec], params: &ReplicaParams) -> World {
    let mut world = World::new();
    build_replica(&mut world, layout, params, TEST_SEED);
    world
}

/// Builds, runs and finalizes a replica with an explicit step cap.
pub fn run_to_completion(
    layout: &[ServerSpec],
    params: &ReplicaParams,
    seed: u64,
    max_steps: usize,
) -> (World, ReplicaMetrics) {
    let mut world = World::new();
    build_replica(&mut world, layout, params, seed);
    initialize_simulation(&mut world);
    let mut schedule = simulation_schedule();
    run_until_horizon(&mut world, &mut schedule, max_steps);
    let metrics = finalize_replica(&mut world);
    (world, metrics)
}
