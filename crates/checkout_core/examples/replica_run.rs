//! Run one replica per counter count and print what happened at each counter.
//!
//! Run with: cargo run -p checkout_core --example replica_run

use bevy_ecs::prelude::World;
use checkout_core::registry::Registry;
use checkout_core::runner::{finalize_replica, initialize_simulation, run_until_horizon, simulation_schedule};
use checkout_core::scenario::{build_replica, ReplicaParams};
use checkout_core::telemetry::ReplicaTelemetry;

fn main() {
    const MAX_SERVERS: usize = 5;
    const ARRIVAL_RATE: f64 = 2.0;

    let params = ReplicaParams::default().with_arrival_rate(ARRIVAL_RATE);

    for servers in 1..=MAX_SERVERS {
        let seed = servers as u64 * 1000;
        let mut world = World::new();
        build_replica(&mut world, &params.server_layout(servers), &params, seed);
        initialize_simulation(&mut world);

        let mut schedule = simulation_schedule();
        let steps = run_until_horizon(&mut world, &mut schedule, 1_000_000);
        let metrics = finalize_replica(&mut world);

        println!(
            "--- {} counter(s), λ = {}, horizon {} min, seed {} ---",
            servers, ARRIVAL_RATE, params.horizon, seed
        );
        println!("Steps executed: {}", steps);
        println!(
            "Arrivals: {}  completed: {}  pending: {}  abandoned: {}",
            metrics.arrivals, metrics.customers_completed, metrics.pending, metrics.abandoned
        );
        println!("Mean queue length: {:.3}", metrics.mean_queue_length);

        let registry = world.resource::<Registry>();
        for (server, utilization) in registry.servers().iter().zip(&metrics.utilizations) {
            println!(
                "  counter {} ({:?}): served={} utilization={:.1}%",
                server.id,
                server.class,
                server.served(),
                utilization * 100.0
            );
        }

        let telemetry = world.resource::<ReplicaTelemetry>();
        const SAMPLE: usize = 5;
        for record in telemetry.completed.iter().take(SAMPLE) {
            println!(
                "    customer {} at {}: items={} wait={:.2} service={:.2} total={:.2}",
                record.customer.0,
                record.server,
                record.item_count,
                record.waiting_time(),
                record.service_time(),
                record.time_in_system()
            );
        }
    }
}
