use bevy_ecs::prelude::{Resource, World};
use tracing::debug;

use crate::clock::{EventKind, SimulationClock};
use crate::distributions::{ExponentialInterArrival, InterArrivalDistribution, UniformInterArrival};
use crate::generator::CustomerGenerator;
use crate::profiling::EventMetrics;
use crate::registry::Registry;
use crate::telemetry::ReplicaTelemetry;

use super::params::{ArrivalProcessKind, ReplicaParams, ServerSpec, SimulationHorizon};

/// Inter-arrival distribution driving the replica.
#[derive(Debug, Resource)]
pub struct ArrivalProcess {
    distribution: Box<dyn InterArrivalDistribution>,
}

impl ArrivalProcess {
    pub fn new(distribution: Box<dyn InterArrivalDistribution>) -> Self {
        Self { distribution }
    }

    pub fn from_params(params: &ReplicaParams) -> Self {
        match params.arrival_process {
            ArrivalProcessKind::Poisson => {
                Self::new(Box::new(ExponentialInterArrival::new(params.arrival_rate)))
            }
            ArrivalProcessKind::Deterministic => {
                Self::new(Box::new(UniformInterArrival::from_rate(params.arrival_rate)))
            }
        }
    }

    pub fn distribution(&self) -> &dyn InterArrivalDistribution {
        self.distribution.as_ref()
    }
}

/// Builds a fresh replica world: counters, generator, clock, telemetry and horizon.
///
/// Counters get pre-filled queues when `initial_queue_per_server` is set; those customers
/// arrive at t = 0 and the head of each queue starts service immediately.
pub fn build_replica(world: &mut World, layout: &[ServerSpec], params: &ReplicaParams, seed: u64) {
    let generator = CustomerGenerator::from_seed(seed, params.generator_config());
    let mut registry = Registry::new(generator);
    for spec in layout {
        registry.add_server(spec.class, spec.scan_duration, spec.item_cap);
    }

    let mut clock = SimulationClock::default();
    let mut telemetry = ReplicaTelemetry::default();

    if params.initial_queue_per_server > 0 {
        for index in 0..registry.len() {
            let cap = registry.servers()[index].item_cap;
            for _ in 0..params.initial_queue_per_server {
                let customer = registry.generator_mut().next_customer(cap).arriving_at(0.0);
                telemetry.arrivals += 1;
                registry.servers_mut()[index].enqueue(customer);
            }
            let server = &mut registry.servers_mut()[index];
            if let Some((customer, completion)) = server.begin_service(0.0) {
                clock.schedule_at(
                    completion,
                    EventKind::Departure {
                        server: server.id,
                        customer,
                    },
                );
            }
        }
    }

    debug!(
        servers = registry.len(),
        seed,
        horizon = params.horizon,
        prefilled = telemetry.arrivals,
        "Replica built"
    );

    world.insert_resource(registry);
    world.insert_resource(clock);
    world.insert_resource(telemetry);
    world.insert_resource(ArrivalProcess::from_params(params));
    world.insert_resource(SimulationHorizon(params.horizon));
    world.insert_resource(EventMetrics::default());
}
