//! Arrival system: route the new customer and schedule the next arrival.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::registry::Registry;
use crate::scenario::ArrivalProcess;
use crate::telemetry::ReplicaTelemetry;

use super::start_head_service;

pub fn arrival_system(
    mut clock: ResMut<SimulationClock>,
    mut registry: ResMut<Registry>,
    mut telemetry: ResMut<ReplicaTelemetry>,
    arrivals: Res<ArrivalProcess>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::Arrival {
        return;
    }

    let now = clock.now();
    telemetry.arrivals += 1;
    let customer = registry.generator_mut().next_customer(None).arriving_at(now);

    match registry.select_best(customer.item_count) {
        None => {
            telemetry.abandoned += 1;
            debug!(
                customer = customer.id.0,
                items = customer.item_count,
                now,
                "No counter accepts basket; customer leaves"
            );
        }
        Some(server_id) => {
            if let Some(server) = registry.server_mut(server_id) {
                if server.enqueue(customer) {
                    start_head_service(&mut clock, server, now);
                }
            }
        }
    }

    let delay = registry
        .generator_mut()
        .sample_interarrival(arrivals.distribution(), now);
    if delay.is_finite() {
        clock.schedule_in(delay, EventKind::Arrival);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::scenario::{build_replica, ReplicaParams, ServerSpec};

    fn run_arrival(world: &mut World) {
        let event = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("arrival scheduled");
        world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(arrival_system);
        schedule.run(world);
    }

    #[test]
    fn idle_counter_starts_service_and_next_arrival_is_scheduled() {
        let mut world = World::new();
        let params = ReplicaParams::default();
        build_replica(&mut world, &[ServerSpec::standard(0.05)], &params, 3);
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(1.0, EventKind::Arrival);

        run_arrival(&mut world);

        let registry = world.resource::<Registry>();
        let server = &registry.servers()[0];
        assert_eq!(server.queue_len(), 1);
        assert!(server.is_serving());
        let head = server.head().expect("head");
        assert_eq!(head.arrival_time, 1.0);
        assert_eq!(head.service_start, Some(1.0));

        // A departure for the customer and the next arrival are pending.
        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.pending_events(), 2);
        assert_eq!(world.resource::<ReplicaTelemetry>().arrivals, 1);
    }

    #[test]
    fn busy_counter_queues_the_customer() {
        let mut world = World::new();
        let params = ReplicaParams::default();
        build_replica(&mut world, &[ServerSpec::standard(0.05)], &params, 3);
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_at(1.0, EventKind::Arrival);
        }
        run_arrival(&mut world);
        // Drop the follow-up arrival and force a second one at the same instant.
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(1.0, EventKind::Arrival);
        run_arrival(&mut world);

        let registry = world.resource::<Registry>();
        let server = &registry.servers()[0];
        assert_eq!(server.queue_len(), 2);
        assert_eq!(server.waiting_count(), 1);
        assert!(server.queue()[1].service_start.is_none());
    }

    #[test]
    fn oversized_basket_abandons_when_only_express_exists() {
        let mut world = World::new();
        let params = ReplicaParams::default().with_max_items(50);
        build_replica(&mut world, &[ServerSpec::express(0.03, 0)], &params, 8);
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(0.5, EventKind::Arrival);

        run_arrival(&mut world);

        let telemetry = world.resource::<ReplicaTelemetry>();
        assert_eq!(telemetry.arrivals, 1);
        assert_eq!(telemetry.abandoned, 1);
        assert_eq!(world.resource::<Registry>().total_in_system(), 0);
        // Only the next arrival is pending; nothing was served.
        assert_eq!(world.resource::<SimulationClock>().pending_events(), 1);
    }
}
