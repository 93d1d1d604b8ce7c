//! Departure system: record the finished checkout and start the next customer in line.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::registry::Registry;
use crate::telemetry::{CompletedCheckout, ReplicaTelemetry};

use super::start_head_service;

pub fn departure_system(
    mut clock: ResMut<SimulationClock>,
    mut registry: ResMut<Registry>,
    mut telemetry: ResMut<ReplicaTelemetry>,
    event: Res<CurrentEvent>,
) {
    let EventKind::Departure {
        server: server_id,
        customer: customer_id,
    } = event.0.kind
    else {
        return;
    };

    let now = clock.now();
    let Some(server) = registry.server_mut(server_id) else {
        warn!(server = %server_id, "Departure for unknown counter");
        return;
    };

    match server.complete(customer_id, now) {
        Some(customer) => match CompletedCheckout::from_customer(&customer, server_id) {
            Some(record) => telemetry.completed.push(record),
            None => warn!(
                customer = customer_id.0,
                server = %server_id,
                "Departed customer was never started"
            ),
        },
        None => warn!(
            customer = customer_id.0,
            server = %server_id,
            "Departing customer not found in queue"
        ),
    }

    start_head_service(&mut clock, server, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::entities::{Customer, CustomerId, ServerId};
    use crate::scenario::{build_replica, ReplicaParams, ServerSpec};

    fn run_departure(world: &mut World) {
        let event = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("departure scheduled");
        world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(departure_system);
        schedule.run(world);
    }

    #[test]
    fn departure_records_time_and_starts_next_in_line() {
        let mut world = World::new();
        let params = ReplicaParams::default();
        build_replica(&mut world, &[ServerSpec::standard(0.5)], &params, 1);
        {
            let mut registry = world.resource_mut::<Registry>();
            let server = registry.server_mut(ServerId(1)).expect("server");
            server.enqueue(Customer::new(CustomerId(1), 2, 1.0).arriving_at(0.0));
            server.enqueue(Customer::new(CustomerId(2), 4, 0.0).arriving_at(0.5));
            server.begin_service(0.0);
        }
        world.resource_mut::<SimulationClock>().schedule_at(
            2.0,
            EventKind::Departure {
                server: ServerId(1),
                customer: CustomerId(1),
            },
        );

        run_departure(&mut world);

        let telemetry = world.resource::<ReplicaTelemetry>();
        assert_eq!(telemetry.completed.len(), 1);
        assert_eq!(telemetry.completed[0].time_in_system(), 2.0);

        let registry = world.resource::<Registry>();
        let server = &registry.servers()[0];
        assert_eq!(server.busy_time(), 2.0);
        assert_eq!(server.head().and_then(|c| c.service_start), Some(2.0));

        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.next_event_time(), Some(4.0));
    }

    #[test]
    fn unknown_customer_is_ignored() {
        let mut world = World::new();
        let params = ReplicaParams::default();
        build_replica(&mut world, &[ServerSpec::standard(0.5)], &params, 1);
        world.resource_mut::<SimulationClock>().schedule_at(
            1.0,
            EventKind::Departure {
                server: ServerId(4),
                customer: CustomerId(9),
            },
        );

        run_departure(&mut world);

        assert!(world.resource::<ReplicaTelemetry>().completed.is_empty());
    }
}
