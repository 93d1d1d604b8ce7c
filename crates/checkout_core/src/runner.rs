//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and queue-length integration happen here, outside systems. Each step
//! pops the next event from [SimulationClock], advances the time-weighted queue integral up
//! to the event time, inserts the event as [CurrentEvent], then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use bevy_ecs::world::Mut;
use tracing::{debug, warn};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::profiling::EventMetrics;
use crate::registry::Registry;
use crate::scenario::{build_replica, ArrivalProcess, ReplicaParams, ServerSpec, SimulationHorizon};
use crate::systems::{arrival::arrival_system, departure::departure_system};
use crate::telemetry::{ReplicaMetrics, ReplicaTelemetry};

/// Step cap used by [run_replica]. Far above what a plausible horizon produces.
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

fn is_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| e.0.kind.is_arrival()).unwrap_or(false)
}

fn is_departure(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| e.0.kind.is_departure()).unwrap_or(false)
}

/// Whether the clock still holds an event at or before the horizon.
fn has_due_event(world: &World) -> bool {
    let horizon = world.get_resource::<SimulationHorizon>().map(|h| h.0);
    match world.resource::<SimulationClock>().next_event_time() {
        Some(next_ts) => horizon.map_or(true, |end| next_ts <= end),
        None => false,
    }
}

/// Pops the next event if it falls within the horizon and folds the queue integral up to it.
fn advance_to_next_event(world: &mut World) -> Option<Event> {
    if !has_due_event(world) {
        return None;
    }

    let event = world.resource_mut::<SimulationClock>().pop_next()?;
    let waiting = world.resource::<Registry>().total_waiting();
    world
        .resource_mut::<ReplicaTelemetry>()
        .advance_queue_area(event.timestamp, waiting);
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }
    Some(event)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `false` if the clock is empty or the next event lies beyond [SimulationHorizon].
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    if advance_to_next_event(world).is_none() {
        return false;
    }
    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let Some(event) = advance_to_next_event(world) else {
        return false;
    };
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs steps until the horizon is reached, the clock drains, or `max_steps` is hit.
/// Returns the number of steps executed.
pub fn run_until_horizon(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    if steps == max_steps && has_due_event(world) {
        warn!(max_steps, "Step cap reached before the horizon");
    }
    steps
}

/// Same as [run_until_horizon], invoking `hook` after each step.
pub fn run_until_horizon_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the replica schedule: one system per event kind, gated on [CurrentEvent].
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((
        arrival_system.run_if(is_arrival),
        departure_system.run_if(is_departure),
    ));
    schedule
}

/// Schedules the first arrival. Call after [build_replica] and before running events.
pub fn initialize_simulation(world: &mut World) {
    let delay = world.resource_scope(|world, arrivals: Mut<ArrivalProcess>| {
        world
            .resource_mut::<Registry>()
            .generator_mut()
            .sample_interarrival(arrivals.distribution(), 0.0)
    });
    if delay.is_finite() {
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(delay, EventKind::Arrival);
    }
}

/// Closes the replica at the horizon and derives its metrics.
///
/// The queue integral is carried to the horizon, open busy intervals are closed against it,
/// and everyone still queued or in service is counted as pending. If events are still due
/// before the horizon (the step cap stopped the run), the current clock time is used as
/// the end instead and the metrics are flagged as truncated.
pub fn finalize_replica(world: &mut World) -> ReplicaMetrics {
    let now = world.resource::<SimulationClock>().now();
    let truncated = has_due_event(world);
    let horizon = match world.get_resource::<SimulationHorizon>() {
        Some(h) if !truncated => h.0,
        _ => now,
    };

    let waiting = world.resource::<Registry>().total_waiting();
    world
        .resource_mut::<ReplicaTelemetry>()
        .advance_queue_area(horizon, waiting);

    let mut registry = world.resource_mut::<Registry>();
    for server in registry.servers_mut() {
        server.close_busy_interval(horizon);
    }
    let utilizations: Vec<f64> = registry
        .servers()
        .iter()
        .map(|s| s.utilization(horizon))
        .collect();
    let served_per_server: Vec<u64> = registry.servers().iter().map(|s| s.served()).collect();
    let pending = registry.total_in_system() as u64;
    let num_servers = registry.len();

    let telemetry = world.resource::<ReplicaTelemetry>();
    let mean_queue_length = if horizon > 0.0 {
        telemetry.queue_area() / horizon
    } else {
        0.0
    };
    let time_in_system = telemetry.time_in_system_samples();

    ReplicaMetrics {
        num_servers,
        horizon,
        truncated,
        customers_completed: time_in_system.len() as u64,
        time_in_system,
        mean_queue_length,
        utilizations,
        arrivals: telemetry.arrivals,
        abandoned: telemetry.abandoned,
        pending,
        served_per_server,
    }
}

/// Runs one complete replica on a fresh world and returns its metrics.
pub fn run_replica(layout: &[ServerSpec], params: &ReplicaParams, seed: u64) -> ReplicaMetrics {
    let mut world = World::new();
    build_replica(&mut world, layout, params, seed);
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let steps = run_until_horizon(&mut world, &mut schedule, DEFAULT_MAX_STEPS);
    let metrics = finalize_replica(&mut world);

    debug!(
        servers = metrics.num_servers,
        seed,
        steps,
        arrivals = metrics.arrivals,
        completed = metrics.customers_completed,
        pending = metrics.pending,
        abandoned = metrics.abandoned,
        "Replica finished"
    );
    if metrics.truncated {
        warn!(seed, end = metrics.horizon, "Replica truncated by the step cap");
    }
    metrics
}
