pub mod arrival;
pub mod departure;

use crate::clock::{EventKind, SimTime, SimulationClock};
use crate::entities::Server;

/// Starts the head of `server`'s queue, if idle-at-head, and schedules its departure.
pub(crate) fn start_head_service(clock: &mut SimulationClock, server: &mut Server, now: SimTime) {
    if let Some((customer, completion)) = server.begin_service(now) {
        clock.schedule_at(
            completion,
            EventKind::Departure {
                server: server.id,
                customer,
            },
        );
    }
}
