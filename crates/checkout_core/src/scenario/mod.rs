//! Scenario setup: replica parameters, counter layout and world construction.

mod build;
mod params;

pub use build::{build_replica, ArrivalProcess};
pub use params::{ArrivalProcessKind, ReplicaParams, ServerSpec, SimulationHorizon};
