pub mod clock;
pub mod distributions;
pub mod entities;
pub mod generator;
pub mod profiling;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
