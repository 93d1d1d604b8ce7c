//! Inter-arrival time distributions.
//!
//! Implementations draw from the caller's RNG so every replica owns its random stream.

use rand::rngs::StdRng;
use rand::Rng;

use crate::clock::SimTime;

/// Trait for sampling the delay until the next arrival.
pub trait InterArrivalDistribution: Send + Sync + std::fmt::Debug {
    /// Sample the next inter-arrival delay. `now` is the current simulation time
    /// (for time-varying processes). Returning a non-finite value stops arrivals.
    fn sample(&self, rng: &mut StdRng, now: SimTime) -> SimTime;
}

/// Constant inter-arrival time.
#[derive(Debug, Clone)]
pub struct UniformInterArrival {
    pub interval: SimTime,
}

impl UniformInterArrival {
    pub fn new(interval: SimTime) -> Self {
        Self { interval }
    }

    /// Create from rate (arrivals per time unit).
    pub fn from_rate(rate: f64) -> Self {
        if rate <= 0.0 {
            return Self {
                interval: f64::INFINITY,
            };
        }
        Self {
            interval: 1.0 / rate,
        }
    }
}

impl InterArrivalDistribution for UniformInterArrival {
    fn sample(&self, _rng: &mut StdRng, _now: SimTime) -> SimTime {
        self.interval
    }
}

/// Exponential distribution: Poisson process (constant rate, random inter-arrival times).
#[derive(Debug, Clone)]
pub struct ExponentialInterArrival {
    /// Rate parameter (lambda): expected number of arrivals per time unit.
    pub rate: f64,
}

impl ExponentialInterArrival {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.max(0.0),
        }
    }
}

impl InterArrivalDistribution for ExponentialInterArrival {
    fn sample(&self, rng: &mut StdRng, _now: SimTime) -> SimTime {
        if self.rate <= 0.0 {
            return f64::INFINITY;
        }
        // Sample from exponential: -ln(U) / lambda, where U is uniform [0,1)
        let u: f64 = rng.gen();
        let u = u.max(1e-10); // Avoid log(0)
        -u.ln() / self.rate
    }
}
