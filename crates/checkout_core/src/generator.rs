//! Customer generator: baskets, checkout overheads and inter-arrival delays.
//!
//! The generator owns the replica's only RNG. Draw order is fixed (items, then overhead,
//! then the next inter-arrival delay) so a seed fully determines the arrival stream,
//! independent of how customers are routed.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::clock::SimTime;
use crate::distributions::{ExponentialInterArrival, InterArrivalDistribution};
use crate::entities::{Customer, CustomerId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Baskets are drawn uniformly from `1..=max_items`.
    pub max_items: u32,
    pub overhead_min: SimTime,
    pub overhead_max: SimTime,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_items: 20,
            // 15 to 30 seconds, in minutes.
            overhead_min: 0.25,
            overhead_max: 0.5,
        }
    }
}

#[derive(Debug)]
pub struct CustomerGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    generated: u64,
}

impl CustomerGenerator {
    pub fn from_seed(seed: u64, config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            generated: 0,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of customers produced so far; also the last issued id.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Draws a new customer. `item_cap` narrows the basket range for pre-filled capped queues.
    pub fn next_customer(&mut self, item_cap: Option<u32>) -> Customer {
        self.generated += 1;
        let upper = item_cap
            .map_or(self.config.max_items, |cap| cap.min(self.config.max_items))
            .max(1);
        let item_count = self.rng.gen_range(1..=upper);
        let overhead = if self.config.overhead_max > self.config.overhead_min {
            self.rng
                .gen_range(self.config.overhead_min..=self.config.overhead_max)
        } else {
            self.config.overhead_min
        };
        Customer::new(CustomerId(self.generated), item_count, overhead)
    }

    /// Exponential delay with mean `1 / rate`.
    pub fn next_interarrival(&mut self, rate: f64) -> SimTime {
        ExponentialInterArrival::new(rate).sample(&mut self.rng, 0.0)
    }

    pub fn sample_interarrival(
        &mut self,
        distribution: &dyn InterArrivalDistribution,
        now: SimTime,
    ) -> SimTime {
        distribution.sample(&mut self.rng, now)
    }
}
