//! Picks the cheapest server count and phrases when to open one more counter.

use std::fmt;

use serde::Serialize;

use crate::config::TriggerConfig;
use crate::summary::ServerCountSummary;

/// Rule for opening an additional counter. Descriptive only; never fed back into a replica.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpeningTrigger {
    pub queue_threshold: f64,
    pub utilization_threshold: f64,
    pub sustain_window: f64,
}

impl OpeningTrigger {
    /// Uses `fallback_queue_threshold` when the config leaves the queue threshold unset.
    pub fn from_config(config: &TriggerConfig, fallback_queue_threshold: f64) -> Self {
        Self {
            queue_threshold: config.queue_threshold.unwrap_or(fallback_queue_threshold),
            utilization_threshold: config.utilization_threshold,
            sustain_window: config.sustain_window,
        }
    }

    pub fn should_open(&self, queue_length: f64, utilization: f64) -> bool {
        queue_length > self.queue_threshold || utilization > self.utilization_threshold
    }
}

impl fmt::Display for OpeningTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "open another counter when Lq > {:.2} or utilization > {:.0}% for {} minutes",
            self.queue_threshold,
            self.utilization_threshold * 100.0,
            self.sustain_window
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub num_servers: usize,
    pub mean_cost: f64,
    pub mean_sla_percent: f64,
    pub mean_utilization: f64,
    pub mean_queue_length: f64,
    pub mean_time_in_system: f64,
    pub trigger: OpeningTrigger,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recommended: {} counter(s), mean cost {:.2}",
            self.num_servers, self.mean_cost
        )?;
        writeln!(
            f,
            "  SLA {:.1}%  utilization {:.1}%  Lq {:.2}  W {:.2} min",
            self.mean_sla_percent,
            self.mean_utilization * 100.0,
            self.mean_queue_length,
            self.mean_time_in_system
        )?;
        write!(f, "  Rule: {}", self.trigger)
    }
}

/// Index of the summary row with the lowest mean total cost.
///
/// Rows are expected in ascending server count; on a tie the earlier (smaller) count wins.
pub fn optimal_index(summaries: &[ServerCountSummary]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, summary) in summaries.iter().enumerate() {
        let cost = summary.cost_total.mean;
        match best {
            Some((_, best_cost)) if cost >= best_cost || cost.is_nan() => {}
            _ => best = Some((index, cost)),
        }
    }
    best.map(|(index, _)| index)
}

pub fn recommend(summaries: &[ServerCountSummary], trigger: &TriggerConfig) -> Option<Recommendation> {
    let optimum = &summaries[optimal_index(summaries)?];
    Some(Recommendation {
        num_servers: optimum.num_servers,
        mean_cost: optimum.cost_total.mean,
        mean_sla_percent: optimum.sla_percent.mean,
        mean_utilization: optimum.utilization.mean,
        mean_queue_length: optimum.queue_length.mean,
        mean_time_in_system: optimum.time_in_system.mean,
        trigger: OpeningTrigger::from_config(trigger, optimum.queue_length.mean),
    })
}

/// Marks each row on which `trigger` fires.
pub fn annotate_triggers(summaries: &mut [ServerCountSummary], trigger: &OpeningTrigger) {
    for summary in summaries {
        summary.opens_counter =
            trigger.should_open(summary.queue_length.mean, summary.utilization.mean);
    }
}
