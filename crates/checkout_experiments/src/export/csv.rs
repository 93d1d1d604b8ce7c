use crate::metrics::ReplicaResult;
use crate::summary::ServerCountSummary;

pub(crate) fn export_results_impl(
    results: &[ReplicaResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "num_servers",
        "replica_index",
        "seed",
        "mean_time_in_system",
        "mean_queue_length",
        "mean_utilization",
        "sla_percent",
        "cost_server",
        "cost_wait",
        "cost_sla",
        "cost_total",
        "customers_completed",
        "customers_abandoned",
        "customers_pending",
    ])?;

    for result in results {
        wtr.write_record([
            &result.num_servers.to_string(),
            &result.replica_index.to_string(),
            &result.seed.to_string(),
            &result.mean_time_in_system.to_string(),
            &result.mean_queue_length.to_string(),
            &result.mean_utilization.to_string(),
            &result.sla_percent.to_string(),
            &result.cost_server.to_string(),
            &result.cost_wait.to_string(),
            &result.cost_sla.to_string(),
            &result.cost_total.to_string(),
            &result.customers_completed.to_string(),
            &result.customers_abandoned.to_string(),
            &result.customers_pending.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_summary_impl(
    summary: &[ServerCountSummary],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "num_servers",
        "replicas",
        "time_in_system_mean",
        "time_in_system_std",
        "queue_length_mean",
        "queue_length_std",
        "utilization_mean",
        "utilization_std",
        "sla_percent_mean",
        "sla_percent_std",
        "cost_total_mean",
        "cost_total_std",
        "opens_counter",
    ])?;

    for row in summary {
        wtr.write_record([
            &row.num_servers.to_string(),
            &row.replicas.to_string(),
            &row.time_in_system.mean.to_string(),
            &row.time_in_system.std.to_string(),
            &row.queue_length.mean.to_string(),
            &row.queue_length.std.to_string(),
            &row.utilization.mean.to_string(),
            &row.utilization.std.to_string(),
            &row.sla_percent.mean.to_string(),
            &row.sla_percent.std.to_string(),
            &row.cost_total.mean.to_string(),
            &row.cost_total.std.to_string(),
            &row.opens_counter.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
