//! Result export: replica rows and grouped summaries to CSV, JSON and Parquet.

use std::path::Path;

use crate::metrics::ReplicaResult;
use crate::summary::ServerCountSummary;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export replica rows to Parquet, one column per [ReplicaResult] field.
///
/// # Errors
///
/// Returns an error if `results` is empty, or if file creation or Parquet writing fails.
pub fn export_to_parquet(
    results: &[ReplicaResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    parquet::export_to_parquet_impl(results, file)
}

/// Export replica rows as a pretty-printed JSON array.
pub fn export_to_json(
    results: &[ReplicaResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export replica rows to CSV with a header row.
///
/// # Errors
///
/// Returns an error if `results` is empty, or if file creation or CSV writing fails.
pub fn export_to_csv(
    results: &[ReplicaResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_results_impl(results, file)
}

/// Export the grouped summary to CSV, mean and std columns per metric.
pub fn export_summary_to_csv(
    summary: &[ServerCountSummary],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(summary)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_summary_impl(summary, file)
}

pub fn export_summary_to_json(
    summary: &[ServerCountSummary],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(summary, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use tempfile::{tempdir, NamedTempFile};

    fn sample_results() -> Vec<ReplicaResult> {
        (0..2)
            .map(|replica_index| ReplicaResult {
                num_servers: 2,
                replica_index,
                seed: 2000 + replica_index as u64,
                mean_time_in_system: 1.5,
                mean_queue_length: 0.4,
                mean_utilization: 0.7,
                sla_percent: 98.0,
                cost_server: 60.0,
                cost_wait: 18.0,
                cost_sla: 0.0,
                cost_total: 78.0,
                customers_completed: 120,
                customers_abandoned: 0,
                customers_pending: 2,
            })
            .collect()
    }

    #[test]
    fn test_export_to_csv() {
        let file = NamedTempFile::new().unwrap();
        export_to_csv(&sample_results(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("num_servers,replica_index,seed,mean_time_in_system"));
        assert!(header.ends_with("customers_pending"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_export_to_json() {
        let file = NamedTempFile::new().unwrap();
        export_to_json(&sample_results(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(2));
        assert!(contents.contains("cost_total"));
    }

    #[test]
    fn test_export_to_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("results.parquet");
        export_to_parquet(&sample_results(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..4], b"PAR1");
    }

    #[test]
    fn test_export_summary() {
        let summary = summarize(&sample_results());
        let dir = tempdir().unwrap();

        let csv_path = dir.path().join("summary.csv");
        export_summary_to_csv(&summary, &csv_path).unwrap();
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("num_servers,replicas,time_in_system_mean"));
        assert!(contents.contains("opens_counter"));

        let json_path = dir.path().join("summary.json");
        export_summary_to_json(&summary, &json_path).unwrap();
        assert!(std::fs::read_to_string(&json_path)
            .unwrap()
            .contains("\"sla_percent\""));
    }

    #[test]
    fn empty_results_are_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(export_to_csv(&[], file.path()).is_err());
        assert!(export_to_parquet(&[], file.path()).is_err());
    }
}
