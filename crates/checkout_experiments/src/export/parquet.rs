use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::metrics::ReplicaResult;

pub(crate) fn export_to_parquet_impl(
    results: &[ReplicaResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = build_record_batch(results)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(results: &[ReplicaResult]) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(results);

    RecordBatch::try_new(schema, arrays)
}

fn parquet_schema() -> Schema {
    Schema::new(vec![
        Field::new("num_servers", DataType::UInt64, false),
        Field::new("replica_index", DataType::UInt64, false),
        Field::new("seed", DataType::UInt64, false),
        Field::new("mean_time_in_system", DataType::Float64, false),
        Field::new("mean_queue_length", DataType::Float64, false),
        Field::new("mean_utilization", DataType::Float64, false),
        Field::new("sla_percent", DataType::Float64, false),
        Field::new("cost_server", DataType::Float64, false),
        Field::new("cost_wait", DataType::Float64, false),
        Field::new("cost_sla", DataType::Float64, false),
        Field::new("cost_total", DataType::Float64, false),
        Field::new("customers_completed", DataType::UInt64, false),
        Field::new("customers_abandoned", DataType::UInt64, false),
        Field::new("customers_pending", DataType::UInt64, false),
    ])
}

fn build_arrays(results: &[ReplicaResult]) -> Vec<ArrayRef> {
    let uint = |f: fn(&ReplicaResult) -> u64| -> ArrayRef {
        Arc::new(UInt64Array::from(results.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&ReplicaResult) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(results.iter().map(f).collect::<Vec<_>>()))
    };

    vec![
        uint(|r| r.num_servers as u64),
        uint(|r| r.replica_index as u64),
        uint(|r| r.seed),
        float(|r| r.mean_time_in_system),
        float(|r| r.mean_queue_length),
        float(|r| r.mean_utilization),
        float(|r| r.sla_percent),
        float(|r| r.cost_server),
        float(|r| r.cost_wait),
        float(|r| r.cost_sla),
        float(|r| r.cost_total),
        uint(|r| r.customers_completed),
        uint(|r| r.customers_abandoned),
        uint(|r| r.customers_pending),
    ]
}
