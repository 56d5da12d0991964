//! `run` command implementation.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clients::{DirectoryObjectStore, MemoryLookupTable, MemoryObjectStore, MemoryQueues};
use contracts::{
    ApplicationRecord, InboundBatch, LookupTable, ObjectStore, QueueClient, RouterConfig,
};
use router::{BatchReport, BatchRouter};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::ensure_exists;

/// Execute the `run` command
///
/// Succeeds whenever the batch was processed to completion; per-message
/// failures only show up in the report.
pub async fn run_batch(args: &RunArgs, config: &RouterConfig) -> Result<()> {
    let batch = read_batch(&args.batch)?;

    info!(
        batch = %args.batch.display(),
        messages = batch.len(),
        bucket = %config.object_store.bucket,
        "Configuration and batch loaded"
    );

    let report = route(args, config, &batch).await?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize batch report")?;
        println!("{json}");
    } else {
        report.print_summary();
    }
    Ok(())
}

#[cfg(feature = "aws")]
async fn route(args: &RunArgs, config: &RouterConfig, batch: &InboundBatch) -> Result<BatchReport> {
    if args.aws {
        return route_aws(config, batch).await;
    }
    route_local(args, config, batch).await
}

#[cfg(not(feature = "aws"))]
async fn route(args: &RunArgs, config: &RouterConfig, batch: &InboundBatch) -> Result<BatchReport> {
    route_local(args, config, batch).await
}

#[cfg(feature = "aws")]
async fn route_aws(config: &RouterConfig, batch: &InboundBatch) -> Result<BatchReport> {
    use clients::aws::{load_sdk_config, DynamoLookupTable, S3ObjectStore, SqsQueues};

    let sdk_config = load_sdk_config(&config.object_store.region).await;
    let table = Arc::new(DynamoLookupTable::new(&sdk_config, &config.lookup_table_name));
    let queues = Arc::new(SqsQueues::new(&sdk_config));
    let store = Arc::new(S3ObjectStore::new(&sdk_config));

    process(config, batch, table, queues, store).await
}

/// Route with in-memory lookup table and queues
///
/// Every sink named in the routes file, plus the inbound queue, is
/// registered so forwarding and deletion can succeed.
async fn route_local(
    args: &RunArgs,
    config: &RouterConfig,
    batch: &InboundBatch,
) -> Result<BatchReport> {
    let records = match &args.routes {
        Some(path) => read_routes(path)?,
        None => Vec::new(),
    };

    let queue_names: BTreeSet<String> = records
        .iter()
        .map(|r| r.sink_name.clone())
        .filter(|name| !name.is_empty() && *name != config.default_sink_name)
        .chain(std::iter::once(config.inbound_queue_name.clone()))
        .collect();

    let table = MemoryLookupTable::new(&config.lookup_table_name);
    for record in records {
        table.insert(record);
    }
    let table = Arc::new(table);
    let queues = Arc::new(MemoryQueues::new().with_queues(queue_names));

    let report = match &args.output_dir {
        Some(dir) => {
            let store = Arc::new(DirectoryObjectStore::new(dir));
            process(config, batch, table, queues.clone(), store).await?
        }
        None => {
            let store = Arc::new(MemoryObjectStore::new());
            let report = process(config, batch, table, queues.clone(), store.clone()).await?;
            info!(objects = store.len(), "Object-store writes kept in memory");
            report
        }
    };

    info!(
        forwarded = queues.sent().len(),
        deleted = queues.deleted().len(),
        "In-memory queues after batch"
    );
    Ok(report)
}

async fn process<L, Q, S>(
    config: &RouterConfig,
    batch: &InboundBatch,
    table: Arc<L>,
    queues: Arc<Q>,
    store: Arc<S>,
) -> Result<BatchReport>
where
    L: LookupTable + Sync,
    Q: QueueClient + Sync,
    S: ObjectStore + Sync,
{
    let router = BatchRouter::new(config, table, queues, store).context("Failed to build router")?;
    Ok(router.process_batch(batch).await)
}

fn read_batch(path: &Path) -> Result<InboundBatch> {
    ensure_exists("Batch", path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch from {}", path.display()))?;
    InboundBatch::from_event_json(&content)
        .with_context(|| format!("Failed to decode batch from {}", path.display()))
}

fn read_routes(path: &Path) -> Result<Vec<ApplicationRecord>> {
    ensure_exists("Routes", path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read routes from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse routes from {}", path.display()))
}
