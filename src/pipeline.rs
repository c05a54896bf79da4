//! High-level pipeline: resolve → invoke → normalize, once per input item.
//!
//! Execution is strictly sequential across items: item `i + 1` does not start
//! before item `i` has settled. The only shared state is the append-only
//! output vector, written exclusively by the item currently in flight.
//!
//! # Error Handling
//! Configuration and transport failures are caught at the per-item boundary.
//! Under the source's continue-on-failure policy they become a synthetic
//! `{ "error": … }` output item paired to the failed input, and the loop
//! moves on; otherwise the run aborts with a [`PipelineError`] naming the
//! offending item index. Already-emitted items are not rolled back — they are
//! simply discarded with the `Err`.
//!
//! # Callable From
//! - Host integrations holding a concrete [`Transport`] (see
//!   [`crate::http::HttpTransport`])
//! - Integration tests with a `MockTransport`

use tracing::{debug, error, info};

use crate::config::ApsConfig;
use crate::contract::{Operation, OutputItem, ParameterSource, Transport};
use crate::error::{ApsError, PipelineError};
use crate::normalize::normalize;

/// Run every item the source declares and collect one ordered output
/// sequence.
pub async fn execute<Op, P, T>(
    config: &ApsConfig,
    source: &P,
    transport: &T,
) -> Result<Vec<OutputItem>, PipelineError>
where
    Op: Operation,
    P: ParameterSource<Op> + ?Sized,
    T: Transport + ?Sized,
{
    let item_count = source.item_count();
    info!(item_count, "Starting pipeline run");

    let mut output: Vec<OutputItem> = Vec::new();
    for item_index in 0..item_count {
        match process_item(config, source, transport, item_index).await {
            Ok(items) => {
                debug!(item_index, produced = items.len(), "Item normalised");
                output.extend(items);
            }
            // Policy is read once per item, at the failure boundary.
            Err(err) if source.continue_on_failure() => {
                error!(item_index, error = %err, "Item failed, continuing per policy");
                output.push(OutputItem::from_error(&err, item_index));
            }
            Err(err) => {
                error!(item_index, error = %err, "Item failed, aborting run");
                return Err(PipelineError {
                    item_index,
                    source: err,
                });
            }
        }
    }

    info!(produced = output.len(), "Pipeline run complete");
    Ok(output)
}

async fn process_item<Op, P, T>(
    config: &ApsConfig,
    source: &P,
    transport: &T,
    item_index: usize,
) -> Result<Vec<OutputItem>, ApsError>
where
    Op: Operation,
    P: ParameterSource<Op> + ?Sized,
    T: Transport + ?Sized,
{
    let plan = source.plan(item_index)?;
    let request = plan.operation.resolve(config)?;
    debug!(
        item_index,
        method = request.method.as_str(),
        url = %request.url,
        "Resolved request"
    );
    let raw = transport.invoke(&request).await?;
    Ok(normalize(
        raw,
        plan.operation.binary_output(),
        &plan.options,
        item_index,
    ))
}
