use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use catalogen_core::ProductDraft;

use crate::errors::SinkResult;

/// Outcome of one delivered batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SinkReceipt {
    pub batch: usize,
    pub resources: usize,
    pub bytes_written: u64,
    /// Import operation state to number of resources in that state.
    pub operation_states: BTreeMap<String, u64>,
}

/// Totals reported when a sink is finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SinkSummary {
    pub destination: String,
    pub batches: usize,
    pub resources: usize,
    pub bytes_written: u64,
    pub operation_states: BTreeMap<String, u64>,
}

impl SinkSummary {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, receipt: &SinkReceipt) {
        self.batches += 1;
        self.resources += receipt.resources;
        self.bytes_written += receipt.bytes_written;
        for (state, count) in &receipt.operation_states {
            *self.operation_states.entry(state.clone()).or_insert(0) += count;
        }
    }
}

/// Destination consuming generated batches in order.
#[async_trait]
pub trait BatchSink: Send {
    /// Short identifier of the sink kind (e.g. `file`).
    fn kind(&self) -> &'static str;

    /// Deliver one batch; `batch` is the zero-based batch index.
    async fn send(&mut self, batch: usize, resources: &[ProductDraft]) -> SinkResult<SinkReceipt>;

    /// Flush pending output and report totals.
    async fn finish(&mut self) -> SinkResult<SinkSummary>;
}
