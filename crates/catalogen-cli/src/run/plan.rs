use catalogen_sink::import_api::MAX_RESOURCES_PER_REQUEST;

use super::{RunError, RunResult};

pub const DEFAULT_BATCH_SIZE: usize = MAX_RESOURCES_PER_REQUEST;

/// Split of a run into batches; only the last batch may be short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub total_records: u64,
    pub batch_size: usize,
}

impl BatchPlan {
    /// Clamp the requested batch size to the import limit and to the record count.
    pub fn new(total_records: u64, requested_batch_size: Option<usize>) -> RunResult<Self> {
        if total_records == 0 {
            return Err(RunError::Plan(
                "number of records must be at least 1".to_string(),
            ));
        }

        let requested = requested_batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if requested == 0 {
            return Err(RunError::Plan("batch size must be at least 1".to_string()));
        }

        let capped = requested.min(MAX_RESOURCES_PER_REQUEST);
        let batch_size = usize::try_from(total_records)
            .map(|total| capped.min(total))
            .unwrap_or(capped);

        Ok(Self {
            total_records,
            batch_size,
        })
    }

    pub fn batch_count(&self) -> u64 {
        self.total_records.div_ceil(self.batch_size as u64)
    }

    /// Size of every batch in order.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        let full = self.batch_size as u64;
        (0..self.batch_count()).map(move |index| {
            let remaining = self.total_records - index * full;
            remaining.min(full) as usize
        })
    }
}
