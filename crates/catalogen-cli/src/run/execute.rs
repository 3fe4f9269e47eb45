use std::time::Instant;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use catalogen_core::validate_draft;
use catalogen_generate::RecordGenerator;
use catalogen_sink::{BatchSink, SinkSummary};

use super::{BatchPlan, RunResult};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%)";

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub sink: &'static str,
    pub records: u64,
    pub batches: u64,
    pub duration_ms: u64,
    pub summary: SinkSummary,
}

pub fn progress_bar(plan: &BatchPlan, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(plan.batch_count());
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Generate every planned batch and hand it to `sink`, strictly in order.
///
/// Any failure aborts the run; batches already delivered stay delivered.
pub async fn execute_run(
    run_id: &str,
    generator: &mut RecordGenerator,
    plan: &BatchPlan,
    sink: &mut dyn BatchSink,
    progress: &ProgressBar,
) -> RunResult<RunReport> {
    let started_at = Utc::now();
    let timer = Instant::now();

    info!(
        event = "run_started",
        run_id = %run_id,
        sink = sink.kind(),
        records = plan.total_records,
        batch_size = plan.batch_size,
        batches = plan.batch_count(),
        locales = %generator.locales()
    );

    let (records, batches, summary) = match deliver(generator, plan, sink, progress).await {
        Ok(delivered) => delivered,
        Err(err) => {
            progress.abandon();
            return Err(err);
        }
    };
    progress.finish();

    let duration_ms = timer.elapsed().as_millis() as u64;
    info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        records,
        batches,
        generated_total = generator.generated(),
        duration_ms
    );

    Ok(RunReport {
        run_id: run_id.to_string(),
        started_at,
        sink: sink.kind(),
        records,
        batches,
        duration_ms,
        summary,
    })
}

async fn deliver(
    generator: &mut RecordGenerator,
    plan: &BatchPlan,
    sink: &mut dyn BatchSink,
    progress: &ProgressBar,
) -> RunResult<(u64, u64, SinkSummary)> {
    let locales = generator.locales().clone();
    let mut records = 0_u64;
    let mut batches = 0_u64;
    for (index, size) in plan.sizes().enumerate() {
        let batch = generator.generate_batch(size)?;
        for draft in &batch {
            validate_draft(draft, &locales)?;
        }

        let receipt = sink.send(index, &batch).await?;
        debug!(
            event = "batch_delivered",
            batch = index,
            resources = receipt.resources,
            bytes_written = receipt.bytes_written
        );

        records += batch.len() as u64;
        batches += 1;
        progress.inc(1);
    }

    let summary = sink.finish().await?;
    Ok((records, batches, summary))
}
