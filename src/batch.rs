use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info};

use crate::assemble::{panic_message, Assembler};
use crate::record::{Page, Record};

/// Available parallelism minus one, never below one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

pub fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, eta {eta}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(records: &[Record]) -> Self {
        let failed = records.iter().filter(|r| r.is_failure()).count();
        BatchSummary {
            total: records.len(),
            succeeded: records.len() - failed,
            failed,
        }
    }
}

/// Assemble every page on a pool of `workers` threads. The result has one
/// record per page, in corpus order regardless of completion order.
pub fn run(
    pages: &[Page],
    assembler: &Assembler<'_>,
    workers: usize,
    progress: &ProgressBar,
) -> Result<Vec<Record>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("assemble-{i}"))
        .build()
        .context("Failed to build worker pool")?;

    info!(
        judge = %assembler.judge(),
        pages = pages.len(),
        workers,
        "Processing problems"
    );

    let records: Vec<Record> = pool.install(|| {
        pages
            .par_iter()
            .map(|page| {
                let record = panic::catch_unwind(AssertUnwindSafe(|| assembler.assemble(page)))
                    .unwrap_or_else(|p| {
                        error!(url = %page.url, error = %panic_message(p.as_ref()), "page pipeline panicked");
                        assembler.fallback(page)
                    });
                progress.inc(1);
                record
            })
            .collect()
    });

    progress.finish_and_clear();
    Ok(records)
}
