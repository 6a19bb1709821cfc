#![deny(missing_docs)]
//! Parallel parsing of independent phosphor documents.
//!
//! Every document gets its own [`phosphor_core::ParseSession`], so heading
//! ids never leak between pages and results do not depend on scheduling.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use phosphor_core::{ParseOptions, ParseOutput, parse_document_with_options};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Input for a single document in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Extended-markdown source.
    pub source: String,
}

/// Result for a single document in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Rendered output; diagnostics carry the id as their file.
    pub output: ParseOutput,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Number of documents processed.
    pub total: u32,
    /// Number of documents that produced at least one warning.
    pub with_warnings: u32,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Parse options applied to every document.
    pub options: ParseOptions,
}

/// All results, in input order, plus statistics.
#[derive(Debug, Clone, Serialize)]
pub struct BatchProcessingResult {
    /// One result per input.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Parses many documents in parallel.
pub fn parse_batch(inputs: Vec<BatchInput>, options: &BatchOptions) -> BatchProcessingResult {
    let start = Instant::now();

    let pool = options.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads)
            .build()
            .map_err(|err| {
                log::warn!(
                    "Could not build a {}-thread pool ({}); using the global pool",
                    max_threads,
                    err
                );
            })
            .ok()
    });

    let total = inputs.len() as u32;
    let with_warnings = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let mut output = parse_document_with_options(&input.source, &options.options);
        if output.diagnostics.has_warnings() {
            with_warnings.fetch_add(1, Ordering::Relaxed);
            output.diagnostics.set_file(&input.id);
        }
        BatchResult {
            id: input.id,
            output,
        }
    };

    let results: Vec<BatchResult> = if let Some(pool) = pool {
        pool.install(|| inputs.into_par_iter().map(process_input).collect())
    } else {
        inputs.into_par_iter().map(process_input).collect()
    };

    let elapsed = start.elapsed();
    log::debug!("Parsed {} documents in {:?}", total, elapsed);

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            with_warnings: with_warnings.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
