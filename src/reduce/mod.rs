//! Bounded iterative size reduction.
//!
//! The reducer degrades a document over up to 15 attempts, each built from a
//! fresh copy of the working source: page dropping, content scaling,
//! dimension shrinking, annotation and metadata stripping, and progressively
//! tighter serialization profiles. Every third attempt the working source is
//! re-parsed from the latest output so degradation compounds.

pub mod policy;

use lopdf::{Document, ObjectId};

use crate::error::ReduceError;
use crate::pdf::{self, transform};

/// How a reduction run ended. All three variants carry a complete
/// serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// Already under target, or brought under target within the attempt
    /// budget.
    Fit(Vec<u8>),
    /// Attempt budget exhausted; the smallest buffer produced, still above
    /// target.
    BestEffort(Vec<u8>),
    /// Target judged out of reach; the fixed single-page notice document.
    Placeholder(Vec<u8>),
}

impl ReduceOutcome {
    /// The serialized document, whichever way the run ended.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ReduceOutcome::Fit(bytes)
            | ReduceOutcome::BestEffort(bytes)
            | ReduceOutcome::Placeholder(bytes) => bytes,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ReduceOutcome::Fit(bytes)
            | ReduceOutcome::BestEffort(bytes)
            | ReduceOutcome::Placeholder(bytes) => bytes,
        }
    }

    /// Whether the output actually fits under the requested target.
    pub fn met_target(&self) -> bool {
        matches!(self, ReduceOutcome::Fit(_))
    }
}

/// Transient record of one attempt; drives best-result tracking and debug
/// logging, never persisted.
struct AttemptRecord {
    attempt: u32,
    scale: Option<f32>,
    pages_kept: usize,
    size: usize,
}

/// Shrink `bytes` until it fits under `target_size_kb`.
///
/// Runs the whole loop on the blocking pool; the future resolves when the
/// outcome is ready. Failing to reach the target is not an error - see
/// [`ReduceOutcome`].
pub async fn reduce(bytes: Vec<u8>, target_size_kb: f64) -> Result<ReduceOutcome, ReduceError> {
    tokio::task::spawn_blocking(move || run_reduction(bytes, target_size_kb))
        .await
        .map_err(|err| ReduceError::Task(err.to_string()))?
}

/// Synchronous body of [`reduce`].
pub(crate) fn run_reduction(
    bytes: Vec<u8>,
    target_size_kb: f64,
) -> Result<ReduceOutcome, ReduceError> {
    let current_kb = bytes.len() as f64 / 1024.0;
    if current_kb <= target_size_kb {
        log::info!("Document already fits ({current_kb:.1} KB <= {target_size_kb:.1} KB)");
        return Ok(ReduceOutcome::Fit(bytes));
    }

    let target_bytes = (target_size_kb * 1024.0) as usize;
    let ratio = target_size_kb / current_kb;

    let mut source = Document::load_mem(&bytes).map_err(ReduceError::Parse)?;
    let original_pages = source.get_pages().len();
    drop(bytes);

    log::info!(
        "Reducing {original_pages}-page document of {current_kb:.1} KB \
         towards {target_size_kb:.1} KB (ratio {ratio:.3})"
    );

    let mut best: Option<Vec<u8>> = None;
    let mut last_failure: Option<lopdf::Error> = None;

    for attempt in 1..=policy::MAX_ATTEMPTS {
        let mut working = source.clone();
        let tier = policy::tier_for(attempt);

        if ratio < policy::SUBSET_RATIO_CUTOFF && attempt > policy::SUBSET_AFTER {
            let keep = (original_pages as f64 * policy::SUBSET_KEEP_FRACTION).ceil() as usize;
            transform::keep_front_pages(&mut working, keep);
        }
        let page_ids: Vec<ObjectId> = working.get_pages().values().copied().collect();
        let pages_kept = page_ids.len();

        let scale = if attempt > policy::SCALE_AFTER {
            tier.scale.factor(attempt)
        } else {
            None
        };
        if let Some(factor) = scale {
            for &page_id in &page_ids {
                transform::scale_page_contents(&mut working, page_id, factor)
                    .map_err(|source| ReduceError::Transform { attempt, source })?;
            }
        }

        if let Some(factor) = policy::page_box_factor(attempt) {
            for &page_id in &page_ids {
                transform::shrink_page_box(&mut working, page_id, factor)
                    .map_err(|source| ReduceError::Transform { attempt, source })?;
            }
        }

        if attempt > policy::STRIP_ANNOTATIONS_AFTER {
            for &page_id in &page_ids {
                transform::strip_annotations(&mut working, page_id);
            }
        }

        if attempt > policy::STRIP_METADATA_AFTER {
            transform::strip_metadata(&mut working);
        }

        let candidate = match pdf::serialize_with_profile(&mut working, &tier.profile) {
            Ok(out) => out,
            Err(err) => {
                log::warn!("Attempt {attempt} failed to serialize: {err}");
                last_failure = Some(err);
                continue;
            }
        };
        drop(working);

        let record = AttemptRecord {
            attempt,
            scale,
            pages_kept,
            size: candidate.len(),
        };
        log::debug!(
            "Attempt {}: scale {:?}, {} pages, {} bytes",
            record.attempt,
            record.scale,
            record.pages_kept,
            record.size
        );

        if candidate.len() <= target_bytes {
            log::info!(
                "Reached target on attempt {attempt} ({} bytes)",
                candidate.len()
            );
            return Ok(ReduceOutcome::Fit(candidate));
        }

        let improved = best
            .as_ref()
            .map_or(true, |smallest| candidate.len() < smallest.len());

        if attempt % policy::RELOAD_INTERVAL == 0 {
            match Document::load_mem(&candidate) {
                Ok(reloaded) => source = reloaded,
                Err(err) => {
                    log::warn!("Checkpoint reload failed on attempt {attempt}: {err}");
                }
            }
        }

        if improved {
            best = Some(candidate);
        }
    }

    let best = match best {
        Some(buffer) => buffer,
        None => {
            let detail = last_failure
                .map(|err| err.to_string())
                .unwrap_or_else(|| "no serializer output".to_string());
            return Err(ReduceError::Exhausted(detail));
        }
    };

    if ratio < policy::PLACEHOLDER_RATIO_CUTOFF {
        log::info!("Target unreachable at ratio {ratio:.3}; emitting placeholder document");
        let placeholder =
            pdf::build_placeholder(original_pages).map_err(ReduceError::Fallback)?;
        return Ok(ReduceOutcome::Placeholder(placeholder));
    }

    log::info!(
        "Attempt budget exhausted; best result is {} bytes against a {} byte target",
        best.len(),
        target_bytes
    );
    Ok(ReduceOutcome::BestEffort(best))
}
