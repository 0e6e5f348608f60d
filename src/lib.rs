pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod pdf;
pub mod reduce;

pub use config::Settings;
pub use error::{MergeError, ReduceError, SqueezeError};
pub use merge::merge;
pub use reduce::{reduce, ReduceOutcome};

/// High-level API for merging documents and fitting them under a size budget.
///
/// This is the recommended entry point for library consumers: the uploaded
/// buffers go in, one serialized document comes out. The merged document is
/// only degraded when it exceeds the target; an input that already fits is
/// returned unchanged inside [`ReduceOutcome::Fit`].
///
/// # Arguments
///
/// * `buffers` - Serialized input documents, merged in the order given
/// * `settings` - Target byte budget, see [`Settings::from_target_field`]
///
/// # Returns
///
/// A [`ReduceOutcome`] carrying the final bytes, or a [`SqueezeError`] when
/// an input cannot be parsed or the reduction loop fails outright. Missing
/// the target is not an error; check [`ReduceOutcome::met_target`] if the
/// distinction matters.
///
/// # Example
///
/// ```no_run
/// use pdf_squeeze::{merge_then_reduce, Settings};
///
/// # async fn example() -> Result<(), pdf_squeeze::SqueezeError> {
/// let first = std::fs::read("first.pdf").unwrap();
/// let second = std::fs::read("second.pdf").unwrap();
///
/// let settings = Settings::from_target_field(Some("9"));
/// let outcome = merge_then_reduce(vec![first, second], &settings).await?;
///
/// std::fs::write("merged.pdf", outcome.into_bytes()).unwrap();
/// # Ok(())
/// # }
/// ```
pub async fn merge_then_reduce(
    buffers: Vec<Vec<u8>>,
    settings: &Settings,
) -> Result<ReduceOutcome, SqueezeError> {
    let merged = merge::merge(buffers).await?;
    let outcome = reduce::reduce(merged, settings.target_size_kb).await?;
    Ok(outcome)
}
