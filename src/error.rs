use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No input documents to merge")]
    Empty,

    #[error("Failed to parse input document at position {index}: {source}")]
    Parse { index: usize, source: lopdf::Error },

    #[error("Merged document has no page tree")]
    MissingPageTree,

    #[error("Failed to serialize merged document: {0}")]
    Serialize(lopdf::Error),

    #[error("Merge worker failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("Failed to parse source document: {0}")]
    Parse(lopdf::Error),

    #[error("Attempt {attempt} could not rewrite page content: {source}")]
    Transform { attempt: u32, source: lopdf::Error },

    #[error("Every compression attempt failed to serialize: {0}")]
    Exhausted(String),

    #[error("Failed to build fallback document: {0}")]
    Fallback(lopdf::Error),

    #[error("Reduce worker failed: {0}")]
    Task(String),
}

/// Umbrella error for the merge-then-reduce pipeline.
#[derive(Error, Debug)]
pub enum SqueezeError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Reduce(#[from] ReduceError),
}
