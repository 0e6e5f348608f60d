/// Default target size in megabytes when the caller supplies none.
pub const DEFAULT_TARGET_MB: f64 = 9.0;

/// Kilobytes per megabyte in user-facing size fields.
pub const KB_PER_MB: f64 = 1024.0;
