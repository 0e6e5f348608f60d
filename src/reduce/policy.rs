//! Attempt-indexed degradation schedule.
//!
//! Each row covers attempts up to and including `up_to`; lookup takes the
//! first matching row. Keeping the schedule as data means the scale factors
//! and save profiles can be tested without running the loop.

use crate::pdf::serialize::{SaveProfile, DEFAULT_OBJECTS_PER_STREAM};

/// Upper bound on degradation attempts for a single reduction.
pub const MAX_ATTEMPTS: u32 = 15;

/// Content scaling starts after this attempt.
pub const SCALE_AFTER: u32 = 1;

/// Page dropping may start after this attempt.
pub const SUBSET_AFTER: u32 = 5;

/// Page dimensions start shrinking after this attempt.
pub const SHRINK_BOX_AFTER: u32 = 7;

/// Document metadata is stripped after this attempt.
pub const STRIP_METADATA_AFTER: u32 = 8;

/// Page annotations are stripped after this attempt.
pub const STRIP_ANNOTATIONS_AFTER: u32 = 10;

/// The working document is re-parsed from the latest output every this many
/// attempts, so degradation compounds.
pub const RELOAD_INTERVAL: u32 = 3;

/// Fraction of the original pages kept when the subset rule kicks in.
pub const SUBSET_KEEP_FRACTION: f64 = 0.8;

/// Compression ratios below this enable page dropping.
pub const SUBSET_RATIO_CUTOFF: f64 = 0.3;

/// Compression ratios below this trade the best attempt for the placeholder
/// on exhaustion.
pub const PLACEHOLDER_RATIO_CUTOFF: f64 = 0.1;

/// Per-attempt shrink applied to page dimensions, floored at 0.7.
const BOX_SHRINK_STEP: f32 = 0.05;
const BOX_SHRINK_FLOOR: f32 = 0.7;

/// How page content is scaled within one attempt tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentScale {
    /// Leave content untouched.
    None,
    /// Fixed uniform factor.
    Fixed(f32),
    /// `base - step * attempt`, never below `floor`.
    Tapering { base: f32, step: f32, floor: f32 },
}

impl ContentScale {
    /// Resolve the scale factor for a 1-based attempt index.
    pub fn factor(&self, attempt: u32) -> Option<f32> {
        match *self {
            ContentScale::None => None,
            ContentScale::Fixed(factor) => Some(factor),
            ContentScale::Tapering { base, step, floor } => {
                Some((base - step * attempt as f32).max(floor))
            }
        }
    }
}

/// One row of the degradation schedule.
#[derive(Debug, Clone, Copy)]
pub struct AttemptTier {
    pub up_to: u32,
    pub scale: ContentScale,
    pub profile: SaveProfile,
}

/// The full schedule, ordered by `up_to`.
pub static SCHEDULE: [AttemptTier; 5] = [
    AttemptTier {
        up_to: 1,
        scale: ContentScale::None,
        profile: SaveProfile {
            object_streams: true,
            objects_per_stream: DEFAULT_OBJECTS_PER_STREAM,
            refresh_field_appearances: true,
        },
    },
    AttemptTier {
        up_to: 3,
        scale: ContentScale::Fixed(0.95),
        profile: SaveProfile {
            object_streams: true,
            objects_per_stream: DEFAULT_OBJECTS_PER_STREAM,
            refresh_field_appearances: true,
        },
    },
    AttemptTier {
        up_to: 6,
        scale: ContentScale::Fixed(0.85),
        profile: SaveProfile {
            object_streams: true,
            objects_per_stream: 10,
            refresh_field_appearances: true,
        },
    },
    AttemptTier {
        up_to: 9,
        scale: ContentScale::Fixed(0.75),
        profile: SaveProfile {
            object_streams: false,
            objects_per_stream: 5,
            refresh_field_appearances: true,
        },
    },
    AttemptTier {
        up_to: MAX_ATTEMPTS,
        scale: ContentScale::Tapering {
            base: 0.9,
            step: 0.03,
            floor: 0.5,
        },
        profile: SaveProfile {
            object_streams: false,
            objects_per_stream: 1,
            refresh_field_appearances: false,
        },
    },
];

/// Look up the schedule row for a 1-based attempt index.
pub fn tier_for(attempt: u32) -> &'static AttemptTier {
    SCHEDULE
        .iter()
        .find(|tier| attempt <= tier.up_to)
        .unwrap_or(&SCHEDULE[SCHEDULE.len() - 1])
}

/// Dimension shrink factor for one attempt, if any.
pub fn page_box_factor(attempt: u32) -> Option<f32> {
    if attempt <= SHRINK_BOX_AFTER {
        return None;
    }
    let factor = 1.0 - (attempt - SHRINK_BOX_AFTER) as f32 * BOX_SHRINK_STEP;
    Some(factor.max(BOX_SHRINK_FLOOR))
}
