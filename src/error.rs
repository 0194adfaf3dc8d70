//! Error types for plan construction and segment editing.
//!
//! Both kinds are recoverable: a failed build leaves any held plan alone and
//! a failed edit leaves the segment it targeted untouched.

use thiserror::Error;

/// Reasons a plan could not be built from the supplied inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Plans are only built for distances of 3 km and up.
    #[error("distance must be at least {min} km (got {distance} km)")]
    DistanceTooSmall { distance: f64, min: f64 },

    /// Target finish time was zero, negative or not a number.
    #[error("target time must be greater than zero")]
    InvalidTargetTime,

    /// Step distance was zero, negative or not a number.
    #[error("step distance must be a positive number of km (got {0})")]
    InvalidStepDistance(f64),

    /// Pace delta was not a finite number.
    #[error("pace delta must be a finite number of seconds (got {0})")]
    InvalidPaceDelta(f64),

    /// The progression pushed a later segment's pace to zero or below.
    #[error(
        "progression too aggressive: segment {segment} would need a pace of {pace:.1} s/km, reduce the pace delta"
    )]
    NegativePaceOverflow { segment: usize, pace: f64 },

    /// The step is so short relative to the distance that the table would be unusable.
    #[error("plan would need {count} segments (limit {max}), use a longer step")]
    TooManySegments { count: u64, max: usize },
}

/// Reasons a manual pace override was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("no plan loaded")]
    NoPlan,

    #[error("segment {index} does not exist (plan has {len} segments)")]
    InvalidSegmentIndex { index: usize, len: usize },

    #[error("'{0}' is not a pace, expected mm:ss with seconds below 60")]
    MalformedPaceText(String),

    #[error("pace must be greater than 00:00")]
    NonPositivePace,
}
