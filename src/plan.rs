//! Plan construction: split a distance into segments and solve the linear
//! pace progression so the segment durations add up to the target time.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::BuildError;
use crate::pace::format_mmss;

pub const MIN_DISTANCE_KM: f64 = 3.0;
pub const DEFAULT_STEP_KM: f64 = 2.0;
pub const DEFAULT_PACE_DELTA: f64 = 0.0;
/// Upper bound on segments per plan. A marathon in 10 m steps fits.
pub const MAX_SEGMENTS: usize = 10_000;
/// Remainders shorter than this are folded into the last full segment.
pub const REMAINDER_EPSILON_KM: f64 = 0.001;
/// Plausible average paces, 2:00/km to 15:00/km.
pub const MIN_PLAUSIBLE_PACE: f64 = 120.0;
pub const MAX_PLAUSIBLE_PACE: f64 = 900.0;

/// One contiguous stretch of the run with its own pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    /// km
    pub distance: f64,
    /// seconds per km
    pub pace: f64,
    /// seconds
    pub duration: f64,
}

impl Segment {
    pub fn new(index: usize, distance: f64, pace: f64) -> Self {
        Self {
            index,
            distance,
            pace,
            duration: pace * distance,
        }
    }

    /// Display id, 1-based.
    pub fn id(&self) -> usize {
        self.index + 1
    }

    pub fn set_pace(&mut self, pace: f64) {
        self.pace = pace;
        self.duration = pace * self.distance;
    }
}

/// Raw numeric inputs for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// km
    pub distance: f64,
    /// seconds
    pub target_time: f64,
    /// km per segment
    pub step_distance: f64,
    /// seconds per km gained on each successive segment
    pub pace_delta: f64,
}

impl PlanRequest {
    pub fn new(distance: f64, target_time: f64) -> Self {
        Self {
            distance,
            target_time,
            step_distance: DEFAULT_STEP_KM,
            pace_delta: DEFAULT_PACE_DELTA,
        }
    }

    /// Average pace implied by distance and target, seconds per km.
    pub fn average_pace(&self) -> f64 {
        self.target_time / self.distance
    }
}

/// Non-fatal findings attached to a successfully built plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    ImplausiblePace { average_pace: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ImplausiblePace { average_pace } => write!(
                f,
                "average pace {}/km looks implausible, check the inputs",
                format_mmss(*average_pace)
            ),
        }
    }
}

/// A solved plan: the request it came from plus its segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    request: PlanRequest,
    base_pace: f64,
    advisory: Option<Advisory>,
    pub(crate) segments: Vec<Segment>,
}

impl Plan {
    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Pace of the first segment, the one every other pace derives from.
    pub fn base_pace(&self) -> f64 {
        self.base_pace
    }

    pub fn advisory(&self) -> Option<Advisory> {
        self.advisory
    }

    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.distance).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

}

/// Builds plans from a [`PlanRequest`].
///
/// ```
/// use pacer::plan::PlanBuilder;
///
/// let plan = PlanBuilder::new(10.0, 3000.0).step_distance(2.0).build().unwrap();
/// assert_eq!(plan.segments().len(), 5);
/// assert!((plan.segments()[0].pace - 300.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlanBuilder {
    request: PlanRequest,
}

impl From<PlanRequest> for PlanBuilder {
    fn from(request: PlanRequest) -> Self {
        Self { request }
    }
}

impl PlanBuilder {
    pub fn new(distance: f64, target_time: f64) -> Self {
        PlanRequest::new(distance, target_time).into()
    }

    pub fn step_distance(mut self, step: f64) -> Self {
        self.request.step_distance = step;
        self
    }

    pub fn pace_delta(mut self, delta: f64) -> Self {
        self.request.pace_delta = delta;
        self
    }

    pub fn build(&self) -> Result<Plan, BuildError> {
        let req = self.request;
        validate(&req)?;

        let average_pace = req.average_pace();
        let advisory = if !(MIN_PLAUSIBLE_PACE..=MAX_PLAUSIBLE_PACE).contains(&average_pace) {
            debug!(
                average_pace,
                distance = req.distance,
                target_time = req.target_time,
                "implausible average pace"
            );
            Some(Advisory::ImplausiblePace { average_pace })
        } else {
            None
        };

        let distances = split_distance(req.distance, req.step_distance)?;
        let weighted_sum: f64 = distances
            .iter()
            .enumerate()
            .map(|(i, d)| i as f64 * req.pace_delta * d)
            .sum();
        let base_pace = (req.target_time + weighted_sum) / req.distance;

        let segments: Vec<Segment> = distances
            .into_iter()
            .enumerate()
            .map(|(i, d)| Segment::new(i, d, base_pace - i as f64 * req.pace_delta))
            .collect();

        if let Some(bad) = segments.iter().find(|s| s.pace <= 0.0) {
            return Err(BuildError::NegativePaceOverflow {
                segment: bad.index,
                pace: bad.pace,
            });
        }

        debug!(
            segments = segments.len(),
            base_pace,
            pace_delta = req.pace_delta,
            "built plan"
        );

        Ok(Plan {
            request: req,
            base_pace,
            advisory,
            segments,
        })
    }
}

fn validate(req: &PlanRequest) -> Result<(), BuildError> {
    // NaN fails every comparison, so test for "not at least" instead of "less than".
    if !(req.distance >= MIN_DISTANCE_KM) || !req.distance.is_finite() {
        return Err(BuildError::DistanceTooSmall {
            distance: req.distance,
            min: MIN_DISTANCE_KM,
        });
    }
    if !(req.target_time > 0.0) || !req.target_time.is_finite() {
        return Err(BuildError::InvalidTargetTime);
    }
    if !(req.step_distance > 0.0) || !req.step_distance.is_finite() {
        return Err(BuildError::InvalidStepDistance(req.step_distance));
    }
    if !req.pace_delta.is_finite() {
        return Err(BuildError::InvalidPaceDelta(req.pace_delta));
    }
    Ok(())
}

/// Cuts `distance` into `step`-long pieces plus a shorter tail.
///
/// A tail within [`REMAINDER_EPSILON_KM`] (or half a step, for steps that
/// short) of a full step counts as one more full step; a tail shorter than
/// the epsilon is folded into the last piece. Every piece comes out strictly
/// positive.
fn split_distance(distance: f64, step: f64) -> Result<Vec<f64>, BuildError> {
    let mut full = (distance / step).floor();
    let mut remainder = distance - full * step;
    if step - remainder < REMAINDER_EPSILON_KM.min(step / 2.0) {
        full += 1.0;
        remainder -= step;
    }
    let has_tail = remainder >= REMAINDER_EPSILON_KM;

    // f64 -> u64 saturates, so absurd inputs still report a finite count
    let count = (full as u64).saturating_add(u64::from(has_tail));
    if count > MAX_SEGMENTS as u64 {
        return Err(BuildError::TooManySegments {
            count,
            max: MAX_SEGMENTS,
        });
    }

    let mut pieces = vec![step; full as usize];
    if has_tail {
        pieces.push(remainder);
    } else if let Some(last) = pieces.last_mut() {
        // under epsilon and above minus half a step here
        *last += remainder;
    }
    Ok(pieces)
}
