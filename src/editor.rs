//! Holds the current plan and applies manual pace overrides to it.

use serde::Serialize;
use tracing::debug;

use crate::error::EditError;
use crate::pace::parse_mmss;
use crate::plan::{Plan, Segment};

/// Estimated finish times further than this from the target get flagged.
pub const DRIFT_THRESHOLD_SECS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum PlanStatus {
    #[strum(serialize = "No plan")]
    NoPlan,
    #[strum(serialize = "Optimized")]
    Optimized,
    #[strum(serialize = "Manually modified")]
    ManuallyModified,
}

/// Aggregates recomputed from the live segment list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub total_duration: f64,
    pub total_distance: f64,
    pub average_pace: f64,
    pub target_time: f64,
    /// `total_duration - target_time`, positive when running late.
    pub drift: f64,
    pub drift_exceeded: bool,
}

#[derive(Debug, Clone)]
pub struct PlanEditor {
    plan: Option<Plan>,
    status: PlanStatus,
    drift_threshold: f64,
}

impl Default for PlanEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanEditor {
    pub fn new() -> Self {
        Self::with_drift_threshold(DRIFT_THRESHOLD_SECS)
    }

    pub fn with_drift_threshold(drift_threshold: f64) -> Self {
        Self {
            plan: None,
            status: PlanStatus::NoPlan,
            drift_threshold,
        }
    }

    /// Replaces whatever was held and marks the new plan as optimized.
    pub fn load(&mut self, plan: Plan) {
        debug!(segments = plan.segments().len(), "loaded plan");
        self.plan = Some(plan);
        self.status = PlanStatus::Optimized;
    }

    pub fn clear(&mut self) {
        self.plan = None;
        self.status = PlanStatus::NoPlan;
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        self.plan.as_ref().map(|p| p.segments()).unwrap_or(&[])
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// Overrides one segment's pace from `mm:ss` text.
    pub fn set_segment_pace(&mut self, index: usize, text: &str) -> Result<(), EditError> {
        // Index problems win over text problems so callers learn about the
        // more fundamental mistake first.
        self.check_index(index)?;
        let secs = parse_mmss(text).ok_or_else(|| {
            debug!(index, text, "rejected malformed pace");
            EditError::MalformedPaceText(text.trim().to_string())
        })?;
        self.set_segment_pace_secs(index, secs as f64)
    }

    /// Overrides one segment's pace with an already parsed value.
    pub fn set_segment_pace_secs(&mut self, index: usize, pace: f64) -> Result<(), EditError> {
        self.check_index(index)?;
        if !(pace > 0.0) || !pace.is_finite() {
            debug!(index, pace, "rejected non-positive pace");
            return Err(EditError::NonPositivePace);
        }

        let plan = self.plan.as_mut().ok_or(EditError::NoPlan)?;
        let seg = &mut plan.segments[index];
        seg.set_pace(pace);
        debug!(index, pace, duration = seg.duration, "segment pace overridden");
        self.status = PlanStatus::ManuallyModified;
        Ok(())
    }

    /// Sums the current segments. `None` when no plan is held.
    pub fn recompute_totals(&self) -> Option<Totals> {
        let plan = self.plan.as_ref()?;
        let total_duration: f64 = plan.segments().iter().map(|s| s.duration).sum();
        let total_distance: f64 = plan.segments().iter().map(|s| s.distance).sum();
        let target_time = plan.request().target_time;
        let drift = total_duration - target_time;

        Some(Totals {
            total_duration,
            total_distance,
            average_pace: total_duration / total_distance,
            target_time,
            drift,
            drift_exceeded: drift.abs() > self.drift_threshold,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        let plan = self.plan.as_ref().ok_or(EditError::NoPlan)?;
        let len = plan.segments().len();
        if index >= len {
            return Err(EditError::InvalidSegmentIndex { index, len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanBuilder;
    use assert_matches::assert_matches;

    fn ten_k_editor() -> PlanEditor {
        let mut editor = PlanEditor::new();
        editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());
        editor
    }

    #[test]
    fn test_new_editor_has_no_plan() {
        let editor = PlanEditor::new();
        assert_eq!(editor.status(), PlanStatus::NoPlan);
        assert!(editor.plan().is_none());
        assert!(editor.segments().is_empty());
        assert_eq!(editor.recompute_totals(), None);
    }

    #[test]
    fn test_load_marks_optimized() {
        let editor = ten_k_editor();
        assert_eq!(editor.status(), PlanStatus::Optimized);
        assert_eq!(editor.segments().len(), 5);
    }

    #[test]
    fn test_edit_updates_segment_and_status() {
        let mut editor = ten_k_editor();
        editor.set_segment_pace(2, "4:30").unwrap();

        let seg = &editor.segments()[2];
        assert_eq!(seg.pace, 270.0);
        assert_eq!(seg.duration, 540.0);
        assert_eq!(editor.status(), PlanStatus::ManuallyModified);
    }

    #[test]
    fn test_edit_without_plan_stays_no_plan() {
        let mut editor = PlanEditor::new();
        assert_matches!(editor.set_segment_pace(0, "5:00"), Err(EditError::NoPlan));
        assert_eq!(editor.status(), PlanStatus::NoPlan);
    }

    #[test]
    fn test_invalid_index_leaves_plan_untouched() {
        let mut editor = ten_k_editor();
        let before = editor.segments().to_vec();

        assert_matches!(
            editor.set_segment_pace(5, "5:00"),
            Err(EditError::InvalidSegmentIndex { index: 5, len: 5 })
        );
        assert_eq!(editor.segments(), before.as_slice());
        assert_eq!(editor.status(), PlanStatus::Optimized);
    }

    #[test]
    fn test_malformed_text_leaves_plan_untouched() {
        let mut editor = ten_k_editor();
        let before = editor.segments().to_vec();

        assert_matches!(
            editor.set_segment_pace(1, "5:99"),
            Err(EditError::MalformedPaceText(t)) if t == "5:99"
        );
        assert_matches!(
            editor.set_segment_pace(1, "fast"),
            Err(EditError::MalformedPaceText(_))
        );
        assert_eq!(editor.segments(), before.as_slice());
        assert_eq!(editor.status(), PlanStatus::Optimized);
    }

    #[test]
    fn test_zero_pace_is_rejected() {
        let mut editor = ten_k_editor();
        assert_matches!(
            editor.set_segment_pace(0, "00:00"),
            Err(EditError::NonPositivePace)
        );
        assert_matches!(
            editor.set_segment_pace_secs(0, -10.0),
            Err(EditError::NonPositivePace)
        );
        assert_eq!(editor.segments()[0].pace, 300.0);
        assert_eq!(editor.status(), PlanStatus::Optimized);
    }

    #[test]
    fn test_status_only_returns_to_optimized_on_load() {
        let mut editor = ten_k_editor();
        editor.set_segment_pace(0, "5:10").unwrap();
        editor.set_segment_pace(0, "5:00").unwrap();
        // Same numbers as the optimized plan, still manually modified
        assert_eq!(editor.status(), PlanStatus::ManuallyModified);

        editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());
        assert_eq!(editor.status(), PlanStatus::Optimized);
    }

    #[test]
    fn test_clear_drops_plan() {
        let mut editor = ten_k_editor();
        editor.set_segment_pace(0, "5:10").unwrap();
        editor.clear();
        assert_eq!(editor.status(), PlanStatus::NoPlan);
        assert!(editor.plan().is_none());
    }

    #[test]
    fn test_totals_match_segment_sum_exactly() {
        let mut editor = PlanEditor::new();
        editor.load(
            PlanBuilder::new(21.0975, 6300.0)
                .step_distance(1.0)
                .pace_delta(1.5)
                .build()
                .unwrap(),
        );
        editor.set_segment_pace(3, "4:41").unwrap();
        editor.set_segment_pace(17, "4:02").unwrap();
        editor.set_segment_pace(21, "3:55").unwrap();

        let totals = editor.recompute_totals().unwrap();
        let sum: f64 = editor.segments().iter().map(|s| s.duration).sum();
        assert_eq!(totals.total_duration, sum);
        assert_eq!(totals.average_pace, sum / totals.total_distance);
    }

    #[test]
    fn test_totals_right_after_load_have_no_drift() {
        let editor = ten_k_editor();
        let totals = editor.recompute_totals().unwrap();
        assert!((totals.total_duration - 3000.0).abs() < 1e-9);
        assert!((totals.average_pace - 300.0).abs() < 1e-9);
        assert!(!totals.drift_exceeded);
    }

    #[test]
    fn test_drift_flag_threshold() {
        let mut editor = ten_k_editor();

        // +30 s per km on 2 km = +60 s: exactly at the threshold, not over it
        editor.set_segment_pace(0, "5:30").unwrap();
        let totals = editor.recompute_totals().unwrap();
        assert!((totals.drift - 60.0).abs() < 1e-9);
        assert!(!totals.drift_exceeded);

        editor.set_segment_pace(1, "5:01").unwrap();
        let totals = editor.recompute_totals().unwrap();
        assert!((totals.drift - 62.0).abs() < 1e-9);
        assert!(totals.drift_exceeded);

        // Running ahead of target counts too
        let mut editor = ten_k_editor();
        editor.set_segment_pace(0, "4:00").unwrap();
        let totals = editor.recompute_totals().unwrap();
        assert!(totals.drift < 0.0);
        assert!(totals.drift_exceeded);
    }

    #[test]
    fn test_custom_drift_threshold() {
        let mut editor = PlanEditor::with_drift_threshold(10.0);
        editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());
        editor.set_segment_pace(0, "5:06").unwrap();
        assert!(editor.recompute_totals().unwrap().drift_exceeded);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PlanStatus::Optimized.to_string(), "Optimized");
        assert_eq!(PlanStatus::ManuallyModified.to_string(), "Manually modified");
        assert_eq!(PlanStatus::NoPlan.to_string(), "No plan");
    }
}
