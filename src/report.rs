//! Display-ready rows and summary for a plan held by the editor.

use serde::Serialize;

use crate::editor::PlanEditor;
use crate::pace::{format_hhmm, format_mmss};
use crate::plan::Segment;

/// One table row, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRow {
    pub id: usize,
    /// km covered at the end of this segment
    pub cumulative_distance: f64,
    pub distance: f64,
    pub pace: String,
    pub duration: String,
}

/// Headline numbers shown above the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub distance: f64,
    pub average_pace: String,
    pub target_time: String,
    pub estimated_time: String,
    pub status: String,
    pub drift_exceeded: bool,
    pub advisory: Option<String>,
}

pub fn present_rows(segments: &[Segment]) -> Vec<PlanRow> {
    segments
        .iter()
        .scan(0.0, |covered, seg| {
            *covered += seg.distance;
            Some(PlanRow {
                id: seg.id(),
                cumulative_distance: *covered,
                distance: seg.distance,
                pace: format_mmss(seg.pace),
                duration: format_mmss(seg.duration),
            })
        })
        .collect()
}

/// Summary from the editor's live state. Average pace and estimated time come
/// from the recomputed totals, so they track manual edits.
pub fn present_summary(editor: &PlanEditor) -> Option<PlanSummary> {
    let plan = editor.plan()?;
    let totals = editor.recompute_totals()?;
    Some(PlanSummary {
        distance: plan.request().distance,
        average_pace: format_mmss(totals.average_pace),
        target_time: format_hhmm(totals.target_time),
        estimated_time: format_hhmm(totals.total_duration),
        status: editor.status().to_string(),
        drift_exceeded: totals.drift_exceeded,
        advisory: plan.advisory().map(|a| a.to_string()),
    })
}
