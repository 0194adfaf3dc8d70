use assert_matches::assert_matches;
use itertools::Itertools;

use pacer::pace::{format_mmss, parse_mmss};
use pacer::{BuildError, EditError, PlanBuilder, PlanEditor, PlanStatus};

#[test]
fn ten_k_in_fifty_minutes_is_five_even_splits() {
    let plan = PlanBuilder::new(10.0, 3000.0)
        .step_distance(2.0)
        .pace_delta(0.0)
        .build()
        .unwrap();

    assert_eq!(plan.segments().len(), 5);
    for seg in plan.segments() {
        assert!((seg.distance - 2.0).abs() < 1e-12);
        assert!((seg.pace - 300.0).abs() < 1e-9);
        assert!((seg.duration - 600.0).abs() < 1e-9);
        assert_eq!(format_mmss(seg.pace), "05:00");
        assert_eq!(format_mmss(seg.duration), "10:00");
    }
}

#[test]
fn marathon_negative_split_hits_target() {
    // 3:30 marathon, 1 km splits, each a second faster
    let plan = PlanBuilder::new(42.195, 12600.0)
        .step_distance(1.0)
        .pace_delta(1.0)
        .build()
        .unwrap();

    assert_eq!(plan.segments().len(), 43);
    let total: f64 = plan.segments().iter().map(|s| s.duration).sum();
    assert!((total - 12600.0).abs() / 12600.0 < 1e-6);
    assert!(plan
        .segments()
        .iter()
        .tuple_windows()
        .all(|(a, b)| (a.pace - b.pace - 1.0).abs() < 1e-9));
    assert!(plan.segments()[..42]
        .iter()
        .all(|s| (s.distance - 1.0).abs() < 1e-9));
}

#[test]
fn build_failures_return_no_plan() {
    assert_matches!(
        PlanBuilder::new(10.0, 1800.0)
            .step_distance(1.0)
            .pace_delta(120.0)
            .build(),
        Err(BuildError::NegativePaceOverflow { .. })
    );
    assert_matches!(
        PlanBuilder::new(2.9, 1800.0).build(),
        Err(BuildError::DistanceTooSmall { .. })
    );
    assert_matches!(
        PlanBuilder::new(10.0, 0.0).build(),
        Err(BuildError::InvalidTargetTime)
    );
}

#[test]
fn failed_build_does_not_disturb_loaded_plan() {
    let mut editor = PlanEditor::new();
    editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());
    editor.set_segment_pace(0, "4:50").unwrap();

    if let Ok(plan) = PlanBuilder::new(2.0, 600.0).build() {
        editor.load(plan);
    }

    assert_eq!(editor.status(), PlanStatus::ManuallyModified);
    assert_eq!(editor.segments()[0].pace, 290.0);
}

#[test]
fn pace_text_roundtrip_and_rejection() {
    for secs in [185u32, 240, 299, 300, 359, 600] {
        assert_eq!(parse_mmss(&format_mmss(secs as f64)), Some(secs));
    }

    let mut editor = PlanEditor::new();
    editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());
    assert_matches!(
        editor.set_segment_pace(0, "5:99"),
        Err(EditError::MalformedPaceText(_))
    );
}

#[test]
fn totals_equal_live_segment_sum_after_edits() {
    let mut editor = PlanEditor::new();
    editor.load(
        PlanBuilder::new(15.3, 4590.0)
            .step_distance(2.5)
            .pace_delta(4.0)
            .build()
            .unwrap(),
    );

    let edits = [(0, "5:20"), (3, "4:55"), (6, "4:31"), (3, "5:02")];
    for (i, text) in edits {
        editor.set_segment_pace(i, text).unwrap();
        let totals = editor.recompute_totals().unwrap();
        let sum: f64 = editor.segments().iter().map(|s| s.duration).sum();
        assert_eq!(totals.total_duration, sum);
    }
    assert_eq!(editor.segments()[3].pace, 302.0);
    assert_eq!(editor.status(), PlanStatus::ManuallyModified);
}
