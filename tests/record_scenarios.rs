// Record lifecycle scenarios: status semantics, stale loads, progress.
// Test: payload mutations and load races on the current-item slot
// Expected: deterministic statuses; stale responses never clobber

mod common;

use common::{install_payload, session_with_item};
use siwa_annotator::record::{AnnotationRecord, RecordSlot, sanitize_pairs};
use siwa_annotator::{
    AnnotationPayload, AnnotationSummary, DetectionBox, GroundingPair, RecordStatus, TaskKind,
    progress_percent,
};

#[test]
fn status_is_derived_from_payload_content() {
    assert_eq!(
        AnnotationPayload::Labels(vec![]).derived_status(),
        RecordStatus::Unlabeled
    );
    assert_eq!(
        AnnotationPayload::Labels(vec!["cat".into()]).derived_status(),
        RecordStatus::Labeled
    );
    assert_eq!(
        AnnotationPayload::Caption("  a dog  ".into()).derived_status(),
        RecordStatus::Labeled
    );
    assert_eq!(
        AnnotationPayload::Caption("   ".into()).derived_status(),
        RecordStatus::Unlabeled
    );
}

#[test]
fn skipped_record_has_an_empty_payload() {
    for task in [
        TaskKind::Classification,
        TaskKind::Detection,
        TaskKind::Grounding,
        TaskKind::Captioning,
        TaskKind::TextClassification,
    ] {
        let record = AnnotationRecord::skipped(task);
        assert_eq!(record.status, RecordStatus::Skipped);
        assert!(record.payload.is_empty());
    }
}

#[test]
fn rapid_navigation_discards_the_older_fetch() {
    let mut slot = RecordSlot::new();
    let token_a = slot.begin_load("a.jpg");
    let token_b = slot.begin_load("b.jpg");

    let record_a = AnnotationRecord {
        status: RecordStatus::Labeled,
        payload: AnnotationPayload::Labels(vec!["stale".into()]),
    };
    // a.jpg's response resolves after b.jpg's load began; it must not
    // clobber the item on screen.
    assert!(!slot.install(token_a, record_a));
    assert_eq!(slot.path(), Some("b.jpg"));
    assert!(slot.record().is_none());

    assert!(slot.install(token_b, AnnotationRecord::empty(TaskKind::Classification)));
    assert!(slot.record().is_some());
}

#[test]
fn draft_mutations_touch_only_the_loaded_record() {
    let mut s = session_with_item(TaskKind::Detection, "imgs/001.jpg");
    install_payload(
        &mut s,
        AnnotationPayload::Boxes(vec![DetectionBox {
            id: "keep".into(),
            label: "cat".into(),
            x: 0.1,
            y: 0.1,
            width: 0.2,
            height: 0.2,
        }]),
    );
    assert!(s.remove_box("keep"));
    assert!(s.slot.record().unwrap().payload.is_empty());
}

#[test]
fn sanitize_is_what_the_server_would_keep() {
    let pairs = vec![
        GroundingPair {
            id: "ok".into(),
            text: "red".into(),
            span_start: 2,
            span_end: 5,
            x: 0.9,
            y: 0.9,
            width: 0.4,
            height: 0.4,
            color: Some("hsl(0, 70%, 45%)".into()),
        },
        GroundingPair {
            id: "bad-span".into(),
            text: "car".into(),
            span_start: 5,
            span_end: 5,
            x: 0.1,
            y: 0.1,
            width: 0.2,
            height: 0.2,
            color: None,
        },
    ];
    let kept = sanitize_pairs(&pairs);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "ok");
    assert!(kept[0].x + kept[0].width <= 1.0 + 1e-6);
    assert!(kept[0].y + kept[0].height <= 1.0 + 1e-6);
}

#[test]
fn progress_percent_edge_cases() {
    let summary = |labeled, total| AnnotationSummary {
        total,
        labeled,
        skipped: 0,
        unlabeled: total - labeled,
        by_user: Default::default(),
    };
    assert_eq!(progress_percent(&summary(0, 0)), 0);
    assert_eq!(progress_percent(&summary(1, 3)), 33);
    assert_eq!(progress_percent(&summary(3, 3)), 100);
    assert_eq!(progress_percent(&summary(199, 200)), 99);
}

#[test]
fn wire_round_trip_preserves_box_fields() {
    let b = DetectionBox {
        id: "b-1".into(),
        label: "car".into(),
        x: 0.25,
        y: 0.5,
        width: 0.1,
        height: 0.2,
    };
    let json = serde_json::to_string(&b).unwrap();
    let back: DetectionBox = serde_json::from_str(&json).unwrap();
    assert_eq!(b, back);

    // Statuses travel lowercase.
    assert_eq!(
        serde_json::to_string(&RecordStatus::Skipped).unwrap(),
        "\"skipped\""
    );
}
