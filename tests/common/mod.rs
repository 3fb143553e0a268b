// Shared helpers for building test sessions without a live server.
#![allow(dead_code)]

use std::collections::HashMap;

use siwa_annotator::record::AnnotationRecord;
use siwa_annotator::{
    AnnotationPayload, AnnotatorSession, AppConfig, DatasetInfo, LabelMode, RecordStatus,
    SessionContext, TaskKind,
};

/// A session pointed at a server that is never contacted.
pub fn session(task: TaskKind) -> AnnotatorSession {
    let ctx = SessionContext {
        base_url: "http://localhost:8000".into(),
        token: "test-token".into(),
        user: "tester@example.com".into(),
    };
    let dataset = DatasetInfo {
        id: "ds-test".into(),
        task,
        class_names: vec!["cat".into(), "dog".into(), "bird".into()],
        label_mode: LabelMode::Multi,
    };
    AnnotatorSession::new(&ctx, dataset, &AppConfig::default())
}

/// Session with one file loaded as an empty record and a 1000x1000
/// pixel image viewport at the origin.
pub fn session_with_item(task: TaskKind, path: &str) -> AnnotatorSession {
    let mut s = session(task);
    s.nav.set_files(vec![path.to_string()], HashMap::new());
    let token = s.slot.begin_load(path);
    assert!(s.slot.install(token, AnnotationRecord::empty(task)));
    s.set_viewport(0.0, 0.0, 1000.0, 1000.0);
    s
}

/// Install a record with the given payload on the current item.
pub fn install_payload(s: &mut AnnotatorSession, payload: AnnotationPayload) {
    let path = s.slot.path().expect("an item is loaded").to_string();
    let token = s.slot.begin_load(&path);
    assert!(s.slot.install(
        token,
        AnnotationRecord {
            status: RecordStatus::Unlabeled,
            payload,
        },
    ));
}
