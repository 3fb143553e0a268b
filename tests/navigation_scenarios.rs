// Navigation scenarios: filters, clamped arrows, jump picker.
// Test: a 4-file dataset with 1 labeled item, unlabeled-only on
// Expected: a 3-item working list starting at 0, arrows clamping at 2

use std::collections::HashMap;

use siwa_annotator::{FileNavigator, NavKey, RecordStatus};

fn statuses(pairs: &[(&str, RecordStatus)]) -> HashMap<String, RecordStatus> {
    pairs
        .iter()
        .map(|(path, status)| (path.to_string(), *status))
        .collect()
}

#[test]
fn unlabeled_only_list_clamps_at_its_end() {
    let mut nav = FileNavigator::new();
    nav.set_files(
        vec![
            "a.jpg".into(),
            "b.jpg".into(),
            "c.jpg".into(),
            "d.jpg".into(),
        ],
        statuses(&[("b.jpg", RecordStatus::Labeled)]),
    );

    // The toggle changes what the server returns; simulate the refetch
    // with the three unlabeled files.
    assert!(nav.toggle_only_unlabeled());
    nav.set_files(
        vec!["a.jpg".into(), "c.jpg".into(), "d.jpg".into()],
        HashMap::new(),
    );
    assert_eq!(nav.index(), 0);

    for _ in 0..3 {
        nav.handle_key(NavKey::ArrowRight, false);
    }
    // A fourth press stays clamped on the last item.
    nav.handle_key(NavKey::ArrowRight, false);
    assert_eq!(nav.index(), 2);
    assert_eq!(nav.current(), Some("d.jpg"));
}

#[test]
fn arrows_are_ignored_while_typing() {
    let mut nav = FileNavigator::new();
    nav.set_files(vec!["a.jpg".into(), "b.jpg".into()], HashMap::new());

    assert!(!nav.handle_key(NavKey::ArrowRight, true));
    assert_eq!(nav.index(), 0);
    assert!(nav.handle_key(NavKey::ArrowRight, false));
    assert!(!nav.handle_key(NavKey::ArrowRight, false));
    assert!(nav.handle_key(NavKey::ArrowLeft, false));
    assert_eq!(nav.index(), 0);
}

#[test]
fn picker_caps_rows_and_keeps_working_list_indices() {
    let mut nav = FileNavigator::new();
    let files: Vec<String> = (0..800).map(|i| format!("scan/{i:04}.png")).collect();
    nav.set_files(files, HashMap::new());

    let rows = nav.picker_entries(600);
    assert_eq!(rows.len(), 600);

    nav.set_search("scan/07");
    let rows = nav.picker_entries(600);
    assert_eq!(rows.len(), 100);
    assert_eq!(rows[0].index, 700);

    // Picking a filtered row jumps in the working list.
    nav.jump_to(rows[0].index);
    assert_eq!(nav.current(), Some("scan/0700.png"));
}

#[test]
fn search_change_resets_the_cursor() {
    let mut nav = FileNavigator::new();
    nav.set_files((0..10).map(|i| format!("{i}.jpg")).collect(), HashMap::new());
    nav.jump_to(6);
    nav.set_search("1");
    assert_eq!(nav.index(), 0);
}

#[test]
fn badges_update_after_save_and_skip() {
    let mut nav = FileNavigator::new();
    nav.set_files(vec!["a.jpg".into(), "b.jpg".into()], HashMap::new());
    assert_eq!(nav.status_of("a.jpg"), RecordStatus::Unlabeled);

    nav.set_status("a.jpg", RecordStatus::Labeled);
    nav.set_status("b.jpg", RecordStatus::Skipped);
    let rows = nav.picker_entries(600);
    assert_eq!(rows[0].status, RecordStatus::Labeled);
    assert_eq!(rows[1].status, RecordStatus::Skipped);
}
