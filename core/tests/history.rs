use rte_core::{HistoryLog, MAX_SNAPSHOTS};

#[test]
fn undo_redo_walks_the_cursor() {
    let mut log = HistoryLog::new("<p>A</p>");
    log.record("<p>AB</p>");
    log.record("<p>ABC</p>");
    assert_eq!(log.len(), 3);

    assert_eq!(log.undo().as_deref(), Some("<p>AB</p>"));
    assert_eq!(log.undo().as_deref(), Some("<p>A</p>"));
    assert_eq!(log.undo(), None);

    assert_eq!(log.redo().as_deref(), Some("<p>AB</p>"));
}

#[test]
fn record_after_undo_discards_the_redo_branch() {
    let mut log = HistoryLog::new("<p>A</p>");
    log.record("<p>AB</p>");
    log.record("<p>ABC</p>");

    log.undo();
    log.undo();
    assert_eq!(log.current(), "<p>A</p>");
    log.redo();
    assert_eq!(log.current(), "<p>AB</p>");

    log.record("<p>X</p>");
    assert_eq!(log.redo(), None);
    assert_eq!(log.current(), "<p>X</p>");
}

#[test]
fn record_is_idempotent_for_the_current_snapshot() {
    let mut log = HistoryLog::new("a");
    log.record("b");
    let len = log.len();
    log.record("b");
    assert_eq!(log.len(), len);
    assert_eq!(log.cursor(), len - 1);
}

#[test]
fn idempotent_record_preserves_the_redo_branch() {
    let mut log = HistoryLog::new("a");
    log.record("b");
    log.undo();
    // Re-recording the value already under the cursor must not truncate.
    log.record("a");
    assert_eq!(log.redo().as_deref(), Some("b"));
}

#[test]
fn log_length_is_bounded() {
    let mut log = HistoryLog::new("s0");
    for i in 1..55 {
        log.record(&format!("s{}", i));
    }
    assert_eq!(log.len(), MAX_SNAPSHOTS);
    assert_eq!(log.current(), "s54");

    // The oldest five snapshots were evicted and are unreachable.
    let mut steps = 0;
    while log.undo().is_some() {
        steps += 1;
    }
    assert_eq!(steps, MAX_SNAPSHOTS - 1);
    assert_eq!(log.current(), "s5");
}

#[test]
fn eviction_keeps_the_redo_distance() {
    let mut log = HistoryLog::new("s0");
    for i in 1..MAX_SNAPSHOTS {
        log.record(&format!("s{}", i));
    }
    assert_eq!(log.len(), MAX_SNAPSHOTS);
    let before = log.redo_depth();

    log.record("overflow");
    assert_eq!(log.len(), MAX_SNAPSHOTS);
    assert_eq!(log.redo_depth(), before);
    assert_eq!(log.current(), "overflow");
    assert_eq!(log.undo().as_deref(), Some("s49"));
}

#[test]
fn undo_at_the_floor_and_redo_at_the_tip_are_noops() {
    let mut log = HistoryLog::new("only");
    assert_eq!(log.undo(), None);
    assert_eq!(log.redo(), None);
    assert_eq!(log.current(), "only");
}
