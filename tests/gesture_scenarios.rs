//! Integration test: clipboard scenarios driven through the public API.
//!
//! Each scenario builds a clipboard with a recording sink and feeds it the same
//! events a front end would.

use versepad::config::GestureConfig;
use versepad::model::EntryId;
use versepad::state::{
    ClipboardModel, GestureController, GestureEvent, GestureOutcome, ManualScheduler,
    MemorySink, Point, PointerId,
};

const FINGER: PointerId = PointerId(0);

fn setup(texts: &[&str]) -> (ClipboardModel, GestureController, MemorySink, Vec<EntryId>) {
    let sink = MemorySink::new();
    let mut clipboard = ClipboardModel::new(Box::new(sink.clone()));
    let ids = texts
        .iter()
        .enumerate()
        .map(|(verse, text)| clipboard.add("gn", 0, verse, text, "Genesis"))
        .collect();
    let controller =
        GestureController::new(GestureConfig::default(), Box::new(ManualScheduler::new()));
    (clipboard, controller, sink, ids)
}

fn swipe(
    controller: &mut GestureController,
    clipboard: &mut ClipboardModel,
    entry: &EntryId,
    dx: f32,
    dy: f32,
) -> GestureOutcome {
    let start = Point::new(300.0, 40.0);
    let end = Point::new(start.x + dx, start.y + dy);
    controller.handle(
        GestureEvent::PointerDown {
            pointer: FINGER,
            entry: entry.clone(),
            at: start,
        },
        clipboard,
    );
    controller.handle(
        GestureEvent::PointerMove {
            pointer: FINGER,
            at: end,
        },
        clipboard,
    );
    controller.handle(
        GestureEvent::PointerUp {
            pointer: FINGER,
            at: end,
            drop_index: None,
        },
        clipboard,
    )
}

#[test]
fn scenario_add_two_then_remove_first() {
    let (mut clipboard, _, sink, _) = setup(&[]);

    clipboard.add("gn", 0, 0, "A", "Genesis");
    clipboard.add("gn", 0, 1, "B", "Genesis");
    assert_eq!(
        sink.last().as_deref(),
        Some("A — Genesis 1:1\nB — Genesis 1:2")
    );

    clipboard.remove_at(0).unwrap();
    assert_eq!(sink.last().as_deref(), Some("B — Genesis 1:2"));
}

#[test]
fn scenario_move_first_to_last() {
    let (mut clipboard, _, sink, _) = setup(&["A", "B", "C"]);

    clipboard.move_to(0, 2).unwrap();

    assert_eq!(
        sink.last().as_deref(),
        Some("B — Genesis 1:2\nC — Genesis 1:3\nA — Genesis 1:1")
    );
}

#[test]
fn scenario_long_swipe_removes_entry() {
    let (mut clipboard, mut controller, sink, ids) = setup(&["A", "B"]);

    let outcome = swipe(&mut controller, &mut clipboard, &ids[0], -120.0, 5.0);

    assert!(matches!(outcome, GestureOutcome::Deleted { .. }));
    assert_eq!(clipboard.position_of(&ids[0]), None);
    assert_eq!(sink.last().as_deref(), Some("B — Genesis 1:2"));
}

#[test]
fn scenario_short_swipe_snaps_back() {
    let (mut clipboard, mut controller, sink, ids) = setup(&["A", "B"]);
    let writes_before = sink.write_count();

    let outcome = swipe(&mut controller, &mut clipboard, &ids[0], -40.0, 0.0);

    assert_eq!(outcome, GestureOutcome::SnappedBack(ids[0].clone()));
    assert_eq!(clipboard.len(), 2);
    assert_eq!(controller.visual(&ids[0]).swipe_offset, 0.0);
    assert_eq!(sink.write_count(), writes_before);
}

#[test]
fn desktop_drag_and_drop_reorders() {
    let (mut clipboard, mut controller, sink, ids) = setup(&["A", "B", "C"]);

    for event in [
        GestureEvent::DragStart {
            entry: ids[2].clone(),
        },
        GestureEvent::DragOver {
            entry: ids[1].clone(),
        },
        GestureEvent::DragOver {
            entry: ids[0].clone(),
        },
        GestureEvent::Drop {
            entry: ids[0].clone(),
        },
        GestureEvent::DragEnd,
    ] {
        controller.handle(event, &mut clipboard);
    }

    assert_eq!(
        sink.last().as_deref(),
        Some("C — Genesis 1:3\nA — Genesis 1:1\nB — Genesis 1:2")
    );
    assert!(!controller.is_active());
}
