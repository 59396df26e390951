//! Tests for the gesture state machine.

use super::*;
use crate::state::sink::MemorySink;
use crate::state::timer::ManualScheduler;
use std::time::Duration;

const FINGER: PointerId = PointerId(1);

struct Fixture {
    controller: GestureController,
    clipboard: ClipboardModel,
    scheduler: ManualScheduler,
    ids: Vec<EntryId>,
}

impl Fixture {
    fn with_entries(labels: &[&str]) -> Self {
        let scheduler = ManualScheduler::new();
        let controller =
            GestureController::new(GestureConfig::default(), Box::new(scheduler.clone()));
        let mut clipboard = ClipboardModel::new(Box::new(MemorySink::new()));
        let ids = labels
            .iter()
            .enumerate()
            .map(|(i, label)| clipboard.add("gn", 0, i, label, "Genesis"))
            .collect();
        Self {
            controller,
            clipboard,
            scheduler,
            ids,
        }
    }

    fn send(&mut self, event: GestureEvent) -> GestureOutcome {
        self.controller.handle(event, &mut self.clipboard)
    }

    fn down(&mut self, entry: usize, x: f32, y: f32) -> GestureOutcome {
        let entry = self.ids[entry].clone();
        self.send(GestureEvent::PointerDown {
            pointer: FINGER,
            entry,
            at: Point::new(x, y),
        })
    }

    fn move_to(&mut self, x: f32, y: f32) -> GestureOutcome {
        self.send(GestureEvent::PointerMove {
            pointer: FINGER,
            at: Point::new(x, y),
        })
    }

    fn up(&mut self, x: f32, y: f32, drop_index: Option<usize>) -> GestureOutcome {
        self.send(GestureEvent::PointerUp {
            pointer: FINGER,
            at: Point::new(x, y),
            drop_index,
        })
    }

    fn fire_timer(&mut self) -> GestureOutcome {
        let (token, _) = self.scheduler.last_scheduled().expect("timer scheduled");
        self.send(GestureEvent::LongPressElapsed(token))
    }

    fn labels(&self) -> Vec<String> {
        self.clipboard
            .entries()
            .iter()
            .map(|e| e.text().split(" — ").next().unwrap_or_default().to_string())
            .collect()
    }
}

// ===== Swipe =====

#[test]
fn long_swipe_left_deletes_entry() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(0, 200.0, 50.0);
    f.move_to(140.0, 53.0);
    f.move_to(80.0, 55.0);

    let outcome = f.up(80.0, 55.0, None);

    assert_eq!(
        outcome,
        GestureOutcome::Deleted {
            entry: f.ids[0].clone(),
            became_empty: false,
        }
    );
    assert_eq!(f.labels(), ["B"]);
}

#[test]
fn short_swipe_snaps_back() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 200.0, 50.0);
    f.move_to(160.0, 50.0);
    assert_eq!(f.controller.visual(&f.ids[0]).swipe_offset, -40.0);

    let outcome = f.up(160.0, 50.0, None);

    assert_eq!(outcome, GestureOutcome::SnappedBack(f.ids[0].clone()));
    assert_eq!(f.clipboard.len(), 1);
    assert_eq!(f.controller.visual(&f.ids[0]), ItemVisual::default());
}

#[test]
fn swipe_with_vertical_drift_does_not_delete() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 200.0, 50.0);
    f.move_to(100.0, 90.0);

    let outcome = f.up(100.0, 90.0, None);

    assert_eq!(outcome, GestureOutcome::SnappedBack(f.ids[0].clone()));
    assert_eq!(f.clipboard.len(), 1);
}

#[test]
fn swipe_offset_is_clamped_and_leftward_only() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 200.0, 50.0);

    f.move_to(20.0, 50.0);
    assert_eq!(f.controller.visual(&f.ids[0]).swipe_offset, -100.0);

    f.move_to(260.0, 50.0);
    assert_eq!(f.controller.visual(&f.ids[0]).swipe_offset, 0.0);
}

#[test]
fn deleting_last_entry_reports_became_empty() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 200.0, 50.0);
    f.move_to(50.0, 50.0);

    let outcome = f.up(50.0, 50.0, None);

    assert!(matches!(
        outcome,
        GestureOutcome::Deleted {
            became_empty: true,
            ..
        }
    ));
    assert!(f.clipboard.is_empty());
}

#[test]
fn movement_past_jitter_cancels_long_press() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 200.0, 50.0);
    let (token, delay) = f.scheduler.last_scheduled().unwrap();
    assert_eq!(delay, Duration::from_millis(300));

    f.move_to(205.0, 52.0);
    assert!(!f.scheduler.is_cancelled(token), "within jitter");

    f.move_to(185.0, 50.0);
    assert!(f.scheduler.is_cancelled(token));

    // The timer firing anyway (already queued) is ignored.
    assert_eq!(f.fire_timer(), GestureOutcome::Ignored);
    assert!(!f.controller.visual(&f.ids[0]).lifted);
}

// ===== Tap and long press =====

#[test]
fn press_and_release_in_place_is_a_tap() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 10.0, 10.0);
    f.move_to(13.0, 12.0);

    assert_eq!(f.up(13.0, 12.0, Some(0)), GestureOutcome::Tapped(f.ids[0].clone()));
    assert!(f.scheduler.pending().is_empty());
    assert!(!f.controller.is_active());
}

#[test]
fn long_press_lifts_item_and_drop_reorders() {
    let mut f = Fixture::with_entries(&["A", "B", "C"]);
    f.down(0, 10.0, 10.0);

    assert_eq!(f.fire_timer(), GestureOutcome::DragArmed(f.ids[0].clone()));
    assert!(f.controller.visual(&f.ids[0]).lifted);

    f.move_to(10.0, 90.0);
    let outcome = f.up(10.0, 90.0, Some(2));

    assert_eq!(outcome, GestureOutcome::Reordered { from: 0, to: 2 });
    assert_eq!(f.labels(), ["B", "C", "A"]);
    assert!(!f.controller.visual(&f.ids[0]).lifted);
}

#[test]
fn long_press_release_without_target_is_noop() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(1, 10.0, 10.0);
    f.fire_timer();

    let outcome = f.up(400.0, 400.0, None);

    assert_eq!(outcome, GestureOutcome::DragReleased(f.ids[1].clone()));
    assert_eq!(f.labels(), ["A", "B"]);
}

#[test]
fn drag_movement_never_swipes() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(0, 200.0, 10.0);
    f.fire_timer();
    f.move_to(20.0, 10.0);

    assert_eq!(f.controller.visual(&f.ids[0]).swipe_offset, 0.0);
    assert_eq!(f.up(20.0, 10.0, None), GestureOutcome::DragReleased(f.ids[0].clone()));
    assert_eq!(f.clipboard.len(), 2);
}

#[test]
fn cancel_ends_session_and_timer() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 10.0, 10.0);
    let (token, _) = f.scheduler.last_scheduled().unwrap();

    assert_eq!(
        f.send(GestureEvent::PointerCancel { pointer: FINGER }),
        GestureOutcome::Cancelled
    );
    assert!(f.scheduler.is_cancelled(token));
    assert_eq!(f.up(10.0, 10.0, None), GestureOutcome::Ignored);
}

// ===== Identity races =====

#[test]
fn entry_removed_mid_swipe_is_discarded() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(1, 200.0, 10.0);
    f.move_to(50.0, 10.0);
    f.clipboard.remove_at(1).unwrap();

    assert_eq!(f.up(50.0, 10.0, None), GestureOutcome::Discarded);
    assert_eq!(f.labels(), ["A"]);
}

#[test]
fn swipe_deletes_entry_at_its_new_position() {
    let mut f = Fixture::with_entries(&["A", "B", "C"]);
    f.down(2, 200.0, 10.0);
    f.move_to(90.0, 10.0);
    // Another actor moves C to the front mid-gesture.
    f.clipboard.move_to(2, 0).unwrap();

    f.up(90.0, 10.0, None);

    assert_eq!(f.labels(), ["A", "B"]);
}

#[test]
fn timer_for_removed_entry_is_discarded() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(0, 10.0, 10.0);
    f.clipboard.remove_at(0).unwrap();

    assert_eq!(f.fire_timer(), GestureOutcome::Discarded);
    assert!(!f.controller.is_active());
}

#[test]
fn second_pointer_on_same_item_is_ignored() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 10.0, 10.0);

    let second = f.send(GestureEvent::PointerDown {
        pointer: PointerId(2),
        entry: f.ids[0].clone(),
        at: Point::new(50.0, 10.0),
    });

    assert_eq!(second, GestureOutcome::Ignored);
    assert_eq!(f.scheduler.pending().len(), 1);
}

#[test]
fn pointers_on_different_items_are_independent() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    f.down(0, 200.0, 10.0);
    f.send(GestureEvent::PointerDown {
        pointer: PointerId(2),
        entry: f.ids[1].clone(),
        at: Point::new(200.0, 60.0),
    });

    f.send(GestureEvent::PointerMove {
        pointer: PointerId(2),
        at: Point::new(60.0, 60.0),
    });
    let outcome = f.send(GestureEvent::PointerUp {
        pointer: PointerId(2),
        at: Point::new(60.0, 60.0),
        drop_index: None,
    });

    assert!(matches!(outcome, GestureOutcome::Deleted { .. }));
    assert_eq!(f.up(200.0, 10.0, None), GestureOutcome::Tapped(f.ids[0].clone()));
}

#[test]
fn pointer_down_on_unknown_entry_is_ignored() {
    let mut f = Fixture::with_entries(&["A"]);
    let ghost = EntryId::new("ghost").unwrap();

    let outcome = f.send(GestureEvent::PointerDown {
        pointer: FINGER,
        entry: ghost,
        at: Point::default(),
    });

    assert_eq!(outcome, GestureOutcome::Ignored);
    assert!(f.scheduler.last_scheduled().is_none());
}

#[test]
fn dropping_controller_cancels_pending_timers() {
    let mut f = Fixture::with_entries(&["A"]);
    f.down(0, 10.0, 10.0);
    let (token, _) = f.scheduler.last_scheduled().unwrap();

    drop(f.controller);

    assert!(f.scheduler.is_cancelled(token));
}

// ===== Desktop drag and drop =====

#[test]
fn desktop_drop_moves_source_to_target() {
    let mut f = Fixture::with_entries(&["A", "B", "C"]);
    let (a, c) = (f.ids[0].clone(), f.ids[2].clone());

    assert_eq!(
        f.send(GestureEvent::DragStart { entry: a.clone() }),
        GestureOutcome::DragArmed(a.clone())
    );
    assert!(f.controller.visual(&a).lifted);
    assert_eq!(
        f.send(GestureEvent::DragOver { entry: c.clone() }),
        GestureOutcome::DragAccepted
    );
    assert_eq!(
        f.send(GestureEvent::Drop { entry: c }),
        GestureOutcome::Reordered { from: 0, to: 2 }
    );
    assert_eq!(f.send(GestureEvent::DragEnd), GestureOutcome::Ignored);
    assert_eq!(f.labels(), ["B", "C", "A"]);
}

#[test]
fn desktop_drag_end_without_drop_changes_nothing() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    let b = f.ids[1].clone();
    f.send(GestureEvent::DragStart { entry: b.clone() });

    assert_eq!(f.send(GestureEvent::DragEnd), GestureOutcome::DragReleased(b));
    assert_eq!(f.labels(), ["A", "B"]);
    assert!(!f.controller.is_active());
}

#[test]
fn drop_without_source_is_ignored() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    let a = f.ids[0].clone();
    assert_eq!(f.send(GestureEvent::Drop { entry: a }), GestureOutcome::Ignored);
}

#[test]
fn drop_on_removed_target_is_discarded() {
    let mut f = Fixture::with_entries(&["A", "B"]);
    let (a, b) = (f.ids[0].clone(), f.ids[1].clone());
    f.send(GestureEvent::DragStart { entry: a });
    f.clipboard.remove_at(1).unwrap();

    assert_eq!(f.send(GestureEvent::Drop { entry: b }), GestureOutcome::Discarded);
    assert!(!f.controller.is_active());
}
