//! Gesture state machine for clipboard list items.
//!
//! Turns raw pointer and drag-and-drop events into clipboard mutations. Two input
//! paths are supported:
//!
//! - **Desktop drag-and-drop**: `DragStart` arms a drag source, `Drop` on another item
//!   moves the source there, `DragEnd` without a drop disarms it.
//! - **Touch / pointer**: `PointerDown` starts a session with a long-press timer.
//!   Moving past the jitter threshold first turns the session into a swipe (left only,
//!   offset clamped); releasing past the delete threshold removes the entry, anything
//!   less snaps back. If the timer fires first the item is lifted for reordering and
//!   the release position (resolved by the caller from list geometry) is the drop
//!   target.
//!
//! Sessions remember the entry's [`EntryId`], not its position. Positions are looked
//! up again when a gesture commits; if the entry has disappeared in the meantime the
//! gesture is discarded.

use super::clipboard::ClipboardModel;
use super::timer::{LongPressScheduler, SessionToken, TimerGuard};
use crate::config::GestureConfig;
use crate::model::EntryId;
use tracing::{debug, error};

/// Pointer coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Point at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Distinguishes simultaneous pointers (touch points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Input to [`GestureController::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// A pointer touched an item.
    PointerDown {
        /// Which pointer.
        pointer: PointerId,
        /// Entry under the pointer.
        entry: EntryId,
        /// Where it landed.
        at: Point,
    },
    /// A pointer moved.
    PointerMove {
        /// Which pointer.
        pointer: PointerId,
        /// New position.
        at: Point,
    },
    /// A pointer lifted.
    PointerUp {
        /// Which pointer.
        pointer: PointerId,
        /// Release position.
        at: Point,
        /// List position under the pointer, if any.
        drop_index: Option<usize>,
    },
    /// The platform took the pointer away.
    PointerCancel {
        /// Which pointer.
        pointer: PointerId,
    },
    /// A long-press timer fired.
    LongPressElapsed(SessionToken),
    /// Desktop drag began on an item.
    DragStart {
        /// Dragged entry.
        entry: EntryId,
    },
    /// Desktop drag hovered an item.
    DragOver {
        /// Entry under the cursor.
        entry: EntryId,
    },
    /// Desktop drop onto an item.
    Drop {
        /// Entry dropped on.
        entry: EntryId,
    },
    /// Desktop drag finished, with or without a drop.
    DragEnd,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Consumed; the gesture is still in progress.
    Pending,
    /// Press and release without significant movement.
    Tapped(EntryId),
    /// The entry became a drag source (long press or desktop drag start).
    DragArmed(EntryId),
    /// A drag-over was accepted as a potential drop target.
    DragAccepted,
    /// An entry moved from `from` to `to`.
    Reordered {
        /// Previous position.
        from: usize,
        /// New position.
        to: usize,
    },
    /// A swipe removed `entry`; `became_empty` when it was the last one.
    Deleted {
        /// The removed entry.
        entry: EntryId,
        /// The clipboard is now empty.
        became_empty: bool,
    },
    /// A swipe was released short of the delete threshold.
    SnappedBack(EntryId),
    /// A drag ended without a drop target.
    DragReleased(EntryId),
    /// The pointer was cancelled by the platform.
    Cancelled,
    /// The entry the gesture started on no longer exists.
    Discarded,
    /// Not relevant to any session (stale timer, second pointer, unknown entry).
    Ignored,
}

/// Feedback state of one list item.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemVisual {
    /// Horizontal offset in `[-max_swipe_px, 0]`.
    pub swipe_offset: f32,
    /// The item is being dragged (draw it scaled / translucent).
    pub lifted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PendingLongPress,
    Dragging,
    Swiping,
}

#[derive(Debug)]
struct Session {
    pointer: PointerId,
    entry: EntryId,
    start: Point,
    token: SessionToken,
    phase: Phase,
    swipe_offset: f32,
    timer: Option<TimerGuard>,
}

/// Per-item gesture sessions plus the desktop drag source.
pub struct GestureController {
    config: GestureConfig,
    scheduler: Box<dyn LongPressScheduler>,
    sessions: Vec<Session>,
    drag_source: Option<EntryId>,
    next_token: u64,
}

impl std::fmt::Debug for GestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureController")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .field("drag_source", &self.drag_source)
            .finish_non_exhaustive()
    }
}

impl GestureController {
    /// Controller with the given thresholds and timer source.
    pub fn new(config: GestureConfig, scheduler: Box<dyn LongPressScheduler>) -> Self {
        Self {
            config,
            scheduler,
            sessions: Vec::new(),
            drag_source: None,
            next_token: 0,
        }
    }

    /// Active thresholds.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether any touch session or desktop drag is in progress.
    pub fn is_active(&self) -> bool {
        !self.sessions.is_empty() || self.drag_source.is_some()
    }

    /// Feedback state for the item showing `entry`.
    pub fn visual(&self, entry: &EntryId) -> ItemVisual {
        let desktop_lifted = self.drag_source.as_ref() == Some(entry);
        match self.sessions.iter().find(|s| &s.entry == entry) {
            Some(session) => ItemVisual {
                swipe_offset: session.swipe_offset,
                lifted: desktop_lifted || session.phase == Phase::Dragging,
            },
            None => ItemVisual {
                swipe_offset: 0.0,
                lifted: desktop_lifted,
            },
        }
    }

    /// Apply `event`, mutating `clipboard` when a gesture commits.
    pub fn handle(&mut self, event: GestureEvent, clipboard: &mut ClipboardModel) -> GestureOutcome {
        match event {
            GestureEvent::PointerDown { pointer, entry, at } => {
                self.pointer_down(pointer, entry, at, clipboard)
            }
            GestureEvent::PointerMove { pointer, at } => self.pointer_move(pointer, at),
            GestureEvent::PointerUp {
                pointer,
                at,
                drop_index,
            } => self.pointer_up(pointer, at, drop_index, clipboard),
            GestureEvent::PointerCancel { pointer } => match self.take_session(pointer) {
                Some(session) => {
                    debug!(entry = %session.entry, "Gesture cancelled");
                    GestureOutcome::Cancelled
                }
                None => GestureOutcome::Ignored,
            },
            GestureEvent::LongPressElapsed(token) => self.long_press(token, clipboard),
            GestureEvent::DragStart { entry } => {
                if clipboard.position_of(&entry).is_none() {
                    return GestureOutcome::Ignored;
                }
                self.drag_source = Some(entry.clone());
                GestureOutcome::DragArmed(entry)
            }
            // Every item is a valid drop target.
            GestureEvent::DragOver { .. } => GestureOutcome::DragAccepted,
            GestureEvent::Drop { entry } => match self.drag_source.take() {
                Some(source) => {
                    let target = clipboard.position_of(&entry);
                    commit_move(&source, target, clipboard)
                }
                None => GestureOutcome::Ignored,
            },
            GestureEvent::DragEnd => match self.drag_source.take() {
                Some(source) => GestureOutcome::DragReleased(source),
                None => GestureOutcome::Ignored,
            },
        }
    }

    fn pointer_down(
        &mut self,
        pointer: PointerId,
        entry: EntryId,
        at: Point,
        clipboard: &ClipboardModel,
    ) -> GestureOutcome {
        if clipboard.position_of(&entry).is_none() {
            return GestureOutcome::Ignored;
        }
        // Only the first pointer on an item is tracked.
        if self
            .sessions
            .iter()
            .any(|s| s.pointer == pointer || s.entry == entry)
        {
            return GestureOutcome::Ignored;
        }

        let token = SessionToken::new(self.next_token);
        self.next_token += 1;
        let timer = self.scheduler.schedule(token, self.config.long_press);

        self.sessions.push(Session {
            pointer,
            entry,
            start: at,
            token,
            phase: Phase::PendingLongPress,
            swipe_offset: 0.0,
            timer: Some(timer),
        });
        GestureOutcome::Pending
    }

    fn pointer_move(&mut self, pointer: PointerId, at: Point) -> GestureOutcome {
        let config = self.config;
        let Some(session) = self.sessions.iter_mut().find(|s| s.pointer == pointer) else {
            return GestureOutcome::Ignored;
        };
        let dx = at.x - session.start.x;
        let dy = at.y - session.start.y;

        match session.phase {
            Phase::PendingLongPress => {
                if dx.hypot(dy) > config.jitter_px {
                    session.timer = None;
                    session.phase = Phase::Swiping;
                    session.swipe_offset = clamp_swipe(dx, config.max_swipe_px);
                }
            }
            Phase::Swiping => session.swipe_offset = clamp_swipe(dx, config.max_swipe_px),
            Phase::Dragging => {}
        }
        GestureOutcome::Pending
    }

    fn pointer_up(
        &mut self,
        pointer: PointerId,
        at: Point,
        drop_index: Option<usize>,
        clipboard: &mut ClipboardModel,
    ) -> GestureOutcome {
        let Some(session) = self.take_session(pointer) else {
            return GestureOutcome::Ignored;
        };
        let Some(position) = clipboard.position_of(&session.entry) else {
            debug!(entry = %session.entry, "Gesture target vanished; discarding");
            return GestureOutcome::Discarded;
        };

        match session.phase {
            Phase::PendingLongPress => GestureOutcome::Tapped(session.entry),
            Phase::Swiping => {
                let dx = at.x - session.start.x;
                let dy = at.y - session.start.y;
                if dx < -self.config.delete_threshold_px && dy.abs() < self.config.max_vertical_px
                {
                    match clipboard.remove_at(position) {
                        Ok(removal) => GestureOutcome::Deleted {
                            entry: session.entry,
                            became_empty: removal.became_empty,
                        },
                        Err(e) => {
                            error!(error = %e, "Swipe delete failed");
                            GestureOutcome::Discarded
                        }
                    }
                } else {
                    GestureOutcome::SnappedBack(session.entry)
                }
            }
            Phase::Dragging => match drop_index {
                Some(to) if to < clipboard.len() => commit_move(&session.entry, Some(to), clipboard),
                _ => GestureOutcome::DragReleased(session.entry),
            },
        }
    }

    fn long_press(&mut self, token: SessionToken, clipboard: &ClipboardModel) -> GestureOutcome {
        let Some(index) = self
            .sessions
            .iter()
            .position(|s| s.token == token && s.phase == Phase::PendingLongPress)
        else {
            return GestureOutcome::Ignored;
        };

        if clipboard.position_of(&self.sessions[index].entry).is_none() {
            self.sessions.remove(index);
            return GestureOutcome::Discarded;
        }

        let session = &mut self.sessions[index];
        if let Some(timer) = session.timer.take() {
            timer.disarm();
        }
        session.phase = Phase::Dragging;
        debug!(entry = %session.entry, "Long press: drag armed");
        GestureOutcome::DragArmed(session.entry.clone())
    }

    fn take_session(&mut self, pointer: PointerId) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.pointer == pointer)?;
        Some(self.sessions.remove(index))
    }
}

fn clamp_swipe(dx: f32, max_swipe_px: f32) -> f32 {
    dx.clamp(-max_swipe_px, 0.0)
}

/// Move `source` to position `target`, both re-resolved against the current clipboard.
fn commit_move(
    source: &EntryId,
    target: Option<usize>,
    clipboard: &mut ClipboardModel,
) -> GestureOutcome {
    let (Some(from), Some(to)) = (clipboard.position_of(source), target) else {
        debug!(entry = %source, "Drop source or target vanished; discarding");
        return GestureOutcome::Discarded;
    };
    match clipboard.move_to(from, to) {
        Ok(()) => GestureOutcome::Reordered { from, to },
        Err(e) => {
            error!(error = %e, "Reorder failed");
            GestureOutcome::Discarded
        }
    }
}

#[cfg(test)]
#[path = "gesture_tests.rs"]
mod tests;
