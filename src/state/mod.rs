//! Clipboard working set and the input state machines around it.
//!
//! Everything here is synchronous and owned by the application root; only the
//! long-press timer reaches into the async runtime.

pub mod clipboard;
pub mod geometry;
pub mod gesture;
pub mod navigation;
pub mod sink;
pub mod timer;

pub use clipboard::{format_entry_text, ClipboardEntry, ClipboardModel, Removal};
pub use geometry::{pointer_from_mouse, ListGeometry};
pub use gesture::{GestureController, GestureEvent, GestureOutcome, ItemVisual, Point, PointerId};
pub use navigation::{View, ViewCoordinator};
pub use sink::{ClipboardSink, MemorySink, SinkError, SystemClipboard};
pub use timer::{LongPressScheduler, ManualScheduler, SessionToken, TimerGuard, TokioScheduler};
