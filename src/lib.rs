//! versepad
//!
//! Scripture reader core: a cache-first dataset loader with streamed download
//! progress, and an ordered verse clipboard driven by tap, long-press-drag,
//! swipe-to-delete and desktop drag-and-drop gestures.
//!
//! Pure state (clipboard, gestures, navigation) is synchronous and owned by
//! [`app::App`]; the loader, store and fetchers are async.

pub mod app;
pub mod config;
pub mod loader;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod store;
