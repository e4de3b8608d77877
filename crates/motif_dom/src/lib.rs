//! Motif Document Model
//!
//! The engine never touches a live browser tree; it operates on typed
//! handles into this in-memory document, resolved once at startup. Hosts
//! (and tests) build the tree, supply geometry, and forward events.
//!
//! - **Document**: element tree with classes, inline styles, attributes,
//!   text, and page-coordinate geometry, plus a naive inline-flow layout
//!   for word measurement
//! - **Ports**: session storage and an explicitly advanced clock, so the
//!   choreography runs identically under a virtual clock in tests

pub mod clock;
pub mod document;
pub mod geometry;
pub mod session;

pub use clock::{VirtualClock, FRAME_MS};
pub use document::{Document, NodeId, Viewport};
pub use geometry::Rect;
pub use session::{MemorySession, SessionStore, PRELOADER_PLAYED_KEY};
