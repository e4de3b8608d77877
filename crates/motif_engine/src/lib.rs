//! Motif Choreography Engine
//!
//! Drives the load-time and scroll-time motion of a marketing site
//! against the in-memory document model: a once-per-session preloader
//! timeline, scroll-linked text reveals, spring-driven KPI counters, a
//! condensing navigation bar, and hover-driven mega menus.
//!
//! - **One entry point**: [`Engine::mount`] binds everything once; the
//!   host then forwards events and calls [`Engine::tick`] per frame
//! - **Graceful degradation**: reduced motion or a missing backend snaps
//!   every effect to its end state; missing markup makes the affected
//!   component a no-op without disturbing its siblings
//! - **Bounded time-to-interactive**: an independent watchdog deadline
//!   force-reveals the page if the preloader timeline ever stalls

pub mod assets;
pub mod bind;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod manifesto;
pub mod mega_menu;
pub mod motion;
pub mod nav;
pub mod preloader;
pub mod reveal;
pub mod services;
pub mod slider;
pub mod stage;

pub use bind::StageBindings;
pub use config::{AssetMode, EngineConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use manifesto::CharacterInterval;
pub use mega_menu::PanelKey;
pub use motion::Animator;
pub use preloader::{Preloader, PreloaderStatus};
