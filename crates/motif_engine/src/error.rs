//! Engine error types.
//!
//! Almost every runtime failure degrades in place (missing markup makes
//! the affected component a no-op, a missing backend snaps to the end
//! state), so errors here are limited to setup concerns.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config value out of range: {0}")]
    ConfigRange(&'static str),
}
