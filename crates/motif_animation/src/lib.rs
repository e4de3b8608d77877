//! Motif Animation System
//!
//! Spring physics, style keyframes, and phase sequencing.
//!
//! # Features
//!
//! - **Spring Physics**: closed-form damped harmonic springs with
//!   underdamped, critical, and overdamped regimes
//! - **Style Keyframes**: timed inline-style animations with easing
//!   functions or a caller-supplied easing callback
//! - **Sequences**: named phases with declared predecessors, started
//!   concurrently or in order and jointly awaited
//! - **Interruptible**: one handle per slot; replacing a slot cancels
//!   the previous animation before the next one starts

pub mod easing;
pub mod keyframe;
pub mod scheduler;
pub mod sequence;
pub mod spring;

pub use easing::{ease_in_out_quad, ease_out_cubic, ease_out_quad, Easing};
pub use keyframe::{StyleKeyframe, StyleProps, Tween};
pub use scheduler::{EasingMode, HandleId, MotionSlot, Scheduler};
pub use sequence::{PhaseId, Sequence, StartRule};
pub use spring::{solve, Spring, SpringConfig, SpringSample};
