//! Explicit frame clock
//!
//! The engine is ticked with a timestamp instead of subscribing to a
//! frame callback, so any clock works: a host maps its frame callback to
//! `tick(now)`, tests advance a `VirtualClock` frame by frame.

/// Milliseconds per frame at 60fps.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// A manually advanced clock for tests and headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualClock {
    now_ms: f64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Advance by an arbitrary amount and return the new time.
    pub fn advance(&mut self, ms: f64) -> f64 {
        self.now_ms += ms;
        self.now_ms
    }

    /// Advance by one 60fps frame and return the new time.
    pub fn frame(&mut self) -> f64 {
        self.advance(FRAME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_monotonically() {
        let mut clock = VirtualClock::new();
        assert_eq!(clock.now(), 0.0);
        clock.advance(100.0);
        clock.frame();
        assert!((clock.now() - (100.0 + FRAME_MS)).abs() < 1e-9);
    }
}
