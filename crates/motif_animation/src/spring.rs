//! Spring physics animation
//!
//! Closed-form damped harmonic oscillator. `solve` is a pure function of
//! `(from, to, t, config)` so spring motion can be tested deterministically;
//! `Spring` wraps it with a start time and the rest criterion that decides
//! when the animation is finished.

/// Configuration for a spring animation.
#[derive(Clone, Copy, Debug)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    pub initial_velocity: f32,
    /// Settle when within this distance of the target...
    pub rest_delta: f32,
    /// ...and moving slower than this.
    pub rest_speed: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            ..Self::default()
        }
    }

    /// The overdamped spring driving the KPI counters.
    pub fn counter() -> Self {
        Self::default()
    }

    /// A gentle, visibly oscillating spring.
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A stiff spring with slight overshoot.
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Carry momentum into the spring.
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// Damping ratio zeta: <1 oscillates, =1 critical, >1 overdamped.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Damping at which the spring settles fastest without oscillating.
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0 - ZETA_EPSILON
    }

    pub fn is_critically_damped(&self) -> bool {
        (self.damping_ratio() - 1.0).abs() <= ZETA_EPSILON
    }

    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio() > 1.0 + ZETA_EPSILON
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 60.0,
            mass: 1.0,
            initial_velocity: 0.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }
}

/// Tolerance band around zeta = 1. The underdamped and overdamped closed
/// forms both divide by a term that vanishes at critical damping, so
/// configs inside this band take the critical branch.
const ZETA_EPSILON: f32 = 1e-4;

/// Position and velocity of a spring at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSample {
    pub value: f32,
    pub velocity: f32,
}

/// Evaluate the damped harmonic oscillator at elapsed time `t` seconds.
///
/// Branches on the damping ratio: underdamped motion oscillates inside a
/// decaying envelope, critical damping settles fastest without crossing
/// the target, overdamped motion is a sum of two decaying exponentials.
pub fn solve(from: f32, to: f32, t: f32, config: &SpringConfig) -> SpringSample {
    let x0 = from - to;
    let v0 = config.initial_velocity;
    let w0 = (config.stiffness / config.mass).sqrt();
    let zeta = config.damping_ratio();

    if zeta < 1.0 - ZETA_EPSILON {
        // Underdamped: oscillation at the damped frequency w1.
        let w1 = w0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * w0 * t).exp();
        let b = (v0 + zeta * w0 * x0) / w1;
        let (sin, cos) = (w1 * t).sin_cos();
        let value = to + envelope * (x0 * cos + b * sin);
        let velocity =
            envelope * (-zeta * w0 * (x0 * cos + b * sin) + w1 * (b * cos - x0 * sin));
        return SpringSample { value, velocity };
    }

    if zeta <= 1.0 + ZETA_EPSILON {
        // Critically damped.
        let envelope = (-w0 * t).exp();
        let value = to + envelope * (x0 + (v0 + w0 * x0) * t);
        let velocity = envelope * (v0 - w0 * (v0 + w0 * x0) * t);
        return SpringSample { value, velocity };
    }

    // Overdamped: two real exponential modes. Computed in f64 because the
    // mode coefficients cancel catastrophically in f32 when the roots are
    // far apart, leaving a spurious velocity at t = 0.
    let x0 = f64::from(x0);
    let v0 = f64::from(v0);
    let w0 = f64::from(w0);
    let zeta = f64::from(zeta);
    let s = (zeta * zeta - 1.0).sqrt();
    let r1 = -w0 * (zeta - s);
    let r2 = -w0 * (zeta + s);
    let c1 = (v0 - r2 * x0) / (r1 - r2);
    let c2 = x0 - c1;
    let e1 = (r1 * f64::from(t)).exp();
    let e2 = (r2 * f64::from(t)).exp();
    SpringSample {
        value: to + (c1 * e1 + c2 * e2) as f32,
        velocity: (c1 * r1 * e1 + c2 * r2 * e2) as f32,
    }
}

/// A running spring animation from `from` to `to`.
///
/// Sampled once per frame against a millisecond clock; finished when the
/// rest criterion holds (close to the target and nearly stopped), not
/// after a fixed duration. The final sample is exactly the target value.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    from: f32,
    to: f32,
    config: SpringConfig,
    started_at: Option<f64>,
    finished: bool,
}

impl Spring {
    pub fn new(from: f32, to: f32, config: SpringConfig) -> Self {
        Self {
            from,
            to,
            config,
            started_at: None,
            finished: false,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Sample the spring at wall-clock time `now_ms`.
    ///
    /// The first call anchors the start time. A spring whose endpoints
    /// coincide still yields one sample (the target) and finishes.
    pub fn sample(&mut self, now_ms: f64) -> SpringSample {
        if self.finished {
            return SpringSample {
                value: self.to,
                velocity: 0.0,
            };
        }

        let start = *self.started_at.get_or_insert(now_ms);
        let t = ((now_ms - start) / 1000.0) as f32;
        let sample = solve(self.from, self.to, t, &self.config);

        let at_rest = (self.to - sample.value).abs() <= self.config.rest_delta
            && sample.velocity.abs() <= self.config.rest_speed;
        if at_rest {
            self.finished = true;
            return SpringSample {
                value: self.to,
                velocity: 0.0,
            };
        }
        sample
    }
}
