//! Easing functions for animations

/// Easing curve applied to a normalized progress value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// The sharp "hop" curve used by the preloader reveals.
    pub const HOP: Easing = Easing::CubicBezier(0.9, 0.0, 0.1, 1.0);

    /// The standard material-style curve used by overlay fades.
    pub const STANDARD: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);

    /// The curve used by nav condense/expand and the nav intro.
    pub const MENU: Easing = Easing::CubicBezier(0.25, 0.46, 0.45, 0.94);

    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,
            // CSS `ease-in-out`
            Easing::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Easing::EaseOutQuad => ease_out_quad(t),
            Easing::EaseInOutQuad => ease_in_out_quad(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

/// Quadratic ease-out, usable directly as a custom easing callback.
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out, usable directly as a custom easing callback.
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out, usable directly as a custom easing callback.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Cubic bezier easing matching CSS timing functions.
///
/// Newton-Raphson with a bisection fallback, evaluated in f64 so repeated
/// per-frame sampling stays jitter-free.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // B(p) for one axis in Horner form; p1/p2 are that axis's control points.
    let sample = |p: f64, p1: f64, p2: f64| -> f64 {
        let a = 1.0 - 3.0 * p2 + 3.0 * p1;
        let b = 3.0 * p2 - 6.0 * p1;
        ((a * p + b) * p + 3.0 * p1) * p
    };
    let slope = |p: f64, p1: f64, p2: f64| -> f64 {
        let a = 1.0 - 3.0 * p2 + 3.0 * p1;
        let b = 3.0 * p2 - 6.0 * p1;
        (3.0 * a * p + 2.0 * b) * p + 3.0 * p1
    };

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    // Invert bezier_x(p) = x.
    let mut p = x;
    for _ in 0..8 {
        let err = sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return sample(p, y1, y2) as f32;
        }
        let s = slope(p, x1, x2);
        if s.abs() < 1e-7 {
            break;
        }
        p -= err / s;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = x;
    for _ in 0..20 {
        let val = sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    sample(p, y1, y2) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::EaseInOut,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
            Easing::EaseOutCubic,
            Easing::HOP,
            Easing::MENU,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn bezier_matches_linear_diagonal() {
        let diagonal = Easing::CubicBezier(0.25, 0.25, 0.75, 0.75);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((diagonal.apply(t) - t).abs() < 1e-4);
        }
    }

    #[test]
    fn ease_out_quad_is_monotone() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_quad(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn hop_curve_is_symmetric_at_midpoint() {
        // (0.9, 0, 0.1, 1) is point-symmetric around (0.5, 0.5).
        let v = Easing::HOP.apply(0.5);
        assert!((v - 0.5).abs() < 1e-3);
    }
}
