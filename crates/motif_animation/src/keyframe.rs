//! Style keyframes
//!
//! `StyleProps` is the set of inline-style properties the choreography
//! animates. Properties left unset are untouched on the target, matching
//! fill-forward keyframe semantics: interpolation only runs between two
//! set endpoints, otherwise the set endpoint wins.

/// Inline-style properties at one keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StyleProps {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Translation X in pixels
    pub translate_x: Option<f32>,
    /// Translation Y in pixels
    pub translate_y: Option<f32>,
    /// Translation Y as a percentage of the element's own height
    pub translate_y_pct: Option<f32>,
    /// Uniform scale factor
    pub scale: Option<f32>,
    /// Width in pixels
    pub width_px: Option<f32>,
    /// Width as a percentage of the viewport
    pub width_pct: Option<f32>,
    /// Top offset in pixels
    pub top_px: Option<f32>,
    /// Gaussian blur radius in pixels
    pub blur_px: Option<f32>,
    /// Clip-path inset [top%, right%, bottom%, left%]
    pub clip_inset: Option<[f32; 4]>,
}

impl StyleProps {
    /// Props with only opacity set.
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Props with a horizontal clip reveal: `right` percent clipped off.
    pub fn clip_right(right_pct: f32) -> Self {
        Self {
            clip_inset: Some([0.0, right_pct, 0.0, 0.0]),
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn with_translate_y(mut self, px: f32) -> Self {
        self.translate_y = Some(px);
        self
    }

    pub fn with_translate_y_pct(mut self, pct: f32) -> Self {
        self.translate_y_pct = Some(pct);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_width_px(mut self, px: f32) -> Self {
        self.width_px = Some(px);
        self
    }

    pub fn with_width_pct(mut self, pct: f32) -> Self {
        self.width_pct = Some(pct);
        self
    }

    pub fn with_top_px(mut self, px: f32) -> Self {
        self.top_px = Some(px);
        self
    }

    pub fn with_blur_px(mut self, px: f32) -> Self {
        self.blur_px = Some(px);
        self
    }

    pub fn with_clip_inset(mut self, inset: [f32; 4]) -> Self {
        self.clip_inset = Some(inset);
        self
    }

    /// Interpolate between two property sets.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
            translate_y_pct: lerp_opt(self.translate_y_pct, other.translate_y_pct, t),
            scale: lerp_opt(self.scale, other.scale, t),
            width_px: lerp_opt(self.width_px, other.width_px, t),
            width_pct: lerp_opt(self.width_pct, other.width_pct, t),
            top_px: lerp_opt(self.top_px, other.top_px, t),
            blur_px: lerp_opt(self.blur_px, other.blur_px, t),
            clip_inset: lerp_opt_inset(self.clip_inset, other.clip_inset, t),
        }
    }
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn lerp_opt_inset(a: Option<[f32; 4]>, b: Option<[f32; 4]>, t: f32) -> Option<[f32; 4]> {
    match (a, b) {
        (Some(a), Some(b)) => Some([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ]),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// A keyframe at a normalized offset (0.0 to 1.0).
#[derive(Clone, Copy, Debug)]
pub struct StyleKeyframe {
    pub offset: f32,
    pub props: StyleProps,
}

impl StyleKeyframe {
    pub fn new(offset: f32, props: StyleProps) -> Self {
        Self { offset, props }
    }
}

/// Sample a keyframe list at an eased progress value.
///
/// Keyframes must be sorted by offset. Progress outside the covered range
/// clamps to the nearest endpoint.
pub(crate) fn sample_keyframes(keyframes: &[StyleKeyframe], progress: f32) -> StyleProps {
    let Some(first) = keyframes.first() else {
        return StyleProps::default();
    };
    let progress = progress.clamp(0.0, 1.0);

    let mut prev = first;
    let mut next = first;
    for kf in keyframes {
        if kf.offset <= progress {
            prev = kf;
        }
        if kf.offset >= progress {
            next = kf;
            break;
        }
        next = kf;
    }

    if (prev.offset - next.offset).abs() < f32::EPSILON {
        return prev.props;
    }

    let local = (progress - prev.offset) / (next.offset - prev.offset);
    prev.props.lerp(&next.props, local)
}

/// A single scalar value tweened over a fixed duration.
///
/// Used where a raw number is animated per frame rather than an element
/// style, e.g. the preloader's 0..100 progress counter.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f64,
    ease: fn(f32) -> f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f64, ease: fn(f32) -> f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            ease,
        }
    }

    /// Value after `elapsed_ms`, clamped to the final value.
    pub fn sample(&self, elapsed_ms: f64) -> f32 {
        let raw = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((elapsed_ms / self.duration_ms) as f32).clamp(0.0, 1.0)
        };
        let eased = (self.ease)(raw);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
