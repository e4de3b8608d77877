//! Inline-style animation driver.
//!
//! Wraps the keyframe scheduler around document nodes and writes each
//! sampled frame as inline styles. This is the single choke point for
//! motion preference and backend capability: with reduced motion active,
//! or no animation backend, the final keyframe is applied synchronously
//! and the returned handle is born finished, so every caller observes the
//! same completed end state.

use motif_animation::{Easing, EasingMode, HandleId, Scheduler, StyleKeyframe, StyleProps};
use motif_dom::{Document, NodeId};

pub struct Animator {
    scheduler: Scheduler<NodeId>,
    reduced_motion: bool,
    backend_available: bool,
}

impl Animator {
    pub fn new(reduced_motion: bool, backend_available: bool) -> Self {
        if !backend_available {
            tracing::debug!("animation backend unavailable; snapping to end states");
        }
        Self {
            scheduler: Scheduler::new(),
            reduced_motion,
            backend_available,
        }
    }

    pub fn for_document(doc: &Document) -> Self {
        Self::new(doc.reduced_motion, doc.supports_animation)
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Whether animations actually play over time.
    pub fn motion_enabled(&self) -> bool {
        !self.reduced_motion && self.backend_available
    }

    /// Play a keyframe animation on a node's inline styles.
    pub fn animate(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        keyframes: Vec<StyleKeyframe>,
        duration_ms: f64,
        easing: Easing,
        now_ms: f64,
    ) -> HandleId {
        self.start(doc, node, keyframes, duration_ms, EasingMode::Curve(easing), now_ms)
    }

    /// Play a keyframe animation whose playback position is driven by a
    /// caller-supplied easing callback.
    pub fn animate_with_easing_fn(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        keyframes: Vec<StyleKeyframe>,
        duration_ms: f64,
        easing_fn: fn(f32) -> f32,
        now_ms: f64,
    ) -> HandleId {
        self.start(
            doc,
            node,
            keyframes,
            duration_ms,
            EasingMode::Function(easing_fn),
            now_ms,
        )
    }

    fn start(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        keyframes: Vec<StyleKeyframe>,
        duration_ms: f64,
        easing: EasingMode,
        now_ms: f64,
    ) -> HandleId {
        if !self.motion_enabled() || keyframes.len() < 2 || duration_ms <= 0.0 {
            if let Some(last) = keyframes.last() {
                apply_props(doc, node, &last.props);
            }
            return self.scheduler.add_finished(node);
        }
        if let Some(first) = keyframes.first() {
            apply_props(doc, node, &first.props);
        }
        self.scheduler.add(node, keyframes, duration_ms, easing, now_ms)
    }

    /// Apply a final state without animating, still handing back an
    /// awaitable handle.
    pub fn snap(&mut self, doc: &mut Document, node: NodeId, props: &StyleProps) -> HandleId {
        apply_props(doc, node, props);
        self.scheduler.add_finished(node)
    }

    pub fn cancel(&mut self, handle: HandleId) {
        self.scheduler.cancel(handle);
    }

    pub fn is_finished(&self, handle: HandleId) -> bool {
        self.scheduler.is_finished(handle)
    }

    pub fn all_finished(&self, handles: &[HandleId]) -> bool {
        self.scheduler.all_finished(handles)
    }

    pub fn active_count(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<NodeId> {
        &mut self.scheduler
    }

    pub fn scheduler(&self) -> &Scheduler<NodeId> {
        &self.scheduler
    }

    /// Sample every running animation and write the frames as inline
    /// styles.
    pub fn tick(&mut self, doc: &mut Document, now_ms: f64) {
        let mut frames: Vec<(NodeId, StyleProps)> = Vec::new();
        self.scheduler.tick(now_ms, |node, props| {
            frames.push((node, *props));
        });
        for (node, props) in frames {
            apply_props(doc, node, &props);
        }
    }
}

/// Write one sampled frame as inline styles.
///
/// Transform-contributing properties compose into a single `transform`
/// string; unset properties leave the node's existing styles alone.
pub fn apply_props(doc: &mut Document, node: NodeId, props: &StyleProps) {
    if !doc.contains(node) {
        return;
    }
    if let Some(opacity) = props.opacity {
        doc.set_style(node, "opacity", &format_num(opacity));
    }

    let mut transform = String::new();
    if let Some(x) = props.translate_x {
        transform.push_str(&format!("translateX({}px) ", format_num(x)));
    }
    if let Some(y) = props.translate_y {
        transform.push_str(&format!("translateY({}px) ", format_num(y)));
    }
    if let Some(y) = props.translate_y_pct {
        transform.push_str(&format!("translateY({}%) ", format_num(y)));
    }
    if let Some(scale) = props.scale {
        transform.push_str(&format!("scale({}) ", format_num(scale)));
    }
    if !transform.is_empty() {
        doc.set_style(node, "transform", transform.trim_end());
    }

    if let Some(px) = props.width_px {
        doc.set_style(node, "width", &format!("{}px", format_num(px)));
    }
    if let Some(pct) = props.width_pct {
        doc.set_style(node, "width", &format!("{}%", format_num(pct)));
    }
    if let Some(px) = props.top_px {
        doc.set_style(node, "top", &format!("{}px", format_num(px)));
    }
    if let Some(px) = props.blur_px {
        doc.set_style(node, "filter", &format!("blur({}px)", format_num(px)));
    }
    if let Some([top, right, bottom, left]) = props.clip_inset {
        doc.set_style(
            node,
            "clip-path",
            &format!(
                "inset({}% {}% {}% {}%)",
                format_num(top),
                format_num(right),
                format_num(bottom),
                format_num(left)
            ),
        );
    }
}

/// Trim float noise so end states read exactly ("1", not "0.9999999").
fn format_num(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_animation::ease_out_quad;

    fn fade() -> Vec<StyleKeyframe> {
        vec![
            StyleKeyframe::new(0.0, StyleProps::opacity(0.0)),
            StyleKeyframe::new(1.0, StyleProps::opacity(1.0)),
        ]
    }

    #[test]
    fn writes_interpolated_styles_and_finishes() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);
        let mut animator = Animator::new(false, true);

        let handle = animator.animate(&mut doc, node, fade(), 100.0, Easing::Linear, 0.0);
        assert_eq!(doc.style(node, "opacity"), Some("0"));

        animator.tick(&mut doc, 50.0);
        assert_eq!(doc.style(node, "opacity"), Some("0.5"));
        assert!(!animator.is_finished(handle));

        animator.tick(&mut doc, 100.0);
        assert_eq!(doc.style(node, "opacity"), Some("1"));
        assert!(animator.is_finished(handle));
    }

    #[test]
    fn reduced_motion_snaps_to_final_state() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);
        let mut animator = Animator::new(true, true);

        let handle = animator.animate(&mut doc, node, fade(), 100.0, Easing::Linear, 0.0);
        assert_eq!(doc.style(node, "opacity"), Some("1"));
        assert!(animator.is_finished(handle));
    }

    #[test]
    fn missing_backend_behaves_like_reduced_motion() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);
        let mut animator = Animator::new(false, false);

        let handle =
            animator.animate_with_easing_fn(&mut doc, node, fade(), 100.0, ease_out_quad, 0.0);
        assert_eq!(doc.style(node, "opacity"), Some("1"));
        assert!(animator.is_finished(handle));
    }

    #[test]
    fn composes_transform_from_multiple_channels() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);
        let props = StyleProps::default()
            .with_translate_y_pct(-120.0)
            .with_scale(1.05);
        apply_props(&mut doc, node, &props);
        assert_eq!(
            doc.style(node, "transform"),
            Some("translateY(-120%) scale(1.05)")
        );
    }

    #[test]
    fn clip_inset_writes_clip_path() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);
        apply_props(&mut doc, node, &StyleProps::clip_right(100.0));
        assert_eq!(doc.style(node, "clip-path"), Some("inset(0% 100% 0% 0%)"));
    }
}
