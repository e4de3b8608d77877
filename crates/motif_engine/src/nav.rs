//! Nav motion controller.
//!
//! Two logical states, expanded and condensed, driven by scroll direction
//! and a threshold. Every animated transition starts from the nav's
//! current rendered geometry (width as a viewport percentage, top offset)
//! rather than the nominal endpoint, so a rapid direction reversal
//! redirects the in-flight motion instead of snapping. Width and top run
//! in their own slots; a retrigger cancels and replaces both.

use motif_animation::{Easing, MotionSlot, StyleKeyframe, StyleProps};
use motif_dom::{Document, NodeId};

use crate::bind::{CLASS_NAV_OPEN, CLASS_NAV_TOGGLE};
use crate::config::EngineConfig;
use crate::motion::{apply_props, Animator};

const EXPANDED_WIDTH_PCT: f32 = 100.0;
const EXPANDED_TOP_PX: f32 = 0.0;
const CONDENSED_WIDTH_PCT: f32 = 80.0;
const CONDENSED_TOP_PX: f32 = 16.0;

pub struct NavMotionController {
    nav: NodeId,
    condensed: bool,
    last_scroll_y: f32,
    width_slot: MotionSlot,
    top_slot: MotionSlot,
}

impl NavMotionController {
    pub fn new(nav: NodeId, initial_scroll_y: f32) -> Self {
        Self {
            nav,
            condensed: false,
            last_scroll_y: initial_scroll_y,
            width_slot: MotionSlot::new(),
            top_slot: MotionSlot::new(),
        }
    }

    pub fn is_condensed(&self) -> bool {
        self.condensed
    }

    /// Frame-throttled scroll evaluation.
    pub fn on_scroll(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        now_ms: f64,
    ) {
        let y = doc.viewport.scroll_y;
        let delta = y - self.last_scroll_y;
        self.last_scroll_y = y;

        if !config.is_desktop(doc.viewport.width) {
            self.set_state(doc, animator, config, false, true, now_ms);
            return;
        }

        let threshold = config.nav_condense_threshold * doc.viewport.height;
        let next = if delta > 0.0 && y > threshold {
            true
        } else if delta < 0.0 {
            false
        } else {
            self.condensed
        };
        self.set_state(doc, animator, config, next, false, now_ms);
    }

    /// Resize reapplies the current logical state without animating.
    pub fn on_resize(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        now_ms: f64,
    ) {
        let target = self.condensed && config.is_desktop(doc.viewport.width);
        self.set_state(doc, animator, config, target, true, now_ms);
    }

    fn set_state(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        condensed: bool,
        immediate: bool,
        now_ms: f64,
    ) {
        let changed = condensed != self.condensed;
        self.condensed = condensed;
        let (to_width, to_top) = if condensed {
            (CONDENSED_WIDTH_PCT, CONDENSED_TOP_PX)
        } else {
            (EXPANDED_WIDTH_PCT, EXPANDED_TOP_PX)
        };

        if immediate || !animator.motion_enabled() {
            if changed || immediate {
                self.width_slot.cancel(animator.scheduler_mut());
                self.top_slot.cancel(animator.scheduler_mut());
                apply_props(
                    doc,
                    self.nav,
                    &StyleProps::default()
                        .with_width_pct(to_width)
                        .with_top_px(to_top),
                );
            }
            return;
        }
        if !changed {
            return;
        }

        // Start from what is on screen right now. The nav is fixed-position,
        // so its rect is already viewport-anchored and must not be offset by
        // the page scroll.
        let rect = doc.page_rect(self.nav);
        let from_width = if doc.viewport.width > 0.0 {
            rect.width / doc.viewport.width * 100.0
        } else {
            to_width
        };
        let from_top = rect.top();

        let width = animator.animate(
            doc,
            self.nav,
            vec![
                StyleKeyframe::new(0.0, StyleProps::default().with_width_pct(from_width)),
                StyleKeyframe::new(1.0, StyleProps::default().with_width_pct(to_width)),
            ],
            config.nav_transition_ms,
            Easing::MENU,
            now_ms,
        );
        self.width_slot.replace(animator.scheduler_mut(), width);

        let top = animator.animate(
            doc,
            self.nav,
            vec![
                StyleKeyframe::new(0.0, StyleProps::default().with_top_px(from_top)),
                StyleKeyframe::new(1.0, StyleProps::default().with_top_px(to_top)),
            ],
            config.nav_transition_ms,
            Easing::MENU,
            now_ms,
        );
        self.top_slot.replace(animator.scheduler_mut(), top);
    }
}

/// Mobile nav open/close button.
pub struct MobileNavButton {
    button: NodeId,
    open: bool,
}

impl MobileNavButton {
    pub fn bind(doc: &mut Document, button: NodeId) -> Self {
        doc.set_attr(button, "aria-expanded", "false");
        Self {
            button,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn on_click(&mut self, doc: &mut Document) {
        self.open = !self.open;
        let body = doc.body();
        doc.toggle_class(body, CLASS_NAV_OPEN, self.open);
        doc.set_attr(
            self.button,
            "aria-expanded",
            if self.open { "true" } else { "false" },
        );
    }

    /// Force-close when the viewport grows past mobile.
    pub fn close(&mut self, doc: &mut Document) {
        if self.open {
            self.on_click(doc);
        }
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        node == self.button || doc.closest_with_class(node, CLASS_NAV_TOGGLE) == Some(self.button)
    }
}
