//! Case study slider.
//!
//! A horizontal scroll-snap strip with previous/next buttons. The step
//! size comes from the first two slides' measured geometry, the buttons
//! scroll by exactly one step, and their enabled state follows the scroll
//! position.

use motif_dom::{Document, NodeId};

const CLASS_SLIDER: &str = "case-slider";
const CLASS_SLIDE: &str = "case-slide";
const CLASS_PREV: &str = "slider-prev";
const CLASS_NEXT: &str = "slider-next";

const DISABLED_OPACITY: &str = "0.4";

pub struct CaseSlider {
    slider: NodeId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    step: f32,
    max_scroll: f32,
    scroll_x: f32,
    reduced_motion: bool,
}

impl CaseSlider {
    pub fn bind(doc: &mut Document, section: NodeId) -> Option<Self> {
        let slider = doc
            .find_in_with_class(section, CLASS_SLIDER)
            .into_iter()
            .next()?;
        doc.set_style(slider, "overflow-x", "auto");
        doc.set_style(slider, "scroll-snap-type", "x mandatory");
        for slide in doc.find_in_with_class(slider, CLASS_SLIDE) {
            doc.set_style(slide, "scroll-snap-align", "start");
        }

        let mut this = Self {
            slider,
            prev: doc.find_in_with_class(section, CLASS_PREV).into_iter().next(),
            next: doc.find_in_with_class(section, CLASS_NEXT).into_iter().next(),
            step: 0.0,
            max_scroll: 0.0,
            scroll_x: 0.0,
            reduced_motion: doc.reduced_motion,
        };
        this.measure(doc);
        this.sync_buttons(doc);
        Some(this)
    }

    /// Step and range from the slides' current geometry.
    pub fn measure(&mut self, doc: &Document) {
        let slides = doc.find_in_with_class(self.slider, CLASS_SLIDE);
        self.step = match (slides.first(), slides.get(1)) {
            (Some(&a), Some(&b)) => (doc.page_rect(b).left() - doc.page_rect(a).left()).abs(),
            _ => 0.0,
        };
        let track_width = doc.page_rect(self.slider).width;
        let content_right = slides
            .last()
            .map(|&s| doc.page_rect(s).right())
            .unwrap_or(0.0);
        let content_left = slides
            .first()
            .map(|&s| doc.page_rect(s).left())
            .unwrap_or(0.0);
        self.max_scroll = (content_right - content_left - track_width).max(0.0);
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    fn scroll_to(&mut self, doc: &mut Document, x: f32) {
        self.scroll_x = x.clamp(0.0, self.max_scroll);
        // Smooth scrolling is the host's concern; under reduced motion it
        // must jump.
        doc.set_style(
            self.slider,
            "scroll-behavior",
            if self.reduced_motion { "auto" } else { "smooth" },
        );
        doc.set_attr(self.slider, "data-scroll-left", &format!("{}", self.scroll_x));
        self.sync_buttons(doc);
    }

    pub fn on_prev(&mut self, doc: &mut Document) {
        if self.step > 0.0 {
            self.scroll_to(doc, self.scroll_x - self.step);
        }
    }

    pub fn on_next(&mut self, doc: &mut Document) {
        if self.step > 0.0 {
            self.scroll_to(doc, self.scroll_x + self.step);
        }
    }

    /// Host-reported scroll position (trackpad or touch scrolling).
    pub fn on_scroll(&mut self, doc: &mut Document, x: f32) {
        self.scroll_x = x.clamp(0.0, self.max_scroll);
        self.sync_buttons(doc);
    }

    pub fn on_resize(&mut self, doc: &mut Document) {
        self.measure(doc);
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll);
        self.sync_buttons(doc);
    }

    pub fn matches_prev(&self, doc: &Document, node: NodeId) -> bool {
        self.prev.map(|b| doc.is_inside(node, b)).unwrap_or(false)
    }

    pub fn matches_next(&self, doc: &Document, node: NodeId) -> bool {
        self.next.map(|b| doc.is_inside(node, b)).unwrap_or(false)
    }

    fn sync_buttons(&self, doc: &mut Document) {
        let at_start = self.scroll_x <= 0.5;
        let at_end = self.scroll_x >= self.max_scroll - 0.5;
        if let Some(prev) = self.prev {
            Self::set_enabled(doc, prev, !at_start);
        }
        if let Some(next) = self.next {
            Self::set_enabled(doc, next, !at_end);
        }
    }

    fn set_enabled(doc: &mut Document, button: NodeId, enabled: bool) {
        if enabled {
            doc.remove_attr(button, "disabled");
            doc.set_style(button, "opacity", "1");
        } else {
            doc.set_attr(button, "disabled", "true");
            doc.set_style(button, "opacity", DISABLED_OPACITY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{ATTR_SLICE, SLICE_CASE_SHOWCASE};
    use crate::stage;

    fn setup() -> (Document, CaseSlider) {
        let mut doc = stage::sample_stage();
        let section = doc
            .find_all_with_attr(ATTR_SLICE)
            .into_iter()
            .find(|&n| doc.attr(n, ATTR_SLICE) == Some(SLICE_CASE_SHOWCASE))
            .unwrap();
        let slider = CaseSlider::bind(&mut doc, section).unwrap();
        (doc, slider)
    }

    #[test]
    fn step_comes_from_the_first_two_slides() {
        let (_, slider) = setup();
        assert!(slider.step() > 0.0);
    }

    #[test]
    fn buttons_scroll_by_one_step_and_clamp() {
        let (mut doc, mut slider) = setup();
        let step = slider.step();

        slider.on_next(&mut doc);
        assert_eq!(slider.scroll_x(), step);

        slider.on_prev(&mut doc);
        assert_eq!(slider.scroll_x(), 0.0);

        slider.on_prev(&mut doc);
        assert_eq!(slider.scroll_x(), 0.0);
    }

    #[test]
    fn button_state_tracks_position() {
        let (mut doc, mut slider) = setup();
        let prev = slider.prev.unwrap();
        let next = slider.next.unwrap();
        assert_eq!(doc.attr(prev, "disabled"), Some("true"));
        assert_eq!(doc.attr(next, "disabled"), None);

        // Run to the end.
        for _ in 0..32 {
            slider.on_next(&mut doc);
        }
        assert_eq!(doc.attr(prev, "disabled"), None);
        assert_eq!(doc.attr(next, "disabled"), Some("true"));
    }

    #[test]
    fn reduced_motion_scrolls_instantly() {
        let mut doc = stage::sample_stage();
        doc.reduced_motion = true;
        let section = doc
            .find_all_with_attr(ATTR_SLICE)
            .into_iter()
            .find(|&n| doc.attr(n, ATTR_SLICE) == Some(SLICE_CASE_SHOWCASE))
            .unwrap();
        let mut slider = CaseSlider::bind(&mut doc, section).unwrap();
        slider.on_next(&mut doc);
        assert_eq!(doc.style(slider.slider, "scroll-behavior"), Some("auto"));
    }
}
