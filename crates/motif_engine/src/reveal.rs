//! Scroll-linked line reveals.
//!
//! Qualifying text elements are rebuilt as one masked wrapper per visual
//! line, each containing an inner line that wipes upward when the element
//! first enters the viewport band. Splitting measures real layout: words
//! are laid out as spans and grouped into lines by offset comparison, so
//! the split matches what the font actually wrapped.
//!
//! Each element reveals at most once; after its first entry it leaves the
//! observation set.

use motif_dom::{Document, NodeId};

use crate::bind::{
    ATTR_SPLIT_DONE, CLASS_LINE, CLASS_LINE_MASK, CLASS_OVERFLOW_HIDDEN, CLASS_REVEAL_IN,
};
use crate::config::EngineConfig;

/// A word's offset more than this far below the previous word starts a
/// new visual line.
const LINE_OFFSET_TOLERANCE_PX: f32 = 1.0;

const LINE_TRANSITION_MS: f64 = 800.0;

/// Leaf text elements eligible for splitting: already clipped by an
/// overflow-hidden class, or wrapped by a fit-content parent.
pub fn split_candidates(doc: &Document) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&n| {
            let leaf_text = doc.children(n).is_empty() && !doc.own_text(n).trim().is_empty();
            if !leaf_text {
                return false;
            }
            if doc.has_class(n, CLASS_OVERFLOW_HIDDEN) {
                return true;
            }
            doc.parent(n)
                .map(|p| doc.style(p, "width") == Some("fit-content"))
                .unwrap_or(false)
        })
        .collect()
}

/// Normalize whitespace the way text rendering collapses it.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rebuild a leaf text element as per-line masked reveal wrappers.
///
/// Returns false when the element does not qualify or was already split.
/// The original text is preserved as `aria-label`; joining the line texts
/// back with single spaces reproduces the normalized original.
pub fn split_lines(doc: &mut Document, node: NodeId, stagger_ms: f64) -> bool {
    if !doc.contains(node) || doc.attr(node, ATTR_SPLIT_DONE) == Some("true") {
        return false;
    }
    let text = normalize(&doc.text_content(node));
    if text.is_empty() {
        return false;
    }

    // Lay the words out as real spans so line grouping reflects layout,
    // not a guess about the container width.
    doc.set_text(node, "");
    let words: Vec<String> = text.split(' ').map(str::to_owned).collect();
    let mut spans = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        let span = doc.create_element("span");
        let rendered = if i + 1 < words.len() {
            format!("{} ", word)
        } else {
            word.clone()
        };
        doc.set_text(span, &rendered);
        doc.append_child(node, span);
        spans.push(span);
    }
    doc.reflow_inline(node);

    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut last_offset = f32::NEG_INFINITY;
    for (span, word) in spans.iter().zip(&words) {
        let offset = doc.offset_top(*span);
        if offset - last_offset > LINE_OFFSET_TOLERANCE_PX {
            lines.push(Vec::new());
            last_offset = offset;
        }
        if let Some(line) = lines.last_mut() {
            line.push(word.clone());
        }
    }

    doc.set_text(node, "");
    for (i, line_words) in lines.iter().enumerate() {
        let mask = doc.create_element("div");
        doc.add_class(mask, CLASS_LINE_MASK);
        doc.set_style(mask, "overflow", "hidden");

        let line = doc.create_element("div");
        doc.add_class(line, CLASS_LINE);
        doc.set_text(line, &line_words.join(" "));
        doc.set_style(line, "transform", "translateY(100%)");
        doc.set_style(
            line,
            "transition",
            &format!(
                "transform {}ms cubic-bezier(0.4, 0, 0.2, 1) {}ms",
                LINE_TRANSITION_MS,
                (i as f64 * stagger_ms) as i64
            ),
        );
        doc.append_child(mask, line);
        doc.append_child(node, mask);
    }

    doc.set_attr(node, "aria-label", &text);
    doc.set_attr(node, ATTR_SPLIT_DONE, "true");
    true
}

/// Text reassembled from the split lines, in order.
pub fn joined_line_text(doc: &Document, node: NodeId) -> String {
    doc.find_in_with_class(node, CLASS_LINE)
        .iter()
        .map(|&line| doc.text_content(line))
        .collect::<Vec<_>>()
        .join(" ")
}

struct RevealItem {
    node: NodeId,
    revealed: bool,
}

/// The observation set for first-entry reveals.
pub struct ScrollReveals {
    items: Vec<RevealItem>,
    threshold: f32,
    bottom_margin: f32,
}

impl ScrollReveals {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            items: Vec::new(),
            threshold: config.reveal_threshold,
            bottom_margin: config.reveal_bottom_margin,
        }
    }

    pub fn observe(&mut self, node: NodeId) {
        self.items.push(RevealItem {
            node,
            revealed: false,
        });
    }

    pub fn observed_count(&self) -> usize {
        self.items.iter().filter(|i| !i.revealed).count()
    }

    /// Reveal an element now, once. Returns true on the first call.
    pub fn reveal(doc: &mut Document, node: NodeId) -> bool {
        if doc.has_class(node, CLASS_REVEAL_IN) {
            return false;
        }
        doc.add_class(node, CLASS_REVEAL_IN);
        for line in doc.find_in_with_class(node, CLASS_LINE) {
            doc.set_style(line, "transform", "translateY(0%)");
        }
        true
    }

    /// Evaluate visibility for every still-observed element against the
    /// viewport band (shortened at the bottom by the configured margin)
    /// and reveal first entries.
    pub fn evaluate(&mut self, doc: &mut Document) {
        let band_top = 0.0;
        let band_bottom = doc.viewport.height * (1.0 - self.bottom_margin);
        for item in &mut self.items {
            if item.revealed {
                continue;
            }
            if !doc.contains(item.node) {
                item.revealed = true;
                continue;
            }
            let rect = doc.bounding_client_rect(item.node);
            let visible = rect.vertical_overlap(band_top, band_bottom);
            if rect.height > 0.0 && visible / rect.height >= self.threshold {
                Self::reveal(doc, item.node);
                item.revealed = true;
            }
        }
        self.items.retain(|i| !i.revealed);
    }

    /// Degraded path: no intersection backend or reduced motion.
    pub fn reveal_all(&mut self, doc: &mut Document) {
        for item in std::mem::take(&mut self.items) {
            Self::reveal(doc, item.node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_dom::Rect;

    fn split_target(doc: &mut Document, text: &str, width: f32) -> NodeId {
        let node = doc.create_element("p");
        doc.add_class(node, CLASS_OVERFLOW_HIDDEN);
        doc.set_text(node, text);
        let body = doc.body();
        doc.append_child(body, node);
        doc.set_rect(node, Rect::new(0.0, 0.0, width, 100.0));
        node
    }

    #[test]
    fn split_round_trips_normalized_text() {
        let mut doc = Document::new();
        let text = "the  quick brown\n fox jumps";
        let node = split_target(&mut doc, text, 120.0);
        assert!(split_lines(&mut doc, node, 70.0));
        assert_eq!(joined_line_text(&doc, node), "the quick brown fox jumps");
        assert_eq!(
            doc.attr(node, "aria-label"),
            Some("the quick brown fox jumps")
        );
    }

    #[test]
    fn split_is_idempotent() {
        let mut doc = Document::new();
        let node = split_target(&mut doc, "alpha beta gamma", 80.0);
        assert!(split_lines(&mut doc, node, 70.0));
        let masks = doc.find_in_with_class(node, CLASS_LINE_MASK).len();
        assert!(!split_lines(&mut doc, node, 70.0));
        assert_eq!(doc.find_in_with_class(node, CLASS_LINE_MASK).len(), masks);
    }

    #[test]
    fn narrow_container_produces_multiple_lines() {
        let mut doc = Document::new();
        // 8 chars per line at the 10px default advance.
        let node = split_target(&mut doc, "aaaa bbbb cccc", 80.0);
        split_lines(&mut doc, node, 70.0);
        let masks = doc.find_in_with_class(node, CLASS_LINE_MASK);
        assert!(masks.len() >= 2, "expected a wrap, got {} lines", masks.len());
    }

    #[test]
    fn later_lines_carry_larger_stagger() {
        let mut doc = Document::new();
        let node = split_target(&mut doc, "aaaa bbbb cccc dddd", 50.0);
        split_lines(&mut doc, node, 70.0);
        let lines = doc.find_in_with_class(node, CLASS_LINE);
        assert!(lines.len() >= 2);
        let delay_of = |n: NodeId| {
            doc.style(n, "transition")
                .and_then(|t| t.rsplit(' ').next().map(str::to_owned))
                .unwrap()
        };
        assert_eq!(delay_of(lines[0]), "0ms");
        assert_eq!(delay_of(lines[1]), "70ms");
    }

    #[test]
    fn reveal_fires_once_and_unobserves() {
        let mut doc = Document::new();
        let node = split_target(&mut doc, "hello world", 200.0);
        split_lines(&mut doc, node, 70.0);

        let mut reveals = ScrollReveals::new(&EngineConfig::default());
        reveals.observe(node);
        assert_eq!(reveals.observed_count(), 1);

        reveals.evaluate(&mut doc);
        assert!(doc.has_class(node, CLASS_REVEAL_IN));
        assert_eq!(reveals.observed_count(), 0);

        // A second direct trigger adds nothing.
        assert!(!ScrollReveals::reveal(&mut doc, node));
    }

    #[test]
    fn below_viewport_element_waits_for_scroll() {
        let mut doc = Document::new();
        let node = split_target(&mut doc, "later content", 200.0);
        doc.set_rect(node, Rect::new(0.0, 2000.0, 200.0, 50.0));
        split_lines(&mut doc, node, 70.0);
        doc.set_rect(node, Rect::new(0.0, 2000.0, 200.0, 50.0));

        let mut reveals = ScrollReveals::new(&EngineConfig::default());
        reveals.observe(node);

        reveals.evaluate(&mut doc);
        assert!(!doc.has_class(node, CLASS_REVEAL_IN));

        doc.scroll_to(1600.0);
        reveals.evaluate(&mut doc);
        assert!(doc.has_class(node, CLASS_REVEAL_IN));
    }
}
