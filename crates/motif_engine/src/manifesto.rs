//! Character-level scroll reveal for the manifesto paragraph.
//!
//! The paragraph's scroll progress in [0, 1] is computed from its top
//! edge against two viewport-relative trigger lines, then mapped onto a
//! contiguous partition of per-character intervals: progress is shared
//! evenly across words, then across characters within each word. Each
//! character's opacity depends only on its own interval, so evaluation is
//! one pass with no cross-character coupling.
//!
//! Scroll and resize evaluations are frame-throttled upstream and
//! deduplicated here by a quantized progress bucket so identical frames
//! write nothing.

use motif_dom::{Document, NodeId};

/// Progress starts when the paragraph top crosses 90% of viewport height
/// and completes at 25%.
const START_VH: f32 = 0.9;
const END_VH: f32 = 0.25;

/// Bucket width 1e-4: writes are skipped while quantized progress holds.
const BUCKET_SCALE: f32 = 10_000.0;

const CLASS_WORD: &str = "manifesto-word";
const CLASS_CHAR: &str = "manifesto-char";

/// One character's fractional slice of the progress domain.
#[derive(Clone, Copy, Debug)]
pub struct CharacterInterval {
    pub start: f32,
    pub end: f32,
    pub node: NodeId,
}

impl CharacterInterval {
    /// Opacity of this character at a global progress value.
    pub fn opacity_at(&self, progress: f32) -> f32 {
        ((progress - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// Rebuild the paragraph into word/character spans and assign intervals.
///
/// Words get equal slices of [0, 1] in reading order; characters subdivide
/// their word's slice evenly. The partition is contiguous: each interval
/// starts where the previous one ended and the last ends at 1.
pub fn partition(doc: &mut Document, paragraph: NodeId) -> Vec<CharacterInterval> {
    let text = doc
        .text_content(paragraph)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return Vec::new();
    }
    let words: Vec<String> = text.split(' ').map(str::to_owned).collect();
    let word_share = 1.0 / words.len() as f32;

    doc.set_text(paragraph, "");
    doc.set_attr(paragraph, "aria-label", &text);
    let mut intervals = Vec::new();
    for (w, word) in words.iter().enumerate() {
        let word_span = doc.create_element("span");
        doc.add_class(word_span, CLASS_WORD);
        doc.set_style(word_span, "white-space", "nowrap");
        doc.append_child(paragraph, word_span);

        let chars: Vec<char> = word.chars().collect();
        let char_share = word_share / chars.len() as f32;
        let word_start = w as f32 * word_share;
        for (c, ch) in chars.iter().enumerate() {
            let char_span = doc.create_element("span");
            doc.add_class(char_span, CLASS_CHAR);
            doc.set_text(char_span, &ch.to_string());
            doc.set_style(char_span, "opacity", "0");
            doc.append_child(word_span, char_span);
            intervals.push(CharacterInterval {
                start: word_start + c as f32 * char_share,
                end: word_start + (c + 1) as f32 * char_share,
                node: char_span,
            });
        }
        if w + 1 < words.len() {
            let space = doc.create_element("span");
            doc.set_text(space, " ");
            doc.append_child(paragraph, space);
        }
    }
    // Pin the partition's end against accumulated float drift.
    if let Some(last) = intervals.last_mut() {
        last.end = 1.0;
    }
    intervals
}

/// Global progress of the paragraph through the reveal window.
pub fn progress(doc: &Document, paragraph: NodeId) -> f32 {
    let vh = doc.viewport.height;
    let top = doc.bounding_client_rect(paragraph).top();
    let start = START_VH * vh;
    let end = END_VH * vh;
    ((start - top) / (start - end)).clamp(0.0, 1.0)
}

pub struct ManifestoReveal {
    paragraph: NodeId,
    intervals: Vec<CharacterInterval>,
    last_bucket: Option<i64>,
    warmup_left: u32,
}

impl ManifestoReveal {
    pub fn bind(doc: &mut Document, paragraph: NodeId, warmup_frames: u32) -> Self {
        let intervals = partition(doc, paragraph);
        tracing::debug!(chars = intervals.len(), "manifesto reveal bound");
        Self {
            paragraph,
            intervals,
            last_bucket: None,
            warmup_left: warmup_frames,
        }
    }

    /// Evaluate progress and write per-character opacities, skipping the
    /// writes entirely while the quantized progress bucket is unchanged.
    pub fn evaluate(&mut self, doc: &mut Document) {
        if !doc.contains(self.paragraph) {
            return;
        }
        let progress = progress(doc, self.paragraph);
        let bucket = (progress * BUCKET_SCALE).floor() as i64;
        if self.last_bucket == Some(bucket) {
            return;
        }
        self.last_bucket = Some(bucket);
        for interval in &self.intervals {
            let opacity = interval.opacity_at(progress);
            doc.set_style(interval.node, "opacity", &format!("{:.3}", opacity));
        }
    }

    /// Post-mount warm-up: re-evaluate for a bounded number of frames to
    /// cover hosts that restore scroll position without a scroll event.
    /// Returns true while warm-up frames remain.
    pub fn tick_warmup(&mut self, doc: &mut Document) -> bool {
        if self.warmup_left == 0 {
            return false;
        }
        self.warmup_left -= 1;
        self.evaluate(doc);
        true
    }

    /// Re-arm warm-up, for page-restore notifications.
    pub fn rearm_warmup(&mut self, frames: u32) {
        self.warmup_left = frames;
        self.last_bucket = None;
    }

    pub fn intervals(&self) -> &[CharacterInterval] {
        &self.intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_dom::Rect;

    fn paragraph(doc: &mut Document, text: &str) -> NodeId {
        let p = doc.create_element("p");
        doc.set_text(p, text);
        let body = doc.body();
        doc.append_child(body, p);
        p
    }

    #[test]
    fn partition_sums_to_one_and_strictly_increases() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, "we build systems that endure");
        let intervals = partition(&mut doc, p);

        let total: f32 = intervals.iter().map(|i| i.end - i.start).sum();
        assert!((total - 1.0).abs() < 1e-4);

        assert_eq!(intervals[0].start, 0.0);
        assert_eq!(intervals.last().unwrap().end, 1.0);
        for pair in intervals.windows(2) {
            assert!(pair[0].end <= pair[1].start + 1e-6);
            assert!(pair[1].start < pair[1].end);
        }
    }

    #[test]
    fn opacity_maps_into_each_interval() {
        let interval = CharacterInterval {
            start: 0.25,
            end: 0.5,
            node: NodeId::default(),
        };
        assert_eq!(interval.opacity_at(0.1), 0.0);
        assert_eq!(interval.opacity_at(0.375), 0.5);
        assert_eq!(interval.opacity_at(0.9), 1.0);
    }

    #[test]
    fn progress_spans_the_viewport_window() {
        let mut doc = Document::new();
        doc.resize(1280.0, 1000.0);
        let p = paragraph(&mut doc, "hi");
        doc.set_rect(p, Rect::new(0.0, 900.0, 400.0, 50.0));

        // Top exactly at the 90% line.
        assert_eq!(progress(&doc, p), 0.0);
        // Top at the 25% line.
        doc.scroll_to(650.0);
        assert!((progress(&doc, p) - 1.0).abs() < 1e-6);
        // Midway through the window.
        doc.scroll_to(325.0);
        assert!((progress(&doc, p) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn identical_buckets_skip_writes() {
        let mut doc = Document::new();
        doc.resize(1280.0, 1000.0);
        let p = paragraph(&mut doc, "ab cd");
        doc.set_rect(p, Rect::new(0.0, 900.0, 400.0, 50.0));
        let mut reveal = ManifestoReveal::bind(&mut doc, p, 0);

        doc.scroll_to(325.0);
        reveal.evaluate(&mut doc);
        let first = reveal.intervals()[0].node;
        let written = doc.style(first, "opacity").map(str::to_owned);

        // Poke the style, re-evaluate at the same progress: untouched.
        doc.set_style(first, "opacity", "poked");
        reveal.evaluate(&mut doc);
        assert_eq!(doc.style(first, "opacity"), Some("poked"));

        // A different scroll position writes again.
        doc.scroll_to(400.0);
        reveal.evaluate(&mut doc);
        assert_ne!(doc.style(first, "opacity"), Some("poked"));
        assert!(written.is_some());
    }

    #[test]
    fn warmup_runs_a_bounded_number_of_frames() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, "one two");
        let mut reveal = ManifestoReveal::bind(&mut doc, p, 3);
        assert!(reveal.tick_warmup(&mut doc));
        assert!(reveal.tick_warmup(&mut doc));
        assert!(reveal.tick_warmup(&mut doc));
        assert!(!reveal.tick_warmup(&mut doc));
    }
}
