//! Spring-driven KPI counters.
//!
//! Number blocks in the achievements section count 0 to their target
//! under an overdamped spring once the section first becomes sufficiently
//! visible. The trigger fires once; re-entering the viewport does not
//! restart the numbers.

use motif_animation::{Spring, SpringConfig};
use motif_dom::{Document, NodeId};

const CLASS_KPI: &str = "kpi";
const CLASS_KPI_LABEL: &str = "kpi-label";
const CLASS_KPI_NUMBER: &str = "kpi-number";

/// Known metrics, matched by their rendered label.
const TARGETS: &[(&str, f32)] = &[
    ("Clients who stay", 95.0),
    ("Conversion growth", 40.0),
    ("Reliable, secure systems", 99.0),
];

struct Counter {
    number: NodeId,
    target: f32,
    spring: Option<Spring>,
}

pub struct KpiCounters {
    section: NodeId,
    counters: Vec<Counter>,
    threshold: f32,
    triggered: bool,
}

impl KpiCounters {
    pub fn bind(doc: &Document, section: NodeId, threshold: f32) -> Self {
        let mut counters = Vec::new();
        for block in doc.find_in_with_class(section, CLASS_KPI) {
            let label = doc
                .find_in_with_class(block, CLASS_KPI_LABEL)
                .first()
                .map(|&n| doc.text_content(n))
                .unwrap_or_default();
            let Some(number) = doc.find_in_with_class(block, CLASS_KPI_NUMBER).first().copied()
            else {
                continue;
            };
            let Some(&(_, target)) = TARGETS.iter().find(|(name, _)| *name == label.trim()) else {
                tracing::debug!(label = label.trim(), "unrecognized KPI label; skipping");
                continue;
            };
            counters.push(Counter {
                number,
                target,
                spring: None,
            });
        }
        Self {
            section,
            counters,
            threshold,
            triggered: false,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Check visibility and start the springs on first entry. With
    /// motion disabled the final numbers are written immediately.
    pub fn evaluate(&mut self, doc: &mut Document, motion_enabled: bool) {
        if self.triggered || !doc.contains(self.section) {
            return;
        }
        let rect = doc.bounding_client_rect(self.section);
        let visible = rect.vertical_overlap(0.0, doc.viewport.height);
        if rect.height <= 0.0 || visible / rect.height < self.threshold {
            return;
        }
        self.triggered = true;
        tracing::debug!("KPI counters triggered");
        for counter in &mut self.counters {
            if motion_enabled {
                counter.spring = Some(Spring::new(0.0, counter.target, SpringConfig::counter()));
            } else {
                doc.set_text(counter.number, &format!("{}%", counter.target.round() as i32));
            }
        }
    }

    /// Sample running springs and write the rounded percentages.
    pub fn tick(&mut self, doc: &mut Document, now_ms: f64) {
        if !self.triggered {
            return;
        }
        for counter in &mut self.counters {
            let Some(spring) = counter.spring.as_mut() else {
                continue;
            };
            if spring.is_finished() {
                continue;
            }
            let sample = spring.sample(now_ms);
            doc.set_text(counter.number, &format!("{}%", sample.value.round() as i32));
        }
    }

    pub fn all_settled(&self) -> bool {
        self.counters
            .iter()
            .all(|c| c.spring.as_ref().map(Spring::is_finished).unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage;
    use motif_dom::Rect;

    fn bound(doc: &mut Document) -> (NodeId, KpiCounters) {
        let section = doc
            .find_all_with_attr(crate::bind::ATTR_SLICE)
            .into_iter()
            .find(|&n| doc.attr(n, crate::bind::ATTR_SLICE) == Some(crate::bind::SLICE_ACHIEVEMENTS))
            .unwrap();
        let counters = KpiCounters::bind(doc, section, 0.35);
        (section, counters)
    }

    #[test]
    fn binds_all_reference_metrics() {
        let mut doc = stage::sample_stage();
        let (_, counters) = bound(&mut doc);
        assert_eq!(counters.counters.len(), 3);
        let targets: Vec<f32> = counters.counters.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![95.0, 40.0, 99.0]);
    }

    #[test]
    fn triggers_once_and_counts_to_target() {
        let mut doc = stage::sample_stage();
        let (section, mut counters) = bound(&mut doc);
        doc.set_rect(section, Rect::new(0.0, 1200.0, 1280.0, 400.0));

        counters.evaluate(&mut doc, true);
        assert!(!counters.is_triggered());

        doc.scroll_to(900.0);
        counters.evaluate(&mut doc, true);
        assert!(counters.is_triggered());

        let mut now = 0.0;
        while !counters.all_settled() && now < 10_000.0 {
            now += 1000.0 / 60.0;
            counters.tick(&mut doc, now);
        }
        assert!(counters.all_settled());
        let first = counters.counters[0].number;
        assert_eq!(doc.text_content(first), "95%");
    }

    #[test]
    fn reduced_motion_writes_final_numbers_immediately() {
        let mut doc = stage::sample_stage();
        let (section, mut counters) = bound(&mut doc);
        doc.set_rect(section, Rect::new(0.0, 100.0, 1280.0, 400.0));

        counters.evaluate(&mut doc, false);
        assert!(counters.is_triggered());
        let last = counters.counters[2].number;
        assert_eq!(doc.text_content(last), "99%");
        assert!(counters.all_settled());
    }

    #[test]
    fn revisiting_the_section_does_not_restart() {
        let mut doc = stage::sample_stage();
        let (section, mut counters) = bound(&mut doc);
        doc.set_rect(section, Rect::new(0.0, 100.0, 1280.0, 400.0));

        counters.evaluate(&mut doc, false);
        let number = counters.counters[0].number;
        doc.set_text(number, "settled");
        counters.evaluate(&mut doc, false);
        assert_eq!(doc.text_content(number), "settled");
    }
}
