//! Services section hover and mobile accordion.
//!
//! Desktop rows reveal exactly one preview image each via a clip-path
//! wipe; hovering a row uncovers its image and covers every other. On
//! mobile the same section becomes an accordion with keyboard-operable
//! headers.

use motif_dom::{Document, NodeId};

use crate::config::EngineConfig;

const CLASS_SERVICE_ROW: &str = "service-row";
const CLASS_SERVICE_PREVIEW: &str = "service-preview";
const CLASS_ACCORDION_ITEM: &str = "accordion-item";
const CLASS_ACCORDION_HEADER: &str = "accordion-header";
const CLASS_ACCORDION_BODY: &str = "accordion-body";
const CLASS_ACCORDION_ICON: &str = "accordion-icon";

const COVERED: &str = "inset(0% 0% 100% 0%)";
const UNCOVERED: &str = "inset(0% 0% 0% 0%)";

struct Row {
    row: NodeId,
    preview: NodeId,
}

struct AccordionItem {
    header: NodeId,
    body: NodeId,
    icon: Option<NodeId>,
    expanded: bool,
}

pub struct ServicesHover {
    rows: Vec<Row>,
    items: Vec<AccordionItem>,
}

impl ServicesHover {
    pub fn bind(doc: &mut Document, section: NodeId) -> Self {
        let row_nodes = doc.find_in_with_class(section, CLASS_SERVICE_ROW);
        let previews = doc.find_in_with_class(section, CLASS_SERVICE_PREVIEW);
        let rows: Vec<Row> = row_nodes
            .iter()
            .zip(previews.iter())
            .map(|(&row, &preview)| Row { row, preview })
            .collect();
        for row in &rows {
            doc.set_style(
                row.preview,
                "transition",
                "clip-path 600ms cubic-bezier(0.4, 0, 0.2, 1)",
            );
            doc.set_style(row.preview, "clip-path", COVERED);
        }

        let mut items = Vec::new();
        for item in doc.find_in_with_class(section, CLASS_ACCORDION_ITEM) {
            let Some(header) = doc
                .find_in_with_class(item, CLASS_ACCORDION_HEADER)
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(body) = doc
                .find_in_with_class(item, CLASS_ACCORDION_BODY)
                .into_iter()
                .next()
            else {
                continue;
            };
            let icon = doc
                .find_in_with_class(item, CLASS_ACCORDION_ICON)
                .into_iter()
                .next();
            doc.set_attr(header, "role", "button");
            doc.set_attr(header, "tabindex", "0");
            doc.set_attr(header, "aria-expanded", "false");
            doc.set_style(body, "grid-template-rows", "0fr");
            doc.set_style(body, "opacity", "0");
            items.push(AccordionItem {
                header,
                body,
                icon,
                expanded: false,
            });
        }

        Self { rows, items }
    }

    /// Cover every preview image.
    pub fn hide_all(&self, doc: &mut Document) {
        for row in &self.rows {
            doc.set_style(row.preview, "clip-path", COVERED);
        }
    }

    /// Desktop hover: uncover the hovered row's preview, cover the rest.
    pub fn on_pointer_enter(
        &self,
        doc: &mut Document,
        config: &EngineConfig,
        node: NodeId,
    ) {
        if !config.is_desktop(doc.viewport.width) {
            return;
        }
        let Some(hovered) = self
            .rows
            .iter()
            .position(|r| doc.is_inside(node, r.row))
        else {
            return;
        };
        for (i, row) in self.rows.iter().enumerate() {
            doc.set_style(
                row.preview,
                "clip-path",
                if i == hovered { UNCOVERED } else { COVERED },
            );
        }
    }

    pub fn on_pointer_leave(&self, doc: &mut Document, node: NodeId) {
        if self.rows.iter().any(|r| doc.is_inside(node, r.row)) {
            self.hide_all(doc);
        }
    }

    /// Accordion activation by click.
    pub fn on_click(&mut self, doc: &mut Document, node: NodeId) {
        let Some(index) = self
            .items
            .iter()
            .position(|i| doc.is_inside(node, i.header))
        else {
            return;
        };
        self.toggle(doc, index);
    }

    /// Enter and Space activate a focused header.
    pub fn on_key_down(&mut self, doc: &mut Document, node: NodeId, key: &str) -> bool {
        if key != "Enter" && key != " " {
            return false;
        }
        let Some(index) = self.items.iter().position(|i| i.header == node) else {
            return false;
        };
        self.toggle(doc, index);
        true
    }

    fn toggle(&mut self, doc: &mut Document, index: usize) {
        let item = &mut self.items[index];
        item.expanded = !item.expanded;
        let (rows, opacity, rotation, expanded) = if item.expanded {
            ("1fr", "1", "rotate(45deg)", "true")
        } else {
            ("0fr", "0", "rotate(0deg)", "false")
        };
        doc.set_style(item.body, "grid-template-rows", rows);
        doc.set_style(item.body, "opacity", opacity);
        doc.set_attr(item.header, "aria-expanded", expanded);
        if let Some(icon) = item.icon {
            doc.set_style(icon, "transform", rotation);
        }
    }
}
