//! In-memory element tree.
//!
//! A deliberately small model of the parts of a document the choreography
//! reads and writes: tag, classes, attributes, inline styles, text, and
//! page-coordinate geometry. Hosts build the tree once at startup; the
//! engine resolves the nodes it drives into typed handles and never walks
//! the tree on the hot path.
//!
//! Geometry is supplied by the host (`set_rect`) or derived by
//! [`Document::reflow_inline`], a naive inline-flow layout that is good
//! enough to split word spans into visual lines.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::geometry::Rect;

new_key_type! {
    /// Handle to a node in a [`Document`].
    pub struct NodeId;
}

/// Viewport metrics and scroll position.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: FxHashMap<String, String>,
    styles: FxHashMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    /// Border box in page coordinates.
    rect: Rect,
    /// Offset from the top of the offset parent, used for line detection.
    offset_top: f32,
}

/// An element tree with just enough fidelity for motion work.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    body: NodeId,
    pub viewport: Viewport,
    /// Host signalled `prefers-reduced-motion`.
    pub reduced_motion: bool,
    /// Host exposes an animation backend. When false every transition
    /// snaps to its final state.
    pub supports_animation: bool,
    /// Host exposes visibility observation. When false reveals fire
    /// immediately on bind.
    pub supports_intersection: bool,
    /// Monospace advance used by the naive layout, in px per character.
    pub char_advance: f32,
    /// Line box height used by the naive layout.
    pub line_height: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            tag: "html".into(),
            ..Node::default()
        });
        let body = nodes.insert(Node {
            tag: "body".into(),
            parent: Some(root),
            ..Node::default()
        });
        nodes[root].children.push(body);
        Self {
            nodes,
            root,
            body,
            viewport: Viewport::default(),
            reduced_motion: false,
            supports_animation: true,
            supports_intersection: true,
            char_advance: 10.0,
            line_height: 24.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // ========================================================================
    // Tree construction
    // ========================================================================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node {
            tag: tag.to_owned(),
            ..Node::default()
        })
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old_parent) = self.nodes[child].parent.take() {
            self.nodes[old_parent].children.retain(|&c| c != child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Detach and drop a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            tracing::debug!(?id, "remove of a node no longer in the tree");
            return;
        }
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            self.nodes[parent].children.retain(|&c| c != id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(n) {
                stack.extend(node.children);
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn tag(&self, id: NodeId) -> &str {
        self.nodes.get(id).map(|n| n.tag.as_str()).unwrap_or("")
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Replace the node's content with a single text run, dropping any
    /// existing children.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.remove(child);
        }
        self.nodes[id].text = text.to_owned();
    }

    /// Concatenated text of the node and its subtree, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.nodes.get(id) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }

    pub fn own_text(&self, id: NodeId) -> &str {
        self.nodes.get(id).map(|n| n.text.as_str()).unwrap_or("")
    }

    // ========================================================================
    // Classes, attributes, styles
    // ========================================================================

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let node = &mut self.nodes[id];
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id].classes.retain(|c| c != class);
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id]
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.nodes[id].attrs.remove(name);
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) {
        self.nodes[id]
            .styles
            .insert(prop.to_owned(), value.to_owned());
    }

    pub fn remove_style(&mut self, id: NodeId, prop: &str) {
        self.nodes[id].styles.remove(prop);
    }

    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.styles.get(prop))
            .map(String::as_str)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get_element_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(dom_id))
    }

    pub fn find_all_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    pub fn find_first_with_class(&self, class: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.has_class(n, class))
    }

    pub fn find_all_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.attr(n, name).is_some())
            .collect()
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.tag(n) == tag)
            .collect()
    }

    /// Children of `scope` (not including `scope`) carrying `class`.
    pub fn find_in_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = self.descendants(scope);
        out.retain(|&n| n != scope && self.has_class(n, class));
        out
    }

    /// Subtree of `id` in tree order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.get(n) {
                out.push(n);
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Walk up from `id` looking for an ancestor (or `id` itself) with
    /// `class`.
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if self.has_class(n, class) {
                return Some(n);
            }
            cursor = self.parent(n);
        }
        None
    }

    /// True when `id` is `ancestor` or inside its subtree.
    pub fn is_inside(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if n == ancestor {
                return true;
            }
            cursor = self.parent(n);
        }
        false
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Set the border box in page coordinates.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.nodes[id].rect = rect;
    }

    /// Border box in page coordinates.
    pub fn page_rect(&self, id: NodeId) -> Rect {
        self.nodes.get(id).map(|n| n.rect).unwrap_or_default()
    }

    /// Border box relative to the current viewport.
    pub fn bounding_client_rect(&self, id: NodeId) -> Rect {
        self.page_rect(id).offset_y(-self.viewport.scroll_y)
    }

    pub fn set_offset_top(&mut self, id: NodeId, offset_top: f32) {
        self.nodes[id].offset_top = offset_top;
    }

    pub fn offset_top(&self, id: NodeId) -> f32 {
        self.nodes.get(id).map(|n| n.offset_top).unwrap_or(0.0)
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.viewport.scroll_y = y.max(0.0);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Lay out the direct children of `container` as an inline flow of
    /// fixed-advance word boxes, wrapping at the container width.
    ///
    /// Each child's width is its own text length times [`char_advance`],
    /// its `offset_top` is the line index times [`line_height`], and its
    /// page rect is placed under the container's page rect. Trailing
    /// whitespace in a child's text contributes to its advance but a line
    /// never starts past the container edge.
    ///
    /// [`char_advance`]: Document::char_advance
    /// [`line_height`]: Document::line_height
    pub fn reflow_inline(&mut self, container: NodeId) {
        let container_rect = self.page_rect(container);
        if container_rect.width < self.char_advance {
            tracing::debug!(
                width = container_rect.width,
                "reflow of a container narrower than one character"
            );
        }
        let max_width = container_rect.width.max(self.char_advance);
        let children: Vec<NodeId> = self.children(container).to_vec();

        let mut cursor_x = 0.0_f32;
        let mut line = 0_u32;
        for child in children {
            let chars = self.own_text(child).chars().count() as f32;
            let width = chars * self.char_advance;
            if cursor_x > 0.0 && cursor_x + width > max_width {
                line += 1;
                cursor_x = 0.0;
            }
            let offset_top = line as f32 * self.line_height;
            self.set_offset_top(child, offset_top);
            self.set_rect(
                child,
                Rect::new(
                    container_rect.x + cursor_x,
                    container_rect.y + offset_top,
                    width,
                    self.line_height,
                ),
            );
            cursor_x += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_and_text() {
        let mut doc = Document::new();
        let section = doc.create_element("section");
        doc.append_child(doc.body(), section);
        let a = doc.create_element("span");
        let b = doc.create_element("span");
        doc.set_text(a, "hello ");
        doc.set_text(b, "world");
        doc.append_child(section, a);
        doc.append_child(section, b);

        assert_eq!(doc.text_content(section), "hello world");

        // Replacing text drops the children.
        doc.set_text(section, "flat");
        assert!(doc.children(section).is_empty());
        assert!(!doc.contains(a));
        assert_eq!(doc.text_content(section), "flat");
    }

    #[test]
    fn class_and_attr_queries() {
        let mut doc = Document::new();
        let nav = doc.create_element("nav");
        doc.set_attr(nav, "id", "site-nav");
        doc.add_class(nav, "condensed");
        doc.append_child(doc.body(), nav);
        let link = doc.create_element("a");
        doc.set_attr(link, "data-menu", "services");
        doc.append_child(nav, link);

        assert_eq!(doc.get_element_by_id("site-nav"), Some(nav));
        assert_eq!(doc.find_all_with_class("condensed"), vec![nav]);
        assert_eq!(doc.find_all_with_attr("data-menu"), vec![link]);
        assert_eq!(doc.closest_with_class(link, "condensed"), Some(nav));
        assert!(doc.is_inside(link, nav));
        assert!(!doc.is_inside(nav, link));

        doc.toggle_class(nav, "condensed", false);
        assert!(!doc.has_class(nav, "condensed"));
    }

    #[test]
    fn client_rect_tracks_scroll() {
        let mut doc = Document::new();
        let hero = doc.create_element("section");
        doc.append_child(doc.body(), hero);
        doc.set_rect(hero, Rect::new(0.0, 1000.0, 800.0, 600.0));

        assert_eq!(doc.bounding_client_rect(hero).top(), 1000.0);
        doc.scroll_to(400.0);
        assert_eq!(doc.bounding_client_rect(hero).top(), 600.0);
    }

    #[test]
    fn reflow_wraps_words_into_lines() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.body(), p);
        // 5 chars per line at the default 10px advance.
        doc.set_rect(p, Rect::new(0.0, 0.0, 50.0, 0.0));

        let words = ["aa ", "bb ", "cc"];
        let mut ids = Vec::new();
        for w in words {
            let span = doc.create_element("span");
            doc.set_text(span, w);
            doc.append_child(p, span);
            ids.push(span);
        }
        doc.reflow_inline(p);

        // "aa " fills 30px, "bb " would end at 60px so it wraps. "cc" ends
        // the second line at exactly 50px, which still fits.
        assert_eq!(doc.offset_top(ids[0]), 0.0);
        assert_eq!(doc.offset_top(ids[1]), doc.line_height);
        assert_eq!(doc.offset_top(ids[2]), doc.line_height);
        assert_eq!(doc.page_rect(ids[1]).x, 0.0);
        assert_eq!(doc.page_rect(ids[2]).x, 30.0);
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);
        doc.remove(outer);
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert!(doc.children(doc.body()).is_empty());

        // Removing an already-removed node is a no-op.
        doc.remove(inner);
        assert!(doc.children(doc.body()).is_empty());
    }
}
