//! Sample stage.
//!
//! Builds the full markup contract the engine operates on: preloader,
//! app shell, nav with mega menus, and the typed content slices. Used by
//! the demo binary and throughout the test suites; geometry is seeded
//! with plausible desktop values so scroll-driven behavior is exercisable
//! without a layout engine.

use motif_dom::{Document, NodeId, Rect};

use crate::assets::{ATTR_REMOTE_SRC, ATTR_REMOTE_SRCSET};
use crate::bind;

fn div(doc: &mut Document, parent: NodeId, class: &str) -> NodeId {
    let node = doc.create_element("div");
    doc.add_class(node, class);
    doc.append_child(parent, node);
    node
}

fn text_el(doc: &mut Document, parent: NodeId, tag: &str, class: &str, text: &str) -> NodeId {
    let node = doc.create_element(tag);
    if !class.is_empty() {
        doc.add_class(node, class);
    }
    doc.set_text(node, text);
    doc.append_child(parent, node);
    node
}

fn preloader(doc: &mut Document) {
    let root = doc.create_element("div");
    doc.set_attr(root, "id", bind::ID_PRELOADER);
    let body = doc.body();
    doc.append_child(body, root);

    let icon_wrap = div(doc, root, bind::CLASS_ICON_WRAP);
    div(doc, icon_wrap, bind::CLASS_ICON);
    div(doc, root, bind::CLASS_PROGRESS_TRACK);
    text_el(doc, root, "span", bind::CLASS_COUNTER, "0%");

    let logo = div(doc, root, bind::CLASS_LOGO);
    let wordmark_wrap = div(doc, logo, bind::CLASS_WORDMARK_WRAP);
    let wordmark = text_el(doc, wordmark_wrap, "span", bind::CLASS_WORDMARK, "MOTIF");
    doc.set_rect(wordmark, Rect::new(0.0, 0.0, 220.0, 48.0));
}

fn nav(doc: &mut Document) {
    let nav = doc.create_element("nav");
    doc.set_attr(nav, "id", bind::ID_NAV);
    let body = doc.body();
    doc.append_child(body, nav);
    doc.set_rect(nav, Rect::new(0.0, 0.0, 1280.0, 64.0));

    let toggle = doc.create_element("button");
    doc.add_class(toggle, bind::CLASS_NAV_TOGGLE);
    doc.append_child(nav, toggle);

    for key in ["services", "cases"] {
        let trigger = text_el(doc, nav, "a", "", key);
        doc.set_attr(trigger, bind::ATTR_MENU_TRIGGER, key);

        let panel = doc.create_element("div");
        doc.set_attr(panel, bind::ATTR_MENU_PANEL, key);
        doc.append_child(nav, panel);

        if key == "services" {
            for (name, desc) in [
                ("Platform engineering", "Build and run resilient platforms."),
                ("Design systems", "Ship consistent interfaces faster."),
            ] {
                let link = text_el(doc, panel, "a", "menu-service-link", name);
                doc.set_attr(link, "data-preview-desc", desc);
                doc.set_attr(
                    link,
                    "data-preview-src",
                    &format!("https://cdn.example/{}.webp", name.to_lowercase().replace(' ', "-")),
                );
                doc.set_attr(
                    link,
                    "data-preview-srcset",
                    &format!(
                        "https://cdn.example/{}@2x.webp 2x",
                        name.to_lowercase().replace(' ', "-")
                    ),
                );
                doc.set_attr(link, "data-preview-alt", name);
            }
            text_el(doc, panel, "p", "menu-preview-desc", "");
            let image = doc.create_element("img");
            doc.add_class(image, "menu-preview-image");
            doc.append_child(panel, image);
        }
    }
}

fn achievements(doc: &mut Document, shell: NodeId) {
    let section = doc.create_element("section");
    doc.set_attr(section, bind::ATTR_SLICE, bind::SLICE_ACHIEVEMENTS);
    doc.append_child(shell, section);
    doc.set_rect(section, Rect::new(0.0, 2400.0, 1280.0, 500.0));

    for (label, number) in [
        ("Clients who stay", "0%"),
        ("Conversion growth", "0%"),
        ("Reliable, secure systems", "0%"),
    ] {
        let block = div(doc, section, "kpi");
        text_el(doc, block, "span", "kpi-number", number);
        text_el(doc, block, "span", "kpi-label", label);
    }
}

fn services_overview(doc: &mut Document, shell: NodeId) {
    let section = doc.create_element("section");
    doc.set_attr(section, bind::ATTR_SLICE, bind::SLICE_SERVICES_OVERVIEW);
    doc.append_child(shell, section);
    doc.set_rect(section, Rect::new(0.0, 900.0, 1280.0, 700.0));

    let manifesto = text_el(
        doc,
        section,
        "p",
        bind::CLASS_MANIFESTO,
        "We design and build digital products that hold up under real use",
    );
    doc.set_rect(manifesto, Rect::new(80.0, 1000.0, 1120.0, 180.0));

    let heading = text_el(
        doc,
        section,
        "h2",
        bind::CLASS_OVERFLOW_HIDDEN,
        "What we stand for and how we work with teams like yours",
    );
    doc.set_rect(heading, Rect::new(80.0, 920.0, 600.0, 60.0));
}

fn services_accordion(doc: &mut Document, shell: NodeId) {
    let section = doc.create_element("section");
    doc.set_attr(section, bind::ATTR_SLICE, bind::SLICE_SERVICES_ACCORDION);
    doc.append_child(shell, section);
    doc.set_rect(section, Rect::new(0.0, 1700.0, 1280.0, 600.0));

    for name in ["Strategy", "Engineering", "Design"] {
        let row = div(doc, section, "service-row");
        text_el(doc, row, "h3", "", name);
        let preview = doc.create_element("img");
        doc.add_class(preview, "service-preview");
        doc.set_attr(preview, ATTR_REMOTE_SRC, &format!("https://cdn.example/{}.webp", name));
        doc.append_child(row, preview);

        let item = div(doc, section, "accordion-item");
        text_el(doc, item, "h3", "accordion-header", name);
        div(doc, item, "accordion-icon");
        let body = div(doc, item, "accordion-body");
        text_el(doc, body, "p", "", "Scoped, shipped, and supported.");
    }
}

fn case_showcase(doc: &mut Document, shell: NodeId) {
    let section = doc.create_element("section");
    doc.set_attr(section, bind::ATTR_SLICE, bind::SLICE_CASE_SHOWCASE);
    doc.append_child(shell, section);
    doc.set_rect(section, Rect::new(0.0, 3000.0, 1280.0, 600.0));

    let slider = div(doc, section, "case-slider");
    doc.set_rect(slider, Rect::new(0.0, 3100.0, 800.0, 400.0));
    for i in 0..3 {
        let slide = div(doc, slider, "case-slide");
        doc.set_rect(slide, Rect::new(i as f32 * 400.0, 3100.0, 400.0, 400.0));
        let image = doc.create_element("img");
        doc.set_attr(image, ATTR_REMOTE_SRC, &format!("https://cdn.example/case-{}.webp", i));
        doc.set_attr(
            image,
            ATTR_REMOTE_SRCSET,
            &format!("https://cdn.example/case-{}@2x.webp 2x", i),
        );
        doc.append_child(slide, image);
    }
    let prev = doc.create_element("button");
    doc.add_class(prev, "slider-prev");
    doc.append_child(section, prev);
    let next = doc.create_element("button");
    doc.add_class(next, "slider-next");
    doc.append_child(section, next);
}

/// A complete desktop stage with seeded geometry.
pub fn sample_stage() -> Document {
    let mut doc = Document::new();
    doc.resize(1280.0, 800.0);
    preloader(&mut doc);
    nav(&mut doc);

    let shell = doc.create_element("main");
    doc.set_attr(shell, "id", bind::ID_APP_SHELL);
    doc.add_class(shell, "app-hidden");
    let body = doc.body();
    doc.append_child(body, shell);

    let hero = text_el(
        &mut doc,
        shell,
        "h1",
        bind::CLASS_OVERFLOW_HIDDEN,
        "Software that outlasts the launch party",
    );
    doc.set_rect(hero, Rect::new(80.0, 200.0, 900.0, 120.0));

    services_overview(&mut doc, shell);
    services_accordion(&mut doc, shell);
    achievements(&mut doc, shell);
    case_showcase(&mut doc, shell);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_satisfies_the_selector_contract() {
        let doc = sample_stage();
        assert!(doc.get_element_by_id(bind::ID_PRELOADER).is_some());
        assert!(doc.get_element_by_id(bind::ID_APP_SHELL).is_some());
        assert!(doc.get_element_by_id(bind::ID_NAV).is_some());
        assert_eq!(doc.find_all_with_attr(bind::ATTR_MENU_TRIGGER).len(), 2);
        assert_eq!(doc.find_all_with_attr(bind::ATTR_MENU_PANEL).len(), 2);
        assert_eq!(doc.find_all_with_class("kpi").len(), 3);
        assert!(!doc.find_all_with_class("case-slide").is_empty());
    }
}
