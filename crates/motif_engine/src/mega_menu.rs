//! Mega-menu controller.
//!
//! Two mutually exclusive hover/focus panels under the nav. Opening one
//! closes the other synchronously. Close is debounced by a deadline that
//! any re-enter cancels; Escape, a pointer-down outside the nav and open
//! panel, or a viewport downgrade below desktop width close immediately.
//!
//! The services panel carries a preview (description + image) that swaps
//! to whichever service link is hovered or focused, cross-fading through
//! a single motion slot so rapid hops never stack animations.

use motif_animation::{Easing, MotionSlot, StyleKeyframe, StyleProps};
use motif_dom::{Document, NodeId};
use smallvec::SmallVec;

use crate::assets;
use crate::bind::{ATTR_MENU_PANEL, ATTR_MENU_TRIGGER};
use crate::config::{AssetMode, EngineConfig};
use crate::motion::Animator;

const PREVIEW_SWAP_MS: f64 = 350.0;

const CLASS_SERVICE_LINK: &str = "menu-service-link";
const CLASS_PREVIEW_DESC: &str = "menu-preview-desc";
const CLASS_PREVIEW_IMAGE: &str = "menu-preview-image";
const ATTR_PREVIEW_DESC: &str = "data-preview-desc";
const ATTR_PREVIEW_SRC: &str = "data-preview-src";
const ATTR_PREVIEW_SRCSET: &str = "data-preview-srcset";
const ATTR_PREVIEW_ALT: &str = "data-preview-alt";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKey {
    Services,
    Cases,
}

impl PanelKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKey::Services => "services",
            PanelKey::Cases => "cases",
        }
    }

    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "services" => Some(PanelKey::Services),
            "cases" => Some(PanelKey::Cases),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Panel {
    key: PanelKey,
    trigger: NodeId,
    panel: NodeId,
}

struct ServicesPreview {
    desc: NodeId,
    image: NodeId,
    slot: MotionSlot,
    current: Option<NodeId>,
}

pub struct MegaMenuController {
    nav: NodeId,
    panels: SmallVec<[Panel; 2]>,
    open_key: Option<PanelKey>,
    close_deadline: Option<f64>,
    preview: Option<ServicesPreview>,
}

impl MegaMenuController {
    pub fn bind(doc: &mut Document, nav: NodeId) -> Self {
        let mut panels: SmallVec<[Panel; 2]> = SmallVec::new();
        for trigger in doc.find_all_with_attr(ATTR_MENU_TRIGGER) {
            let Some(key) = doc.attr(trigger, ATTR_MENU_TRIGGER).and_then(PanelKey::from_attr)
            else {
                continue;
            };
            let Some(panel) = doc
                .find_all_with_attr(ATTR_MENU_PANEL)
                .into_iter()
                .find(|&p| doc.attr(p, ATTR_MENU_PANEL) == Some(key.as_str()))
            else {
                continue;
            };
            doc.set_attr(panel, "aria-hidden", "true");
            panels.push(Panel {
                key,
                trigger,
                panel,
            });
        }

        let preview = panels
            .iter()
            .find(|p| p.key == PanelKey::Services)
            .and_then(|p| {
                let desc = doc
                    .find_in_with_class(p.panel, CLASS_PREVIEW_DESC)
                    .into_iter()
                    .next()?;
                let image = doc
                    .find_in_with_class(p.panel, CLASS_PREVIEW_IMAGE)
                    .into_iter()
                    .next()?;
                Some(ServicesPreview {
                    desc,
                    image,
                    slot: MotionSlot::new(),
                    current: None,
                })
            });

        Self {
            nav,
            panels,
            open_key: None,
            close_deadline: None,
            preview,
        }
    }

    pub fn open_key(&self) -> Option<PanelKey> {
        self.open_key
    }

    fn panel_for(&self, key: PanelKey) -> Option<Panel> {
        self.panels.iter().copied().find(|p| p.key == key)
    }

    fn key_under(&self, doc: &Document, node: NodeId) -> Option<PanelKey> {
        self.panels
            .iter()
            .find(|p| doc.is_inside(node, p.trigger) || doc.is_inside(node, p.panel))
            .map(|p| p.key)
    }

    fn apply_open(&self, doc: &mut Document, panel: Panel, open: bool) {
        if open {
            doc.set_attr(panel.panel, "data-open", "true");
            doc.set_attr(panel.panel, "aria-hidden", "false");
            doc.set_attr(panel.trigger, "aria-expanded", "true");
        } else {
            doc.remove_attr(panel.panel, "data-open");
            doc.set_attr(panel.panel, "aria-hidden", "true");
            doc.set_attr(panel.trigger, "aria-expanded", "false");
        }
    }

    fn open(&mut self, doc: &mut Document, key: PanelKey) {
        if self.open_key == Some(key) {
            self.close_deadline = None;
            return;
        }
        if let Some(prev) = self.open_key.take() {
            if let Some(panel) = self.panel_for(prev) {
                self.apply_open(doc, panel, false);
            }
        }
        if let Some(panel) = self.panel_for(key) {
            self.apply_open(doc, panel, true);
            self.open_key = Some(key);
            self.close_deadline = None;
            tracing::debug!(panel = key.as_str(), "mega menu opened");
        }
    }

    /// Close immediately, bypassing the debounce.
    pub fn close_now(&mut self, doc: &mut Document) {
        self.close_deadline = None;
        if let Some(key) = self.open_key.take() {
            if let Some(panel) = self.panel_for(key) {
                self.apply_open(doc, panel, false);
            }
            tracing::debug!(panel = key.as_str(), "mega menu closed");
        }
    }

    // ========================================================================
    // Event entry points
    // ========================================================================

    pub fn on_pointer_enter(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        node: NodeId,
        now_ms: f64,
    ) {
        if !config.is_desktop(doc.viewport.width) {
            return;
        }
        if let Some(key) = self.key_under(doc, node) {
            self.open(doc, key);
        }
        if self.open_key == Some(PanelKey::Services) {
            self.maybe_swap_preview(doc, animator, config, node, now_ms);
        }
    }

    pub fn on_pointer_leave(&mut self, doc: &Document, config: &EngineConfig, node: NodeId, now_ms: f64) {
        if self.open_key.is_none() {
            return;
        }
        if self.key_under(doc, node).is_some() {
            self.close_deadline = Some(now_ms + config.menu_close_delay_ms);
        }
    }

    pub fn on_focus_in(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        node: NodeId,
        now_ms: f64,
    ) {
        self.on_pointer_enter(doc, animator, config, node, now_ms);
    }

    pub fn on_focus_out(&mut self, doc: &Document, config: &EngineConfig, node: NodeId, now_ms: f64) {
        self.on_pointer_leave(doc, config, node, now_ms);
    }

    /// Pointer-down anywhere: outside the nav and the open panel closes
    /// within the same event tick.
    pub fn on_pointer_down(&mut self, doc: &mut Document, node: NodeId) {
        let Some(key) = self.open_key else {
            return;
        };
        let inside_panel = self
            .panel_for(key)
            .map(|p| doc.is_inside(node, p.panel))
            .unwrap_or(false);
        if !doc.is_inside(node, self.nav) && !inside_panel {
            self.close_now(doc);
        }
    }

    pub fn on_escape(&mut self, doc: &mut Document) {
        self.close_now(doc);
    }

    pub fn on_resize(&mut self, doc: &mut Document, config: &EngineConfig) {
        if !config.is_desktop(doc.viewport.width) {
            self.close_now(doc);
        }
    }

    /// Expire a pending debounced close.
    pub fn tick(&mut self, doc: &mut Document, now_ms: f64) {
        if let Some(deadline) = self.close_deadline {
            if now_ms >= deadline {
                self.close_now(doc);
            }
        }
    }

    // ========================================================================
    // Services preview swap
    // ========================================================================

    fn maybe_swap_preview(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        config: &EngineConfig,
        node: NodeId,
        now_ms: f64,
    ) {
        let Some(link) = doc.closest_with_class(node, CLASS_SERVICE_LINK) else {
            return;
        };
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        if preview.current == Some(link) {
            return;
        }
        preview.current = Some(link);

        if let Some(desc) = doc.attr(link, ATTR_PREVIEW_DESC).map(str::to_owned) {
            doc.set_text(preview.desc, &desc);
        }
        if let Some(src) = doc.attr(link, ATTR_PREVIEW_SRC).map(str::to_owned) {
            if config.asset_mode == AssetMode::Remote {
                doc.set_attr(preview.image, "src", &src);
            } else {
                doc.set_attr(preview.image, assets::ATTR_REMOTE_SRC, &src);
            }
        }
        if let Some(srcset) = doc.attr(link, ATTR_PREVIEW_SRCSET).map(str::to_owned) {
            if config.asset_mode == AssetMode::Remote {
                doc.set_attr(preview.image, "srcset", &srcset);
            } else {
                doc.set_attr(preview.image, assets::ATTR_REMOTE_SRCSET, &srcset);
            }
        }
        if let Some(alt) = doc.attr(link, ATTR_PREVIEW_ALT).map(str::to_owned) {
            doc.set_attr(preview.image, "alt", &alt);
        }

        let handle = animator.animate(
            doc,
            preview.image,
            vec![
                StyleKeyframe::new(0.0, StyleProps::opacity(0.0).with_scale(1.05)),
                StyleKeyframe::new(1.0, StyleProps::opacity(1.0).with_scale(1.0)),
            ],
            PREVIEW_SWAP_MS,
            Easing::STANDARD,
            now_ms,
        );
        preview.slot.replace(animator.scheduler_mut(), handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ID_NAV;
    use crate::stage;

    fn setup() -> (Document, Animator, MegaMenuController, EngineConfig) {
        let mut doc = stage::sample_stage();
        let nav = doc.get_element_by_id(ID_NAV).unwrap();
        let animator = Animator::for_document(&doc);
        let menus = MegaMenuController::bind(&mut doc, nav);
        (doc, animator, menus, EngineConfig::default())
    }

    fn trigger(doc: &Document, key: PanelKey) -> NodeId {
        doc.find_all_with_attr(ATTR_MENU_TRIGGER)
            .into_iter()
            .find(|&n| doc.attr(n, ATTR_MENU_TRIGGER) == Some(key.as_str()))
            .unwrap()
    }

    fn panel(doc: &Document, key: PanelKey) -> NodeId {
        doc.find_all_with_attr(ATTR_MENU_PANEL)
            .into_iter()
            .find(|&n| doc.attr(n, ATTR_MENU_PANEL) == Some(key.as_str()))
            .unwrap()
    }

    #[test]
    fn opens_on_enter_and_panels_are_mutually_exclusive() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let cases = trigger(&doc, PanelKey::Cases);
        let services = trigger(&doc, PanelKey::Services);

        menus.on_pointer_enter(&mut doc, &mut animator, &config, cases, 0.0);
        assert_eq!(menus.open_key(), Some(PanelKey::Cases));

        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 10.0);
        assert_eq!(menus.open_key(), Some(PanelKey::Services));
        assert_eq!(
            doc.attr(panel(&doc, PanelKey::Cases), "aria-hidden"),
            Some("true")
        );
        assert_eq!(
            doc.attr(panel(&doc, PanelKey::Services), "data-open"),
            Some("true")
        );
    }

    #[test]
    fn close_is_debounced_and_cancelled_by_reentry() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let services = trigger(&doc, PanelKey::Services);

        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);
        menus.on_pointer_leave(&doc, &config, services, 100.0);

        // Still open before the deadline.
        menus.tick(&mut doc, 200.0);
        assert_eq!(menus.open_key(), Some(PanelKey::Services));

        // Re-enter the panel itself; the pending close is dropped.
        let services_panel = panel(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services_panel, 220.0);
        menus.tick(&mut doc, 1000.0);
        assert_eq!(menus.open_key(), Some(PanelKey::Services));

        // Leave and let the deadline pass.
        menus.on_pointer_leave(&doc, &config, services_panel, 1100.0);
        menus.tick(&mut doc, 1250.0);
        assert_eq!(menus.open_key(), None);
    }

    #[test]
    fn outside_pointer_down_and_escape_bypass_the_debounce() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let services = trigger(&doc, PanelKey::Services);
        let outside = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, outside);

        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);
        menus.on_pointer_down(&mut doc, outside);
        assert_eq!(menus.open_key(), None);

        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 10.0);
        menus.on_escape(&mut doc);
        assert_eq!(menus.open_key(), None);
    }

    #[test]
    fn pointer_down_inside_the_open_panel_keeps_it_open() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let services = trigger(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);

        let inside = panel(&doc, PanelKey::Services);
        menus.on_pointer_down(&mut doc, inside);
        assert_eq!(menus.open_key(), Some(PanelKey::Services));
    }

    #[test]
    fn never_opens_below_desktop_width() {
        let (mut doc, mut animator, mut menus, config) = setup();
        doc.resize(700.0, 900.0);
        let services = trigger(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);
        assert_eq!(menus.open_key(), None);
    }

    #[test]
    fn viewport_downgrade_force_closes() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let services = trigger(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);
        assert_eq!(menus.open_key(), Some(PanelKey::Services));

        doc.resize(700.0, 900.0);
        menus.on_resize(&mut doc, &config);
        assert_eq!(menus.open_key(), None);
    }

    #[test]
    fn hovering_a_service_link_swaps_the_preview() {
        let (mut doc, mut animator, mut menus, config) = setup();
        let services = trigger(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);

        let link = doc.find_all_with_class(CLASS_SERVICE_LINK)[0];
        menus.on_pointer_enter(&mut doc, &mut animator, &config, link, 10.0);

        let desc = doc.find_all_with_class(CLASS_PREVIEW_DESC)[0];
        let image = doc.find_all_with_class(CLASS_PREVIEW_IMAGE)[0];
        assert_eq!(
            doc.text_content(desc),
            doc.attr(link, ATTR_PREVIEW_DESC).unwrap()
        );
        assert_eq!(doc.attr(image, "src"), doc.attr(link, ATTR_PREVIEW_SRC));
        assert_eq!(
            doc.attr(image, "srcset"),
            doc.attr(link, ATTR_PREVIEW_SRCSET)
        );
        assert_eq!(doc.attr(image, "alt"), doc.attr(link, ATTR_PREVIEW_ALT));
        assert_eq!(animator.active_count(), 1);

        // Hovering the same link again does not restack the cross-fade.
        animator.tick(&mut doc, 400.0);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, link, 410.0);
        assert_eq!(animator.active_count(), 0);
    }

    #[test]
    fn placeholder_mode_defers_preview_sources() {
        let (mut doc, mut animator, mut menus, mut config) = setup();
        config.asset_mode = AssetMode::Placeholder;
        let services = trigger(&doc, PanelKey::Services);
        menus.on_pointer_enter(&mut doc, &mut animator, &config, services, 0.0);

        let link = doc.find_all_with_class(CLASS_SERVICE_LINK)[0];
        menus.on_pointer_enter(&mut doc, &mut animator, &config, link, 10.0);

        let image = doc.find_all_with_class(CLASS_PREVIEW_IMAGE)[0];
        assert_eq!(doc.attr(image, "src"), None);
        assert_eq!(doc.attr(image, "srcset"), None);
        assert_eq!(
            doc.attr(image, assets::ATTR_REMOTE_SRC),
            doc.attr(link, ATTR_PREVIEW_SRC)
        );
        assert_eq!(
            doc.attr(image, assets::ATTR_REMOTE_SRCSET),
            doc.attr(link, ATTR_PREVIEW_SRCSET)
        );
    }
}
