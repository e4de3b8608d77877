//! Stage bindings.
//!
//! The selector contract between the engine and the surrounding markup,
//! resolved once at mount into typed handles. Components receive handles,
//! never selector strings, so any missing piece of markup turns exactly
//! one component into a no-op.

use motif_dom::{Document, NodeId};

// ============================================================================
// Selector contract
// ============================================================================

pub const ID_PRELOADER: &str = "preloader";
pub const ID_APP_SHELL: &str = "app-shell";
pub const ID_NAV: &str = "site-nav";

pub const CLASS_ICON_WRAP: &str = "preloader-icon-wrap";
pub const CLASS_ICON: &str = "preloader-icon";
pub const CLASS_PROGRESS_TRACK: &str = "preloader-progress-track";
pub const CLASS_COUNTER: &str = "preloader-counter";
pub const CLASS_WORDMARK_WRAP: &str = "preloader-wordmark-wrap";
pub const CLASS_WORDMARK: &str = "preloader-wordmark";
pub const CLASS_LOGO: &str = "preloader-logo";

pub const CLASS_NAV_TOGGLE: &str = "nav-toggle";
pub const CLASS_NAV_OPEN: &str = "nav-open";

/// Typed content sections: `data-slice="achievements"` and friends.
pub const ATTR_SLICE: &str = "data-slice";
pub const SLICE_ACHIEVEMENTS: &str = "achievements";
pub const SLICE_SERVICES_OVERVIEW: &str = "services_overview";
pub const SLICE_SERVICES_ACCORDION: &str = "services_accordion";
pub const SLICE_CASE_SHOWCASE: &str = "case_studies_showcase";

/// Mega-menu triggers carry `data-menu`, panels `data-menu-panel`, both
/// valued `services` or `cases`.
pub const ATTR_MENU_TRIGGER: &str = "data-menu";
pub const ATTR_MENU_PANEL: &str = "data-menu-panel";

/// Panels marked split-eligible; the structural heuristic also accepts
/// leaves under a fit-content wrapper.
pub const CLASS_OVERFLOW_HIDDEN: &str = "overflow-hidden";
pub const CLASS_REVEAL_IN: &str = "reveal-in";
pub const CLASS_LINE_MASK: &str = "line-mask";
pub const CLASS_LINE: &str = "line";
pub const ATTR_SPLIT_DONE: &str = "data-split-lines";

pub const CLASS_MANIFESTO: &str = "manifesto";

#[derive(Clone, Copy, Debug)]
pub struct PreloaderBindings {
    /// Doubles as the full-screen overlay that fades at the end.
    pub root: NodeId,
    pub icon_wrap: NodeId,
    pub icon: NodeId,
    pub progress_track: NodeId,
    pub counter: NodeId,
    pub wordmark_wrap: NodeId,
    pub wordmark: NodeId,
    pub logo: NodeId,
}

/// Every node the engine drives, resolved up front.
#[derive(Clone, Debug, Default)]
pub struct StageBindings {
    pub preloader: Option<PreloaderBindings>,
    pub app_shell: Option<NodeId>,
    pub nav: Option<NodeId>,
    pub nav_toggle: Option<NodeId>,
    pub achievements: Option<NodeId>,
    pub services_overview: Option<NodeId>,
    pub services_accordion: Option<NodeId>,
    pub case_showcase: Option<NodeId>,
    pub manifesto: Option<NodeId>,
}

impl StageBindings {
    pub fn resolve(doc: &Document) -> Self {
        let preloader = doc.get_element_by_id(ID_PRELOADER).and_then(|root| {
            let find = |class: &str| {
                doc.find_in_with_class(root, class)
                    .into_iter()
                    .next()
            };
            Some(PreloaderBindings {
                root,
                icon_wrap: find(CLASS_ICON_WRAP)?,
                icon: find(CLASS_ICON)?,
                progress_track: find(CLASS_PROGRESS_TRACK)?,
                counter: find(CLASS_COUNTER)?,
                wordmark_wrap: find(CLASS_WORDMARK_WRAP)?,
                wordmark: find(CLASS_WORDMARK)?,
                logo: find(CLASS_LOGO)?,
            })
        });
        if doc.get_element_by_id(ID_PRELOADER).is_some() && preloader.is_none() {
            tracing::warn!("preloader root present but inner markup incomplete; skipping");
        }

        let slice = |name: &str| {
            doc.find_all_with_attr(ATTR_SLICE)
                .into_iter()
                .find(|&n| doc.attr(n, ATTR_SLICE) == Some(name))
        };
        let services_overview = slice(SLICE_SERVICES_OVERVIEW);
        let manifesto = services_overview.and_then(|section| {
            doc.find_in_with_class(section, CLASS_MANIFESTO)
                .into_iter()
                .next()
        });

        Self {
            preloader,
            app_shell: doc.get_element_by_id(ID_APP_SHELL),
            nav: doc.get_element_by_id(ID_NAV),
            nav_toggle: doc.find_first_with_class(CLASS_NAV_TOGGLE),
            achievements: slice(SLICE_ACHIEVEMENTS),
            services_overview,
            services_accordion: slice(SLICE_SERVICES_ACCORDION),
            case_showcase: slice(SLICE_CASE_SHOWCASE),
            manifesto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage;

    #[test]
    fn resolves_the_sample_stage() {
        let doc = stage::sample_stage();
        let bindings = StageBindings::resolve(&doc);
        assert!(bindings.preloader.is_some());
        assert!(bindings.app_shell.is_some());
        assert!(bindings.nav.is_some());
        assert!(bindings.achievements.is_some());
        assert!(bindings.manifesto.is_some());
        assert!(bindings.case_showcase.is_some());
    }

    #[test]
    fn missing_markup_leaves_holes_not_failures() {
        let doc = Document::new();
        let bindings = StageBindings::resolve(&doc);
        assert!(bindings.preloader.is_none());
        assert!(bindings.nav.is_none());
    }
}
