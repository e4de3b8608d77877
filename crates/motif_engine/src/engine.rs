//! Engine entry point.
//!
//! [`Engine::mount`] runs once against a prepared document: it resolves
//! the stage bindings, promotes deferred assets, binds every component,
//! and enters the preloader. The host then forwards input events and
//! calls [`Engine::tick`] once per frame with the current time.
//!
//! Event handlers record intent; geometry recomputation happens at most
//! once per tick via pending flags, so fast scrolling never floods the
//! scroll-linked components. Components whose markup is absent are
//! simply not constructed; the rest run unaffected.

use motif_dom::{Document, NodeId, SessionStore};

use crate::assets;
use crate::bind::StageBindings;
use crate::config::EngineConfig;
use crate::counters::KpiCounters;
use crate::manifesto::ManifestoReveal;
use crate::mega_menu::MegaMenuController;
use crate::motion::Animator;
use crate::nav::{MobileNavButton, NavMotionController};
use crate::preloader::Preloader;
use crate::reveal::{self, ScrollReveals};
use crate::services::ServicesHover;
use crate::slider::CaseSlider;

pub struct Engine<S: SessionStore> {
    doc: Document,
    session: S,
    config: EngineConfig,
    animator: Animator,
    bindings: StageBindings,

    preloader: Option<Preloader>,
    nav: Option<NavMotionController>,
    nav_toggle: Option<MobileNavButton>,
    menus: Option<MegaMenuController>,
    manifesto: Option<ManifestoReveal>,
    reveals: ScrollReveals,
    counters: Option<KpiCounters>,
    services: Option<ServicesHover>,
    slider: Option<CaseSlider>,

    mounted_at: f64,
    watchdog_armed: bool,
    split_done: bool,
    scroll_pending: bool,
    resize_pending: bool,
}

impl<S: SessionStore> Engine<S> {
    /// Bind and start everything. Runs once per page view.
    pub fn mount(mut doc: Document, mut session: S, config: EngineConfig, now_ms: f64) -> Self {
        let bindings = StageBindings::resolve(&doc);
        let mut animator = Animator::for_document(&doc);

        assets::promote_all(&mut doc, config.asset_mode);

        let nav = bindings
            .nav
            .map(|n| NavMotionController::new(n, doc.viewport.scroll_y));
        let nav_toggle = bindings
            .nav_toggle
            .map(|b| MobileNavButton::bind(&mut doc, b));
        let menus = bindings.nav.map(|n| MegaMenuController::bind(&mut doc, n));
        let manifesto = bindings
            .manifesto
            .map(|p| ManifestoReveal::bind(&mut doc, p, config.warmup_frames));
        let counters = bindings
            .achievements
            .map(|s| KpiCounters::bind(&doc, s, config.kpi_threshold));
        let services = bindings
            .services_accordion
            .map(|s| ServicesHover::bind(&mut doc, s));
        let slider = bindings
            .case_showcase
            .and_then(|s| CaseSlider::bind(&mut doc, s));
        let reveals = ScrollReveals::new(&config);

        let mut preloader = bindings
            .preloader
            .map(|b| Preloader::new(b, bindings.app_shell, bindings.nav));
        match preloader.as_mut() {
            Some(p) => p.start(&mut doc, &mut animator, &mut session, now_ms),
            None => {
                // No preloader markup: the shell is already visible.
                if let Some(shell) = bindings.app_shell {
                    doc.remove_class(shell, "app-hidden");
                    doc.add_class(shell, "app-ready");
                }
            }
        }
        let watchdog_armed = preloader.is_some();

        Self {
            doc,
            session,
            config,
            animator,
            bindings,
            preloader,
            nav,
            nav_toggle,
            menus,
            manifesto,
            reveals,
            counters,
            services,
            slider,
            mounted_at: now_ms,
            watchdog_armed,
            split_done: false,
            scroll_pending: true,
            resize_pending: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn bindings(&self) -> &StageBindings {
        &self.bindings
    }

    pub fn is_revealed(&self) -> bool {
        self.preloader
            .as_ref()
            .map(Preloader::is_revealed)
            .unwrap_or(true)
    }

    // ========================================================================
    // Host events
    // ========================================================================

    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.doc.scroll_to(scroll_y);
        self.scroll_pending = true;
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.doc.resize(width, height);
        self.resize_pending = true;
    }

    pub fn on_pointer_enter(&mut self, node: NodeId, now_ms: f64) {
        if let Some(menus) = self.menus.as_mut() {
            menus.on_pointer_enter(&mut self.doc, &mut self.animator, &self.config, node, now_ms);
        }
        if let Some(services) = self.services.as_ref() {
            services.on_pointer_enter(&mut self.doc, &self.config, node);
        }
    }

    pub fn on_pointer_leave(&mut self, node: NodeId, now_ms: f64) {
        if let Some(menus) = self.menus.as_mut() {
            menus.on_pointer_leave(&self.doc, &self.config, node, now_ms);
        }
        if let Some(services) = self.services.as_ref() {
            services.on_pointer_leave(&mut self.doc, node);
        }
    }

    pub fn on_focus_in(&mut self, node: NodeId, now_ms: f64) {
        if let Some(menus) = self.menus.as_mut() {
            menus.on_focus_in(&mut self.doc, &mut self.animator, &self.config, node, now_ms);
        }
    }

    pub fn on_focus_out(&mut self, node: NodeId, now_ms: f64) {
        if let Some(menus) = self.menus.as_mut() {
            menus.on_focus_out(&self.doc, &self.config, node, now_ms);
        }
    }

    pub fn on_pointer_down(&mut self, node: NodeId) {
        if let Some(menus) = self.menus.as_mut() {
            menus.on_pointer_down(&mut self.doc, node);
        }
    }

    pub fn on_click(&mut self, node: NodeId) {
        if let Some(toggle) = self.nav_toggle.as_mut() {
            if toggle.matches(&self.doc, node) {
                toggle.on_click(&mut self.doc);
                return;
            }
        }
        if let Some(slider) = self.slider.as_mut() {
            if slider.matches_prev(&self.doc, node) {
                slider.on_prev(&mut self.doc);
                return;
            }
            if slider.matches_next(&self.doc, node) {
                slider.on_next(&mut self.doc);
                return;
            }
        }
        if let Some(services) = self.services.as_mut() {
            services.on_click(&mut self.doc, node);
        }
    }

    pub fn on_key_down(&mut self, node: NodeId, key: &str) {
        if key == "Escape" {
            if let Some(menus) = self.menus.as_mut() {
                menus.on_escape(&mut self.doc);
            }
            return;
        }
        if let Some(services) = self.services.as_mut() {
            services.on_key_down(&mut self.doc, node, key);
        }
    }

    /// Re-arm the manifesto warm-up after a page-restore notification.
    pub fn on_page_restore(&mut self) {
        let frames = self.config.warmup_frames;
        if let Some(manifesto) = self.manifesto.as_mut() {
            manifesto.rearm_warmup(frames);
        }
        self.scroll_pending = true;
    }

    // ========================================================================
    // Frame tick
    // ========================================================================

    pub fn tick(&mut self, now_ms: f64) {
        self.animator.tick(&mut self.doc, now_ms);

        if let Some(preloader) = self.preloader.as_mut() {
            preloader.tick(&mut self.doc, &mut self.animator, &mut self.session, now_ms);
            if self.watchdog_armed
                && !preloader.is_revealed()
                && now_ms - self.mounted_at >= self.config.watchdog_ms
            {
                preloader.force_reveal(&mut self.doc, now_ms);
                self.watchdog_armed = false;
            }
            if preloader.is_revealed() {
                self.watchdog_armed = false;
            }
        }

        if let Some(menus) = self.menus.as_mut() {
            menus.tick(&mut self.doc, now_ms);
        }

        // Text splitting waits for the reveal and a bounded font grace.
        if !self.split_done
            && self.is_revealed()
            && now_ms - self.mounted_at >= self.config.fonts_grace_ms
        {
            self.split_and_arm_reveals();
        }

        let scrolled = std::mem::take(&mut self.scroll_pending);
        let resized = std::mem::take(&mut self.resize_pending);

        if resized {
            if let Some(nav) = self.nav.as_mut() {
                nav.on_resize(&mut self.doc, &mut self.animator, &self.config, now_ms);
            }
            if let Some(menus) = self.menus.as_mut() {
                menus.on_resize(&mut self.doc, &self.config);
            }
            if let Some(slider) = self.slider.as_mut() {
                slider.on_resize(&mut self.doc);
            }
            if self.config.is_desktop(self.doc.viewport.width) {
                if let Some(toggle) = self.nav_toggle.as_mut() {
                    toggle.close(&mut self.doc);
                }
            }
        }

        if scrolled {
            if let Some(nav) = self.nav.as_mut() {
                nav.on_scroll(&mut self.doc, &mut self.animator, &self.config, now_ms);
            }
        }

        if scrolled || resized {
            if let Some(manifesto) = self.manifesto.as_mut() {
                manifesto.evaluate(&mut self.doc);
            }
            if let Some(counters) = self.counters.as_mut() {
                counters.evaluate(&mut self.doc, self.animator.motion_enabled());
            }
            self.reveals.evaluate(&mut self.doc);
        } else if let Some(manifesto) = self.manifesto.as_mut() {
            manifesto.tick_warmup(&mut self.doc);
        }

        if let Some(counters) = self.counters.as_mut() {
            counters.tick(&mut self.doc, now_ms);
        }
    }

    fn split_and_arm_reveals(&mut self) {
        self.split_done = true;
        let candidates = reveal::split_candidates(&self.doc);
        let mut split = 0usize;
        for node in candidates {
            if reveal::split_lines(&mut self.doc, node, self.config.line_stagger_ms) {
                split += 1;
                self.reveals.observe(node);
            }
        }
        tracing::debug!(split, "armed scroll reveals");
        if !self.animator.motion_enabled() || !self.doc.supports_intersection {
            self.reveals.reveal_all(&mut self.doc);
        } else {
            // Elements already in view reveal on the next evaluation.
            self.scroll_pending = true;
        }
    }
}
