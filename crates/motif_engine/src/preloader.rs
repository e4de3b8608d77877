//! Preloader timeline orchestrator.
//!
//! A fixed, hand-authored sequence of phases played once per session:
//! icon reveal, eased 0-100% counter, wordmark reveal, logo blur-out,
//! overlay fade, then hand-off to the app shell and nav intro. Phase
//! boundaries are declared as start rules over named phases; concurrent
//! phases fan out and are jointly awaited before the next sequential
//! step begins.
//!
//! The page scroll lock is owned here and released exactly once on every
//! path: full run, skip, or watchdog force-reveal.

use motif_animation::{
    ease_in_out_quad, ease_out_cubic, ease_out_quad, Easing, PhaseId, Sequence, StartRule,
    StyleKeyframe, StyleProps, Tween,
};
use motif_dom::{Document, NodeId, SessionStore, PRELOADER_PLAYED_KEY};

use crate::bind::PreloaderBindings;
use crate::motion::{apply_props, Animator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloaderStatus {
    Idle,
    Running,
    Revealed,
}

struct Phases {
    hold: PhaseId,
    icon: PhaseId,
    track_in: PhaseId,
    counter_run: PhaseId,
    counter_out: PhaseId,
    wordmark: PhaseId,
    settle: PhaseId,
    logo_blur: PhaseId,
    fade_hold: PhaseId,
    overlay: PhaseId,
    handoff: PhaseId,
    teardown: PhaseId,
}

pub struct Preloader {
    status: PreloaderStatus,
    bind: PreloaderBindings,
    app_shell: Option<NodeId>,
    nav: Option<NodeId>,
    seq: Sequence,
    phases: Phases,
    counter: Option<Tween>,
    scroll_unlocked: bool,
}

impl Preloader {
    pub fn new(bind: PreloaderBindings, app_shell: Option<NodeId>, nav: Option<NodeId>) -> Self {
        let mut seq = Sequence::new();
        let hold = seq.phase("hold", StartRule::AtStart, 950.0);
        let icon = seq.phase("icon-reveal", StartRule::after(hold), 0.0);
        let track_in = seq.phase("track-in", StartRule::AfterStartOf(icon, 200.0), 0.0);
        let counter_run = seq.phase("counter", StartRule::after_all(&[icon, track_in]), 2000.0);
        let counter_out = seq.phase("counter-out", StartRule::after(counter_run), 0.0);
        let wordmark = seq.phase("wordmark", StartRule::after(counter_out), 0.0);
        let settle = seq.phase("settle", StartRule::after(wordmark), 400.0);
        let logo_blur = seq.phase("logo-blur", StartRule::after(settle), 0.0);
        let fade_hold = seq.phase("fade-hold", StartRule::after(logo_blur), 600.0);
        let overlay = seq.phase("overlay-fade", StartRule::after(fade_hold), 0.0);
        let handoff = seq.phase("handoff", StartRule::AfterStartOf(overlay, 100.0), 0.0);
        let teardown = seq.phase("teardown", StartRule::after_all(&[overlay, handoff]), 0.0);

        Self {
            status: PreloaderStatus::Idle,
            bind,
            app_shell,
            nav,
            seq,
            phases: Phases {
                hold,
                icon,
                track_in,
                counter_run,
                counter_out,
                wordmark,
                settle,
                logo_blur,
                fade_hold,
                overlay,
                handoff,
                teardown,
            },
            counter: None,
            scroll_unlocked: false,
        }
    }

    pub fn status(&self) -> PreloaderStatus {
        self.status
    }

    pub fn is_revealed(&self) -> bool {
        self.status == PreloaderStatus::Revealed
    }

    /// Enter the timeline: skip synchronously when the session flag is
    /// already set or motion is disabled, otherwise lock scroll and start
    /// the sequence.
    pub fn start(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        session: &mut dyn SessionStore,
        now_ms: f64,
    ) {
        if self.status != PreloaderStatus::Idle {
            return;
        }
        let played = session.get(PRELOADER_PLAYED_KEY).is_some();
        if played || !animator.motion_enabled() {
            tracing::debug!(played, "skipping preloader");
            // Only a completed run persists the flag; a reduced-motion skip
            // leaves it untouched.
            self.reveal_shell(doc);
            self.show_nav_immediately(doc);
            self.remove_preloader(doc);
            self.unlock_scroll(doc);
            self.seq.finish_all(now_ms);
            self.status = PreloaderStatus::Revealed;
            return;
        }
        doc.set_style(doc.body(), "overflow", "hidden");
        self.seq.start(now_ms);
        self.status = PreloaderStatus::Running;
    }

    /// Advance the timeline one frame: begin every phase whose start rule
    /// is satisfied, drive the counter text, then settle finished phases.
    pub fn tick(
        &mut self,
        doc: &mut Document,
        animator: &mut Animator,
        session: &mut dyn SessionStore,
        now_ms: f64,
    ) {
        if self.status != PreloaderStatus::Running {
            return;
        }
        for id in self.seq.phase_ids() {
            if self.seq.is_ready(id, now_ms) {
                self.seq.begin(id, now_ms);
                self.enter_phase(id, doc, animator, session, now_ms);
            }
        }

        if self.seq.is_running(self.phases.counter_run) {
            if let (Some(tween), Some(elapsed)) = (
                &self.counter,
                self.seq.elapsed(self.phases.counter_run, now_ms),
            ) {
                let value = tween.sample(elapsed);
                doc.set_text(self.bind.counter, &format!("{}%", value.round() as i32));
            }
        }

        for id in self.seq.phase_ids() {
            self.seq.try_finish(id, now_ms, |h| animator.is_finished(h));
        }

        if self.seq.is_done(self.phases.teardown) {
            self.status = PreloaderStatus::Revealed;
        }
    }

    fn enter_phase(
        &mut self,
        id: PhaseId,
        doc: &mut Document,
        animator: &mut Animator,
        session: &mut dyn SessionStore,
        now_ms: f64,
    ) {
        let p = &self.phases;
        if id == p.icon {
            let wrap = animator.animate(
                doc,
                self.bind.icon_wrap,
                vec![
                    StyleKeyframe::new(0.0, StyleProps::clip_right(100.0)),
                    StyleKeyframe::new(1.0, StyleProps::clip_right(0.0)),
                ],
                600.0,
                Easing::HOP,
                now_ms,
            );
            let icon = animator.animate(
                doc,
                self.bind.icon,
                vec![
                    StyleKeyframe::new(
                        0.0,
                        StyleProps::opacity(0.0).with_translate_y_pct(-120.0),
                    ),
                    StyleKeyframe::new(1.0, StyleProps::opacity(1.0).with_translate_y_pct(0.0)),
                ],
                600.0,
                Easing::HOP,
                now_ms,
            );
            self.seq.attach(id, wrap);
            self.seq.attach(id, icon);
        } else if id == p.track_in {
            let track = animator.animate(
                doc,
                self.bind.progress_track,
                fade(0.0, 1.0),
                500.0,
                Easing::STANDARD,
                now_ms,
            );
            let counter = animator.animate_with_easing_fn(
                doc,
                self.bind.counter,
                fade(0.0, 1.0),
                300.0,
                ease_out_quad,
                now_ms,
            );
            self.seq.attach(id, track);
            self.seq.attach(id, counter);
        } else if id == p.counter_run {
            self.counter = Some(Tween::new(0.0, 100.0, 2000.0, ease_in_out_quad));
            doc.set_text(self.bind.counter, "0%");
        } else if id == p.counter_out {
            doc.set_text(self.bind.counter, "100%");
            let counter = animator.animate(
                doc,
                self.bind.counter,
                fade(1.0, 0.0),
                300.0,
                Easing::STANDARD,
                now_ms,
            );
            let track = animator.animate(
                doc,
                self.bind.progress_track,
                fade(1.0, 0.0),
                300.0,
                Easing::STANDARD,
                now_ms,
            );
            self.seq.attach(id, counter);
            self.seq.attach(id, track);
        } else if id == p.wordmark {
            // The wrapper grows to the wordmark's current rendered width,
            // measured now rather than assumed.
            let width = doc.page_rect(self.bind.wordmark).width;
            let handle = animator.animate_with_easing_fn(
                doc,
                self.bind.wordmark_wrap,
                vec![
                    StyleKeyframe::new(
                        0.0,
                        StyleProps::clip_right(100.0)
                            .with_width_px(0.0)
                            .with_opacity(0.0),
                    ),
                    StyleKeyframe::new(
                        1.0,
                        StyleProps::clip_right(0.0)
                            .with_width_px(width)
                            .with_opacity(1.0),
                    ),
                ],
                800.0,
                ease_out_cubic,
                now_ms,
            );
            self.seq.attach(id, handle);
        } else if id == p.logo_blur {
            let handle = animator.animate(
                doc,
                self.bind.logo,
                vec![
                    StyleKeyframe::new(0.0, StyleProps::opacity(1.0).with_blur_px(0.0)),
                    StyleKeyframe::new(1.0, StyleProps::opacity(0.0).with_blur_px(10.0)),
                ],
                600.0,
                Easing::STANDARD,
                now_ms,
            );
            self.seq.attach(id, handle);
        } else if id == p.overlay {
            let handle = animator.animate(
                doc,
                self.bind.root,
                fade(1.0, 0.0),
                300.0,
                Easing::STANDARD,
                now_ms,
            );
            self.seq.attach(id, handle);
        } else if id == p.handoff {
            session.set(PRELOADER_PLAYED_KEY, "true");
            self.reveal_shell(doc);
            if let Some(nav) = self.nav {
                let slide = animator.animate(
                    doc,
                    nav,
                    vec![
                        StyleKeyframe::new(0.0, StyleProps::default().with_translate_y(-100.0)),
                        StyleKeyframe::new(1.0, StyleProps::default().with_translate_y(0.0)),
                    ],
                    400.0,
                    Easing::MENU,
                    now_ms,
                );
                let fade_in = animator.animate(
                    doc,
                    nav,
                    fade(0.0, 1.0),
                    250.0,
                    Easing::EaseInOut,
                    now_ms,
                );
                self.seq.attach(id, slide);
                self.seq.attach(id, fade_in);
            }
        } else if id == p.teardown {
            self.remove_preloader(doc);
            self.unlock_scroll(doc);
        }
    }

    /// Watchdog path: abandon the timeline and make the page usable.
    pub fn force_reveal(&mut self, doc: &mut Document, now_ms: f64) {
        if self.status == PreloaderStatus::Revealed {
            return;
        }
        tracing::warn!("preloader watchdog fired; force-revealing app shell");
        self.reveal_shell(doc);
        self.show_nav_immediately(doc);
        self.remove_preloader(doc);
        self.unlock_scroll(doc);
        self.seq.finish_all(now_ms);
        self.status = PreloaderStatus::Revealed;
    }

    fn reveal_shell(&self, doc: &mut Document) {
        if let Some(shell) = self.app_shell {
            doc.remove_class(shell, "app-hidden");
            doc.add_class(shell, "app-ready");
            doc.set_style(shell, "opacity", "1");
        }
    }

    fn show_nav_immediately(&self, doc: &mut Document) {
        if let Some(nav) = self.nav {
            apply_props(
                doc,
                nav,
                &StyleProps::opacity(1.0).with_translate_y(0.0),
            );
        }
    }

    fn remove_preloader(&self, doc: &mut Document) {
        if doc.contains(self.bind.root) {
            doc.remove(self.bind.root);
        }
    }

    fn unlock_scroll(&mut self, doc: &mut Document) {
        if self.scroll_unlocked {
            return;
        }
        self.scroll_unlocked = true;
        doc.remove_style(doc.body(), "overflow");
    }
}

fn fade(from: f32, to: f32) -> Vec<StyleKeyframe> {
    vec![
        StyleKeyframe::new(0.0, StyleProps::opacity(from)),
        StyleKeyframe::new(1.0, StyleProps::opacity(to)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::StageBindings;
    use crate::stage;
    use motif_dom::MemorySession;

    fn setup() -> (Document, Animator, Preloader, MemorySession) {
        let doc = stage::sample_stage();
        let bindings = StageBindings::resolve(&doc);
        let animator = Animator::for_document(&doc);
        let preloader = Preloader::new(
            bindings.preloader.unwrap(),
            bindings.app_shell,
            bindings.nav,
        );
        (doc, animator, preloader, MemorySession::new())
    }

    fn run_to_completion(
        doc: &mut Document,
        animator: &mut Animator,
        preloader: &mut Preloader,
        session: &mut MemorySession,
    ) -> f64 {
        let mut now = 0.0;
        let step = 1000.0 / 60.0;
        // Generously above the sum of all phase durations.
        while !preloader.is_revealed() && now < 20_000.0 {
            now += step;
            animator.tick(doc, now);
            preloader.tick(doc, animator, session, now);
        }
        now
    }

    #[test]
    fn full_run_completes_and_sets_flag() {
        let (mut doc, mut animator, mut preloader, mut session) = setup();
        preloader.start(&mut doc, &mut animator, &mut session, 0.0);
        assert_eq!(preloader.status(), PreloaderStatus::Running);
        assert_eq!(doc.style(doc.body(), "overflow"), Some("hidden"));

        let now = run_to_completion(&mut doc, &mut animator, &mut preloader, &mut session);
        assert!(preloader.is_revealed(), "timeline stalled at {}ms", now);
        assert_eq!(session.get(PRELOADER_PLAYED_KEY).as_deref(), Some("true"));
        assert_eq!(doc.style(doc.body(), "overflow"), None);
        assert!(doc.get_element_by_id(crate::bind::ID_PRELOADER).is_none());
        // Minimum wall time is bounded below by the sequential holds.
        assert!(now > 5000.0);
    }

    #[test]
    fn flagged_session_skips_synchronously() {
        let (mut doc, mut animator, mut preloader, _) = setup();
        let mut session = MemorySession::with_played_flag();
        let shell = doc.get_element_by_id(crate::bind::ID_APP_SHELL).unwrap();

        preloader.start(&mut doc, &mut animator, &mut session, 0.0);
        assert!(preloader.is_revealed());
        assert_eq!(doc.style(doc.body(), "overflow"), None);
        assert!(doc.has_class(shell, "app-ready"));
        assert!(doc.get_element_by_id(crate::bind::ID_PRELOADER).is_none());
    }

    #[test]
    fn reduced_motion_skips_synchronously() {
        let (mut doc, _, mut preloader, mut session) = setup();
        doc.reduced_motion = true;
        let mut animator = Animator::for_document(&doc);

        preloader.start(&mut doc, &mut animator, &mut session, 0.0);
        assert!(preloader.is_revealed());
        // A skip reveals without persisting; only a completed run sets
        // the flag.
        assert_eq!(session.get(PRELOADER_PLAYED_KEY), None);
    }

    #[test]
    fn counter_text_tracks_the_tween() {
        let (mut doc, mut animator, mut preloader, mut session) = setup();
        let counter = preloader.bind.counter;
        preloader.start(&mut doc, &mut animator, &mut session, 0.0);

        let mut now = 0.0;
        let step = 1000.0 / 60.0;
        let mut seen_intermediate = false;
        while !preloader.is_revealed() && now < 20_000.0 {
            now += step;
            animator.tick(&mut doc, now);
            preloader.tick(&mut doc, &mut animator, &mut session, now);
            let text = doc.text_content(counter);
            if text != "0%" && text != "100%" && !text.is_empty() {
                seen_intermediate = true;
            }
        }
        assert!(seen_intermediate);
    }

    #[test]
    fn force_reveal_unblocks_a_stalled_timeline() {
        let (mut doc, mut animator, mut preloader, mut session) = setup();
        let shell = doc.get_element_by_id(crate::bind::ID_APP_SHELL).unwrap();
        preloader.start(&mut doc, &mut animator, &mut session, 0.0);

        // Never tick the timeline; fire the watchdog directly.
        preloader.force_reveal(&mut doc, 8000.0);
        assert!(preloader.is_revealed());
        assert_eq!(doc.style(doc.body(), "overflow"), None);
        assert!(doc.has_class(shell, "app-ready"));
        // The flag stays unset so the next visit retries the intro.
        assert_eq!(session.get(PRELOADER_PLAYED_KEY), None);
    }

    #[test]
    fn scroll_lock_released_once_even_if_forced_twice() {
        let (mut doc, mut animator, mut preloader, mut session) = setup();
        preloader.start(&mut doc, &mut animator, &mut session, 0.0);
        preloader.force_reveal(&mut doc, 100.0);
        doc.set_style(doc.body(), "overflow", "auto");
        preloader.force_reveal(&mut doc, 200.0);
        // Second call is a no-op; the host's own style survives.
        assert_eq!(doc.style(doc.body(), "overflow"), Some("auto"));
    }
}
