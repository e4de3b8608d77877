//! Engine configuration.
//!
//! Presentation tuning constants that are carried as data rather than
//! hard invariants. The preloader phase durations are deliberately not
//! here: they are the choreography itself.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How deferred media sources are handled at mount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetMode {
    /// Promote `data-remote-*` attributes to live sources.
    #[default]
    Remote,
    /// Leave deferred sources untouched.
    Placeholder,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum viewport width for desktop behavior (condensing nav,
    /// hover mega menus).
    pub desktop_min_width: f32,
    /// Downward scroll distance that condenses the nav, as a fraction of
    /// viewport height.
    pub nav_condense_threshold: f32,
    /// Nav condense/expand transition duration.
    pub nav_transition_ms: f64,
    /// Debounce before a requested mega-menu close takes effect.
    pub menu_close_delay_ms: f64,
    /// Frames of post-mount re-evaluation covering restored scroll
    /// positions that arrive without a scroll event.
    pub warmup_frames: u32,
    /// Hard deadline after which the page is force-revealed.
    pub watchdog_ms: f64,
    /// Bound on waiting for font readiness before splitting text.
    pub fonts_grace_ms: f64,
    /// Visible-fraction threshold that triggers a scroll reveal.
    pub reveal_threshold: f32,
    /// Bottom viewport margin for reveals, as a fraction of viewport
    /// height (the band is shortened by this much).
    pub reveal_bottom_margin: f32,
    /// Per-line reveal stagger.
    pub line_stagger_ms: f64,
    /// Visible-fraction threshold that starts the KPI counters.
    pub kpi_threshold: f32,
    pub asset_mode: AssetMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 1024.0,
            nav_condense_threshold: 0.2,
            nav_transition_ms: 350.0,
            menu_close_delay_ms: 150.0,
            warmup_frames: 60,
            watchdog_ms: 8000.0,
            fonts_grace_ms: 2500.0,
            reveal_threshold: 0.2,
            reveal_bottom_margin: 0.10,
            line_stagger_ms: 70.0,
            kpi_threshold: 0.35,
            asset_mode: AssetMode::Remote,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.nav_condense_threshold) {
            return Err(EngineError::ConfigRange("nav_condense_threshold"));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(EngineError::ConfigRange("reveal_threshold"));
        }
        if !(0.0..=1.0).contains(&self.kpi_threshold) {
            return Err(EngineError::ConfigRange("kpi_threshold"));
        }
        if self.watchdog_ms <= 0.0 {
            return Err(EngineError::ConfigRange("watchdog_ms"));
        }
        Ok(())
    }

    pub fn is_desktop(&self, viewport_width: f32) -> bool {
        viewport_width >= self.desktop_min_width
    }
}
