//! Headless demo: mounts the sample stage and runs the full choreography
//! against a virtual clock, logging phase transitions and a few probe
//! scrolls.

use anyhow::Context;
use clap::Parser;
use motif_dom::{MemorySession, SessionStore, VirtualClock, PRELOADER_PLAYED_KEY};
use motif_engine::{stage, Engine, EngineConfig};

#[derive(Parser, Debug)]
#[command(name = "motif-demo", about = "Run the Motif choreography headlessly")]
struct Args {
    /// Simulated run length in milliseconds.
    #[arg(long, default_value_t = 12_000.0)]
    duration_ms: f64,

    /// Start with the session flag already set (skip the intro).
    #[arg(long)]
    played: bool,

    /// Simulate a reduced-motion preference.
    #[arg(long)]
    reduced_motion: bool,

    /// Optional TOML config file overriding the default tuning.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_toml_str(&text).context("parsing engine config")?
        }
        None => EngineConfig::default(),
    };

    let mut doc = stage::sample_stage();
    doc.reduced_motion = args.reduced_motion;
    let session = if args.played {
        MemorySession::with_played_flag()
    } else {
        MemorySession::new()
    };

    let mut clock = VirtualClock::new();
    let mut engine = Engine::mount(doc, session, config, clock.now());
    tracing::info!(revealed = engine.is_revealed(), "engine mounted");

    let mut revealed_logged = engine.is_revealed();
    while clock.now() < args.duration_ms {
        let now = clock.frame();

        // Probe the scroll-linked behavior once the intro is out of the way.
        if engine.is_revealed() {
            if (now - 9000.0).abs() < 10.0 {
                engine.on_scroll(2300.0);
            } else if (now - 11_000.0).abs() < 10.0 {
                engine.on_scroll(400.0);
            }
        }

        engine.tick(now);
        if engine.is_revealed() && !revealed_logged {
            revealed_logged = true;
            tracing::info!(at_ms = now, "app shell revealed");
        }
    }

    let flag = engine.session().get(PRELOADER_PLAYED_KEY);
    tracing::info!(
        revealed = engine.is_revealed(),
        session_flag = flag.as_deref().unwrap_or("unset"),
        "run complete"
    );
    Ok(())
}
