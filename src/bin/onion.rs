use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use onion::app::platform::{HeadlessPlatform, Platform, WinitPlatform};
use onion::app::{AppConfig, RenderLoop, Scene};
use onion::build_info::BuildInfo;
use onion::sim::FlyCameraScene;

/// How often the control thread checks whether the render loop finished
const WAIT_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "onion", version, about = "Onion Engine fly-camera viewer")]
struct Cli {
    /// Config profile to load (defaults to APP_PROFILE, then "release")
    #[arg(long)]
    profile: Option<String>,

    /// Run without a display, using an in-memory window
    #[arg(long)]
    headless: bool,

    /// Frames to render before a headless run closes its window
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "onion=debug,warn"
    } else {
        "onion=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_names(true))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Starts the loop and blocks until its window closes
fn run<P, S>(mut render_loop: RenderLoop<P, S>) -> Result<()>
where
    P: Platform,
    S: Scene<P::Window>,
{
    render_loop.start()?;
    while render_loop.is_running() {
        thread::sleep(WAIT_INTERVAL);
    }
    render_loop.stop()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    info!(build = %BuildInfo::current(), "Starting Onion Engine");

    let config = match &cli.profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    }
    .context("failed to load configuration")?;
    info!(profile = %config.profile, headless = cli.headless, "Configuration loaded");

    let scene = FlyCameraScene::new(config.camera.clone());

    if cli.headless {
        let platform = HeadlessPlatform::new(config.window.width as u32, config.window.height as u32)
            .with_frame_limit(cli.frames);
        run(RenderLoop::new(config, platform, scene))?;
    } else {
        run(RenderLoop::new(config, WinitPlatform::new(), scene))?;
    }

    info!("Shutdown complete");
    Ok(())
}
