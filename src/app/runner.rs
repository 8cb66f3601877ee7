//! Render loop lifecycle
//!
//! The loop runs on a dedicated thread that owns the window for its whole
//! life. The owning thread only starts it and asks it to stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::config::AppConfig;
use super::input::{InputWindow, InputsManager};
use super::platform::{Platform, PlatformError};
use super::scene::{FrameContext, Scene};

const RENDER_THREAD_NAME: &str = "onion-render";

/// Errors from starting, running or stopping the render loop
#[derive(Debug, Error)]
pub enum RenderLoopError {
    #[error("render loop is already running")]
    AlreadyStarted,
    #[error("render loop was stopped and cannot be restarted")]
    Stopped,
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("scene failed: {0:#}")]
    Scene(anyhow::Error),
    #[error("render thread panicked")]
    WorkerPanicked,
}

/// Signals a running render loop to stop, from any thread
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests a stop at the next frame boundary without waiting
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

enum LoopState<P, S> {
    Idle { platform: P, scene: S },
    Running(JoinHandle<Result<(), RenderLoopError>>),
    Stopped,
}

/// Owns the render thread
///
/// `start` launches the thread, `stop` requests cooperative cancellation and
/// waits for the thread to release the window. A loop runs at most once.
pub struct RenderLoop<P, S>
where
    P: Platform,
    S: Scene<P::Window>,
{
    config: AppConfig,
    state: LoopState<P, S>,
    stop: StopHandle,
}

impl<P, S> RenderLoop<P, S>
where
    P: Platform,
    S: Scene<P::Window>,
{
    pub fn new(config: AppConfig, platform: P, scene: S) -> Self {
        Self {
            config,
            state: LoopState::Idle { platform, scene },
            stop: StopHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// Spawns the render thread
    pub fn start(&mut self) -> Result<(), RenderLoopError> {
        match std::mem::replace(&mut self.state, LoopState::Stopped) {
            LoopState::Idle { platform, scene } => {
                let config = self.config.clone();
                let stop = self.stop.clone();
                let handle = thread::Builder::new()
                    .name(RENDER_THREAD_NAME.to_string())
                    .spawn(move || run_frames(config, platform, scene, stop))
                    .map_err(RenderLoopError::Spawn)?;

                info!(profile = %self.config.profile, "Render loop started");
                self.state = LoopState::Running(handle);
                Ok(())
            }
            running @ LoopState::Running(_) => {
                self.state = running;
                Err(RenderLoopError::AlreadyStarted)
            }
            LoopState::Stopped => Err(RenderLoopError::Stopped),
        }
    }

    /// Requests a stop and waits for the render thread to exit
    ///
    /// Returns the error the render thread finished with, if any. Calling
    /// it again, or before `start`, does nothing.
    pub fn stop(&mut self) -> Result<(), RenderLoopError> {
        match std::mem::replace(&mut self.state, LoopState::Stopped) {
            LoopState::Running(handle) => {
                self.stop.request_stop();
                debug!("Waiting for render thread");
                let result = handle.join().map_err(|_| RenderLoopError::WorkerPanicked)?;
                info!("Render loop stopped");
                result
            }
            idle @ LoopState::Idle { .. } => {
                self.state = idle;
                debug!("Stop requested before start, ignoring");
                Ok(())
            }
            LoopState::Stopped => Ok(()),
        }
    }

    /// Whether the render thread is alive
    pub fn is_running(&self) -> bool {
        matches!(&self.state, LoopState::Running(handle) if !handle.is_finished())
    }

    /// Handle that can request a stop without joining
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl<P, S> Drop for RenderLoop<P, S>
where
    P: Platform,
    S: Scene<P::Window>,
{
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "Render loop finished with an error");
        }
    }
}

/// Body of the render thread
fn run_frames<P, S>(
    config: AppConfig,
    mut platform: P,
    mut scene: S,
    stop: StopHandle,
) -> Result<(), RenderLoopError>
where
    P: Platform,
    S: Scene<P::Window>,
{
    let repeat = config.input.repeat_config()?;
    let mut window = platform.create_window(&config.window)?;

    let mut inputs = InputsManager::new(repeat);
    inputs.attach(&mut window);
    scene
        .init(&mut FrameContext::new(&mut inputs, &mut window))
        .map_err(RenderLoopError::Scene)?;

    let frame_budget = (config.window.target_fps > 0)
        .then(|| Duration::from_secs_f64(1.0 / f64::from(config.window.target_fps)));
    let mut last_frame = Instant::now();
    let mut frames: u64 = 0;

    while !stop.is_stop_requested() && !window.should_close() {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        // Resize and scroll callbacks fire inside the pump.
        window.pump_events();
        inputs.poll_inputs(&window);
        let snapshot = inputs.inputs_snapshot();

        scene.update(&snapshot, &mut FrameContext::new(&mut inputs, &mut window), dt);

        if let Err(e) = scene.draw(&mut window) {
            error!(error = %e, frame = frames, "Draw failed, stopping render loop");
            scene.shutdown();
            return Err(RenderLoopError::Scene(e));
        }
        window.present();
        frames += 1;

        if let Some(budget) = frame_budget {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            }
        }
    }

    if window.should_close() {
        info!(frames, "Window closed");
    } else {
        info!(frames, "Stop requested");
    }
    if inputs.is_mouse_capture_enabled() {
        inputs.set_mouse_capture_enabled(&mut window, false);
    }
    scene.shutdown();

    if frames == 0 {
        warn!("Render loop exited before the first frame");
    }
    Ok(())
}
