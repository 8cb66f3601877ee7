//! Render loop lifecycle against the headless platform

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use parking_lot::Mutex;

use onion::app::input::{InputId, InputsSnapshot, KeyCode};
use onion::app::platform::{HeadlessPlatform, HeadlessWindow};
use onion::app::{AppConfig, FrameContext, RenderLoop, RenderLoopError, Scene};

fn test_config() -> AppConfig {
    let mut config = AppConfig::fallback("test");
    config.window.target_fps = 0;
    config
}

/// Waits for the worker to exit on its own
fn wait_until_finished<S: Scene<HeadlessWindow>>(render_loop: &RenderLoop<HeadlessPlatform, S>) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while render_loop.is_running() {
        assert!(Instant::now() < deadline, "render loop did not finish");
        thread::sleep(Duration::from_millis(5));
    }
}

#[derive(Debug, Default)]
struct Record {
    initialized: bool,
    frames: Vec<FrameRecord>,
    draws: u64,
    shut_down: bool,
}

#[derive(Debug, Clone, Copy)]
struct FrameRecord {
    frame: u64,
    jump_pressed: bool,
    resized: bool,
}

/// Scene that records what it sees
#[derive(Default)]
struct RecordingScene {
    record: Arc<Mutex<Record>>,
    jump: Option<InputId>,
    close_after: Option<u64>,
    fail_draw_at: Option<u64>,
    panic_at: Option<u64>,
}

impl RecordingScene {
    fn new() -> (Self, Arc<Mutex<Record>>) {
        let scene = Self::default();
        let record = Arc::clone(&scene.record);
        (scene, record)
    }
}

impl Scene<HeadlessWindow> for RecordingScene {
    fn init(&mut self, ctx: &mut FrameContext<'_, HeadlessWindow>) -> anyhow::Result<()> {
        self.jump = Some(ctx.inputs().register_input_default("Jump", KeyCode::Space));
        self.record.lock().initialized = true;
        Ok(())
    }

    fn update(
        &mut self,
        snapshot: &InputsSnapshot,
        ctx: &mut FrameContext<'_, HeadlessWindow>,
        _dt: f32,
    ) {
        if self.panic_at == Some(snapshot.frame()) {
            panic!("scene blew up");
        }
        let jump_pressed = self.jump.is_some_and(|jump| snapshot.is_pressed(jump));
        self.record.lock().frames.push(FrameRecord {
            frame: snapshot.frame(),
            jump_pressed,
            resized: snapshot.framebuffer().resized,
        });
        if self.close_after == Some(snapshot.frame()) {
            ctx.request_close();
        }
    }

    fn draw(&mut self, _window: &mut HeadlessWindow) -> anyhow::Result<()> {
        let mut record = self.record.lock();
        record.draws += 1;
        if self.fail_draw_at == Some(record.draws) {
            return Err(anyhow!("device lost"));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.record.lock().shut_down = true;
    }
}

/// Scene whose init always fails
struct BrokenScene;

impl Scene<HeadlessWindow> for BrokenScene {
    fn init(&mut self, _ctx: &mut FrameContext<'_, HeadlessWindow>) -> anyhow::Result<()> {
        Err(anyhow!("missing shader"))
    }

    fn update(&mut self, _: &InputsSnapshot, _: &mut FrameContext<'_, HeadlessWindow>, _: f32) {}
}

#[test]
fn test_stop_before_start_is_noop() {
    let (scene, record) = RecordingScene::new();
    let platform = HeadlessPlatform::new(800, 600).with_frame_limit(2);
    let mut render_loop = RenderLoop::new(test_config(), platform, scene);

    render_loop.stop().expect("stop before start");
    assert!(!render_loop.is_running());
    assert!(!record.lock().initialized);

    // Still startable afterwards.
    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    render_loop.stop().expect("stop");
    assert_eq!(record.lock().frames.len(), 2);
}

#[test]
fn test_start_twice_errors() {
    let (scene, _record) = RecordingScene::new();
    let mut render_loop = RenderLoop::new(test_config(), HeadlessPlatform::new(800, 600), scene);

    render_loop.start().expect("first start");
    let err = render_loop.start().unwrap_err();
    assert!(matches!(err, RenderLoopError::AlreadyStarted));
    assert!(render_loop.is_running());

    render_loop.stop().expect("stop");
}

#[test]
fn test_stop_is_idempotent_and_final() {
    let (scene, record) = RecordingScene::new();
    let controller_platform = HeadlessPlatform::new(800, 600);
    let controller = controller_platform.controller();
    let mut render_loop = RenderLoop::new(test_config(), controller_platform, scene);

    render_loop.start().expect("start");
    render_loop.stop().expect("first stop");
    assert!(!render_loop.is_running());
    render_loop.stop().expect("second stop");

    let presented = controller.presented_frames();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(controller.presented_frames(), presented);
    assert!(record.lock().shut_down);

    let err = render_loop.start().unwrap_err();
    assert!(matches!(err, RenderLoopError::Stopped));
}

#[test]
fn test_worker_exits_when_window_closes() {
    let (scene, record) = RecordingScene::new();
    let platform = HeadlessPlatform::new(800, 600).with_frame_limit(5);
    let controller = platform.controller();
    let mut render_loop = RenderLoop::new(test_config(), platform, scene);

    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    render_loop.stop().expect("stop");

    let record = record.lock();
    assert!(record.initialized);
    assert!(record.shut_down);
    assert_eq!(record.draws, 5);
    assert_eq!(controller.presented_frames(), 5);
    let frames: Vec<u64> = record.frames.iter().map(|f| f.frame).collect();
    assert_eq!(frames, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_close_from_platform() {
    let (scene, record) = RecordingScene::new();
    let platform = HeadlessPlatform::new(800, 600);
    let controller = platform.controller();
    let mut render_loop = RenderLoop::new(test_config(), platform, scene);

    render_loop.start().expect("start");
    controller.request_close();
    wait_until_finished(&render_loop);
    render_loop.stop().expect("stop");
    assert!(record.lock().shut_down);
}

#[test]
fn test_scene_sees_inputs_in_order() {
    let (scene, record) = RecordingScene::new();
    let platform = HeadlessPlatform::new(800, 600).with_frame_limit(3);
    let controller = platform.controller();
    controller.press(KeyCode::Space);
    controller.resize(1024, 768);

    let mut render_loop = RenderLoop::new(test_config(), platform, scene);
    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    render_loop.stop().expect("stop");

    let record = record.lock();
    assert_eq!(record.frames.len(), 3);
    assert!(record.frames[0].jump_pressed);
    assert!(record.frames[0].resized);
    assert!(!record.frames[1].resized);
    assert!(!record.frames[2].resized);
}

#[test]
fn test_scene_can_request_close() {
    let (mut scene, record) = RecordingScene::new();
    scene.close_after = Some(4);
    let mut render_loop = RenderLoop::new(test_config(), HeadlessPlatform::new(800, 600), scene);

    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    render_loop.stop().expect("stop");
    assert_eq!(record.lock().frames.len(), 4);
}

#[test]
fn test_stop_handle_from_another_thread() {
    let (scene, record) = RecordingScene::new();
    let mut render_loop = RenderLoop::new(test_config(), HeadlessPlatform::new(800, 600), scene);
    render_loop.start().expect("start");

    let handle = render_loop.stop_handle();
    thread::spawn(move || handle.request_stop())
        .join()
        .expect("signal thread");

    wait_until_finished(&render_loop);
    assert!(render_loop.stop_handle().is_stop_requested());
    render_loop.stop().expect("stop");
    assert!(record.lock().shut_down);
}

#[test]
fn test_draw_failure_reported_by_stop() {
    let (mut scene, record) = RecordingScene::new();
    scene.fail_draw_at = Some(2);
    let platform = HeadlessPlatform::new(800, 600);
    let controller = platform.controller();
    let mut render_loop = RenderLoop::new(test_config(), platform, scene);

    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    let err = render_loop.stop().unwrap_err();
    assert!(matches!(err, RenderLoopError::Scene(_)));
    assert!(err.to_string().contains("device lost"));
    assert_eq!(controller.presented_frames(), 1);
    assert!(record.lock().shut_down);
}

#[test]
fn test_init_failure_reported_by_stop() {
    let mut render_loop = RenderLoop::new(test_config(), HeadlessPlatform::new(800, 600), BrokenScene);
    render_loop.start().expect("start");
    wait_until_finished(&render_loop);

    let err = render_loop.stop().unwrap_err();
    assert!(err.to_string().contains("missing shader"));
}

#[test]
fn test_invalid_timing_reported_by_stop() {
    let (scene, record) = RecordingScene::new();
    let mut config = test_config();
    config.input.repeat_interval = f64::NAN;
    let mut render_loop = RenderLoop::new(config, HeadlessPlatform::new(800, 600), scene);

    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    let err = render_loop.stop().unwrap_err();
    assert!(matches!(err, RenderLoopError::Config(_)));
    assert!(!record.lock().initialized);
}

#[test]
fn test_worker_panic_reported() {
    let (mut scene, _record) = RecordingScene::new();
    scene.panic_at = Some(2);
    let mut render_loop = RenderLoop::new(test_config(), HeadlessPlatform::new(800, 600), scene);

    render_loop.start().expect("start");
    wait_until_finished(&render_loop);
    let err = render_loop.stop().unwrap_err();
    assert!(matches!(err, RenderLoopError::WorkerPanicked));
}

#[test]
fn test_drop_stops_worker() {
    let (scene, record) = RecordingScene::new();
    let platform = HeadlessPlatform::new(800, 600);
    let controller = platform.controller();
    let mut render_loop = RenderLoop::new(test_config(), platform, scene);
    render_loop.start().expect("start");

    drop(render_loop);
    assert!(record.lock().shut_down);
    let presented = controller.presented_frames();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(controller.presented_frames(), presented);
}
