use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use tree_core::synthetic::HandPose;
use tree_core::{
    AppMode, FrameTimer, LoadingProgress, Orchestrator, Scene, SceneCell, SceneConfig, SceneState,
};

mod assets;
mod audio;
mod config;
mod hud;
mod render;
mod tracking;

use config::NativeConfig;
use tracking::{HandControl, LandmarkSource, ReplaySource, SyntheticHand, TrackingHandle};

fn pick_source(cfg: &NativeConfig, control: &Arc<HandControl>) -> Box<dyn LandmarkSource> {
    if let Some(path) = &cfg.landmarks {
        match ReplaySource::open(path) {
            Ok(src) => return Box::new(src),
            Err(e) => log::warn!("[tracking] replay unavailable ({e:#}); using keyboard hand"),
        }
    }
    Box::new(SyntheticHand::new(Arc::clone(control)))
}

fn handle_key(key: &Key, control: &HandControl, music: &mut audio::BackgroundMusic) {
    match key {
        Key::Named(NamedKey::ArrowLeft) => control.swipe(-1),
        Key::Named(NamedKey::ArrowRight) => control.swipe(1),
        Key::Character(c) => match c.as_str() {
            "f" | "F" => control.set_pose(HandPose::Fist),
            "o" | "O" => control.set_pose(HandPose::Open),
            "r" | "R" => control.set_pose(HandPose::Relaxed),
            "h" | "H" => {
                let hidden = control.toggle_hidden();
                log::info!("[input] hand {}", if hidden { "hidden" } else { "shown" });
            }
            "m" | "M" => music.toggle(),
            _ => {}
        },
        _ => {}
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_cfg = NativeConfig::from_env();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Particle Tree")
        .build(&event_loop)?;

    // Particle budget is fixed from the initial logical width.
    let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
    let scene_cfg = SceneConfig::for_viewport_width(logical.width).with_seed(native_cfg.seed);
    log::info!(
        "[startup] width={:.0} particles={} photos={} seed={}",
        logical.width,
        scene_cfg.particle_count,
        scene_cfg.photo_count,
        scene_cfg.seed
    );

    let size = window.inner_size();
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    let mut scene = Scene::new(&scene_cfg, aspect);
    let cell = Arc::new(SceneCell::new(SceneState::new(AppMode::Loading, 0)));

    let mut gpu = Some(pollster::block_on(render::GpuState::new(
        &window,
        &scene,
        &native_cfg.photo_dir,
    ))?);

    let control = Arc::new(HandControl::default());
    let orchestrator = Orchestrator::new(scene_cfg.photo_count, scene_cfg.seed.wrapping_add(1));
    let mut tracking = match TrackingHandle::start(
        pick_source(&native_cfg, &control),
        Arc::clone(&cell),
        orchestrator,
        tracking::TRACKING_PERIOD,
    ) {
        Ok(h) => Some(h),
        Err(e) => {
            // gestures stay NONE; the scene still runs
            log::warn!("[tracking] could not start: {e:#}");
            None
        }
    };

    let mut music = audio::BackgroundMusic::new(native_cfg.music.clone(), scene_cfg.seed);
    let mut loading = LoadingProgress::new();
    let mut timer = FrameTimer::new();
    let mut last_title = String::new();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            if let Some(g) = gpu.as_mut() {
                g.resize(size);
            }
            scene.camera.set_viewport(size.width, size.height);
        }
        Event::WindowEvent {
            event: WindowEvent::KeyboardInput { event: key, .. },
            ..
        } if key.state == ElementState::Pressed && !key.repeat => {
            if key.logical_key == Key::Named(NamedKey::Escape) {
                elwt.exit();
            } else {
                handle_key(&key.logical_key, &control, &mut music);
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let Some(g) = gpu.as_mut() else {
                return;
            };
            let dt = timer.lap();
            if loading.advance(dt) {
                cell.complete_loading();
                log::info!("[startup] loading complete");
            }
            let state = cell.load();
            scene.tick(state, dt);

            let title = hud::title(&state, loading.percent(), music.is_muted());
            if title != last_title {
                g.window.set_title(&title);
                last_title = title;
            }

            match g.render(&scene) {
                Ok(_) => g.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = g.window.inner_size();
                    g.resize(size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        Event::LoopExiting => {
            // stop capture first so nothing publishes into a dead scene
            if let Some(handle) = tracking.take() {
                if !handle.is_running() {
                    log::info!("[tracking] source had already finished");
                }
                drop(handle);
            }
            music.shutdown();
            drop(gpu.take());
            log::info!("[shutdown] tracking, audio and GPU resources released");
        }
        _ => {}
    })?;
    Ok(())
}
