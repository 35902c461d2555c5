// main.rs: window, event loop and frame pacing

mod camera;
mod config;
mod error;
mod hud;
mod input;
mod params;
mod quad;
mod renderer;
mod skybox;
mod viewer;

use config::ViewerConfig;
use error::Result;
use hud::{FpsCounter, HudState};
use input::{InputAction, InputHandler};
use renderer::Renderer;
use viewer::Viewer;

use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = ViewerConfig::resolve()?;

    // Both files are required before a window shows up.
    let scene_source = renderer::read_scene_shader(&config.shader)?;
    let sky = skybox::load(&config.skybox)?;

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(
        window.clone(),
        &scene_source,
        sky,
        config.vsync,
    ))?;
    let mut viewer = Viewer::new(&config);
    let mut input = InputHandler::new();
    let mut hud = HudState::new(config.vsync);

    let mut last_frame = Instant::now();
    let mut fps = FpsCounter::new(last_frame);

    let (tx, rx): (Sender<RgbaImage>, Receiver<RgbaImage>) = channel();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Ok(img) = rx.try_recv() {
            renderer.load_skybox(img);
            hud.loading_skybox = false;
        }

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                // button releases always reach the camera so a drag never sticks
                let released = matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    }
                );
                if response.consumed && !released {
                    return;
                }

                match event {
                    WindowEvent::Resized(new_size) => renderer.resize(new_size),
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size)
                    }
                    other => match input.handle_event(&mut viewer.camera, &other) {
                        InputAction::None => {}
                        InputAction::Quit => *control_flow = ControlFlow::Exit,
                        InputAction::ToggleFullscreen => toggle_fullscreen(&window, &mut hud),
                        InputAction::ToggleHud => hud.visible = !hud.visible,
                        InputAction::OpenSkyboxDialog => {
                            if let Some(path) = pick_skybox() {
                                hud.loading_skybox = true;
                                skybox::load_in_background(path, tx.clone());
                            }
                        }
                        InputAction::LoadSkybox(path) => {
                            hud.loading_skybox = true;
                            skybox::load_in_background(path, tx.clone());
                        }
                    },
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;
                fps.frame(now);

                let resolution = renderer.resolution();
                viewer.frame(&mut renderer, dt, resolution);

                let current_fps = fps.fps();
                let mut requests = hud::HudRequests::default();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    requests = hud::draw_ui(ctx, &mut hud, &mut viewer.camera, current_fps);
                });

                if requests.quit {
                    *control_flow = ControlFlow::Exit;
                }
                if requests.toggle_fullscreen {
                    toggle_fullscreen(&window, &mut hud);
                }
                if requests.vsync_changed {
                    renderer.set_vsync(hud.vsync);
                }
                if requests.open_skybox {
                    if let Some(path) = pick_skybox() {
                        hud.loading_skybox = true;
                        skybox::load_in_background(path, tx.clone());
                    }
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn toggle_fullscreen(window: &Window, hud: &mut HudState) {
    hud.is_fullscreen = !hud.is_fullscreen;
    if hud.is_fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

fn pick_skybox() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &skybox::IMAGE_EXTENSIONS)
        .pick_file()
}
