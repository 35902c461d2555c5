// hud.rs: egui menu bar and status bar

use crate::camera::{CameraMode, OrbitPanCamera};
use std::time::{Duration, Instant};

pub struct HudState {
    pub visible: bool,
    pub show_fps: bool,
    pub vsync: bool,
    pub is_fullscreen: bool,
    pub loading_skybox: bool,
}

impl HudState {
    pub fn new(vsync: bool) -> Self {
        Self {
            visible: true,
            show_fps: false,
            vsync,
            is_fullscreen: false,
            loading_skybox: false,
        }
    }
}

/// Things the menu asked for that need the window or event loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HudRequests {
    pub open_skybox: bool,
    pub quit: bool,
    pub toggle_fullscreen: bool,
    pub vsync_changed: bool,
}

/// Frames counted over one-second windows.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn frame(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub fn draw_ui(
    ctx: &egui::Context,
    hud: &mut HudState,
    camera: &mut OrbitPanCamera,
    fps: f32,
) -> HudRequests {
    let mut requests = HudRequests::default();
    if !hud.visible {
        return requests;
    }

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open skybox... (O)").clicked() {
                    requests.open_skybox = true;
                    ui.close_menu();
                }
                if ui.button("Exit (Esc)").clicked() {
                    requests.quit = true;
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset camera (Space)").clicked() {
                    camera.reset();
                    ui.close_menu();
                }

                let fullscreen_label = if hud.is_fullscreen {
                    "Exit fullscreen (F11)"
                } else {
                    "Fullscreen (F11)"
                };
                if ui.button(fullscreen_label).clicked() {
                    requests.toggle_fullscreen = true;
                    ui.close_menu();
                }

                ui.separator();
                ui.checkbox(&mut camera.settings.auto_rotate, "Auto-rotate");

                ui.menu_button("Controls", |ui| {
                    let settings = &mut camera.settings;
                    ui.add(
                        egui::Slider::new(&mut settings.rotate_sensitivity, 0.0005..=0.02)
                            .logarithmic(true)
                            .text("Rotate"),
                    );
                    ui.add(
                        egui::Slider::new(&mut settings.pan_sensitivity, 0.001..=0.1)
                            .logarithmic(true)
                            .text("Pan"),
                    );
                    ui.add(egui::Slider::new(&mut settings.zoom_sensitivity, 0.1..=5.0).text("Zoom"));
                    ui.add(
                        egui::Slider::new(&mut settings.auto_rotate_speed, 0.0..=0.5)
                            .text("Auto-rotate rad/s"),
                    );
                });

                ui.separator();
                ui.checkbox(&mut hud.show_fps, "Show FPS");
                if ui.checkbox(&mut hud.vsync, "VSync").changed() {
                    requests.vsync_changed = true;
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if hud.loading_skybox {
                ui.label(egui::RichText::new("Loading skybox...").color(egui::Color32::YELLOW));
                ui.label("|");
            }

            let state = camera.state();
            ui.label(format!("Radius: {:.2}", state.radius));
            ui.label("|");
            ui.label(format!("Azimuth: {:.1}°", state.azimuth.to_degrees()));
            ui.label("|");
            ui.label(format!("Elevation: {:.1}°", state.elevation.to_degrees()));
            ui.label("|");
            ui.label(format!(
                "Target: ({:.2}, {:.2}, {:.2})",
                state.target.x, state.target.y, state.target.z
            ));
            ui.label("|");
            ui.label(mode_label(camera.mode(), camera.is_auto_rotating()));

            if hud.show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN));
            }
        });
    });

    requests
}

fn mode_label(mode: CameraMode, auto_rotating: bool) -> &'static str {
    match mode {
        CameraMode::Idle if auto_rotating => "Auto-rotating",
        CameraMode::Idle => "Idle",
        CameraMode::Rotating => "Rotating",
        CameraMode::Panning => "Panning",
        CameraMode::RotatingAndPanning => "Rotating + panning",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_over_one_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);
        for i in 1..=59 {
            counter.frame(start + Duration::from_millis(i * 16));
        }
        assert_eq!(counter.fps(), 0.0);

        counter.frame(start + Duration::from_millis(1000));
        assert!((counter.fps() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn hidden_hud_draws_nothing() {
        let ctx = egui::Context::default();
        let mut hud = HudState::new(true);
        hud.visible = false;
        let mut camera = OrbitPanCamera::default();

        let mut requests = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            requests = Some(draw_ui(ctx, &mut hud, &mut camera, 60.0));
        });
        assert_eq!(requests, Some(HudRequests::default()));
    }

    #[test]
    fn visible_hud_runs_headless() {
        let ctx = egui::Context::default();
        let mut hud = HudState::new(true);
        hud.show_fps = true;
        let mut camera = OrbitPanCamera::default();

        let mut requests = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            requests = Some(draw_ui(ctx, &mut hud, &mut camera, 60.0));
        });
        assert_eq!(requests, Some(HudRequests::default()));
    }

    #[test]
    fn mode_labels() {
        assert_eq!(mode_label(CameraMode::Idle, true), "Auto-rotating");
        assert_eq!(mode_label(CameraMode::Idle, false), "Idle");
        assert_eq!(mode_label(CameraMode::Panning, false), "Panning");
    }
}
