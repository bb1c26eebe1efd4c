use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    error::{EventLoopError, OsError},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use glam::Vec2;

mod math;
mod renderer;
mod scene;
mod ui;

use math::SurfaceError;
use renderer::{GpuState, RenderError, TextureLoader, Trackball};
use scene::Scene;
use ui::{PanelStats, UiState, apply_theme, draw_help_overlay, draw_side_panel, tex_center_delta};

const DEFAULT_TEXTURE_PATH: &str = "assets/texture.jpg";
const WINDOW_SIZE: u32 = 800;

#[derive(Debug)]
enum AppEvent {
    TextureReady,
}

#[derive(Debug, Error)]
enum InitError {
    #[error(transparent)]
    Window(#[from] OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    scene: Option<Scene>,
    ui_state: UiState,

    texture_path: PathBuf,
    texture_loader: Option<TextureLoader>,
    texture_size: Option<(u32, u32)>,
    texture_error: Option<String>,
    proxy: EventLoopProxy<AppEvent>,

    cursor: Vec2,

    fps: f32,
    frame_count: u32,
    fps_timer: Instant,
}

impl App {
    fn new(texture_path: PathBuf, proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            scene: None,
            ui_state: UiState::default(),

            texture_path,
            texture_loader: None,
            texture_size: None,
            texture_error: None,
            proxy,

            cursor: Vec2::ZERO,

            fps: 0.0,
            frame_count: 0,
            fps_timer: Instant::now(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let window_attrs = Window::default_attributes()
            .with_title("Revolve 3D")
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let mut gpu = pollster::block_on(GpuState::new(window.clone()))?;

        let size = window.inner_size();
        let redraw_window = Arc::clone(&window);
        let trackball = Trackball::new(
            Vec2::new(size.width as f32, size.height as f32),
            move || redraw_window.request_redraw(),
            0.0,
        );
        let scene = Scene::new(self.ui_state.params, trackball)?;
        gpu.upload_mesh(&scene.mesh);
        gpu.set_vsync(self.ui_state.vsync_enabled);

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);
        apply_theme(&self.egui_ctx);

        let proxy = self.proxy.clone();
        self.texture_loader = Some(TextureLoader::spawn(self.texture_path.clone(), move || {
            let _ = proxy.send_event(AppEvent::TextureReady);
        }));

        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn poll_texture(&mut self) {
        let (Some(loader), Some(gpu)) = (&self.texture_loader, &mut self.gpu) else {
            return;
        };

        if let Some(texture) = loader.try_recv() {
            gpu.set_texture(&texture);
            self.texture_size = Some((texture.width, texture.height));
        } else if let Some(err) = loader.last_error() {
            self.texture_error = Some(err);
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn tick_fps(&mut self) {
        self.frame_count += 1;
        let elapsed = self.fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        self.tick_fps();

        let App {
            window: Some(window),
            gpu: Some(gpu),
            egui_state: Some(egui_state),
            egui_renderer: Some(egui_renderer),
            scene: Some(scene),
            egui_ctx,
            ui_state,
            texture_size,
            texture_error,
            fps,
            ..
        } = self
        else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let stats = PanelStats {
            fps: *fps,
            vertex_count: scene.mesh.vertex_count(),
            texture_size: *texture_size,
            texture_error: texture_error.as_deref(),
        };

        let mut actions = ui::UiActions::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            actions = draw_side_panel(ctx, ui_state, &mut scene.shading, &stats);
            if ui_state.show_help {
                draw_help_overlay(ctx, scene.shading.tex_center);
            }
        });

        egui_state.handle_platform_output(window, full_output.platform_output);

        if actions.regenerate {
            ui_state.params_dirty = false;
            match scene.regenerate(ui_state.params) {
                Ok(()) => {
                    gpu.upload_mesh(&scene.mesh);
                    ui_state.surface_error = None;
                }
                Err(e) => {
                    log::warn!("Keeping previous surface: {}", e);
                    ui_state.surface_error = Some(e.to_string());
                }
            }
        }
        if actions.reset_view {
            scene.trackball.reset();
        }
        if let Some(vsync) = actions.set_vsync {
            gpu.set_vsync(vsync);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu.resize(gpu.size);
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut pass = gpu.surface_pass(&view, &mut encoder);
            scene.draw(&mut pass);
        }

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        let repaint_now = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|v| v.repaint_delay.is_zero());
        if repaint_now || ui_state.params_dirty {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            log::error!("Sorry, could not initialize the graphics context: {}", err);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::TextureReady => {
                self.poll_texture();
                self.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let mut consumed = false;
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            consumed = response.consumed;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                log::debug!("Resized to {}x{}", size.width, size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                if let Some(scene) = &mut self.scene {
                    scene
                        .trackball
                        .resize(Vec2::new(size.width as f32, size.height as f32));
                }
                self.request_redraw();
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.cursor = Vec2::new(x as f32, y as f32);
                if let Some(scene) = &mut self.scene {
                    scene.trackball.pointer_move(self.cursor);
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let Some(scene) = &mut self.scene else { return };
                match state {
                    ElementState::Pressed if !consumed => scene.trackball.pointer_down(self.cursor),
                    ElementState::Released => scene.trackball.pointer_up(),
                    _ => {}
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                if let (Some(delta), Some(scene)) = (tex_center_delta(key), &mut self.scene) {
                    scene.shading.shift_tex_center(delta);
                    self.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                self.render(event_loop);
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), EventLoopError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let texture_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE_PATH));

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(texture_path, event_loop.create_proxy());
    event_loop.run_app(&mut app)
}
