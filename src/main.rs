use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::{Vec2, Vec3};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod config;
mod math;
mod renderer;
mod ui;

use config::{Args, ViewerConfig, resolve_log_filter};
use math::{TriangleMesh, icosphere};
use renderer::{FrameTransforms, GpuState, OrbitCamera};
use ui::{CameraReadout, UiState, apply_theme, draw_info_overlay};

struct App {
    config: ViewerConfig,
    sphere: TriangleMesh,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: OrbitCamera,
    ui_state: UiState,
    cursor: Vec2,

    last_vsync_state: bool,
    failed: bool,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let started = Instant::now();
        let sphere = icosphere(config.subdivisions);
        log::info!(
            "Generated icosphere level {} ({} vertices, {} triangles) in {:.2?}",
            config.subdivisions,
            sphere.vertex_count(),
            sphere.triangle_count(),
            started.elapsed()
        );

        let ui_state = UiState::new(
            config.subdivisions,
            sphere.vertex_count(),
            sphere.triangle_count(),
            config.vsync,
        );

        Self {
            camera: OrbitCamera::new(&config.camera),
            last_vsync_state: config.vsync,
            config,
            sphere,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            ui_state,
            cursor: Vec2::ZERO,

            failed: false,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), renderer::gpu::GpuError> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.config, &self.sphere))?;

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

        let size = window.inner_size();
        self.camera.set_viewport(size.width, size.height);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return Ok(());
        };

        let raw_input = egui_state.take_egui_input(window);

        let readout = CameraReadout {
            azimuth: self.camera.azimuth.to_degrees(),
            elevation: self.camera.elevation.to_degrees(),
            eye: self.camera.view().inverse.transform_point3(Vec3::ZERO).to_array(),
            horizontal_fov: self.camera.horizontal_fov().to_degrees(),
            dragging: self.camera.is_dragging(),
        };
        let show_overlay = self.ui_state.show_overlay;
        let ui_state = &self.ui_state;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show_overlay {
                draw_info_overlay(ctx, ui_state, &readout);
            }
        });

        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return Ok(());
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_transforms(&FrameTransforms::from_camera(&self.camera));

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

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

        gpu.render_scene(&view, &mut encoder);

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

        self.ui_state.tick();
        window.request_redraw();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::KeyH => self.ui_state.show_overlay = !self.ui_state.show_overlay,
            KeyCode::KeyV => {
                self.ui_state.vsync_enabled = !self.ui_state.vsync_enabled;
                log::info!("Vsync {}", if self.ui_state.vsync_enabled { "on" } else { "off" });
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title("Planet Viewer")
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                self.failed = true;
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.init_gpu(window) {
            log::error!("Failed to initialize graphics: {err}");
            self.failed = true;
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let mut consumed = false;
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            consumed = egui_state.on_window_event(window, &event).consumed;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                self.camera.set_viewport(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state == ElementState::Pressed && !event.repeat {
                        self.handle_key(event_loop, key);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.camera.on_cursor_moved(self.cursor);
            }

            // A press over the overlay belongs to egui; releases always end a drag.
            WindowEvent::MouseInput { button, state, .. } => {
                if !(consumed && state == ElementState::Pressed) {
                    self.camera.on_button(button, state, self.cursor);
                }
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.camera.cancel_drag();
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    log::error!("Rendering failed: {err}");
                    self.failed = true;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn init_logger(filter: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(filter);
    builder.format(|buf, record| {
        use std::io::Write;
        let module = record.module_path().unwrap_or(record.target());
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp_millis(),
            record.level(),
            module,
            record.args()
        )
    });

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(&resolve_log_filter(&args));

    let config = match ViewerConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(2);
        }
    };
    if config.debug_gpu {
        log::info!("Graphics backend validation enabled");
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated: {err}");
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
