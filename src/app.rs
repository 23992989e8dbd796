use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::error::{EventLoopError, OsError};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::SpongeConfig;
use crate::controls::LevelBindings;
use crate::gpu::{GpuContext, GpuError};
use crate::input::Input;
use crate::orbit_camera::OrbitCamera;
use crate::sponge::{MengerSponge, SpongeError};
use crate::sponge_pass::SpongePass;

/// Viewer window and sponge settings.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub sponge: SpongeConfig,
    pub bindings: LevelBindings,
    /// Starting distance of the camera from the sponge centre.
    pub camera_distance: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Menger Sponge".to_string(),
            width: 800,
            height: 600,
            sponge: SpongeConfig::default(),
            bindings: LevelBindings::default(),
            camera_distance: 6.0,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn sponge(mut self, sponge: SpongeConfig) -> Self {
        self.sponge = sponge;
        self
    }

    pub fn bindings(mut self, bindings: LevelBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }
}

/// Open a window showing an interactive Menger sponge.
///
/// Number keys pick the level, left drag orbits, right drag and the scroll
/// wheel zoom, `WASD` moves, the arrow keys pitch and roll, `R` resets the
/// view.
///
/// Fails before opening a window if `config.sponge` is invalid. Window or
/// GPU setup failures close the event loop and are returned once it exits.
///
/// # Example
/// ```no_run
/// use menger::{AppConfig, SpongeConfig};
///
/// let config = AppConfig::new()
///     .title("Sponge")
///     .sponge(SpongeConfig::new().with_initial_level(2));
/// menger::run(config).unwrap();
/// ```
pub fn run(config: AppConfig) -> Result<(), RunError> {
    let sponge = MengerSponge::with_config(config.sponge)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::Pending {
        config,
        sponge: Some(sponge),
    };
    event_loop.run_app(&mut app)?;

    match app {
        ViewerApp::Failed(e) => Err(e),
        _ => Ok(()),
    }
}

/// Errors that stop the viewer.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid sponge configuration: {0}")]
    Sponge(#[from] SpongeError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

enum ViewerApp {
    Pending {
        config: AppConfig,
        sponge: Option<MengerSponge>,
    },
    Running {
        title: String,
        window: Arc<Window>,
        gpu: GpuContext,
        pass: SpongePass,
        sponge: MengerSponge,
        orbit: OrbitCamera,
        input: Input,
        bindings: LevelBindings,
        last_frame: Instant,
    },
    Failed(RunError),
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let ViewerApp::Pending { config, sponge } = self else {
            return;
        };
        let Some(sponge) = sponge.take() else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let started = event_loop
            .create_window(window_attrs)
            .map_err(RunError::from)
            .and_then(|window| {
                let window = Arc::new(window);
                let gpu = GpuContext::new(window.clone())?;
                Ok((window, gpu))
            });

        let (window, gpu) = match started {
            Ok(started) => started,
            Err(e) => {
                log::error!("{}", e);
                *self = ViewerApp::Failed(e);
                event_loop.exit();
                return;
            }
        };

        let pass = SpongePass::new(&gpu);

        *self = ViewerApp::Running {
            title: config.title.clone(),
            window,
            gpu,
            pass,
            sponge,
            orbit: OrbitCamera::new().distance(config.camera_distance),
            input: Input::new(),
            bindings: config.bindings.clone(),
            last_frame: Instant::now(),
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ViewerApp::Running {
            title,
            window,
            gpu,
            pass,
            sponge,
            orbit,
            input,
            bindings,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                if let Some(level) = bindings.requested_level(input.keys_pressed()) {
                    if let Err(e) = sponge.set_level(level) {
                        log::warn!("ignoring level request: {}", e);
                    }
                }
                orbit.update(input, dt);

                pass.ensure_depth_size(gpu);
                if pass.sync(gpu, sponge) {
                    if let Some(level) = pass.uploaded_level() {
                        window.set_title(&format!("{} (level {})", title, level));
                    }
                }
                draw_frame(gpu, pass, orbit);

                input.end_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn draw_frame(gpu: &GpuContext, pass: &SpongePass, orbit: &OrbitCamera) {
    let output = match gpu.surface.get_current_texture() {
        Ok(output) => output,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.reconfigure();
            return;
        }
        Err(e) => {
            log::error!("failed to acquire surface texture: {}", e);
            return;
        }
    };
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Sponge Encoder"),
        });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sponge Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.37,
                        b: 0.37,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(pass.depth_attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.render(gpu, &mut render_pass, &orbit.camera());
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn config_builder() {
        let config = AppConfig::new()
            .title("Test")
            .size(1024, 768)
            .sponge(SpongeConfig::new().with_initial_level(0).with_max_level(2))
            .bindings(LevelBindings::new().bind(KeyCode::Digit5, 4))
            .camera_distance(9.0);
        assert_eq!(config.title, "Test");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.sponge.max_level(), 2);
        assert_eq!(config.bindings.level_for(KeyCode::Digit5), Some(4));
        assert_eq!(config.camera_distance, 9.0);
    }

    #[test]
    fn invalid_sponge_config_fails_early() {
        let config = AppConfig::new()
            .sponge(SpongeConfig::new().with_initial_level(3).with_max_level(1));
        let err = run(config).unwrap_err();
        assert!(matches!(
            err,
            RunError::Sponge(SpongeError::LevelTooDeep { level: 3, max: 1 })
        ));
    }

    #[test]
    fn gpu_errors_pass_through() {
        let err = RunError::from(GpuError::NoSurfaceFormat);
        assert_eq!(err.to_string(), GpuError::NoSurfaceFormat.to_string());
        assert!(matches!(err, RunError::Gpu(GpuError::NoSurfaceFormat)));
    }
}
