use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::gpu::GpuContext;
use crate::input::{Input, ParamControl};
use crate::params::TransformParameters;
use crate::renderer::{FrameOutcome, FrameRenderer, RendererConfig};
use crate::shader::ProgramError;

/// Configuration for the app window and the animation.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Starting values of the transform parameters.
    pub params: TransformParameters,
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Letterspin".to_string(),
            width: 800,
            height: 600,
            params: TransformParameters::default(),
            renderer: RendererConfig::default(),
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

    /// Initial parameters, clamped to their documented ranges.
    pub fn params(mut self, params: TransformParameters) -> Self {
        self.params = params.clamped();
        self
    }

    pub fn renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Open a window and animate the letter with default settings.
pub fn run() -> anyhow::Result<()> {
    run_with_config(AppConfig::default())
}

/// Open a window and animate the letter until the window is closed.
///
/// If no drawing surface or GPU is available the function returns `Ok(())`
/// without rendering anything. A shader that fails to compile or link is
/// returned as an error.
pub fn run_with_config(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LetterApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        LetterApp::Failed(err) => Err(err.into()),
        _ => Ok(()),
    }
}

enum LetterApp {
    Pending {
        config: AppConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: FrameRenderer,
        params: TransformParameters,
        input: Input,
        control: ParamControl,
        title: String,
    },
    /// Startup never produced a renderer.
    Inert,
    /// Startup aborted on a shader program error.
    Failed(ProgramError),
    /// The renderer was disposed; no further frame is scheduled.
    Closed,
}

impl LetterApp {
    fn start(
        config: &AppConfig,
        event_loop: &ActiveEventLoop,
    ) -> Result<Option<Self>, ProgramError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::warn!("could not create window: {}", err);
                return Ok(None);
            }
        };

        let Some(gpu) = GpuContext::acquire(window.clone()) else {
            return Ok(None);
        };

        let renderer = FrameRenderer::new(&gpu, config.renderer)?;
        let control = ParamControl::new();
        let title = config.title.clone();
        window.set_title(&format!("{} | {}", title, control.status(&config.params)));
        window.request_redraw();

        Ok(Some(LetterApp::Running {
            window,
            gpu,
            renderer,
            params: config.params,
            input: Input::new(),
            control,
            title,
        }))
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let LetterApp::Running { renderer, .. } = std::mem::replace(self, LetterApp::Closed) {
            renderer.release();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for LetterApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let LetterApp::Pending { config } = self else {
            return;
        };

        match LetterApp::start(config, event_loop) {
            Ok(Some(running)) => *self = running,
            Ok(None) => {
                log::warn!("no drawing surface available, renderer not started");
                *self = LetterApp::Inert;
                event_loop.exit();
            }
            Err(err) => {
                log::error!("{}", err);
                *self = LetterApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let LetterApp::Running {
            window,
            gpu,
            renderer,
            params,
            input,
            control,
            title,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.close(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if input.key_pressed(KeyCode::Escape) {
                    self.close(event_loop);
                    return;
                }

                if control.apply(input, params) {
                    window.set_title(&format!("{} | {}", title, control.status(params)));
                }

                let size = window.inner_size();
                let outcome = renderer.render_frame(gpu, params, size.width, size.height);
                input.begin_frame();

                if outcome == FrameOutcome::Fatal {
                    self.close(event_loop);
                    return;
                }

                window.request_redraw();
            }
            _ => {}
        }
    }
}
