//! Window surface and GPU device acquisition.
//!
//! [`GpuContext::acquire`] is the startup precondition of the renderer: if
//! the window cannot provide a surface, or no adapter/device can drive it,
//! it returns `None` and the application simply never starts rendering.

use std::sync::Arc;
use winit::window::Window;

/// Core GPU context holding wgpu resources.
///
/// All fields are public to allow direct access to wgpu APIs when needed.
pub struct GpuContext {
    /// The surface for presenting rendered frames to the window.
    pub surface: wgpu::Surface<'static>,
    /// The logical GPU device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Acquire a surface, adapter and device for `window`.
    ///
    /// Returns `None` when any of them is unavailable. The reason is logged
    /// at `warn`; it is not an error for the caller.
    pub fn acquire(window: Arc<Window>) -> Option<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = match instance.create_surface(window) {
            Ok(surface) => surface,
            Err(err) => {
                log::warn!("no drawing surface: {}", err);
                return None;
            }
        };

        let adapter = match pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        )) {
            Ok(adapter) => adapter,
            Err(err) => {
                log::warn!("no GPU adapter for surface: {}", err);
                return None;
            }
        };
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) =
            match pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("Letterspin Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })) {
                Ok(pair) => pair,
                Err(err) => {
                    log::warn!("no GPU device: {}", err);
                    return None;
                }
            };

        let surface_caps = surface.get_capabilities(&adapter);
        let Some(surface_format) = choose_surface_format(&surface_caps.formats) else {
            log::warn!("surface reports no supported formats");
            return None;
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!(
            "surface configured {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Some(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Match the surface backing store to `width` x `height`.
    ///
    /// Zero-sized dimensions and unchanged sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width(), self.height()) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Returns the current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Returns the current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }
}

/// Pick the surface format, preferring a non-sRGB one.
///
/// Vertex colours and the clear colour are already display-encoded bytes, so
/// they must reach the framebuffer without another sRGB encode.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}
