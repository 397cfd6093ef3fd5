//! The per-frame render loop.
//!
//! Each display refresh runs one frame:
//!
//! 1. advance `angle_y` by [`RendererConfig::angle_step`]
//! 2. build the projection for the current surface aspect
//! 3. compose the model transform (see [`compose_transform`])
//! 4. sync the surface and depth buffer to the window size and set the viewport
//! 5. clear colour and depth
//! 6. bind the program and upload `u_matrix`
//! 7. bind the position and colour buffers
//! 8. draw all 96 vertices as a triangle list
//!
//! Steps 1-3 and the draw arguments are computed by [`FramePlanner`], which
//! never touches the GPU. [`FrameRenderer`] executes the resulting
//! [`FramePlan`]. Rescheduling the next frame is left to the host loop.

use std::ops::Range;

use glam::Mat4;

use crate::buffers::GeometryBuffers;
use crate::gpu::GpuContext;
use crate::math;
use crate::params::TransformParameters;
use crate::shader::{Program, ProgramError, ProgramTarget};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offset that moves the letter's top-left front corner to its centre.
pub const RECENTER: [f32; 3] = [-50.0, -75.0, 0.0];

/// Tunables of the frame loop. Defaults reproduce the stock animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// Radians added to `angle_y` every frame. Zero pins the rotation.
    pub angle_step: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: wgpu::Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            angle_step: 0.01,
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.1,
                b: 0.0,
                a: 1.0,
            },
        }
    }
}

/// Build the full clip-space transform for `params`.
///
/// The running matrix is multiplied on the right in this exact order:
/// projection, corner shear, translate, rotate X, rotate Y, rotate Z, scale,
/// recenter. Returns `None` if the projection is degenerate.
pub fn compose_transform(
    params: &TransformParameters,
    aspect: f32,
    config: &RendererConfig,
) -> Option<Mat4> {
    let m = math::perspective(config.fov_degrees, aspect, config.near, config.far)?;
    let m = math::multiply(m, math::CORNER_SHEAR);
    let m = math::translate(m, params.x, params.y, params.z);
    let m = math::x_rotate(m, params.angle_x);
    let m = math::y_rotate(m, params.angle_y);
    let m = math::z_rotate(m, params.angle_z);
    let m = math::scale(m, params.sx, params.sy, params.sz);
    let m = math::translate(m, RECENTER[0], RECENTER[1], RECENTER[2]);
    Some(m)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything one frame hands to the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Backing-store size the surface is synced to.
    pub surface_size: (u32, u32),
    pub viewport: Viewport,
    pub clear_color: wgpu::Color,
    /// Value uploaded to `u_matrix`.
    pub matrix: Mat4,
    /// Vertex range of the single non-indexed draw call.
    pub vertices: Range<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// No frame has been planned yet.
    Idle,
    /// Steady state. There is no way back to `Idle`.
    Animating,
}

/// The GPU-free half of the renderer.
#[derive(Debug, Clone)]
pub struct FramePlanner {
    config: RendererConfig,
    state: RenderState,
    vertex_count: u32,
    frames: u64,
}

impl FramePlanner {
    pub fn new(config: RendererConfig, vertex_count: u32) -> Self {
        Self {
            config,
            state: RenderState::Idle,
            vertex_count,
            frames: 0,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Frames planned so far, including skipped ones.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Plan one frame for a surface of `width` x `height` physical pixels.
    ///
    /// `angle_y` advances even when the surface has zero area; in that case
    /// no projection is built and `None` is returned so the frame is skipped.
    pub fn plan(
        &mut self,
        params: &mut TransformParameters,
        width: u32,
        height: u32,
    ) -> Option<FramePlan> {
        self.state = RenderState::Animating;
        self.frames += 1;

        params.angle_y += self.config.angle_step;

        if width == 0 || height == 0 {
            log::trace!("zero-sized surface, skipping frame {}", self.frames);
            return None;
        }

        let aspect = width as f32 / height as f32;
        let matrix = compose_transform(params, aspect, &self.config)?;

        Some(FramePlan {
            surface_size: (width, height),
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
            clear_color: self.config.clear_color,
            matrix,
            vertices: 0..self.vertex_count,
        })
    }
}

/// What happened to a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was drawn and presented.
    Presented,
    /// Nothing was drawn this time; the next frame may succeed.
    Skipped,
    /// The surface cannot be used any more.
    Fatal,
}

/// Owns the program, geometry and depth buffer, and draws planned frames.
pub struct FrameRenderer {
    planner: FramePlanner,
    program: Program,
    geometry: GeometryBuffers,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl FrameRenderer {
    /// Build the letter program and upload the mesh.
    ///
    /// Fails if either shader stage does not compile or the program does not link.
    pub fn new(gpu: &GpuContext, config: RendererConfig) -> Result<Self, ProgramError> {
        let program = Program::letter(
            &gpu.device,
            ProgramTarget {
                color_format: gpu.config.format,
                depth_format: DEPTH_FORMAT,
            },
        )?;
        let geometry = GeometryBuffers::letter(&gpu.device);
        let (depth_texture, depth_view) = create_depth_texture(gpu);

        log::info!("renderer ready, {} vertices", geometry.vertex_count());
        Ok(Self {
            planner: FramePlanner::new(config, geometry.vertex_count()),
            program,
            geometry,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    pub fn state(&self) -> RenderState {
        self.planner.state()
    }

    /// Render one frame into a window whose drawable area is `width` x `height`.
    pub fn render_frame(
        &mut self,
        gpu: &mut GpuContext,
        params: &mut TransformParameters,
        width: u32,
        height: u32,
    ) -> FrameOutcome {
        let Some(plan) = self.planner.plan(params, width, height) else {
            return FrameOutcome::Skipped;
        };

        let (width, height) = plan.surface_size;
        gpu.resize(width, height);
        self.ensure_depth_size(gpu);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                gpu.reconfigure();
                return FrameOutcome::Skipped;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                return FrameOutcome::Fatal;
            }
            Err(err) => {
                log::debug!("skipping frame: {}", err);
                return FrameOutcome::Skipped;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.program.set_matrix(&gpu.queue, &plan.matrix);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Letter Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Letter Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let vp = plan.viewport;
            render_pass.set_viewport(
                vp.x as f32,
                vp.y as f32,
                vp.width as f32,
                vp.height as f32,
                0.0,
                1.0,
            );

            self.program.bind(&mut render_pass);
            self.geometry.bind(&mut render_pass);
            render_pass.draw(plan.vertices.clone(), 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        FrameOutcome::Presented
    }

    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_texture.destroy();
            let (texture, view) = create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Destroy every GPU object the renderer owns.
    pub fn release(self) {
        self.program.release();
        self.geometry.release();
        self.depth_texture.destroy();
        log::debug!("renderer released after {} frames", self.planner.frames());
    }
}

fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Letter Depth Texture"),
        size: wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VERTEX_COUNT;
    use glam::{Vec3, Vec4};

    fn pinned() -> RendererConfig {
        RendererConfig {
            angle_step: 0.0,
            ..Default::default()
        }
    }

    fn sample_params() -> TransformParameters {
        TransformParameters {
            x: 40.0,
            y: -25.0,
            z: -500.0,
            sx: 1.5,
            sy: 0.5,
            sz: 2.0,
            angle_x: 0.3,
            angle_y: -0.7,
            angle_z: 1.1,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5 * a.abs().max(b.abs()).max(1.0)
    }

    fn mat_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| close(*x, *y))
    }

    #[test]
    fn composition_follows_fixed_order() {
        let p = sample_params();
        let cfg = RendererConfig::default();
        let aspect = 16.0 / 9.0;

        let expected = Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 1.0, 1000.0)
            * math::CORNER_SHEAR
            * Mat4::from_translation(Vec3::new(p.x, p.y, p.z))
            * Mat4::from_rotation_x(p.angle_x)
            * Mat4::from_rotation_y(p.angle_y)
            * Mat4::from_rotation_z(p.angle_z)
            * Mat4::from_scale(Vec3::new(p.sx, p.sy, p.sz))
            * Mat4::from_translation(Vec3::new(-50.0, -75.0, 0.0));

        let composed = compose_transform(&p, aspect, &cfg).unwrap();
        assert!(mat_close(composed, expected));
    }

    #[test]
    fn reordering_any_two_steps_changes_the_image() {
        let p = sample_params();
        let cfg = RendererConfig::default();
        let composed = compose_transform(&p, 1.0, &cfg).unwrap();

        let proj = math::perspective(45.0, 1.0, 1.0, 1000.0).unwrap();
        let steps = [
            math::CORNER_SHEAR,
            Mat4::from_translation(Vec3::new(p.x, p.y, p.z)),
            Mat4::from_rotation_x(p.angle_x),
            Mat4::from_rotation_y(p.angle_y),
            Mat4::from_rotation_z(p.angle_z),
            Mat4::from_scale(Vec3::new(p.sx, p.sy, p.sz)),
            Mat4::from_translation(Vec3::new(-50.0, -75.0, 0.0)),
        ];
        let point = Vec4::new(100.0, 150.0, 30.0, 1.0);
        let reference = composed * point;
        let in_order = steps.iter().fold(proj, |acc, s| math::multiply(acc, *s));
        assert!(mat_close(in_order, composed));

        for i in 0..steps.len() {
            for j in i + 1..steps.len() {
                // The shear only offsets, so it commutes with the user translation.
                if (i, j) == (0, 1) {
                    continue;
                }
                let mut swapped = steps;
                swapped.swap(i, j);
                let m = swapped.iter().fold(proj, |acc, s| math::multiply(acc, *s));
                let moved = m * point;
                assert!(
                    (moved - reference).length() > 1e-3,
                    "swapping steps {} and {} went unnoticed",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn default_scene_translation_column() {
        let p = TransformParameters::default();
        let mut planner = FramePlanner::new(pinned(), VERTEX_COUNT as u32);
        let mut live = p;
        let plan = planner.plan(&mut live, 100, 100).unwrap();

        // Shear (+1, +1, +1), z = -400, recenter (-50, -75, 0).
        let f = 1.0 / (22.5f32.to_radians()).tan();
        let (tx, ty, tz) = (-49.0, -74.0, -399.0);
        let a = 1001.0 / -999.0;
        let b = 2000.0 / -999.0;
        #[rustfmt::skip]
        let expected = Mat4::from_cols_array(&[
            f,   0.0, 0.0,  0.0,
            0.0, f,   0.0,  0.0,
            0.0, 0.0, a,   -1.0,
            tx * f, ty * f, tz * a + b, -tz,
        ]);

        assert!(mat_close(plan.matrix, expected), "{:?}", plan.matrix);
        assert!(close(plan.matrix.w_axis.z, 397.796_8));
        assert!(close(plan.matrix.w_axis.w, 399.0));
    }

    #[test]
    fn first_frame_advances_angle_y() {
        let mut params = TransformParameters::default();
        let mut planner = FramePlanner::new(RendererConfig::default(), VERTEX_COUNT as u32);
        assert_eq!(planner.state(), RenderState::Idle);

        planner.plan(&mut params, 640, 480).unwrap();
        assert_eq!(planner.state(), RenderState::Animating);
        assert!((params.angle_y - 0.01).abs() < 1e-7);

        planner.plan(&mut params, 640, 480).unwrap();
        assert!((params.angle_y - 0.02).abs() < 1e-7);
        assert_eq!(params.x, 0.0);
        assert_eq!(params.z, -400.0);
    }

    #[test]
    fn pinned_frames_are_bit_identical() {
        let mut params = sample_params();
        let mut planner = FramePlanner::new(pinned(), VERTEX_COUNT as u32);

        let first = planner.plan(&mut params, 800, 600).unwrap();
        let second = planner.plan(&mut params, 800, 600).unwrap();

        let bits = |m: Mat4| m.to_cols_array().map(f32::to_bits);
        assert_eq!(bits(first.matrix), bits(second.matrix));
        assert_eq!(first, second);
    }

    #[test]
    fn draw_covers_every_vertex() {
        let mut params = TransformParameters::default();
        let mut planner = FramePlanner::new(RendererConfig::default(), VERTEX_COUNT as u32);
        let plan = planner.plan(&mut params, 320, 200).unwrap();

        assert_eq!(plan.vertices, 0..96);
        assert_eq!(
            plan.viewport,
            Viewport {
                x: 0,
                y: 0,
                width: 320,
                height: 200
            }
        );
        assert_eq!(plan.surface_size, (320, 200));
        assert_eq!(plan.clear_color.g, 0.1);
    }

    #[test]
    fn zero_sized_surface_skips_without_panicking() {
        let mut params = TransformParameters::default();
        let mut planner = FramePlanner::new(RendererConfig::default(), VERTEX_COUNT as u32);

        assert!(planner.plan(&mut params, 0, 480).is_none());
        assert!(planner.plan(&mut params, 640, 0).is_none());
        assert!(planner.plan(&mut params, 0, 0).is_none());
        assert_eq!(planner.frames(), 3);
        assert_eq!(planner.state(), RenderState::Animating);
        assert!((params.angle_y - 0.03).abs() < 1e-6);

        assert!(planner.plan(&mut params, 640, 480).is_some());
    }
}
