//! Shader compilation and program linking.
//!
//! A [`Program`] is the wgpu counterpart of a linked GL program: one vertex
//! and one fragment [`Shader`] combined into a render pipeline, together with
//! the uniform storage for `u_matrix`.
//!
//! Both steps run inside a wgpu validation error scope, so a broken shader or
//! an interface mismatch between stages comes back as a [`ProgramError`]
//! instead of reaching the device's uncaptured-error handler. Either error is
//! fatal to startup; there is no fallback program.
//!
//! # Bindings
//!
//! | Name         | Kind      | Location            |
//! |--------------|-----------|---------------------|
//! | `a_position` | attribute | `@location(0)`      |
//! | `a_color`    | attribute | `@location(1)`      |
//! | `u_matrix`   | uniform   | `@group(0) @binding(0)` |

use std::fmt;

use glam::Mat4;

use crate::buffers::{COLOR_LAYOUT, POSITION_LAYOUT};

pub const A_POSITION_LOCATION: u32 = 0;
pub const A_COLOR_LOCATION: u32 = 1;
pub const U_MATRIX_GROUP: u32 = 0;
pub const U_MATRIX_BINDING: u32 = 0;

/// Source of the letter's vertex stage.
pub const VERTEX_SOURCE: &str = include_str!("shaders/letter.vert.wgsl");
/// Source of the letter's fragment stage.
pub const FRAGMENT_SOURCE: &str = include_str!("shaders/letter.frag.wgsl");

/// Pipeline stage a shader is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors that abort startup while building the shader program.
#[derive(Debug, Clone)]
pub enum ProgramError {
    /// A stage failed to compile. `log` is the compiler's diagnostic.
    ShaderCompile { stage: ShaderStage, log: String },
    /// The stages could not be linked into a pipeline. `log` is the validator's diagnostic.
    ProgramLink { log: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::ShaderCompile { stage, log } => {
                write!(f, "{} shader failed to compile: {}", stage, log)
            }
            ProgramError::ProgramLink { log } => write!(f, "program failed to link: {}", log),
        }
    }
}

impl std::error::Error for ProgramError {}

/// A compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    module: wgpu::ShaderModule,
    stage: ShaderStage,
}

/// Compile WGSL `source` for `stage`.
///
/// On failure the partially created module is dropped before the error is
/// returned.
pub fn compile_shader(
    device: &wgpu::Device,
    source: &str,
    stage: ShaderStage,
) -> Result<Shader, ProgramError> {
    let label = match stage {
        ShaderStage::Vertex => "Letter Vertex Shader",
        ShaderStage::Fragment => "Letter Fragment Shader",
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        drop(module);
        return Err(ProgramError::ShaderCompile {
            stage,
            log: err.to_string(),
        });
    }

    log::debug!("compiled {} shader", stage);
    Ok(Shader { module, stage })
}

/// Formats the program renders into.
#[derive(Clone, Copy, Debug)]
pub struct ProgramTarget {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// A linked vertex + fragment program and its `u_matrix` uniform.
pub struct Program {
    pipeline: wgpu::RenderPipeline,
    matrix_buffer: wgpu::Buffer,
    matrix_bind_group: wgpu::BindGroup,
}

/// Link a vertex and a fragment shader into a [`Program`].
///
/// Attribute and uniform locations are fixed by the tables in the module
/// docs. Culling is off and depth testing is on; fragments replace the
/// target without blending.
pub fn link_program(
    device: &wgpu::Device,
    vertex: &Shader,
    fragment: &Shader,
    target: ProgramTarget,
) -> Result<Program, ProgramError> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(ProgramError::ProgramLink {
            log: format!(
                "expected vertex and fragment stages, got {} and {}",
                vertex.stage, fragment.stage
            ),
        });
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let matrix_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("u_matrix"),
        size: std::mem::size_of::<[[f32; 4]; 4]>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let matrix_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Letter Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: U_MATRIX_BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

    let matrix_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Letter Uniform Bind Group"),
        layout: &matrix_bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: U_MATRIX_BINDING,
            resource: matrix_buffer.as_entire_binding(),
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Letter Pipeline Layout"),
        bind_group_layouts: &[&matrix_bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Letter Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex.module,
            entry_point: None,
            buffers: &[POSITION_LAYOUT, COLOR_LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment.module,
            entry_point: None,
            targets: &[Some(wgpu::ColorTargetState {
                format: target.color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: target.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        drop(pipeline);
        matrix_buffer.destroy();
        return Err(ProgramError::ProgramLink {
            log: err.to_string(),
        });
    }

    log::info!("linked letter program ({:?})", target.color_format);
    Ok(Program {
        pipeline,
        matrix_buffer,
        matrix_bind_group,
    })
}

impl Program {
    /// Compile both letter stages and link them.
    pub fn letter(device: &wgpu::Device, target: ProgramTarget) -> Result<Self, ProgramError> {
        let vertex = compile_shader(device, VERTEX_SOURCE, ShaderStage::Vertex)?;
        let fragment = compile_shader(device, FRAGMENT_SOURCE, ShaderStage::Fragment)?;
        link_program(device, &vertex, &fragment, target)
    }

    /// Upload `matrix` to `u_matrix`.
    pub fn set_matrix(&self, queue: &wgpu::Queue, matrix: &Mat4) {
        queue.write_buffer(
            &self.matrix_buffer,
            0,
            bytemuck::cast_slice(&matrix.to_cols_array()),
        );
    }

    /// Bind the pipeline and the `u_matrix` bind group.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(U_MATRIX_GROUP, &self.matrix_bind_group, &[]);
    }

    /// Destroy the uniform buffer. The pipeline is freed when dropped.
    pub fn release(self) {
        self.matrix_buffer.destroy();
    }
}
