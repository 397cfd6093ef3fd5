//! # Letterspin
//!
//! Renders one extruded, per-face coloured letter "F" with wgpu and keeps it
//! spinning about its Y axis. Position, scale and rotation come from a small
//! set of live [`TransformParameters`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use letterspin::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     run_with_config(
//!         AppConfig::new()
//!             .title("F")
//!             .size(1280, 720)
//!             .params(TransformParameters { z: -600.0, ..Default::default() }),
//!     )
//! }
//! ```
//!
//! ## Layout
//!
//! - [`math`]: pure 4x4 matrix construction and composition
//! - [`shader`]: stage compilation and program linking
//! - [`buffers`]: static position and colour buffers
//! - [`renderer`]: the per-frame loop, split into a GPU-free [`FramePlanner`]
//!   and the [`FrameRenderer`] that executes its plans
//! - [`geometry`]: the letter's vertex and colour tables

mod app;
pub mod buffers;
pub mod geometry;
mod gpu;
mod input;
pub mod math;
pub mod params;
pub mod renderer;
pub mod shader;

pub use app::{AppConfig, run, run_with_config};
pub use buffers::GeometryBuffers;
pub use gpu::GpuContext;
pub use input::{Input, ParamControl};
pub use params::{Param, ParamRange, TransformParameters};
pub use renderer::{
    FrameOutcome, FramePlan, FramePlanner, FrameRenderer, RenderState, RendererConfig, Viewport,
    compose_transform,
};
pub use shader::{Program, ProgramError, Shader, ShaderStage, compile_shader, link_program};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};
