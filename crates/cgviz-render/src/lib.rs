//! Rendering backend for cgviz.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU resource management (buffers, pipelines, depth and offscreen targets)
//! - The scene shader for flat-shaded boxes and colored line sets
//! - An orbit camera fitted to the scene bounds
//! - Frame readback and image export for headless runs

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel sizes are small enough that u32 <-> usize/f32 casts are fine
#![allow(clippy::cast_possible_truncation)]

pub mod buffer;
pub mod camera;
pub mod engine;
pub mod error;
pub mod scene_render;
pub mod screenshot;

pub use camera::Camera;
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use scene_render::{GeometryBuffers, GeometryRenderData, PrimitiveKind, SceneVertex};
pub use screenshot::{save_image, ScreenshotError};
