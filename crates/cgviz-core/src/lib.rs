//! Core abstractions for cgviz.
//!
//! This crate provides the types shared by every other cgviz crate:
//! - [`Geometry`] values handed to renderers (box meshes and line sets)
//! - Input records decoded from the object-graph and camera-pose documents
//! - [`SceneConfig`] with the camera intrinsics and palette defaults
//! - The [`SceneRenderer`] seam and a text renderer for tests

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod geometry;
pub mod options;
pub mod records;
pub mod render;

pub use error::{CgvizError, Result};
pub use geometry::{scene_bounds, BoxMesh, Geometry, LineSet};
pub use options::{BoxPlacement, FrustumIntrinsics, SceneConfig, DEFAULT_MIN_EXTENT, PALETTE_SIZE};
pub use records::{
    CameraOrientation, CameraPosition, CameraPoses, CameraRecord, ObjectEntry, ObjectGraph,
    ObjectRecord,
};
pub use render::{DebugTextRenderer, SceneRenderer};

// Re-export glam types for convenience
pub use glam::{DMat3, DVec3};
