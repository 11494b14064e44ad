//! Geometry builders for cgviz.
//!
//! - [`BoxBuilder`] turns a center and half-extent into a colored box mesh
//! - [`FrustumBuilder`] turns a [`CameraPose`] into a frustum line set
//! - [`rotation_from_yaw_pitch_roll`] builds camera rotations from Euler angles

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Single-letter names mirror the pinhole model (fx, cx, ...)
#![allow(clippy::many_single_char_names)]

pub mod box_mesh;
pub mod camera_frustum;

pub use box_mesh::{BoxBuilder, BOX_TRIANGLES};
pub use camera_frustum::{
    matrix_from_rows, rotation_from_yaw_pitch_roll, CameraPose, FrustumBuilder, FRUSTUM_LINES,
};
