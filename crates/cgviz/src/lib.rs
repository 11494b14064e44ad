//! cgviz: view scene-graph bounding boxes and camera frustums in 3D.
//!
//! Two JSON documents go in: an object graph with one axis-aligned bounding
//! box per object, and a list of camera poses. Every object becomes a box mesh
//! colored by its id and every camera becomes a wireframe frustum. The result
//! is shown in an interactive window or written to an image.
//!
//! # Quick Start
//!
//! ```no_run
//! use cgviz::*;
//!
//! fn main() -> Result<()> {
//!     let config = SceneConfig::default();
//!     let mut viewer = ViewerWindow::from_config(&config);
//!     let report = run(&config, &mut viewer)?;
//!     println!("{} boxes, {} frustums", report.boxes, report.frustums);
//!     Ok(())
//! }
//! ```
//!
//! # Renderers
//!
//! Scene building never touches a window directly. The finished geometry list
//! goes to a [`SceneRenderer`]:
//!
//! - [`ViewerWindow`] - interactive winit/wgpu window, blocks until closed
//! - [`HeadlessRenderer`] - renders one frame offscreen and saves it
//! - [`DebugTextRenderer`] - plain text description, for tests and logs

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
pub mod driver;
pub mod headless;
pub mod viewer;

// Re-export core types
pub use cgviz_core::{
    scene_bounds, BoxMesh, BoxPlacement, CameraPoses, CameraRecord, CgvizError, DebugTextRenderer,
    FrustumIntrinsics, Geometry, LineSet, ObjectGraph, ObjectRecord, Result, SceneConfig,
    SceneRenderer, DMat3, DVec3,
};

// Re-export structures
pub use cgviz_structures::{BoxBuilder, CameraPose, FrustumBuilder};

pub use app::ViewerOptions;
pub use driver::{build_boxes, build_frustums, build_scene, run, BuildReport, SkippedRecord};
pub use headless::{render_to_image, HeadlessRenderer};
pub use viewer::ViewerWindow;

/// Shows already-built geometry in an interactive window.
///
/// Blocks until the window is closed.
pub fn show(geometries: &[Geometry]) -> Result<()> {
    let _ = env_logger::try_init();
    ViewerWindow::default().render(geometries)
}
