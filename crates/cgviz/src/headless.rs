//! Headless rendering.
//!
//! Renders the scene to an image buffer or file without opening a window.
//! Useful for integration tests, batch processing and automated screenshots.

use std::path::PathBuf;

use glam::Vec3;
use pollster::FutureExt;

use cgviz_core::{CgvizError, Geometry, Result, SceneConfig, SceneRenderer};
use cgviz_render::RenderEngine;

/// Renders a scene offscreen and returns RGBA pixels, rows top to bottom.
///
/// The camera is automatically fitted to the scene bounding box. The returned
/// buffer is `width * height * 4` bytes. A zero width or height is rejected
/// with [`CgvizError::Render`].
pub fn render_to_image(
    geometries: &[Geometry],
    width: u32,
    height: u32,
    background_color: Vec3,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(CgvizError::Render(format!(
            "invalid image size {width}x{height}"
        )));
    }

    let mut engine = RenderEngine::new_headless(width, height)
        .block_on()
        .map_err(|e| CgvizError::Render(format!("failed to create headless engine: {e}")))?;
    engine.background_color = background_color;
    engine.set_scene(geometries);

    engine
        .capture_frame()
        .map_err(|e| CgvizError::Render(format!("failed to capture frame: {e}")))
}

/// Writes one frame of the scene to a PNG or JPEG file.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    path: PathBuf,
    width: u32,
    height: u32,
    background_color: Vec3,
}

impl HeadlessRenderer {
    /// Creates a renderer writing `width` x `height` images to `path`.
    ///
    /// Zero sizes are raised to 1 pixel.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width: width.max(1),
            height: height.max(1),
            background_color: Vec3::new(0.1, 0.1, 0.1),
        }
    }

    /// Takes the background color from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &SceneConfig) -> Self {
        self.background_color = config.background_color.as_vec3();
        self
    }

    /// Returns the output path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn render(&mut self, geometries: &[Geometry]) -> Result<()> {
        let pixels = render_to_image(geometries, self.width, self.height, self.background_color)?;
        cgviz_render::save_image(&self.path, &pixels, self.width, self.height)
            .map_err(|e| CgvizError::Render(format!("failed to save image: {e}")))
    }
}
