//! Interactive window renderer.

use cgviz_core::{Geometry, Result, SceneConfig, SceneRenderer};

use crate::app::{run_app, ViewerOptions};

/// Shows the scene in an interactive window.
///
/// `render` blocks until the window is closed (close button or ESC). Left drag
/// orbits, right drag or shift + left drag pans, the wheel zooms.
#[derive(Debug, Clone, Default)]
pub struct ViewerWindow {
    options: ViewerOptions,
}

impl ViewerWindow {
    /// Creates a viewer with the given window options.
    pub fn new(options: ViewerOptions) -> Self {
        Self { options }
    }

    /// Creates a viewer using the background color from `config`.
    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(ViewerOptions {
            background_color: config.background_color.as_vec3(),
            ..ViewerOptions::default()
        })
    }

    /// Returns the window options.
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }
}

impl SceneRenderer for ViewerWindow {
    fn render(&mut self, geometries: &[Geometry]) -> Result<()> {
        run_app(&self.options, geometries)
    }
}
