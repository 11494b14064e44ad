//! Application window and event loop management.

mod input;

pub(super) use std::sync::Arc;

pub(super) use pollster::FutureExt;
pub(super) use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

pub(super) use cgviz_core::{CgvizError, Geometry, Result};
pub(super) use cgviz_render::{RenderEngine, RenderError};

use glam::Vec3;

/// Window settings for the interactive viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    /// Window title.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Clear color.
    pub background_color: Vec3,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: "cgviz".to_string(),
            width: 1280,
            height: 720,
            background_color: Vec3::new(0.1, 0.1, 0.1),
        }
    }
}

/// The viewer application state for one scene.
pub(crate) struct App<'a> {
    pub(super) options: &'a ViewerOptions,
    pub(super) geometries: &'a [Geometry],
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    pub(super) close_requested: bool,
    // Mouse state for camera control
    pub(super) mouse_pos: (f64, f64),
    pub(super) left_mouse_down: bool,
    pub(super) right_mouse_down: bool,
    // Modifier keys
    pub(super) shift_down: bool,
    // First fatal error raised inside the event loop
    pub(super) error: Option<CgvizError>,
}

impl<'a> App<'a> {
    /// Creates a new application for the given scene.
    pub(crate) fn new(options: &'a ViewerOptions, geometries: &'a [Geometry]) -> Self {
        Self {
            options,
            geometries,
            window: None,
            engine: None,
            close_requested: false,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
            right_mouse_down: false,
            shift_down: false,
            error: None,
        }
    }

    /// Records a fatal error and asks the loop to stop.
    pub(super) fn fail(&mut self, error: CgvizError) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.close_requested = true;
    }
}

/// Opens a window showing `geometries` and blocks until it is closed.
pub(crate) fn run_app(options: &ViewerOptions, geometries: &[Geometry]) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| CgvizError::Render(format!("failed to create event loop: {e}")))?;
    let mut app = App::new(options, geometries);

    event_loop
        .run_app(&mut app)
        .map_err(|e| CgvizError::Render(format!("event loop error: {e}")))?;

    app.error.map_or(Ok(()), Err)
}

fn render_error(context: &str, error: &RenderError) -> CgvizError {
    CgvizError::Render(format!("{context}: {error}"))
}
