//! Renderer-agnostic interface.
//!
//! Geometry construction never talks to a window or GPU directly. It hands the
//! finished geometry list to a [`SceneRenderer`], which may block (an
//! interactive window), write files (headless capture) or just describe the
//! scene ([`DebugTextRenderer`]).

use std::fmt::Write as _;

use crate::error::Result;
use crate::geometry::Geometry;

/// Consumes a finished scene.
pub trait SceneRenderer {
    /// Renders the given geometries in order.
    fn render(&mut self, geometries: &[Geometry]) -> Result<()>;
}

/// Debug text renderer.
///
/// Produces a human-readable description of every geometry it is given.
/// Useful for logging and for testing the render interface without a display.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    output: String,
    frames: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text produced by the last call to `render`.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns how many times `render` has been called.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl SceneRenderer for DebugTextRenderer {
    fn render(&mut self, geometries: &[Geometry]) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} geometries) ===", geometries.len());

        for (i, geometry) in geometries.iter().enumerate() {
            let label = geometry.label().unwrap_or("-");
            match geometry {
                Geometry::Box(mesh) => {
                    let (min, max) = mesh.bounds();
                    let _ = writeln!(
                        out,
                        "  [{i}] {} '{label}' min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3}) color=({:.2}, {:.2}, {:.2})",
                        geometry.type_name(),
                        min.x,
                        min.y,
                        min.z,
                        max.x,
                        max.y,
                        max.z,
                        mesh.color.x,
                        mesh.color.y,
                        mesh.color.z,
                    );
                }
                Geometry::Lines(lines) => {
                    let _ = writeln!(
                        out,
                        "  [{i}] {} '{label}' points={} lines={}",
                        geometry.type_name(),
                        lines.points.len(),
                        lines.lines.len(),
                    );
                }
            }
        }

        log::debug!("{out}");
        self.output = out;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineSet;
    use glam::DVec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&[]).expect("render");
        assert!(renderer.output().contains("0 geometries"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_lists_lines() {
        let lines = LineSet {
            label: Some("camera 0".to_string()),
            points: vec![DVec3::ZERO, DVec3::X],
            lines: vec![[0, 1]],
            colors: vec![DVec3::Y],
        };
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&[lines.into()]).expect("render");
        assert!(renderer.output().contains("LineSet 'camera 0' points=2 lines=1"));
    }
}
