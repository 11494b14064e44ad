//! GPU resources for scene geometry.
//!
//! Box meshes are drawn as indexed triangle lists and line sets as indexed
//! line lists. Both use the same [`SceneVertex`] layout so a single shader
//! module serves both pipelines.

use cgviz_core::{BoxMesh, Geometry, LineSet};

use crate::buffer::{create_buffer, BufferRole};

/// Vertex layout shared by mesh and line pipelines.
/// Layout must match WGSL VertexInput exactly (24 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Returns the vertex buffer layout.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Primitive topology of a piece of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Indexed triangle list.
    Triangles,
    /// Indexed line list.
    Lines,
}

/// CPU-side vertex and index data ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffers {
    /// Topology of the index list.
    pub kind: PrimitiveKind,
    /// Vertices.
    pub vertices: Vec<SceneVertex>,
    /// Indices into `vertices`.
    pub indices: Vec<u32>,
}

impl GeometryBuffers {
    /// Converts geometry into GPU-ready vertex and index lists.
    #[must_use]
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Box(mesh) => Self::from_box(mesh),
            Geometry::Lines(lines) => Self::from_lines(lines),
        }
    }

    fn from_box(mesh: &BoxMesh) -> Self {
        let color = mesh.color.as_vec3().to_array();
        let vertices = mesh
            .vertices
            .iter()
            .map(|v| SceneVertex {
                position: v.as_vec3().to_array(),
                color,
            })
            .collect();
        let indices = mesh.triangles.iter().flatten().copied().collect();

        Self {
            kind: PrimitiveKind::Triangles,
            vertices,
            indices,
        }
    }

    /// Lines carry per-segment colors, so every segment gets its own pair of
    /// vertices.
    fn from_lines(lines: &LineSet) -> Self {
        let mut vertices = Vec::with_capacity(lines.lines.len() * 2);
        for i in 0..lines.lines.len() {
            let Some((a, b)) = lines.segment(i) else {
                log::warn!("skipping line {i}: index out of range");
                continue;
            };
            // Missing colors fall back to white.
            let color = lines
                .colors
                .get(i)
                .map_or([1.0; 3], |c| c.as_vec3().to_array());
            vertices.push(SceneVertex {
                position: a.as_vec3().to_array(),
                color,
            });
            vertices.push(SceneVertex {
                position: b.as_vec3().to_array(),
                color,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let indices = (0..vertices.len() as u32).collect();

        Self {
            kind: PrimitiveKind::Lines,
            vertices,
            indices,
        }
    }
}

/// GPU resources for rendering one piece of geometry.
pub struct GeometryRenderData {
    /// Topology, selects the pipeline.
    pub kind: PrimitiveKind,
    /// Vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl GeometryRenderData {
    /// Uploads CPU-side buffers to the GPU.
    #[must_use]
    pub fn new(device: &wgpu::Device, buffers: &GeometryBuffers, label: &str) -> Self {
        let vertex_buffer = create_buffer(
            device,
            BufferRole::Vertex,
            &buffers.vertices,
            &format!("{label} vertices"),
        );
        let index_buffer = create_buffer(
            device,
            BufferRole::Index,
            &buffers.indices,
            &format!("{label} indices"),
        );

        #[allow(clippy::cast_possible_truncation)]
        let index_count = buffers.indices.len() as u32;

        Self {
            kind: buffers.kind,
            vertex_buffer,
            index_buffer,
            index_count,
        }
    }

    /// Issues the draw call. The matching pipeline must already be bound.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<SceneVertex>(), 24);
    }

    #[test]
    fn test_box_buffers() {
        let mesh = BoxMesh {
            label: None,
            vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            triangles: vec![[0, 1, 2]],
            color: DVec3::new(1.0, 0.0, 1.0),
            translation: DVec3::ZERO,
            half_extent: DVec3::splat(0.5),
        };
        let buffers = GeometryBuffers::from_geometry(&mesh.into());
        assert_eq!(buffers.kind, PrimitiveKind::Triangles);
        assert_eq!(buffers.vertices.len(), 3);
        assert_eq!(buffers.indices, vec![0, 1, 2]);
        assert!(buffers.vertices.iter().all(|v| v.color == [1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_line_buffers_expand_segments() {
        let lines = LineSet {
            label: None,
            points: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            lines: vec![[0, 1], [1, 2], [2, 9]],
            colors: vec![DVec3::X, DVec3::Y, DVec3::Z],
        };
        let buffers = GeometryBuffers::from_geometry(&lines.into());
        assert_eq!(buffers.kind, PrimitiveKind::Lines);
        // The out-of-range segment is dropped.
        assert_eq!(buffers.vertices.len(), 4);
        assert_eq!(buffers.indices, vec![0, 1, 2, 3]);
        assert_eq!(buffers.vertices[2].position, [1.0, 0.0, 0.0]);
        assert_eq!(buffers.vertices[2].color, [0.0, 1.0, 0.0]);
    }
}
