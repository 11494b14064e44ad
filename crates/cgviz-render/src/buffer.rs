//! GPU buffer helpers.

use wgpu::util::DeviceExt;

/// How a buffer is bound during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// Per-vertex attributes, written once at upload.
    Vertex,
    /// `u32` indices, written once at upload.
    Index,
    /// Uniform block, rewritten every frame.
    Uniform,
}

impl BufferRole {
    /// Returns the usage flags for this role.
    pub fn usage(self) -> wgpu::BufferUsages {
        match self {
            Self::Vertex => wgpu::BufferUsages::VERTEX,
            Self::Index => wgpu::BufferUsages::INDEX,
            Self::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Creates a buffer initialized with `data`.
pub fn create_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    role: BufferRole,
    data: &[T],
    label: &str,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: role.usage(),
    })
}

/// Overwrites a uniform buffer with a single value.
pub fn write_uniform<T: bytemuck::Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, value: &T) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(value));
}
