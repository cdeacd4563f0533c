//! Vertex and index buffers for the body meshes.

use bytemuck::{Pod, Zeroable};
use orbiter_scene::Mesh;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Interleaved vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Vertex buffer layout matching the body shader's inputs.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a mesh's attribute arrays for upload.
pub fn interleave(mesh: &Mesh) -> Vec<VertexPositionNormalUv> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((p, n), uv)| VertexPositionNormalUv {
            position: p.to_array(),
            normal: n.to_array(),
            uv: *uv,
        })
        .collect()
}

/// A mesh uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Upload `mesh` as a vertex buffer and a u32 index buffer.
    pub fn from_mesh(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Draw a sub-range of the index buffer.
    pub fn draw_range(&self, render_pass: &mut wgpu::RenderPass<'_>, indices: Range<u32>) {
        render_pass.draw_indexed(indices, 0, 0..1);
    }

    /// Draw the entire mesh.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_range(render_pass, 0..self.index_count);
    }
}
