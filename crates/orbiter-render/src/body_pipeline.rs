//! Textured, Phong-lit pipeline shared by the Earth and the satellite.
//!
//! Bind groups: 0 = light, 1 = per-body matrices, 2 = texture + sampler.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orbiter_scene::BodyTransform;

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;
use crate::light::LightUniform;
use crate::shader::{ShaderError, ShaderLibrary};

pub const BODY_SHADER_NAME: &str = "body";

pub const BODY_SHADER_SOURCE: &str = r#"
struct Light {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular_shininess: vec4<f32>,
};

struct Body {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> light: Light;
@group(1) @binding(0) var<uniform> body: Body;
@group(2) @binding(0) var body_texture: texture_2d<f32>;
@group(2) @binding(1) var body_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texture_coord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texture_coord: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let view_position = body.model_view * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = body.projection * view_position;
    out.view_position = view_position.xyz;
    out.normal = (body.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz;
    out.texture_coord = in.texture_coord;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let l = normalize(light.position.xyz - in.view_position);
    let v = normalize(-in.view_position);
    let diffuse = max(dot(n, l), 0.0);
    var specular = 0.0;
    if (diffuse > 0.0) {
        specular = pow(max(dot(reflect(-l, n), v), 0.0), light.specular_shininess.w);
    }
    let weighting = light.ambient.rgb
        + light.diffuse.rgb * diffuse
        + light.specular_shininess.rgb * specular;
    let texel = textureSample(body_texture, body_sampler, in.texture_coord);
    return vec4<f32>(texel.rgb * weighting, texel.a);
}
"#;

/// Per-body matrices, 192 bytes. The normal matrix is widened to a mat4 so
/// the struct has no mat3 padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyUniform {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl BodyUniform {
    pub fn new(transform: &BodyTransform, projection: Mat4) -> Self {
        Self {
            model_view: transform.model_view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            normal_matrix: Mat4::from_mat3(transform.normal_matrix).to_cols_array_2d(),
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub light_bind_group_layout: wgpu::BindGroupLayout,
    pub body_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// Compile the body shader and build the pipeline. A shader that fails
    /// validation is returned as an error.
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderLibrary,
        surface_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, ShaderError> {
        let shader = shaders.load_from_source(device, BODY_SHADER_NAME, BODY_SHADER_SOURCE)?;

        let light_bind_group_layout = uniform_layout(
            device,
            "light-bgl",
            wgpu::ShaderStages::FRAGMENT,
            std::mem::size_of::<LightUniform>(),
        );
        let body_bind_group_layout = uniform_layout(
            device,
            "body-bgl",
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<BodyUniform>(),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &light_bind_group_layout,
                &body_bind_group_layout,
                texture_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // Mesh triangles wind clockwise seen from outside; both bodies
            // are closed, so culling is left off and depth sorts the faces.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            light_bind_group_layout,
            body_bind_group_layout,
        })
    }
}
