//! Draws the Earth and the satellite for one frame.
//!
//! [`SceneRenderer`] owns every GPU resource derived from a [`RenderContext`].
//! After a context loss it is dropped wholesale and rebuilt from the same
//! [`RendererParams`]; the logical scene lives in `orbiter_scene` and survives.

use glam::Mat4;
use orbiter_scene::{
    BodyPose, BodyTransform, GeometryError, PRIMARY_FACE_INDEX_COUNT, SceneState, TransformStack,
    generate_cube, generate_sphere,
};
use wgpu::util::DeviceExt;

use crate::body_pipeline::{BodyPipeline, BodyUniform};
use crate::buffer::MeshBuffer;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::light::Light;
use crate::pass::{FrameEncoder, SPACE_BLACK};
use crate::shader::{ShaderError, ShaderLibrary};
use crate::texture::{ImageData, TextureError, TextureManager, TextureSlot};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Everything needed to (re)build the GPU side of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererParams {
    pub latitude_strips: u32,
    pub longitude_strips: u32,
    pub earth_radius: f32,
    pub satellite_half_extent: f32,
    pub light: Light,
    pub clear_color: wgpu::Color,
}

impl Default for RendererParams {
    fn default() -> Self {
        Self {
            latitude_strips: 30,
            longitude_strips: 30,
            earth_radius: 8.0,
            satellite_half_extent: 1.0,
            light: Light::default(),
            clear_color: SPACE_BLACK,
        }
    }
}

/// Model-view and normal matrices for both bodies, derived from the base
/// view through a transform stack.
pub fn body_transforms(scene: &SceneState) -> [BodyTransform; 2] {
    let mut stack = TransformStack::new(scene.view.model_view());
    derive_bodies(&mut stack, scene)
}

/// Each body gets its own scope, so `stack` ends at the depth it started.
fn derive_bodies(stack: &mut TransformStack, scene: &SceneState) -> [BodyTransform; 2] {
    let earth = scoped_transform(stack, scene.earth.pose());
    let satellite = scoped_transform(stack, scene.satellite.pose());
    [earth, satellite]
}

fn scoped_transform(stack: &mut TransformStack, pose: &BodyPose) -> BodyTransform {
    let mut scope = stack.scope();
    scope.apply_pose(pose);
    BodyTransform::from_model_view(scope.current())
}

struct BodyBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BodyBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-uniform")),
            size: std::mem::size_of::<BodyUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, transform: &BodyTransform, projection: Mat4) {
        let uniform = BodyUniform::new(transform, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }
}

pub struct SceneRenderer {
    pipeline: BodyPipeline,
    textures: TextureManager,
    depth: DepthBuffer,
    earth_mesh: MeshBuffer,
    satellite_mesh: MeshBuffer,
    earth: BodyBinding,
    satellite: BodyBinding,
    light_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Build meshes, pipeline, uniforms and placeholder textures.
    pub fn new(ctx: &RenderContext, params: &RendererParams) -> Result<Self, RenderError> {
        let device = &ctx.device;

        let sphere = generate_sphere(
            params.latitude_strips,
            params.longitude_strips,
            params.earth_radius,
        )?;
        let cube = generate_cube(params.satellite_half_extent);
        let earth_mesh = MeshBuffer::from_mesh(device, "earth", &sphere);
        let satellite_mesh = MeshBuffer::from_mesh(device, "satellite", &cube);
        log::debug!(
            "Uploaded meshes: earth {} triangles, satellite {} triangles",
            sphere.triangle_count(),
            cube.triangle_count()
        );

        let mut textures = TextureManager::new(device);
        textures.install_placeholders(device, &ctx.queue)?;

        let mut shaders = ShaderLibrary::new();
        let pipeline = BodyPipeline::new(
            device,
            &mut shaders,
            ctx.surface_format,
            textures.bind_group_layout(),
        )?;

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("light-uniform"),
            contents: bytemuck::bytes_of(&params.light.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light-bind-group"),
            layout: &pipeline.light_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        let earth = BodyBinding::new(device, &pipeline.body_bind_group_layout, "earth");
        let satellite = BodyBinding::new(device, &pipeline.body_bind_group_layout, "satellite");

        let (width, height) = ctx.size();
        let depth = DepthBuffer::new(device, width, height);

        log::info!("Scene renderer ready ({width}x{height})");
        Ok(Self {
            pipeline,
            textures,
            depth,
            earth_mesh,
            satellite_mesh,
            earth,
            satellite,
            light_bind_group,
            clear_color: params.clear_color,
        })
    }

    /// Replace a body texture with a decoded image.
    pub fn upload_texture(
        &mut self,
        ctx: &RenderContext,
        slot: TextureSlot,
        image: &ImageData,
    ) -> Result<(), RenderError> {
        self.textures
            .upload(&ctx.device, &ctx.queue, slot, image)
            .map(|_| ())
            .map_err(RenderError::from)
    }

    /// Match the depth buffer to a resized surface.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Upload this frame's matrices and draw both bodies.
    pub fn render(&mut self, ctx: &RenderContext, scene: &SceneState) -> Result<(), RenderError> {
        let surface_texture = ctx.get_current_texture()?;

        let [earth, satellite] = body_transforms(scene);
        let projection = scene.view.projection();
        self.earth.write(&ctx.queue, &earth, projection);
        self.satellite.write(&ctx.queue, &satellite, projection);

        let earth_texture = self.textures.bind_group(TextureSlot::Earth)?;
        let primary = self.textures.bind_group(TextureSlot::SatellitePrimary)?;
        let secondary = self.textures.bind_group(TextureSlot::SatelliteSecondary)?;

        let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
        {
            let mut pass = frame.begin_scene_pass(self.clear_color, &self.depth);
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.light_bind_group, &[]);

            pass.set_bind_group(1, &self.earth.bind_group, &[]);
            pass.set_bind_group(2, earth_texture, &[]);
            self.earth_mesh.bind(&mut pass);
            self.earth_mesh.draw(&mut pass);

            // First cube face carries the primary texture, the other five
            // the secondary one.
            let split = PRIMARY_FACE_INDEX_COUNT.min(self.satellite_mesh.index_count);
            pass.set_bind_group(1, &self.satellite.bind_group, &[]);
            self.satellite_mesh.bind(&mut pass);
            pass.set_bind_group(2, primary, &[]);
            self.satellite_mesh.draw_range(&mut pass, 0..split);
            pass.set_bind_group(2, secondary, &[]);
            self.satellite_mesh
                .draw_range(&mut pass, split..self.satellite_mesh.index_count);
        }
        frame.submit(&ctx.queue);
        Ok(())
    }
}
