//! wgpu rendering for Orbiter: device and surface management, the textured
//! body pipeline, background texture loading and the per-frame scene draw.

pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod light;
pub mod pass;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod texture_loader;

#[cfg(test)]
mod test_util;

pub use body_pipeline::{BODY_SHADER_SOURCE, BodyPipeline, BodyUniform};
pub use buffer::{MeshBuffer, VertexPositionNormalUv};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use light::{Light, LightUniform};
pub use pass::{FrameEncoder, SPACE_BLACK};
pub use renderer::{RenderError, RendererParams, SceneRenderer, body_transforms};
pub use shader::{ShaderError, ShaderLibrary};
pub use texture::{ImageData, TextureError, TextureManager, TextureSlot};
pub use texture_loader::{
    CompletedLoad, TextureHandle, TextureLoadError, TextureLoader, decode_image,
};
