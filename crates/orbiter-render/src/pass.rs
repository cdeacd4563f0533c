//! Per-frame command encoding.
//!
//! Every frame is a single pass: clear colour and depth, draw both bodies,
//! present. [`FrameEncoder`] holds the acquired surface texture until
//! [`FrameEncoder::submit`] presents it.

use crate::depth::DepthBuffer;

/// Near-black blue used behind the scene.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.08,
    a: 1.0,
};

fn color_ops(clear: wgpu::Color) -> wgpu::Operations<wgpu::Color> {
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(clear),
        store: wgpu::StoreOp::Store,
    }
}

/// The depth buffer is only read within the pass, so it is not stored.
fn depth_ops() -> wgpu::Operations<f32> {
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
        store: wgpu::StoreOp::Discard,
    }
}

/// One frame's encoder and the surface texture it draws into.
///
/// Dropping it without [`submit`](Self::submit) releases the texture
/// unpresented.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    target: wgpu::SurfaceTexture,
    target_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, target: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene-frame"),
        });
        let target_view = target.texture.create_view(&Default::default());
        Self {
            encoder,
            target,
            target_view,
        }
    }

    /// Start the scene pass: colour cleared to `clear`, depth cleared to the
    /// far plane.
    pub fn begin_scene_pass<'a>(
        &'a mut self,
        clear: wgpu::Color,
        depth: &'a DepthBuffer,
    ) -> wgpu::RenderPass<'a> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target_view,
                resolve_target: None,
                ops: color_ops(clear),
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(depth_ops()),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }

    /// Submit the recorded commands and present.
    pub fn submit(self, queue: &wgpu::Queue) {
        queue.submit([self.encoder.finish()]);
        self.target.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_black_is_blue_tinted() {
        assert!(SPACE_BLACK.b > SPACE_BLACK.r);
        assert_eq!(SPACE_BLACK.r, SPACE_BLACK.g);
        assert_eq!(SPACE_BLACK.a, 1.0);
    }

    #[test]
    fn test_color_cleared_and_stored() {
        let ops = color_ops(wgpu::Color::RED);
        assert_eq!(ops.load, wgpu::LoadOp::Clear(wgpu::Color::RED));
        assert_eq!(ops.store, wgpu::StoreOp::Store);
    }

    #[test]
    fn test_depth_cleared_to_far_plane() {
        let ops = depth_ops();
        assert_eq!(ops.load, wgpu::LoadOp::Clear(0.0));
        assert_eq!(ops.store, wgpu::StoreOp::Discard);
    }
}
