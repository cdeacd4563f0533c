//! GPU textures for the three body surfaces.
//!
//! [`TextureManager`] keeps one texture per [`TextureSlot`]. Every slot starts
//! out as a 1x1 placeholder colour so the scene can draw before any image has
//! decoded; uploading a decoded image replaces the slot in place.

use std::collections::HashMap;
use std::sync::Arc;

/// Which surface a texture covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Wrapped around the Earth sphere.
    Earth,
    /// The satellite's first cube face.
    SatellitePrimary,
    /// The satellite's remaining five faces.
    SatelliteSecondary,
}

impl TextureSlot {
    pub const ALL: [Self; 3] = [
        Self::Earth,
        Self::SatellitePrimary,
        Self::SatelliteSecondary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Earth => "earth",
            Self::SatellitePrimary => "satellite-primary",
            Self::SatelliteSecondary => "satellite-secondary",
        }
    }

    /// RGBA shown until the real image arrives.
    pub fn placeholder_color(self) -> [u8; 4] {
        match self {
            Self::Earth => [28, 72, 140, 255],
            Self::SatellitePrimary => [212, 175, 55, 255],
            Self::SatelliteSecondary => [192, 192, 192, 255],
        }
    }
}

/// Tightly packed RGBA8 pixels, rows in texture order (row 0 at v = 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// A single pixel of `rgba`.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// A GPU texture with its view and ready-to-bind bind group.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("no texture in slot {0:?}")]
    EmptySlot(TextureSlot),
}

/// Number of mip levels for a full chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    (width.max(height) as f32).log2().floor() as u32 + 1
}

/// Texture colour format. Images are authored in sRGB.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// WGSL shader for mipmap generation via fullscreen blit.
const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Per-slot textures plus the shared sampler, layout and mipmap blitter.
pub struct TextureManager {
    textures: HashMap<TextureSlot, Arc<ManagedTexture>>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
}

fn texture_layout_entries() -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

impl TextureManager {
    pub fn new(device: &wgpu::Device) -> Self {
        // Mirrored repeat keeps the sphere seam and cube edges free of
        // wrap-around bleeding.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("body-sampler"),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::MirrorRepeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &texture_layout_entries(),
        });
        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blit-bind-group-layout"),
                entries: &texture_layout_entries(),
            });

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });
        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            immediate_size: 0,
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mipmap-pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            textures: HashMap::new(),
            sampler,
            bind_group_layout,
            blit_pipeline,
            blit_bind_group_layout,
            blit_sampler,
        }
    }

    /// Fill every slot with its placeholder colour.
    pub fn install_placeholders(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<(), TextureError> {
        for slot in TextureSlot::ALL {
            self.upload(device, queue, slot, &ImageData::solid(slot.placeholder_color()))?;
        }
        Ok(())
    }

    /// Upload `image` into `slot`, replacing whatever was there, and build
    /// its mip chain.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: TextureSlot,
        image: &ImageData,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        let ImageData {
            width,
            height,
            ref pixels,
        } = *image;
        validate_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        validate_data_size(pixels, width, height)?;

        let mip_levels = mip_level_count(width, height);
        let name = slot.label();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        if mip_levels > 1 {
            self.generate_mipmaps(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let managed = Arc::new(ManagedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            mip_level_count: mip_levels,
        });
        self.textures.insert(slot, Arc::clone(&managed));
        log::info!("Uploaded texture '{name}' ({width}x{height}, {mip_levels} mips)");
        Ok(managed)
    }

    pub fn get(&self, slot: TextureSlot) -> Option<Arc<ManagedTexture>> {
        self.textures.get(&slot).cloned()
    }

    /// Bind group for `slot`, or an error if nothing was ever uploaded.
    pub fn bind_group(&self, slot: TextureSlot) -> Result<&wgpu::BindGroup, TextureError> {
        self.textures
            .get(&slot)
            .map(|t| &t.bind_group)
            .ok_or(TextureError::EmptySlot(slot))
    }

    /// The shared bind group layout for texture + sampler pairs.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    fn generate_mipmaps(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_count: u32,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mipmap-encoder"),
        });

        for level in 1..mip_count {
            let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level - 1,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mipmap-bind-group"),
                layout: &self.blit_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.blit_sampler),
                    },
                ],
            });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mipmap-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn validate_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_device;

    #[test]
    fn test_mipmap_level_count_calculation() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(4, 4), 3);
        assert_eq!(mip_level_count(512, 256), 10);
        assert_eq!(mip_level_count(2048, 1024), 12);
    }

    #[test]
    fn test_placeholder_colors_are_opaque_and_distinct() {
        let colors: Vec<[u8; 4]> = TextureSlot::ALL
            .iter()
            .map(|s| s.placeholder_color())
            .collect();
        assert!(colors.iter().all(|c| c[3] == 255));
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        assert!(matches!(
            validate_dimensions(0, 4, 8192),
            Err(TextureError::ZeroDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(9000, 4, 8192),
            Err(TextureError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_data_size(&[0; 32], 4, 4),
            Err(TextureError::DataSizeMismatch { expected: 64, .. })
        ));
        assert!(validate_data_size(&[0; 64], 4, 4).is_ok());
    }

    #[test]
    fn test_placeholders_fill_every_slot() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        assert!(matches!(
            manager.bind_group(TextureSlot::Earth),
            Err(TextureError::EmptySlot(TextureSlot::Earth))
        ));
        manager.install_placeholders(&device, &queue).unwrap();
        for slot in TextureSlot::ALL {
            let tex = manager.get(slot).unwrap();
            assert_eq!(tex.dimensions, (1, 1));
            assert_eq!(tex.mip_level_count, 1);
        }
    }

    #[test]
    fn test_upload_replaces_slot() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        manager.install_placeholders(&device, &queue).unwrap();
        let before = manager.get(TextureSlot::Earth).unwrap();

        let image = ImageData {
            width: 256,
            height: 128,
            pixels: vec![200; 256 * 128 * 4],
        };
        manager
            .upload(&device, &queue, TextureSlot::Earth, &image)
            .unwrap();
        let after = manager.get(TextureSlot::Earth).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.dimensions, (256, 128));
        assert_eq!(after.mip_level_count, 9);
    }
}
