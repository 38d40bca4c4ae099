//! The default render target: an offscreen framebuffer and the clear passes
//! shared by every backend.

use casement_core::geometry::Rect;

use crate::context::GraphicsContext;

/// Color format used by default framebuffers and surfaces.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Depth format used by default framebuffers.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// An RGBA clear color with float components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// The default framebuffer: color and depth attachments, with an optional
/// MSAA color target resolved into the plain color texture.
///
/// Never resized in place. When the drawable size changes the owning window
/// builds a fresh framebuffer so attachment dimensions always match the
/// reported window size.
#[derive(Debug)]
pub struct Framebuffer {
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    msaa_texture: Option<wgpu::Texture>,
    msaa_view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl Framebuffer {
    pub fn builder(width: u32, height: u32) -> FramebufferBuilder {
        FramebufferBuilder::new(width, height)
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color_texture
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_texture(&self) -> &wgpu::Texture {
        &self.depth_texture
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn msaa_texture(&self) -> Option<&wgpu::Texture> {
        self.msaa_texture.as_ref()
    }

    /// The view draws go to (MSAA view when multisampled).
    pub fn render_view(&self) -> &wgpu::TextureView {
        self.msaa_view.as_ref().unwrap_or(&self.color_view)
    }

    /// The resolve target when multisampled, `None` otherwise.
    pub fn resolve_target(&self) -> Option<&wgpu::TextureView> {
        self.msaa_view.as_ref().map(|_| &self.color_view)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

/// Builder for the default framebuffer.
pub struct FramebufferBuilder {
    width: u32,
    height: u32,
    sample_count: u32,
    label: &'static str,
}

impl FramebufferBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sample_count: 1,
            label: "default framebuffer",
        }
    }

    /// Enable MSAA. A count of 0 or 1 leaves multisampling off.
    pub fn sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count.max(1);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn build(self, context: &GraphicsContext) -> Framebuffer {
        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };

        // Resolved color is always single-sampled and copyable for readback.
        let color_texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(self.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (msaa_texture, msaa_view) = if self.sample_count > 1 {
            let texture = context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("framebuffer msaa"),
                size,
                mip_level_count: 1,
                sample_count: self.sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (Some(texture), Some(view))
        } else {
            (None, None)
        };

        let (depth_texture, depth_view) =
            create_depth_texture(&context.device, self.width, self.height, self.sample_count);

        Framebuffer {
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            msaa_texture,
            msaa_view,
            width: self.width,
            height: self.height,
            sample_count: self.sample_count,
        }
    }
}

/// Depth attachment sized to the drawable; also used standalone by the
/// interactive backend next to its surface.
pub(crate) fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("framebuffer depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: sample_count.max(1),
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// The attachments a clear operates on, independent of whether the color
/// view belongs to a framebuffer texture or a surface texture.
pub(crate) struct ClearTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub resolve: Option<&'a wgpu::TextureView>,
    pub depth: Option<&'a wgpu::TextureView>,
    pub width: u32,
    pub height: u32,
}

/// Clamp a consumer-supplied clear region to the attachment bounds, so an
/// oversized rect can never trip scissor validation. `None` when nothing of
/// the rect lies inside the target.
pub(crate) fn clamp_viewport(rect: Rect<u32>, width: u32, height: u32) -> Option<Rect<u32>> {
    if rect.x >= width || rect.y >= height {
        return None;
    }
    let clamped_width = rect.width.min(width - rect.x);
    let clamped_height = rect.height.min(height - rect.y);
    if clamped_width == 0 || clamped_height == 0 {
        return None;
    }
    Some(Rect::new(rect.x, rect.y, clamped_width, clamped_height))
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ClearParams {
    color: [f32; 4],
    depth: [f32; 4],
}

/// Pipeline for sub-region clears.
///
/// `LoadOp::Clear` ignores the scissor rect, so a viewport-restricted clear
/// draws a scissored fullscreen triangle in the clear color instead, with
/// the clear depth carried through the vertex z.
pub(crate) struct ClearPipeline {
    pipeline: wgpu::RenderPipeline,
    params: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ClearPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clear shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/clear.wgsl").into()),
        });

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("clear params"),
            size: std::mem::size_of::<ClearParams>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("clear bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("clear bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("clear pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("clear pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count.max(1),
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            params,
            bind_group,
        }
    }
}

/// Record and submit a clear of the given target.
///
/// Without a viewport this is a plain `LoadOp::Clear` pass. With one, the
/// pass loads existing contents and draws the scissored clear triangle.
/// A viewport is clamped to the attachment bounds first; a region entirely
/// outside the target clears nothing.
pub(crate) fn clear_target(
    context: &GraphicsContext,
    target: &ClearTarget<'_>,
    clear_pipeline: &ClearPipeline,
    color: Color,
    depth: f32,
    viewport: Option<Rect<u32>>,
) {
    let viewport = match viewport {
        Some(rect) => match clamp_viewport(rect, target.width, target.height) {
            Some(rect) => Some(rect),
            None => {
                tracing::debug!(?rect, "clear region lies outside the target, skipping");
                return;
            }
        },
        None => None,
    };

    let mut encoder = context
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("clear encoder"),
        });

    let (load_color, load_depth) = match viewport {
        None => (
            wgpu::LoadOp::Clear(color.to_wgpu()),
            wgpu::LoadOp::Clear(depth),
        ),
        Some(_) => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
    };

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view,
                resolve_target: target.resolve,
                ops: wgpu::Operations {
                    load: load_color,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: target.depth.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: load_depth,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some(rect) = viewport {
            context.queue.write_buffer(
                &clear_pipeline.params,
                0,
                bytemuck::bytes_of(&ClearParams {
                    color: [color.r, color.g, color.b, color.a],
                    depth: [depth, 0.0, 0.0, 0.0],
                }),
            );
            pass.set_pipeline(&clear_pipeline.pipeline);
            pass.set_bind_group(0, &clear_pipeline.bind_group, &[]);
            pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
            pass.draw(0..3, 0..1);
        }
    }

    context.queue.submit(std::iter::once(encoder.finish()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_viewport_is_unchanged() {
        let rect = Rect::new(8, 8, 16, 16);
        assert_eq!(clamp_viewport(rect, 64, 64), Some(rect));
    }

    #[test]
    fn oversized_viewport_is_clamped_to_the_target() {
        let clamped = clamp_viewport(Rect::new(48, 32, 100, 100), 64, 64);
        assert_eq!(clamped, Some(Rect::new(48, 32, 16, 32)));
    }

    #[test]
    fn viewport_outside_the_target_is_rejected() {
        assert_eq!(clamp_viewport(Rect::new(64, 0, 10, 10), 64, 64), None);
        assert_eq!(clamp_viewport(Rect::new(0, 80, 10, 10), 64, 64), None);
        assert_eq!(clamp_viewport(Rect::new(10, 10, 0, 5), 64, 64), None);
    }
}
