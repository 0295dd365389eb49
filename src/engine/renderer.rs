use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use wgpu::SurfaceError;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

use crate::ui::{Anchor, Color, DrawCommand, Rect, TextCommand};

/// Texture solid rectangles sample from.
const WHITE_TEXTURE: &str = "__white";

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    clear_color: wgpu::Color,
    world_size: [f32; 2],
    sprite_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<String, wgpu::BindGroup>,
    egui_ctx: egui::Context,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, world_size: [f32; 2], clear: Color) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|err| anyhow!("failed to create surface: {err}"))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No suitable GPU adapters found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("flappy-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .context("failed to open GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::CompositeAlphaMode::Opaque)
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flappy-sprite-shader"),
            source: wgpu::ShaderSource::Wgsl(SPRITE_SHADER.into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flappy-texture-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flappy-sprite-pipeline-layout"),
            bind_group_layouts: &[&texture_layout],
            push_constant_ranges: &[],
        });

        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("flappy-sprite-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("flappy-sprite-sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let mut renderer = Self {
            surface,
            device,
            queue,
            config,
            size,
            clear_color: wgpu::Color {
                r: clear.r as f64,
                g: clear.g as f64,
                b: clear.b as f64,
                a: clear.a as f64,
            },
            world_size,
            sprite_pipeline,
            texture_layout,
            sampler,
            textures: HashMap::new(),
            egui_ctx: egui::Context::default(),
            egui_renderer,
        };
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        renderer.register_texture(WHITE_TEXTURE, &white);
        Ok(renderer)
    }

    /// Uploads `image` to the GPU under `key`, replacing any previous one.
    pub fn register_texture(&mut self, key: &str, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(key),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(key),
            layout: &self.texture_layout,
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
        tracing::debug!(target: "engine", key, width, height, "texture uploaded");
        self.textures.insert(key.to_string(), bind_group);
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        commands: &[DrawCommand],
        scale_factor: f32,
    ) -> Result<(), SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame_batches = build_batches(commands, self.world_size);
        let vertex_buffer = if !frame_batches.vertices.is_empty() {
            Some(
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("flappy-sprite-vertex-buffer"),
                        contents: bytemuck::cast_slice(&frame_batches.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
            )
        } else {
            None
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("flappy-render-encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: scale_factor,
        };
        let text_output = self.layout_text(&frame_batches.texts, scale_factor);
        let paint_jobs = self
            .egui_ctx
            .tessellate(text_output.shapes, text_output.pixels_per_point);
        for (id, delta) in &text_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }
        let egui_commands = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("flappy-render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = vertex_buffer.as_ref() {
                render_pass.set_pipeline(&self.sprite_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for batch in &frame_batches.batches {
                    let Some(bind_group) = self.textures.get(&batch.texture) else {
                        tracing::trace!(
                            target: "engine",
                            texture = %batch.texture,
                            "texture not loaded"
                        );
                        continue;
                    };
                    render_pass.set_bind_group(0, bind_group, &[]);
                    render_pass.draw(batch.vertices.clone(), 0..1);
                }
            }

            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(
            egui_commands
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        for id in &text_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        frame.present();
        Ok(())
    }

    /// Lays out text with egui. World space is y-up, egui points are y-down.
    fn layout_text(&self, texts: &[TextCommand], scale_factor: f32) -> egui::FullOutput {
        let screen_points = egui::vec2(
            self.size.width as f32 / scale_factor,
            self.size.height as f32 / scale_factor,
        );
        let scale = egui::vec2(
            screen_points.x / self.world_size[0],
            screen_points.y / self.world_size[1],
        );
        let world_height = self.world_size[1];

        let mut raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, screen_points)),
            ..Default::default()
        };
        raw_input
            .viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(scale_factor);

        self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            for text in texts {
                let [x, y] = text.position;
                let [r, g, b, a] = text.color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                painter.text(
                    egui::pos2(x * scale.x, (world_height - y) * scale.y),
                    egui_anchor(text.anchor),
                    &text.content,
                    egui::FontId::proportional(text.size * scale.y),
                    egui::Color32::from_rgba_unmultiplied(r, g, b, a),
                );
            }
        })
    }
}

fn egui_anchor(anchor: Anchor) -> egui::Align2 {
    match anchor {
        Anchor::Center => egui::Align2::CENTER_CENTER,
        Anchor::TopCenter => egui::Align2::CENTER_TOP,
    }
}

#[derive(Debug, PartialEq)]
struct Batch {
    texture: String,
    vertices: Range<u32>,
}

#[derive(Debug, Default)]
struct FrameBatches {
    vertices: Vec<SpriteVertex>,
    batches: Vec<Batch>,
    texts: Vec<TextCommand>,
}

/// Splits a draw list into textured quads, grouped into runs that share a
/// texture, and text. Quads keep list order; text is drawn on top.
fn build_batches(commands: &[DrawCommand], world_size: [f32; 2]) -> FrameBatches {
    let mut frame = FrameBatches::default();
    for command in commands {
        let (texture, rect, color) = match command {
            DrawCommand::Rect { rect, color } => (WHITE_TEXTURE, *rect, *color),
            DrawCommand::Sprite { texture, rect } => (texture.as_str(), *rect, Color::WHITE),
            DrawCommand::Text(text) => {
                frame.texts.push(text.clone());
                continue;
            }
        };
        let start = frame.vertices.len() as u32;
        quad_vertices(rect, color, world_size, &mut frame.vertices);
        let end = frame.vertices.len() as u32;
        match frame.batches.last_mut() {
            Some(batch) if batch.texture == texture && batch.vertices.end == start => {
                batch.vertices.end = end;
            }
            _ => frame.batches.push(Batch {
                texture: texture.to_string(),
                vertices: start..end,
            }),
        }
    }
    frame
}

fn quad_vertices(rect: Rect, color: Color, world_size: [f32; 2], out: &mut Vec<SpriteVertex>) {
    let [width, height] = world_size;
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let left = (rect.x / width) * 2.0 - 1.0;
    let right = (rect.right() / width) * 2.0 - 1.0;
    let bottom = (rect.y / height) * 2.0 - 1.0;
    let top = (rect.top() / height) * 2.0 - 1.0;

    let color = color.to_array();
    let v0 = SpriteVertex::new([left, top], [0.0, 0.0], color);
    let v1 = SpriteVertex::new([right, top], [1.0, 0.0], color);
    let v2 = SpriteVertex::new([right, bottom], [1.0, 1.0], color);
    let v3 = SpriteVertex::new([left, bottom], [0.0, 1.0], color);

    out.extend_from_slice(&[v0, v2, v1, v0, v3, v2]);
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct SpriteVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

impl SpriteVertex {
    fn new(position: [f32; 2], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as u64,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 2]>()) as u64,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

const SPRITE_SHADER: &str = r#"
struct VsIn {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@group(0) @binding(0) var t_sprite: texture_2d<f32>;
@group(0) @binding(1) var s_sprite: sampler;

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var out: VsOut;
    out.position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(t_sprite, s_sprite, in.uv) * in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: [f32; 2] = [800.0, 600.0];

    fn rect(x: f32, y: f32) -> Rect {
        Rect {
            x,
            y,
            width: 10.0,
            height: 10.0,
        }
    }

    #[test]
    fn adjacent_rects_share_a_batch() {
        let commands = [
            DrawCommand::rect(rect(0.0, 0.0), Color::BLACK),
            DrawCommand::rect(rect(20.0, 0.0), Color::WHITE),
            DrawCommand::sprite("bird", rect(40.0, 0.0)),
        ];
        let frame = build_batches(&commands, WORLD);
        assert_eq!(frame.vertices.len(), 18);
        assert_eq!(
            frame.batches,
            vec![
                Batch {
                    texture: WHITE_TEXTURE.to_string(),
                    vertices: 0..12,
                },
                Batch {
                    texture: "bird".to_string(),
                    vertices: 12..18,
                },
            ]
        );
    }

    #[test]
    fn text_is_split_out() {
        let commands = [DrawCommand::text(
            "7",
            [400.0, 580.0],
            Color::BLACK,
            36.0,
            Anchor::TopCenter,
        )];
        let frame = build_batches(&commands, WORLD);
        assert!(frame.vertices.is_empty());
        assert_eq!(frame.texts.len(), 1);
    }

    #[test]
    fn world_maps_to_ndc_y_up() {
        let mut out = Vec::new();
        quad_vertices(
            Rect {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0,
            },
            Color::WHITE,
            WORLD,
            &mut out,
        );
        // First vertex is the top-left corner.
        assert_eq!(out[0].position, [-1.0, 1.0]);
        assert_eq!(out[0].uv, [0.0, 0.0]);
        assert_eq!(out[4].position, [-1.0, -1.0]);
    }
}
