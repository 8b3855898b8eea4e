//! Render layer: a camera uniform and the pipeline that draws the substance
//! field onto the domain quad.

use crate::camera::Camera2D;
use crate::gpu_context::GpuContext;
use crate::gpu_field::{self, GpuField2D};
use crate::gpu_mesh::{self, Mesh2D};
use glam::Vec2;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

pub struct GpuCamera {
    camera: Camera2D,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuCamera {
    pub fn new(ctx: &GpuContext, camera: Camera2D) -> Self {
        let uniform = CameraUniform {
            projection: camera.projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
        };
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("camera uniforms"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        ctx.track_buffer_created();

        let layout = camera_layout(&ctx.device);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            camera,
            buffer,
            bind_group,
        }
    }

    pub fn screen_to_world(&self, u: f32, v: f32) -> Vec2 {
        self.camera.screen_to_world(u, v)
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn release(&self, ctx: &GpuContext) {
        self.buffer.destroy();
        ctx.track_buffer_destroyed();
    }
}

pub fn camera_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera uniform layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

pub struct Renderer2D {
    pipeline: wgpu::RenderPipeline,
}

impl Renderer2D {
    pub fn new(ctx: &GpuContext, surface_format: wgpu::TextureFormat) -> Self {
        let shader_module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("render shader module"),
                source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/render2d.wgsl").into()),
            });

        let model_layout = gpu_mesh::model_layout(&ctx.device);
        let camera_layout = camera_layout(&ctx.device);
        let field_layout = gpu_field::render_layout(&ctx.device);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("render pipeline layout"),
                bind_group_layouts: &[&model_layout, &camera_layout, &field_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("substance render pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: "vertex_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: "fragment_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        Self { pipeline }
    }

    pub fn render(
        &self,
        ctx: &GpuContext,
        view: &wgpu::TextureView,
        mesh: &Mesh2D,
        substance: &GpuField2D,
        camera: &GpuCamera,
    ) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("substance render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, mesh.model_bind_group(), &[]);
            pass.set_bind_group(1, camera.bind_group(), &[]);
            pass.set_bind_group(2, substance.render_bind_group(), &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
            pass.draw(0..mesh.vertex_count(), 0..1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}
