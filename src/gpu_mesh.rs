//! Unit quad covering the simulation domain, plus its model transform.

use crate::gpu_context::GpuContext;
use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

// Two triangles over [-0.5, 0.5]^2, scaled to the domain by the model matrix.
const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

pub struct Mesh2D {
    vertex_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    vertex_count: u32,
}

impl Mesh2D {
    pub fn new(ctx: &GpuContext, start: Vec2, size: Vec2) -> Self {
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertices"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        ctx.track_buffer_created();

        let center = start + size / 2.0;
        let model = Mat4::from_translation(center.extend(0.0))
            * Mat4::from_scale(Vec3::new(size.x, size.y, 1.0));

        let model_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad model matrix"),
                contents: bytemuck::cast_slice(&model.to_cols_array_2d()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        ctx.track_buffer_created();

        let layout = model_layout(&ctx.device);
        let model_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad model bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            model_buffer,
            model_bind_group,
            vertex_count: QUAD_VERTICES.len() as u32,
        }
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn model_bind_group(&self) -> &wgpu::BindGroup {
        &self.model_bind_group
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn release(&self, ctx: &GpuContext) {
        self.vertex_buffer.destroy();
        self.model_buffer.destroy();
        ctx.track_buffer_destroyed();
        ctx.track_buffer_destroyed();
    }
}

pub fn model_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("model uniform layout"),
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
