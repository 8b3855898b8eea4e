//! Pointer-driven injection on the GPU. Mirrors the CPU
//! [`SubstanceCreator2D`](crate::injector::SubstanceCreator2D) state machine;
//! the splat itself runs as a single compute kernel per target field.

use crate::gpu_context::GpuContext;
use crate::gpu_field::{self, GpuField2D};
use crate::injector::rainbow;
use glam::Vec2;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InjectUniform {
    amount: [f32; 3],
    _padding0: f32,
    position: [f32; 2],
    radius: f32,
    _padding1: f32,
}

struct InjectTarget {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuSubstanceCreator2D {
    active: bool,
    position: Option<Vec2>,
    previous_position: Option<Vec2>,
    force: Vec2,
    clock: f32,

    pub mass: f32,
    pub radius: f32,
    pub substance_amount: f32,
    pub hue_rate: f32,

    pipeline: wgpu::ComputePipeline,
    substance_target: InjectTarget,
    velocity_target: InjectTarget,
}

impl GpuSubstanceCreator2D {
    pub fn new(ctx: &GpuContext) -> Self {
        let shader_module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("injection shader module"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/add_to_field2d.wgsl").into(),
                ),
            });

        let uniform_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("injection uniforms layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pair_layout = gpu_field::compute_pair_layout(&ctx.device);
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("injection pipeline layout"),
                bind_group_layouts: &[&pair_layout, &uniform_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("add_to_field pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader_module,
                entry_point: "add_to_field",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            });

        let target = |label: &str| {
            let buffer = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(&[InjectUniform::default()]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
            ctx.track_buffer_created();
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            InjectTarget { buffer, bind_group }
        };

        Self {
            active: false,
            position: None,
            previous_position: None,
            force: Vec2::ZERO,
            clock: 0.0,
            mass: 1.0,
            radius: 0.1,
            substance_amount: 1.0,
            hue_rate: 2.0,
            pipeline,
            substance_target: target("substance injection uniforms"),
            velocity_target: target("velocity injection uniforms"),
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_position(&mut self, world: Vec2) {
        if let Some(previous) = self.position {
            self.force = world - previous;
        }
        self.previous_position = self.position;
        self.position = Some(world);
    }

    /// Inject substance and momentum around the pointer. Idle frames advance
    /// the hue clock but submit no GPU work at all.
    pub fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    ) {
        self.clock += delta_time;
        if !self.active {
            return;
        }
        let Some(position) = self.position else {
            log::warn!("injector active without a pointer position, skipping");
            return;
        };

        let (r, g, b) = rainbow(self.clock * self.hue_rate);
        let substance_uniform = InjectUniform {
            amount: [
                r * self.substance_amount,
                g * self.substance_amount,
                b * self.substance_amount,
            ],
            _padding0: 0.0,
            position: [position.x, position.y],
            radius: self.radius,
            _padding1: 0.0,
        };
        let impulse = self.force / self.mass;
        let velocity_uniform = InjectUniform {
            amount: [impulse.x, impulse.y, 0.0],
            _padding0: 0.0,
            position: [position.x, position.y],
            radius: self.radius,
            _padding1: 0.0,
        };
        ctx.queue.write_buffer(
            &self.substance_target.buffer,
            0,
            bytemuck::cast_slice(&[substance_uniform]),
        );
        ctx.queue.write_buffer(
            &self.velocity_target.buffer,
            0,
            bytemuck::cast_slice(&[velocity_uniform]),
        );

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("injection encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("injection pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);

            pass.set_bind_group(0, substance.compute_bind_group(), &[]);
            pass.set_bind_group(1, &self.substance_target.bind_group, &[]);
            let dispatch = substance.dispatch_size();
            pass.dispatch_workgroups(dispatch.0, dispatch.1, 1);

            pass.set_bind_group(0, velocity.compute_bind_group(), &[]);
            pass.set_bind_group(1, &self.velocity_target.bind_group, &[]);
            let dispatch = velocity.dispatch_size();
            pass.dispatch_workgroups(dispatch.0, dispatch.1, 1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));

        substance.swap();
        velocity.swap();
    }

    pub fn release(&self, ctx: &GpuContext) {
        self.substance_target.buffer.destroy();
        self.velocity_target.buffer.destroy();
        ctx.track_buffer_destroyed();
        ctx.track_buffer_destroyed();
    }
}

impl Default for InjectUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}
