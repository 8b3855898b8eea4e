//! GPU counterpart of the staged solver: five compute pipelines over one
//! shader module, encoded into a single compute pass per frame.
//!
//! While a pass is being encoded the fields stay immutably borrowed, so the
//! rotating read/write roles are tracked through small cursors and committed
//! back to the fields once the pass has been submitted.

use crate::gpu_context::GpuContext;
use crate::gpu_field::{self, GpuField2D};
use crate::params::{SimUniform, SolverParams};
use bytemuck::Zeroable;
use glam::Vec2;
use wgpu::util::DeviceExt;

pub struct GpuSolver2D {
    pub viscosity: f32,
    pub diffuse_iterations: usize,
    pub pressure_iterations: usize,

    cell_size: f32,
    pressure: GpuField2D,
    divergence: GpuField2D,

    params_buffer: wgpu::Buffer,
    params_bind_group: wgpu::BindGroup,

    advect_pipeline: wgpu::ComputePipeline,
    diffuse_pipeline: wgpu::ComputePipeline,
    divergence_pipeline: wgpu::ComputePipeline,
    pressure_pipeline: wgpu::ComputePipeline,
    gradient_pipeline: wgpu::ComputePipeline,
}

impl GpuSolver2D {
    pub fn new(ctx: &GpuContext, start: Vec2, size: Vec2, resolution: (u32, u32)) -> Self {
        let pressure = GpuField2D::new(ctx, start, size, resolution, "pressure");
        let divergence = GpuField2D::new(ctx, start, size, resolution, "divergence");

        let shader_module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("simulation shader module"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/simulation2d.wgsl").into(),
                ),
            });

        let params_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("solver params"),
                contents: bytemuck::cast_slice(&[SimUniform::zeroed()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        ctx.track_buffer_created();

        let uniform_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solver uniforms layout"),
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

        let params_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("solver uniforms bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        let pair_layout = gpu_field::compute_pair_layout(&ctx.device);
        let read_only = gpu_field::read_only_layout(&ctx.device);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("solver pipeline layout"),
                bind_group_layouts: &[&uniform_layout, &pair_layout, &read_only],
                push_constant_ranges: &[],
            });

        let pipeline = |label: &str, entry_point: &str| {
            ctx.device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),
                    module: &shader_module,
                    entry_point,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                })
        };

        Self {
            viscosity: 0.001,
            diffuse_iterations: crate::solver::DEFAULT_DIFFUSE_ITERATIONS,
            pressure_iterations: crate::solver::DEFAULT_PRESSURE_ITERATIONS,
            cell_size: size.x / resolution.0 as f32,
            pressure,
            divergence,
            params_buffer,
            params_bind_group,
            advect_pipeline: pipeline("advect pipeline", "advect"),
            diffuse_pipeline: pipeline("diffuse pipeline", "diffuse"),
            divergence_pipeline: pipeline("divergence pipeline", "divergence"),
            pressure_pipeline: pipeline("compute_pressure pipeline", "compute_pressure"),
            gradient_pipeline: pipeline(
                "subtract_pressure_gradient pipeline",
                "subtract_pressure_gradient",
            ),
        }
    }

    /// Encode and submit the five solver stages plus substance advection as
    /// one command batch. Submission is fire-and-forget; the next frame's
    /// commands simply queue up behind this one.
    pub fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    ) {
        let params = SolverParams::new(delta_time, self.cell_size, self.viscosity);
        ctx.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[params.uniform()]),
        );

        let mut velocity_front = velocity.front_index();
        let mut substance_front = substance.front_index();
        let mut pressure_front = self.pressure.front_index();
        let mut divergence_front = self.divergence.front_index();

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("solver encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("solver pass"),
                timestamp_writes: None,
            });
            pass.set_bind_group(0, &self.params_bind_group, &[]);

            let dispatch = velocity.dispatch_size();
            macro_rules! run {
                ($pipeline:expr, $pair:expr, $aux:expr) => {{
                    pass.set_bind_group(1, $pair, &[]);
                    pass.set_bind_group(2, $aux, &[]);
                    pass.set_pipeline($pipeline);
                    pass.dispatch_workgroups(dispatch.0, dispatch.1, 1);
                }};
            }

            // 1. Self-advect velocity.
            run!(
                &self.advect_pipeline,
                velocity.compute_group_at(velocity_front),
                velocity.read_only_group_at(velocity_front)
            );
            velocity_front ^= 1;

            // 2. Viscous diffusion.
            for _ in 0..self.diffuse_iterations {
                run!(
                    &self.diffuse_pipeline,
                    velocity.compute_group_at(velocity_front),
                    velocity.read_only_group_at(velocity_front)
                );
                velocity_front ^= 1;
            }

            // 3. Divergence of the diffused velocity.
            run!(
                &self.divergence_pipeline,
                self.divergence.compute_group_at(divergence_front),
                velocity.read_only_group_at(velocity_front)
            );
            divergence_front ^= 1;

            // 4. Pressure Poisson solve, warm-started from last frame.
            for _ in 0..self.pressure_iterations {
                run!(
                    &self.pressure_pipeline,
                    self.pressure.compute_group_at(pressure_front),
                    self.divergence.read_only_group_at(divergence_front)
                );
                pressure_front ^= 1;
            }

            // 5. Divergence-free projection.
            run!(
                &self.gradient_pipeline,
                velocity.compute_group_at(velocity_front),
                self.pressure.read_only_group_at(pressure_front)
            );
            velocity_front ^= 1;

            // 6. Carry the substance through the projected velocity.
            run!(
                &self.advect_pipeline,
                substance.compute_group_at(substance_front),
                velocity.read_only_group_at(velocity_front)
            );
            substance_front ^= 1;
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));

        velocity.set_front(velocity_front);
        substance.set_front(substance_front);
        self.pressure.set_front(pressure_front);
        self.divergence.set_front(divergence_front);
    }

    pub fn release(&self, ctx: &GpuContext) {
        self.pressure.release(ctx);
        self.divergence.release(ctx);
        self.params_buffer.destroy();
        ctx.track_buffer_destroyed();
    }
}
