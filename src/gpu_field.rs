//! Double-buffered GPU field: two storage buffers plus pre-built bind groups
//! for every role a buffer can play in a dispatch. `swap` flips a front index
//! and therefore which pre-built group is handed out; cell data never moves.
//!
//! Each buffer starts with a 32-byte metadata header (resolution, world-space
//! start and size) followed by one `vec4<f32>` per cell, matching the layout
//! the shaders declare.

use crate::gpu_context::GpuContext;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Compute dispatches tile the grid in 16x16 workgroups.
pub const WORKGROUP_SIZE: u32 = 16;

const BYTES_PER_CELL: u64 = 16;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct FieldMeta {
    resolution: [u32; 2],
    start: [f32; 2],
    size: [f32; 2],
    _padding: [f32; 2],
}

pub struct GpuField2D {
    resolution: (u32, u32),
    front: usize,
    buffers: [wgpu::Buffer; 2],
    // Index i reads buffers[i]; the pair group also writes buffers[i ^ 1].
    compute_groups: [wgpu::BindGroup; 2],
    read_only_groups: [wgpu::BindGroup; 2],
    render_groups: [wgpu::BindGroup; 2],
}

impl GpuField2D {
    pub fn new(
        ctx: &GpuContext,
        start: Vec2,
        size: Vec2,
        resolution: (u32, u32),
        label: &str,
    ) -> Self {
        let meta = FieldMeta {
            resolution: [resolution.0, resolution.1],
            start: [start.x, start.y],
            size: [size.x, size.y],
            _padding: [0.0; 2],
        };
        let data_size = resolution.0 as u64 * resolution.1 as u64 * BYTES_PER_CELL;
        let buffer_size = std::mem::size_of::<FieldMeta>() as u64 + data_size;

        let buffers = [0, 1].map(|i| {
            let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} field {i}")),
                size: buffer_size,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            });
            ctx.queue
                .write_buffer(&buffer, 0, bytemuck::cast_slice(&[meta]));
            ctx.track_buffer_created();
            buffer
        });

        let pair_layout = compute_pair_layout(&ctx.device);
        let read_only = read_only_layout(&ctx.device);
        let render = render_layout(&ctx.device);

        let compute_groups = [0usize, 1].map(|i| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label} compute bind group {i}")),
                layout: &pair_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers[i].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers[i ^ 1].as_entire_binding(),
                    },
                ],
            })
        });

        let read_only_groups = [0usize, 1].map(|i| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label} read-only bind group {i}")),
                layout: &read_only,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers[i].as_entire_binding(),
                }],
            })
        });

        let render_groups = [0usize, 1].map(|i| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label} render bind group {i}")),
                layout: &render,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers[i].as_entire_binding(),
                }],
            })
        });

        Self {
            resolution,
            front: 0,
            buffers,
            compute_groups,
            read_only_groups,
            render_groups,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// Workgroup counts covering the grid at 16x16 tiles.
    pub fn dispatch_size(&self) -> (u32, u32) {
        (
            self.resolution.0.div_ceil(WORKGROUP_SIZE),
            self.resolution.1.div_ceil(WORKGROUP_SIZE),
        )
    }

    /// Read buffer at binding 0, write buffer at binding 1.
    pub fn compute_bind_group(&self) -> &wgpu::BindGroup {
        &self.compute_groups[self.front]
    }

    /// Read buffer only, for stages that consume this field without writing.
    pub fn compute_bind_group_read_only(&self) -> &wgpu::BindGroup {
        &self.read_only_groups[self.front]
    }

    /// Read buffer for fragment-stage sampling.
    pub fn render_bind_group(&self) -> &wgpu::BindGroup {
        &self.render_groups[self.front]
    }

    pub fn front_buffer(&self) -> &wgpu::Buffer {
        &self.buffers[self.front]
    }

    pub fn front_index(&self) -> usize {
        self.front
    }

    /// Bind groups addressed by an explicit front index, for encoding a
    /// multi-stage pass where the logical front rotates between dispatches
    /// while the field itself stays borrowed by the pass.
    pub fn compute_group_at(&self, front: usize) -> &wgpu::BindGroup {
        &self.compute_groups[front]
    }

    pub fn read_only_group_at(&self, front: usize) -> &wgpu::BindGroup {
        &self.read_only_groups[front]
    }

    /// Commit a front index advanced externally during encoding.
    pub fn set_front(&mut self, front: usize) {
        self.front = front & 1;
    }

    /// Rotate read/write roles after a stage's commands are enqueued.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    pub fn release(&self, ctx: &GpuContext) {
        for buffer in &self.buffers {
            buffer.destroy();
            ctx.track_buffer_destroyed();
        }
    }
}

/// Layout of a field bound for one compute stage: binding 0 the read buffer,
/// binding 1 the write target.
pub fn compute_pair_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("field compute pair layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

/// Layout of a secondary field consumed read-only by a compute stage.
pub fn read_only_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("field read-only layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Layout of the field buffer sampled by the render fragment stage.
pub fn render_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("field render layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
