//! GPU device acquisition and ownership.
//!
//! Acquiring the adapter and device is the only asynchronous operation in the
//! system; everything that follows is synchronous command encoding. The
//! context also counts live field buffers so teardown can be verified.

use crate::error::NeptuneError;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    live_buffers: AtomicUsize,
}

impl GpuContext {
    pub async fn new() -> Result<Self, NeptuneError> {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(NeptuneError::NoAdapter)?;

        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("neptune device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                },
                None,
            )
            .await?;

        Ok(Self {
            device,
            queue,
            live_buffers: AtomicUsize::new(0),
        })
    }

    pub fn track_buffer_created(&self) {
        self.live_buffers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn track_buffer_destroyed(&self) {
        self.live_buffers.fetch_sub(1, Ordering::Relaxed);
    }

    /// Number of tracked field/uniform buffers currently alive.
    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.load(Ordering::Relaxed)
    }
}
