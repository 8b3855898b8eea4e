//! Double-buffered simulation field.
//!
//! Every stage of the solver reads from one buffer and writes into the other,
//! then calls `swap` to rotate the roles. The swap only flips a front index,
//! it never copies cell data. `pair_mut` hands out the read buffer immutably
//! and the write buffer mutably, so a stage cannot alias the two by accident.

use crate::error::NeptuneError;
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    channels: usize,
    start: Vec2,
    size: Vec2,
    front: usize,
    buffers: [Vec<f32>; 2],
}

impl Field {
    /// Allocate a field covering the world rectangle `start .. start + size`
    /// with `channels` floats per cell (1 scalar, 2 velocity, 4 substance).
    pub fn new(start: Vec2, size: Vec2, resolution: (usize, usize), channels: usize) -> Self {
        let (width, height) = resolution;
        let len = width * height * channels;
        Self {
            width,
            height,
            channels,
            start,
            size,
            front: 0,
            buffers: [vec![0.0; len], vec![0.0; len]],
        }
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn cell_size(&self) -> f32 {
        self.size.x / self.width as f32
    }

    /// Index of the front (current read) buffer; exposed for swap tests.
    pub fn front_index(&self) -> usize {
        self.front
    }

    /// Current read buffer.
    pub fn read(&self) -> &[f32] {
        &self.buffers[self.front]
    }

    /// Read buffer plus mutable write buffer for one compute stage.
    pub fn pair_mut(&mut self) -> (&[f32], &mut [f32]) {
        let (a, b) = self.buffers.split_at_mut(1);
        if self.front == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Rotate read/write roles. Call exactly once after each stage that wrote.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    /// Overwrite the read buffer directly. Initialization only; stages go
    /// through `pair_mut` + `swap`.
    pub fn fill_read<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut [f32]),
    {
        let (width, channels) = (self.width, self.channels);
        for (j, row) in self.buffers[self.front]
            .chunks_mut(width * channels)
            .enumerate()
        {
            for (i, cell) in row.chunks_mut(channels).enumerate() {
                f(i, j, cell);
            }
        }
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        (j * self.width + i) * self.channels
    }

    /// World position of cell center `(i, j)`: `start + size * ((i,j) + 0.5) / res`.
    pub fn world_position(&self, i: usize, j: usize) -> Vec2 {
        self.start
            + self.size
                * Vec2::new(
                    (i as f32 + 0.5) / self.width as f32,
                    (j as f32 + 0.5) / self.height as f32,
                )
    }

    /// Continuous grid coordinate of a world position (cell centers at integers).
    pub fn grid_position(&self, world: Vec2) -> Vec2 {
        (world - self.start) / self.size * Vec2::new(self.width as f32, self.height as f32)
            - Vec2::splat(0.5)
    }

    /// Dynamic resize is a permanent limitation of this design; the caller
    /// must tear the pipeline down and rebuild at the new resolution.
    pub fn resize(&mut self, _resolution: (usize, usize)) -> Result<(), NeptuneError> {
        Err(NeptuneError::ResizeUnsupported)
    }
}

/// Bilinearly sample `data` (laid out `channels` floats per cell, row-major)
/// at continuous grid coordinate `(gx, gy)`, clamped to the grid interior.
pub fn sample_bilinear(
    data: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    gx: f32,
    gy: f32,
    out: &mut [f32],
) {
    let gx = gx.clamp(0.0, (width - 1) as f32);
    let gy = gy.clamp(0.0, (height - 1) as f32);

    let x0 = gx.floor() as usize;
    let y0 = gy.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let tx = gx - x0 as f32;
    let ty = gy - y0 as f32;

    let i00 = (y0 * width + x0) * channels;
    let i10 = (y0 * width + x1) * channels;
    let i01 = (y1 * width + x0) * channels;
    let i11 = (y1 * width + x1) * channels;

    for c in 0..channels {
        let bottom = data[i00 + c] * (1.0 - tx) + data[i10 + c] * tx;
        let top = data[i01 + c] * (1.0 - tx) + data[i11 + c] * tx;
        out[c] = bottom * (1.0 - ty) + top * ty;
    }
}
