//! Staged incompressible-flow solver.
//!
//! One `step` runs, in strict order: semi-Lagrangian advection of velocity,
//! Jacobi diffusion, divergence, Jacobi pressure solve, pressure-gradient
//! subtraction, then advection of the substance field through the projected
//! velocity. Every stage reads the front buffer of its field, writes the back
//! buffer, and swaps, so the next stage always sees the previous stage's
//! output without extra bookkeeping.
//!
//! Iteration counts are fixed rather than convergence-checked: bounded
//! per-frame cost matters more here than the last digits of accuracy.

use crate::field::{Field, sample_bilinear};
use crate::params::SolverParams;
use glam::Vec2;
use rayon::prelude::*;

pub const DEFAULT_DIFFUSE_ITERATIONS: usize = 50;
pub const DEFAULT_PRESSURE_ITERATIONS: usize = 50;

pub struct Solver2D {
    pub viscosity: f32,
    pub diffuse_iterations: usize,
    pub pressure_iterations: usize,

    // Scalar work fields owned by the solver. Pressure is warm-started from
    // the previous frame's solution.
    pressure: Field,
    divergence: Field,
}

impl Solver2D {
    pub fn new(start: Vec2, size: Vec2, resolution: (usize, usize)) -> Self {
        Self {
            viscosity: 0.001,
            diffuse_iterations: DEFAULT_DIFFUSE_ITERATIONS,
            pressure_iterations: DEFAULT_PRESSURE_ITERATIONS,
            pressure: Field::new(start, size, resolution, 1),
            divergence: Field::new(start, size, resolution, 1),
        }
    }

    pub fn pressure_field(&self) -> &Field {
        &self.pressure
    }

    pub fn divergence_field(&self) -> &Field {
        &self.divergence
    }

    /// Advance the simulation by `delta_time` seconds.
    pub fn step(&mut self, delta_time: f32, substance: &mut Field, velocity: &mut Field) {
        assert_eq!(
            velocity.resolution(),
            self.pressure.resolution(),
            "velocity field resolution does not match solver work fields"
        );
        assert_eq!(
            substance.resolution(),
            velocity.resolution(),
            "substance field resolution does not match velocity field"
        );

        let params = SolverParams::new(delta_time, velocity.cell_size(), self.viscosity);

        // 1. Self-advect velocity.
        advect_self(velocity, delta_time);
        velocity.swap();

        // 2. Implicit viscous diffusion, Jacobi relaxation.
        for _ in 0..self.diffuse_iterations {
            jacobi(velocity, params.diffuse_alpha(), params.diffuse_beta());
            velocity.swap();
        }

        // 3. Divergence of the diffused velocity.
        divergence_of(&mut self.divergence, velocity, params.cell_size);
        self.divergence.swap();

        // 4. Poisson pressure solve, Jacobi relaxation.
        for _ in 0..self.pressure_iterations {
            pressure_iteration(
                &mut self.pressure,
                &self.divergence,
                params.pressure_alpha(),
                params.pressure_beta(),
            );
            self.pressure.swap();
        }

        // 5. Make velocity (approximately) divergence-free.
        subtract_pressure_gradient(velocity, &self.pressure, params.cell_size);
        velocity.swap();

        // 6. Carry the substance through the projected velocity.
        advect_by(substance, velocity, delta_time);
        substance.swap();
    }
}

/// Semi-Lagrangian advection of a field through its own front buffer.
fn advect_self(velocity: &mut Field, delta_time: f32) {
    let (width, height) = velocity.resolution();
    let start = velocity.start();
    let size = velocity.size();
    let (src, dst) = velocity.pair_mut();
    advect_rows(src, dst, src, width, height, 2, start, size, delta_time);
}

/// Semi-Lagrangian advection of `field` through a separate velocity field.
fn advect_by(field: &mut Field, velocity: &Field, delta_time: f32) {
    let (width, height) = field.resolution();
    let channels = field.channels();
    let start = field.start();
    let size = field.size();
    let vel = velocity.read();
    let (src, dst) = field.pair_mut();
    advect_rows(src, dst, vel, width, height, channels, start, size, delta_time);
}

#[allow(clippy::too_many_arguments)]
fn advect_rows(
    src: &[f32],
    dst: &mut [f32],
    vel: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    start: Vec2,
    size: Vec2,
    delta_time: f32,
) {
    let resolution = Vec2::new(width as f32, height as f32);
    dst.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(j, row)| {
            for (i, cell) in row.chunks_mut(channels).enumerate() {
                let vidx = (j * width + i) * 2;
                let v = Vec2::new(vel[vidx], vel[vidx + 1]);

                // Trace backward along the velocity and sample there.
                let world = start
                    + size
                        * Vec2::new(
                            (i as f32 + 0.5) / resolution.x,
                            (j as f32 + 0.5) / resolution.y,
                        );
                let traced = world - v * delta_time;
                let grid = (traced - start) / size * resolution - Vec2::splat(0.5);

                sample_bilinear(src, width, height, channels, grid.x, grid.y, cell);
            }
        });
}

/// One Jacobi iteration of `(alpha + 4) x_new = alpha x + sum(neighbors)`.
/// Neighbor reads are clamped at the walls.
fn jacobi(field: &mut Field, alpha: f32, beta: f32) {
    let (width, height) = field.resolution();
    let channels = field.channels();
    let (src, dst) = field.pair_mut();

    dst.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(j, row)| {
            let jd = j.saturating_sub(1);
            let ju = (j + 1).min(height - 1);
            for (i, cell) in row.chunks_mut(channels).enumerate() {
                let il = i.saturating_sub(1);
                let ir = (i + 1).min(width - 1);

                let center = (j * width + i) * channels;
                let left = (j * width + il) * channels;
                let right = (j * width + ir) * channels;
                let down = (jd * width + i) * channels;
                let up = (ju * width + i) * channels;

                for (c, out) in cell.iter_mut().enumerate() {
                    let neighbors =
                        src[left + c] + src[right + c] + src[down + c] + src[up + c];
                    *out = (alpha * src[center + c] + neighbors) / beta;
                }
            }
        });
}

/// Central-difference divergence of the velocity front buffer, written into
/// the scalar divergence field's back buffer.
fn divergence_of(divergence: &mut Field, velocity: &Field, cell_size: f32) {
    let (width, height) = velocity.resolution();
    let vel = velocity.read();
    let (_, dst) = divergence.pair_mut();

    dst.par_chunks_mut(width).enumerate().for_each(|(j, row)| {
        let jd = j.saturating_sub(1);
        let ju = (j + 1).min(height - 1);
        for (i, out) in row.iter_mut().enumerate() {
            let il = i.saturating_sub(1);
            let ir = (i + 1).min(width - 1);

            let dx = vel[(j * width + ir) * 2] - vel[(j * width + il) * 2];
            let dy = vel[(ju * width + i) * 2 + 1] - vel[(jd * width + i) * 2 + 1];
            *out = (dx + dy) / (2.0 * cell_size);
        }
    });
}

/// One Jacobi iteration of the pressure Poisson equation:
/// `p = (divergence * alpha + sum(neighbor pressures)) / beta`.
fn pressure_iteration(pressure: &mut Field, divergence: &Field, alpha: f32, beta: f32) {
    let (width, height) = pressure.resolution();
    let div = divergence.read();
    let (src, dst) = pressure.pair_mut();

    dst.par_chunks_mut(width).enumerate().for_each(|(j, row)| {
        let jd = j.saturating_sub(1);
        let ju = (j + 1).min(height - 1);
        for (i, out) in row.iter_mut().enumerate() {
            let il = i.saturating_sub(1);
            let ir = (i + 1).min(width - 1);

            let neighbors = src[j * width + il]
                + src[j * width + ir]
                + src[jd * width + i]
                + src[ju * width + i];
            *out = (div[j * width + i] * alpha + neighbors) / beta;
        }
    });
}

/// Subtract the central-difference pressure gradient from velocity, the
/// divergence-free projection.
fn subtract_pressure_gradient(velocity: &mut Field, pressure: &Field, cell_size: f32) {
    let (width, height) = velocity.resolution();
    let p = pressure.read();
    let (src, dst) = velocity.pair_mut();

    dst.par_chunks_mut(width * 2).enumerate().for_each(|(j, row)| {
        let jd = j.saturating_sub(1);
        let ju = (j + 1).min(height - 1);
        for (i, cell) in row.chunks_mut(2).enumerate() {
            let il = i.saturating_sub(1);
            let ir = (i + 1).min(width - 1);

            let grad_x = (p[j * width + ir] - p[j * width + il]) / (2.0 * cell_size);
            let grad_y = (p[ju * width + i] - p[jd * width + i]) / (2.0 * cell_size);

            let idx = (j * width + i) * 2;
            cell[0] = src[idx] - grad_x;
            cell[1] = src[idx + 1] - grad_y;
        }
    });
}
