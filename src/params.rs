//! Per-step solver parameters.
//!
//! The diffusion and pressure Jacobi coefficients are recomputed every frame
//! from the frame's delta time and the fixed viscosity / cell size, then fed
//! to both the CPU stencils and the GPU uniform block.

use bytemuck::{Pod, Zeroable};

/// Inputs for one solver step.
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub delta_time: f32,
    pub cell_size: f32,
    pub viscosity: f32,
}

impl SolverParams {
    pub fn new(delta_time: f32, cell_size: f32, viscosity: f32) -> Self {
        Self {
            delta_time,
            cell_size,
            viscosity,
        }
    }

    /// Implicit-diffusion Jacobi coefficient: `cellSize² / (viscosity · Δt)`.
    pub fn diffuse_alpha(&self) -> f32 {
        (self.cell_size * self.cell_size) / (self.viscosity * self.delta_time)
    }

    pub fn diffuse_beta(&self) -> f32 {
        self.diffuse_alpha() + 4.0
    }

    /// Poisson pressure coefficient: `-cellSize²`.
    pub fn pressure_alpha(&self) -> f32 {
        -self.cell_size * self.cell_size
    }

    pub fn pressure_beta(&self) -> f32 {
        4.0
    }

    /// Packed uniform block matching the simulation shader's layout.
    pub fn uniform(&self) -> SimUniform {
        SimUniform {
            delta_time: self.delta_time,
            cell_size: self.cell_size,
            diffuse_alpha: self.diffuse_alpha(),
            diffuse_beta: self.diffuse_beta(),
            pressure_alpha: self.pressure_alpha(),
            pressure_beta: self.pressure_beta(),
            _padding: [0.0; 2],
        }
    }
}

/// Byte layout of the solver uniform buffer: deltaTime, cellSize, then the
/// diffusion and pressure alpha/beta pairs, padded to 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SimUniform {
    pub delta_time: f32,
    pub cell_size: f32,
    pub diffuse_alpha: f32,
    pub diffuse_beta: f32,
    pub pressure_alpha: f32,
    pub pressure_beta: f32,
    pub _padding: [f32; 2],
}
