//! Per-frame diagnostics over the simulation fields.

use crate::field::Field;
use crate::scene::FluidScene;

#[derive(Debug, Clone)]
pub struct FieldMetrics {
    pub frame: usize,
    pub total_mass: f32,
    pub max_substance: f32,
    pub max_velocity: f32,
    pub max_divergence: f32,
}

impl FieldMetrics {
    pub fn analyze(scene: &FluidScene, frame: usize) -> Self {
        let substance = scene.substance();
        let velocity = scene.velocity();
        let (width, height) = substance.resolution();

        let mut total_mass: f32 = 0.0;
        let mut max_substance: f32 = 0.0;
        let mut max_velocity: f32 = 0.0;

        let s = substance.read();
        let v = velocity.read();
        for j in 0..height {
            for i in 0..width {
                let si = (j * width + i) * 4;
                let cell_mass = s[si] + s[si + 1] + s[si + 2];
                total_mass += cell_mass;
                max_substance = max_substance.max(cell_mass);

                let vi = (j * width + i) * 2;
                let speed = (v[vi] * v[vi] + v[vi + 1] * v[vi + 1]).sqrt();
                max_velocity = max_velocity.max(speed);
            }
        }

        Self {
            frame,
            total_mass,
            max_substance,
            max_velocity,
            max_divergence: max_interior_divergence(velocity),
        }
    }

    pub fn print_summary(&self) {
        println!("Frame {} metrics:", self.frame);
        println!("  Total substance mass: {:.6}", self.total_mass);
        println!("  Max substance: {:.6}", self.max_substance);
        println!("  Max velocity: {:.6}", self.max_velocity);
        println!("  Max interior divergence: {:.6}", self.max_divergence);
        println!();
    }
}

/// Largest central-difference divergence magnitude over interior cells of a
/// velocity field, the quantity the pressure projection drives toward zero.
pub fn max_interior_divergence(velocity: &Field) -> f32 {
    let (width, height) = velocity.resolution();
    let cell_size = velocity.cell_size();
    let v = velocity.read();

    let mut max_divergence: f32 = 0.0;
    for j in 1..height - 1 {
        for i in 1..width - 1 {
            let dx = v[(j * width + i + 1) * 2] - v[(j * width + i - 1) * 2];
            let dy = v[((j + 1) * width + i) * 2 + 1] - v[((j - 1) * width + i) * 2 + 1];
            let divergence = (dx + dy) / (2.0 * cell_size);
            max_divergence = max_divergence.max(divergence.abs());
        }
    }
    max_divergence
}
