//! CPU scene: owns the field pair, camera, injector and solver, and drives
//! the per-frame sequence input -> inject -> simulate.

use crate::FluidSimulation;
use crate::camera::Camera2D;
use crate::field::Field;
use crate::injector::SubstanceCreator2D;
use crate::solver::Solver2D;
use glam::Vec2;

/// World-space width of the simulated plane; height follows the grid aspect.
pub const WORLD_WIDTH: f32 = 10.0;

pub struct FluidScene {
    camera: Camera2D,
    substance: Field,
    velocity: Field,
    injector: SubstanceCreator2D,
    solver: Solver2D,
}

impl FluidScene {
    pub fn new(resolution: (usize, usize)) -> Self {
        let aspect = resolution.0 as f32 / resolution.1 as f32;
        let size = Vec2::new(WORLD_WIDTH, WORLD_WIDTH / aspect);
        let start = -size / 2.0;

        Self {
            camera: Camera2D::new(start, size),
            substance: Field::new(start, size, resolution, 4),
            velocity: Field::new(start, size, resolution, 2),
            injector: SubstanceCreator2D::new(),
            solver: Solver2D::new(start, size, resolution),
        }
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn substance(&self) -> &Field {
        &self.substance
    }

    pub fn velocity(&self) -> &Field {
        &self.velocity
    }

    pub fn injector_mut(&mut self) -> &mut SubstanceCreator2D {
        &mut self.injector
    }

    pub fn solver_mut(&mut self) -> &mut Solver2D {
        &mut self.solver
    }

    /// Record a pointer position directly in world space.
    pub fn move_to_world(&mut self, world: Vec2) {
        self.injector.set_position(world);
    }
}

impl FluidSimulation for FluidScene {
    fn step(&mut self, delta_time: f32) {
        self.injector
            .step(delta_time, &mut self.substance, &mut self.velocity);
        self.solver
            .step(delta_time, &mut self.substance, &mut self.velocity);
    }

    fn activate(&mut self) {
        self.injector.set_active(true);
    }

    fn deactivate(&mut self) {
        self.injector.set_active(false);
    }

    fn move_to(&mut self, u: f32, v: f32) {
        let world = self.camera.screen_to_world(u, v);
        self.injector.set_position(world);
    }

    fn resolution(&self) -> (usize, usize) {
        self.substance.resolution()
    }
}
