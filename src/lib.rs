//! Interactive incompressible fluid simulation.
//!
//! The solver advances a grid-based fluid through a staged pipeline
//! (advection, diffusion, divergence, pressure solve, gradient subtraction)
//! over double-buffered fields; a pointer-driven injector adds dye and
//! momentum. The default `cpu` feature carries the reference implementation
//! used by the app, tests and benches; the `gpu` feature runs the same staged
//! pipeline as wgpu compute dispatches.

pub mod analysis;
pub mod app;
pub mod camera;
pub mod error;
pub mod export;
pub mod field;
pub mod injector;
pub mod params;
pub mod scene;
pub mod solver;

#[cfg(feature = "gpu")]
pub mod gpu_context;

#[cfg(feature = "gpu")]
pub mod gpu_field;

#[cfg(feature = "gpu")]
pub mod gpu_injector;

#[cfg(feature = "gpu")]
pub mod gpu_mesh;

#[cfg(feature = "gpu")]
pub mod gpu_neptune;

#[cfg(feature = "gpu")]
pub mod gpu_renderer;

#[cfg(feature = "gpu")]
pub mod gpu_solver;

/// Unified driving interface for a fluid simulation backend.
pub trait FluidSimulation {
    fn step(&mut self, delta_time: f32);
    fn activate(&mut self);
    fn deactivate(&mut self);
    /// Pointer position in normalized screen coordinates, `(0,0)` top-left.
    fn move_to(&mut self, u: f32, v: f32);
    fn resolution(&self) -> (usize, usize);
}

pub use analysis::FieldMetrics;
pub use app::InteractiveApp;
pub use camera::Camera2D;
pub use error::NeptuneError;
pub use export::ImageExporter;
pub use field::Field;
pub use injector::SubstanceCreator2D;
pub use params::SolverParams;
pub use scene::FluidScene;
pub use solver::Solver2D;

#[cfg(feature = "gpu")]
pub use gpu_neptune::{Dimension, Neptune};
