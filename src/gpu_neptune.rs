//! Top-level GPU orchestrator. Owns the device context and the per-dimension
//! pipeline, and routes pointer events through the camera into the injector.

use crate::camera::Camera2D;
use crate::error::NeptuneError;
use crate::gpu_context::GpuContext;
use crate::gpu_field::GpuField2D;
use crate::gpu_injector::GpuSubstanceCreator2D;
use crate::gpu_mesh::Mesh2D;
use crate::gpu_renderer::{GpuCamera, Renderer2D};
use crate::gpu_solver::GpuSolver2D;
use glam::Vec2;

/// Width of the simulated domain in world units. The height follows from the
/// display aspect ratio so cells stay square on screen.
pub const WORLD_WIDTH: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Two,
    Three,
}

/// Substance layer: pointer state plus per-frame injection into the fields.
pub trait SubstanceLayer {
    fn set_active(&mut self, active: bool);
    fn set_position(&mut self, world: Vec2);
    fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    );
    fn release(&self, ctx: &GpuContext);
}

impl SubstanceLayer for GpuSubstanceCreator2D {
    fn set_active(&mut self, active: bool) {
        GpuSubstanceCreator2D::set_active(self, active);
    }

    fn set_position(&mut self, world: Vec2) {
        GpuSubstanceCreator2D::set_position(self, world);
    }

    fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    ) {
        GpuSubstanceCreator2D::step(self, ctx, delta_time, substance, velocity);
    }

    fn release(&self, ctx: &GpuContext) {
        GpuSubstanceCreator2D::release(self, ctx);
    }
}

/// Simulation layer: advances the velocity field and carries the substance.
pub trait SimulationLayer {
    fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    );
    fn release(&self, ctx: &GpuContext);
}

impl SimulationLayer for GpuSolver2D {
    fn step(
        &mut self,
        ctx: &GpuContext,
        delta_time: f32,
        substance: &mut GpuField2D,
        velocity: &mut GpuField2D,
    ) {
        GpuSolver2D::step(self, ctx, delta_time, substance, velocity);
    }

    fn release(&self, ctx: &GpuContext) {
        GpuSolver2D::release(self, ctx);
    }
}

/// Everything a live 2D simulation owns on the device.
struct Pipeline2D {
    substance: GpuField2D,
    velocity: GpuField2D,
    injector: Box<dyn SubstanceLayer>,
    solver: Box<dyn SimulationLayer>,
    mesh: Mesh2D,
    camera: GpuCamera,
    renderer: Renderer2D,
}

impl Pipeline2D {
    fn release(&self, ctx: &GpuContext) {
        self.substance.release(ctx);
        self.velocity.release(ctx);
        self.injector.release(ctx);
        self.solver.release(ctx);
        self.mesh.release(ctx);
        self.camera.release(ctx);
    }
}

enum State {
    Uninitialized,
    Ready(Box<Pipeline2D>),
}

pub struct Neptune {
    ctx: GpuContext,
    surface_format: wgpu::TextureFormat,
    display_size: (u32, u32),
    resolution: (u32, u32),
    state: State,
}

impl Neptune {
    /// Acquire a device. No pipeline exists until [`set_dimension`] is called.
    ///
    /// [`set_dimension`]: Neptune::set_dimension
    pub async fn new(
        surface_format: wgpu::TextureFormat,
        display_size: (u32, u32),
        resolution: (u32, u32),
    ) -> Result<Self, NeptuneError> {
        let ctx = GpuContext::new().await?;
        Ok(Self {
            ctx,
            surface_format,
            display_size,
            resolution,
            state: State::Uninitialized,
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Tear down any existing pipeline and build one for the requested
    /// dimension. Only 2D is available.
    pub fn set_dimension(&mut self, dimension: Dimension) -> Result<(), NeptuneError> {
        if dimension == Dimension::Three {
            return Err(NeptuneError::UnsupportedDimension(3));
        }
        self.release_pipeline();

        let aspect = self.display_size.0 as f32 / self.display_size.1 as f32;
        let size = Vec2::new(WORLD_WIDTH, WORLD_WIDTH / aspect);
        let start = -size / 2.0;

        let substance = GpuField2D::new(&self.ctx, start, size, self.resolution, "substance");
        let velocity = GpuField2D::new(&self.ctx, start, size, self.resolution, "velocity");
        let injector = Box::new(GpuSubstanceCreator2D::new(&self.ctx));
        let solver = Box::new(GpuSolver2D::new(&self.ctx, start, size, self.resolution));
        let mesh = Mesh2D::new(&self.ctx, start, size);
        let camera = GpuCamera::new(&self.ctx, Camera2D::new(start, size));
        let renderer = Renderer2D::new(&self.ctx, self.surface_format);

        log::info!(
            "2D pipeline ready: {}x{} cells over a {:.1}x{:.1} world",
            self.resolution.0,
            self.resolution.1,
            size.x,
            size.y
        );

        self.state = State::Ready(Box::new(Pipeline2D {
            substance,
            velocity,
            injector,
            solver,
            mesh,
            camera,
            renderer,
        }));
        Ok(())
    }

    pub fn mouse_down(&mut self) {
        if let State::Ready(pipeline) = &mut self.state {
            pipeline.injector.set_active(true);
        }
    }

    pub fn mouse_up(&mut self) {
        if let State::Ready(pipeline) = &mut self.state {
            pipeline.injector.set_active(false);
        }
    }

    /// Pointer moved to normalized display coordinates, (0, 0) top-left.
    pub fn mouse_moved(&mut self, u: f32, v: f32) {
        if let State::Ready(pipeline) = &mut self.state {
            let world = pipeline.camera.screen_to_world(u, v);
            pipeline.injector.set_position(world);
        }
    }

    pub fn step(&mut self, delta_time: f32) -> Result<(), NeptuneError> {
        let State::Ready(pipeline) = &mut self.state else {
            return Err(NeptuneError::NotReady);
        };
        pipeline.injector.step(
            &self.ctx,
            delta_time,
            &mut pipeline.substance,
            &mut pipeline.velocity,
        );
        pipeline.solver.step(
            &self.ctx,
            delta_time,
            &mut pipeline.substance,
            &mut pipeline.velocity,
        );
        Ok(())
    }

    pub fn render(&mut self, view: &wgpu::TextureView) -> Result<(), NeptuneError> {
        let State::Ready(pipeline) = &self.state else {
            return Err(NeptuneError::NotReady);
        };
        pipeline.renderer.render(
            &self.ctx,
            view,
            &pipeline.mesh,
            &pipeline.substance,
            &pipeline.camera,
        );
        Ok(())
    }

    /// Release all device resources and return to the uninitialized state.
    pub fn release(&mut self) {
        self.release_pipeline();
    }

    fn release_pipeline(&mut self) {
        if let State::Ready(pipeline) = std::mem::replace(&mut self.state, State::Uninitialized) {
            pipeline.release(&self.ctx);
        }
    }
}

impl Drop for Neptune {
    fn drop(&mut self) {
        self.release_pipeline();
    }
}
