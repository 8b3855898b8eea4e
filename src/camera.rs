//! Fixed 2D camera: screen-to-world mapping plus the view/projection pair
//! consumed by the render vertex stage.

use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Camera2D {
    start: Vec2,
    extent: Vec2,
}

impl Camera2D {
    /// `start` is the world-space lower-left corner of the viewport, `extent`
    /// its diagonal.
    pub fn new(start: Vec2, extent: Vec2) -> Self {
        Self { start, extent }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Map a normalized screen coordinate (`(0,0)` top-left, `(1,1)` bottom
    /// right) to world space. Screen Y grows downward, world Y upward.
    pub fn screen_to_world(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(
            u * self.extent.x + self.start.x,
            (1.0 - v) * self.extent.y + self.start.y,
        )
    }

    /// View matrix: translate the viewport center to the origin.
    pub fn view_matrix(&self) -> Mat4 {
        let center = self.start + self.extent / 2.0;
        Mat4::from_translation(Vec3::new(-center.x, -center.y, 0.0))
    }

    /// Orthographic projection sized to the viewport, aspect-corrected on Y.
    pub fn projection_matrix(&self) -> Mat4 {
        let size = self.extent.x / 2.0;
        let aspect = self.extent.x / self.extent.y;
        Mat4::from_cols_array(&[
            1.0 / size,
            0.0,
            0.0,
            0.0,
            //
            0.0,
            aspect / size,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            -0.5,
            0.0,
            //
            0.0,
            0.0,
            0.5,
            1.0,
        ])
    }
}
