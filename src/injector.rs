//! Pointer-driven substance and impulse injection.
//!
//! While active, each step adds a rainbow-cycling dye splat to the substance
//! field and `force / mass` to the velocity field around the recorded pointer
//! position. While idle the step does no work at all, leaving both fields'
//! buffers untouched.

use crate::field::Field;
use glam::Vec2;
use std::f32::consts::PI;

pub struct SubstanceCreator2D {
    active: bool,
    position: Option<Vec2>,
    previous_position: Option<Vec2>,
    force: Vec2,
    clock: f32,

    pub mass: f32,
    pub radius: f32,
    pub substance_amount: f32,
    /// Hue cycling rate in radians per second of simulated time.
    pub hue_rate: f32,
}

impl SubstanceCreator2D {
    pub fn new() -> Self {
        Self {
            active: false,
            position: None,
            previous_position: None,
            force: Vec2::ZERO,
            clock: 0.0,
            mass: 1.0,
            radius: 0.1,
            substance_amount: 1.0,
            hue_rate: 2.0,
        }
    }

    /// Pointer down / up.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Record a new pointer position in world space. The offset from the
    /// previous position becomes the pending force direction.
    pub fn set_position(&mut self, world: Vec2) {
        if let Some(previous) = self.position {
            self.force = world - previous;
        }
        self.previous_position = self.position;
        self.position = Some(world);
    }

    /// Dye color for the current clock: three-phase sinusoid offset by 120°
    /// and 240°, each scaled by `substance_amount`.
    pub fn substance_color(&self) -> (f32, f32, f32) {
        let (r, g, b) = rainbow(self.clock * self.hue_rate);
        (
            self.substance_amount * r,
            self.substance_amount * g,
            self.substance_amount * b,
        )
    }

    /// Per-frame hook. A no-op while idle.
    pub fn step(&mut self, delta_time: f32, substance: &mut Field, velocity: &mut Field) {
        self.clock += delta_time;

        if !self.active {
            return;
        }
        let Some(position) = self.position else {
            // Pointer pressed before the first move event.
            log::warn!("injection skipped: no pointer position recorded yet");
            return;
        };

        let (r, g, b) = self.substance_color();
        let impulse = self.force / self.mass;

        splat(substance, position, self.radius, &[r, g, b, 0.0]);
        substance.swap();

        splat(velocity, position, self.radius, &[impulse.x, impulse.y]);
        velocity.swap();
    }
}

impl Default for SubstanceCreator2D {
    fn default() -> Self {
        Self::new()
    }
}

/// Three-phase sinusoid offset by 120° and 240°, each channel in [0, 2/3].
pub fn rainbow(t: f32) -> (f32, f32, f32) {
    let r = (t.sin() + 1.0) / 3.0;
    let g = ((t + 2.0 * PI / 3.0).sin() + 1.0) / 3.0;
    let b = ((t + 4.0 * PI / 3.0).sin() + 1.0) / 3.0;
    (r, g, b)
}

/// Additive pass: write = read + amount * falloff around `center`. Linear
/// falloff `1 - d/radius`, zero at and beyond the radius.
fn splat(field: &mut Field, center: Vec2, radius: f32, amount: &[f32]) {
    let (width, height) = field.resolution();
    let channels = field.channels();
    let start = field.start();
    let size = field.size();

    let (src, dst) = field.pair_mut();
    for j in 0..height {
        for i in 0..width {
            let world = start
                + size
                    * Vec2::new(
                        (i as f32 + 0.5) / width as f32,
                        (j as f32 + 0.5) / height as f32,
                    );
            let idx = (j * width + i) * channels;
            let distance = world.distance(center);
            let falloff = if distance < radius {
                1.0 - distance / radius
            } else {
                0.0
            };
            for (c, add) in amount.iter().enumerate().take(channels) {
                dst[idx + c] = src[idx + c] + add * falloff;
            }
        }
    }
}
