//! A single point in the particle field.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::color::Rgba;
use crate::config::FieldConfig;

/// A drifting dot. Everything but the position and the velocity's sign is
/// fixed when the particle is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Palette colour; alpha is carried separately.
    pub color: Rgba,
    pub alpha: f32,
}

impl Particle {
    /// Random particle anywhere inside `bounds`.
    ///
    /// An empty palette falls back to the link colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, config: &FieldConfig) -> Self {
        let speed = config.max_axis_speed;
        Self {
            position: Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y),
            velocity: Vec2::new(rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed)),
            radius: rng.gen_range(config.min_radius..=config.max_radius),
            color: config.palette.choose(rng).copied().unwrap_or(config.link_color),
            alpha: rng.gen_range(config.min_alpha..=config.max_alpha),
        }
    }

    /// Advance one frame and bounce off the walls of `[0, bounds]`.
    ///
    /// The bounce only flips the velocity; the particle is not pushed back
    /// inside, so it can sit up to one step outside the wall for a frame.
    #[inline]
    pub fn step(&mut self, bounds: Vec2) {
        self.position += self.velocity;
        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Colour used to fill the dot.
    #[inline]
    pub fn fill_color(&self) -> Rgba {
        self.color.with_alpha(self.alpha)
    }
}
