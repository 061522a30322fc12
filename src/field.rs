//! The particle background.
//!
//! [`ParticleField`] is the simulation: a fixed number of dots drifting at
//! constant speed, bouncing off the canvas edges, with a faint line between
//! every pair closer than `max_link_distance`. [`ParticleLayer`] binds a
//! field to a [`RenderSurface`] and rebuilds it after the window has stopped
//! resizing.
//!
//! Connection checks are all-pairs. With the configured counts (80 wide,
//! 40 narrow) that is at most 3160 distance tests per frame, so no spatial
//! index is used.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use web_time::Instant;

use crate::canvas::{Canvas2d, RenderSurface};
use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::scheduler::{Animated, Debouncer, FrameContext};

/// A line between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// The simulated set of particles for one canvas size.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    config: FieldConfig,
    rng: SmallRng,
}

impl ParticleField {
    /// An empty field; call [`rebuild`](Self::rebuild) to populate it.
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// An empty field with a deterministic random sequence.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, rng: SmallRng) -> Self {
        Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            config,
            rng,
        }
    }

    /// Replace every particle with a fresh random set sized for the viewport.
    pub fn rebuild(&mut self, bounds: Vec2, viewport_width: f32) {
        let count = self.config.count_for_width(viewport_width);
        self.bounds = bounds;
        self.particles = (0..count)
            .map(|_| Particle::random(&mut self.rng, bounds, &self.config))
            .collect();
        log::debug!(
            "particle field rebuilt: {} particles in {}x{}",
            count,
            bounds.x,
            bounds.y
        );
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access, mainly for placing particles in tests and demos.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Advance every particle by one frame.
    pub fn update(&mut self) {
        let bounds = self.bounds;
        for p in &mut self.particles {
            p.step(bounds);
        }
    }

    /// Alpha of the link between two particles `distance` apart, if linked.
    #[inline]
    pub fn link_alpha(&self, distance: f32) -> Option<f32> {
        let max = self.config.max_link_distance;
        (distance < max).then(|| (1.0 - distance / max) * self.config.link_dimming)
    }

    /// Every linked pair, `a < b`, in index order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let n = self.particles.len();
        (0..n).flat_map(move |a| {
            ((a + 1)..n).filter_map(move |b| {
                let distance = self.particles[a].position.distance(self.particles[b].position);
                self.link_alpha(distance).map(|alpha| Link {
                    a,
                    b,
                    distance,
                    alpha,
                })
            })
        })
    }

    pub fn draw_links<C: Canvas2d + ?Sized>(&self, canvas: &mut C) {
        for link in self.links() {
            let from = self.particles[link.a].position;
            let to = self.particles[link.b].position;
            canvas.begin_path();
            canvas.move_to(from.x, from.y);
            canvas.line_to(to.x, to.y);
            canvas.set_stroke_style(self.config.link_color.with_alpha(link.alpha));
            canvas.set_line_width(self.config.link_width);
            canvas.stroke();
        }
    }

    pub fn draw_particles<C: Canvas2d + ?Sized>(&self, canvas: &mut C) {
        for p in &self.particles {
            draw_particle(p, canvas);
        }
    }

    /// Clear the canvas, then draw links under the particles.
    pub fn render<C: Canvas2d + ?Sized>(&self, canvas: &mut C) {
        canvas.clear_rect(0.0, 0.0, self.bounds.x, self.bounds.y);
        self.draw_links(canvas);
        self.draw_particles(canvas);
    }

    /// One animation frame as the page runs it: links are drawn from the
    /// previous positions, then each particle is moved and drawn.
    pub fn frame<C: Canvas2d + ?Sized>(&mut self, canvas: &mut C) {
        canvas.clear_rect(0.0, 0.0, self.bounds.x, self.bounds.y);
        self.draw_links(canvas);
        let bounds = self.bounds;
        for p in &mut self.particles {
            p.step(bounds);
            draw_particle(p, canvas);
        }
    }
}

fn draw_particle<C: Canvas2d + ?Sized>(p: &Particle, canvas: &mut C) {
    canvas.begin_path();
    canvas.arc(p.position.x, p.position.y, p.radius, 0.0, std::f32::consts::TAU);
    canvas.set_fill_style(p.fill_color());
    canvas.fill();
}

/// A [`ParticleField`] bound to a drawing surface.
pub struct ParticleLayer<S: RenderSurface> {
    surface: S,
    field: ParticleField,
    resize: Debouncer,
    viewport_width: f32,
    rebuilds: u64,
}

impl<S: RenderSurface> ParticleLayer<S> {
    /// Size the surface's raster and build the first field.
    ///
    /// Returns `None` when there is no surface; the page then simply has no
    /// particle background.
    pub fn attach(surface: Option<S>, viewport_width: f32, config: FieldConfig) -> Option<Self> {
        Self::attach_field(surface, viewport_width, ParticleField::new(config))
    }

    /// Like [`attach`](Self::attach) with a caller-supplied (e.g. seeded) field.
    pub fn attach_field(
        surface: Option<S>,
        viewport_width: f32,
        field: ParticleField,
    ) -> Option<Self> {
        let Some(surface) = surface else {
            log::debug!("no particle canvas; particle layer disabled");
            return None;
        };
        let resize = Debouncer::new(field.config().resize_quiet());
        let mut layer = Self {
            surface,
            field,
            resize,
            viewport_width,
            rebuilds: 0,
        };
        layer.rebuild();
        Some(layer)
    }

    /// Note a window resize. The rebuild happens once resizing has been
    /// quiet for the configured period.
    pub fn on_resize(&mut self, now: Instant, viewport_width: f32) {
        self.viewport_width = viewport_width;
        self.resize.trigger(now);
    }

    /// Re-measure the surface and rebuild the field from scratch.
    pub fn rebuild(&mut self) {
        let display = self.surface.display_size().max(Vec2::ZERO);
        let (width, height) = (display.x as u32, display.y as u32);
        self.surface.set_backing_size(width, height);
        self.field
            .rebuild(Vec2::new(width as f32, height as f32), self.viewport_width);
        self.rebuilds += 1;
    }

    /// Number of builds so far, including the initial one.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: RenderSurface> Animated for ParticleLayer<S> {
    fn frame(&mut self, ctx: &FrameContext) {
        if self.resize.poll(ctx.now) {
            self.rebuild();
        }
        self.field.frame(self.surface.context());
    }
}
