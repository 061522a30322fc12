//! The cursor glow.
//!
//! A soft marker that chases the pointer. Each frame it closes a fixed
//! fraction of the remaining gap, so it eases in without ever overshooting,
//! and it is squashed along x/y in proportion to how fast it is moving.
//!
//! Press and hover feedback are appended to whatever transform the element
//! currently has. The next frame rewrites the transform from scratch, so
//! those extra scales only last until then; hover-leave restores the colour
//! but not the scale. This matches the live site and is kept on purpose.

use glam::Vec2;
use web_time::Duration;

use crate::config::CursorConfig;
use crate::input::PointerEvent;
use crate::scheduler::{Animated, FrameContext};
use crate::style::{GlowElement, GlowFill, Transform, TransformOp, Transition};

/// Pointer-following state.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorGlow {
    target: Vec2,
    position: Vec2,
    velocity: Vec2,
    stretch: f32,
    config: CursorConfig,
}

impl CursorGlow {
    /// Start at rest at `start` (the page uses the viewport centre).
    pub fn new(start: Vec2, config: CursorConfig) -> Self {
        Self {
            target: start,
            position: start,
            velocity: Vec2::ZERO,
            stretch: 0.0,
            config,
        }
    }

    /// Record the raw pointer position.
    #[inline]
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Smoothed position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement applied on the last update.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn stretch(&self) -> f32 {
        self.stretch
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Stretch for a per-frame velocity, clamped to `max_stretch`.
    #[inline]
    pub fn stretch_for(&self, velocity: Vec2) -> f32 {
        (velocity.length() * self.config.stretch_factor).min(self.config.max_stretch)
    }

    /// Move one frame towards the target.
    pub fn update(&mut self) {
        self.velocity = (self.target - self.position) * self.config.responsiveness;
        self.position += self.velocity;
        self.stretch = self.stretch_for(self.velocity);
    }

    /// `translate(x, y) translate(-50%, -50%) scale(1 + s, 1 - s)`
    pub fn transform(&self) -> Transform {
        Transform::new()
            .then(TransformOp::Translate(self.position))
            .then(TransformOp::TranslatePercent(Vec2::splat(-50.0)))
            .then(TransformOp::Scale(Vec2::new(
                1.0 + self.stretch,
                1.0 - self.stretch,
            )))
    }
}

/// A [`CursorGlow`] bound to the element it styles.
pub struct CursorLayer<G: GlowElement> {
    glow: G,
    cursor: CursorGlow,
}

impl<G: GlowElement> CursorLayer<G> {
    /// Bind to the glow element, starting at the viewport centre.
    ///
    /// Returns `None` when the page has no glow element.
    pub fn attach(glow: Option<G>, viewport: Vec2, config: CursorConfig) -> Option<Self> {
        let Some(glow) = glow else {
            log::debug!("no cursor glow element; cursor layer disabled");
            return None;
        };
        Some(Self {
            glow,
            cursor: CursorGlow::new(viewport * 0.5, config),
        })
    }

    pub fn cursor(&self) -> &CursorGlow {
        &self.cursor
    }

    pub fn glow(&self) -> &G {
        &self.glow
    }

    pub fn on_pointer_move(&mut self, position: Vec2) {
        self.cursor.set_target(position);
    }

    /// Quick squeeze.
    pub fn on_pointer_down(&mut self) {
        let config = self.cursor.config();
        let transition = Transition::transform(Duration::from_millis(config.press_transition_ms));
        let scale = TransformOp::uniform_scale(config.press_scale);
        self.glow.set_transition(&transition);
        self.glow.append_transform(scale);
    }

    pub fn on_pointer_up(&mut self) {
        let transition =
            Transition::transform(Duration::from_millis(self.cursor.config().release_transition_ms));
        self.glow.set_transition(&transition);
    }

    /// Pointer entered a link, button or `.magnetic` element.
    pub fn on_hover_enter(&mut self) {
        let config = self.cursor.config();
        let fill = GlowFill::new(config.accent_color);
        let scale = TransformOp::uniform_scale(config.hover_scale);
        self.glow.set_background(&fill);
        self.glow.append_transform(scale);
    }

    /// Pointer left an interactive element. Only the colour is restored.
    pub fn on_hover_leave(&mut self) {
        let fill = GlowFill::new(self.cursor.config().default_color);
        self.glow.set_background(&fill);
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move(position) => self.on_pointer_move(position),
            PointerEvent::Down => self.on_pointer_down(),
            PointerEvent::Up => self.on_pointer_up(),
            PointerEvent::HoverEnter => self.on_hover_enter(),
            PointerEvent::HoverLeave => self.on_hover_leave(),
        }
    }
}

impl<G: GlowElement> Animated for CursorLayer<G> {
    fn frame(&mut self, _ctx: &FrameContext) {
        self.cursor.update();
        self.glow.set_transform(&self.cursor.transform());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::style::MemoryGlow;
    use web_time::Instant;

    fn ctx() -> FrameContext {
        FrameContext {
            now: Instant::now(),
            delta: 0.016,
            frame: 1,
        }
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut cursor = CursorGlow::new(Vec2::ZERO, CursorConfig::default());
        let target = Vec2::new(300.0, -120.0);
        cursor.set_target(target);

        let mut last = cursor.position().distance(target);
        for _ in 0..70 {
            cursor.update();
            let d = cursor.position().distance(target);
            assert!(d < last, "distance must shrink every frame");
            // Still on the start side of the target on both axes.
            assert!(cursor.position().x <= target.x);
            assert!(cursor.position().y >= target.y);
            last = d;
        }
        assert!(last < 0.01);
    }

    #[test]
    fn test_gap_shrinks_by_responsiveness() {
        let mut cursor = CursorGlow::new(Vec2::ZERO, CursorConfig::default());
        cursor.set_target(Vec2::new(100.0, 0.0));
        cursor.update();
        assert!((cursor.position().x - 15.0).abs() < 1e-4);
        assert!((cursor.velocity().x - 15.0).abs() < 1e-4);
        cursor.update();
        assert!((cursor.position().x - 27.75).abs() < 1e-4);
    }

    #[test]
    fn test_stretch_is_clamped() {
        let cursor = CursorGlow::new(Vec2::ZERO, CursorConfig::default());
        assert_eq!(cursor.stretch_for(Vec2::ZERO), 0.0);
        assert!((cursor.stretch_for(Vec2::new(1.0, 0.0)) - 0.3).abs() < 1e-6);
        for speed in [1.2, 5.0, 100.0, 1e6] {
            assert!(cursor.stretch_for(Vec2::new(speed, speed)) <= 0.35);
        }
        assert_eq!(cursor.stretch_for(Vec2::new(0.0, 50.0)), 0.35);
    }

    #[test]
    fn test_frame_writes_full_transform() {
        let mut layer =
            CursorLayer::attach(Some(MemoryGlow::new()), Vec2::new(800.0, 600.0), CursorConfig::default())
                .unwrap();
        layer.frame(&ctx());
        assert_eq!(
            layer.glow().transform_css(),
            "translate(400px, 300px) translate(-50%, -50%) scale(1)"
        );
    }

    #[test]
    fn test_press_appends_scale_until_next_frame() {
        let mut layer =
            CursorLayer::attach(Some(MemoryGlow::new()), Vec2::new(800.0, 600.0), CursorConfig::default())
                .unwrap();
        layer.frame(&ctx());

        layer.handle(PointerEvent::Down);
        assert!(layer.glow().transform_css().ends_with(" scale(0.7)"));
        assert_eq!(layer.glow().transition.unwrap().to_string(), "transform 0.15s ease");

        layer.handle(PointerEvent::Up);
        assert_eq!(layer.glow().transition.unwrap().to_string(), "transform 0.25s ease");

        layer.frame(&ctx());
        assert!(!layer.glow().transform_css().contains("scale(0.7)"));
    }

    #[test]
    fn test_hover_leave_restores_colour_not_scale() {
        let mut layer =
            CursorLayer::attach(Some(MemoryGlow::new()), Vec2::new(800.0, 600.0), CursorConfig::default())
                .unwrap();
        layer.frame(&ctx());

        layer.handle(PointerEvent::HoverEnter);
        assert_eq!(layer.glow().background.unwrap().color, Rgba::rgb(255, 77, 109));
        assert!(layer.glow().transform_css().ends_with(" scale(1.8)"));

        layer.handle(PointerEvent::HoverLeave);
        assert_eq!(layer.glow().background.unwrap().color, Rgba::rgb(0, 240, 255));
        // Scale is still there until the frame loop rewrites the transform.
        assert!(layer.glow().transform_css().ends_with(" scale(1.8)"));

        layer.frame(&ctx());
        assert!(!layer.glow().transform_css().contains("scale(1.8)"));
    }

    #[test]
    fn test_pointer_move_sets_target_only() {
        let mut layer =
            CursorLayer::attach(Some(MemoryGlow::new()), Vec2::new(800.0, 600.0), CursorConfig::default())
                .unwrap();
        layer.handle(PointerEvent::Move(Vec2::new(10.0, 20.0)));
        assert_eq!(layer.cursor().target(), Vec2::new(10.0, 20.0));
        assert_eq!(layer.cursor().position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_missing_glow_disables_layer() {
        let layer =
            CursorLayer::<MemoryGlow>::attach(None, Vec2::new(800.0, 600.0), CursorConfig::default());
        assert!(layer.is_none());
    }
}
