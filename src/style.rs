//! Inline style values written to the cursor glow element.
//!
//! The glow is driven entirely through three CSS properties: `transform`,
//! `background` and `transition`. They are modelled as typed values here and
//! only turned into CSS text at the host boundary.

use std::fmt;

use glam::Vec2;
use web_time::Duration;

use crate::color::Rgba;

/// One CSS transform function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// `translate(xpx, ypx)`
    Translate(Vec2),
    /// `translate(x%, y%)`, relative to the element's own size.
    TranslatePercent(Vec2),
    /// `scale(x, y)`, or `scale(s)` when both are equal.
    Scale(Vec2),
}

impl TransformOp {
    pub fn uniform_scale(s: f32) -> Self {
        TransformOp::Scale(Vec2::splat(s))
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TransformOp::Translate(v) => write!(f, "translate({}px, {}px)", v.x, v.y),
            TransformOp::TranslatePercent(v) => write!(f, "translate({}%, {}%)", v.x, v.y),
            TransformOp::Scale(v) if v.x == v.y => write!(f, "scale({})", v.x),
            TransformOp::Scale(v) => write!(f, "scale({}, {})", v.x, v.y),
        }
    }
}

/// A CSS transform list, applied right to left like the browser does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform(pub Vec<TransformOp>);

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, op: TransformOp) -> Self {
        self.0.push(op);
        self
    }

    pub fn push(&mut self, op: TransformOp) {
        self.0.push(op);
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.0
    }

    /// Map a point in element-local px (origin at the element's top-left,
    /// transform origin at its centre) to page px.
    pub fn apply(&self, point: Vec2, element_size: Vec2) -> Vec2 {
        let origin = element_size * 0.5;
        let mut p = point - origin;
        for op in self.0.iter().rev() {
            p = match *op {
                TransformOp::Translate(v) => p + v,
                TransformOp::TranslatePercent(v) => p + v * 0.01 * element_size,
                TransformOp::Scale(s) => p * s,
            };
        }
        p + origin
    }

    /// Product of every scale in the list.
    pub fn total_scale(&self) -> Vec2 {
        self.0.iter().fold(Vec2::ONE, |acc, op| match *op {
            TransformOp::Scale(s) => acc * s,
            _ => acc,
        })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// The glow's background: a radial gradient from a colour to transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowFill {
    pub color: Rgba,
    /// Where the gradient reaches full transparency, as a fraction of the radius.
    pub fade_at: f32,
}

impl GlowFill {
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            fade_at: 0.7,
        }
    }
}

impl fmt::Display for GlowFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "radial-gradient(circle, {}, transparent {}%)",
            self.color.to_hex(),
            (self.fade_at * 100.0).round()
        )
    }
}

/// A `transition` on the transform property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub duration: Duration,
}

impl Transition {
    pub fn transform(duration: Duration) -> Self {
        Self { duration }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform {}s ease", self.duration.as_secs_f32())
    }
}

/// The element the cursor glow writes its style to.
pub trait GlowElement {
    /// Replace the whole transform.
    fn set_transform(&mut self, transform: &Transform);

    /// Append one function to the current transform, like
    /// `style.transform += " scale(0.7)"`.
    fn append_transform(&mut self, op: TransformOp);

    fn set_background(&mut self, fill: &GlowFill);

    fn set_transition(&mut self, transition: &Transition);
}

/// A [`GlowElement`] that just keeps the last values written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryGlow {
    pub transform: Transform,
    pub background: Option<GlowFill>,
    pub transition: Option<Transition>,
}

impl MemoryGlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transform as CSS text.
    pub fn transform_css(&self) -> String {
        self.transform.to_string()
    }
}

impl GlowElement for MemoryGlow {
    fn set_transform(&mut self, transform: &Transform) {
        self.transform = transform.clone();
    }

    fn append_transform(&mut self, op: TransformOp) {
        self.transform.push(op);
    }

    fn set_background(&mut self, fill: &GlowFill) {
        self.background = Some(*fill);
    }

    fn set_transition(&mut self, transition: &Transition) {
        self.transition = Some(*transition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_css() {
        let t = Transform::new()
            .then(TransformOp::Translate(Vec2::new(10.5, 20.0)))
            .then(TransformOp::TranslatePercent(Vec2::splat(-50.0)))
            .then(TransformOp::Scale(Vec2::new(1.25, 0.75)))
            .then(TransformOp::uniform_scale(0.7));
        assert_eq!(
            t.to_string(),
            "translate(10.5px, 20px) translate(-50%, -50%) scale(1.25, 0.75) scale(0.7)"
        );
    }

    #[test]
    fn test_apply_centres_element_on_translate() {
        let size = Vec2::splat(40.0);
        let t = Transform::new()
            .then(TransformOp::Translate(Vec2::new(100.0, 50.0)))
            .then(TransformOp::TranslatePercent(Vec2::splat(-50.0)));
        // Element centre lands on the translated point.
        assert_eq!(t.apply(size * 0.5, size), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_apply_scales_about_centre() {
        let size = Vec2::splat(40.0);
        let t = Transform::new().then(TransformOp::Scale(Vec2::new(2.0, 0.5)));
        assert_eq!(t.apply(Vec2::new(40.0, 40.0), size), Vec2::new(60.0, 30.0));
        assert_eq!(t.total_scale(), Vec2::new(2.0, 0.5));
    }

    #[test]
    fn test_fill_and_transition_css() {
        let fill = GlowFill::new(Rgba::rgb(255, 77, 109));
        assert_eq!(fill.to_string(), "radial-gradient(circle, #ff4d6d, transparent 70%)");
        let transition = Transition::transform(Duration::from_millis(150));
        assert_eq!(transition.to_string(), "transform 0.15s ease");
    }

    #[test]
    fn test_memory_glow_append() {
        let mut glow = MemoryGlow::new();
        glow.set_transform(&Transform::new().then(TransformOp::Translate(Vec2::ZERO)));
        glow.append_transform(TransformOp::uniform_scale(1.8));
        assert_eq!(glow.transform_css(), "translate(0px, 0px) scale(1.8)");
    }
}
