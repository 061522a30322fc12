//! Pointer input.
//!
//! [`PointerEvent`] is what the cursor glow reacts to. Hosts translate their
//! own events into it: the browser binding from DOM mouse events, the
//! preview window from winit events via [`PointerTracker`].

use glam::Vec2;

/// A pointer event relevant to the cursor glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to a position in viewport px.
    Move(Vec2),
    Down,
    Up,
    /// Pointer entered an interactive element.
    HoverEnter,
    /// Pointer left an interactive element.
    HoverLeave,
}

/// An axis-aligned rectangle in viewport px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Turns raw pointer positions into [`PointerEvent`]s, including hover
/// enter/leave for a set of interactive regions.
///
/// Used by hosts without a DOM to dispatch hover events from.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    hotspots: Vec<Rect>,
    hovered: Option<usize>,
    position: Vec2,
    pressed: bool,
}

impl PointerTracker {
    pub fn new(hotspots: Vec<Rect>) -> Self {
        Self {
            hotspots,
            ..Default::default()
        }
    }

    pub fn hotspots(&self) -> &[Rect] {
        &self.hotspots
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Index of the hotspot under the pointer.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer moved. Emits the move, preceded by leave/enter events when
    /// the hovered hotspot changes.
    pub fn moved(&mut self, position: Vec2) -> Vec<PointerEvent> {
        self.position = position;
        let mut events = Vec::with_capacity(3);
        let now_over = self.hotspots.iter().position(|r| r.contains(position));
        if now_over != self.hovered {
            if self.hovered.is_some() {
                events.push(PointerEvent::HoverLeave);
            }
            if now_over.is_some() {
                events.push(PointerEvent::HoverEnter);
            }
            self.hovered = now_over;
        }
        events.push(PointerEvent::Move(position));
        events
    }

    pub fn button(&mut self, pressed: bool) -> PointerEvent {
        self.pressed = pressed;
        if pressed {
            PointerEvent::Down
        } else {
            PointerEvent::Up
        }
    }

    /// Process a winit window event (only pointer events produce output).
    ///
    /// `scale_factor` converts physical px to the logical px the page uses.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn handle_window_event(
        &mut self,
        event: &winit::event::WindowEvent,
        scale_factor: f64,
    ) -> Vec<PointerEvent> {
        use winit::event::{ElementState, MouseButton, WindowEvent};

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale_factor);
                self.moved(Vec2::new(logical.x, logical.y))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => vec![self.button(*state == ElementState::Pressed)],
            WindowEvent::CursorLeft { .. } => {
                if self.hovered.take().is_some() {
                    vec![PointerEvent::HoverLeave]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(30.0, 20.0)));
        assert!(!r.contains(Vec2::new(31.0, 15.0)));
        assert_eq!(r.size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_hover_transitions() {
        let mut tracker = PointerTracker::new(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 10.0, 10.0),
        ]);

        let p = Vec2::new(50.0, 50.0);
        assert_eq!(tracker.moved(p), vec![PointerEvent::Move(p)]);

        let p = Vec2::new(5.0, 5.0);
        assert_eq!(
            tracker.moved(p),
            vec![PointerEvent::HoverEnter, PointerEvent::Move(p)]
        );
        assert_eq!(tracker.hovered(), Some(0));

        // Straight into the neighbouring hotspot: leave then enter.
        let p = Vec2::new(25.0, 5.0);
        assert_eq!(
            tracker.moved(p),
            vec![
                PointerEvent::HoverLeave,
                PointerEvent::HoverEnter,
                PointerEvent::Move(p)
            ]
        );

        let p = Vec2::new(25.0, 50.0);
        assert_eq!(
            tracker.moved(p),
            vec![PointerEvent::HoverLeave, PointerEvent::Move(p)]
        );
        assert_eq!(tracker.hovered(), None);
    }

    #[test]
    fn test_buttons() {
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.button(true), PointerEvent::Down);
        assert!(tracker.is_pressed());
        assert_eq!(tracker.button(false), PointerEvent::Up);
        assert!(!tracker.is_pressed());
    }
}
