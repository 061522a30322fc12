//! 2D drawing abstraction.
//!
//! [`Canvas2d`] mirrors the handful of `CanvasRenderingContext2d` calls the
//! particle field makes. The browser host implements it directly on the
//! real context; [`DrawList`] implements it by recording shapes, which is
//! what the native preview tessellates and what tests inspect.

use glam::Vec2;

use crate::color::Rgba;

/// Immediate-mode 2D drawing context.
pub trait Canvas2d {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    /// Add an arc around `(x, y)` from `start_angle` to `end_angle` (radians).
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn set_fill_style(&mut self, color: Rgba);
    fn set_stroke_style(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);
    fn fill(&mut self);
    fn stroke(&mut self);
}

/// A drawable element with a displayed size and a separately sized raster.
pub trait RenderSurface {
    type Context: Canvas2d;

    /// Size the element occupies on the page, in CSS px.
    fn display_size(&self) -> Vec2;

    /// Resize the backing raster. Implementations may clear it.
    fn set_backing_size(&mut self, width: u32, height: u32);

    fn context(&mut self) -> &mut Self::Context;
}

/// A primitive recorded by [`DrawList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
}

impl Shape {
    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Line { from, to, width, .. } => {
                let pad = Vec2::splat(width * 0.5);
                (from.min(to) - pad, from.max(to) + pad)
            }
            Shape::Circle { center, radius, .. } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc { center: Vec2, radius: f32 },
}

/// A [`Canvas2d`] that records what was drawn.
///
/// Only the operations the page uses are modelled: `fill` turns arcs in the
/// current path into [`Shape::Circle`] (arcs are treated as full circles),
/// `stroke` turns each line segment into a [`Shape::Line`]. `clear_rect`
/// drops every shape that touches the rectangle.
///
/// With an extent set, shapes lying wholly outside `[0, extent]` are not
/// recorded, as they would leave no pixels on a canvas of that size.
#[derive(Debug, Clone)]
pub struct DrawList {
    shapes: Vec<Shape>,
    path: Vec<Segment>,
    extent: Option<Vec2>,
    fill_style: Rgba,
    stroke_style: Rgba,
    line_width: f32,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawList {
    pub fn new() -> Self {
        // Same initial state as a fresh 2D context.
        Self {
            shapes: Vec::new(),
            path: Vec::new(),
            extent: None,
            fill_style: Rgba::rgb(0, 0, 0),
            stroke_style: Rgba::rgb(0, 0, 0),
            line_width: 1.0,
        }
    }

    /// A list for a canvas of `width` x `height` px.
    pub fn with_extent(width: f32, height: f32) -> Self {
        let mut list = Self::new();
        list.set_extent(width, height);
        list
    }

    pub fn set_extent(&mut self, width: f32, height: f32) {
        self.extent = Some(Vec2::new(width, height));
    }

    pub fn extent(&self) -> Option<Vec2> {
        self.extent
    }

    fn record(&mut self, shape: Shape) {
        if let Some(extent) = self.extent {
            let (lo, hi) = shape.bounds();
            if hi.cmplt(Vec2::ZERO).any() || lo.cmpgt(extent).any() {
                return;
            }
        }
        self.shapes.push(shape);
    }

    /// Everything drawn since the last clear, in draw order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| matches!(s, Shape::Circle { .. }))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.path.clear();
    }
}

impl Canvas2d for DrawList {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let min = Vec2::new(x, y);
        let max = min + Vec2::new(width, height);
        self.shapes.retain(|shape| {
            let (lo, hi) = shape.bounds();
            lo.cmpgt(max).any() || hi.cmplt(min).any()
        });
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(Segment::MoveTo(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.push(Segment::LineTo(Vec2::new(x, y)));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, _start_angle: f32, _end_angle: f32) {
        self.path.push(Segment::Arc {
            center: Vec2::new(x, y),
            radius,
        });
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn fill(&mut self) {
        let color = self.fill_style;
        let arcs: Vec<Shape> = self
            .path
            .iter()
            .filter_map(|segment| match *segment {
                Segment::Arc { center, radius } => Some(Shape::Circle {
                    center,
                    radius,
                    color,
                }),
                _ => None,
            })
            .collect();
        for shape in arcs {
            self.record(shape);
        }
    }

    fn stroke(&mut self) {
        let mut pen: Option<Vec2> = None;
        let mut lines = Vec::new();
        for segment in &self.path {
            match *segment {
                Segment::MoveTo(p) => pen = Some(p),
                Segment::LineTo(p) => {
                    if let Some(from) = pen {
                        lines.push(Shape::Line {
                            from,
                            to: p,
                            width: self.line_width,
                            color: self.stroke_style,
                        });
                    }
                    pen = Some(p);
                }
                Segment::Arc { .. } => pen = None,
            }
        }
        for shape in lines {
            self.record(shape);
        }
    }
}

/// An in-memory [`RenderSurface`] backed by a [`DrawList`].
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    display: Vec2,
    backing: (u32, u32),
    canvas: DrawList,
}

impl MemorySurface {
    pub fn new(display_width: f32, display_height: f32) -> Self {
        Self {
            display: Vec2::new(display_width, display_height),
            backing: (0, 0),
            canvas: DrawList::new(),
        }
    }

    /// Change the displayed size, as a window resize would.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = Vec2::new(width, height);
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.canvas
    }
}

impl RenderSurface for MemorySurface {
    type Context = DrawList;

    fn display_size(&self) -> Vec2 {
        self.display
    }

    /// Resizing the raster wipes it, like setting `canvas.width`.
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.canvas.clear();
        self.canvas.set_extent(width as f32, height as f32);
    }

    fn context(&mut self) -> &mut DrawList {
        &mut self.canvas
    }
}
