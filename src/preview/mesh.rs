//! CPU tessellation of recorded shapes into a triangle list.
//!
//! The preview draws the same [`DrawList`] the particle layer writes each
//! frame, so there is no GPU-side simulation: every frame the whole scene
//! is turned into coloured triangles in normalized device coordinates.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::canvas::{DrawList, Shape};
use crate::color::Rgba;
use crate::input::Rect;
use crate::style::{GlowFill, Transform};

/// Segments used for particle dots.
const DOT_SEGMENTS: usize = 12;
/// Segments used for the glow disc.
const GLOW_SEGMENTS: usize = 48;

/// One vertex: clip-space position and straight (not premultiplied) colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A triangle list in page px, converted to clip space as it is built.
#[derive(Debug, Clone)]
pub struct Mesh {
    viewport: Vec2,
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// `viewport` is the page size in CSS px.
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport: viewport.max(Vec2::ONE),
            vertices: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ONE);
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Page px (origin top-left, y down) to clip space.
    #[inline]
    pub fn to_clip(&self, p: Vec2) -> [f32; 2] {
        let n = p / self.viewport;
        [n.x * 2.0 - 1.0, 1.0 - n.y * 2.0]
    }

    fn vertex(&self, p: Vec2, color: [f32; 4]) -> Vertex {
        Vertex {
            position: self.to_clip(p),
            color,
        }
    }

    fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        self.vertices.extend_from_slice(&[a, b, c]);
    }

    /// A fan around `center`, with a separate colour for the rim.
    fn push_fan(&mut self, center: Vec2, rim: &[Vec2], inner: [f32; 4], outer: [f32; 4]) {
        let c = self.vertex(center, inner);
        for i in 0..rim.len() {
            let a = self.vertex(rim[i], outer);
            let b = self.vertex(rim[(i + 1) % rim.len()], outer);
            self.push_triangle(c, a, b);
        }
    }

    pub fn push_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let rim: Vec<Vec2> = ring(DOT_SEGMENTS)
            .map(|dir| center + dir * radius)
            .collect();
        let color = color.to_array();
        self.push_fan(center, &rim, color, color);
    }

    /// A line of the given width as a quad. Zero-length lines draw nothing,
    /// like a canvas stroke with butt caps.
    pub fn push_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let Some(dir) = (to - from).try_normalize() else {
            return;
        };
        let offset = dir.perp() * (width * 0.5);
        let color = color.to_array();
        let a = self.vertex(from + offset, color);
        let b = self.vertex(from - offset, color);
        let c = self.vertex(to + offset, color);
        let d = self.vertex(to - offset, color);
        self.push_triangle(a, b, c);
        self.push_triangle(c, b, d);
    }

    pub fn push_rect(&mut self, rect: &Rect, color: Rgba) {
        let color = color.to_array();
        let a = self.vertex(rect.min, color);
        let b = self.vertex(Vec2::new(rect.max.x, rect.min.y), color);
        let c = self.vertex(Vec2::new(rect.min.x, rect.max.y), color);
        let d = self.vertex(rect.max, color);
        self.push_triangle(a, b, c);
        self.push_triangle(c, b, d);
    }

    /// Everything in a draw list, in draw order.
    pub fn push_draw_list(&mut self, list: &DrawList) {
        for shape in list.shapes() {
            match *shape {
                Shape::Line {
                    from,
                    to,
                    width,
                    color,
                } => self.push_line(from, to, width, color),
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => self.push_circle(center, radius, color),
            }
        }
    }

    /// The cursor glow: a square element of `diameter` px filled with a
    /// radial gradient, placed by its CSS transform.
    pub fn push_glow(&mut self, transform: &Transform, diameter: f32, fill: &GlowFill) {
        let size = Vec2::splat(diameter);
        let local_center = size * 0.5;
        let radius = diameter * 0.5 * fill.fade_at;
        let rim: Vec<Vec2> = ring(GLOW_SEGMENTS)
            .map(|dir| transform.apply(local_center + dir * radius, size))
            .collect();
        let center = transform.apply(local_center, size);
        let inner = fill.color.to_array();
        let outer = fill.color.with_alpha(0.0).to_array();
        self.push_fan(center, &rim, inner, outer);
    }
}

/// Unit vectors evenly spaced around a circle.
fn ring(segments: usize) -> impl Iterator<Item = Vec2> {
    (0..segments).map(move |i| {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        Vec2::from_angle(angle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas2d;
    use crate::style::TransformOp;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn test_clip_space_corners() {
        let mesh = Mesh::new(Vec2::new(800.0, 600.0));
        assert_eq!(mesh.to_clip(Vec2::ZERO), [-1.0, 1.0]);
        assert_eq!(mesh.to_clip(Vec2::new(800.0, 600.0)), [1.0, -1.0]);
        assert_eq!(mesh.to_clip(Vec2::new(400.0, 300.0)), [0.0, 0.0]);
    }

    #[test]
    fn test_shape_vertex_counts() {
        let mut mesh = Mesh::new(Vec2::new(100.0, 100.0));
        mesh.push_circle(Vec2::splat(50.0), 2.0, Rgba::rgb(0, 245, 255));
        assert_eq!(mesh.vertices().len(), DOT_SEGMENTS * 3);

        mesh.clear();
        mesh.push_line(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.6, Rgba::rgb(0, 245, 255));
        assert_eq!(mesh.vertices().len(), 6);

        mesh.clear();
        mesh.push_line(Vec2::ONE, Vec2::ONE, 0.6, Rgba::rgb(0, 245, 255));
        mesh.push_circle(Vec2::ONE, 0.0, Rgba::rgb(0, 245, 255));
        assert!(mesh.vertices().is_empty());
    }

    #[test]
    fn test_line_quad_has_width() {
        let mut mesh = Mesh::new(Vec2::new(100.0, 100.0));
        mesh.push_line(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0), 2.0, Rgba::rgb(1, 2, 3));
        let ys: Vec<f32> = mesh.vertices().iter().map(|v| v.position[1]).collect();
        let span = ys.iter().cloned().fold(f32::MIN, f32::max)
            - ys.iter().cloned().fold(f32::MAX, f32::min);
        // 2 px of a 100 px viewport is 0.04 in clip space.
        assert!((span - 0.04).abs() < 1e-5);
    }

    #[test]
    fn test_draw_list_order_preserved() {
        let mut list = DrawList::new();
        list.begin_path();
        list.move_to(0.0, 0.0);
        list.line_to(10.0, 10.0);
        list.stroke();
        list.begin_path();
        list.arc(5.0, 5.0, 1.0, 0.0, std::f32::consts::TAU);
        list.set_fill_style(Rgba::rgb(255, 0, 0));
        list.fill();

        let mut mesh = Mesh::new(Vec2::new(100.0, 100.0));
        mesh.push_draw_list(&list);
        assert_eq!(mesh.vertices().len(), 6 + DOT_SEGMENTS * 3);
        assert_eq!(mesh.vertices()[6].color, Rgba::rgb(255, 0, 0).to_array());
    }

    #[test]
    fn test_glow_centred_on_cursor() {
        let transform = Transform::new()
            .then(TransformOp::Translate(Vec2::new(200.0, 100.0)))
            .then(TransformOp::TranslatePercent(Vec2::splat(-50.0)))
            .then(TransformOp::Scale(Vec2::new(1.2, 0.8)));
        let fill = GlowFill::new(Rgba::rgb(0, 240, 255));

        let mut mesh = Mesh::new(Vec2::new(400.0, 200.0));
        mesh.push_glow(&transform, 36.0, &fill);
        assert_eq!(mesh.vertices().len(), GLOW_SEGMENTS * 3);

        let center = mesh.vertices()[0];
        assert!(approx(center.position, mesh.to_clip(Vec2::new(200.0, 100.0))));
        assert_eq!(center.color[3], 1.0);
        // Rim fades out.
        assert_eq!(mesh.vertices()[1].color[3], 0.0);
    }
}
