//! Drawing context - the immediate-mode API render utilities draw through

use trellis_core::{Bounds, Color};
use trellis_text::{TextAlign, TextRow};

/// Winding of the most recent sub-path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Winding {
    /// Filled area
    #[default]
    Solid,
    /// Cut-out inside a solid sub-path
    Hole,
}

/// Fill paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Color(Color),
    BoxGradient(BoxGradient),
}

impl Paint {
    /// Representative color (text is drawn with the inner gradient color)
    pub fn base_color(&self) -> Color {
        match self {
            Paint::Color(color) => *color,
            Paint::BoxGradient(gradient) => gradient.inner,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Color(color)
    }
}

/// Feathered rounded-rectangle gradient, usually for shadows.
///
/// Inside the rectangle the paint is `inner`; it fades to `outer` over
/// `feather` pixels across the rounded edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGradient {
    pub bounds: Bounds,
    pub radius: f32,
    pub feather: f32,
    pub inner: Color,
    pub outer: Color,
}

impl BoxGradient {
    pub fn new(bounds: Bounds, radius: f32, feather: f32, inner: Color, outer: Color) -> Self {
        Self {
            bounds,
            radius,
            feather: feather.max(1.0),
            inner,
            outer,
        }
    }

    /// Paint color at a point
    pub fn color_at(&self, px: f32, py: f32) -> Color {
        let half_w = self.bounds.width * 0.5;
        let half_h = self.bounds.height * 0.5;
        let cx = px - (self.bounds.x + half_w);
        let cy = py - (self.bounds.y + half_h);

        let d = rounded_rect_distance(cx, cy, half_w, half_h, self.radius);
        let t = ((d + self.feather * 0.5) / self.feather).clamp(0.0, 1.0);
        self.inner.lerp(self.outer, t)
    }
}

/// Signed distance from a point (relative to the center) to a rounded rectangle
fn rounded_rect_distance(px: f32, py: f32, half_w: f32, half_h: f32, radius: f32) -> f32 {
    let radius = radius.min(half_w.min(half_h)).max(0.0);
    let dx = px.abs() - (half_w - radius);
    let dy = py.abs() - (half_h - radius);
    let outside = (dx.max(0.0).powi(2) + dy.max(0.0).powi(2)).sqrt();
    dx.max(dy).min(0.0) + outside - radius
}

/// Immediate-mode vector drawing API (NanoVG model).
///
/// A path is started with [`begin_path`](DrawContext::begin_path), built from
/// sub-paths and then filled or stroked with the current paint. The scissor
/// clips every later draw until it is reset.
pub trait DrawContext {
    fn begin_path(&mut self);

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32);

    /// Set the winding of the last added sub-path
    fn path_winding(&mut self, winding: Winding);

    fn fill_color(&mut self, color: Color);

    fn fill_paint(&mut self, paint: Paint);

    fn fill(&mut self);

    fn stroke_color(&mut self, color: Color);

    fn stroke_width(&mut self, width: f32);

    fn stroke(&mut self);

    /// Create a box gradient paint
    fn box_gradient(&self, bounds: Bounds, radius: f32, feather: f32, inner: Color, outer: Color) -> Paint {
        Paint::BoxGradient(BoxGradient::new(bounds, radius, feather, inner, outer))
    }

    fn font_size(&mut self, size: f32);

    /// Select a registered font by name
    fn font_face(&mut self, name: &str);

    fn text_align(&mut self, align: TextAlign);

    /// Draw one line of text anchored at (x, y) by the current alignment
    fn text(&mut self, x: f32, y: f32, text: &str);

    /// Break text into rows of at most `width` with the current font
    fn text_break_lines(&mut self, text: &str, width: f32, max_rows: usize) -> Vec<TextRow>;

    /// Ink bounds `[xmin, ymin, xmax, ymax]` of text drawn at (x, y)
    fn text_bounds(&mut self, x: f32, y: f32, text: &str) -> [f32; 4];

    /// Replace the scissor
    fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Intersect the scissor; acts as [`scissor`](DrawContext::scissor) when none is set
    fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn reset_scissor(&mut self);
}
