//! tiny-skia backend
//!
//! Rasterizes into a [`Pixmap`]. The scissor becomes a clip [`Mask`], box
//! gradients are evaluated per pixel into a pattern, and text is shaped
//! with rustybuzz and filled as glyph outlines.

use std::path::Path;

use tiny_skia::{
    FillRule, FilterQuality, Mask, Pattern, Pixmap, PathBuilder, SpreadMode, Stroke, Transform,
};
use trellis_core::{Bounds, Color};
use trellis_text::layout::baseline_offset;
use trellis_text::{FontRegistry, FontShaper, Shaper, TextAlign, TextRow};
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::context::{BoxGradient, DrawContext, Paint, Winding};
use crate::state::{DrawState, SubPath};
use crate::{RenderError, Result};

/// Bezier handle length for a quarter circle
const KAPPA90: f32 = 0.552_284_8;

/// CPU canvas backed by a tiny-skia pixmap
pub struct SkiaCanvas {
    pixmap: Pixmap,
    shaper: FontShaper,
    state: DrawState,
    clip: Option<Mask>,
    background: Color,
}

impl std::fmt::Debug for SkiaCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaCanvas")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("fonts", self.shaper.fonts())
            .field("scissor", &self.state.scissor)
            .finish()
    }
}

impl SkiaCanvas {
    /// Create a canvas without fonts (text is measured as zero width and not drawn)
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_fonts(width, height, FontRegistry::new())
    }

    /// Create a canvas drawing text with the given fonts
    pub fn with_fonts(width: u32, height: u32, fonts: FontRegistry) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        tracing::debug!("Created {}x{} canvas", width, height);

        let mut canvas = Self {
            pixmap,
            shaper: FontShaper::new(fonts),
            state: DrawState::default(),
            clip: None,
            background: Color::TRANSPARENT,
        };
        canvas.clear();
        Ok(canvas)
    }

    /// Set the clear color and clear
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self.clear();
        self
    }

    /// Fill the whole pixmap with the background color
    pub fn clear(&mut self) {
        self.pixmap.fill(to_skia(self.background));
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn fonts(&self) -> &FontRegistry {
        self.shaper.fonts()
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        self.shaper.fonts_mut()
    }

    /// Unpremultiplied color of a pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::from_rgba8(p.red(), p.green(), p.blue(), p.alpha()))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Png(e.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.encode_png()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn update_clip(&mut self) {
        self.clip = match self.state.scissor {
            None => None,
            Some(bounds) => clip_mask(self.pixmap.width(), self.pixmap.height(), bounds),
        };
    }
}

/// Clip mask admitting only `bounds`
fn clip_mask(width: u32, height: u32, bounds: Bounds) -> Option<Mask> {
    let mut mask = Mask::new(width, height)?;
    if !bounds.is_empty() {
        let rect = tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)?;
        let path = PathBuilder::from_rect(rect);
        mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    }
    Some(mask)
}

fn to_skia(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// Integer pixel area `(x, y, w, h)` of a path clamped to the canvas
fn path_bounds_in_canvas(rect: tiny_skia::Rect, width: u32, height: u32) -> Option<(i32, i32, u32, u32)> {
    let x0 = rect.left().floor().max(0.0) as i32;
    let y0 = rect.top().floor().max(0.0) as i32;
    let x1 = rect.right().ceil().min(width as f32) as i32;
    let y1 = rect.bottom().ceil().min(height as f32) as i32;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
}

/// Evaluate a box gradient over an area, sampling pixel centers
fn gradient_pixmap(gradient: &BoxGradient, (x0, y0, w, h): (i32, i32, u32, u32)) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(w, h)?;
    let pixels = pixmap.pixels_mut();
    for row in 0..h {
        for col in 0..w {
            let color = gradient.color_at(x0 as f32 + col as f32 + 0.5, y0 as f32 + row as f32 + 0.5);
            pixels[(row * w + col) as usize] = to_skia(color).premultiply().to_color_u8();
        }
    }
    Some(pixmap)
}

fn build_path(subpaths: &[SubPath]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for subpath in subpaths {
        let bounds = subpath.bounds();
        if bounds.is_empty() {
            continue;
        }
        match subpath {
            SubPath::Rect { .. } => {
                if let Some(rect) = tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height) {
                    pb.push_rect(rect);
                }
            }
            SubPath::RoundedRect { radius, .. } => push_rounded_rect(&mut pb, bounds, *radius),
        }
    }
    pb.finish()
}

fn push_rounded_rect(pb: &mut PathBuilder, b: Bounds, radius: f32) {
    let r = radius.min(b.width * 0.5).min(b.height * 0.5);
    if r < 0.1 {
        if let Some(rect) = tiny_skia::Rect::from_xywh(b.x, b.y, b.width, b.height) {
            pb.push_rect(rect);
        }
        return;
    }

    let (x, y, w, h) = (b.x, b.y, b.width, b.height);
    let k = r * KAPPA90;
    pb.move_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    pb.close();
}

impl DrawContext for SkiaCanvas {
    fn begin_path(&mut self) {
        self.state.begin_path();
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.push(SubPath::Rect {
            bounds: Bounds::new(x, y, w, h),
            winding: Winding::Solid,
        });
    }

    fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.state.push(SubPath::RoundedRect {
            bounds: Bounds::new(x, y, w, h),
            radius,
            winding: Winding::Solid,
        });
    }

    fn path_winding(&mut self, winding: Winding) {
        self.state.set_winding(winding);
    }

    fn fill_color(&mut self, color: Color) {
        self.state.fill = Paint::Color(color);
    }

    fn fill_paint(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn fill(&mut self) {
        let Some(path) = build_path(&self.state.path) else {
            return;
        };
        // Holes are enclosed by solid sub-paths
        let rule = if self.state.has_holes() { FillRule::EvenOdd } else { FillRule::Winding };

        let gradient = match &self.state.fill {
            Paint::Color(_) => None,
            Paint::BoxGradient(gradient) => {
                let Some(area) = path_bounds_in_canvas(path.bounds(), self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                gradient_pixmap(gradient, area).map(|pixmap| (pixmap, area))
            }
        };

        let mut paint = tiny_skia::Paint::default();
        paint.anti_alias = true;
        match &gradient {
            Some((pixmap, (x0, y0, _, _))) => {
                paint.shader = Pattern::new(
                    pixmap.as_ref(),
                    SpreadMode::Pad,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::from_translate(*x0 as f32, *y0 as f32),
                );
            }
            None => paint.set_color(to_skia(self.state.fill.base_color())),
        }
        self.pixmap.fill_path(&path, &paint, rule, Transform::identity(), self.clip.as_ref());
    }

    fn stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    fn stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    fn stroke(&mut self) {
        let Some(path) = build_path(&self.state.path) else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia(self.state.stroke_color));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: self.state.stroke_width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), self.clip.as_ref());
    }

    fn font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn font_face(&mut self, name: &str) {
        self.state.font_face = name.to_string();
    }

    fn text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        let font = self.state.font_face.as_str();
        let size = self.state.font_size;
        let align = self.state.text_align;

        let run = match self.shaper.shape(font, size, text) {
            Ok(run) => run,
            Err(err) => {
                tracing::debug!("Skipping text '{}': {}", text, err);
                return;
            }
        };
        let metrics = self.shaper.metrics(font, size);
        let origin_x = x - run.width * align.horizontal.index() as f32 / 2.0;
        let baseline = y + baseline_offset(align.vertical, metrics.ascender, metrics.descender);

        let glyphs = self
            .shaper
            .fonts()
            .with_face_data(font, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let mut pen = origin_x;
                let mut paths = Vec::with_capacity(run.glyphs.len());
                for glyph in &run.glyphs {
                    let mut outline = GlyphOutline::new(run.scale, pen + glyph.x_offset, baseline - glyph.y_offset);
                    if face.outline_glyph(GlyphId(glyph.glyph_id), &mut outline).is_some() {
                        paths.extend(outline.finish());
                    }
                    pen += glyph.x_advance;
                }
                Some(paths)
            })
            .flatten()
            .unwrap_or_default();

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia(self.state.fill.base_color()));
        paint.anti_alias = true;
        for path in &glyphs {
            self.pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), self.clip.as_ref());
        }
    }

    fn text_break_lines(&mut self, text: &str, width: f32, max_rows: usize) -> Vec<TextRow> {
        trellis_text::break_lines(&self.shaper, &self.state.font_face, self.state.font_size, text, width, max_rows)
    }

    fn text_bounds(&mut self, x: f32, y: f32, text: &str) -> [f32; 4] {
        trellis_text::text_bounds(
            &self.shaper,
            &self.state.font_face,
            self.state.font_size,
            self.state.text_align,
            x,
            y,
            text,
        )
    }

    fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.set_scissor(Bounds::new(x, y, w, h));
        self.update_clip();
    }

    fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.intersect_scissor(Bounds::new(x, y, w, h));
        self.update_clip();
    }

    fn reset_scissor(&mut self) {
        self.state.reset_scissor();
        self.clip = None;
    }
}

/// Converts ttf-parser outlines to tiny-skia paths placed at a pen position
struct GlyphOutline {
    builder: PathBuilder,
    scale: f32,
    origin_x: f32,
    origin_y: f32,
}

impl GlyphOutline {
    fn new(scale: f32, origin_x: f32, origin_y: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            scale,
            origin_x,
            origin_y,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
