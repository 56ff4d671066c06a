//! Bounded single-line text rendering and text bounds
//!
//! Text is positioned inside a box by its alignment: LEFT/CENTER/RIGHT put
//! the anchor at 0, 1/2 or 1 of the width; TOP/MIDDLE/BOTTOM at 0, 1/2 or 1
//! of the height. BASELINE anchors like BOTTOM shifted by a quarter of the
//! text height.

use trellis_core::{Bounds, Color, HorizontalAlign, TextState, Vec2, VerticalAlign};
use trellis_text::{TextAlign, DEFAULT_FONT};

use crate::context::DrawContext;

/// Font and alignment for one line of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle<'a> {
    pub font: &'a str,
    pub font_size: f32,
    pub color: Color,
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl<'a> LineStyle<'a> {
    pub fn new(font: &'a str, font_size: f32, color: Color) -> Self {
        Self {
            font,
            font_size,
            color,
            horizontal: HorizontalAlign::default(),
            vertical: VerticalAlign::default(),
        }
    }

    pub fn with_align(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Style of a text state; a missing font selects the default font
    pub fn from_state(state: &'a TextState) -> Self {
        Self {
            font: state.font.as_deref().unwrap_or(DEFAULT_FONT),
            font_size: state.font_size,
            color: state.text_color,
            horizontal: state.horizontal_align,
            vertical: state.vertical_align,
        }
    }
}

/// Text placement computed for a box: the alignment anchor and the top-left
/// corner, each with the text size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    pub anchor: Bounds,
    pub top_left: Bounds,
}

impl TextBounds {
    /// `[ax, ay, w, h, x, y, w, h]`
    pub fn to_array(&self) -> [f32; 8] {
        let a = self.anchor;
        let t = self.top_left;
        [a.x, a.y, a.width, a.height, t.x, t.y, t.width, t.height]
    }
}

/// Draw one line of text inside `bounds`.
///
/// With `hide` set only the part of the first row that fits the box width
/// is drawn; otherwise the whole string is drawn and may overflow. A fully
/// transparent color draws in opaque black.
pub fn render_text_line_to_bounds<C>(ctx: &mut C, bounds: Bounds, style: &LineStyle<'_>, text: &str, hide: bool)
where
    C: DrawContext + ?Sized,
{
    ctx.font_size(style.font_size);
    ctx.font_face(style.font);
    align_text_in_box(ctx, style.horizontal, style.vertical);

    let mut line = text;
    if hide {
        if let Some(row) = ctx.text_break_lines(text, bounds.width, 1).first() {
            line = text.get(row.start..row.end).unwrap_or(text);
        }
    }

    let x = bounds.x + bounds.width * style.horizontal.index() as f32 / 2.0;
    let y = bounds.y + bounds.height * style.vertical.index() as f32 / 2.0;
    let color = if style.color.is_transparent() { Color::BLACK } else { style.color };

    ctx.begin_path();
    ctx.fill_color(color);
    ctx.text(x, y, line);
}

/// [`render_text_line_to_bounds`] hiding text outside the box
pub fn render_text_line_to_bounds_default<C>(ctx: &mut C, bounds: Bounds, style: &LineStyle<'_>, text: &str)
where
    C: DrawContext + ?Sized,
{
    render_text_line_to_bounds(ctx, bounds, style, text, true);
}

/// Draw a text state inside a component box, honoring its padding
pub fn render_text_state_line_to_bounds<C>(ctx: &mut C, pos: Vec2, size: Vec2, state: &TextState, hide: bool)
where
    C: DrawContext + ?Sized,
{
    let pad = state.padding;
    let bounds = Bounds::new(
        pos.x + 0.5 + pad.left,
        pos.y + pad.top,
        size.x - pad.left - pad.right,
        size.y - pad.top - pad.bottom,
    );
    render_text_line_to_bounds(ctx, bounds, &LineStyle::from_state(state), &state.text, hide);
}

/// [`render_text_state_line_to_bounds`] hiding text outside the box
pub fn render_text_state_line_to_bounds_default<C>(ctx: &mut C, pos: Vec2, size: Vec2, state: &TextState)
where
    C: DrawContext + ?Sized,
{
    render_text_state_line_to_bounds(ctx, pos, size, state, true);
}

/// Measure `text` with the context's current font and place it in `bounds`
pub fn calculate_text_bounds_rect<C>(
    ctx: &mut C,
    bounds: Bounds,
    text: &str,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
) -> TextBounds
where
    C: DrawContext + ?Sized,
{
    let [x0, y0, x1, y1] = ctx.text_bounds(bounds.x, bounds.y, text);
    create_bounds(bounds, horizontal, vertical, x1 - x0, y1 - y0)
}

/// Place text of size `tw` x `th` in `bounds`
pub fn create_bounds(
    bounds: Bounds,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    tw: f32,
    th: f32,
) -> TextBounds {
    let (hp, vv, baseline) = align_factors(horizontal, vertical, th);
    let x1 = bounds.x + bounds.width * 0.5 * hp;
    let y1 = bounds.y + bounds.height * 0.5 * vv + baseline;
    place(x1, y1, tw, th, hp, vv, baseline)
}

/// Like [`create_bounds`], offsetting from the origin of measured ink
/// bounds `[xmin, ymin, xmax, ymax]` of a box `w` x `h`
pub fn create_bounds_from_ink(
    w: f32,
    h: f32,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    ink: [f32; 4],
) -> TextBounds {
    let tw = ink[2] - ink[0];
    let th = ink[3] - ink[1];
    let (hp, vv, baseline) = align_factors(horizontal, vertical, th);
    let x1 = ink[0] + (w + tw) * 0.5 * hp;
    let y1 = ink[1] + (h + th) * 0.5 * vv + baseline;
    place(x1, y1, tw, th, hp, vv, baseline)
}

/// Horizontal factor, vertical factor and baseline shift
fn align_factors(horizontal: HorizontalAlign, vertical: VerticalAlign, th: f32) -> (f32, f32, f32) {
    let hp = horizontal.index() as f32;
    let (vv, baseline) = match vertical {
        VerticalAlign::Baseline => (1.0, th / 4.0),
        other => (other.index() as f32, 0.0),
    };
    (hp, vv, baseline)
}

fn place(x1: f32, y1: f32, tw: f32, th: f32, hp: f32, vv: f32, baseline: f32) -> TextBounds {
    TextBounds {
        anchor: Bounds::new(x1, y1, tw, th),
        top_left: Bounds::new(x1 - tw * 0.5 * hp, y1 - th * 0.5 * vv - baseline, tw, th),
    }
}

/// Set the context's text alignment
pub fn align_text_in_box<C>(ctx: &mut C, horizontal: HorizontalAlign, vertical: VerticalAlign)
where
    C: DrawContext + ?Sized,
{
    ctx.text_align(TextAlign::new(horizontal, vertical));
}
