//! Rectangles, strokes and shadows

use trellis_core::{Bounds, Color, Vec2};

use crate::context::{DrawContext, Winding};

/// Shadow spread beyond the box on each side
const SHADOW_SPREAD: f32 = 10.0;
/// Shadow drop below the box
const SHADOW_OFFSET: f32 = 2.0;

/// Fill a rectangle with a solid color
pub fn draw_rectangle<C>(ctx: &mut C, color: Color, x: f32, y: f32, w: f32, h: f32)
where
    C: DrawContext + ?Sized,
{
    ctx.begin_path();
    ctx.fill_color(color);
    ctx.rect(x, y, w, h);
    ctx.fill();
}

pub fn draw_rectangle_bounds<C>(ctx: &mut C, color: Color, bounds: Bounds)
where
    C: DrawContext + ?Sized,
{
    draw_rectangle(ctx, color, bounds.x, bounds.y, bounds.width, bounds.height);
}

pub fn draw_rectangle_at<C>(ctx: &mut C, color: Color, position: Vec2, size: Vec2)
where
    C: DrawContext + ?Sized,
{
    draw_rectangle(ctx, color, position.x, position.y, size.x, size.y);
}

/// Stroke the outline of a rounded rectangle
pub fn draw_rect_stroke<C>(
    ctx: &mut C,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: Color,
    radius: f32,
    stroke_width: f32,
) where
    C: DrawContext + ?Sized,
{
    ctx.begin_path();
    ctx.stroke_width(stroke_width);
    ctx.rounded_rect(x, y, w, h, radius);
    ctx.stroke_color(color);
    ctx.stroke();
}

pub fn draw_rect_stroke_bounds<C>(ctx: &mut C, bounds: Bounds, color: Color, radius: f32, stroke_width: f32)
where
    C: DrawContext + ?Sized,
{
    draw_rect_stroke(ctx, bounds.x, bounds.y, bounds.width, bounds.height, color, radius, stroke_width);
}

pub fn draw_rect_stroke_at<C>(ctx: &mut C, position: Vec2, size: Vec2, color: Color, radius: f32, stroke_width: f32)
where
    C: DrawContext + ?Sized,
{
    draw_rect_stroke(ctx, position.x, position.y, size.x, size.y, color, radius, stroke_width);
}

/// Soft shadow around a rounded box.
///
/// The shadow is a box gradient fading from `color` to transparent, filled
/// around the box with the box itself cut out.
pub fn drop_shadow<C>(ctx: &mut C, x: f32, y: f32, w: f32, h: f32, corner_radius: f32, color: Color)
where
    C: DrawContext + ?Sized,
{
    let paint = ctx.box_gradient(
        Bounds::new(x, y + SHADOW_OFFSET, w, h),
        corner_radius * 2.0,
        SHADOW_SPREAD,
        color,
        Color::TRANSPARENT,
    );
    ctx.begin_path();
    ctx.rect(
        x - SHADOW_SPREAD,
        y - SHADOW_SPREAD,
        w + SHADOW_SPREAD * 2.0,
        h + SHADOW_SPREAD * 3.0,
    );
    ctx.rounded_rect(x, y, w, h, corner_radius);
    ctx.path_winding(Winding::Hole);
    ctx.fill_paint(paint);
    ctx.fill();
}
