//! Scissor management and ancestor visibility
//!
//! A component is clipped to its parent's box intersected with every
//! further ancestor's box, all in absolute coordinates.

use std::ops::{Deref, DerefMut};

use trellis_core::{Bounds, ComponentId, Hierarchy, Vec2};

use crate::context::DrawContext;

/// Effective clip rectangle for drawing `component`, `None` for a root
pub fn scissor_for<H: Hierarchy>(tree: &H, component: ComponentId) -> Option<Bounds> {
    let parent = tree.parent(component)?;
    let clip = tree
        .ancestors(parent)
        .fold(tree.absolute_bounds(parent), |clip, ancestor| {
            clip.intersect(&tree.absolute_bounds(ancestor))
        });
    Some(clip)
}

/// Set the scissor for drawing `component` (no-op for a root)
pub fn create_scissor<C, H>(ctx: &mut C, tree: &H, component: ComponentId)
where
    C: DrawContext + ?Sized,
    H: Hierarchy,
{
    create_scissor_by_parent(ctx, tree, tree.parent(component));
}

/// Set the scissor to `parent` and intersect it with each of its ancestors
pub fn create_scissor_by_parent<C, H>(ctx: &mut C, tree: &H, parent: Option<ComponentId>)
where
    C: DrawContext + ?Sized,
    H: Hierarchy,
{
    let Some(parent) = parent else {
        return;
    };
    create_scissor_bounds(ctx, tree.absolute_bounds(parent));
    for ancestor in tree.ancestors(parent) {
        intersect_scissor(ctx, tree.absolute_bounds(ancestor));
    }
}

pub fn create_scissor_bounds<C>(ctx: &mut C, bounds: Bounds)
where
    C: DrawContext + ?Sized,
{
    ctx.scissor(bounds.x, bounds.y, bounds.width, bounds.height);
}

pub fn intersect_scissor<C>(ctx: &mut C, bounds: Bounds)
where
    C: DrawContext + ?Sized,
{
    ctx.intersect_scissor(bounds.x, bounds.y, bounds.width, bounds.height);
}

pub fn reset_scissor<C>(ctx: &mut C)
where
    C: DrawContext + ?Sized,
{
    ctx.reset_scissor();
}

/// Drawing context borrowed under a scissor; resets the scissor on drop
pub struct ScissorGuard<'a, C: DrawContext + ?Sized> {
    ctx: &'a mut C,
}

impl<C: DrawContext + ?Sized> Deref for ScissorGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.ctx
    }
}

impl<C: DrawContext + ?Sized> DerefMut for ScissorGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for ScissorGuard<'_, C> {
    fn drop(&mut self) {
        self.ctx.reset_scissor();
    }
}

/// Set the scissor for `component` until the returned guard is dropped
pub fn scissor_scope<'a, C, H>(ctx: &'a mut C, tree: &H, component: ComponentId) -> ScissorGuard<'a, C>
where
    C: DrawContext + ?Sized,
    H: Hierarchy,
{
    create_scissor(ctx, tree, component);
    ScissorGuard { ctx }
}

/// Run `draw` clipped to `component`'s ancestors.
///
/// The scissor is reset however `draw` exits, including by panic.
pub fn draw_in_scissor<C, H, R>(ctx: &mut C, tree: &H, component: ComponentId, draw: impl FnOnce(&mut C) -> R) -> R
where
    C: DrawContext + ?Sized,
    H: Hierarchy,
{
    let mut guard = scissor_scope(ctx, tree, component);
    draw(&mut guard)
}

/// Whether `component` overlaps every ancestor's box.
///
/// Ancestor boxes are rebuilt from the root down by summing local
/// positions. Edges touching counts as overlap.
pub fn visible_in_parents<H: Hierarchy>(tree: &H, component: ComponentId) -> bool {
    let ancestors: Vec<ComponentId> = tree.ancestors(component).collect();
    if ancestors.is_empty() {
        return true;
    }

    let target = tree.absolute_bounds(component);
    let mut pos = Vec2::ZERO;
    for &ancestor in ancestors.iter().rev() {
        pos = pos + tree.position(ancestor);
        let rect = Bounds::from_pos_size(pos, tree.size(ancestor));
        if !target.overlaps(&rect) {
            tracing::trace!("{:?} is outside ancestor {:?}", component, ancestor);
            return false;
        }
    }
    true
}
