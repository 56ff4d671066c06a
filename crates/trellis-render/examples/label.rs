//! Example: pump a click through the event processor and render the result
//!
//! Run with `RUST_LOG=debug` to see dispatch logging. Writes `label.png` to
//! the system temp directory.

use std::cell::Cell;
use std::rc::Rc;

use trellis_core::{
    ClickAction, Color, ComponentTree, Event, EventContext, EventKind, EventPayload, Hierarchy,
    HorizontalAlign, Modifiers, MouseButton, TextState, Vec2, VerticalAlign, WindowHandle,
};
use trellis_event::{DefaultEventProcessor, EventProcessor, WindowRegistry};
use trellis_render::{
    SkiaCanvas, draw_in_scissor, draw_rect_stroke_at, draw_rectangle_at, drop_shadow,
    render_text_state_line_to_bounds_default, visible_in_parents,
};
use trellis_text::FontRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut tree = ComponentTree::new();
    let frame = tree.create(Vec2::ZERO, Vec2::new(320.0, 120.0));
    let button = tree.create(Vec2::new(40.0, 40.0), Vec2::new(240.0, 40.0));
    tree.append_child(frame, button)?;

    let clicks = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&clicks);
    if let Some(listeners) = tree.listener_map_mut(button) {
        listeners.add(EventKind::MouseClick, move |_: &Event| {
            counter.set(counter.get() + 1);
            Ok(())
        });
    }

    let processor = DefaultEventProcessor::new();
    let context = EventContext::new(WindowHandle(1)).with_debug(true);
    for _ in 0..3 {
        processor.push_event(Event::targeted(
            button,
            context,
            EventPayload::MouseClick {
                button: MouseButton::Left,
                action: ClickAction::Click,
                position: Vec2::new(10.0, 10.0),
                absolute: Vec2::new(50.0, 50.0),
                mods: Modifiers::default(),
            },
        ));
    }
    let stats = processor.process_events(&tree, &WindowRegistry::new())?;
    println!("Dispatched {} events", stats.dispatched);

    let mut canvas = SkiaCanvas::with_fonts(320, 120, FontRegistry::with_system_fonts())?
        .with_background(Color::from_hex("#f0f0f0").unwrap_or(Color::WHITE));

    let position = tree.absolute_position(button);
    let size = tree.size(button);
    let label = TextState::new(format!("Clicked {} times", clicks.get()))
        .with_font_size(18.0)
        .with_align(HorizontalAlign::Center, VerticalAlign::Middle);

    if visible_in_parents(&tree, button) {
        drop_shadow(&mut canvas, position.x, position.y, size.x, size.y, 6.0, Color::rgba(0.0, 0.0, 0.0, 0.4));
        draw_in_scissor(&mut canvas, &tree, button, |ctx| {
            draw_rectangle_at(ctx, Color::WHITE, position, size);
            draw_rect_stroke_at(ctx, position, size, Color::rgb(0.2, 0.4, 0.8), 6.0, 2.0);
            render_text_state_line_to_bounds_default(ctx, position, size, &label);
        });
    }

    let path = std::env::temp_dir().join("label.png");
    canvas.save_png(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
