//! Dispatch tests - queue draining, ordering and fallback routing

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use trellis_core::{
    ComponentId, ComponentTree, Event, EventContext, EventKind, EventPayload, MouseButton,
    ClickAction, Modifiers, Vec2, WindowHandle,
};
use trellis_event::{
    DefaultEventProcessor, EventError, EventProcessor, ProcessorConfig, PumpStop,
    TargetlessPolicy, Window, WindowRegistry,
};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn click(target: Option<ComponentId>) -> Event {
    Event::new(
        target,
        EventContext::new(WindowHandle(1)),
        EventPayload::MouseClick {
            button: MouseButton::Left,
            action: ClickAction::Click,
            position: Vec2::new(1.0, 1.0),
            absolute: Vec2::new(11.0, 11.0),
            mods: Modifiers::default(),
        },
    )
}

fn record(tree: &mut ComponentTree, id: ComponentId, kind: EventKind, log: &Log, name: &'static str) {
    let log = Rc::clone(log);
    tree.listener_map_mut(id).unwrap().add(kind, move |_: &Event| {
        log.borrow_mut().push(name);
        Ok(())
    });
}

fn setup() -> (ComponentTree, ComponentId, ComponentId) {
    let mut tree = ComponentTree::new();
    let root = tree.create(Vec2::ZERO, Vec2::new(800.0, 600.0));
    let button = tree.create(Vec2::new(10.0, 10.0), Vec2::new(80.0, 24.0));
    tree.append_child(root, button).unwrap();
    (tree, root, button)
}

// ============================================================================
// ORDERING
// ============================================================================

#[test]
fn test_listeners_fire_in_registration_order() {
    init_tracing();
    let (mut tree, root, button) = setup();
    let log: Log = Rc::default();
    record(&mut tree, button, EventKind::MouseClick, &log, "b1");
    record(&mut tree, button, EventKind::MouseClick, &log, "b2");
    record(&mut tree, root, EventKind::MouseClick, &log, "root");
    record(&mut tree, button, EventKind::MouseDrag, &log, "drag");

    let processor = DefaultEventProcessor::new();
    processor.push_event(click(Some(button)));
    processor.push_event(click(Some(root)));
    processor.push_event(click(Some(button)));

    let stats = processor.process_events(&tree, &WindowRegistry::new()).unwrap();

    assert_eq!(*log.borrow(), vec!["b1", "b2", "root", "b1", "b2"]);
    assert_eq!(stats.dispatched, 3);
    assert_eq!(stats.listeners_invoked, 5);
    assert_eq!(stats.stopped, PumpStop::Drained);
    assert!(!processor.has_events());
}

#[test]
fn test_events_pushed_by_listeners_drain_in_same_pump() {
    let (mut tree, root, button) = setup();
    let log: Log = Rc::default();
    let processor = DefaultEventProcessor::new();

    let sender = processor.sender();
    let forward_log = Rc::clone(&log);
    tree.listener_map_mut(button).unwrap().add(EventKind::MouseClick, move |_: &Event| {
        forward_log.borrow_mut().push("button");
        sender.push(Event::targeted(
            root,
            EventContext::default(),
            EventPayload::Focus { gained: true, next_focus: None },
        ));
        Ok(())
    });
    record(&mut tree, root, EventKind::Focus, &log, "root-focus");

    processor.push_event(click(Some(button)));
    let stats = processor.process_events(&tree, &WindowRegistry::new()).unwrap();

    assert_eq!(*log.borrow(), vec!["button", "root-focus"]);
    assert_eq!(stats.dispatched, 2);
    assert!(!processor.has_events());
}

// ============================================================================
// TARGET-LESS EVENTS
// ============================================================================

#[test]
fn test_targetless_event_aborts_whole_pump() {
    let (mut tree, root, button) = setup();
    let log: Log = Rc::default();
    record(&mut tree, button, EventKind::MouseClick, &log, "A");
    record(&mut tree, root, EventKind::MouseClick, &log, "B");

    let processor = DefaultEventProcessor::new();
    processor.push_event(click(Some(button)));
    processor.push_event(click(None));
    processor.push_event(click(Some(root)));

    let stats = processor.process_events(&tree, &WindowRegistry::new()).unwrap();

    assert_eq!(*log.borrow(), vec!["A"]);
    assert_eq!(stats.stopped, PumpStop::TargetlessEvent);
    assert_eq!(stats.discarded, 1);
    assert!(!processor.has_events());
}

#[test]
fn test_push_accepts_targetless_event() {
    let processor = DefaultEventProcessor::new();
    processor.push_event(click(None));
    assert!(processor.has_events());
}

#[test]
fn test_skip_policy_keeps_draining() {
    let (mut tree, root, button) = setup();
    let log: Log = Rc::default();
    record(&mut tree, button, EventKind::MouseClick, &log, "A");
    record(&mut tree, root, EventKind::MouseClick, &log, "B");

    let processor = DefaultEventProcessor::with_config(
        ProcessorConfig::default().with_targetless(TargetlessPolicy::SkipEvent),
    );
    processor.push_event(click(Some(button)));
    processor.push_event(click(None));
    processor.push_event(click(Some(root)));

    let stats = processor.process_events(&tree, &WindowRegistry::new()).unwrap();

    assert_eq!(*log.borrow(), vec!["A", "B"]);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.stopped, PumpStop::Drained);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_listener_error_propagates_and_stops_pump() {
    let (mut tree, root, button) = setup();
    let log: Log = Rc::default();
    tree.listener_map_mut(button)
        .unwrap()
        .add(EventKind::MouseClick, |_: &Event| Err("listener failed".into()));
    record(&mut tree, button, EventKind::MouseClick, &log, "after-failure");
    record(&mut tree, root, EventKind::MouseClick, &log, "root");

    let processor = DefaultEventProcessor::new();
    processor.push_event(click(Some(button)));
    processor.push_event(click(Some(root)));

    let err = processor.process_events(&tree, &WindowRegistry::new()).unwrap_err();
    match &err {
        EventError::Listener { kind, .. } => assert_eq!(*kind, EventKind::MouseClick),
    }
    assert!(err.to_string().contains("listener failed"));
    assert!(log.borrow().is_empty());

    // The event behind the failure is still queued for the next pump
    assert!(processor.has_events());
    processor.process_events(&tree, &WindowRegistry::new()).unwrap();
    assert_eq!(*log.borrow(), vec!["root"]);
}

// ============================================================================
// WINDOW CLOSE FALLBACK
// ============================================================================

#[test]
fn test_window_close_reaches_component_then_window() {
    let (mut tree, root, _button) = setup();
    let log: Log = Rc::default();
    record(&mut tree, root, EventKind::WindowClose, &log, "component");

    let mut windows = WindowRegistry::new();
    windows.initialize();
    let mut window = Window::new(WindowHandle(1), "main");
    for name in ["window-1", "window-2"] {
        let log = Rc::clone(&log);
        window.add_close_listener(move |_: &Event| {
            log.borrow_mut().push(name);
            Ok(())
        });
    }
    windows.register(window);

    let processor = DefaultEventProcessor::new();
    processor.push_event(Event::targeted(root, EventContext::new(WindowHandle(1)), EventPayload::WindowClose));
    let stats = processor.process_events(&tree, &windows).unwrap();

    assert_eq!(*log.borrow(), vec!["component", "window-1", "window-2"]);
    assert_eq!(stats.listeners_invoked, 3);
}

#[test]
fn test_window_close_for_unknown_window_is_skipped() {
    let (mut tree, root, _button) = setup();
    let log: Log = Rc::default();
    record(&mut tree, root, EventKind::WindowClose, &log, "component");

    let mut windows = WindowRegistry::new();
    windows.initialize();

    let processor = DefaultEventProcessor::new();
    processor.push_event(Event::targeted(root, EventContext::new(WindowHandle(42)), EventPayload::WindowClose));
    processor.process_events(&tree, &windows).unwrap();

    assert_eq!(*log.borrow(), vec!["component"]);
}

#[test]
fn test_other_kinds_do_not_reach_window_listeners() {
    let (tree, root, _button) = setup();
    let calls = Rc::new(RefCell::new(0));

    let mut windows = WindowRegistry::new();
    windows.initialize();
    let mut window = Window::new(WindowHandle(1), "main");
    let counter = Rc::clone(&calls);
    window.add_close_listener(move |_: &Event| {
        *counter.borrow_mut() += 1;
        Ok(())
    });
    windows.register(window);

    let processor = DefaultEventProcessor::new();
    processor.push_event(Event::targeted(
        root,
        EventContext::new(WindowHandle(1)),
        EventPayload::WindowSize { width: 640, height: 480 },
    ));
    processor.process_events(&tree, &windows).unwrap();

    assert_eq!(*calls.borrow(), 0);
}

// ============================================================================
// CONCURRENT PRODUCERS
// ============================================================================

#[test]
fn test_pushes_from_many_threads_are_all_delivered() {
    let (mut tree, _root, button) = setup();
    let count = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&count);
    tree.listener_map_mut(button).unwrap().add(EventKind::Key, move |_: &Event| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    let processor = DefaultEventProcessor::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sender = processor.sender();
            thread::spawn(move || {
                for key in 0..250 {
                    sender.push(Event::targeted(
                        button,
                        EventContext::new(WindowHandle(1)).with_debug(true),
                        EventPayload::Key {
                            key,
                            scancode: 0,
                            action: trellis_core::KeyAction::Press,
                            mods: Modifiers::default(),
                        },
                    ));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = processor.process_events(&tree, &WindowRegistry::new()).unwrap();
    assert_eq!(stats.dispatched, 1000);
    assert_eq!(*count.borrow(), 1000);
    assert!(!processor.has_events());
}
