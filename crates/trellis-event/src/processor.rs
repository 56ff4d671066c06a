//! Event processor
//!
//! Drains the event queue once per frame and delivers every event to the
//! listeners its target registered for the event's exact kind.

use std::sync::Arc;

use trellis_core::{ComponentId, ComponentTree, Event, EventKind, EventListener};

use crate::{EventError, MpscQueue, Result, WindowSystem};

/// What the pump does with an event that has no target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetlessPolicy {
    /// Stop the pump and drop everything still queued
    #[default]
    AbortPump,
    /// Drop only the target-less event and keep draining
    SkipEvent,
}

/// Event processor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub targetless: TargetlessPolicy,
    /// Upper bound on events taken from the queue in one pump.
    /// `None` drains until the queue is empty, including events pushed by
    /// listeners during the pump.
    pub max_events_per_pump: Option<usize>,
}

impl ProcessorConfig {
    pub fn with_targetless(mut self, policy: TargetlessPolicy) -> Self {
        self.targetless = policy;
        self
    }

    pub fn with_max_events_per_pump(mut self, limit: usize) -> Self {
        self.max_events_per_pump = Some(limit);
        self
    }
}

/// Why a pump returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStop {
    /// The queue was empty
    Drained,
    /// An event without target aborted the pump
    TargetlessEvent,
    /// `max_events_per_pump` was reached
    Limit,
}

/// Summary of one pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    /// Events delivered to their target
    pub dispatched: usize,
    /// Target-less events dropped under [`TargetlessPolicy::SkipEvent`]
    pub skipped: usize,
    /// Queued events dropped when the pump aborted
    pub discarded: usize,
    /// Component and window listeners invoked
    pub listeners_invoked: usize,
    pub stopped: PumpStop,
}

impl PumpStats {
    fn new() -> Self {
        Self {
            dispatched: 0,
            skipped: 0,
            discarded: 0,
            listeners_invoked: 0,
            stopped: PumpStop::Drained,
        }
    }

    fn taken(&self) -> usize {
        self.dispatched + self.skipped
    }
}

/// Event processor interface
pub trait EventProcessor {
    /// Queue an event; safe to call from any thread through an [`EventSender`]
    fn push_event(&self, event: Event);

    /// Drain the queue, dispatching each event synchronously.
    ///
    /// The first listener error stops the pump and is returned.
    fn process_events(&self, tree: &ComponentTree, windows: &dyn WindowSystem) -> Result<PumpStats>;

    /// Whether events are waiting (advisory)
    fn has_events(&self) -> bool;
}

/// Cloneable producer handle onto a processor's queue
#[derive(Clone)]
pub struct EventSender {
    queue: Arc<MpscQueue<Event>>,
}

impl EventSender {
    pub fn push(&self, event: Event) {
        enqueue(&self.queue, event);
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("pending", &self.queue.len())
            .finish()
    }
}

fn enqueue(queue: &MpscQueue<Event>, event: Event) {
    if event.context().debug {
        tracing::debug!(?event, "Pushing event");
    }
    queue.push(event);
}

/// Default queue-backed event processor
pub struct DefaultEventProcessor {
    queue: Arc<MpscQueue<Event>>,
    config: ProcessorConfig,
}

impl DefaultEventProcessor {
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            queue: Arc::new(MpscQueue::new()),
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Producer handle for other threads and for listeners
    pub fn sender(&self) -> EventSender {
        EventSender {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Approximate number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Invoke the target's listeners for the event kind, in registration order
    fn dispatch(&self, tree: &ComponentTree, target: ComponentId, event: &Event) -> Result<usize> {
        let kind = event.kind();
        let listeners = tree
            .listener_map(target)
            .map(|map| map.get_listeners(kind))
            .unwrap_or_default();

        invoke_all(&listeners, kind, event)
    }

    /// Route a window-close event to the owning window's close listeners
    fn dispatch_window_close(&self, windows: &dyn WindowSystem, event: &Event) -> Result<usize> {
        let handle = event.context().window;
        match windows.window(handle) {
            Some(window) => invoke_all(&window.close_listeners().snapshot(), EventKind::WindowClose, event),
            None => {
                tracing::trace!(?handle, "No window for close event");
                Ok(0)
            }
        }
    }
}

fn invoke_all(
    listeners: &[std::rc::Rc<dyn EventListener>],
    kind: EventKind,
    event: &Event,
) -> Result<usize> {
    for listener in listeners {
        listener
            .process(event)
            .map_err(|source| EventError::Listener { kind, source })?;
    }
    Ok(listeners.len())
}

impl Default for DefaultEventProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventProcessor for DefaultEventProcessor {
    fn push_event(&self, event: Event) {
        enqueue(&self.queue, event);
    }

    fn process_events(&self, tree: &ComponentTree, windows: &dyn WindowSystem) -> Result<PumpStats> {
        let mut stats = PumpStats::new();

        // Re-poll every iteration: events pushed by listeners land in this pump
        loop {
            if let Some(limit) = self.config.max_events_per_pump {
                if stats.taken() >= limit {
                    tracing::warn!(limit, pending = self.queue.len(), "Event pump hit its limit");
                    stats.stopped = PumpStop::Limit;
                    return Ok(stats);
                }
            }

            let Some(event) = self.queue.pop() else {
                break;
            };

            let Some(target) = event.target() else {
                match self.config.targetless {
                    TargetlessPolicy::AbortPump => {
                        stats.discarded = self.queue.clear();
                        tracing::trace!(
                            kind = ?event.kind(),
                            discarded = stats.discarded,
                            "Target-less event, aborting pump"
                        );
                        stats.stopped = PumpStop::TargetlessEvent;
                        return Ok(stats);
                    }
                    TargetlessPolicy::SkipEvent => {
                        tracing::trace!(kind = ?event.kind(), "Skipping target-less event");
                        stats.skipped += 1;
                        continue;
                    }
                }
            };

            stats.listeners_invoked += self.dispatch(tree, target, &event)?;

            if event.kind() == EventKind::WindowClose && windows.is_initialized() {
                stats.listeners_invoked += self.dispatch_window_close(windows, &event)?;
            }
            stats.dispatched += 1;
        }

        Ok(stats)
    }

    fn has_events(&self) -> bool {
        !self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Window, WindowRegistry};
    use std::cell::RefCell;
    use std::rc::Rc;
    use trellis_core::{EventContext, EventPayload, Vec2, WindowHandle};

    fn char_event(target: Option<ComponentId>) -> Event {
        Event::new(target, EventContext::default(), EventPayload::Char { codepoint: 'x' })
    }

    #[test]
    fn test_has_events_tracks_queue() {
        let processor = DefaultEventProcessor::new();
        let tree = ComponentTree::new();
        let windows = WindowRegistry::new();

        assert!(!processor.has_events());
        processor.push_event(char_event(None));
        assert!(processor.has_events());
        assert_eq!(processor.pending(), 1);

        processor.process_events(&tree, &windows).unwrap();
        assert!(!processor.has_events());
    }

    #[test]
    fn test_dead_target_has_no_listeners() {
        let processor = DefaultEventProcessor::new();
        let mut tree = ComponentTree::new();
        let windows = WindowRegistry::new();
        let gone = tree.create(Vec2::ZERO, Vec2::ZERO);
        tree.remove(gone).unwrap();

        processor.push_event(char_event(Some(gone)));
        let stats = processor.process_events(&tree, &windows).unwrap();
        assert_eq!(stats.dispatched, 1);
        assert_eq!(stats.listeners_invoked, 0);
    }

    #[test]
    fn test_close_fallback_needs_initialized_windows() {
        let processor = DefaultEventProcessor::new();
        let mut tree = ComponentTree::new();
        let root = tree.create(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let mut windows = WindowRegistry::new();

        let calls = Rc::new(RefCell::new(0));
        let mut window = Window::new(WindowHandle(9), "main");
        let counter = Rc::clone(&calls);
        window.add_close_listener(move |_: &Event| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        windows.register(window);

        let close = Event::targeted(root, EventContext::new(WindowHandle(9)), EventPayload::WindowClose);

        processor.push_event(close.clone());
        processor.process_events(&tree, &windows).unwrap();
        assert_eq!(*calls.borrow(), 0);

        windows.initialize();
        processor.push_event(close);
        processor.process_events(&tree, &windows).unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_limit_leaves_rest_queued() {
        let processor = DefaultEventProcessor::with_config(
            ProcessorConfig::default().with_max_events_per_pump(2),
        );
        let mut tree = ComponentTree::new();
        let root = tree.create(Vec2::ZERO, Vec2::ZERO);
        let windows = WindowRegistry::new();

        for _ in 0..5 {
            processor.push_event(char_event(Some(root)));
        }

        let stats = processor.process_events(&tree, &windows).unwrap();
        assert_eq!(stats.stopped, PumpStop::Limit);
        assert_eq!(stats.dispatched, 2);
        assert_eq!(processor.pending(), 3);
    }
}
