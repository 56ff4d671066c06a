//! Trellis Event - Event Delivery
//!
//! This crate provides:
//! - Lock-free multi-producer event queue
//! - Event processor (queue draining, target resolution, listener dispatch)
//! - Window registry for window-level close listeners

mod queue;
mod processor;
mod window;

pub use queue::MpscQueue;
pub use processor::{
    EventProcessor, DefaultEventProcessor, EventSender,
    ProcessorConfig, TargetlessPolicy, PumpStats, PumpStop,
};
pub use window::{Window, WindowRegistry, WindowSystem};

use trellis_core::{EventKind, ListenerError};

/// Event dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Listener for {kind:?} failed: {source}")]
    Listener {
        kind: EventKind,
        #[source]
        source: ListenerError,
    },
}

pub type Result<T> = std::result::Result<T, EventError>;
