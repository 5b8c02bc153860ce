use std::cell::RefCell;
use std::sync::Arc;
use parking_lot::{Mutex, ReentrantMutex};
use ahash::AHashMap;
use tracing::debug;

/// A handler slot. Other threads wait for it; the thread already inside it is skipped.
type SharedHandler = Arc<ReentrantMutex<RefCell<Box<dyn EventHandler>>>>;

/// Event bus shared by the controllers of a page.
///
/// The handler map is only locked to subscribe or to take a snapshot, so
/// handlers may publish, subscribe or dispose controllers while they run.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<SharedHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by rotation controllers
pub mod events {
    use super::Event;
    use crate::rotation::{AutoRotationState, ControllerId};

    /// The current position moved
    #[derive(Debug, Clone, PartialEq)]
    pub struct PositionChanged {
        pub controller_id: ControllerId,
        pub previous: Option<usize>,
        pub current: Option<usize>,
    }

    /// The auto-rotation state machine changed state
    #[derive(Debug, Clone, PartialEq)]
    pub struct AutoRotationChanged {
        pub controller_id: ControllerId,
        pub from: AutoRotationState,
        pub to: AutoRotationState,
    }

    /// The item source replaced the sequence
    #[derive(Debug, Clone, PartialEq)]
    pub struct SequenceReplaced {
        pub controller_id: ControllerId,
        pub len: usize,
    }

    /// The controller released its resources
    #[derive(Debug, Clone, PartialEq)]
    pub struct ControllerDisposed {
        pub controller_id: ControllerId,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        PositionChanged,
        AutoRotationChanged,
        SequenceReplaced,
        ControllerDisposed
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers
            .entry(type_id)
            .or_insert_with(Vec::new)
            .push(Arc::new(ReentrantMutex::new(RefCell::new(handler))));
    }

    /// Subscribe a closure that only sees events of type `E`
    pub fn subscribe_fn<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event.
    ///
    /// A handler that publishes an event of the type it is currently handling
    /// does not see that nested event.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let snapshot = self
            .handlers
            .lock()
            .get(&type_id)
            .cloned()
            .unwrap_or_default();

        for slot in snapshot {
            let guard = slot.lock();
            let Ok(mut handler) = guard.try_borrow_mut() else {
                debug!(event = std::any::type_name::<E>(), "handler already running, nested event skipped");
                continue;
            };
            handler.handle(&event);
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.lock().len())
            .finish()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
