//! Rotation controller implementation

use super::timer::RotationTimer;
use super::{AutoRotationState, Direction, GestureState, PositionChange, Renderer};
use crate::config::RotationConfig;
use crate::error::{Result, RotationError};
use crate::events::events::{AutoRotationChanged, ControllerDisposed, PositionChanged, SequenceReplaced};
use crate::events::EventBus;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier attached to a controller's logs and events
pub type ControllerId = Uuid;

/// Controller state stored internally
struct ControllerState<T> {
    sequence: Arc<[T]>,
    position: Option<usize>,
    auto_state: AutoRotationState,
    gesture: GestureState,
    timer: Option<RotationTimer>,
    timer_generation: u64,
    renderer: Option<Arc<dyn Renderer<T>>>,
    /// Set while the renderer and event handlers run
    notifying: bool,
}

struct PendingChange<T> {
    renderer: Arc<dyn Renderer<T>>,
    sequence: Arc<[T]>,
    previous: Option<usize>,
    current: Option<usize>,
}

enum PendingEvent {
    AutoRotation(AutoRotationChanged),
    Sequence(SequenceReplaced),
}

/// Notifications collected while the state is borrowed, delivered after the borrow ends
struct Outbox<T> {
    change: Option<PendingChange<T>>,
    events: Vec<PendingEvent>,
}

impl<T> Outbox<T> {
    fn new() -> Self {
        Self { change: None, events: Vec::new() }
    }

    fn is_empty(&self) -> bool {
        self.change.is_none() && self.events.is_empty()
    }
}

/// Clears the notifying flag once delivery finishes, even if the renderer panics
struct NotifyScope<'a, T> {
    cell: &'a RefCell<ControllerState<T>>,
}

impl<T> Drop for NotifyScope<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.cell.try_borrow_mut() {
            state.notifying = false;
        }
    }
}

struct Shared<T> {
    id: ControllerId,
    config: RotationConfig,
    runtime: Option<Handle>,
    events: Option<Arc<EventBus>>,
    state: ReentrantMutex<RefCell<ControllerState<T>>>,
}

/// Builder for [`RotationController`]
pub struct RotationControllerBuilder<T> {
    config: RotationConfig,
    events: Option<Arc<EventBus>>,
    runtime: Option<Handle>,
    _items: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for RotationControllerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationControllerBuilder")
            .field("config", &self.config)
            .field("events", &self.events.is_some())
            .field("runtime", &self.runtime.is_some())
            .finish()
    }
}

impl<T: Send + Sync + 'static> RotationControllerBuilder<T> {
    pub fn new(config: RotationConfig) -> Self {
        Self { config, events: None, runtime: None, _items: PhantomData }
    }

    /// Publish rotation events on `bus`
    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    /// Run the auto-rotation timer on `handle` instead of the ambient runtime
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Validate the configuration, create the controller and issue the initial notification
    pub fn build<S>(self, sequence: S, renderer: Arc<dyn Renderer<T>>) -> Result<RotationController<T>>
    where
        S: Into<Arc<[T]>>,
    {
        self.config.validate()?;

        let runtime = self.runtime.or_else(|| Handle::try_current().ok());
        if self.config.auto_rotate && runtime.is_none() {
            return Err(RotationError::InvalidConfiguration(
                "auto-rotation requires a tokio runtime".to_string(),
            ));
        }

        let sequence: Arc<[T]> = sequence.into();
        let position = if sequence.is_empty() { None } else { Some(0) };

        let state = ControllerState {
            sequence,
            position,
            auto_state: AutoRotationState::Stopped,
            gesture: GestureState::default(),
            timer: None,
            timer_generation: 0,
            renderer: Some(renderer),
            notifying: false,
        };

        let controller = RotationController {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                config: self.config,
                runtime,
                events: self.events,
                state: ReentrantMutex::new(RefCell::new(state)),
            }),
        };

        controller.shared.initialize()?;
        Ok(controller)
    }
}

/// Owns the current position within a sequence and moves it on command,
/// on swipe, or on a timer.
///
/// Every operation is atomic with respect to every other one, including the
/// timer callback, and the renderer is notified before the operation returns.
/// At most one timer is live at any time. Dropping the controller disposes it.
pub struct RotationController<T: Send + Sync + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> RotationController<T> {
    /// Create a controller on the ambient tokio runtime (if any)
    pub fn new<S>(sequence: S, config: RotationConfig, renderer: Arc<dyn Renderer<T>>) -> Result<Self>
    where
        S: Into<Arc<[T]>>,
    {
        RotationControllerBuilder::new(config).build(sequence, renderer)
    }

    pub fn builder(config: RotationConfig) -> RotationControllerBuilder<T> {
        RotationControllerBuilder::new(config)
    }

    /// Advance to the next item, wrapping to the first
    pub fn next(&self) -> Result<()> {
        self.shared.run(|shared, state, outbox| {
            shared.step(state, outbox, Direction::Next, true);
            Ok(())
        })
    }

    /// Go back to the previous item, wrapping to the last
    pub fn previous(&self) -> Result<()> {
        self.shared.run(|shared, state, outbox| {
            shared.step(state, outbox, Direction::Previous, true);
            Ok(())
        })
    }

    /// Jump to `index`
    pub fn go_to(&self, index: usize) -> Result<()> {
        self.shared.run(|shared, state, outbox| {
            let len = state.sequence.len();
            if index >= len {
                return Err(RotationError::IndexOutOfRange { index, len });
            }

            let previous = state.position;
            state.position = Some(index);
            shared.queue_change(state, outbox, previous, Some(index));
            shared.reset_timer(state);
            Ok(())
        })
    }

    /// Record the start of a touch
    pub fn gesture_start(&self, x: f64) -> Result<()> {
        self.shared.run(|_, state, _| {
            state.gesture.begin(x);
            Ok(())
        })
    }

    /// Finish a touch and navigate if it was a swipe.
    ///
    /// Returns the direction navigated, if any.
    pub fn gesture_end(&self, x: f64) -> Result<Option<Direction>> {
        self.shared.run(|shared, state, outbox| {
            let Some(direction) = state.gesture.finish(x, shared.config.swipe_threshold()) else {
                return Ok(None);
            };
            let moved = shared.step(state, outbox, direction, true);
            Ok(moved.then_some(direction))
        })
    }

    /// Suspend auto-rotation without turning it off
    pub fn pause(&self) -> Result<()> {
        self.shared.run(|shared, state, outbox| {
            if state.auto_state == AutoRotationState::Running {
                Shared::cancel_timer(state);
                shared.transition(state, outbox, AutoRotationState::Paused);
            }
            Ok(())
        })
    }

    /// Restart a paused auto-rotation from a full interval
    pub fn resume(&self) -> Result<()> {
        self.shared.run(|shared, state, outbox| {
            if state.auto_state == AutoRotationState::Paused {
                shared.start_timer(state);
                shared.transition(state, outbox, AutoRotationState::Running);
            }
            Ok(())
        })
    }

    /// Replace the sequence and reset to its first item
    pub fn set_sequence<S>(&self, sequence: S) -> Result<()>
    where
        S: Into<Arc<[T]>>,
    {
        let sequence: Arc<[T]> = sequence.into();
        self.shared.run(move |shared, state, outbox| {
            Shared::cancel_timer(state);
            state.gesture.clear();

            let previous = state.position;
            let len = sequence.len();
            state.sequence = sequence;
            state.position = if len == 0 { None } else { Some(0) };

            let next_state = if shared.config.auto_rotate && len > 1 {
                shared.start_timer(state);
                AutoRotationState::Running
            } else {
                AutoRotationState::Stopped
            };
            shared.transition(state, outbox, next_state);

            debug!(controller = %shared.id, len, "sequence replaced");
            outbox.events.push(PendingEvent::Sequence(SequenceReplaced {
                controller_id: shared.id,
                len,
            }));
            shared.queue_change(state, outbox, previous, state.position);
            Ok(())
        })
    }

    /// Cancel the timer and release the sequence and renderer. Idempotent.
    pub fn dispose(&self) {
        self.shared.dispose();
    }

    pub fn id(&self) -> ControllerId {
        self.shared.id
    }

    pub fn config(&self) -> &RotationConfig {
        &self.shared.config
    }

    /// Current position, `None` for an empty (or disposed) controller
    pub fn position(&self) -> Option<usize> {
        self.shared.with_state(|state| state.position)
    }

    pub fn len(&self) -> usize {
        self.shared.with_state(|state| state.sequence.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn auto_rotation_state(&self) -> AutoRotationState {
        self.shared.with_state(|state| state.auto_state)
    }

    pub fn is_disposed(&self) -> bool {
        self.auto_rotation_state() == AutoRotationState::Disposed
    }

    /// The item at the current position
    pub fn current_item(&self) -> Option<T>
    where
        T: Clone,
    {
        self.shared.with_state(|state| {
            state.position.and_then(|idx| state.sequence.get(idx).cloned())
        })
    }
}

impl<T: Send + Sync + 'static> Drop for RotationController<T> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for RotationController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.shared.with_state(|state| {
            f.debug_struct("RotationController")
                .field("id", &self.shared.id)
                .field("position", &state.position)
                .field("len", &state.sequence.len())
                .field("auto_state", &state.auto_state)
                .finish()
        })
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    fn initialize(self: &Arc<Self>) -> Result<()> {
        let guard = self.state.lock();
        let mut outbox = Outbox::new();
        {
            let mut state = guard.borrow_mut();
            debug!(
                controller = %self.id,
                len = state.sequence.len(),
                auto_rotate = self.config.auto_rotate,
                "rotation controller created"
            );

            if self.config.auto_rotate && state.sequence.len() > 1 {
                self.start_timer(&mut state);
                self.transition(&mut state, &mut outbox, AutoRotationState::Running);
            }
            let current = state.position;
            self.queue_change(&state, &mut outbox, None, current);
        }
        self.deliver(&guard, outbox)
    }

    /// Run a mutating operation under the lock, then deliver its notifications
    fn run<R, F>(self: &Arc<Self>, op: F) -> Result<R>
    where
        F: FnOnce(&Arc<Self>, &mut ControllerState<T>, &mut Outbox<T>) -> Result<R>,
    {
        let guard = self.state.lock();
        let mut outbox = Outbox::new();
        let value = {
            let mut state = guard.try_borrow_mut().map_err(|_| RotationError::Reentrant)?;
            if state.notifying {
                return Err(RotationError::Reentrant);
            }
            if state.auto_state == AutoRotationState::Disposed {
                return Err(RotationError::ControllerDisposed);
            }
            op(self, &mut *state, &mut outbox)?
        };
        self.deliver(&guard, outbox)?;
        Ok(value)
    }

    fn with_state<R>(&self, f: impl FnOnce(&ControllerState<T>) -> R) -> R {
        let guard = self.state.lock();
        let state = guard.borrow();
        f(&state)
    }

    /// Move one step; returns whether the position changed
    fn step(
        self: &Arc<Self>,
        state: &mut ControllerState<T>,
        outbox: &mut Outbox<T>,
        direction: Direction,
        manual: bool,
    ) -> bool {
        let len = state.sequence.len();
        if len <= 1 {
            return false;
        }

        let previous = state.position.unwrap_or(0);
        let current = direction.apply(previous, len);
        state.position = Some(current);
        self.queue_change(state, outbox, Some(previous), Some(current));

        if manual {
            self.reset_timer(state);
        }
        true
    }

    /// Push the next auto-advance a full interval out after manual navigation
    fn reset_timer(self: &Arc<Self>, state: &mut ControllerState<T>) {
        if state.auto_state == AutoRotationState::Running {
            self.start_timer(state);
            debug!(controller = %self.id, "auto-rotation timer reset");
        }
    }

    /// Cancel any live timer and start a new one
    fn start_timer(self: &Arc<Self>, state: &mut ControllerState<T>) {
        Self::cancel_timer(state);
        let Some(runtime) = &self.runtime else {
            return;
        };

        state.timer_generation += 1;
        let generation = state.timer_generation;
        let weak = Arc::downgrade(self);

        state.timer = Some(RotationTimer::spawn(
            runtime,
            self.config.rotation_interval(),
            generation,
            move || {
                weak.upgrade()
                    .map(|shared| shared.on_timer_tick(generation))
                    .unwrap_or(false)
            },
        ));
    }

    fn cancel_timer(state: &mut ControllerState<T>) {
        if let Some(timer) = state.timer.take() {
            debug!(generation = timer.generation(), "auto-rotation timer cancelled");
        }
    }

    /// Timer callback; returns whether the timer should keep running
    fn on_timer_tick(self: &Arc<Self>, generation: u64) -> bool {
        let guard = self.state.lock();
        let mut outbox = Outbox::new();
        {
            let Ok(mut state) = guard.try_borrow_mut() else {
                return true;
            };
            if state.auto_state != AutoRotationState::Running || state.timer_generation != generation {
                return false;
            }
            if state.notifying {
                return true;
            }

            self.step(&mut state, &mut outbox, Direction::Next, false);
            debug!(controller = %self.id, position = ?state.position, "auto-rotation advanced");
        }

        if let Err(e) = self.deliver(&guard, outbox) {
            warn!(controller = %self.id, error = %e, "renderer failed during auto-rotation");
        }
        true
    }

    fn transition(&self, state: &mut ControllerState<T>, outbox: &mut Outbox<T>, to: AutoRotationState) {
        let from = state.auto_state;
        if from == to {
            return;
        }

        state.auto_state = to;
        debug!(controller = %self.id, ?from, ?to, "auto-rotation state changed");
        outbox.events.push(PendingEvent::AutoRotation(AutoRotationChanged {
            controller_id: self.id,
            from,
            to,
        }));
    }

    fn queue_change(
        &self,
        state: &ControllerState<T>,
        outbox: &mut Outbox<T>,
        previous: Option<usize>,
        current: Option<usize>,
    ) {
        if let Some(renderer) = &state.renderer {
            outbox.change = Some(PendingChange {
                renderer: renderer.clone(),
                sequence: state.sequence.clone(),
                previous,
                current,
            });
        }
    }

    /// Publish events and notify the renderer with the state borrow released
    fn deliver(&self, cell: &RefCell<ControllerState<T>>, outbox: Outbox<T>) -> Result<()> {
        if outbox.is_empty() {
            return Ok(());
        }

        cell.borrow_mut().notifying = true;
        let _scope = NotifyScope { cell };

        if let Some(bus) = &self.events {
            for event in outbox.events {
                match event {
                    PendingEvent::AutoRotation(event) => bus.publish(event),
                    PendingEvent::Sequence(event) => bus.publish(event),
                }
            }
            if let Some(change) = &outbox.change {
                bus.publish(PositionChanged {
                    controller_id: self.id,
                    previous: change.previous,
                    current: change.current,
                });
            }
        }

        if cell.borrow().auto_state == AutoRotationState::Disposed {
            return Ok(());
        }
        if let Some(change) = outbox.change {
            change.renderer.on_position_changed(&PositionChange {
                previous: change.previous,
                current: change.current,
                sequence: &change.sequence,
            })?;
        }
        Ok(())
    }

    fn dispose(&self) {
        let guard = self.state.lock();
        let from = {
            // Only fails if called from inside one of this controller's own operations
            let Ok(mut state) = guard.try_borrow_mut() else {
                return;
            };
            if state.auto_state == AutoRotationState::Disposed {
                return;
            }

            Self::cancel_timer(&mut state);
            let from = state.auto_state;
            state.auto_state = AutoRotationState::Disposed;
            state.sequence = Arc::from(Vec::new());
            state.position = None;
            state.renderer = None;
            state.gesture.clear();
            from
        };

        debug!(controller = %self.id, ?from, "rotation controller disposed");

        if let Some(bus) = &self.events {
            bus.publish(AutoRotationChanged {
                controller_id: self.id,
                from,
                to: AutoRotationState::Disposed,
            });
            bus.publish(ControllerDisposed { controller_id: self.id });
        }
    }
}
