//! Carousel widget
//!
//! One rotation controller per carousel. Buttons, touch and hover events from
//! the page are forwarded here; filtering swaps the controller's sequence for
//! the matching subset of the carousel's items.

use std::sync::Arc;
use tracing::debug;
use wg_core::{Direction, EventBus, Renderer, RotationConfig, RotationController};

use crate::Result;

/// A rotating list of items
pub struct Carousel<T: Clone + Send + Sync + 'static> {
    items: Arc<[T]>,
    controller: RotationController<T>,
}

impl<T: Clone + Send + Sync + 'static> Carousel<T> {
    pub fn new(
        items: impl Into<Arc<[T]>>,
        config: RotationConfig,
        renderer: Arc<dyn Renderer<T>>,
    ) -> Result<Self> {
        Self::build(items.into(), config, renderer, None)
    }

    /// Like [`Carousel::new`], publishing rotation events on `bus`
    pub fn with_event_bus(
        items: impl Into<Arc<[T]>>,
        config: RotationConfig,
        renderer: Arc<dyn Renderer<T>>,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        Self::build(items.into(), config, renderer, Some(bus))
    }

    /// Configure from the widget element's `data-*` attributes
    pub fn from_attributes<'a, I>(
        attributes: I,
        items: impl Into<Arc<[T]>>,
        renderer: Arc<dyn Renderer<T>>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let config = RotationConfig::from_attributes(attributes)?;
        Self::new(items, config, renderer)
    }

    fn build(
        items: Arc<[T]>,
        config: RotationConfig,
        renderer: Arc<dyn Renderer<T>>,
        bus: Option<Arc<EventBus>>,
    ) -> Result<Self> {
        let mut builder = RotationController::builder(config);
        if let Some(bus) = bus {
            builder = builder.event_bus(bus);
        }
        let controller = builder.build(items.clone(), renderer)?;
        debug!(controller = %controller.id(), items = items.len(), "carousel initialized");

        Ok(Self { items, controller })
    }

    pub fn next_clicked(&self) -> Result<()> {
        Ok(self.controller.next()?)
    }

    pub fn prev_clicked(&self) -> Result<()> {
        Ok(self.controller.previous()?)
    }

    pub fn touch_start(&self, x: f64) -> Result<()> {
        Ok(self.controller.gesture_start(x)?)
    }

    pub fn touch_end(&self, x: f64) -> Result<Option<Direction>> {
        Ok(self.controller.gesture_end(x)?)
    }

    /// Hover pauses auto-rotation
    pub fn pointer_enter(&self) -> Result<()> {
        Ok(self.controller.pause()?)
    }

    pub fn pointer_leave(&self) -> Result<()> {
        Ok(self.controller.resume()?)
    }

    /// Rotate through the items matching `predicate`; returns how many matched
    pub fn apply_filter<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        let matching: Vec<T> = self.items.iter().filter(|item| predicate(item)).cloned().collect();
        let count = matching.len();
        self.controller.set_sequence(matching)?;
        debug!(controller = %self.controller.id(), count, "carousel filter applied");
        Ok(count)
    }

    /// Rotate through every item again
    pub fn clear_filter(&self) -> Result<()> {
        Ok(self.controller.set_sequence(self.items.clone())?)
    }

    /// All items, regardless of the active filter
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn controller(&self) -> &RotationController<T> {
        &self.controller
    }

    pub fn current_item(&self) -> Option<T> {
        self.controller.current_item()
    }

    /// Release the controller when the widget is removed from the page
    pub fn teardown(&self) {
        self.controller.dispose();
    }
}
