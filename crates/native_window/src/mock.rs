//! Mock platform objects for testing
//!
//! Provides stand-ins for the platform windowing system so the adapter can be
//! exercised without a real window. [`MockCoreWindow`] counts every call the
//! adapter makes and can be told to fail individual calls.

use std::cell::{Cell, RefCell};

use crate::platform::{
    CoreWindow, EventRegistrationToken, Inspectable, PlatformError, PlatformObject, PlatformResult,
    Rect, Size, SizeChangedHandler,
};

const CORE_WINDOW_CLASS_NAME: &str = "Windows.UI.Core.CoreWindow";

/// Bounds reported by a mock window unless configured otherwise
pub const DEFAULT_MOCK_BOUNDS: Rect = Rect::new(0.0, 0.0, 1280.0, 720.0);

/// Mock window recording how often each call is made
pub struct MockCoreWindow {
    bounds: Cell<Rect>,
    bounds_calls: Cell<usize>,
    add_size_changed_calls: Cell<usize>,
    remove_size_changed_calls: Cell<usize>,
    handlers: RefCell<Vec<(EventRegistrationToken, SizeChangedHandler)>>,
    next_token: Cell<i64>,
    bounds_failure: RefCell<Option<PlatformError>>,
    subscribe_failure: RefCell<Option<PlatformError>>,
    unsubscribe_failure: RefCell<Option<PlatformError>>,
}

impl MockCoreWindow {
    /// Create a mock window with [`DEFAULT_MOCK_BOUNDS`]
    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_MOCK_BOUNDS)
    }

    /// Create a mock window reporting the given bounds
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds: Cell::new(bounds),
            bounds_calls: Cell::new(0),
            add_size_changed_calls: Cell::new(0),
            remove_size_changed_calls: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            next_token: Cell::new(1),
            bounds_failure: RefCell::new(None),
            subscribe_failure: RefCell::new(None),
            unsubscribe_failure: RefCell::new(None),
        }
    }

    /// Make every bounds query fail with `error`
    pub fn fail_bounds(&self, error: PlatformError) {
        *self.bounds_failure.borrow_mut() = Some(error);
    }

    /// Make every subscribe call fail with `error`
    pub fn fail_subscribe(&self, error: PlatformError) {
        *self.subscribe_failure.borrow_mut() = Some(error);
    }

    /// Make every unsubscribe call fail with `error`
    pub fn fail_unsubscribe(&self, error: PlatformError) {
        *self.unsubscribe_failure.borrow_mut() = Some(error);
    }

    /// Number of bounds queries made so far
    pub fn bounds_calls(&self) -> usize {
        self.bounds_calls.get()
    }

    /// Number of size-changed subscribe calls made so far
    pub fn add_size_changed_calls(&self) -> usize {
        self.add_size_changed_calls.get()
    }

    /// Number of size-changed unsubscribe calls made so far
    pub fn remove_size_changed_calls(&self) -> usize {
        self.remove_size_changed_calls.get()
    }

    /// Number of handlers currently registered
    pub fn active_subscriptions(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Resize the window and notify every registered handler
    pub fn fire_size_changed(&self, size: Size) {
        let bounds = self.bounds.get();
        self.bounds.set(Rect::new(bounds.x, bounds.y, size.width, size.height));

        for (_, handler) in self.handlers.borrow().iter() {
            handler(size);
        }
    }
}

impl Default for MockCoreWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformObject for MockCoreWindow {
    fn as_inspectable(&self) -> Option<&dyn Inspectable> {
        Some(self)
    }
}

impl Inspectable for MockCoreWindow {
    fn runtime_class_name(&self) -> &str {
        CORE_WINDOW_CLASS_NAME
    }

    fn as_core_window(&self) -> Option<&dyn CoreWindow> {
        Some(self)
    }
}

impl CoreWindow for MockCoreWindow {
    fn bounds(&self) -> PlatformResult<Rect> {
        self.bounds_calls.set(self.bounds_calls.get() + 1);

        if let Some(error) = self.bounds_failure.borrow().clone() {
            return Err(error);
        }
        Ok(self.bounds.get())
    }

    fn add_size_changed(&self, handler: SizeChangedHandler) -> PlatformResult<EventRegistrationToken> {
        self.add_size_changed_calls.set(self.add_size_changed_calls.get() + 1);

        if let Some(error) = self.subscribe_failure.borrow().clone() {
            return Err(error);
        }

        let token = EventRegistrationToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.handlers.borrow_mut().push((token, handler));
        Ok(token)
    }

    fn remove_size_changed(&self, token: EventRegistrationToken) -> PlatformResult<()> {
        self.remove_size_changed_calls.set(self.remove_size_changed_calls.get() + 1);

        if let Some(error) = self.unsubscribe_failure.borrow().clone() {
            return Err(error);
        }

        let mut handlers = self.handlers.borrow_mut();
        let index = handlers
            .iter()
            .position(|(registered, _)| *registered == token)
            .ok_or(PlatformError::UnknownToken(token))?;
        handlers.remove(index);
        Ok(())
    }
}

/// Inspectable object that is neither a window nor a property bag
#[derive(Debug, Default)]
pub struct GenericInspectable;

impl GenericInspectable {
    /// Create a new generic inspectable object
    pub const fn new() -> Self {
        Self
    }
}

impl PlatformObject for GenericInspectable {
    fn as_inspectable(&self) -> Option<&dyn Inspectable> {
        Some(self)
    }
}

impl Inspectable for GenericInspectable {
    fn runtime_class_name(&self) -> &str {
        "GenericInspectable"
    }
}

/// Object without the introspection capability
#[derive(Debug, Default)]
pub struct GenericUnknown;

impl GenericUnknown {
    /// Create a new generic object
    pub const fn new() -> Self {
        Self
    }
}

impl PlatformObject for GenericUnknown {
    fn as_inspectable(&self) -> Option<&dyn Inspectable> {
        None
    }
}
