//! # Native Window
//!
//! Capability adapter that decides whether an opaque platform object can be
//! rendered into.
//!
//! ## Features
//!
//! - **Capability probing**: accepts a window directly or a property bag holding one
//! - **Borrowed lifetimes**: never owns or extends the life of platform objects
//! - **Scoped subscriptions**: the size-changed handler is removed on every exit path
//! - **Surface sizing**: optional explicit size or resolution scale from the property bag
//! - **Mock platform**: counting test doubles for the windowing system
//!
//! ## Quick Start
//!
//! ```rust
//! use native_window::mock::MockCoreWindow;
//! use native_window::property_set::{PropertyMap, NATIVE_WINDOW_TYPE_PROPERTY};
//! use native_window::NativeWindow;
//!
//! let window = MockCoreWindow::new();
//! let mut properties = PropertyMap::new();
//! properties.insert_object(NATIVE_WINDOW_TYPE_PROPERTY, &window);
//!
//! let mut native_window = NativeWindow::new(Some(&properties));
//! assert!(native_window.initialize());
//! assert_eq!(window.add_size_changed_calls(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod mock;
pub mod platform;
pub mod property_set;

mod window;

pub use platform::{
    CoreWindow, EventRegistrationToken, Inspectable, PlatformError, PlatformObject, PropertySet,
    PropertyValue, Rect, Size,
};
pub use property_set::PropertyMap;
pub use window::{NativeWindow, SizeMode};
