//! Native window capability adapter
//!
//! [`NativeWindow`] takes an opaque platform object and works out whether a
//! renderer can draw into it. The object is either a window directly or a
//! property bag holding one under [`NATIVE_WINDOW_TYPE_PROPERTY`].
//!
//! # Lifecycle
//!
//! ```text
//! new(candidate) ──initialize()──▶ initialized ──teardown()/drop──▶ uninitialized
//!        │                              │
//!        └── any failure: stays inert   └── bounds captured, one size-changed handler live
//! ```
//!
//! A successful `initialize()` queries the window bounds exactly once and
//! registers exactly one size-changed handler. A failed one makes neither call
//! past the point of failure and leaves nothing behind. Failures are only visible
//! through the boolean result; the reason goes to the log.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::platform::{
    CoreWindow, EventRegistrationToken, PlatformError, PlatformObject, PlatformResult, PropertySet,
    PropertyValue, Rect, Size, SizeChangedHandler,
};
use crate::property_set::{
    NATIVE_WINDOW_TYPE_PROPERTY, RENDER_RESOLUTION_SCALE_PROPERTY, RENDER_SURFACE_SIZE_PROPERTY,
};

/// Reasons a candidate could not be turned into a render surface
#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum NativeWindowError {
    #[error("no candidate object was supplied")]
    NullCandidate,

    #[error("candidate does not support introspection")]
    UnsupportedCapability,

    #[error("{0} does not expose a window")]
    NotAWindow(String),

    #[error("property bag has no {0} entry")]
    PropertyMissing(&'static str),

    #[error("invalid {key}: {reason}")]
    InvalidProperty { key: &'static str, reason: String },

    #[error("bounds query failed: {0}")]
    BoundsQuery(PlatformError),

    #[error("size-changed subscription failed: {0}")]
    Subscribe(PlatformError),
}

type NativeWindowResult<T> = Result<T, NativeWindowError>;

/// How the render surface size is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeMode {
    /// Surface follows the window bounds multiplied by a scale in `(0, 1]`
    Scaled(f32),
    /// Surface has a fixed size regardless of the window bounds
    Fixed(Size),
}

impl SizeMode {
    /// Surface size for the given window size
    pub fn surface_size(&self, window_size: Size) -> Size {
        match *self {
            Self::Scaled(scale) => window_size.scaled(scale),
            Self::Fixed(size) => size,
        }
    }
}

impl Default for SizeMode {
    fn default() -> Self {
        Self::Scaled(1.0)
    }
}

/// Window found behind a candidate, with the sizing it was handed
struct ResolvedWindow<'a> {
    window: &'a dyn CoreWindow,
    size_mode: SizeMode,
}

fn resolve_window(candidate: Option<&dyn PlatformObject>) -> NativeWindowResult<ResolvedWindow<'_>> {
    let candidate = candidate.ok_or(NativeWindowError::NullCandidate)?;
    let inspectable = candidate
        .as_inspectable()
        .ok_or(NativeWindowError::UnsupportedCapability)?;

    if let Some(window) = inspectable.as_core_window() {
        return Ok(ResolvedWindow {
            window,
            size_mode: SizeMode::default(),
        });
    }

    if let Some(properties) = inspectable.as_property_set() {
        return resolve_from_properties(properties);
    }

    Err(NativeWindowError::NotAWindow(
        inspectable.runtime_class_name().to_string(),
    ))
}

fn resolve_from_properties(properties: &dyn PropertySet) -> NativeWindowResult<ResolvedWindow<'_>> {
    let window = match properties.lookup(NATIVE_WINDOW_TYPE_PROPERTY) {
        None => return Err(NativeWindowError::PropertyMissing(NATIVE_WINDOW_TYPE_PROPERTY)),
        Some(PropertyValue::Object(object)) => object
            .as_inspectable()
            .and_then(|inspectable| inspectable.as_core_window())
            .ok_or_else(|| {
                NativeWindowError::NotAWindow(format!("object under {NATIVE_WINDOW_TYPE_PROPERTY}"))
            })?,
        Some(other) => {
            return Err(NativeWindowError::NotAWindow(format!(
                "{} value under {NATIVE_WINDOW_TYPE_PROPERTY}",
                other.kind()
            )))
        }
    };

    let size_mode = read_size_mode(properties)?;
    Ok(ResolvedWindow { window, size_mode })
}

fn read_size_mode(properties: &dyn PropertySet) -> NativeWindowResult<SizeMode> {
    let invalid = |key: &'static str, reason: String| NativeWindowError::InvalidProperty { key, reason };

    let fixed = match properties.lookup(RENDER_SURFACE_SIZE_PROPERTY) {
        None => None,
        Some(PropertyValue::Size(size)) if size.is_positive() => Some(size),
        Some(PropertyValue::Size(size)) => {
            return Err(invalid(
                RENDER_SURFACE_SIZE_PROPERTY,
                format!("{}x{} is not a positive size", size.width, size.height),
            ))
        }
        Some(other) => {
            return Err(invalid(
                RENDER_SURFACE_SIZE_PROPERTY,
                format!("expected a size, found {}", other.kind()),
            ))
        }
    };

    let scale = match properties.lookup(RENDER_RESOLUTION_SCALE_PROPERTY) {
        None => None,
        Some(PropertyValue::Float(scale)) if scale.is_finite() && scale > 0.0 && scale <= 1.0 => {
            Some(scale)
        }
        Some(PropertyValue::Float(scale)) => {
            return Err(invalid(
                RENDER_RESOLUTION_SCALE_PROPERTY,
                format!("{scale} is outside (0, 1]"),
            ))
        }
        Some(other) => {
            return Err(invalid(
                RENDER_RESOLUTION_SCALE_PROPERTY,
                format!("expected a float, found {}", other.kind()),
            ))
        }
    };

    match (fixed, scale) {
        (Some(_), Some(_)) => Err(invalid(
            RENDER_SURFACE_SIZE_PROPERTY,
            format!("cannot be combined with {RENDER_RESOLUTION_SCALE_PROPERTY}"),
        )),
        (Some(size), None) => Ok(SizeMode::Fixed(size)),
        (None, Some(scale)) => Ok(SizeMode::Scaled(scale)),
        (None, None) => Ok(SizeMode::default()),
    }
}

/// Live size-changed registration, removed when dropped
struct SizeChangedRegistration<'a> {
    window: &'a dyn CoreWindow,
    token: EventRegistrationToken,
}

impl<'a> SizeChangedRegistration<'a> {
    fn register(window: &'a dyn CoreWindow, handler: SizeChangedHandler) -> PlatformResult<Self> {
        let token = window.add_size_changed(handler)?;
        Ok(Self { window, token })
    }
}

impl Drop for SizeChangedRegistration<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.window.remove_size_changed(self.token) {
            log::warn!("Failed to remove size-changed handler {:?}: {}", self.token, err);
        }
    }
}

/// Everything held while initialized
struct SurfaceState<'a> {
    bounds: Rect,
    size_mode: SizeMode,
    pending_resize: Rc<Cell<Option<Size>>>,
    registration: SizeChangedRegistration<'a>,
}

/// Adapter turning an opaque platform object into a render surface
///
/// The adapter borrows the candidate for `'a` and never outlives it. Only the
/// size-changed registration is owned, and it is released on teardown or drop.
pub struct NativeWindow<'a> {
    candidate: Option<&'a dyn PlatformObject>,
    surface: Option<SurfaceState<'a>>,
}

impl<'a> NativeWindow<'a> {
    /// Create an adapter for a candidate object
    ///
    /// The candidate is not inspected until [`NativeWindow::initialize`]; `None`
    /// stands for a null handle.
    pub const fn new(candidate: Option<&'a dyn PlatformObject>) -> Self {
        Self {
            candidate,
            surface: None,
        }
    }

    /// Resolve the window, capture its bounds and subscribe to size changes
    ///
    /// Returns true when all three succeeded. On an adapter that is already
    /// initialized this makes no platform calls and returns true.
    pub fn initialize(&mut self) -> bool {
        if self.surface.is_some() {
            log::debug!("Native window already initialized");
            return true;
        }

        match self.try_initialize() {
            Ok(surface) => {
                log::debug!(
                    "Native window initialized: bounds {:?}, size mode {:?}, token {:?}",
                    surface.bounds,
                    surface.size_mode,
                    surface.registration.token
                );
                self.surface = Some(surface);
                true
            }
            Err(err) => {
                log::debug!("Native window initialization failed: {}", err);
                false
            }
        }
    }

    fn try_initialize(&self) -> NativeWindowResult<SurfaceState<'a>> {
        let ResolvedWindow { window, size_mode } = resolve_window(self.candidate)?;

        let bounds = window.bounds().map_err(NativeWindowError::BoundsQuery)?;

        let pending_resize = Rc::new(Cell::new(None));
        let sink = Rc::downgrade(&pending_resize);
        let handler: SizeChangedHandler = Box::new(move |size| {
            // Adapter may already be gone
            if let Some(pending) = sink.upgrade() {
                pending.set(Some(size));
            }
        });
        let registration =
            SizeChangedRegistration::register(window, handler).map_err(NativeWindowError::Subscribe)?;

        Ok(SurfaceState {
            bounds,
            size_mode,
            pending_resize,
            registration,
        })
    }

    /// Unsubscribe and return to the uninitialized state
    ///
    /// Safe to call on an adapter that was never initialized, and more than once.
    pub fn teardown(&mut self) {
        if self.surface.take().is_some() {
            log::debug!("Native window torn down");
        }
    }

    /// Whether the adapter currently holds a resolved window
    pub const fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Last known window bounds
    pub fn bounds(&self) -> Option<Rect> {
        self.surface.as_ref().map(|surface| surface.bounds)
    }

    /// How the surface size is derived
    pub fn size_mode(&self) -> Option<SizeMode> {
        self.surface.as_ref().map(|surface| surface.size_mode)
    }

    /// Current render surface size
    pub fn surface_size(&self) -> Option<Size> {
        self.surface
            .as_ref()
            .map(|surface| surface.size_mode.surface_size(surface.bounds.size()))
    }

    /// Consume a size change reported by the window since the last call
    ///
    /// Updates the cached bounds and returns the new surface size. A fixed
    /// size surface never changes, so `None` is returned in that mode even
    /// though the bounds are still updated.
    pub fn take_pending_resize(&mut self) -> Option<Size> {
        let surface = self.surface.as_mut()?;
        let size = surface.pending_resize.take()?;

        surface.bounds.width = size.width;
        surface.bounds.height = size.height;

        match surface.size_mode {
            SizeMode::Scaled(scale) => Some(size.scaled(scale)),
            SizeMode::Fixed(_) => None,
        }
    }
}

impl Drop for NativeWindow<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for NativeWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeWindow")
            .field("has_candidate", &self.candidate.is_some())
            .field("initialized", &self.is_initialized())
            .field("bounds", &self.bounds())
            .field("size_mode", &self.size_mode())
            .finish()
    }
}
