//! Platform windowing boundary
//!
//! These traits stand in for the platform windowing system the adapter talks to.
//! Every object behind them is owned by the caller; the adapter only ever holds
//! borrowed references, so none of these traits expose any lifetime management.
//!
//! Capability queries follow a fixed shape: an opaque [`PlatformObject`] may expose
//! the [`Inspectable`] capability, and an inspectable object may in turn expose the
//! [`CoreWindow`] or [`PropertySet`] capability. Anything else is not something the
//! adapter can render into.

use thiserror::Error;

/// Errors reported by the platform windowing system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform call failed with a status code
    #[error("platform call failed with status {0:#010x}")]
    Failed(u32),

    /// The window has already been closed
    #[error("window has been closed")]
    Closed,

    /// The registration token is not known to the window
    #[error("unknown event registration token {0:?}")]
    UnknownToken(EventRegistrationToken),
}

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Window rectangle in device independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Size of the rectangle
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Width and height pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Scale both dimensions
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Opaque token identifying one event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventRegistrationToken(pub i64);

/// Callback invoked with the new window size when the window is resized
pub type SizeChangedHandler = Box<dyn Fn(Size)>;

/// Any object handed over by the platform
///
/// This is the lowest common capability: the object exists. Everything the
/// adapter can use is reached through [`PlatformObject::as_inspectable`].
pub trait PlatformObject {
    /// Query the introspection capability
    fn as_inspectable(&self) -> Option<&dyn Inspectable>;
}

/// Object supporting runtime introspection
pub trait Inspectable {
    /// Runtime class name reported by the object
    fn runtime_class_name(&self) -> &str;

    /// Query the windowing-surface capability
    fn as_core_window(&self) -> Option<&dyn CoreWindow> {
        None
    }

    /// Query the property-bag capability
    fn as_property_set(&self) -> Option<&dyn PropertySet> {
        None
    }
}

/// Windowing surface the renderer can draw into
pub trait CoreWindow {
    /// Current window bounds
    fn bounds(&self) -> PlatformResult<Rect>;

    /// Register a size-changed handler
    fn add_size_changed(&self, handler: SizeChangedHandler) -> PlatformResult<EventRegistrationToken>;

    /// Unregister a size-changed handler
    fn remove_size_changed(&self, token: EventRegistrationToken) -> PlatformResult<()>;
}

/// Value stored in a property bag
///
/// Property bags only ever hold these shapes, so lookups are resolved with a
/// match instead of repeated capability queries.
#[derive(Clone, Copy)]
pub enum PropertyValue<'a> {
    /// Reference to another platform object
    Object(&'a dyn PlatformObject),
    /// Boxed size value
    Size(Size),
    /// Boxed single precision value
    Float(f32),
}

impl PropertyValue<'_> {
    /// Short name of the stored shape, used in diagnostics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Size(_) => "size",
            Self::Float(_) => "float",
        }
    }
}

impl std::fmt::Debug for PropertyValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object(object) => {
                let class = object
                    .as_inspectable()
                    .map_or("<not inspectable>", |inspectable| inspectable.runtime_class_name());
                f.debug_tuple("Object").field(&class).finish()
            }
            Self::Size(size) => f.debug_tuple("Size").field(size).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
        }
    }
}

/// String keyed property bag
pub trait PropertySet {
    /// Look up a value by key
    fn lookup(&self, key: &str) -> Option<PropertyValue<'_>>;

    /// Whether a key is present
    fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Whether the bag holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
