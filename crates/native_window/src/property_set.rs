//! In-memory property bag
//!
//! [`PropertyMap`] is the concrete property bag callers build when they want to
//! hand the adapter a window indirectly, optionally together with surface sizing
//! hints. It borrows every object it stores.

use std::collections::HashMap;

use crate::platform::{Inspectable, PlatformObject, PropertySet, PropertyValue, Size};

/// Key under which the window to render into is stored
pub const NATIVE_WINDOW_TYPE_PROPERTY: &str = "EGLNativeWindowTypeProperty";

/// Key for an explicit render surface size
pub const RENDER_SURFACE_SIZE_PROPERTY: &str = "EGLRenderSurfaceSizeProperty";

/// Key for a render resolution scale applied to the window bounds
pub const RENDER_RESOLUTION_SCALE_PROPERTY: &str = "EGLRenderResolutionScaleProperty";

const PROPERTY_SET_CLASS_NAME: &str = "Windows.Foundation.Collections.PropertySet";

/// String keyed property bag holding borrowed values
#[derive(Debug, Default)]
pub struct PropertyMap<'a> {
    entries: HashMap<String, PropertyValue<'a>>,
}

impl<'a> PropertyMap<'a> {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning true when an existing value was replaced
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue<'a>) -> bool {
        self.entries.insert(key.into(), value).is_some()
    }

    /// Insert a reference to a platform object
    pub fn insert_object(&mut self, key: impl Into<String>, object: &'a dyn PlatformObject) -> bool {
        self.insert(key, PropertyValue::Object(object))
    }

    /// Insert a size value
    pub fn insert_size(&mut self, key: impl Into<String>, size: Size) -> bool {
        self.insert(key, PropertyValue::Size(size))
    }

    /// Insert a float value
    pub fn insert_float(&mut self, key: impl Into<String>, value: f32) -> bool {
        self.insert(key, PropertyValue::Float(value))
    }

    /// Remove a key, returning true when it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over the stored keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl PropertySet for PropertyMap<'_> {
    fn lookup(&self, key: &str) -> Option<PropertyValue<'_>> {
        self.entries.get(key).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl PlatformObject for PropertyMap<'_> {
    fn as_inspectable(&self) -> Option<&dyn Inspectable> {
        Some(self)
    }
}

impl Inspectable for PropertyMap<'_> {
    fn runtime_class_name(&self) -> &str {
        PROPERTY_SET_CLASS_NAME
    }

    fn as_property_set(&self) -> Option<&dyn PropertySet> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{GenericInspectable, MockCoreWindow};

    #[test]
    fn test_insert_reports_replacement() {
        let mut map = PropertyMap::new();
        assert!(!map.insert_float(RENDER_RESOLUTION_SCALE_PROPERTY, 0.5));
        assert!(map.insert_float(RENDER_RESOLUTION_SCALE_PROPERTY, 0.75));
        assert_eq!(map.len(), 1);

        match map.lookup(RENDER_RESOLUTION_SCALE_PROPERTY) {
            Some(PropertyValue::Float(value)) => assert_eq!(value, 0.75),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_lookup_missing_key() {
        let map = PropertyMap::new();
        assert!(map.lookup(NATIVE_WINDOW_TYPE_PROPERTY).is_none());
        assert!(!map.has_key(NATIVE_WINDOW_TYPE_PROPERTY));
        assert!(map.is_empty());
    }

    #[test]
    fn test_stored_object_keeps_capabilities() {
        let window = MockCoreWindow::new();
        let mut map = PropertyMap::new();
        map.insert_object(NATIVE_WINDOW_TYPE_PROPERTY, &window);

        let Some(PropertyValue::Object(object)) = map.lookup(NATIVE_WINDOW_TYPE_PROPERTY) else {
            panic!("window property missing");
        };
        let inspectable = object.as_inspectable().expect("window is inspectable");
        assert!(inspectable.as_core_window().is_some());
        assert!(inspectable.as_property_set().is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let other = GenericInspectable::new();
        let mut map = PropertyMap::new();
        map.insert_object(NATIVE_WINDOW_TYPE_PROPERTY, &other);
        map.insert_size(RENDER_SURFACE_SIZE_PROPERTY, Size::new(64.0, 64.0));

        assert!(map.remove(NATIVE_WINDOW_TYPE_PROPERTY));
        assert!(!map.remove(NATIVE_WINDOW_TYPE_PROPERTY));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![RENDER_SURFACE_SIZE_PROPERTY]);

        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_is_inspectable_property_set() {
        let map = PropertyMap::new();
        let inspectable = map.as_inspectable().expect("property map is inspectable");
        assert_eq!(inspectable.runtime_class_name(), PROPERTY_SET_CLASS_NAME);
        assert!(inspectable.as_property_set().is_some());
        assert!(inspectable.as_core_window().is_none());
    }
}
