//! Buffer data storage
//!
//! Host-side shadow of a GL buffer object's data store, validating sizes and
//! ranges the way `glBufferData` and friends do.

use crate::error::{GlError, GlResult};

/// Host copy of a buffer object's data store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowBuffer {
    data: Vec<u8>,
}

impl ShadowBuffer {
    /// Create a buffer with an empty data store
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Replace the data store
    ///
    /// Without `data` the new store is zero-filled. On failure the previous
    /// store is left untouched.
    pub fn set_data(&mut self, size: isize, data: Option<&[u8]>) -> GlResult<()> {
        let size = usize::try_from(size).map_err(|_| GlError::InvalidValue)?;
        if data.is_some_and(|data| data.len() < size) {
            return Err(GlError::InvalidValue);
        }

        let mut store = Vec::new();
        store.try_reserve_exact(size).map_err(|err| {
            log::debug!("Buffer allocation of {} bytes failed: {}", size, err);
            GlError::OutOfMemory
        })?;
        match data {
            Some(data) => store.extend_from_slice(&data[..size]),
            None => store.resize(size, 0),
        }

        self.data = store;
        log::trace!("Buffer data store is now {} bytes", size);
        Ok(())
    }

    /// Overwrite part of the data store
    ///
    /// Without `data` the range is validated and nothing is written.
    pub fn set_sub_data(&mut self, offset: isize, len: isize, data: Option<&[u8]>) -> GlResult<()> {
        let range = self.checked_range(offset, len)?;
        let Some(data) = data else {
            return Ok(());
        };
        let source = data.get(..range.len()).ok_or(GlError::InvalidValue)?;

        self.data[range].copy_from_slice(source);
        Ok(())
    }

    /// Copy a range of this buffer's store into another buffer
    pub fn copy_sub_data(
        &self,
        target: &mut Self,
        read_offset: isize,
        write_offset: isize,
        size: isize,
    ) -> GlResult<()> {
        let read = self.checked_range(read_offset, size)?;
        let write = target.checked_range(write_offset, size)?;

        target.data[write].copy_from_slice(&self.data[read]);
        Ok(())
    }

    /// Current data store
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Size of the data store in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the data store is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn checked_range(&self, offset: isize, len: isize) -> GlResult<std::ops::Range<usize>> {
        let offset = usize::try_from(offset).map_err(|_| GlError::InvalidValue)?;
        let len = usize::try_from(len).map_err(|_| GlError::InvalidValue)?;
        let end = offset.checked_add(len).ok_or(GlError::InvalidValue)?;
        if end > self.data.len() {
            return Err(GlError::InvalidValue);
        }
        Ok(offset..end)
    }
}
