//! Append-only output buffers shared between a reader task and the session.

use std::sync::Arc;

use parking_lot::Mutex;

/// Bytes captured from one output stream so far.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&self, bytes: &[u8]) {
        self.inner.lock().extend_from_slice(bytes);
    }

    /// Copy of everything captured so far.
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().clone()
    }

    /// Copy of everything from `offset` onward.
    pub fn contents_from(&self, offset: usize) -> Vec<u8> {
        let data = self.inner.lock();
        data.get(offset..).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Captured bytes as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
