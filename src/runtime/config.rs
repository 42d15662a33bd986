use serde::{Deserialize, Serialize};

/// Settings for one [`AdminSystem`](crate::lifecycle::AdminSystem).
///
/// `page_size` is fixed for the lifetime of the system: page numbers are only
/// stable cache keys while it stays the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Rows per list page.
    pub page_size: u32,
    /// Request queue of the cache actor.
    pub cache_buffer: usize,
    /// Request queue of the in-memory backend.
    pub api_buffer: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            cache_buffer: 32,
            api_buffer: 32,
        }
    }
}

impl AdminConfig {
    /// Clamps every setting to at least 1.
    pub fn normalized(self) -> Self {
        Self {
            page_size: self.page_size.max(1),
            cache_buffer: self.cache_buffer.max(1),
            api_buffer: self.api_buffer.max(1),
        }
    }
}
