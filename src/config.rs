//! Conversion configuration

use crate::color::DisplayColorSpace;

/// Configuration for surface conversion
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Display space PQ content is mapped into
    pub(crate) hdr_target: DisplayColorSpace,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            hdr_target: DisplayColorSpace::DisplayP3,
        }
    }
}

impl ConvertConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display space PQ content is mapped into
    ///
    /// Display P3 by default; SDR content is unaffected by this setting.
    pub fn hdr_target(mut self, target: DisplayColorSpace) -> Self {
        self.hdr_target = target;
        self
    }
}
