use std::collections::HashMap;

use super::traits::PlatformCapabilities;
use super::types::TriState;
use crate::constants::HLS_MIME_TYPE;

/// Fixed capability table. Used for the probe CLI and to simulate Safari-like,
/// Chromium-like or capability-less hosts without a browser.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    containers: HashMap<String, TriState>,
    adaptive_streaming: bool,
}

impl StaticCapabilities {
    pub fn new(adaptive_streaming: bool) -> Self {
        Self {
            containers: HashMap::new(),
            adaptive_streaming,
        }
    }

    pub fn with_container(mut self, mime: &str, support: TriState) -> Self {
        self.containers.insert(mime.to_ascii_lowercase(), support);
        self
    }

    /// Native HLS plus the usual Apple containers.
    pub fn safari() -> Self {
        Self::new(true)
            .with_container(HLS_MIME_TYPE, TriState::Maybe)
            .with_container("video/mp4", TriState::Maybe)
            .with_container("video/quicktime", TriState::Maybe)
    }

    /// No native HLS, Media Source Extensions available.
    pub fn chromium() -> Self {
        Self::new(true)
            .with_container("video/mp4", TriState::Maybe)
            .with_container("video/webm", TriState::Maybe)
            .with_container("video/ogg", TriState::Maybe)
    }

    /// Nothing at all: every probe answers "no".
    pub fn bare() -> Self {
        Self::new(false)
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "safari" => Some(Self::safari()),
            "chromium" | "chrome" => Some(Self::chromium()),
            "bare" | "none" => Some(Self::bare()),
            _ => None,
        }
    }
}

impl PlatformCapabilities for StaticCapabilities {
    fn supports_container(&self, mime: &str) -> TriState {
        self.containers
            .get(&mime.to_ascii_lowercase())
            .copied()
            .unwrap_or(TriState::No)
    }

    fn supports_adaptive_streaming(&self) -> bool {
        self.adaptive_streaming
    }
}
