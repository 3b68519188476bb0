use research_player::models::VideoDescriptor;
use research_player::player::{Platform, StaticCapabilities, TriState};
use std::sync::Arc;

use super::mocks::{FakeHlsLibrary, FakeVideoElement};

/// A platform wired to fakes, with the fakes kept for inspection.
pub struct PlayerRig {
    pub platform: Platform,
    pub element: Arc<FakeVideoElement>,
    pub library: Arc<FakeHlsLibrary>,
}

pub struct PlayerRigBuilder {
    capabilities: StaticCapabilities,
}

impl PlayerRigBuilder {
    pub fn safari() -> Self {
        Self {
            capabilities: StaticCapabilities::safari(),
        }
    }

    pub fn chromium() -> Self {
        Self {
            capabilities: StaticCapabilities::chromium(),
        }
    }

    pub fn bare() -> Self {
        Self {
            capabilities: StaticCapabilities::bare(),
        }
    }

    pub fn with_container(mut self, mime: &str, support: TriState) -> Self {
        self.capabilities = self.capabilities.with_container(mime, support);
        self
    }

    pub fn build(self) -> PlayerRig {
        let element = FakeVideoElement::new();
        let library = FakeHlsLibrary::new();
        let platform = Platform::new(
            element.clone(),
            Arc::new(self.capabilities),
            library.clone(),
        );
        PlayerRig {
            platform,
            element,
            library,
        }
    }
}

pub struct DescriptorBuilder {
    url: String,
    thumbnail_url: Option<String>,
    title: Option<String>,
    duration: Option<f64>,
}

impl DescriptorBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            thumbnail_url: None,
            title: None,
            duration: None,
        }
    }

    pub fn with_thumbnail(mut self, url: &str) -> Self {
        self.thumbnail_url = Some(url.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn build(self) -> VideoDescriptor {
        VideoDescriptor {
            url: self.url,
            thumbnail_url: self.thumbnail_url,
            title: self.title,
            duration: self.duration,
        }
    }

    /// The descriptor as the indexing backend sends it.
    pub fn to_json(self) -> String {
        serde_json::to_string(&self.build()).unwrap()
    }
}
