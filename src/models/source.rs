use serde::{Deserialize, Serialize};

/// Identifies what to play. The URL is validated when it is resolved, not
/// when the source is built, so an invalid URL surfaces as a playback
/// configuration error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSource {
    pub url: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Advisory only; the element's duration wins once metadata loads.
    #[serde(default)]
    pub duration_hint: Option<f64>,
}

impl PlaybackSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            poster_url: None,
            title: None,
            duration_hint: None,
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.duration_hint = Some(seconds);
        self
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Video descriptor as returned by the indexing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl From<VideoDescriptor> for PlaybackSource {
    fn from(descriptor: VideoDescriptor) -> Self {
        Self {
            url: descriptor.url,
            poster_url: descriptor.thumbnail_url.filter(|u| !u.is_empty()),
            title: descriptor.title,
            duration_hint: descriptor.duration,
        }
    }
}
