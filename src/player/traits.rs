use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::types::{SessionEvent, TaggedSessionEvent, TriState};
use crate::config::StreamingConfig;
use crate::utils::errors::{PlatformError, PlayRejection, SessionError};

/// What the host platform can decode on its own.
pub trait PlatformCapabilities: Send + Sync {
    fn supports_container(&self, mime: &str) -> TriState;
    /// Whether Media-Source-Extensions based adaptive streaming is available.
    fn supports_adaptive_streaming(&self) -> bool;
}

/// The playback element. Implementations forward the element's native events
/// as [`super::types::ElementEvent`]s through the player handle.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// `None` removes the source attribute.
    fn set_src(&self, url: Option<&str>);
    fn src(&self) -> Option<String>;
    fn load(&self);
    async fn play(&self) -> Result<(), PlayRejection>;
    fn pause(&self);
    fn paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// `None` while metadata is unavailable (the platform's NaN).
    fn duration(&self) -> Option<f64>;
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&self, muted: bool);
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&self) -> Result<(), PlatformError>;
    fn exit_fullscreen(&self) -> Result<(), PlatformError>;
}

/// A streaming-library session bound to one element.
pub trait StreamingSession: Send {
    fn load_source(&mut self, url: &str) -> Result<(), SessionError>;
    fn attach_media(&mut self, element: Arc<dyn MediaElement>) -> Result<(), SessionError>;
    /// Resume loading after a network failure.
    fn start_load(&mut self) -> Result<(), SessionError>;
    fn recover_media_error(&mut self) -> Result<(), SessionError>;
    /// Releases buffers and workers. Consumes the session.
    fn destroy(self: Box<Self>);
}

pub trait StreamingLibrary: Send + Sync {
    fn create_session(
        &self,
        config: &StreamingConfig,
        events: SessionEventSender,
    ) -> Result<Box<dyn StreamingSession>, SessionError>;
}

/// Handed to each new session; stamps every event with the session's
/// generation.
#[derive(Debug, Clone)]
pub struct SessionEventSender {
    generation: u64,
    sender: mpsc::UnboundedSender<TaggedSessionEvent>,
}

impl SessionEventSender {
    pub fn new(generation: u64, sender: mpsc::UnboundedSender<TaggedSessionEvent>) -> Self {
        Self { generation, sender }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once the player has gone away.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.sender
            .send(TaggedSessionEvent {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Everything the player needs from its host, bundled for construction.
#[derive(Clone)]
pub struct Platform {
    pub element: Arc<dyn MediaElement>,
    pub capabilities: Arc<dyn PlatformCapabilities>,
    pub library: Arc<dyn StreamingLibrary>,
}

impl Platform {
    pub fn new(
        element: Arc<dyn MediaElement>,
        capabilities: Arc<dyn PlatformCapabilities>,
        library: Arc<dyn StreamingLibrary>,
    ) -> Self {
        Self {
            element,
            capabilities,
            library,
        }
    }
}
