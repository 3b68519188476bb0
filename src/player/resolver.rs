use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::classify::{classify, container_mime, parse_source_url};
use super::traits::{
    MediaElement, Platform, PlatformCapabilities, SessionEventSender, StreamingLibrary,
    StreamingSession,
};
use super::types::{
    Pathway, StreamingClassification, StreamingErrorData, StreamingErrorType, TaggedSessionEvent,
};
use crate::config::StreamingConfig;
use crate::utils::errors::{ErrorKind, PlaybackError};

/// What happened to a streaming-library error event.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryOutcome {
    /// Expected buffering condition, swallowed.
    Suppressed,
    /// Non-fatal, logged only.
    Logged,
    /// The in-pathway recovery call went through; the session keeps going.
    Recovering(ErrorKind),
    /// The session is gone and the same URL is now playing progressively.
    FellBack { cause: PlaybackError },
    /// Nothing left to try.
    Failed(PlaybackError),
}

/// Selects and owns exactly one playback pathway for the element.
///
/// Every pathway change bumps `generation`; sessions are handed a sender
/// stamped with the generation they were created under, so events from a
/// destroyed session can be told apart from the live one.
pub struct StreamingSourceResolver {
    element: Arc<dyn MediaElement>,
    capabilities: Arc<dyn PlatformCapabilities>,
    library: Arc<dyn StreamingLibrary>,
    config: StreamingConfig,
    events: mpsc::UnboundedSender<TaggedSessionEvent>,

    session: Option<Box<dyn StreamingSession>>,
    pathway: Option<Pathway>,
    url: Option<Url>,
    generation: u64,
    network_recovery_used: bool,
    media_recovery_used: bool,
}

impl StreamingSourceResolver {
    pub fn new(
        platform: &Platform,
        config: StreamingConfig,
        events: mpsc::UnboundedSender<TaggedSessionEvent>,
    ) -> Self {
        Self {
            element: platform.element.clone(),
            capabilities: platform.capabilities.clone(),
            library: platform.library.clone(),
            config,
            events,
            session: None,
            pathway: None,
            url: None,
            generation: 0,
            network_recovery_used: false,
            media_recovery_used: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pathway(&self) -> Option<Pathway> {
        self.pathway
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Whether an event came from the session that is currently attached.
    pub fn is_current(&self, event: &TaggedSessionEvent) -> bool {
        self.session.is_some() && event.generation == self.generation
    }

    /// Tears down whatever pathway is active, then establishes one for `raw_url`.
    pub fn resolve(&mut self, raw_url: &str) -> Result<Pathway, PlaybackError> {
        self.teardown();

        let url = parse_source_url(raw_url).inspect_err(|_| {
            error!("Invalid video URL: {:?}", raw_url);
        })?;

        self.network_recovery_used = false;
        self.media_recovery_used = false;
        self.url = Some(url.clone());

        let classification = classify(&url, self.capabilities.as_ref());
        debug!("Classified {} as {:?}", url, classification);

        match classification {
            StreamingClassification::NativeHls => {
                info!("Using native HLS support for {}", url);
                self.assign_direct(&url, Pathway::NativeHls);
                Ok(Pathway::NativeHls)
            }
            StreamingClassification::LibraryHls => {
                info!("Using streaming library for {}", url);
                match self.attach_library(&url) {
                    Ok(()) => Ok(Pathway::LibraryHls),
                    Err(e) => {
                        warn!("Streaming session setup failed ({}), trying direct video", e);
                        self.teardown_session();
                        self.establish_progressive(&url)
                    }
                }
            }
            StreamingClassification::Progressive { .. } | StreamingClassification::UnknownFormat => {
                info!("Using direct playback for {}", url);
                self.establish_progressive(&url)
            }
        }
    }

    /// Applies the recovery policy to an error reported by the live session.
    pub fn handle_session_error(&mut self, data: &StreamingErrorData) -> RecoveryOutcome {
        if !data.fatal {
            if self.config.is_suppressed(&data.details) {
                trace!("Suppressed streaming buffer event: {}", data.details);
                return RecoveryOutcome::Suppressed;
            }
            warn!(
                "Streaming warning: type={:?} details={} reason={}",
                data.error_type,
                data.details,
                data.reason.as_deref().unwrap_or("Unknown")
            );
            return RecoveryOutcome::Logged;
        }

        error!(
            "Streaming fatal error: type={:?} details={} reason={}",
            data.error_type,
            data.details,
            data.reason.as_deref().unwrap_or("Unknown")
        );

        match data.error_type {
            StreamingErrorType::Network => {
                let cause = PlaybackError::Network(data.details.clone());
                if self.network_recovery_used {
                    info!("Network recovery already attempted, falling back to direct video");
                    return self.fall_back_to_progressive(cause);
                }
                self.network_recovery_used = true;
                info!("Network error, trying to recover");
                let attempt = match self.session.as_mut() {
                    Some(session) => session.start_load(),
                    None => return RecoveryOutcome::Failed(cause),
                };
                match attempt {
                    Ok(()) => RecoveryOutcome::Recovering(ErrorKind::Network),
                    Err(e) => {
                        warn!("Recovery failed ({}), falling back to direct video", e);
                        self.fall_back_to_progressive(cause)
                    }
                }
            }
            StreamingErrorType::Media => {
                let cause = PlaybackError::Decode(data.details.clone());
                if self.media_recovery_used {
                    info!("Media recovery already attempted, falling back to direct video");
                    return self.fall_back_to_progressive(cause);
                }
                self.media_recovery_used = true;
                info!("Media error, trying to recover");
                let attempt = match self.session.as_mut() {
                    Some(session) => session.recover_media_error(),
                    None => return RecoveryOutcome::Failed(cause),
                };
                match attempt {
                    Ok(()) => RecoveryOutcome::Recovering(ErrorKind::Decode),
                    Err(e) => {
                        warn!("Media recovery failed ({}), falling back to direct video", e);
                        self.fall_back_to_progressive(cause)
                    }
                }
            }
            StreamingErrorType::Mux => {
                info!("Fatal error, destroying streaming session");
                self.fall_back_to_progressive(PlaybackError::Decode(data.details.clone()))
            }
            StreamingErrorType::Key | StreamingErrorType::Other => {
                info!("Fatal error, destroying streaming session");
                self.fall_back_to_progressive(PlaybackError::Network(data.details.clone()))
            }
        }
    }

    /// Drops the active pathway. The element keeps its last source only when
    /// nothing was attached.
    pub fn teardown(&mut self) {
        self.teardown_session();
        if self.pathway.take().is_some() {
            self.element.set_src(None);
        }
        self.url = None;
    }

    fn teardown_session(&mut self) {
        self.generation += 1;
        if let Some(session) = self.session.take() {
            debug!("Destroying streaming session");
            session.destroy();
        }
    }

    fn attach_library(&mut self, url: &Url) -> Result<(), PlaybackError> {
        self.generation += 1;
        let sender = SessionEventSender::new(self.generation, self.events.clone());

        let mut session = self
            .library
            .create_session(&self.config, sender)
            .map_err(|e| PlaybackError::Network(e.to_string()))?;

        let attached = session
            .load_source(url.as_str())
            .and_then(|_| session.attach_media(self.element.clone()));

        // Keep the session even on failure so teardown disposes it.
        self.session = Some(session);
        self.pathway = Some(Pathway::LibraryHls);

        attached.map_err(|e| PlaybackError::Network(e.to_string()))
    }

    fn establish_progressive(&mut self, url: &Url) -> Result<Pathway, PlaybackError> {
        if let Some(mime) = container_mime(url) {
            let support = self.capabilities.supports_container(mime);
            if !support.is_supported() {
                warn!("Platform reports no support for {}", mime);
                self.pathway = None;
                return Err(PlaybackError::UnsupportedFormat(mime.to_string()));
            }
            debug!("Platform support for {}: {:?}", mime, support);
        }

        self.assign_direct(url, Pathway::Progressive);
        Ok(Pathway::Progressive)
    }

    fn assign_direct(&mut self, url: &Url, pathway: Pathway) {
        self.element.set_src(Some(url.as_str()));
        self.element.load();
        self.pathway = Some(pathway);
    }

    fn fall_back_to_progressive(&mut self, cause: PlaybackError) -> RecoveryOutcome {
        self.teardown_session();

        let Some(url) = self.url.clone() else {
            self.pathway = None;
            return RecoveryOutcome::Failed(cause);
        };

        match self.establish_progressive(&url) {
            Ok(_) => RecoveryOutcome::FellBack { cause },
            Err(e) => {
                warn!("Direct video fallback failed: {}", e);
                RecoveryOutcome::Failed(cause)
            }
        }
    }
}

impl Drop for StreamingSourceResolver {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.destroy();
        }
    }
}
