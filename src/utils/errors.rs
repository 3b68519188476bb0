use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`PlaybackError`], used for the error panel and
/// for deciding whether a "Try Again" affordance exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    UnsupportedFormat,
    Timeout,
    AutoplayBlocked,
    Network,
    Decode,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Loading timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Autoplay blocked: {0}")]
    AutoplayBlocked(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl PlaybackError {
    pub fn invalid_url() -> Self {
        PlaybackError::Configuration("invalid url".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaybackError::Configuration(_) => ErrorKind::Configuration,
            PlaybackError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            PlaybackError::Timeout(_) => ErrorKind::Timeout,
            PlaybackError::AutoplayBlocked(_) => ErrorKind::AutoplayBlocked,
            PlaybackError::Network(_) => ErrorKind::Network,
            PlaybackError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Terminal errors have no retry path: the source itself is unusable here.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlaybackError::Configuration(_) | PlaybackError::UnsupportedFormat(_)
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlaybackError::Timeout(_) | PlaybackError::Network(_) | PlaybackError::Decode(_)
        )
    }

    /// Soft errors leave playback paused instead of entering `Errored`.
    pub fn is_soft(&self) -> bool {
        matches!(self, PlaybackError::AutoplayBlocked(_))
    }

    /// Text shown in the error panel.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::Configuration(_) => {
                "Invalid video URL provided. Please check the video URL and try again.".to_string()
            }
            PlaybackError::UnsupportedFormat(mime) => {
                format!("This video format ({}) is not supported by your browser.", mime)
            }
            PlaybackError::Timeout(_) => "The video took too long to load.".to_string(),
            PlaybackError::AutoplayBlocked(_) => {
                "Auto-play failed. Click play button to start.".to_string()
            }
            PlaybackError::Network(_) => "A network error interrupted the video.".to_string(),
            PlaybackError::Decode(_) => "The video could not be decoded.".to_string(),
        }
    }
}

/// Failure of a synchronous call into a streaming-library session.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Streaming session error: {0}")]
pub struct SessionError(pub String);

/// Reasons a platform may refuse a `play()` request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayRejection {
    /// Autoplay policy: a user gesture is required.
    #[error("Play not allowed: {0}")]
    NotAllowed(String),

    /// The request was interrupted, usually by a new load or a pause.
    #[error("Play aborted: {0}")]
    Aborted(String),

    #[error("Play not supported: {0}")]
    NotSupported(String),
}

/// Best-effort platform operations (fullscreen and friends).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Fullscreen request denied: {0}")]
    FullscreenDenied(String),

    #[error("Platform error: {0}")]
    Other(String),
}
