//! Common types shared by the resolver, the controller and platform glue.

use std::fmt;

use crate::utils::errors::PlaybackError;

/// Answer to "can this platform play MIME type X", mirroring the
/// `""` / `"maybe"` / `"probably"` strings browsers return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    No,
    Maybe,
    Probably,
}

impl TriState {
    pub fn from_can_play_type(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "probably" => TriState::Probably,
            "maybe" => TriState::Maybe,
            _ => TriState::No,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, TriState::No)
    }
}

/// Derived from the URL and the platform; recomputed on every resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingClassification {
    NativeHls,
    LibraryHls,
    /// Direct playback of a recognised container, probed before assignment.
    Progressive { mime: &'static str },
    /// Direct playback of anything else, assigned without probing.
    UnknownFormat,
}

impl StreamingClassification {
    pub fn pathway(self) -> Pathway {
        match self {
            StreamingClassification::NativeHls => Pathway::NativeHls,
            StreamingClassification::LibraryHls => Pathway::LibraryHls,
            StreamingClassification::Progressive { .. } | StreamingClassification::UnknownFormat => {
                Pathway::Progressive
            }
        }
    }
}

/// One of the three mutually exclusive playback strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pathway {
    NativeHls,
    LibraryHls,
    Progressive,
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pathway::NativeHls => "native HLS",
            Pathway::LibraryHls => "library HLS",
            Pathway::Progressive => "progressive",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Errored,
}

impl PlaybackPhase {
    /// Phases in which a completed load exists.
    pub fn is_loaded(self) -> bool {
        matches!(
            self,
            PlaybackPhase::Ready | PlaybackPhase::Playing | PlaybackPhase::Paused
        )
    }
}

/// Snapshot of everything the UI renders. Owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub current_time: f64,
    /// `None` until the element reports metadata.
    pub duration: Option<f64>,
    pub volume: f64,
    pub muted: bool,
    pub controls_visible: bool,
    pub fullscreen: bool,
    pub pathway: Option<Pathway>,
    pub last_error: Option<PlaybackError>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            muted: false,
            controls_visible: true,
            fullscreen: false,
            pathway: None,
            last_error: None,
        }
    }
}

impl PlaybackState {
    /// Whether a loading indicator should be drawn.
    pub fn is_loading(&self) -> bool {
        self.phase == PlaybackPhase::Loading
    }

    /// The single error panel to draw, if any.
    pub fn error_panel(&self) -> Option<&PlaybackError> {
        match self.phase {
            PlaybackPhase::Errored => self.last_error.as_ref(),
            _ => self.last_error.as_ref().filter(|e| e.is_soft()),
        }
    }
}

/// Error codes carried by the element's `error` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
}

/// Native notifications from the playback element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    LoadedData,
    CanPlay,
    Error {
        code: MediaErrorCode,
        message: String,
    },
    TimeUpdate,
    DurationChange,
    Play,
    Pause,
    Ended,
    VolumeChange,
    FullscreenChange,
}

/// Error class reported by the streaming library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingErrorType {
    Network,
    Media,
    Mux,
    Key,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamingErrorData {
    pub error_type: StreamingErrorType,
    pub details: String,
    pub fatal: bool,
    pub reason: Option<String>,
}

impl StreamingErrorData {
    pub fn new(error_type: StreamingErrorType, details: impl Into<String>, fatal: bool) -> Self {
        Self {
            error_type,
            details: details.into(),
            fatal,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Lifecycle events emitted by a streaming-library session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ManifestParsed,
    Error(StreamingErrorData),
}

/// A session event stamped with the resolver generation that created the
/// session, so callbacks from a torn-down session can be recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSessionEvent {
    pub generation: u64,
    pub event: SessionEvent,
}

/// Notifications for whoever embeds the player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    LoadStarted { url: String },
    LoadCompleted { pathway: Pathway },
    PhaseChanged(PlaybackPhase),
    FellBackToProgressive { cause: PlaybackError },
    Error(PlaybackError),
    /// A late or unexpected signal that was logged but not acted on.
    Anomaly(String),
}
