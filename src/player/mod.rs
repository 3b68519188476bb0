//! Playback engine: pathway resolution, the playback state machine and the
//! command actor that drives it
pub mod capabilities;
pub mod classify;
pub mod controller;
pub mod controls_visibility;
pub mod error_retry;
pub mod keyboard;
pub mod playback;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod volume;


// Re-export commonly used types
pub use capabilities::StaticCapabilities;
pub use controller::{PlayerCommand, PlayerController, PlayerHandle};
pub use keyboard::{FocusTarget, Key, KeyDisposition, KeyEvent, Shortcut};
pub use playback::PlaybackController;
pub use resolver::{RecoveryOutcome, StreamingSourceResolver};
pub use traits::{
    MediaElement, Platform, PlatformCapabilities, SessionEventSender, StreamingLibrary,
    StreamingSession,
};
pub use types::{
    ElementEvent, MediaErrorCode, Pathway, PlaybackPhase, PlaybackState, PlayerEvent,
    SessionEvent, StreamingClassification, StreamingErrorData, StreamingErrorType,
    TaggedSessionEvent, TriState,
};
