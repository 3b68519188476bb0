pub mod errors;
pub mod format;

pub use errors::{ErrorKind, PlatformError, PlayRejection, PlaybackError, SessionError};
pub use format::{format_duration_badge, format_time, progress_percentage};
