// Playback tuning constants shared by the config defaults and the core.

// === Loading ===
pub const LOADING_TIMEOUT_SECS: u64 = 30;

// === Controls ===
pub const CONTROLS_HIDE_DELAY_SECS: u64 = 3;
pub const SEEK_STEP_SECS: f64 = 5.0;
pub const LONG_SEEK_STEP_SECS: f64 = 10.0;
pub const VOLUME_STEP: f64 = 0.1;

// === Streaming ===
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";
pub const BACK_BUFFER_LENGTH_SECS: u64 = 30;

// Buffer conditions the streaming library reports as non-fatal while it
// rebuffers; they self-recover and never reach the error panel.
pub const SUPPRESSED_ERROR_DETAILS: &[&str] = &[
    "bufferStalledError",
    "bufferSeekOverHole",
    "bufferNudgeOnStall",
];
