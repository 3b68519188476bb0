// Library entry for the playback engine; the probe binary in src/main.rs
// and any platform glue build on top of it.

pub mod config;
pub mod constants;
pub mod models;
pub mod player;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use models::{PlaybackSource, VideoDescriptor};
pub use player::{PlaybackController, PlayerController, PlayerHandle};
pub use ui::ThumbnailGate;
pub use utils::errors::PlaybackError;
