pub mod source;

pub use source::{PlaybackSource, VideoDescriptor};
