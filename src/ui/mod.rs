pub mod thumbnail_gate;

pub use thumbnail_gate::{GatePresentation, PosterImage, PosterView, ThumbnailGate};
