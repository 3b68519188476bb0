use tracing::debug;

use crate::config::PlaybackConfig;
use crate::models::PlaybackSource;
use crate::utils::format_duration_badge;

pub const NO_VIDEO_MESSAGE: &str = "No video available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterImage {
    Url(String),
    /// Generic video glyph when there is no poster
    Placeholder,
}

/// The gated presentation: a poster plus a play affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterView {
    pub image: PosterImage,
    pub title: Option<String>,
    pub duration_badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatePresentation {
    /// No URL at all
    Empty { message: &'static str },
    Poster(PosterView),
    /// The mounted player renders itself
    Player,
}

/// Defers mounting a player until the user asks for playback.
///
/// `P` is whatever the mount closure builds, typically a
/// [`crate::player::PlayerHandle`] or a [`crate::player::PlaybackController`].
/// Changing the source URL always drops back to the poster.
pub struct ThumbnailGate<P> {
    source: PlaybackSource,
    autoplay_on_activate: bool,
    suppress_autoplay: bool,
    player: Option<P>,
}

impl<P> ThumbnailGate<P> {
    pub fn new(source: PlaybackSource, config: &PlaybackConfig) -> Self {
        Self {
            source,
            autoplay_on_activate: config.autoplay_on_activate,
            suppress_autoplay: false,
            player: None,
        }
    }

    pub fn with_autoplay_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_autoplay = suppress;
        self
    }

    pub fn source(&self) -> &PlaybackSource {
        &self.source
    }

    pub fn is_activated(&self) -> bool {
        self.player.is_some()
    }

    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut P> {
        self.player.as_mut()
    }

    /// Autoplay flag handed to the mount closure.
    pub fn autoplay(&self) -> bool {
        self.autoplay_on_activate && !self.suppress_autoplay
    }

    pub fn presentation(&self) -> GatePresentation {
        if !self.source.has_url() {
            return GatePresentation::Empty {
                message: NO_VIDEO_MESSAGE,
            };
        }
        if self.player.is_some() {
            return GatePresentation::Player;
        }

        let image = match self.source.poster_url.as_deref() {
            Some(url) if !url.trim().is_empty() => PosterImage::Url(url.to_string()),
            _ => PosterImage::Placeholder,
        };

        GatePresentation::Poster(PosterView {
            image,
            title: self.source.title.clone(),
            duration_badge: self.source.duration_hint.and_then(format_duration_badge),
        })
    }

    /// Mounts the player on first activation; later activations return the
    /// mounted player. Does nothing without a URL.
    pub fn activate<F, E>(&mut self, mount: F) -> Result<Option<&mut P>, E>
    where
        F: FnOnce(&PlaybackSource, bool) -> Result<P, E>,
    {
        if !self.source.has_url() {
            debug!("Ignoring activation without a video URL");
            return Ok(None);
        }

        if self.player.is_none() {
            debug!("Mounting player for {}", self.source.url);
            let player = mount(&self.source, self.autoplay())?;
            self.player = Some(player);
        }

        Ok(self.player.as_mut())
    }

    /// Updates the source. A different URL unmounts the player and returns it
    /// so the caller can dispose of it.
    pub fn set_source(&mut self, source: PlaybackSource) -> Option<P> {
        let url_changed = source.url != self.source.url;
        self.source = source;

        if url_changed {
            debug!("Video URL changed, returning to thumbnail");
            self.player.take()
        } else {
            None
        }
    }

    /// Unmounts the player, returning it for disposal.
    pub fn deactivate(&mut self) -> Option<P> {
        self.player.take()
    }
}
