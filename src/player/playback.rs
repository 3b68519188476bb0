use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use super::controls_visibility::ControlsVisibility;
use super::error_retry::ErrorRetryManager;
use super::keyboard::{KeyDisposition, KeyEvent, KeyboardIsolation, Shortcut};
use super::resolver::{RecoveryOutcome, StreamingSourceResolver};
use super::traits::{MediaElement, Platform};
use super::types::{
    ElementEvent, MediaErrorCode, Pathway, PlaybackPhase, PlaybackState, PlayerEvent,
    SessionEvent, StreamingErrorData, StreamingErrorType, TaggedSessionEvent,
};
use super::volume::VolumeManager;
use crate::config::{Config, PlaybackConfig};
use crate::models::PlaybackSource;
use crate::utils::errors::{PlayRejection, PlaybackError};

/// The playback state machine and uniform control surface.
///
/// `Idle -> Loading -> {Ready -> Playing <-> Paused} | Errored`. The element
/// is the ground truth: optimistic writes made here are overwritten by the
/// next element notification.
///
/// Timers are plain deadlines; whoever drives the controller calls
/// [`PlaybackController::poll_timers`] when [`PlaybackController::next_deadline`]
/// passes.
pub struct PlaybackController {
    config: PlaybackConfig,
    element: Arc<dyn MediaElement>,
    resolver: StreamingSourceResolver,

    source: Option<PlaybackSource>,
    autoplay: bool,
    /// Play is requested at most once per load.
    autoplay_pending: bool,

    state: PlaybackState,
    volume: VolumeManager,
    controls: ControlsVisibility,
    keyboard: KeyboardIsolation,
    errors: ErrorRetryManager,

    loading_deadline: Option<Instant>,
    /// Seek target accepted before the duration was known.
    pending_seek: Option<f64>,
    /// Error that pushed a library session onto the progressive pathway.
    fallback_cause: Option<PlaybackError>,

    session_receiver: Option<mpsc::UnboundedReceiver<TaggedSessionEvent>>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    event_receiver: Option<mpsc::UnboundedReceiver<PlayerEvent>>,
    disposed: bool,
}

impl PlaybackController {
    /// Mounts a controller on the platform's element. The keyboard handler is
    /// attached here and detached by [`PlaybackController::dispose`].
    pub fn new(config: &Config, platform: Platform) -> Self {
        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let element = platform.element.clone();
        let resolver = StreamingSourceResolver::new(&platform, config.streaming.clone(), session_tx);
        let volume = VolumeManager::new(element.volume(), element.muted());

        let mut keyboard = KeyboardIsolation::new(&config.playback);
        keyboard.attach();

        let state = PlaybackState {
            volume: volume.volume(),
            muted: volume.muted(),
            fullscreen: element.is_fullscreen(),
            ..PlaybackState::default()
        };

        Self {
            config: config.playback.clone(),
            element,
            resolver,
            source: None,
            autoplay: false,
            autoplay_pending: false,
            state,
            volume,
            controls: ControlsVisibility::new(config.playback.controls_hide_delay()),
            keyboard,
            errors: ErrorRetryManager::new(),
            loading_deadline: None,
            pending_seek: None,
            fallback_cause: None,
            session_receiver: Some(session_rx),
            events: event_tx,
            event_receiver: Some(event_rx),
            disposed: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn source(&self) -> Option<&PlaybackSource> {
        self.source.as_ref()
    }

    pub fn retry_count(&self) -> u32 {
        self.errors.retry_count()
    }

    /// Whether the error panel should offer "Try Again".
    pub fn can_retry(&self) -> bool {
        self.state.phase == PlaybackPhase::Errored && self.errors.can_retry()
    }

    pub fn keyboard_attached(&self) -> bool {
        self.keyboard.is_attached()
    }

    /// Streaming-session events; the driver feeds them back through
    /// [`PlaybackController::handle_session_event`]. Can only be taken once.
    pub fn take_session_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<TaggedSessionEvent>> {
        self.session_receiver.take()
    }

    /// Take the notification receiver (can only be done once)
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<PlayerEvent>> {
        self.event_receiver.take()
    }

    /// Replaces the source, tearing down the previous pathway first.
    pub fn set_source(
        &mut self,
        source: PlaybackSource,
        autoplay: bool,
    ) -> Result<Pathway, PlaybackError> {
        if self.disposed {
            warn!("Ignoring source {} for a disposed player", source.url);
            return Err(PlaybackError::Configuration("player disposed".to_string()));
        }
        info!("Setting playback source: {}", source.url);
        self.source = Some(source);
        self.autoplay = autoplay;
        self.errors.clear_error();
        self.errors.reset();
        self.state.last_error = None;
        self.start_load()
    }

    /// Re-enters `Loading` from scratch with the same source. Only possible
    /// from `Errored` with a retryable error; returns whether a retry started.
    pub fn retry(&mut self) -> bool {
        if self.disposed {
            debug!("Ignoring retry on a disposed player");
            return false;
        }
        if self.state.phase != PlaybackPhase::Errored {
            debug!("Ignoring retry in phase {:?}", self.state.phase);
            return false;
        }
        if !self.errors.begin_retry() {
            debug!("Current error is not retryable");
            return false;
        }
        self.state.last_error = None;
        if let Err(e) = self.start_load() {
            debug!("Retry failed immediately: {}", e);
        }
        true
    }

    pub async fn toggle_play(&mut self) {
        if !self.state.phase.is_loaded() {
            debug!("No source loaded, ignoring play toggle");
            return;
        }

        if self.element.paused() {
            self.request_play().await;
        } else {
            self.element.pause();
            self.set_phase(PlaybackPhase::Paused);
        }
    }

    /// Clamps to `[0, duration]`. With no known duration the target is
    /// applied as-is and clamped once the duration arrives.
    pub fn seek(&mut self, target: f64) {
        if matches!(self.state.phase, PlaybackPhase::Idle | PlaybackPhase::Errored) {
            debug!("Nothing to seek in phase {:?}", self.state.phase);
            return;
        }
        if target.is_nan() {
            return;
        }

        let target = target.max(0.0);
        let position = match self.state.duration {
            Some(duration) => {
                self.pending_seek = None;
                target.min(duration)
            }
            None => {
                self.pending_seek = Some(target);
                target
            }
        };

        trace!("Seeking to {:.2}s", position);
        self.element.set_current_time(position);
        self.state.current_time = position;
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume.set_volume(volume);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    /// Best effort; a refusal is logged and leaves the state unchanged.
    pub fn toggle_fullscreen(&mut self) {
        let result = if self.element.is_fullscreen() {
            self.element.exit_fullscreen()
        } else {
            self.element.request_fullscreen()
        };

        if let Err(e) = result {
            warn!("Fullscreen toggle failed: {}", e);
        }
        self.state.fullscreen = self.element.is_fullscreen();
    }

    pub fn pointer_moved(&mut self) {
        self.controls.pointer_moved(Instant::now());
        self.sync_controls();
    }

    pub fn pointer_left(&mut self) {
        self.controls
            .pointer_left(self.state.phase == PlaybackPhase::Playing);
        self.sync_controls();
    }

    /// Runs the shortcut for an intercepted key. The caller stops
    /// propagation when this returns [`KeyDisposition::Intercept`].
    pub async fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        let disposition = self.keyboard.dispatch(event);
        let KeyDisposition::Intercept(shortcut) = disposition else {
            return disposition;
        };

        trace!("Key {:?} -> {:?}", event.key, shortcut);
        match shortcut {
            Shortcut::TogglePlay => self.toggle_play().await,
            Shortcut::ToggleMute => self.toggle_mute(),
            Shortcut::ToggleFullscreen => self.toggle_fullscreen(),
            Shortcut::SeekBy(delta) => self.seek(self.state.current_time + delta),
            Shortcut::VolumeBy(delta) => {
                if delta >= 0.0 {
                    self.volume.volume_up(delta);
                } else {
                    self.volume.volume_down(-delta);
                }
                self.apply_volume();
            }
            Shortcut::SeekToFraction(fraction) => {
                if let Some(duration) = self.state.duration {
                    self.seek(duration * fraction);
                }
            }
        }
        disposition
    }

    /// Mirrors a native element notification into the state.
    pub async fn handle_element_event(&mut self, event: ElementEvent) {
        if self.disposed {
            return;
        }

        match event {
            ElementEvent::LoadedData | ElementEvent::CanPlay => {
                if self.state.phase == PlaybackPhase::Loading {
                    debug!("Element reported {:?}", event);
                    self.on_load_completed().await;
                }
            }
            ElementEvent::Error { code, message } => self.on_element_error(code, message),
            ElementEvent::TimeUpdate => {
                self.state.current_time = self.element.current_time();
            }
            ElementEvent::DurationChange => self.sync_duration(),
            ElementEvent::Play => {
                if matches!(self.state.phase, PlaybackPhase::Ready | PlaybackPhase::Paused) {
                    self.set_phase(PlaybackPhase::Playing);
                }
            }
            ElementEvent::Pause | ElementEvent::Ended => {
                if self.state.phase == PlaybackPhase::Playing {
                    self.set_phase(PlaybackPhase::Paused);
                }
            }
            ElementEvent::VolumeChange => {
                self.volume
                    .sync_from_element(self.element.volume(), self.element.muted());
                self.state.volume = self.volume.volume();
                self.state.muted = self.volume.muted();
            }
            ElementEvent::FullscreenChange => {
                self.state.fullscreen = self.element.is_fullscreen();
            }
        }
    }

    /// Applies a streaming-session event, dropping those from torn-down
    /// sessions.
    pub async fn handle_session_event(&mut self, tagged: TaggedSessionEvent) {
        if self.disposed || !self.resolver.is_current(&tagged) {
            trace!(
                "Ignoring event from stale session generation {}",
                tagged.generation
            );
            return;
        }

        match tagged.event {
            SessionEvent::ManifestParsed => {
                if self.state.phase == PlaybackPhase::Loading {
                    debug!("Manifest parsed");
                    self.on_load_completed().await;
                }
            }
            SessionEvent::Error(data) => {
                let outcome = self.resolver.handle_session_error(&data);
                self.apply_recovery(outcome);
            }
        }
    }

    /// Fires expired timers.
    pub fn poll_timers(&mut self, now: Instant) {
        if let Some(deadline) = self.loading_deadline
            && now >= deadline
        {
            self.loading_deadline = None;
            if self.state.phase == PlaybackPhase::Loading {
                let timeout = self.config.loading_timeout();
                warn!("Loading timed out after {:?}", timeout);
                self.fail(PlaybackError::Timeout(timeout));
            }
        }

        if self
            .controls
            .poll(now, self.state.phase == PlaybackPhase::Playing)
        {
            trace!("Controls hidden after inactivity");
        }
        self.sync_controls();
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.loading_deadline, self.controls.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Releases the pathway, clears both timers and detaches the key handler.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!("Disposing playback controller");
        self.disposed = true;
        self.resolver.teardown();
        self.loading_deadline = None;
        self.pending_seek = None;
        self.autoplay_pending = false;
        self.controls.reset();
        self.keyboard.detach();
        self.state.pathway = None;
        self.state.phase = PlaybackPhase::Idle;
    }

    fn start_load(&mut self) -> Result<Pathway, PlaybackError> {
        let Some(url) = self.source.as_ref().map(|s| s.url.clone()) else {
            return Err(PlaybackError::Configuration("no source".to_string()));
        };

        self.loading_deadline = None;
        self.pending_seek = None;
        self.fallback_cause = None;
        self.autoplay_pending = self.autoplay;
        self.state.current_time = 0.0;
        self.state.duration = None;
        self.controls.reset();
        self.sync_controls();

        self.emit(PlayerEvent::LoadStarted { url: url.clone() });
        self.set_phase(PlaybackPhase::Loading);

        match self.resolver.resolve(&url) {
            Ok(pathway) => {
                info!("Loading via {} pathway", pathway);
                self.state.pathway = Some(pathway);
                self.loading_deadline = Some(Instant::now() + self.config.loading_timeout());
                Ok(pathway)
            }
            Err(e) => {
                self.state.pathway = None;
                self.fail(e.clone());
                Err(e)
            }
        }
    }

    async fn on_load_completed(&mut self) {
        self.loading_deadline = None;
        self.fallback_cause = None;
        self.errors.reset();
        self.sync_duration();
        self.set_phase(PlaybackPhase::Ready);

        if let Some(pathway) = self.state.pathway {
            self.emit(PlayerEvent::LoadCompleted { pathway });
        }

        if std::mem::take(&mut self.autoplay_pending) {
            debug!("Autoplaying");
            self.request_play().await;
        }
    }

    async fn request_play(&mut self) {
        match self.element.play().await {
            Ok(()) => {
                if self.state.phase.is_loaded() {
                    self.set_phase(PlaybackPhase::Playing);
                }
            }
            Err(PlayRejection::Aborted(reason)) => {
                debug!("Play request interrupted: {}", reason);
            }
            Err(rejection) => {
                warn!("Play request rejected: {}", rejection);
                let error = PlaybackError::AutoplayBlocked(rejection.to_string());
                self.errors.show_error(error.clone());
                self.state.last_error = Some(error.clone());
                if self.state.phase.is_loaded() {
                    self.set_phase(PlaybackPhase::Paused);
                }
                self.emit(PlayerEvent::Error(error));
            }
        }
    }

    fn on_element_error(&mut self, code: MediaErrorCode, message: String) {
        match self.state.phase {
            PlaybackPhase::Loading => {
                if code == MediaErrorCode::Aborted {
                    debug!("Element load aborted: {}", message);
                    return;
                }
                // the streaming session gets its in-pathway recovery first
                if self.state.pathway == Some(Pathway::LibraryHls) && self.resolver.has_session() {
                    let error_type = match code {
                        MediaErrorCode::Network => StreamingErrorType::Network,
                        _ => StreamingErrorType::Media,
                    };
                    debug!("Element {:?} error on streaming session: {}", code, message);
                    let data = StreamingErrorData::new(error_type, message, true);
                    let outcome = self.resolver.handle_session_error(&data);
                    self.apply_recovery(outcome);
                    return;
                }
                // a failed fallback surfaces what broke the streaming session
                let error = match self.fallback_cause.take() {
                    Some(cause) => cause,
                    None => match code {
                        MediaErrorCode::Network => PlaybackError::Network(message),
                        MediaErrorCode::Decode => PlaybackError::Decode(message),
                        MediaErrorCode::SrcNotSupported | MediaErrorCode::Aborted => {
                            PlaybackError::UnsupportedFormat(message)
                        }
                    },
                };
                self.fail(error);
            }
            PlaybackPhase::Ready | PlaybackPhase::Playing | PlaybackPhase::Paused => {
                warn!(
                    "Element error after load completed ({:?}: {}), ignoring",
                    code, message
                );
                self.emit(PlayerEvent::Anomaly(format!("{:?}: {}", code, message)));
            }
            PlaybackPhase::Idle | PlaybackPhase::Errored => {
                trace!("Element error in phase {:?} ignored", self.state.phase);
            }
        }
    }

    fn apply_recovery(&mut self, outcome: RecoveryOutcome) {
        match outcome {
            RecoveryOutcome::Suppressed | RecoveryOutcome::Logged => {}
            RecoveryOutcome::Recovering(kind) => {
                debug!("Streaming session recovering from {:?} error", kind);
            }
            RecoveryOutcome::FellBack { cause } => self.on_fell_back(cause),
            RecoveryOutcome::Failed(cause) => self.fail(cause),
        }
    }

    fn on_fell_back(&mut self, cause: PlaybackError) {
        info!("Fell back to progressive playback after: {}", cause);
        let was_playing = self.state.phase == PlaybackPhase::Playing;

        self.state.pathway = Some(Pathway::Progressive);
        self.state.current_time = 0.0;
        self.state.duration = None;
        self.pending_seek = None;
        self.fallback_cause = Some(cause.clone());
        self.autoplay_pending = self.autoplay || was_playing;
        self.emit(PlayerEvent::FellBackToProgressive { cause });

        self.set_phase(PlaybackPhase::Loading);
        self.loading_deadline = Some(Instant::now() + self.config.loading_timeout());
    }

    fn fail(&mut self, error: PlaybackError) {
        error!("Playback failed: {}", error);
        self.loading_deadline = None;
        self.autoplay_pending = false;
        self.fallback_cause = None;
        self.resolver.teardown();
        self.state.pathway = None;

        self.errors.show_error(error.clone());
        self.state.last_error = Some(error.clone());
        self.set_phase(PlaybackPhase::Errored);
        self.emit(PlayerEvent::Error(error));
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        let previous = self.state.phase;
        if previous == phase {
            return;
        }
        debug!("Playback phase {:?} -> {:?}", previous, phase);
        self.state.phase = phase;

        if phase == PlaybackPhase::Playing
            && self.state.last_error.as_ref().is_some_and(PlaybackError::is_soft)
        {
            self.errors.clear_error();
            self.state.last_error = None;
        }

        let playing = phase == PlaybackPhase::Playing;
        if playing != (previous == PlaybackPhase::Playing) {
            self.controls.on_playing_changed(playing, Instant::now());
            self.sync_controls();
        }

        self.emit(PlayerEvent::PhaseChanged(phase));
    }

    fn sync_duration(&mut self) {
        self.state.duration = self
            .element
            .duration()
            .filter(|d| d.is_finite() && *d >= 0.0);

        if let (Some(duration), Some(target)) = (self.state.duration, self.pending_seek) {
            self.pending_seek = None;
            if target > duration {
                debug!("Clamping deferred seek {:.2}s to {:.2}s", target, duration);
                self.element.set_current_time(duration);
                self.state.current_time = duration;
            }
        }
    }

    fn apply_volume(&mut self) {
        self.element.set_volume(self.volume.volume());
        self.element.set_muted(self.volume.muted());
        self.state.volume = self.volume.volume();
        self.state.muted = self.volume.muted();
    }

    fn sync_controls(&mut self) {
        self.state.controls_visible = self.controls.is_visible();
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.dispose();
    }
}
