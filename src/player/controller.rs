use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace};

use super::keyboard::{KeyDisposition, KeyEvent};
use super::playback::PlaybackController;
use super::traits::Platform;
use super::types::{ElementEvent, Pathway, PlaybackState, PlayerEvent, TaggedSessionEvent};
use crate::config::Config;
use crate::models::PlaybackSource;
use crate::utils::errors::PlaybackError;

/// Commands that can be sent to the player controller
#[derive(Debug)]
pub enum PlayerCommand {
    /// Replace the source and start loading it
    SetSource {
        source: PlaybackSource,
        autoplay: bool,
        respond_to: oneshot::Sender<Result<Pathway, PlaybackError>>,
    },
    /// Re-enter loading after a retryable error
    Retry { respond_to: oneshot::Sender<bool> },
    /// Play if paused, pause otherwise
    TogglePlay { respond_to: oneshot::Sender<()> },
    /// Seek to position in seconds
    Seek {
        position: f64,
        respond_to: oneshot::Sender<()>,
    },
    /// Set volume (0.0 to 1.0)
    SetVolume {
        volume: f64,
        respond_to: oneshot::Sender<()>,
    },
    /// Toggle mute
    ToggleMute { respond_to: oneshot::Sender<()> },
    /// Enter or leave fullscreen
    ToggleFullscreen { respond_to: oneshot::Sender<()> },
    /// Key pressed while the player is mounted
    Key {
        event: KeyEvent,
        respond_to: oneshot::Sender<KeyDisposition>,
    },
    /// Get a snapshot of the playback state
    GetState {
        respond_to: oneshot::Sender<PlaybackState>,
    },
    /// Pointer moved over the player
    PointerMoved,
    /// Pointer left the player
    PointerLeft,
    /// Release everything and stop the event loop
    Dispose { respond_to: oneshot::Sender<()> },
}

/// Controller that owns the playback core and processes commands, element
/// events, streaming-session events and timers on one task.
pub struct PlayerController {
    playback: PlaybackController,
    receiver: mpsc::UnboundedReceiver<PlayerCommand>,
    element_events: mpsc::UnboundedReceiver<ElementEvent>,
    session_events: mpsc::UnboundedReceiver<TaggedSessionEvent>,
}

impl PlayerController {
    /// Create a new player controller with the given config
    pub fn new(config: &Config, platform: Platform) -> Result<(PlayerHandle, PlayerController)> {
        let mut playback = PlaybackController::new(config, platform);
        let session_events = playback
            .take_session_receiver()
            .ok_or_else(|| anyhow::anyhow!("Session receiver already taken"))?;
        let event_receiver = playback.take_event_receiver();

        let (sender, receiver) = mpsc::unbounded_channel();
        let (element_sender, element_events) = mpsc::unbounded_channel();

        let controller = PlayerController {
            playback,
            receiver,
            element_events,
            session_events,
        };
        let handle = PlayerHandle {
            sender,
            element_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
        };

        Ok((handle, controller))
    }

    /// Run the controller event loop
    pub async fn run(mut self) {
        debug!("PlayerController event loop started");

        loop {
            let deadline = self.playback.next_deadline();

            // platform events queued before a command are applied first
            tokio::select! {
                biased;

                Some(event) = self.element_events.recv() => {
                    trace!("Element event: {:?}", event);
                    self.playback.handle_element_event(event).await;
                }
                Some(event) = self.session_events.recv() => {
                    trace!("Session event: {:?}", event);
                    self.playback.handle_session_event(event).await;
                }
                _ = sleep_until(deadline) => {
                    self.playback.poll_timers(Instant::now());
                }
                command = self.receiver.recv() => {
                    let Some(command) = command else {
                        debug!("All player handles dropped");
                        break;
                    };
                    if !self.handle_command(command).await {
                        break;
                    }
                }
            }
        }

        self.playback.dispose();
        debug!("PlayerController event loop terminated");
    }

    /// Returns false once the loop should stop.
    async fn handle_command(&mut self, command: PlayerCommand) -> bool {
        match command {
            PlayerCommand::SetSource {
                source,
                autoplay,
                respond_to,
            } => {
                trace!("Setting source: {}", source.url);
                let result = self.playback.set_source(source, autoplay);
                let _ = respond_to.send(result);
            }
            PlayerCommand::Retry { respond_to } => {
                trace!("Retrying");
                let _ = respond_to.send(self.playback.retry());
            }
            PlayerCommand::TogglePlay { respond_to } => {
                trace!("Toggling playback");
                self.playback.toggle_play().await;
                let _ = respond_to.send(());
            }
            PlayerCommand::Seek {
                position,
                respond_to,
            } => {
                trace!("Seeking to {}", position);
                self.playback.seek(position);
                let _ = respond_to.send(());
            }
            PlayerCommand::SetVolume { volume, respond_to } => {
                trace!("Setting volume to {}", volume);
                self.playback.set_volume(volume);
                let _ = respond_to.send(());
            }
            PlayerCommand::ToggleMute { respond_to } => {
                trace!("Toggling mute");
                self.playback.toggle_mute();
                let _ = respond_to.send(());
            }
            PlayerCommand::ToggleFullscreen { respond_to } => {
                trace!("Toggling fullscreen");
                self.playback.toggle_fullscreen();
                let _ = respond_to.send(());
            }
            PlayerCommand::Key { event, respond_to } => {
                let disposition = self.playback.handle_key(&event).await;
                let _ = respond_to.send(disposition);
            }
            PlayerCommand::GetState { respond_to } => {
                let _ = respond_to.send(self.playback.state().clone());
            }
            PlayerCommand::PointerMoved => self.playback.pointer_moved(),
            PlayerCommand::PointerLeft => self.playback.pointer_left(),
            PlayerCommand::Dispose { respond_to } => {
                self.playback.dispose();
                let _ = respond_to.send(());
                return false;
            }
        }
        true
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Handle to send commands to the player controller
#[derive(Clone)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerCommand>,
    element_sender: mpsc::UnboundedSender<ElementEvent>,
    event_receiver: Arc<Mutex<Option<mpsc::UnboundedReceiver<PlayerEvent>>>>,
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("sender", &"<UnboundedSender>")
            .field("event_receiver", &"<Arc<Mutex<...>>>")
            .finish()
    }
}

impl PlayerHandle {
    /// Take the notification receiver (can only be done once)
    pub fn take_event_receiver(&self) -> Option<mpsc::UnboundedReceiver<PlayerEvent>> {
        self.event_receiver
            .lock()
            .ok()
            .and_then(|mut receiver| receiver.take())
    }

    /// Sender for the element's native notifications, for platform glue.
    pub fn element_events(&self) -> mpsc::UnboundedSender<ElementEvent> {
        self.element_sender.clone()
    }

    /// Forward one native element notification
    pub fn notify_element(&self, event: ElementEvent) -> Result<()> {
        self.element_sender
            .send(event)
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> PlayerCommand,
    ) -> Result<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(command(respond_to))
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from player controller"))
    }

    /// Replace the source and start loading it
    pub async fn set_source(
        &self,
        source: PlaybackSource,
        autoplay: bool,
    ) -> Result<Result<Pathway, PlaybackError>> {
        self.request(|respond_to| PlayerCommand::SetSource {
            source,
            autoplay,
            respond_to,
        })
        .await
    }

    /// Retry after a retryable error; false if there was nothing to retry
    pub async fn retry(&self) -> Result<bool> {
        self.request(|respond_to| PlayerCommand::Retry { respond_to })
            .await
    }

    pub async fn toggle_play(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::TogglePlay { respond_to })
            .await
    }

    /// Seek to position in seconds
    pub async fn seek(&self, position: f64) -> Result<()> {
        self.request(|respond_to| PlayerCommand::Seek {
            position,
            respond_to,
        })
        .await
    }

    /// Set volume (0.0 to 1.0)
    pub async fn set_volume(&self, volume: f64) -> Result<()> {
        self.request(|respond_to| PlayerCommand::SetVolume { volume, respond_to })
            .await
    }

    pub async fn toggle_mute(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::ToggleMute { respond_to })
            .await
    }

    pub async fn toggle_fullscreen(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::ToggleFullscreen { respond_to })
            .await
    }

    /// Offer a key event; `Intercept` means the caller must stop propagation
    pub async fn handle_key(&self, event: KeyEvent) -> Result<KeyDisposition> {
        self.request(|respond_to| PlayerCommand::Key { event, respond_to })
            .await
    }

    /// Get player state
    pub async fn get_state(&self) -> Result<PlaybackState> {
        self.request(|respond_to| PlayerCommand::GetState { respond_to })
            .await
    }

    pub fn pointer_moved(&self) -> Result<()> {
        self.sender
            .send(PlayerCommand::PointerMoved)
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))
    }

    pub fn pointer_left(&self) -> Result<()> {
        self.sender
            .send(PlayerCommand::PointerLeft)
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))
    }

    /// Release the pathway and stop the controller
    pub async fn dispose(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::Dispose { respond_to })
            .await
    }
}
