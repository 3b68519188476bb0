use tracing::trace;

use crate::config::PlaybackConfig;

/// A key as named by the platform's `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Digit(u8),
    Char(char),
    Other(String),
}

impl Key {
    pub fn from_key_name(name: &str) -> Self {
        match name {
            " " | "Spacebar" | "Space" => Key::Space,
            "Enter" => Key::Enter,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

/// Where a key event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The player container or one of its controls.
    Player,
    /// A text field, text area or editable region anywhere on the page.
    TextInput,
    /// Anything else on the page.
    Page,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub target: FocusTarget,
    /// Whether the page's active element is a text input, regardless of target.
    pub text_input_focused: bool,
}

impl KeyEvent {
    pub fn on_player(key: Key) -> Self {
        Self {
            key,
            target: FocusTarget::Player,
            text_input_focused: false,
        }
    }
}

/// Player action bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shortcut {
    TogglePlay,
    ToggleMute,
    ToggleFullscreen,
    SeekBy(f64),
    VolumeBy(f64),
    /// Seek to this fraction (0.0 - 0.9) of the known duration.
    SeekToFraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyDisposition {
    /// Leave the event to the rest of the page.
    PassThrough,
    /// Stop propagation and default handling; run the shortcut.
    Intercept(Shortcut),
}

/// One capture-phase key handler per mounted player.
///
/// Attached on mount, detached on disposal. A detached handler intercepts
/// nothing, and neither does an attached one while a text input has focus.
#[derive(Debug)]
pub struct KeyboardIsolation {
    attached: bool,
    seek_step: f64,
    long_seek_step: f64,
    volume_step: f64,
}

impl KeyboardIsolation {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            attached: false,
            seek_step: config.seek_step_secs,
            long_seek_step: config.long_seek_step_secs,
            volume_step: config.volume_step,
        }
    }

    pub fn attach(&mut self) {
        if !self.attached {
            trace!("Attaching player key handler");
            self.attached = true;
        }
    }

    pub fn detach(&mut self) {
        if self.attached {
            trace!("Detaching player key handler");
            self.attached = false;
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn dispatch(&self, event: &KeyEvent) -> KeyDisposition {
        if !self.attached
            || event.text_input_focused
            || event.target != FocusTarget::Player
        {
            return KeyDisposition::PassThrough;
        }

        match self.shortcut_for(&event.key) {
            Some(shortcut) => KeyDisposition::Intercept(shortcut),
            None => KeyDisposition::PassThrough,
        }
    }

    fn shortcut_for(&self, key: &Key) -> Option<Shortcut> {
        let shortcut = match key {
            Key::Space | Key::Enter | Key::Char('k') => Shortcut::TogglePlay,
            Key::Char('m') => Shortcut::ToggleMute,
            Key::Char('f') => Shortcut::ToggleFullscreen,
            Key::Char('j') => Shortcut::SeekBy(-self.long_seek_step),
            Key::Char('l') => Shortcut::SeekBy(self.long_seek_step),
            Key::ArrowLeft => Shortcut::SeekBy(-self.seek_step),
            Key::ArrowRight => Shortcut::SeekBy(self.seek_step),
            Key::ArrowUp => Shortcut::VolumeBy(self.volume_step),
            Key::ArrowDown => Shortcut::VolumeBy(-self.volume_step),
            Key::Digit(n) => Shortcut::SeekToFraction(f64::from(*n) / 10.0),
            Key::Char(_) | Key::Other(_) => return None,
        };
        Some(shortcut)
    }
}
