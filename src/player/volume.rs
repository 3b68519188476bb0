/// Keeps volume and mute coupled.
/// Volume 0 always means muted, and raising the volume while muted unmutes.
/// Toggling mute leaves the stored volume alone so unmuting restores it.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeManager {
    volume: f64,
    muted: bool,
    /// Last non-zero volume, restored when unmuting from 0.
    last_audible: f64,
}

impl Default for VolumeManager {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

impl VolumeManager {
    pub fn new(volume: f64, muted: bool) -> Self {
        let volume = volume.clamp(0.0, 1.0);
        Self {
            volume,
            muted: muted || volume == 0.0,
            last_audible: if volume > 0.0 { volume } else { 1.0 },
        }
    }

    /// Get current volume level (0.0 - 1.0)
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Set volume level, clamped to 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume = volume;
        if volume == 0.0 {
            self.muted = true;
        } else {
            self.muted = false;
            self.last_audible = volume;
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            if self.volume == 0.0 {
                self.volume = self.last_audible;
            }
        } else {
            self.muted = true;
        }
    }

    /// Increase volume by `step`, capped at 100%
    pub fn volume_up(&mut self, step: f64) -> f64 {
        self.set_volume(self.volume + step);
        self.volume
    }

    /// Decrease volume by `step`, capped at 0%
    pub fn volume_down(&mut self, step: f64) -> f64 {
        // avoid landing on 1e-17 after repeated float steps
        let next = self.volume - step;
        self.set_volume(if next < 1e-9 { 0.0 } else { next });
        self.volume
    }

    /// Sync state reported by the element. A zero volume always reads as
    /// muted.
    pub fn sync_from_element(&mut self, volume: f64, muted: bool) {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = muted || self.volume == 0.0;
        if self.volume > 0.0 {
            self.last_audible = self.volume;
        }
    }
}
