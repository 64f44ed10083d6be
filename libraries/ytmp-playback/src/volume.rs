//! Volume mirror
//!
//! Keeps the player's view of volume and mute so the values survive until the
//! provider is ready, and so getters never have to reach the provider.

/// Maximum volume level
pub const MAX_VOLUME: u8 = 100;

/// Volume level (0-100) plus mute flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create a mirror at `level`, clamped to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(MAX_VOLUME),
            muted: false,
        }
    }

    /// Set the level from untrusted input, clamping into 0-100
    ///
    /// Returns the stored level.
    pub fn set_level(&mut self, level: i32) -> u8 {
        self.level = level.clamp(0, i32::from(MAX_VOLUME)) as u8;
        self.level
    }

    /// Current level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80) // Default to 80%
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(80);
        assert_eq!(vol.level(), 80);
        assert!(!vol.is_muted());
        assert_eq!(Volume::new(200).level(), 100);
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(50);

        assert_eq!(vol.set_level(75), 75);
        assert_eq!(vol.set_level(150), 100);
        assert_eq!(vol.set_level(-10), 0);
        assert_eq!(vol.set_level(i32::MIN), 0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(80);

        vol.set_muted(true);
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 80);

        vol.set_muted(false);
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 80);
    }
}
