use std::path::PathBuf;

use crate::soundboard::errors::SoundboardError;
use crate::soundboard::library::{DEFAULT_PAD_COUNT, PAD_COUNT_OPTIONS};
use crate::soundboard::services::AudioSession;

/// Environment variable overriding [`SoundboardConfig::asset_dir`].
pub const ASSET_DIR_ENV: &str = "LEO_PAD_ASSET_DIR";

/// Environment variable overriding [`SoundboardConfig::initial_pad_count`].
pub const PAD_COUNT_ENV: &str = "LEO_PAD_COUNT";

#[derive(Debug, Clone, PartialEq)]
pub struct SoundboardConfig {
    /// Directory holding the bundled sounds.
    pub asset_dir: PathBuf,
    /// Number of pads shown at start; one of `PAD_COUNT_OPTIONS`.
    pub initial_pad_count: usize,
    pub session: AudioSession,
    /// Playback volume for every pad (0.0 to 1.0).
    pub volume: f32,
}

impl Default for SoundboardConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets/sounds"),
            initial_pad_count: DEFAULT_PAD_COUNT,
            session: AudioSession::default(),
            volume: 1.0,
        }
    }
}

impl SoundboardConfig {
    /// Defaults, overridden by `LEO_PAD_ASSET_DIR` and `LEO_PAD_COUNT`.
    pub fn from_env() -> Result<Self, SoundboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SoundboardError> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ASSET_DIR_ENV) {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(PAD_COUNT_ENV) {
            config.initial_pad_count = raw
                .trim()
                .parse()
                .map_err(|_| SoundboardError::InvalidConfig(format!("{PAD_COUNT_ENV}={raw}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SoundboardError> {
        if !PAD_COUNT_OPTIONS.contains(&self.initial_pad_count) {
            return Err(SoundboardError::InvalidPadCount(self.initial_pad_count));
        }

        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(SoundboardError::InvalidConfig(format!(
                "volume out of range: {}",
                self.volume
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SoundboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SoundboardConfig::from_lookup(|key| match key {
            ASSET_DIR_ENV => Some("/opt/pads".to_string()),
            PAD_COUNT_ENV => Some(" 8 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.asset_dir, PathBuf::from("/opt/pads"));
        assert_eq!(config.initial_pad_count, 8);
    }

    #[test]
    fn test_rejects_unsupported_pad_count() {
        let result = SoundboardConfig::from_lookup(|key| {
            (key == PAD_COUNT_ENV).then(|| "5".to_string())
        });
        assert!(matches!(result, Err(SoundboardError::InvalidPadCount(5))));

        let result = SoundboardConfig::from_lookup(|key| {
            (key == PAD_COUNT_ENV).then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(SoundboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_volume() {
        let config = SoundboardConfig {
            volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
