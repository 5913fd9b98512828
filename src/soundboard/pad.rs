use crate::soundboard::library::{
    PadColor, SoundId, default_color_for_pad, default_sound, default_sound_for_pad,
};
use crate::soundboard::sound_bank::SoundKey;

/// Longest file name shown untouched on a pad.
const MAX_NAME_CHARS: usize = 15;

/// Characters kept from a longer name before the ellipsis.
const TRUNCATED_NAME_CHARS: usize = 12;

/// Label used when the picker reports no file name.
pub const CUSTOM_SOUND_FALLBACK_NAME: &str = "Custom sound";

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pad {
    /// 1-based position in the grid.
    pub id: u32,
    pub color: PadColor,
    /// Bundled sound used when no custom sound is set.
    pub sound: SoundId,
    pub name: String,
    /// User-picked file overriding `sound`.
    pub custom_sound: Option<String>,
}

impl Pad {
    pub fn new(id: u32) -> Self {
        let sound = default_sound_for_pad(id);
        Self {
            id,
            color: default_color_for_pad(id),
            sound,
            name: default_name(sound),
            custom_sound: None,
        }
    }

    /// Key of the clip a press on this pad should play.
    pub fn sound_key(&self) -> SoundKey {
        match &self.custom_sound {
            Some(uri) => SoundKey::Custom(uri.clone()),
            None => SoundKey::Default(self.sound),
        }
    }

    pub fn default_key(&self) -> SoundKey {
        SoundKey::Default(self.sound)
    }

    /// Whether `sound_id` is the bundled sound this pad currently plays.
    pub fn uses_default(&self, sound_id: SoundId) -> bool {
        self.custom_sound.is_none() && self.sound == sound_id
    }

    pub fn has_custom_sound(&self) -> bool {
        self.custom_sound.is_some()
    }

    pub(crate) fn assign_default(&mut self, sound_id: SoundId) {
        self.sound = sound_id;
        self.name = default_name(sound_id);
        self.custom_sound = None;
    }

    pub(crate) fn assign_custom(&mut self, uri: String, file_name: Option<&str>) {
        self.name = display_name_for_file(file_name);
        self.custom_sound = Some(uri);
    }
}

fn default_name(sound: SoundId) -> String {
    default_sound(sound)
        .map(|s| s.name.to_string())
        .unwrap_or_default()
}

/// Shortens a picked file name so it fits on a pad.
pub fn display_name_for_file(name: Option<&str>) -> String {
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => CUSTOM_SOUND_FALLBACK_NAME,
    };

    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(TRUNCATED_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pad_defaults() {
        let pad = Pad::new(10);
        assert_eq!(pad.color, PadColor::Yellow);
        assert_eq!(pad.sound, 10);
        assert_eq!(pad.name, "PC ON");
        assert_eq!(pad.sound_key(), SoundKey::Default(10));
        assert!(pad.uses_default(10));
    }

    #[test]
    fn test_custom_sound_overrides_key() {
        let mut pad = Pad::new(1);
        pad.assign_custom("file:///cache/horn.mp3".into(), Some("horn.mp3"));

        assert_eq!(
            pad.sound_key(),
            SoundKey::Custom("file:///cache/horn.mp3".into())
        );
        assert_eq!(pad.default_key(), SoundKey::Default(1));
        assert!(!pad.uses_default(1));
        assert_eq!(pad.name, "horn.mp3");

        pad.assign_default(4);
        assert_eq!(pad.sound_key(), SoundKey::Default(4));
        assert_eq!(pad.name, "Clock");
    }

    #[test]
    fn test_display_name_truncation() {
        assert_eq!(display_name_for_file(Some("exactly15chars_")), "exactly15chars_");
        assert_eq!(
            display_name_for_file(Some("a very long recording.mp3")),
            "a very long ..."
        );
        assert_eq!(display_name_for_file(None), "Custom sound");
        assert_eq!(display_name_for_file(Some("")), "Custom sound");
    }

    #[test]
    fn test_display_name_counts_chars_not_bytes() {
        let name = "ééééééééééééééééé";
        assert_eq!(display_name_for_file(Some(name)), "éééééééééééé...");
    }
}
