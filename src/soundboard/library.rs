//! Bundled sounds, the pad palette and the pad-count choices.

/// Identifier of a bundled sound, 1-based.
pub type SoundId = u32;

/// A sound shipped with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultSound {
    pub id: SoundId,
    pub name: &'static str,
    /// File name inside the asset directory.
    pub file: &'static str,
}

pub const DEFAULT_SOUNDS: [DefaultSound; 16] = [
    DefaultSound { id: 1, name: "Boos", file: "Boos 01.mp3" },
    DefaultSound { id: 2, name: "Charging", file: "Charging.mp3" },
    DefaultSound { id: 3, name: "Chutki", file: "Chutki.mp3" },
    DefaultSound { id: 4, name: "Clock", file: "Clock.mp3" },
    DefaultSound { id: 5, name: "Crowd", file: "Crowd.mp3" },
    DefaultSound { id: 6, name: "Loading", file: "Loading.mp3" },
    DefaultSound { id: 7, name: "Money withdrawal", file: "Money withdrawal.mp3" },
    DefaultSound { id: 8, name: "Mouse click", file: "mouse click.mp3" },
    DefaultSound { id: 9, name: "Ohoo", file: "Ohoo.mp3" },
    DefaultSound { id: 10, name: "PC ON", file: "PC ON.mp3" },
    DefaultSound { id: 11, name: "PC ON 2", file: "PC ON 2.mp3" },
    DefaultSound { id: 12, name: "Pepar", file: "pepar 2.mp3" },
    DefaultSound { id: 13, name: "Pepar Close", file: "Pepar close.mp3" },
    DefaultSound { id: 14, name: "POP", file: "POP.mp3" },
    DefaultSound { id: 15, name: "Tan", file: "Tan.mp3" },
    DefaultSound { id: 16, name: "TeTe", file: "TeTe.mp3" },
];

/// Pad counts offered in the settings panel.
pub const PAD_COUNT_OPTIONS: [usize; 4] = [4, 6, 8, 16];

/// Pad count used when nothing else is configured.
pub const DEFAULT_PAD_COUNT: usize = 16;

pub fn default_sound(id: SoundId) -> Option<&'static DefaultSound> {
    DEFAULT_SOUNDS.iter().find(|s| s.id == id)
}

/// The bundled sound a pad falls back to, cycling through the library.
pub fn default_sound_for_pad(pad_id: u32) -> SoundId {
    (pad_id.saturating_sub(1) % DEFAULT_SOUNDS.len() as u32) + 1
}

/// Pad background colors, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadColor {
    Purple,
    Yellow,
    Blue,
    Red,
    Green,
    Pink,
    Orange,
    Indigo,
}

impl PadColor {
    pub const ALL: [PadColor; 8] = [
        PadColor::Purple,
        PadColor::Yellow,
        PadColor::Blue,
        PadColor::Red,
        PadColor::Green,
        PadColor::Pink,
        PadColor::Orange,
        PadColor::Indigo,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Style token for the idle pad.
    pub fn token(self) -> &'static str {
        match self {
            PadColor::Purple => "bg-purple-400",
            PadColor::Yellow => "bg-yellow-300",
            PadColor::Blue => "bg-blue-400",
            PadColor::Red => "bg-red-400",
            PadColor::Green => "bg-green-400",
            PadColor::Pink => "bg-pink-400",
            PadColor::Orange => "bg-orange-400",
            PadColor::Indigo => "bg-indigo-400",
        }
    }

    /// Style token for the pad while it is flashing after a press.
    pub fn active_token(self) -> &'static str {
        match self {
            PadColor::Purple => "bg-purple-300",
            PadColor::Yellow => "bg-yellow-200",
            PadColor::Blue => "bg-blue-300",
            PadColor::Red => "bg-red-300",
            PadColor::Green => "bg-green-300",
            PadColor::Pink => "bg-pink-300",
            PadColor::Orange => "bg-orange-300",
            PadColor::Indigo => "bg-indigo-300",
        }
    }

    /// Idle color as sRGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            PadColor::Purple => [0xc0, 0x84, 0xfc],
            PadColor::Yellow => [0xfd, 0xe0, 0x47],
            PadColor::Blue => [0x60, 0xa5, 0xfa],
            PadColor::Red => [0xf8, 0x71, 0x71],
            PadColor::Green => [0x4a, 0xde, 0x80],
            PadColor::Pink => [0xf4, 0x72, 0xb6],
            PadColor::Orange => [0xfb, 0x92, 0x3c],
            PadColor::Indigo => [0x81, 0x8c, 0xf8],
        }
    }

    /// Flash color as sRGB.
    pub fn active_rgb(self) -> [u8; 3] {
        match self {
            PadColor::Purple => [0xd8, 0xb4, 0xfe],
            PadColor::Yellow => [0xfe, 0xf0, 0x8a],
            PadColor::Blue => [0x93, 0xc5, 0xfd],
            PadColor::Red => [0xfc, 0xa5, 0xa5],
            PadColor::Green => [0x86, 0xef, 0xac],
            PadColor::Pink => [0xf9, 0xa8, 0xd4],
            PadColor::Orange => [0xfd, 0xba, 0x74],
            PadColor::Indigo => [0xa5, 0xb4, 0xfc],
        }
    }
}

/// The color a fresh pad starts with, cycling through the palette.
pub fn default_color_for_pad(pad_id: u32) -> PadColor {
    PadColor::ALL[pad_id.saturating_sub(1) as usize % PadColor::ALL.len()]
}
