//! Grid geometry and press animation, independent of any rendering toolkit.

use std::time::Duration;

/// How long a pad stays highlighted after a press.
pub const PRESS_FLASH: Duration = Duration::from_millis(200);

/// Scale a pad shrinks to at the middle of the press animation.
pub const PRESS_SCALE_MIN: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Horizontal distribution of pads in a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowJustify {
    SpaceAround,
    SpaceBetween,
}

/// Width of one pad as a percentage of the grid width.
pub fn pad_width_percent(orientation: Orientation, pad_count: usize) -> u8 {
    match (orientation, pad_count) {
        (Orientation::Landscape, 6) => 32,
        (Orientation::Landscape, _) => 23,
        (Orientation::Portrait, 4) => 48,
        (Orientation::Portrait, 6) => 31,
        (Orientation::Portrait, _) => 23,
    }
}

pub fn row_justify(orientation: Orientation, pad_count: usize) -> RowJustify {
    if pad_count == 4 && orientation == Orientation::Portrait {
        RowJustify::SpaceAround
    } else {
        RowJustify::SpaceBetween
    }
}

/// The pad editor is only shown in portrait, in edit mode, with a pad selected.
pub fn edit_panel_visible(orientation: Orientation, edit_mode: bool, selected: Option<u32>) -> bool {
    orientation == Orientation::Portrait && edit_mode && selected.is_some()
}

/// Scale of a pad `elapsed` after its press: down to 0.9 and back over 200 ms.
pub fn press_scale(elapsed: Duration) -> f32 {
    let half = PRESS_FLASH / 2;
    if elapsed >= PRESS_FLASH {
        return 1.0;
    }

    let depth = 1.0 - PRESS_SCALE_MIN;
    if elapsed <= half {
        1.0 - depth * (elapsed.as_secs_f32() / half.as_secs_f32())
    } else {
        PRESS_SCALE_MIN + depth * ((elapsed - half).as_secs_f32() / half.as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_dimensions() {
        assert_eq!(Orientation::from_dimensions(800.0, 400.0), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(400.0, 800.0), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(500.0, 500.0), Orientation::Portrait);
    }

    #[test]
    fn test_pad_width_table() {
        use Orientation::*;
        assert_eq!(pad_width_percent(Landscape, 4), 23);
        assert_eq!(pad_width_percent(Landscape, 6), 32);
        assert_eq!(pad_width_percent(Landscape, 8), 23);
        assert_eq!(pad_width_percent(Landscape, 16), 23);
        assert_eq!(pad_width_percent(Portrait, 4), 48);
        assert_eq!(pad_width_percent(Portrait, 6), 31);
        assert_eq!(pad_width_percent(Portrait, 8), 23);
        assert_eq!(pad_width_percent(Portrait, 16), 23);
    }

    #[test]
    fn test_row_justify() {
        assert_eq!(row_justify(Orientation::Portrait, 4), RowJustify::SpaceAround);
        assert_eq!(row_justify(Orientation::Landscape, 4), RowJustify::SpaceBetween);
        assert_eq!(row_justify(Orientation::Portrait, 16), RowJustify::SpaceBetween);
    }

    #[test]
    fn test_edit_panel_visibility() {
        assert!(edit_panel_visible(Orientation::Portrait, true, Some(3)));
        assert!(!edit_panel_visible(Orientation::Landscape, true, Some(3)));
        assert!(!edit_panel_visible(Orientation::Portrait, false, Some(3)));
        assert!(!edit_panel_visible(Orientation::Portrait, true, None));
    }

    #[test]
    fn test_press_scale_curve() {
        assert!((press_scale(Duration::ZERO) - 1.0).abs() < 1e-6);
        assert!((press_scale(Duration::from_millis(100)) - 0.9).abs() < 1e-6);
        assert!((press_scale(Duration::from_millis(150)) - 0.95).abs() < 1e-4);
        assert!((press_scale(Duration::from_millis(250)) - 1.0).abs() < 1e-6);
    }
}
