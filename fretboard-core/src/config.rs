//! # Configuration Module
//!
//! The record the engine is initialized from. It deserializes from the
//! same camelCase JSON the settings store keeps, and every field has a
//! default, so partial records are fine.

use serde::{Deserialize, Serialize};

use crate::fret::{FretStyle, HandType};
use crate::scale::ScaleMode;
use crate::theme::Palette;
use crate::tuning::Tuning;

pub const DEFAULT_STRINGS: usize = 6;
pub const DEFAULT_FRETS: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FretboardConfig {
    pub theme: Palette,
    /// Show natural notes.
    pub show_flat_notes: bool,
    /// Show notes that need an accidental.
    pub show_sharp_notes: bool,
    /// While a tonic is set, replace non-scale badges with faint labels.
    pub show_ghost_notes: bool,
    pub number_of_strings: usize,
    pub number_of_frets: usize,
    pub hand_type: HandType,
    pub tuning: Tuning,
    pub scale_mode: ScaleMode,
    pub scale_pattern: Option<Vec<u8>>,
    pub fret_style: FretStyle,
}

impl Default for FretboardConfig {
    fn default() -> Self {
        Self {
            theme: Palette::default(),
            show_flat_notes: true,
            show_sharp_notes: true,
            show_ghost_notes: false,
            number_of_strings: DEFAULT_STRINGS,
            number_of_frets: DEFAULT_FRETS,
            hand_type: HandType::Right,
            tuning: Tuning::default(),
            scale_mode: ScaleMode::Full,
            scale_pattern: None,
            fret_style: FretStyle::Equal,
        }
    }
}

/// The note visibility switches the settings panel can flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteToggle {
    Flat,
    Sharp,
    Ghost,
}

impl NoteToggle {
    pub const ALL: [NoteToggle; 3] = [NoteToggle::Flat, NoteToggle::Sharp, NoteToggle::Ghost];

    /// Settings key the toggle is stored under.
    pub fn key(self) -> &'static str {
        match self {
            NoteToggle::Flat => "showFlatNotes",
            NoteToggle::Sharp => "showSharpNotes",
            NoteToggle::Ghost => "showGhostNotes",
        }
    }
}

impl FretboardConfig {
    pub fn toggle(&self, toggle: NoteToggle) -> bool {
        match toggle {
            NoteToggle::Flat => self.show_flat_notes,
            NoteToggle::Sharp => self.show_sharp_notes,
            NoteToggle::Ghost => self.show_ghost_notes,
        }
    }

    pub fn toggle_mut(&mut self, toggle: NoteToggle) -> &mut bool {
        match toggle {
            NoteToggle::Flat => &mut self.show_flat_notes,
            NoteToggle::Sharp => &mut self.show_sharp_notes,
            NoteToggle::Ghost => &mut self.show_ghost_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_gives_defaults() {
        let config: FretboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FretboardConfig::default());
        assert!(config.show_flat_notes && config.show_sharp_notes);
        assert!(!config.show_ghost_notes);
    }

    #[test]
    fn reads_camel_case_keys() {
        let config: FretboardConfig = serde_json::from_str(
            r#"{"numberOfStrings": 7, "handType": "Left", "scaleMode": "Shifted", "tuning": [2, 9]}"#,
        )
        .unwrap();
        assert_eq!(config.number_of_strings, 7);
        assert_eq!(config.hand_type, HandType::Left);
        assert_eq!(config.scale_mode, ScaleMode::Shifted);
        assert_eq!(config.tuning.active(2), &[2, 9]);
        assert_eq!(config.number_of_frets, DEFAULT_FRETS);
    }

    #[test]
    fn toggles_dispatch_to_their_flag() {
        let mut config = FretboardConfig::default();
        for toggle in NoteToggle::ALL {
            let before = config.toggle(toggle);
            *config.toggle_mut(toggle) = !before;
            assert_eq!(config.toggle(toggle), !before, "{}", toggle.key());
        }
    }
}
