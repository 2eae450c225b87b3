//! # Settings Module
//!
//! What the host remembers between runs, and how it turns into the engine's
//! startup configuration.

use fretboard_core::config::{DEFAULT_FRETS, DEFAULT_STRINGS};
use fretboard_core::tuning::MAX_STRINGS;
use fretboard_core::{FretStyle, FretboardConfig, HandType, NoteToggle, ScaleMode, Tuning, scale};
use serde::{Deserialize, Serialize};

use crate::themes::{self, ThemeCatalog};

pub const MAX_FRETS: usize = 24;

/// Store key of the settings record.
pub const SETTINGS_KEY: &str = "settings";
/// Store key of the committed tuning, inside the settings record.
pub const TUNING_KEY: &str = "settings.tuning";
pub const THEMES_KEY: &str = "themes.custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub number_of_strings: usize,
    pub number_of_frets: usize,
    pub hand_type: HandType,
    pub show_flat_notes: bool,
    pub show_sharp_notes: bool,
    pub show_ghost_notes: bool,
    pub tuning: Tuning,
    /// Name from the scale catalog, or none for no highlighting.
    pub scale: Option<String>,
    pub scale_mode: ScaleMode,
    pub theme: String,
    pub fret_style: FretStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            number_of_strings: DEFAULT_STRINGS,
            number_of_frets: DEFAULT_FRETS,
            hand_type: HandType::Right,
            show_flat_notes: true,
            show_sharp_notes: true,
            show_ghost_notes: false,
            tuning: Tuning::default(),
            scale: None,
            scale_mode: ScaleMode::Full,
            theme: themes::DARK.to_string(),
            fret_style: FretStyle::Equal,
        }
    }
}

impl Settings {
    pub fn clamp_strings(count: usize) -> usize {
        count.clamp(1, MAX_STRINGS)
    }

    pub fn clamp_frets(count: usize) -> usize {
        count.clamp(1, MAX_FRETS)
    }

    pub fn scale_pattern(&self) -> Option<Vec<u8>> {
        self.scale
            .as_deref()
            .and_then(scale::pattern)
            .map(<[u8]>::to_vec)
    }

    pub fn toggle_mut(&mut self, toggle: NoteToggle) -> &mut bool {
        match toggle {
            NoteToggle::Flat => &mut self.show_flat_notes,
            NoteToggle::Sharp => &mut self.show_sharp_notes,
            NoteToggle::Ghost => &mut self.show_ghost_notes,
        }
    }

    /// Engine configuration for these settings. Unknown theme names fall
    /// back to the dark palette.
    pub fn to_config(&self, catalog: &ThemeCatalog) -> FretboardConfig {
        let theme = catalog.palette(&self.theme).unwrap_or_else(|| {
            log::warn!("[SETTINGS] Unknown theme {:?}, using dark", self.theme);
            fretboard_core::Palette::dark()
        });

        FretboardConfig {
            theme,
            show_flat_notes: self.show_flat_notes,
            show_sharp_notes: self.show_sharp_notes,
            show_ghost_notes: self.show_ghost_notes,
            number_of_strings: Self::clamp_strings(self.number_of_strings),
            number_of_frets: Self::clamp_frets(self.number_of_frets),
            hand_type: self.hand_type,
            tuning: self.tuning.clone(),
            scale_mode: self.scale_mode,
            scale_pattern: self.scale_pattern(),
            fret_style: self.fret_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretboard_core::Palette;

    #[test]
    fn partial_records_fill_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"numberOfStrings": 7, "scale": "dorian"}"#).unwrap();
        assert_eq!(settings.number_of_strings, 7);
        assert_eq!(settings.number_of_frets, DEFAULT_FRETS);
        assert_eq!(settings.scale_pattern(), Some(vec![2, 1, 2, 2, 2, 1, 2]));
    }

    #[test]
    fn config_clamps_counts_and_resolves_the_theme() {
        let settings = Settings {
            number_of_strings: 40,
            number_of_frets: 0,
            theme: themes::LIGHT.to_string(),
            ..Settings::default()
        };
        let config = settings.to_config(&ThemeCatalog::default());
        assert_eq!(config.number_of_strings, MAX_STRINGS);
        assert_eq!(config.number_of_frets, 1);
        assert_eq!(config.theme, Palette::light());
    }

    #[test]
    fn unknown_names_fall_back() {
        let settings = Settings {
            scale: Some("klingon".to_string()),
            theme: "Custom9".to_string(),
            ..Settings::default()
        };
        let config = settings.to_config(&ThemeCatalog::default());
        assert_eq!(config.scale_pattern, None);
        assert_eq!(config.theme, Palette::dark());
    }

    #[test]
    fn toggles_map_to_their_flags() {
        let mut settings = Settings::default();
        *settings.toggle_mut(NoteToggle::Ghost) = true;
        *settings.toggle_mut(NoteToggle::Flat) = false;
        assert!(settings.show_ghost_notes);
        assert!(!settings.show_flat_notes);
        assert!(settings.show_sharp_notes);
    }
}
