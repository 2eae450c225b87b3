//! # Themes Module
//!
//! Built-in palettes plus the user's saved ones. Saved themes are plain
//! palettes with a label; an unnamed theme gets the next free `CustomN`.

use fretboard_core::{Color, Palette};
use serde::{Deserialize, Serialize};

pub const DARK: &str = "dark";
pub const LIGHT: &str = "light";
const CUSTOM_PREFIX: &str = "Custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTheme {
    pub name: String,
    pub palette: Palette,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub custom: Vec<NamedTheme>,
}

impl ThemeCatalog {
    pub fn new(custom: Vec<NamedTheme>) -> Self {
        Self { custom }
    }

    /// Built-in names first, then saved themes in the order they were added.
    pub fn names(&self) -> Vec<String> {
        [DARK, LIGHT]
            .into_iter()
            .map(str::to_string)
            .chain(self.custom.iter().map(|theme| theme.name.clone()))
            .collect()
    }

    pub fn palette(&self, name: &str) -> Option<Palette> {
        match name {
            DARK => Some(Palette::dark()),
            LIGHT => Some(Palette::light()),
            _ => self
                .custom
                .iter()
                .find(|theme| theme.name == name)
                .map(|theme| theme.palette),
        }
    }

    /// Saves `palette` under `name`, or under the next `CustomN` when the
    /// name is blank. Saving over an existing name replaces it. Returns the
    /// name used.
    pub fn save(&mut self, name: &str, palette: Palette) -> String {
        let name = match name.trim() {
            "" => custom_name(self.custom.iter().map(|theme| theme.name.as_str())),
            given => given.to_string(),
        };

        match self.custom.iter_mut().find(|theme| theme.name == name) {
            Some(existing) => existing.palette = palette,
            None => self.custom.push(NamedTheme {
                name: name.clone(),
                palette,
            }),
        }

        log::info!("[THEMES] Saved theme {}", name);
        name
    }
}

/// One editable color of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    Neck,
    Dot,
    Fret,
    String,
    Root,
    Scale,
}

impl PaletteSlot {
    pub const ALL: [PaletteSlot; 6] = [
        PaletteSlot::Neck,
        PaletteSlot::Dot,
        PaletteSlot::Fret,
        PaletteSlot::String,
        PaletteSlot::Root,
        PaletteSlot::Scale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaletteSlot::Neck => "Neck",
            PaletteSlot::Dot => "Dots",
            PaletteSlot::Fret => "Frets",
            PaletteSlot::String => "Strings",
            PaletteSlot::Root => "Root note",
            PaletteSlot::Scale => "Scale notes",
        }
    }

    pub fn get(self, palette: &Palette) -> Color {
        match self {
            PaletteSlot::Neck => palette.neck,
            PaletteSlot::Dot => palette.dot,
            PaletteSlot::Fret => palette.fret,
            PaletteSlot::String => palette.string,
            PaletteSlot::Root => palette.root,
            PaletteSlot::Scale => palette.scale,
        }
    }

    pub fn get_mut(self, palette: &mut Palette) -> &mut Color {
        match self {
            PaletteSlot::Neck => &mut palette.neck,
            PaletteSlot::Dot => &mut palette.dot,
            PaletteSlot::Fret => &mut palette.fret,
            PaletteSlot::String => &mut palette.string,
            PaletteSlot::Root => &mut palette.root,
            PaletteSlot::Scale => &mut palette.scale,
        }
    }
}

/// `Custom1` when no label looks like `Custom<digits>`, otherwise one past
/// the highest suffix (a bare `Custom` counts as 0, and the result is never
/// below `Custom2`).
pub fn custom_name<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let highest = labels
        .into_iter()
        .filter_map(|label| {
            let digits = label.strip_prefix(CUSTOM_PREFIX)?;
            if digits.is_empty() {
                Some(0)
            } else if digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse::<u64>().ok()
            } else {
                None
            }
        })
        .max();

    match highest {
        None => format!("{CUSTOM_PREFIX}1"),
        Some(highest) => format!("{CUSTOM_PREFIX}{}", highest.max(1) + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_custom_theme_is_custom1() {
        assert_eq!(custom_name([]), "Custom1");
        assert_eq!(custom_name(["Blues", "Customer"]), "Custom1");
    }

    #[test]
    fn next_custom_name_follows_the_highest_suffix() {
        assert_eq!(custom_name(["Custom1"]), "Custom2");
        assert_eq!(custom_name(["Custom3", "Custom10", "Custom2"]), "Custom11");
        assert_eq!(custom_name(["Custom"]), "Custom2");
        assert_eq!(custom_name(["Custom0"]), "Custom2");
    }

    #[test]
    fn slots_cover_every_palette_color() {
        let mut palette = Palette::dark();
        for slot in PaletteSlot::ALL {
            *slot.get_mut(&mut palette) = Color::WHITE;
        }
        assert_eq!(palette.neck, Color::WHITE);
        assert_eq!(palette.scale, Color::WHITE);
        assert_eq!(PaletteSlot::Root.get(&Palette::dark()), Palette::dark().root);
    }

    #[test]
    fn builtins_resolve_without_saved_themes() {
        let catalog = ThemeCatalog::default();
        assert_eq!(catalog.names(), ["dark", "light"]);
        assert_eq!(catalog.palette(DARK), Some(Palette::dark()));
        assert_eq!(catalog.palette("Custom1"), None);
    }

    #[test]
    fn save_names_blank_themes_and_replaces_named_ones() {
        let mut catalog = ThemeCatalog::default();
        assert_eq!(catalog.save("  ", Palette::light()), "Custom1");
        assert_eq!(catalog.save("", Palette::dark()), "Custom2");
        assert_eq!(catalog.save("Stage", Palette::dark()), "Stage");
        assert_eq!(catalog.save("Stage", Palette::light()), "Stage");

        assert_eq!(catalog.custom.len(), 3);
        assert_eq!(catalog.palette("Stage"), Some(Palette::light()));
        assert_eq!(catalog.names().last().map(String::as_str), Some("Stage"));
    }
}
