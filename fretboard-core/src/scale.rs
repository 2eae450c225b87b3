//! # Scale Engine Module
//!
//! Builds a scale from a tonic and a step pattern and decides, position by
//! position, whether a note is the root, a scale member, or neither.
//!
//! ## Highlighting modes
//! - **Full**: every occurrence of a scale member on the whole board.
//! - **Vertical**: a six-fret box around the fret the tonic was picked at.
//!   A name already highlighted on the previous string is skipped, which
//!   leaves a diagonal fingering pattern instead of vertical stacks.
//! - **Shifted**: the same box, moved one fret up on the two highest
//!   strings, with at most four highlighted notes per string.
//!
//! The windowed modes keep a per-string record of accepted names. A string's
//! record is reset when its fret 0 is evaluated, so positions have to be
//! fed string by string, frets in ascending order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::note::Highlight;
use crate::pitch;

/// Width, in frets, of the Vertical and Shifted windows.
const WINDOW_WIDTH: i32 = 6;
/// Notes a single string may contribute in Shifted mode.
const SHIFTED_NOTES_PER_STRING: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    #[default]
    Full,
    Vertical,
    Shifted,
}

impl ScaleMode {
    pub const ALL: [ScaleMode; 3] = [ScaleMode::Full, ScaleMode::Vertical, ScaleMode::Shifted];
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScaleMode::Full => "Full",
            ScaleMode::Vertical => "Vertical",
            ScaleMode::Shifted => "Shifted",
        };
        f.write_str(label)
    }
}

/// Named step patterns offered by the settings panel. Each sums to 12.
pub const SCALE_PATTERNS: &[(&str, &[u8])] = &[
    ("major", &[2, 2, 1, 2, 2, 2, 1]),
    ("ionian", &[2, 2, 1, 2, 2, 2, 1]),
    ("dorian", &[2, 1, 2, 2, 2, 1, 2]),
    ("phrygian", &[1, 2, 2, 2, 1, 2, 2]),
    ("lydian", &[2, 2, 2, 1, 2, 2, 1]),
    ("mixolydian", &[2, 2, 1, 2, 2, 1, 2]),
    ("aeolian", &[2, 1, 2, 2, 1, 2, 2]),
    ("locrian", &[1, 2, 2, 1, 2, 2, 2]),
    ("minor", &[2, 1, 2, 2, 1, 2, 2]),
    ("harmonic minor", &[2, 1, 2, 2, 1, 3, 1]),
    ("jazz minor", &[2, 1, 2, 2, 2, 2, 1]),
    ("hexatonic", &[2, 2, 2, 2, 2, 2]),
    ("major pentatonic", &[2, 2, 3, 2, 3]),
    ("minor pentatonic", &[3, 2, 2, 3, 2]),
];

/// Looks up a named pattern.
pub fn pattern(name: &str) -> Option<&'static [u8]> {
    SCALE_PATTERNS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, steps)| *steps)
}

/// `[tonic, tonic + p0, tonic + p0 + p1, ...]`, one entry per step plus the
/// tonic itself. For a pattern summing to 12 the last entry is the tonic
/// again, an octave up.
pub fn build_scale(tonic: &str, steps: &[u8]) -> Vec<&'static str> {
    let Some(first) = pitch::index_of(tonic).map(|i| pitch::next(i, 0)) else {
        return Vec::new();
    };

    let mut names = Vec::with_capacity(steps.len() + 1);
    names.push(first.name);

    let mut previous = first.name;
    for step in steps {
        previous = pitch::next(previous, *step as i64).name;
        names.push(previous);
    }

    names
}

#[derive(Debug, Clone, Default)]
pub struct ScaleEngine {
    mode: ScaleMode,
    pattern: Option<Vec<u8>>,
    tonic: Option<&'static str>,
    scale: Vec<&'static str>,
    /// Fret column the tonic was picked at.
    build_from_fret: i32,
    number_of_strings: usize,
    /// Names accepted per string during the current pass.
    highlighted: Vec<Vec<&'static str>>,
}

impl ScaleEngine {
    pub fn new(mode: ScaleMode, pattern: Option<Vec<u8>>, number_of_strings: usize) -> Self {
        Self {
            mode,
            pattern,
            number_of_strings,
            highlighted: vec![Vec::new(); number_of_strings],
            ..Self::default()
        }
    }

    /// How highlights are spread over the board.
    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn pattern(&self) -> Option<&[u8]> {
        self.pattern.as_deref()
    }

    pub fn tonic(&self) -> Option<&'static str> {
        self.tonic
    }

    /// Note names of the current scale, tonic first and last.
    pub fn scale(&self) -> &[&'static str] {
        &self.scale
    }

    /// Column the tonic was picked at.
    pub fn build_from_fret(&self) -> i32 {
        self.build_from_fret
    }

    pub fn set_mode(&mut self, mode: ScaleMode) {
        self.mode = mode;
    }

    /// Swaps the step pattern, rebuilding the scale around the current tonic.
    /// Removing the pattern also drops the tonic.
    pub fn set_pattern(&mut self, pattern: Option<Vec<u8>>) {
        self.pattern = pattern;
        match self.tonic {
            Some(tonic) if self.pattern.is_some() => self.rebuild(tonic),
            _ => self.clear_tonic(),
        }
    }

    /// Resizes the per-string records to the board.
    pub fn set_number_of_strings(&mut self, number_of_strings: usize) {
        self.number_of_strings = number_of_strings;
        self.highlighted.resize(number_of_strings, Vec::new());
    }

    /// Picks the tonic and the fret column the windowed modes anchor on.
    /// Ignored while no pattern is selected or when `name` is not a pitch.
    pub fn set_tonic(&mut self, name: &str, from_fret: i32) {
        if self.pattern.is_none() {
            return;
        }
        let Some(index) = pitch::index_of(name) else {
            return;
        };

        self.build_from_fret = from_fret;
        self.rebuild(pitch::next(index, 0).name);
    }

    pub fn clear_tonic(&mut self) {
        self.tonic = None;
        self.scale.clear();
        self.reset_pass();
    }

    /// Forgets every per-string record.
    pub fn reset_pass(&mut self) {
        self.highlighted.iter_mut().for_each(Vec::clear);
    }

    /// Highlight for the note `name` at (`string`, `fret`). Calls must come
    /// in board order: strings ascending, columns ascending from 0 within
    /// each string. Windowed modes record what they accept.
    pub fn recognize(&mut self, fret: i32, string: usize, name: &str) -> Highlight {
        let Some(tonic) = self.tonic else {
            return Highlight::NONE;
        };

        let candidate = Highlight {
            is_root: name == tonic,
            in_scale: self.scale.iter().any(|member| *member == name),
        };

        match self.mode {
            ScaleMode::Full => candidate,
            ScaleMode::Vertical => {
                let start = self.build_from_fret - 1;
                self.windowed(fret, string, name, candidate, start, usize::MAX)
            }
            ScaleMode::Shifted => {
                let start = if string + 2 >= self.number_of_strings {
                    self.build_from_fret + 1
                } else {
                    self.build_from_fret
                };
                self.windowed(fret, string, name, candidate, start, SHIFTED_NOTES_PER_STRING)
            }
        }
    }

    fn windowed(
        &mut self,
        fret: i32,
        string: usize,
        name: &str,
        candidate: Highlight,
        start: i32,
        per_string_limit: usize,
    ) -> Highlight {
        if string >= self.highlighted.len() {
            self.highlighted.resize(string + 1, Vec::new());
        }
        if fret == 0 {
            self.highlighted[string].clear();
        }

        let in_window = fret >= start && fret < start + WINDOW_WIDTH;
        if !in_window || !candidate.any() {
            return Highlight::NONE;
        }
        if self.highlighted[string].len() >= per_string_limit {
            return Highlight::NONE;
        }
        if string > 0 && self.highlighted[string - 1].iter().any(|n| *n == name) {
            return Highlight::NONE;
        }

        let Some(accepted) = pitch::index_of(name).map(|i| pitch::next(i, 0).name) else {
            return Highlight::NONE;
        };
        self.highlighted[string].push(accepted);
        candidate
    }

    fn rebuild(&mut self, tonic: &'static str) {
        let steps = self.pattern.as_deref().unwrap_or_default();
        self.scale = build_scale(tonic, steps);
        self.tonic = Some(tonic);
        self.reset_pass();
        log::info!("[SCALE] Tonic {} -> {:?}", tonic, self.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAJOR: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];

    #[test]
    fn major_scale_from_c() {
        let scale = build_scale("C", &MAJOR);
        assert_eq!(scale.len(), MAJOR.len() + 1);
        assert_eq!(scale, ["C", "D", "E", "F", "G", "A", "B", "C"]);
    }

    #[test]
    fn every_catalog_pattern_spans_an_octave() {
        for (name, steps) in SCALE_PATTERNS {
            let total: u32 = steps.iter().map(|s| *s as u32).sum();
            assert_eq!(total, 12, "{name}");
            assert_eq!(build_scale("E", steps).last(), Some(&"E"), "{name}");
        }
        assert_eq!(pattern("Dorian"), Some(&[2, 1, 2, 2, 2, 1, 2][..]));
        assert_eq!(pattern("bebop"), None);
    }

    #[test]
    fn tonic_needs_a_pattern() {
        let mut engine = ScaleEngine::new(ScaleMode::Full, None, 6);
        engine.set_tonic("A", 4);
        assert_eq!(engine.tonic(), None);
        assert_eq!(engine.recognize(4, 0, "A"), Highlight::NONE);
    }

    #[test]
    fn full_mode_flags_everywhere() {
        let mut engine = ScaleEngine::new(ScaleMode::Full, Some(MAJOR.to_vec()), 6);
        engine.set_tonic("C", 7);
        assert_eq!(
            engine.recognize(0, 5, "C"),
            Highlight {
                is_root: true,
                in_scale: true
            }
        );
        assert!(engine.recognize(20, 0, "F").in_scale);
        assert!(!engine.recognize(20, 0, "F#").any());
    }

    #[test]
    fn vertical_mode_window_and_suppression() {
        let mut engine = ScaleEngine::new(ScaleMode::Vertical, Some(MAJOR.to_vec()), 6);
        engine.set_tonic("C", 5);

        // window is [4, 9]
        assert!(!engine.recognize(0, 0, "C").any());
        assert!(!engine.recognize(3, 0, "D").any());
        assert!(engine.recognize(4, 0, "E").any());
        assert!(engine.recognize(9, 0, "A").any());
        assert!(!engine.recognize(10, 0, "B").any());

        // string 1 may not repeat string 0's names
        assert!(!engine.recognize(0, 1, "C").any());
        assert!(!engine.recognize(5, 1, "E").any());
        assert!(engine.recognize(6, 1, "G").any());
    }

    #[test]
    fn fret_zero_resets_the_string_record() {
        let mut engine = ScaleEngine::new(ScaleMode::Vertical, Some(MAJOR.to_vec()), 6);
        engine.set_tonic("C", 1);
        assert!(engine.recognize(0, 0, "E").any());
        assert!(!engine.recognize(0, 1, "E").any());
        // a new pass over string 0 without E leaves string 1 free to take it
        assert!(!engine.recognize(0, 0, "F#").any());
        assert!(engine.recognize(0, 1, "E").any());
    }

    #[test]
    fn shifted_mode_moves_top_strings_and_caps_notes() {
        let mut engine = ScaleEngine::new(ScaleMode::Shifted, Some(MAJOR.to_vec()), 6);
        engine.set_tonic("C", 3);

        // low strings: window [3, 8]
        assert!(!engine.recognize(0, 0, "C").any());
        let names = ["D", "E", "F", "G", "A"];
        let accepted = (3..8)
            .zip(names)
            .filter(|(fret, name)| engine.recognize(*fret, 0, name).any())
            .count();
        assert_eq!(accepted, SHIFTED_NOTES_PER_STRING);

        // strings 4 and 5: window [4, 9]
        assert!(!engine.recognize(0, 4, "C").any());
        assert!(!engine.recognize(3, 4, "B").any());
        assert!(engine.recognize(9, 4, "B").any());
    }

    #[test]
    fn changing_pattern_rebuilds_around_tonic() {
        let mut engine = ScaleEngine::new(ScaleMode::Full, Some(MAJOR.to_vec()), 6);
        engine.set_tonic("A", 0);
        engine.set_pattern(pattern("minor").map(<[u8]>::to_vec));
        assert_eq!(engine.scale(), ["A", "B", "C", "D", "E", "F", "G", "A"]);
        engine.set_pattern(None);
        assert_eq!(engine.tonic(), None);
    }
}
