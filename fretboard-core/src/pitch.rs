//! # Pitch Table Module
//!
//! The twelve chromatic pitch classes and the modular arithmetic that walks
//! around them. Every pitch the board shows comes out of [`next`], so any
//! starting point and any shift, however large or negative, lands inside
//! the table.
//!
//! Raw indexed access goes through [`at`], which reports an out-of-range
//! index as [`FretboardError::PitchOutOfRange`]. Seeing that error means a
//! caller did arithmetic without wrapping it; it is not something to retry.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::error::{FretboardError, Result};
use crate::theme::Color;

/// Number of pitch classes in the chromatic ring.
pub const PITCH_COUNT: usize = 12;

/// Whether a pitch class sits on a natural or needs an accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Natural,
    Accidental,
}

/// One entry of the chromatic ring along with its badge colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchClass {
    pub index: usize,
    pub name: &'static str,
    pub kind: NoteKind,
    pub fill: Color,
    pub text: Color,
}

const fn pitch(
    index: usize,
    name: &'static str,
    kind: NoteKind,
    fill: Color,
    text: Color,
) -> PitchClass {
    PitchClass {
        index,
        name,
        kind,
        fill,
        text,
    }
}

use NoteKind::{Accidental, Natural};

static PITCHES: [PitchClass; PITCH_COUNT] = [
    pitch(0, "C", Natural, Color::from_rgb8(0x01, 0xe7, 0x0b), Color::WHITE),
    pitch(1, "C#", Accidental, Color::from_rgb8(0x02, 0xfe, 0xa9), Color::BLACK),
    pitch(2, "D", Natural, Color::from_rgb8(0x00, 0x6c, 0xfd), Color::WHITE),
    pitch(3, "D#", Accidental, Color::from_rgb8(0x30, 0x03, 0xf2), Color::WHITE),
    pitch(4, "E", Natural, Color::from_rgb8(0x80, 0x01, 0xce), Color::WHITE),
    pitch(5, "F", Natural, Color::from_rgb8(0x3f, 0x02, 0x50), Color::WHITE),
    pitch(6, "F#", Accidental, Color::from_rgb8(0x6c, 0x00, 0x56), Color::WHITE),
    pitch(7, "G", Natural, Color::from_rgb8(0xdb, 0x00, 0x00), Color::WHITE),
    pitch(8, "G#", Accidental, Color::from_rgb8(0xdb, 0x41, 0x1b), Color::WHITE),
    pitch(9, "A", Natural, Color::from_rgb8(0xff, 0x88, 0x00), Color::WHITE),
    pitch(10, "A#", Accidental, Color::from_rgb8(0xec, 0xfe, 0x08), Color::BLACK),
    pitch(11, "B", Natural, Color::from_rgb8(0x9a, 0xf3, 0x01), Color::BLACK),
];

/// Name to index lookup, built on first use.
static NAME_MAP: Lazy<BTreeMap<&'static str, usize>> = Lazy::new(|| {
    PITCHES
        .iter()
        .map(|pitch| (pitch.name, pitch.index))
        .collect()
});

/// A starting point for [`next`]: either a raw index or a pitch name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchRef<'a> {
    Index(i64),
    Name(&'a str),
}

impl From<i64> for PitchRef<'_> {
    fn from(index: i64) -> Self {
        PitchRef::Index(index)
    }
}

impl From<usize> for PitchRef<'_> {
    fn from(index: usize) -> Self {
        PitchRef::Index(index as i64)
    }
}

impl From<u8> for PitchRef<'_> {
    fn from(index: u8) -> Self {
        PitchRef::Index(index as i64)
    }
}

impl<'a> From<&'a str> for PitchRef<'a> {
    fn from(name: &'a str) -> Self {
        PitchRef::Name(name)
    }
}

impl PitchRef<'_> {
    /// The raw (possibly unwrapped) index this reference stands for.
    /// Unknown names resolve to -1, which wraps to the last pitch class.
    fn raw_index(self) -> i64 {
        match self {
            PitchRef::Index(index) => index,
            PitchRef::Name(name) => index_of(name).map_or(-1, |index| index as i64),
        }
    }
}

/// Bounds-checked access to the table.
pub fn at(index: i64) -> Result<&'static PitchClass> {
    usize::try_from(index)
        .ok()
        .and_then(|i| PITCHES.get(i))
        .ok_or(FretboardError::PitchOutOfRange(index))
}

/// The whole ring in index order.
pub fn all() -> &'static [PitchClass] {
    &PITCHES
}

/// Finds a pitch class index by its display name.
pub fn index_of(name: &str) -> Option<usize> {
    NAME_MAP.get(name).copied()
}

/// Walks `shift` semitones from `base` around the ring.
pub fn next<'a>(base: impl Into<PitchRef<'a>>, shift: i64) -> &'static PitchClass {
    &PITCHES[next_index(base, shift)]
}

/// Index form of [`next`].
pub fn next_index<'a>(base: impl Into<PitchRef<'a>>, shift: i64) -> usize {
    let offset = if shift < 0 { PITCH_COUNT as i64 } else { 0 };
    (offset + base.into().raw_index() + shift).rem_euclid(PITCH_COUNT as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_for_every_base_and_shift() {
        for base in 0..12i64 {
            for shift in -48..=48i64 {
                let expected = (((base + shift) % 12) + 12) % 12;
                assert_eq!(next(base, shift).index as i64, expected, "{base} {shift}");
            }
        }
    }

    #[test]
    fn whole_octaves_return_to_the_start() {
        for k in -10..=10i64 {
            assert_eq!(next("E", 12 * k).name, "E");
        }
        assert_eq!(next(3i64, 12 * 1_000_000).index, 3);
        assert_eq!(next(3i64, -12 * 1_000_000).index, 3);
    }

    #[test]
    fn names_resolve_to_their_index() {
        assert_eq!(next("C", 0).index, 0);
        assert_eq!(next("A", 2).name, "B");
        assert_eq!(next("C", -1).name, "B");
        assert_eq!(index_of("F#"), Some(6));
        assert_eq!(index_of("H"), None);
    }

    #[test]
    fn unknown_name_wraps_from_minus_one() {
        assert_eq!(next("H", 0).name, "B");
        assert_eq!(next("H", 1).name, "C");
    }

    #[test]
    fn at_rejects_out_of_range() {
        assert_eq!(at(0).unwrap().name, "C");
        assert_eq!(at(11).unwrap().name, "B");
        assert_eq!(at(12), Err(FretboardError::PitchOutOfRange(12)));
        assert_eq!(at(-1), Err(FretboardError::PitchOutOfRange(-1)));
    }

    #[test]
    fn kinds_follow_the_piano_keys() {
        let accidentals: Vec<_> = all()
            .iter()
            .filter(|p| p.kind == NoteKind::Accidental)
            .map(|p| p.name)
            .collect();
        assert_eq!(accidentals, ["C#", "D#", "F#", "G#", "A#"]);
    }
}
