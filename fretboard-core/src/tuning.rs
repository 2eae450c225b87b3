//! # Tuning Module
//!
//! Open-string pitches, one slot per physical string. An instrument has up
//! to [`MAX_STRINGS`] slots; the board only reads the first
//! `number_of_strings` of them, so shrinking and growing the string count
//! keeps the tuning of the strings that come back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pitch;

/// Physical string slots a tuning carries.
pub const MAX_STRINGS: usize = 10;

/// Standard tuning from the first string (high E) down to the sixth,
/// continued in fourths for extended-range instruments: E B G D A E B F# C# G#.
pub const DEFAULT_TUNING: [u8; MAX_STRINGS] = [4, 11, 7, 2, 9, 4, 11, 6, 1, 8];

/// Open pitch indices, string 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct Tuning {
    strings: Vec<u8>,
}

impl Tuning {
    /// Builds a tuning from the given open pitches. Indices are wrapped into
    /// the pitch ring; missing slots are filled from [`DEFAULT_TUNING`] and
    /// anything past [`MAX_STRINGS`] is dropped.
    pub fn new(strings: impl IntoIterator<Item = u8>) -> Self {
        let mut wrapped: Vec<u8> = strings
            .into_iter()
            .take(MAX_STRINGS)
            .map(|index| pitch::next_index(index, 0) as u8)
            .collect();
        let len = wrapped.len();
        wrapped.extend_from_slice(&DEFAULT_TUNING[len..]);
        Self { strings: wrapped }
    }

    /// Open pitch index of `string`.
    pub fn get(&self, string: usize) -> u8 {
        self.strings[string]
    }

    /// Re-tunes one string; the index is wrapped into the ring.
    pub fn set(&mut self, string: usize, index: usize) {
        self.strings[string] = pitch::next_index(index, 0) as u8;
    }

    /// The first `count` strings.
    pub fn active(&self, count: usize) -> &[u8] {
        &self.strings[..count.min(MAX_STRINGS)]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.strings
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            strings: DEFAULT_TUNING.to_vec(),
        }
    }
}

impl From<Vec<u8>> for Tuning {
    fn from(strings: Vec<u8>) -> Self {
        Tuning::new(strings)
    }
}

impl From<Tuning> for Vec<u8> {
    fn from(tuning: Tuning) -> Self {
        tuning.strings
    }
}

impl fmt::Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .strings
            .iter()
            .map(|&index| pitch::next(index, 0).name)
            .collect();
        write!(f, "{}", names.join(" "))
    }
}
