// fretboard-core/src/lib.rs

//! The core logic for the interactive fretboard.
//! This crate owns pitch arithmetic, tunings, fret geometry, scale
//! highlighting and pointer gestures. It is completely headless: drawing
//! goes through the [`surface::Surface`] trait and time through
//! [`clock::Clock`], so any host (or a test) can drive it.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod fret;
pub mod gesture;
pub mod note;
pub mod pitch;
pub mod scale;
pub mod surface;
pub mod theme;
pub mod tuning;

pub use config::{FretboardConfig, NoteToggle};
pub use engine::FretboardEngine;
pub use error::{FretboardError, Result};
pub use fret::{FretStyle, HandType};
pub use scale::ScaleMode;
pub use theme::{Color, Palette};
pub use tuning::Tuning;
