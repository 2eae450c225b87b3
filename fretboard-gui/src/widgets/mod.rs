//! # Widgets Module
//!
//! Custom canvas widgets for the fretboard application.

pub mod fretboard;
