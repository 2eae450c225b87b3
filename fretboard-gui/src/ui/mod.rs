//! # UI Module
//!
//! Layout components for the fretboard application.

pub mod settings_panel;
