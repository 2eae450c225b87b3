//! # Error Module
//!
//! Failures the core can report. Everything not listed here is total:
//! string counts are clamped, and theme, scale and visibility changes
//! accept every value of their types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FretboardError {
    /// A raw pitch index outside `0..12` reached the pitch table.
    #[error("pitch index {0} is out of range, expected 0-11")]
    PitchOutOfRange(i64),

    /// `initialize` was handed a surface that cannot be drawn on yet.
    #[error("the {0} layer surface is not ready")]
    SurfaceNotReady(&'static str),

    /// A palette color string that is not `#rgb` or `#rrggbb`.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, FretboardError>;
