//! # Note Glyph Module
//!
//! A round badge with a pitch name on it. Glyphs are rebuilt from the
//! current tuning, scale and geometry on every pass and dropped afterwards.

use crate::pitch::{NoteKind, PitchClass};
use crate::surface::{Point, Surface};
use crate::theme::{Color, Palette};

pub const NOTE_RADIUS: f32 = 10.0;
pub const ACTIVE_NOTE_RADIUS: f32 = 12.0;
const LABEL_SIZE: f32 = 10.0;
const GHOST_ALPHA: f32 = 0.35;

/// Root / in-scale verdict for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlight {
    pub is_root: bool,
    pub in_scale: bool,
}

impl Highlight {
    pub const NONE: Highlight = Highlight {
        is_root: false,
        in_scale: false,
    };

    pub fn any(&self) -> bool {
        self.is_root || self.in_scale
    }
}

/// One note on the board, ready to draw and to hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGlyph {
    pub string: usize,
    /// Fret column; -1 and `number_of_frets` are the edge ghost columns.
    pub fret: i32,
    pub name: &'static str,
    pub kind: NoteKind,
    pub position: Point,
    pub radius: f32,
    pub fill: Color,
    pub text: Color,
    pub is_root: bool,
    pub in_scale: bool,
    pub is_active: bool,
    pub ghost: bool,
    pub visible: bool,
}

impl NoteGlyph {
    pub fn new(
        string: usize,
        fret: i32,
        pitch: &'static PitchClass,
        position: Point,
        highlight: Highlight,
        palette: &Palette,
    ) -> Self {
        let fill = if highlight.is_root {
            palette.root
        } else if highlight.in_scale {
            palette.scale
        } else {
            pitch.fill
        };

        Self {
            string,
            fret,
            name: pitch.name,
            kind: pitch.kind,
            position,
            radius: NOTE_RADIUS,
            fill,
            text: pitch.text,
            is_root: highlight.is_root,
            in_scale: highlight.in_scale,
            is_active: false,
            ghost: false,
            visible: true,
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self.radius = if is_active {
            ACTIVE_NOTE_RADIUS
        } else {
            NOTE_RADIUS
        };
        self
    }

    /// Whether the badge itself gets painted (and so can be hit).
    pub fn is_shown(&self) -> bool {
        self.is_root || self.in_scale || self.visible
    }

    pub fn contains(&self, point: Point) -> bool {
        self.position.distance(point) < self.radius
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        if self.is_shown() {
            surface.fill_circle(self.position, self.radius, self.fill);
            surface.fill_text(self.name, self.position, LABEL_SIZE, self.text);
        }

        if self.ghost && !self.is_root && !self.in_scale {
            surface.fill_text(
                self.name,
                self.position,
                LABEL_SIZE,
                self.fill.with_alpha(GHOST_ALPHA),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn glyph(highlight: Highlight) -> NoteGlyph {
        NoteGlyph::new(
            0,
            3,
            pitch::next("G", 0),
            Point::new(100.0, 50.0),
            highlight,
            &Palette::dark(),
        )
    }

    #[test]
    fn visible_glyph_paints_badge_and_label() {
        let mut surface = RecordingSurface::new();
        glyph(Highlight::NONE).draw(&mut surface);
        assert!(matches!(surface.commands()[0], DrawCommand::Circle { radius, .. } if radius == NOTE_RADIUS));
        assert_eq!(surface.texts().collect::<Vec<_>>(), ["G"]);
    }

    #[test]
    fn hidden_glyph_paints_nothing() {
        let mut surface = RecordingSurface::new();
        glyph(Highlight::NONE).with_visibility(false).draw(&mut surface);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn scale_members_show_even_when_hidden() {
        let mut surface = RecordingSurface::new();
        let note = glyph(Highlight {
            is_root: false,
            in_scale: true,
        })
        .with_visibility(false);
        note.draw(&mut surface);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(note.fill, Palette::dark().scale);
    }

    #[test]
    fn ghost_outside_scale_paints_a_faint_label_only() {
        let mut surface = RecordingSurface::new();
        glyph(Highlight::NONE)
            .with_visibility(false)
            .with_ghost(true)
            .draw(&mut surface);
        match &surface.commands()[..] {
            [DrawCommand::Text { text, color, .. }] => {
                assert_eq!(text, "G");
                assert!(color.a < 1.0);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn active_glyph_is_larger_and_hit_inside_radius() {
        let note = glyph(Highlight::NONE).with_active(true);
        assert_eq!(note.radius, ACTIVE_NOTE_RADIUS);
        assert!(note.contains(Point::new(111.0, 50.0)));
        assert!(!note.contains(Point::new(112.0, 50.0)));
    }
}
