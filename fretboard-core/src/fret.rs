//! # Fret Geometry Module
//!
//! Splits the drawable rectangle into one cell per fret and paints the
//! static part of the board: neck, fret wires, strings and inlay dots.
//!
//! Cells always start at the nut. A right-handed board runs left to right,
//! a left-handed board right to left, so cell 0 sits next to the nut on
//! whichever side the player expects it.

use serde::{Deserialize, Serialize};

use crate::surface::{LayerRect, Point, Size, Surface};
use crate::theme::Palette;

/// Vertical distance between two neighbouring strings.
pub const GAP_BETWEEN_STRINGS: f32 = 28.0;
/// Distance from the neck's top edge to the first string.
pub const EDGE_DISTANCE: f32 = 5.0;
pub const STRING_THICKNESS: f32 = 2.0;

const FRET_LINE_WIDTH: f32 = 3.0;
const ZERO_NUT_WIDTH: f32 = 5.0;
const DOT_RADIUS: f32 = 3.0;
const DOT_LABEL_SIZE: f32 = 8.0;

/// Frets (1-based) that carry an inlay dot.
const DOT_FRETS: [usize; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 23];

/// Width ratio between neighbouring frets in the tempered style; roughly
/// the 2^(1/12) shrink of a real neck.
const TEMPERED_RATIO: f32 = 0.94;

/// Which side of the board the nut is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandType {
    #[default]
    Right,
    Left,
}

impl HandType {
    pub fn flipped(self) -> Self {
        match self {
            HandType::Right => HandType::Left,
            HandType::Left => HandType::Right,
        }
    }

    /// +1 when fret numbers grow to the right on screen, -1 otherwise.
    pub fn direction(self) -> f32 {
        match self {
            HandType::Right => 1.0,
            HandType::Left => -1.0,
        }
    }
}

/// How fret widths are distributed along the neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FretStyle {
    /// Every fret gets the same width.
    #[default]
    Equal,
    /// Frets shrink geometrically towards the body.
    Tempered,
}

/// Pixel bounds of one fret cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FretCell {
    /// Column number, 0 next to the nut.
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Whether this fret carries an inlay dot.
    pub dot: bool,
}

impl FretCell {
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn find_string_y(&self, string: usize) -> f32 {
        EDGE_DISTANCE + GAP_BETWEEN_STRINGS * string as f32 + self.y
    }

    /// The fret number painted under the inlay dot.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        number_of_strings: usize,
        hand: HandType,
        palette: &Palette,
        padding_bottom: f32,
    ) {
        // the neck
        surface.fill_rect(
            Point::new(self.x, self.y),
            Size::new(self.width, self.height),
            palette.neck,
        );

        if self.index == 0 {
            let nut_x = match hand {
                HandType::Right => self.x - ZERO_NUT_WIDTH,
                HandType::Left => self.x + self.width,
            };
            surface.fill_rect(
                Point::new(nut_x, self.y),
                Size::new(ZERO_NUT_WIDTH, self.height),
                palette.fret,
            );
        }

        // the fret wire, on the side away from the nut
        let wire_x = match hand {
            HandType::Right => self.x + self.width - FRET_LINE_WIDTH,
            HandType::Left => self.x,
        };
        surface.fill_rect(
            Point::new(wire_x, self.y),
            Size::new(FRET_LINE_WIDTH, self.height),
            palette.fret,
        );

        for string in 0..number_of_strings {
            surface.fill_rect(
                Point::new(self.x, self.find_string_y(string)),
                Size::new(self.width, STRING_THICKNESS),
                palette.string,
            );
        }

        if self.dot {
            let bottom = self.y + self.height;
            surface.fill_circle(
                Point::new(self.center(), bottom + padding_bottom * 0.25),
                DOT_RADIUS,
                palette.dot,
            );
            surface.fill_text(
                &self.number().to_string(),
                Point::new(self.center(), bottom + padding_bottom * 0.7),
                DOT_LABEL_SIZE,
                palette.dot,
            );
        }
    }
}

/// Height of the neck itself for `number_of_strings` strings.
pub fn neck_height(number_of_strings: usize) -> f32 {
    let spans = number_of_strings.saturating_sub(1) as f32;
    EDGE_DISTANCE * 2.0 + STRING_THICKNESS + GAP_BETWEEN_STRINGS * spans
}

/// Lays out `number_of_frets` cells across `rect`.
pub fn layout(
    rect: &LayerRect,
    number_of_frets: usize,
    hand: HandType,
    style: FretStyle,
) -> Vec<FretCell> {
    let widths = fret_widths(rect.width, number_of_frets, style);
    let mut frets = Vec::with_capacity(number_of_frets);
    let mut from_nut = 0.0;

    for (index, width) in widths.into_iter().enumerate() {
        let x = match hand {
            HandType::Right => rect.x + from_nut,
            HandType::Left => rect.x2 - from_nut - width,
        };

        frets.push(FretCell {
            index,
            x,
            y: rect.y,
            width,
            height: rect.height,
            dot: DOT_FRETS.contains(&(index + 1)),
        });

        from_nut += width;
    }

    frets
}

fn fret_widths(total: f32, number_of_frets: usize, style: FretStyle) -> Vec<f32> {
    if number_of_frets == 0 {
        return Vec::new();
    }

    match style {
        FretStyle::Equal => vec![total / number_of_frets as f32; number_of_frets],
        FretStyle::Tempered => {
            // w_i = total * r^i * (1 - r) / (1 - r^n), which sums to total
            let n = number_of_frets as i32;
            let first = total * (1.0 - TEMPERED_RATIO) / (1.0 - TEMPERED_RATIO.powi(n));
            (0..n).map(|i| first * TEMPERED_RATIO.powi(i)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Padding, RecordingSurface};

    fn rect() -> LayerRect {
        LayerRect {
            x: 30.0,
            y: 20.0,
            x2: 990.0,
            y2: 180.0,
            padding: Padding {
                left: 30.0,
                right: 10.0,
                top: 20.0,
                bottom: 20.0,
            },
            width: 960.0,
            height: 160.0,
        }
    }

    #[test]
    fn equal_frets_share_the_width() {
        let frets = layout(&rect(), 24, HandType::Right, FretStyle::Equal);
        assert_eq!(frets.len(), 24);
        assert!(frets.iter().all(|f| f.width == 40.0));
        assert_eq!(frets[0].x, 30.0);
        assert_eq!(frets[0].center(), 50.0);
        assert_eq!(frets[23].x, 950.0);
    }

    #[test]
    fn left_hand_starts_at_the_right_edge() {
        let frets = layout(&rect(), 24, HandType::Left, FretStyle::Equal);
        assert_eq!(frets[0].x, 950.0);
        assert_eq!(frets[23].x, 30.0);
    }

    #[test]
    fn tempered_frets_shrink_and_fill() {
        let frets = layout(&rect(), 24, HandType::Right, FretStyle::Tempered);
        assert!(frets.windows(2).all(|w| w[1].width < w[0].width));
        let total: f32 = frets.iter().map(|f| f.width).sum();
        assert!((total - 960.0).abs() < 0.01);
    }

    #[test]
    fn dots_follow_the_inlay_pattern() {
        let frets = layout(&rect(), 24, HandType::Right, FretStyle::Equal);
        let dotted: Vec<usize> = frets.iter().filter(|f| f.dot).map(|f| f.number()).collect();
        assert_eq!(dotted, DOT_FRETS);
    }

    #[test]
    fn string_y_steps_by_the_gap() {
        let frets = layout(&rect(), 12, HandType::Right, FretStyle::Equal);
        assert_eq!(frets[3].find_string_y(0), 25.0);
        assert_eq!(frets[3].find_string_y(2), 81.0);
    }

    #[test]
    fn draw_paints_one_line_per_string_and_labels_dots() {
        let frets = layout(&rect(), 12, HandType::Right, FretStyle::Equal);
        let mut surface = RecordingSurface::new();
        frets[2].draw(&mut surface, 6, HandType::Right, &Palette::dark(), 20.0);
        // neck + wire + 6 strings + dot + label
        assert_eq!(surface.commands().len(), 10);
        assert_eq!(surface.texts().collect::<Vec<_>>(), ["3"]);
    }

    #[test]
    fn neck_height_grows_with_strings() {
        assert_eq!(neck_height(6), 152.0);
        assert_eq!(neck_height(7) - neck_height(6), GAP_BETWEEN_STRINGS);
    }
}
