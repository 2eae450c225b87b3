//! # Surface Module
//!
//! The drawing capability the core paints through, and the padded layer
//! geometry wrapped around it.
//!
//! The core never draws in physical pixels. A [`Layer`] keeps a logical
//! width and height; when the host's pixel ratio differs from the surface's
//! backing-store ratio the backing buffer is enlarged and the surface
//! scaled, so every draw call keeps using logical coordinates.
//!
//! [`RecordingSurface`] is the stock implementation: it records a display
//! list that a host replays onto whatever canvas it owns.

use crate::theme::Color;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Display facts the embedding host measures for the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Physical pixels per logical pixel on the current display.
    pub device_pixel_ratio: f32,
    /// Pixels per logical pixel the surface's backing store already uses.
    pub backing_store_ratio: f32,
    /// Current logical width of the container the board is laid out in.
    pub measured_width: f32,
}

impl DisplayMetrics {
    pub fn new(measured_width: f32) -> Self {
        Self {
            device_pixel_ratio: 1.0,
            backing_store_ratio: 1.0,
            measured_width,
        }
    }

    pub fn with_device_pixel_ratio(self, device_pixel_ratio: f32) -> Self {
        Self {
            device_pixel_ratio,
            ..self
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.backing_store_ratio > 0.0 {
            self.device_pixel_ratio / self.backing_store_ratio
        } else {
            self.device_pixel_ratio
        }
    }
}

/// Something the core can paint on in logical coordinates.
pub trait Surface {
    /// Whether the surface can accept drawing yet.
    fn is_ready(&self) -> bool;

    /// Sizes the backing buffer to `logical * ratio` and scales drawing by
    /// `ratio`, leaving the logical coordinate space at `logical`.
    fn resize(&mut self, logical: Size, ratio: f32);

    fn clear(&mut self);

    fn fill_rect(&mut self, origin: Point, size: Size, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draws `text` centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point, size: f32, color: Color);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        origin: Point,
        size: Size,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        center: Point,
        size: f32,
        color: Color,
    },
}

/// A surface that keeps its draw calls as a display list.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    ready: bool,
    logical: Size,
    backing: Size,
    scale: f32,
    commands: Vec<DrawCommand>,
    /// Bumped on every clear so hosts can tell when to repaint.
    generation: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ready: true,
            logical: Size::default(),
            backing: Size::default(),
            scale: 1.0,
            commands: Vec::new(),
            generation: 0,
        }
    }

    /// A surface whose host has not attached it to anything yet.
    pub fn detached() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn logical_size(&self) -> Size {
        self.logical
    }

    pub fn backing_size(&self) -> Size {
        self.backing
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every text label drawn so far, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn resize(&mut self, logical: Size, ratio: f32) {
        self.logical = logical;
        self.backing = Size::new(logical.width * ratio, logical.height * ratio);
        self.scale = ratio;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.generation += 1;
    }

    fn fill_rect(&mut self, origin: Point, size: Size, color: Color) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, center: Point, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            size,
            color,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// The drawable part of a layer, inside its paddings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRect {
    pub x: f32,
    pub y: f32,
    pub x2: f32,
    pub y2: f32,
    pub padding: Padding,
    pub width: f32,
    pub height: f32,
}

/// A surface plus its logical size and paddings.
#[derive(Debug)]
pub struct Layer<S: Surface> {
    surface: S,
    width: f32,
    height: f32,
    padding: Padding,
    ratio: f32,
}

impl<S: Surface> Layer<S> {
    pub fn new(surface: S, height: f32, padding: Padding, metrics: &DisplayMetrics) -> Self {
        let mut layer = Self {
            surface,
            width: metrics.measured_width,
            height,
            padding,
            ratio: metrics.ratio(),
        };
        layer.fix_dpi();
        layer
    }

    pub fn rect(&self) -> LayerRect {
        let Padding {
            left,
            right,
            top,
            bottom,
        } = self.padding;

        LayerRect {
            x: left,
            y: top,
            x2: self.width - right,
            y2: self.height - bottom,
            padding: self.padding,
            width: self.width - left - right,
            height: self.height - top - bottom,
        }
    }

    /// Picks up the host's current width and pixel ratio, then clears.
    pub fn resize_to_measured_width(&mut self, metrics: &DisplayMetrics) {
        self.width = metrics.measured_width;
        self.ratio = metrics.ratio();
        self.clear();
        self.fix_dpi();
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.clear();
        self.fix_dpi();
    }

    /// Swaps left and right paddings, for mirrored layouts.
    pub fn invert_padding(&mut self) {
        std::mem::swap(&mut self.padding.left, &mut self.padding.right);
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn fix_dpi(&mut self) {
        self.surface
            .resize(Size::new(self.width, self.height), self.ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padding() -> Padding {
        Padding {
            left: 30.0,
            right: 20.0,
            top: 20.0,
            bottom: 20.0,
        }
    }

    #[test]
    fn rect_is_inset_by_padding() {
        let layer = Layer::new(RecordingSurface::new(), 200.0, padding(), &DisplayMetrics::new(1000.0));
        let rect = layer.rect();
        assert_eq!((rect.x, rect.y), (30.0, 20.0));
        assert_eq!((rect.x2, rect.y2), (980.0, 180.0));
        assert_eq!((rect.width, rect.height), (950.0, 160.0));
    }

    #[test]
    fn high_dpi_scales_backing_not_logical() {
        let metrics = DisplayMetrics::new(800.0).with_device_pixel_ratio(2.0);
        let layer = Layer::new(RecordingSurface::new(), 100.0, padding(), &metrics);
        let surface = layer.surface();
        assert_eq!(surface.logical_size(), Size::new(800.0, 100.0));
        assert_eq!(surface.backing_size(), Size::new(1600.0, 200.0));
        assert_eq!(surface.scale(), 2.0);
        assert_eq!(layer.rect().width, 750.0);
    }

    #[test]
    fn resize_reads_new_width_and_clears() {
        let mut layer = Layer::new(RecordingSurface::new(), 100.0, padding(), &DisplayMetrics::new(800.0));
        layer
            .surface_mut()
            .fill_rect(Point::ORIGIN, Size::new(1.0, 1.0), Color::BLACK);
        layer.resize_to_measured_width(&DisplayMetrics::new(500.0));
        assert!(layer.surface().commands().is_empty());
        assert_eq!(layer.rect().x2, 480.0);
    }

    #[test]
    fn invert_padding_twice_restores() {
        let mut layer = Layer::new(RecordingSurface::new(), 100.0, padding(), &DisplayMetrics::new(800.0));
        layer.invert_padding();
        assert_eq!(layer.padding().left, 20.0);
        assert_eq!(layer.padding().right, 30.0);
        layer.invert_padding();
        assert_eq!(layer.padding(), padding());
    }
}
