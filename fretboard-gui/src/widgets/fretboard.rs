//! # Fretboard Canvas Widget
//!
//! Replays the engine's two display lists (fret layer below, note layer on
//! top) onto an iced canvas and turns mouse and touch input inside it into
//! pointer events in the board's logical coordinates.

use fretboard_core::gesture::PointerEvent;
use fretboard_core::surface::{self, DrawCommand, RecordingSurface};
use iced::widget::canvas::{self, event, Event, Frame, Geometry, Path};
use iced::{
    alignment, mouse, touch, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Theme,
};

use crate::Message;

/// Both layers of the board, borrowed from the engine for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FretboardCanvas<'a> {
    fret_layer: &'a RecordingSurface,
    note_layer: &'a RecordingSurface,
    /// Height published by the engine's height stream.
    height: f32,
}

impl<'a> FretboardCanvas<'a> {
    pub fn new(fret_layer: &'a RecordingSurface, note_layer: &'a RecordingSurface, height: f32) -> Self {
        Self {
            fret_layer,
            note_layer,
            height,
        }
    }

    /// The canvas as wide as the layers and as tall as the last published
    /// board height.
    pub fn view(self) -> Element<'a, Message> {
        let width = self.fret_layer.logical_size().width;
        canvas::Canvas::new(self)
            .width(Length::Fixed(width))
            .height(Length::Fixed(self.height))
            .into()
    }
}

impl canvas::Program<Message> for FretboardCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        match pointer_event(&event, bounds, cursor) {
            Some(pointer) => (event::Status::Captured, Some(Message::Pointer(pointer))),
            None => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frets = Frame::new(renderer, bounds.size());
        replay(&mut frets, self.fret_layer.commands());

        let mut notes = Frame::new(renderer, bounds.size());
        replay(&mut notes, self.note_layer.commands());

        vec![frets.into_geometry(), notes.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Presses only count inside the board; moves and releases are followed
/// anywhere so a drag can leave the canvas and still end.
fn pointer_event(event: &Event, bounds: Rectangle, cursor: mouse::Cursor) -> Option<PointerEvent> {
    let relative = |position: Point| surface::Point::new(position.x - bounds.x, position.y - bounds.y);

    match event {
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            let position = cursor.position_in(bounds)?;
            Some(PointerEvent::Down(surface::Point::new(position.x, position.y)))
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(PointerEvent::Move(relative(*position)))
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            let position = cursor.position()?;
            Some(PointerEvent::Up(relative(position)))
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            bounds.contains(*position).then(|| PointerEvent::Down(relative(*position)))
        }
        Event::Touch(touch::Event::FingerMoved { position, .. }) => {
            Some(PointerEvent::Move(relative(*position)))
        }
        Event::Touch(
            touch::Event::FingerLifted { position, .. } | touch::Event::FingerLost { position, .. },
        ) => Some(PointerEvent::Up(relative(*position))),
        _ => None,
    }
}

fn replay(frame: &mut Frame, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Rect {
                origin,
                size,
                color,
            } => frame.fill_rectangle(
                to_point(*origin),
                Size::new(size.width, size.height),
                to_color(*color),
            ),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => frame.fill(&Path::circle(to_point(*center), *radius), to_color(*color)),
            DrawCommand::Text {
                text,
                center,
                size,
                color,
            } => frame.fill_text(canvas::Text {
                content: text.clone(),
                position: to_point(*center),
                size: Pixels(*size),
                color: to_color(*color),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Center,
                ..canvas::Text::default()
            }),
        }
    }
}

fn to_point(point: surface::Point) -> Point {
    Point::new(point.x, point.y)
}

fn to_color(color: fretboard_core::Color) -> Color {
    Color::from_rgba(color.r, color.g, color.b, color.a)
}
