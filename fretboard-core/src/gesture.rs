//! # Gesture Module
//!
//! Turns raw pointer input into taps and string drags.
//!
//! ## Timing
//! A press is classified by how long the pointer stays down:
//! - released before [`TAP_WINDOW`]: a tap;
//! - released after [`TAP_WINDOW`] but before [`LONG_PRESS`]: nothing;
//! - still down at [`LONG_PRESS`] over a note: the note's string is
//!   picked up and follows the pointer until release.
//!
//! Both windows are measured from the same press. Time comes from the
//! caller, and an expired long press is noticed on the next
//! [`PointerEvent::Timeout`] or on any later pointer event, whichever comes
//! first. A release that arrives late therefore still starts (and ends) a
//! drag instead of silently falling through.
//!
//! A single pointer is assumed.

use std::time::Duration;

use crate::note::NoteGlyph;
use crate::pitch;
use crate::surface::Point;

pub const TAP_WINDOW: Duration = Duration::from_millis(200);
pub const LONG_PRESS: Duration = Duration::from_millis(300);
pub const SNAP_BACK: Duration = Duration::from_millis(200);

/// Input fed to [`GestureController::handle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// No pointer activity; only checks for an expired long press.
    Timeout,
}

/// What a sequence of pointer events amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// A short press, on a note or on empty board.
    Tap(Option<NoteGlyph>),
    DragStart { target: NoteGlyph, point: Point },
    DragMove(Point),
    DragEnd(Point),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed {
        target: Option<NoteGlyph>,
        pressed_at: Duration,
        point: Point,
    },
    Dragging {
        target: NoteGlyph,
    },
}

/// Hit-testing plus the press classification state machine.
#[derive(Debug, Default)]
pub struct GestureController {
    targets: Vec<NoteGlyph>,
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Replaces the hit targets. Only glyphs that actually get painted are
    /// kept, in the order given.
    pub fn register(&mut self, glyphs: impl IntoIterator<Item = NoteGlyph>) {
        self.targets.clear();
        self.targets
            .extend(glyphs.into_iter().filter(NoteGlyph::is_shown));
    }

    pub fn targets(&self) -> &[NoteGlyph] {
        &self.targets
    }

    /// First registered glyph under `point`.
    pub fn hit_test(&self, point: Point) -> Option<&NoteGlyph> {
        self.targets.iter().find(|glyph| glyph.contains(point))
    }

    /// Feeds one event observed at `now` and returns the gestures it
    /// completes, usually none or one.
    pub fn handle(&mut self, event: PointerEvent, now: Duration) -> Vec<Gesture> {
        let mut gestures = Vec::new();

        if let Some(started) = self.expire_long_press(now) {
            gestures.push(started);
        }

        let state = std::mem::take(&mut self.state);
        self.state = match (state, event) {
            (GestureState::Idle, PointerEvent::Down(point)) => {
                let target = self.hit_test(point).cloned();
                log::debug!("[GESTURE] Press at {:?} on {:?}", point, target.as_ref().map(|t| t.name));
                GestureState::Pressed {
                    target,
                    pressed_at: now,
                    point,
                }
            }
            (
                GestureState::Pressed {
                    target, pressed_at, ..
                },
                PointerEvent::Move(point),
            ) => GestureState::Pressed {
                target,
                pressed_at,
                point,
            },
            (
                GestureState::Pressed {
                    target, pressed_at, ..
                },
                PointerEvent::Up(_),
            ) => {
                if now.saturating_sub(pressed_at) < TAP_WINDOW {
                    gestures.push(Gesture::Tap(target));
                } else {
                    log::debug!("[GESTURE] Release in the dead zone, ignored");
                }
                GestureState::Idle
            }
            (GestureState::Dragging { target }, PointerEvent::Move(point)) => {
                gestures.push(Gesture::DragMove(point));
                GestureState::Dragging { target }
            }
            (GestureState::Dragging { .. }, PointerEvent::Up(point)) => {
                gestures.push(Gesture::DragEnd(point));
                GestureState::Idle
            }
            (state, _) => state,
        };

        gestures
    }

    fn expire_long_press(&mut self, now: Duration) -> Option<Gesture> {
        let GestureState::Pressed {
            target,
            pressed_at,
            point,
        } = &self.state
        else {
            return None;
        };

        if now.saturating_sub(*pressed_at) < LONG_PRESS {
            return None;
        }

        let point = *point;
        match target.clone() {
            Some(target) => {
                log::debug!("[GESTURE] Long press on string {}", target.string);
                self.state = GestureState::Dragging {
                    target: target.clone(),
                };
                Some(Gesture::DragStart { target, point })
            }
            None => {
                // long press on empty board: nothing to pick up
                self.state = GestureState::Idle;
                None
            }
        }
    }
}

/// A string being dragged. Positions are in the hand-normalized frame
/// where fret numbers grow to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub string: usize,
    /// Pointer position minus the picked note's anchor.
    pub shift: Point,
    /// Anchor x of the picked note when the drag began.
    pub start_x: f32,
    /// Open pitch of the string when the drag began.
    pub open_pitch: u8,
    /// Open pitch the string will get on release.
    pub pending: u8,
    /// Distance the redrawn notes still sit away from their fret centers.
    pub offset: f32,
}

impl DragState {
    /// Picks up `target`'s string with the pointer at `pointer`. `start_x`
    /// is the target's anchor x in the hand-normalized frame.
    pub fn begin(target: &NoteGlyph, pointer: Point, start_x: f32, open_pitch: u8) -> Self {
        Self {
            string: target.string,
            shift: Point::new(pointer.x - target.position.x, pointer.y - target.position.y),
            start_x,
            open_pitch,
            pending: open_pitch,
            offset: 0.0,
        }
    }

    /// Where the picked note's anchor sits while the pointer is at
    /// `pointer`, in the same frame as `pointer`.
    pub fn anchor_x(&self, pointer: Point) -> f32 {
        pointer.x - self.shift.x
    }

    /// Follows the note anchor to `x`. Dragging towards the nut raises the
    /// string; every started fret width counts as one semitone. Returns the
    /// semitone delta.
    pub fn follow(&mut self, x: f32, fret_width: f32) -> i64 {
        if fret_width <= 0.0 {
            return 0;
        }

        let distance = self.start_x - x;
        let delta = (distance / fret_width).ceil() as i64;

        self.pending = pitch::next_index(self.open_pitch, delta) as u8;
        self.offset = delta as f32 * fret_width - distance;
        delta
    }
}

/// Eases the leftover drag offset back to zero after release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapBack {
    pub string: usize,
    pub start_offset: f32,
    pub started_at: Duration,
}

impl SnapBack {
    /// Offset at `now` and whether the animation has finished.
    pub fn offset_at(&self, now: Duration) -> (f32, bool) {
        let elapsed = now.saturating_sub(self.started_at);
        let progress = (elapsed.as_secs_f32() / SNAP_BACK.as_secs_f32()).min(1.0);
        (self.start_offset * (1.0 - progress), progress >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Highlight;
    use crate::theme::Palette;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn glyph(string: usize, fret: i32, x: f32, y: f32) -> NoteGlyph {
        NoteGlyph::new(
            string,
            fret,
            pitch::next(4u8, fret as i64 + 1),
            Point::new(x, y),
            Highlight::NONE,
            &Palette::dark(),
        )
    }

    fn controller() -> GestureController {
        let mut controller = GestureController::new();
        controller.register([
            glyph(0, 0, 50.0, 26.0),
            glyph(0, 1, 90.0, 26.0),
            glyph(1, 0, 50.0, 54.0).with_visibility(false),
        ]);
        controller
    }

    #[test]
    fn hidden_glyphs_are_not_targets() {
        let controller = controller();
        assert_eq!(controller.targets().len(), 2);
        assert!(controller.hit_test(Point::new(50.0, 54.0)).is_none());
        assert_eq!(controller.hit_test(Point::new(92.0, 28.0)).map(|g| g.fret), Some(1));
    }

    #[test]
    fn quick_release_is_a_tap() {
        let mut controller = controller();
        controller.handle(PointerEvent::Down(Point::new(50.0, 26.0)), ms(0));
        let gestures = controller.handle(PointerEvent::Up(Point::new(50.0, 26.0)), ms(199));
        assert!(matches!(&gestures[..], [Gesture::Tap(Some(g))] if g.fret == 0));
        assert_eq!(controller.state(), &GestureState::Idle);
    }

    #[test]
    fn tap_on_empty_board_has_no_target() {
        let mut controller = controller();
        controller.handle(PointerEvent::Down(Point::new(500.0, 100.0)), ms(0));
        let gestures = controller.handle(PointerEvent::Up(Point::new(500.0, 100.0)), ms(50));
        assert_eq!(gestures, vec![Gesture::Tap(None)]);
    }

    #[test]
    fn release_in_dead_zone_does_nothing() {
        for release in [200, 250, 299] {
            let mut controller = controller();
            controller.handle(PointerEvent::Down(Point::new(50.0, 26.0)), ms(0));
            assert!(controller.handle(PointerEvent::Timeout, ms(release)).is_empty());
            let gestures = controller.handle(PointerEvent::Up(Point::new(50.0, 26.0)), ms(release));
            assert!(gestures.is_empty(), "release at {release}ms");
        }
    }

    #[test]
    fn long_press_starts_a_drag() {
        let mut controller = controller();
        controller.handle(PointerEvent::Down(Point::new(52.0, 27.0)), ms(0));
        let gestures = controller.handle(PointerEvent::Timeout, ms(300));
        match &gestures[..] {
            [Gesture::DragStart { target, point }] => {
                assert_eq!(target.string, 0);
                assert_eq!(*point, Point::new(52.0, 27.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(controller.is_dragging());

        let moved = controller.handle(PointerEvent::Move(Point::new(10.0, 27.0)), ms(320));
        assert_eq!(moved, vec![Gesture::DragMove(Point::new(10.0, 27.0))]);
        let ended = controller.handle(PointerEvent::Up(Point::new(10.0, 27.0)), ms(400));
        assert_eq!(ended, vec![Gesture::DragEnd(Point::new(10.0, 27.0))]);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn late_release_still_runs_the_drag() {
        let mut controller = controller();
        controller.handle(PointerEvent::Down(Point::new(50.0, 26.0)), ms(0));
        let gestures = controller.handle(PointerEvent::Up(Point::new(50.0, 26.0)), ms(450));
        assert!(matches!(
            &gestures[..],
            [Gesture::DragStart { .. }, Gesture::DragEnd(_)]
        ));
    }

    #[test]
    fn long_press_on_empty_board_is_ignored() {
        let mut controller = controller();
        controller.handle(PointerEvent::Down(Point::new(500.0, 100.0)), ms(0));
        assert!(controller.handle(PointerEvent::Timeout, ms(400)).is_empty());
        assert_eq!(controller.state(), &GestureState::Idle);
    }

    #[test]
    fn one_fret_width_is_one_semitone() {
        let target = glyph(0, 2, 100.0, 26.0);
        let mut drag = DragState::begin(&target, Point::new(103.0, 26.0), 100.0, 4);
        assert_eq!(drag.shift, Point::new(3.0, 0.0));

        let x = drag.anchor_x(Point::new(63.0, 30.0));
        assert_eq!(x, 60.0);
        assert_eq!(drag.follow(x, 40.0), 1);
        assert_eq!(drag.pending, 5);
        assert_eq!(drag.offset, 0.0);

        let x = drag.anchor_x(Point::new(143.0, 26.0));
        assert_eq!(drag.follow(x, 40.0), -1);
        assert_eq!(drag.pending, 3);
        assert_eq!(drag.offset, 0.0);
    }

    #[test]
    fn partial_drag_keeps_a_residual_offset() {
        let target = glyph(0, 2, 100.0, 26.0);
        let mut drag = DragState::begin(&target, Point::new(100.0, 26.0), 100.0, 11);

        // 10px towards the nut already starts the next semitone
        assert_eq!(drag.follow(90.0, 40.0), 1);
        assert_eq!(drag.pending, 0);
        assert_eq!(drag.offset, 30.0);

        // 10px away from the nut has not reached one
        assert_eq!(drag.follow(110.0, 40.0), 0);
        assert_eq!(drag.pending, 11);
        assert_eq!(drag.offset, 10.0);
    }

    #[test]
    fn snap_back_is_linear_and_finishes() {
        let snap = SnapBack {
            string: 0,
            start_offset: 30.0,
            started_at: ms(1000),
        };
        assert_eq!(snap.offset_at(ms(1000)), (30.0, false));
        let (halfway, done) = snap.offset_at(ms(1100));
        assert!((halfway - 15.0).abs() < 1e-4);
        assert!(!done);
        assert_eq!(snap.offset_at(ms(1200)), (0.0, true));
        assert_eq!(snap.offset_at(ms(5000)), (0.0, true));
    }
}
