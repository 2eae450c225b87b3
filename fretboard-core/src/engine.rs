//! # Fretboard Engine Module
//!
//! Owns every piece of mutable board state and keeps the two layers in
//! step with it:
//! - the **fret layer** (neck, wires, strings, dots), redrawn when geometry
//!   or colors change;
//! - the **note layer** (one badge per string and fret), redrawn on top of
//!   that whenever tuning, scale or visibility changes, and on every frame
//!   of a drag.
//!
//! Nothing is diffed: each redraw clears the layer and paints it again from
//! the current state.
//!
//! ## Pointer input
//! The host forwards pointer events in the note layer's logical coordinates
//! and calls [`FretboardEngine::tick`] once per frame. Ticks expire long
//! presses and advance the snap-back animation.

use crossbeam_channel::{Receiver, Sender};

use crate::clock::Clock;
use crate::config::{FretboardConfig, NoteToggle};
use crate::error::{FretboardError, Result};
use crate::fret::{self, FretCell, FretStyle, HandType};
use crate::gesture::{DragState, Gesture, GestureController, PointerEvent, SnapBack};
use crate::note::{Highlight, NoteGlyph};
use crate::pitch::{self, NoteKind, PitchClass};
use crate::scale::{ScaleEngine, ScaleMode};
use crate::surface::{DisplayMetrics, Layer, Padding, Point, Surface};
use crate::theme::Palette;
use crate::tuning::{MAX_STRINGS, Tuning};

/// Paddings of a right-handed board; the wider side leaves room for the
/// zero nut.
pub const PADDING: Padding = Padding {
    left: 30.0,
    right: 20.0,
    top: 20.0,
    bottom: 20.0,
};

/// Logical height of both layers for `number_of_strings` strings.
pub fn board_height(number_of_strings: usize) -> f32 {
    PADDING.top + PADDING.bottom + fret::neck_height(number_of_strings)
}

/// The string being dragged or easing back, drawn at a pitch and offset
/// that differ from the committed tuning.
#[derive(Debug, Clone, Copy)]
struct ActiveString {
    string: usize,
    open: u8,
    offset: f32,
}

/// The interactive board: two layers, the scale engine and the gesture
/// controller, driven by the host's pointer events and frame ticks.
pub struct FretboardEngine<S: Surface, C: Clock> {
    fret_layer: Layer<S>,
    note_layer: Layer<S>,
    clock: C,
    config: FretboardConfig,
    scale: ScaleEngine,
    frets: Vec<FretCell>,
    /// Current glyphs, one row per string.
    notes: Vec<Vec<NoteGlyph>>,
    gestures: GestureController,
    drag: Option<DragState>,
    snap_back: Option<SnapBack>,
    tuning_subscribers: Vec<Sender<Tuning>>,
    height_subscribers: Vec<Sender<f32>>,
}

impl<S: Surface, C: Clock> FretboardEngine<S, C> {
    /// Binds both layers and paints the first frame.
    pub fn initialize(
        mut config: FretboardConfig,
        fret_surface: S,
        note_surface: S,
        metrics: DisplayMetrics,
        clock: C,
    ) -> Result<Self> {
        if !fret_surface.is_ready() {
            return Err(FretboardError::SurfaceNotReady("fret"));
        }
        if !note_surface.is_ready() {
            return Err(FretboardError::SurfaceNotReady("note"));
        }
        config.number_of_strings = config.number_of_strings.clamp(1, MAX_STRINGS);

        let height = board_height(config.number_of_strings);
        let mut fret_layer = Layer::new(fret_surface, height, PADDING, &metrics);
        let mut note_layer = Layer::new(note_surface, height, PADDING, &metrics);
        if config.hand_type == HandType::Left {
            fret_layer.invert_padding();
            note_layer.invert_padding();
        }

        let scale = ScaleEngine::new(
            config.scale_mode,
            config.scale_pattern.clone(),
            config.number_of_strings,
        );

        let mut engine = Self {
            fret_layer,
            note_layer,
            clock,
            config,
            scale,
            frets: Vec::new(),
            notes: Vec::new(),
            gestures: GestureController::new(),
            drag: None,
            snap_back: None,
            tuning_subscribers: Vec::new(),
            height_subscribers: Vec::new(),
        };

        log::info!(
            "[ENGINE] Initialized: {} strings, {} frets, tuning {}",
            engine.config.number_of_strings,
            engine.config.number_of_frets,
            engine.config.tuning
        );
        engine.redraw();
        Ok(engine)
    }

    // --- Read access ---

    /// Current board settings, including the live tuning.
    pub fn config(&self) -> &FretboardConfig {
        &self.config
    }

    /// Committed open pitches. A drag only changes them on release.
    pub fn tuning(&self) -> &Tuning {
        &self.config.tuning
    }

    /// Scale state: pattern, mode and the tonic, if one is picked.
    pub fn scale(&self) -> &ScaleEngine {
        &self.scale
    }

    /// Fret cells of the last layout, in fret order.
    pub fn frets(&self) -> &[FretCell] {
        &self.frets
    }

    /// Every glyph of the current frame, in draw order.
    pub fn notes(&self) -> impl Iterator<Item = &NoteGlyph> + Clone {
        self.notes.iter().flatten()
    }

    /// The glyph drawn at `string`, fret column `fret`.
    pub fn note(&self, string: usize, fret: i32) -> Option<&NoteGlyph> {
        self.notes
            .get(string)?
            .iter()
            .find(|glyph| glyph.fret == fret)
    }

    /// Pitch sounding on `string` when stopped at `fret` (0 = open).
    pub fn note_at(&self, string: usize, fret: usize) -> &'static PitchClass {
        pitch::next(self.config.tuning.get(string), fret as i64)
    }

    /// Logical height of both layers.
    pub fn height(&self) -> f32 {
        self.fret_layer.height()
    }

    /// Paddings in effect; left and right swap for a left-handed board.
    pub fn padding(&self) -> Padding {
        self.fret_layer.padding()
    }

    /// Surface behind the fret layer.
    pub fn fret_surface(&self) -> &S {
        self.fret_layer.surface()
    }

    /// Surface behind the note layer, drawn on top of the frets.
    pub fn note_surface(&self) -> &S {
        self.note_layer.surface()
    }

    /// Gesture state machine and the hit targets it tests against.
    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// The drag in progress, if a string is picked up.
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Whether a released string is still easing back into place.
    pub fn is_animating(&self) -> bool {
        self.snap_back.is_some()
    }

    // --- Subscriptions ---

    /// Committed tunings, starting with the current one.
    pub fn current_tuning(&mut self) -> Receiver<Tuning> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let _ = tx.send(self.config.tuning.clone());
        self.tuning_subscribers.push(tx);
        rx
    }

    /// Board heights in logical pixels, starting with the current one.
    pub fn canvas_height(&mut self) -> Receiver<f32> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let _ = tx.send(self.height());
        self.height_subscribers.push(tx);
        rx
    }

    // --- Mutators ---

    /// Viewport resize. Every event redraws; nothing is debounced.
    pub fn resize(&mut self, metrics: DisplayMetrics) {
        log::debug!("[ENGINE] Resize to {}px", metrics.measured_width);
        self.fret_layer.resize_to_measured_width(&metrics);
        self.note_layer.resize_to_measured_width(&metrics);
        self.redraw();
    }

    /// Clamped to `1..=MAX_STRINGS`.
    pub fn change_string_amount(&mut self, number_of_strings: usize) {
        let number_of_strings = number_of_strings.clamp(1, MAX_STRINGS);
        self.config.number_of_strings = number_of_strings;
        self.scale.set_number_of_strings(number_of_strings);
        self.apply_height();
        self.redraw();
    }

    /// Lays the board out again with `number_of_frets` columns.
    pub fn change_fret_count(&mut self, number_of_frets: usize) {
        self.config.number_of_frets = number_of_frets;
        self.apply_height();
        self.redraw();
    }

    /// Switches between equal and tempered fret widths.
    pub fn change_fret_style(&mut self, style: FretStyle) {
        self.config.fret_style = style;
        self.redraw();
    }

    /// Repaints both layers with `palette`.
    pub fn change_theme(&mut self, palette: Palette) {
        self.config.theme = palette;
        self.redraw();
    }

    /// Sets one visibility switch and repaints the notes.
    pub fn change_show_notes(&mut self, value: bool, toggle: NoteToggle) {
        *self.config.toggle_mut(toggle) = value;
        self.draw_notes();
    }

    /// Selects a step pattern, or none to turn highlighting off. The notes
    /// are repainted only when a tonic was set.
    pub fn change_scale(&mut self, pattern: Option<Vec<u8>>) {
        let had_tonic = self.scale.tonic().is_some();
        self.config.scale_pattern = pattern.clone();
        self.scale.set_pattern(pattern);
        if had_tonic {
            self.draw_notes();
        }
    }

    /// Switches how highlights are spread over the board.
    pub fn change_scale_mode(&mut self, mode: ScaleMode) {
        self.config.scale_mode = mode;
        self.scale.set_mode(mode);
        if self.scale.tonic().is_some() {
            self.draw_notes();
        }
    }

    /// Mirrors the board. Asking for the current orientation is a no-op.
    pub fn change_hand_type(&mut self, hand: HandType) {
        if hand == self.config.hand_type {
            return;
        }
        self.config.hand_type = hand;
        self.fret_layer.invert_padding();
        self.note_layer.invert_padding();
        self.redraw();
    }

    /// Explicit re-tune of every string.
    pub fn change_tuning(&mut self, tuning: Tuning) {
        self.config.tuning = tuning;
        self.redraw();
        self.emit_tuning();
    }

    /// Picks the tonic by name, anchoring windowed modes on column
    /// `from_fret`.
    pub fn set_tonic(&mut self, name: &str, from_fret: i32) {
        self.scale.set_tonic(name, from_fret);
        self.draw_notes();
    }

    /// Drops the tonic; nothing stays highlighted.
    pub fn clear_tonic(&mut self) {
        self.scale.clear_tonic();
        self.draw_notes();
    }

    // --- Pointer input ---

    /// Press at `point`. A snap-back still running is settled first.
    pub fn pointer_down(&mut self, point: Point) {
        if self.snap_back.is_some() {
            // a new press settles the previous release at once
            self.finish_snap_back();
        }
        self.dispatch(PointerEvent::Down(point));
    }

    /// Pointer moved to `point`; only matters while a string is dragged.
    pub fn pointer_move(&mut self, point: Point) {
        self.dispatch(PointerEvent::Move(point));
    }

    /// Release at `point`: a tap, the end of a drag, or nothing.
    pub fn pointer_up(&mut self, point: Point) {
        self.dispatch(PointerEvent::Up(point));
    }

    /// Frame pump: expires long presses and advances the snap-back.
    pub fn tick(&mut self) {
        self.dispatch(PointerEvent::Timeout);

        let Some(snap) = self.snap_back else {
            return;
        };
        let (offset, done) = snap.offset_at(self.clock.now());
        if done {
            self.finish_snap_back();
        } else {
            let open = self.config.tuning.get(snap.string);
            self.draw_active_string(snap.string, open, offset);
        }
    }

    fn dispatch(&mut self, event: PointerEvent) {
        let now = self.clock.now();
        for gesture in self.gestures.handle(event, now) {
            match gesture {
                Gesture::Tap(target) => self.on_tap(target),
                Gesture::DragStart { target, point } => self.on_drag_start(&target, point),
                Gesture::DragMove(point) => self.on_drag_move(point),
                Gesture::DragEnd(_) => self.on_drag_end(),
            }
        }
    }

    fn on_tap(&mut self, target: Option<NoteGlyph>) {
        if self.scale.pattern().is_none() {
            return;
        }
        match target {
            Some(note) => {
                log::info!("[ENGINE] Tonic set to {} at fret {}", note.name, note.fret);
                self.set_tonic(note.name, note.fret);
            }
            None if self.scale.tonic().is_some() => {
                log::info!("[ENGINE] Tonic cleared");
                self.clear_tonic();
            }
            None => {}
        }
    }

    fn on_drag_start(&mut self, target: &NoteGlyph, point: Point) {
        let string = target.string;
        let open = self.config.tuning.get(string);
        let start_x = self.normalized_x(target.position.x);

        log::info!("[ENGINE] Picked up string {} ({})", string, pitch::next(open, 0).name);
        self.drag = Some(DragState::begin(target, point, start_x, open));
        self.draw_active_string(string, open, 0.0);
    }

    fn on_drag_move(&mut self, point: Point) {
        let fret_width = self.frets.first().map_or(0.0, |fret| fret.width);
        let Some(anchor_x) = self.drag.as_ref().map(|drag| drag.anchor_x(point)) else {
            return;
        };
        let x = self.normalized_x(anchor_x);
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = drag.follow(x, fret_width);
        let (string, pending, offset) = (drag.string, drag.pending, drag.offset);

        log::debug!("[ENGINE] Drag string {}: {:+} semitones, offset {:.1}", string, delta, offset);
        let screen_offset = offset * self.config.hand_type.direction();
        self.draw_active_string(string, pending, screen_offset);
    }

    fn on_drag_end(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };

        self.config.tuning.set(drag.string, drag.pending as usize);
        log::info!(
            "[ENGINE] String {} retuned to {}",
            drag.string,
            pitch::next(drag.pending, 0).name
        );

        self.snap_back = Some(SnapBack {
            string: drag.string,
            start_offset: drag.offset * self.config.hand_type.direction(),
            started_at: self.clock.now(),
        });
    }

    fn finish_snap_back(&mut self) {
        if self.snap_back.take().is_none() {
            return;
        }
        self.draw_notes();
        self.emit_tuning();
    }

    // --- Drawing ---

    /// Clears and repaints both layers.
    fn redraw(&mut self) {
        self.fret_layer.clear();

        let rect = self.fret_layer.rect();
        self.frets = fret::layout(
            &rect,
            self.config.number_of_frets,
            self.config.hand_type,
            self.config.fret_style,
        );

        let surface = self.fret_layer.surface_mut();
        for fret in &self.frets {
            fret.draw(
                surface,
                self.config.number_of_strings,
                self.config.hand_type,
                &self.config.theme,
                rect.padding.bottom,
            );
        }

        self.draw_notes();
    }

    /// Rebuilds every glyph from current state, repaints the note layer and
    /// re-registers the hit targets.
    fn draw_notes(&mut self) {
        self.build_notes(None);
        self.paint_notes();
        self.register_notes();
    }

    /// Repaints with `string` previewed at open pitch `open`, shifted by
    /// `offset`. Hit targets are left alone until the drag settles.
    fn draw_active_string(&mut self, string: usize, open: u8, offset: f32) {
        self.build_notes(Some(ActiveString {
            string,
            open,
            offset,
        }));
        self.paint_notes();
    }

    /// One pass over every string. Windowed scale modes read the previous
    /// string's record, so no string is ever rebuilt on its own.
    fn build_notes(&mut self, active: Option<ActiveString>) {
        self.scale.reset_pass();
        self.notes = (0..self.config.number_of_strings)
            .map(|string| match active {
                Some(active) if active.string == string => {
                    self.build_string(string, active.open, active.offset, true)
                }
                _ => {
                    let open = self.config.tuning.get(string);
                    self.build_string(string, open, 0.0, false)
                }
            })
            .collect();
    }

    fn paint_notes(&mut self) {
        self.note_layer.clear();
        let surface = self.note_layer.surface_mut();
        for glyph in self.notes.iter().flatten() {
            glyph.draw(surface);
        }
    }

    fn register_notes(&mut self) {
        self.gestures
            .register(self.notes.iter().flatten().cloned());
    }

    /// One string's glyphs for open pitch `open`, shifted by `offset`.
    /// Active strings also get a ghost column beyond each edge.
    fn build_string(&mut self, string: usize, open: u8, offset: f32, active: bool) -> Vec<NoteGlyph> {
        let number_of_frets = self.config.number_of_frets as i32;
        let mut columns: Vec<i32> = (0..number_of_frets).collect();
        if active {
            columns.push(-1);
            columns.push(number_of_frets);
        }

        columns
            .into_iter()
            .filter_map(|fret| self.build_note(string, fret, open, offset, active))
            .collect()
    }

    fn build_note(
        &mut self,
        string: usize,
        fret: i32,
        open: u8,
        offset: f32,
        active: bool,
    ) -> Option<NoteGlyph> {
        let last = self.frets.len().checked_sub(1)?;
        let direction = self.config.hand_type.direction();

        let (cell, edge_shift) = if fret < 0 {
            let cell = self.frets[0];
            (cell, -cell.width * direction)
        } else if fret as usize > last {
            let cell = self.frets[last];
            (cell, cell.width * direction)
        } else {
            (self.frets[fret as usize], 0.0)
        };

        // column f shows the note stopped at fret f + 1
        let pitch = pitch::next(open as i64 + 1, fret as i64);
        let on_board = fret >= 0 && fret as usize <= last;
        let highlight = if on_board {
            self.scale.recognize(fret, string, pitch.name)
        } else {
            // preview columns past the board never count against the string
            Highlight::NONE
        };

        let ghost_mode = self.config.show_ghost_notes && self.scale.tonic().is_some();
        let visible = match pitch.kind {
            NoteKind::Natural => self.config.show_flat_notes,
            NoteKind::Accidental => self.config.show_sharp_notes,
        } && !ghost_mode;

        let position = Point::new(
            cell.center() + edge_shift + offset,
            cell.find_string_y(string) + 1.0,
        );

        Some(
            NoteGlyph::new(string, fret, pitch, position, highlight, &self.config.theme)
                .with_visibility(visible)
                .with_ghost(ghost_mode)
                .with_active(active),
        )
    }

    /// Pointer x in the frame where fret numbers grow to the right.
    fn normalized_x(&self, x: f32) -> f32 {
        match self.config.hand_type {
            HandType::Right => x,
            HandType::Left => self.note_layer.width() - x,
        }
    }

    fn apply_height(&mut self) {
        let height = board_height(self.config.number_of_strings);
        if height == self.fret_layer.height() {
            return;
        }
        self.fret_layer.set_height(height);
        self.note_layer.set_height(height);
        self.height_subscribers.retain(|tx| tx.send(height).is_ok());
    }

    fn emit_tuning(&mut self) {
        let tuning = self.config.tuning.clone();
        log::debug!("[ENGINE] Emitting tuning {}", tuning);
        self.tuning_subscribers.retain(|tx| tx.send(tuning.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::surface::RecordingSurface;

    fn engine(config: FretboardConfig) -> FretboardEngine<RecordingSurface, ManualClock> {
        FretboardEngine::initialize(
            config,
            RecordingSurface::new(),
            RecordingSurface::new(),
            DisplayMetrics::new(1010.0),
            ManualClock::new(),
        )
        .unwrap()
    }

    #[test]
    fn detached_surface_is_rejected() {
        let result = FretboardEngine::initialize(
            FretboardConfig::default(),
            RecordingSurface::new(),
            RecordingSurface::detached(),
            DisplayMetrics::new(800.0),
            ManualClock::new(),
        );
        assert!(matches!(result, Err(FretboardError::SurfaceNotReady("note"))));
    }

    #[test]
    fn one_glyph_per_string_and_fret() {
        let engine = engine(FretboardConfig::default());
        assert_eq!(engine.notes().count(), 6 * 24);
        assert_eq!(engine.frets()[0].width, 40.0);
        assert_eq!(engine.gestures().targets().len(), 6 * 24);
    }

    #[test]
    fn sharps_can_be_hidden() {
        let mut engine = engine(FretboardConfig::default());
        engine.change_show_notes(false, NoteToggle::Sharp);
        let shown: Vec<_> = engine.notes().filter(|g| g.is_shown()).collect();
        assert!(shown.iter().all(|g| g.kind == NoteKind::Natural));
        assert_eq!(engine.gestures().targets().len(), shown.len());
    }

    #[test]
    fn ghost_mode_only_applies_with_a_tonic() {
        let mut engine = engine(FretboardConfig {
            show_ghost_notes: true,
            scale_pattern: Some(vec![2, 2, 1, 2, 2, 2, 1]),
            ..FretboardConfig::default()
        });
        assert!(engine.notes().all(|g| g.visible && !g.ghost));

        engine.set_tonic("C", 0);
        assert!(engine.notes().all(|g| !g.visible && g.ghost));
        assert!(engine.notes().filter(|g| g.is_shown()).all(|g| g.in_scale));
    }

    #[test]
    fn string_count_changes_height() {
        let mut engine = engine(FretboardConfig::default());
        let heights = engine.canvas_height();
        assert_eq!(heights.try_recv(), Ok(board_height(6)));

        engine.change_string_amount(7);
        assert_eq!(heights.try_recv(), Ok(board_height(7)));
        assert_eq!(engine.notes().count(), 7 * 24);

        engine.change_fret_count(12);
        assert!(heights.try_recv().is_err());
        assert_eq!(engine.frets().len(), 12);
    }
}
