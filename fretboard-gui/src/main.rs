//! # Fretboard - Interactive Guitar Fretboard GUI
//!
//! This module contains the main GUI application. It hosts the headless
//! fretboard engine, replays its layers on a canvas and keeps the user's
//! settings in a JSON store.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application; all input funnels through `update`
//! - **Engine**: owned by the app, drawing into two recording surfaces
//! - **Communication**: crossbeam receivers for committed tunings and height
//! - **Updates**: 60 FPS ticks drive long presses and the snap-back animation

mod settings;
mod storage;
mod themes;
mod ui;
mod widgets;

use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::Receiver;
use env_logger::Env;
use fretboard_core::clock::SystemClock;
use fretboard_core::gesture::PointerEvent;
use fretboard_core::surface::{DisplayMetrics, RecordingSurface};
use fretboard_core::{Color, FretStyle, FretboardEngine, HandType, NoteToggle, ScaleMode, Tuning};
use iced::widget::{column, container, row, text, Space};
use iced::{Alignment, Element, Length, Size, Subscription, Task, Theme};
use serde::Serialize;

use settings::{Settings, SETTINGS_KEY, THEMES_KEY, TUNING_KEY};
use storage::JsonStore;
use themes::{PaletteSlot, ThemeCatalog};
use ui::settings_panel::{self, PanelData, NO_SCALE, SIDEBAR_WIDTH};
use widgets::fretboard::FretboardCanvas;

const INITIAL_WINDOW: Size = Size::new(1320.0, 520.0);
/// Outer padding plus the gap between board and sidebar.
const CHROME_WIDTH: f32 = 2.0 * 20.0 + 10.0;
const MIN_BOARD_WIDTH: f32 = 240.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main entry point for the Fretboard application.
pub fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("[MAIN] Starting Fretboard application...");
    let app = FretboardApp::new()?;

    let result = iced::application("Fretboard", FretboardApp::update, FretboardApp::view)
        .subscription(FretboardApp::subscription)
        .theme(FretboardApp::theme)
        .window_size(INITIAL_WINDOW)
        .run_with(move || (app, Task::none()));
    log::info!("[MAIN] Application finished with result: {:?}", result);

    result?;
    Ok(())
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    // Board input
    Pointer(PointerEvent),

    // Board settings
    StringsChanged(usize),
    FretsChanged(usize),
    HandTypeChanged(HandType),
    FretStyleChanged(FretStyle),
    NoteToggled(NoteToggle, bool),

    // Scale
    ScaleSelected(String),
    ScaleModeSelected(ScaleMode),
    ClearTonic,

    // Themes
    ThemeSelected(String),
    PaletteColorChanged(PaletteSlot, String),
    ThemeNameChanged(String),
    SaveTheme,

    // Window and frame pump
    WindowResized(Size),
    Tick,
}

struct FretboardApp {
    engine: FretboardEngine<RecordingSurface, SystemClock>,
    /// `None` when the settings file could not be read; nothing is saved then.
    store: Option<JsonStore>,
    settings: Settings,
    themes: ThemeCatalog,

    tuning_updates: Receiver<Tuning>,
    height_updates: Receiver<f32>,
    /// Last height reported by the engine; the canvas is sized to it.
    board_height: f32,

    // Theme editor inputs
    palette_inputs: Vec<String>,
    theme_name_input: String,
}

impl FretboardApp {
    fn new() -> Result<Self> {
        let store = match JsonStore::open(JsonStore::default_path()) {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("[MAIN] Settings unavailable, running with defaults: {:#}", e);
                None
            }
        };

        let settings: Settings = store
            .as_ref()
            .and_then(|store| store.get(SETTINGS_KEY))
            .unwrap_or_default();
        let themes = ThemeCatalog::new(
            store
                .as_ref()
                .and_then(|store| store.get(THEMES_KEY))
                .unwrap_or_default(),
        );

        let config = settings.to_config(&themes);
        let palette_inputs = PaletteSlot::ALL
            .iter()
            .map(|slot| slot.get(&config.theme).to_hex())
            .collect();

        let mut engine = FretboardEngine::initialize(
            config,
            RecordingSurface::new(),
            RecordingSurface::new(),
            DisplayMetrics::new(board_width(INITIAL_WINDOW.width)),
            SystemClock::new(),
        )?;
        let tuning_updates = engine.current_tuning();
        let height_updates = engine.canvas_height();
        let board_height = latest(&height_updates).unwrap_or_else(|| engine.height());

        log::info!("[MAIN] Loaded settings: {} strings, tuning {}", settings.number_of_strings, settings.tuning);
        Ok(Self {
            engine,
            store,
            settings,
            themes,
            tuning_updates,
            height_updates,
            board_height,
            palette_inputs,
            theme_name_input: String::new(),
        })
    }

    fn update(&mut self, message: Message) {
        if !matches!(message, Message::Tick | Message::Pointer(PointerEvent::Move(_))) {
            log::debug!("[UPDATE] Received message: {:?}", message);
        }

        match message {
            Message::Pointer(event) => match event {
                PointerEvent::Down(point) => self.engine.pointer_down(point),
                PointerEvent::Move(point) => self.engine.pointer_move(point),
                PointerEvent::Up(point) => self.engine.pointer_up(point),
                PointerEvent::Timeout => self.engine.tick(),
            },
            Message::StringsChanged(count) => {
                let count = Settings::clamp_strings(count);
                self.settings.number_of_strings = count;
                self.engine.change_string_amount(count);
                self.save_settings();
            }
            Message::FretsChanged(count) => {
                let count = Settings::clamp_frets(count);
                self.settings.number_of_frets = count;
                self.engine.change_fret_count(count);
                self.save_settings();
            }
            Message::HandTypeChanged(hand) => {
                self.settings.hand_type = hand;
                self.engine.change_hand_type(hand);
                self.save_settings();
            }
            Message::FretStyleChanged(style) => {
                self.settings.fret_style = style;
                self.engine.change_fret_style(style);
                self.save_settings();
            }
            Message::NoteToggled(toggle, value) => {
                *self.settings.toggle_mut(toggle) = value;
                self.engine.change_show_notes(value, toggle);
                self.save_settings();
            }
            Message::ScaleSelected(name) => {
                self.settings.scale = (name != NO_SCALE).then_some(name);
                self.engine.change_scale(self.settings.scale_pattern());
                self.save_settings();
            }
            Message::ScaleModeSelected(mode) => {
                self.settings.scale_mode = mode;
                self.engine.change_scale_mode(mode);
                self.save_settings();
            }
            Message::ClearTonic => self.engine.clear_tonic(),
            Message::ThemeSelected(name) => {
                let Some(palette) = self.themes.palette(&name) else {
                    log::warn!("[MAIN] Unknown theme {}", name);
                    return;
                };
                self.settings.theme = name;
                self.set_palette(palette);
                self.save_settings();
            }
            Message::PaletteColorChanged(slot, value) => {
                let index = PaletteSlot::ALL.iter().position(|s| *s == slot).unwrap_or_default();
                let parsed = Color::from_hex(&value);
                self.palette_inputs[index] = value;

                // half-typed colors stay in the input until they parse
                if let Ok(color) = parsed {
                    let mut palette = self.engine.config().theme;
                    *slot.get_mut(&mut palette) = color;
                    self.engine.change_theme(palette);
                }
            }
            Message::ThemeNameChanged(name) => self.theme_name_input = name,
            Message::SaveTheme => {
                let name = self.themes.save(&self.theme_name_input, self.engine.config().theme);
                self.theme_name_input.clear();
                let custom = self.themes.custom.clone();
                self.persist(THEMES_KEY, &custom);
                self.settings.theme = name;
                self.save_settings();
            }
            Message::WindowResized(size) => {
                self.engine.resize(DisplayMetrics::new(board_width(size.width)));
            }
            Message::Tick => {
                self.engine.tick();

                if let Some(tuning) = latest(&self.tuning_updates) {
                    if tuning != self.settings.tuning {
                        log::info!("[MAIN] Tuning committed: {}", tuning);
                        self.persist(TUNING_KEY, &tuning);
                        self.settings.tuning = tuning;
                    }
                }
                if let Some(height) = latest(&self.height_updates) {
                    log::debug!("[MAIN] Board height is now {}", height);
                    self.board_height = height;
                }
            }
        }
    }

    /// Renders the board above its title, with the settings sidebar on the
    /// right.
    fn view(&self) -> Element<'_, Message> {
        let board = FretboardCanvas::new(
            self.engine.fret_surface(),
            self.engine.note_surface(),
            self.board_height,
        );

        let sidebar = settings_panel::create_sidebar(PanelData {
            settings: &self.settings,
            tonic: self.engine.scale().tonic(),
            theme_names: self.themes.names(),
            palette: self.engine.config().theme,
            palette_inputs: &self.palette_inputs,
            theme_name_input: &self.theme_name_input,
        });

        let main_content = row![
            column![text("Fretboard").size(28), Space::with_height(20), board.view()]
                .width(Length::Fill)
                .spacing(10),
            Space::with_width(10),
            sidebar,
        ]
        .align_y(Alignment::Start)
        .padding(20);

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Frame ticks plus window resizes.
    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(FRAME_INTERVAL).map(|_| Message::Tick),
            iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }

    fn theme(&self) -> Theme {
        if self.settings.theme == themes::LIGHT {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    fn set_palette(&mut self, palette: fretboard_core::Palette) {
        for (input, slot) in self.palette_inputs.iter_mut().zip(PaletteSlot::ALL) {
            *input = slot.get(&palette).to_hex();
        }
        self.engine.change_theme(palette);
    }

    fn save_settings(&mut self) {
        let settings = self.settings.clone();
        self.persist(SETTINGS_KEY, &settings);
    }

    /// Writes one key, logging instead of failing.
    fn persist<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(e) = store.set(key, value) {
            log::warn!("[MAIN] Could not save {}: {:#}", key, e);
        }
    }
}

/// Drains `updates`, keeping only the newest value.
fn latest<T>(updates: &Receiver<T>) -> Option<T> {
    updates.try_iter().last()
}

/// Width left for the board in a window `window_width` wide.
fn board_width(window_width: f32) -> f32 {
    (window_width - SIDEBAR_WIDTH - CHROME_WIDTH).max(MIN_BOARD_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_takes_what_the_sidebar_leaves() {
        assert_eq!(board_width(1320.0), 1020.0);
        assert_eq!(board_width(100.0), MIN_BOARD_WIDTH);
    }

    #[test]
    fn only_the_newest_update_is_kept() {
        let (tx, rx) = crossbeam_channel::unbounded();
        assert_eq!(latest(&rx), None::<f32>);

        for height in [192.0, 220.0, 248.0] {
            tx.send(height).unwrap();
        }
        assert_eq!(latest(&rx), Some(248.0));
        assert_eq!(latest(&rx), None);
    }

    #[test]
    fn board_height_follows_the_string_count() {
        let mut engine = FretboardEngine::initialize(
            fretboard_core::FretboardConfig::default(),
            RecordingSurface::new(),
            RecordingSurface::new(),
            DisplayMetrics::new(board_width(INITIAL_WINDOW.width)),
            SystemClock::new(),
        )
        .unwrap();
        let heights = engine.canvas_height();
        let six = latest(&heights).unwrap();

        engine.change_string_amount(7);
        let seven = latest(&heights).unwrap();
        assert!(seven > six);
        assert_eq!(seven, engine.fret_surface().logical_size().height);
    }
}
