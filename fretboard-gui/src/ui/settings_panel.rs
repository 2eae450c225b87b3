//! # Settings Panel Module
//!
//! The sidebar next to the board. Each section is a titled column of
//! controls; every control maps to exactly one [`crate::Message`].

use fretboard_core::{FretStyle, HandType, NoteToggle, Palette, ScaleMode, scale};
use iced::widget::{Space, button, checkbox, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::Message;
use crate::settings::Settings;
use crate::themes::PaletteSlot;

pub const SIDEBAR_WIDTH: f32 = 250.0;

/// Entry of the scale picker that turns highlighting off.
pub const NO_SCALE: &str = "none";

/// Everything the sidebar shows, borrowed from the app for one frame.
pub struct PanelData<'a> {
    pub settings: &'a Settings,
    pub tonic: Option<&'static str>,
    pub theme_names: Vec<String>,
    pub palette: Palette,
    pub palette_inputs: &'a [String],
    pub theme_name_input: &'a str,
}

/// Note visibility switches, in display order.
const NOTE_TOGGLES: &[(&str, NoteToggle)] = &[
    ("Naturals", NoteToggle::Flat),
    ("Accidentals", NoteToggle::Sharp),
    ("Ghost notes", NoteToggle::Ghost),
];

pub fn create_sidebar<'a>(data: PanelData<'a>) -> Element<'a, Message> {
    let sections = column![
        board_section(data.settings),
        notes_section(data.settings),
        scale_section(data.settings, data.tonic),
        theme_section(&data),
    ]
    .spacing(20);

    container(sections.padding(15))
        .width(Length::Fixed(SIDEBAR_WIDTH))
        .height(Length::Fill)
        .into()
}

fn board_section(settings: &Settings) -> Element<'static, Message> {
    let strings = settings.number_of_strings;
    let frets = settings.number_of_frets;

    let hand_label = match settings.hand_type {
        HandType::Right => "Right-handed",
        HandType::Left => "Left-handed",
    };
    let (style_label, other_style) = match settings.fret_style {
        FretStyle::Equal => ("Equal frets", FretStyle::Tempered),
        FretStyle::Tempered => ("Tempered frets", FretStyle::Equal),
    };

    make_section(
        "Board",
        column![
            stepper("Strings", strings, Message::StringsChanged),
            stepper("Frets", frets, Message::FretsChanged),
            wide_button(hand_label, Message::HandTypeChanged(settings.hand_type.flipped())),
            wide_button(style_label, Message::FretStyleChanged(other_style)),
        ]
        .spacing(8)
        .into(),
    )
}

fn notes_section(settings: &Settings) -> Element<'static, Message> {
    let toggles = NOTE_TOGGLES.iter().fold(column![].spacing(8), |col, (label, toggle)| {
        let toggle = *toggle;
        let checked = match toggle {
            NoteToggle::Flat => settings.show_flat_notes,
            NoteToggle::Sharp => settings.show_sharp_notes,
            NoteToggle::Ghost => settings.show_ghost_notes,
        };
        col.push(checkbox(*label, checked).on_toggle(move |value| Message::NoteToggled(toggle, value)))
    });

    make_section("Notes", toggles.into())
}

fn scale_section(settings: &Settings, tonic: Option<&'static str>) -> Element<'static, Message> {
    let names: Vec<String> = std::iter::once(NO_SCALE)
        .chain(scale::SCALE_PATTERNS.iter().map(|(name, _)| *name))
        .map(str::to_string)
        .collect();
    let selected = Some(settings.scale.clone().unwrap_or_else(|| NO_SCALE.to_string()));

    let tonic_row = match tonic {
        Some(name) => row![
            text(format!("Tonic: {name}")).size(14),
            Space::with_width(Length::Fill),
            button(text("Clear").size(12)).on_press(Message::ClearTonic),
        ],
        None if settings.scale.is_some() => row![text("Tap a note to pick the tonic").size(12)],
        None => row![],
    }
    .align_y(Alignment::Center);

    make_section(
        "Scale",
        column![
            pick_list(names, selected, Message::ScaleSelected).width(Length::Fill),
            pick_list(ScaleMode::ALL, Some(settings.scale_mode), Message::ScaleModeSelected)
                .width(Length::Fill),
            tonic_row,
        ]
        .spacing(8)
        .into(),
    )
}

fn theme_section<'a>(data: &PanelData<'a>) -> Element<'a, Message> {
    let colors = PaletteSlot::ALL.iter().zip(data.palette_inputs).fold(
        column![].spacing(4),
        |col, (slot, input)| {
            let slot = *slot;
            let swatch = slot.get(&data.palette).to_hex();
            col.push(
                row![
                    text(slot.label()).size(12).width(Length::Fixed(80.0)),
                    text_input(&swatch, input)
                        .size(12)
                        .on_input(move |value| Message::PaletteColorChanged(slot, value)),
                ]
                .align_y(Alignment::Center),
            )
        },
    );

    make_section(
        "Theme",
        column![
            pick_list(
                data.theme_names.clone(),
                Some(data.settings.theme.clone()),
                Message::ThemeSelected
            )
            .width(Length::Fill),
            colors,
            row![
                text_input("Custom", data.theme_name_input)
                    .size(12)
                    .on_input(Message::ThemeNameChanged)
                    .on_submit(Message::SaveTheme),
                button(text("Save").size(12)).on_press(Message::SaveTheme),
            ]
            .spacing(4)
            .align_y(Alignment::Center),
        ]
        .spacing(8)
        .into(),
    )
}

/// `label  [-] value [+]`
fn stepper(
    label: &'static str,
    value: usize,
    on_change: impl Fn(usize) -> Message,
) -> Element<'static, Message> {
    row![
        text(label).size(14),
        Space::with_width(Length::Fill),
        button(text("-").size(14)).on_press(on_change(value.saturating_sub(1))),
        text(value.to_string()).size(14).width(Length::Fixed(28.0)).align_x(Alignment::Center),
        button(text("+").size(14)).on_press(on_change(value + 1)),
    ]
    .spacing(4)
    .align_y(Alignment::Center)
    .into()
}

fn wide_button(label: &'static str, message: Message) -> Element<'static, Message> {
    button(text(label).size(14).width(Length::Fill))
        .padding([6, 10])
        .on_press(message)
        .into()
}

fn make_section<'a>(title: &'static str, content: Element<'a, Message>) -> Element<'a, Message> {
    column![text(title).size(18), Space::with_height(10), content]
        .spacing(5)
        .into()
}
