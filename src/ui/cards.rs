/// Photo card grids for the results screen
///
/// Each bucket renders as a wrapped grid of cards. A card shows the
/// thumbnail (when the source is a local file), name, score, star
/// bar, and label dot. Primary click toggles selection; secondary
/// click cycles the color label. Empty buckets render an explicit
/// empty-state marker rather than nothing.

use std::path::Path;

use iced::widget::{button, column, container, image, mouse_area, row, text};
use iced::{Alignment, Border, Color, Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::data::{ImageRecord, Label};
use crate::state::store::ResultStore;
use crate::Message;

const CARD_WIDTH: f32 = 190.0;
const THUMB_HEIGHT: f32 = 120.0;

pub fn label_color(label: Label) -> Color {
    match label {
        Label::None => Color::from_rgba(1.0, 1.0, 1.0, 0.25),
        Label::Green => Color::from_rgb(0.30, 0.82, 0.44),
        Label::Yellow => Color::from_rgb(0.95, 0.80, 0.25),
        Label::Red => Color::from_rgb(0.90, 0.30, 0.30),
    }
}

fn card_style(selected: bool) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();
        container::Style {
            background: Some(palette.background.weak.color.into()),
            border: Border {
                color: if selected {
                    palette.primary.strong.color
                } else {
                    Color::TRANSPARENT
                },
                width: 2.0,
                radius: 8.0.into(),
            },
            ..container::Style::default()
        }
    }
}

/// Thumbnail, or a placeholder for non-file sources (demo URLs).
fn thumbnail(record: &ImageRecord) -> Element<'static, Message> {
    let source = Path::new(&record.src);
    if source.is_file() {
        image(image::Handle::from_path(source))
            .width(Length::Fill)
            .height(Length::Fixed(THUMB_HEIGHT))
            .into()
    } else {
        container(text("🖼").size(40))
            .width(Length::Fill)
            .height(Length::Fixed(THUMB_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(THUMB_HEIGHT))
            .into()
    }
}

fn star_bar(record: &ImageRecord) -> Element<'static, Message> {
    let mut stars = row![].spacing(2);

    for i in 1..=5u8 {
        let color = if i <= record.rating {
            Color::from_rgb(0.95, 0.80, 0.25)
        } else {
            Color::from_rgba(1.0, 1.0, 1.0, 0.25)
        };
        stars = stars.push(
            button(text("★").size(16).color(color))
                .style(button::text)
                .padding(0)
                .on_press(Message::StarClicked(record.src.clone(), i)),
        );
    }

    stars.into()
}

fn photo_card(record: &ImageRecord, selected: bool) -> Element<'static, Message> {
    let header = row![
        text(record.name.clone()).size(13).width(Length::Fill),
        text("●").size(13).color(label_color(record.label)),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let body = column![
        thumbnail(record),
        header,
        row![
            text(format!("Score {}", record.score)).size(12).width(Length::Fill),
            star_bar(record),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(6)
    .padding(8)
    .width(Length::Fixed(CARD_WIDTH));

    let card = container(body).style(card_style(selected));

    mouse_area(card)
        .on_press(Message::CardClicked(record.src.clone()))
        .on_right_press(Message::LabelCycled(record.src.clone()))
        .into()
}

/// One bucket column: heading with count, then the card grid or the
/// empty-state marker.
pub fn bucket_grid<'a>(
    title: &'a str,
    records: &'a [ImageRecord],
    empty_message: &'a str,
    store: &'a ResultStore,
) -> Element<'a, Message> {
    let heading = text(format!("{title} ({})", records.len())).size(22);

    let content: Element<'a, Message> = if records.is_empty() {
        text(empty_message).size(14).into()
    } else {
        let cards: Vec<Element<'a, Message>> = records
            .iter()
            .map(|record| photo_card(record, store.is_selected(&record.src)))
            .collect();
        Wrap::with_elements(cards)
            .spacing(10.0)
            .line_spacing(10.0)
            .into()
    };

    column![heading, content].spacing(10).into()
}
