/// Full-screen overlays: lightbox and compare
///
/// Both take over the whole results screen while open (the original
/// covered the page with a backdrop; a view swap keeps the same
/// contract with far less machinery). Escape or the close button
/// returns to the grid.

use std::path::Path;

use iced::widget::{button, column, container, image, row, text};
use iced::{Alignment, Element, Length};

use crate::state::data::ImageRecord;
use crate::Message;

fn large_view(record: &ImageRecord) -> Element<'static, Message> {
    let source = Path::new(&record.src);
    if source.is_file() {
        image(image::Handle::from_path(source))
            .width(Length::Fill)
            .into()
    } else {
        container(text("🖼").size(96))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }
}

/// Focused-image overlay: name, score, and arrow-key paging handled
/// by the shell's keyboard subscription.
pub fn lightbox(record: &ImageRecord) -> Element<'_, Message> {
    let content = column![
        large_view(record),
        text(record.name.clone()).size(24),
        text(format!("Sharpness Score: {}", record.score)).size(16),
        text(format!(
            "Rating: {} · Label: {}",
            record.rating,
            record.label.as_str()
        ))
        .size(13),
        text("← → to browse · Space select · 1-5 rate · G/Y/R label · Esc close").size(12),
        button("Close").on_press(Message::CloseLightbox).padding(8),
    ]
    .spacing(12)
    .align_x(Alignment::Center)
    .max_width(900);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn compare_panel(record: &ImageRecord) -> Element<'static, Message> {
    column![
        large_view(record),
        text(format!("{} · Score {}", record.name, record.score)).size(14),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .width(Length::FillPortion(1))
    .into()
}

/// Side-by-side comparison of exactly two selected records.
pub fn compare<'a>(pair: &'a (ImageRecord, ImageRecord)) -> Element<'a, Message> {
    let content = column![
        text("Compare").size(28),
        row![compare_panel(&pair.0), compare_panel(&pair.1)].spacing(20),
        button("Close").on_press(Message::CloseCompare).padding(8),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(30)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
