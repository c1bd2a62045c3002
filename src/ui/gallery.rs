use iced::widget::{
    button, center, column, container, image, mouse_area, opaque, row, text, tooltip, Column, Row,
};
use iced::{Alignment, Element, Length};

use crate::state::gallery::PhotoBrowser;
use crate::Message;

const GRID_COLUMNS: usize = 4;
const THUMBNAIL_WIDTH: f32 = 220.0;
const MODAL_WIDTH: f32 = 680.0;

/// The gallery section: heading, thumbnail grid, and the add button
pub fn section(browser: &PhotoBrowser) -> Element<'_, Message> {
    let heading = column![
        text("📸 Photo Gallery").size(36),
        text("Click any photo to view it full size").size(16),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    let body: Element<'_, Message> = if browser.is_empty() {
        text("No photos yet. Drop images into a photos/ folder next to the app, or press Add Photos.")
            .size(16)
            .into()
    } else {
        let mut grid = Column::new().spacing(12).align_x(Alignment::Center);
        for (row_index, chunk) in browser.photos().chunks(GRID_COLUMNS).enumerate() {
            let mut cells = Row::new().spacing(12);
            for (column_index, photo) in chunk.iter().enumerate() {
                let index = row_index * GRID_COLUMNS + column_index;
                cells = cells.push(tooltip(
                    button(
                        image(image::Handle::from_path(&photo.path))
                            .width(Length::Fixed(THUMBNAIL_WIDTH)),
                    )
                    .padding(0)
                    .on_press(Message::OpenPhoto(index)),
                    container(text(photo.alt.as_str()).size(13))
                        .padding(6)
                        .style(container::rounded_box),
                    tooltip::Position::Bottom,
                ));
            }
            grid = grid.push(cells);
        }
        grid.into()
    };

    column![
        heading,
        body,
        button(text("Add Photos")).on_press(Message::AddPhotos),
    ]
    .spacing(20)
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .into()
}

/// The modal overlay for the stack: darkened backdrop, photo card with
/// navigation arrows, caption, and the "n / total" counter.
/// Clicking the backdrop closes the modal.
pub fn modal(browser: &PhotoBrowser) -> Element<'_, Message> {
    let Some(photo) = browser.current_photo() else {
        return column![].into();
    };

    let counter = format!("{} / {}", browser.current_index() + 1, browser.len());

    let viewer = row![
        button(text("‹").size(28)).on_press(Message::PreviousPhoto),
        image(image::Handle::from_path(&photo.path)).width(Length::Fixed(MODAL_WIDTH)),
        button(text("›").size(28)).on_press(Message::NextPhoto),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let card = container(
        column![
            viewer,
            text(&photo.caption).size(18),
            row![
                text(counter).size(14),
                button(text("Close")).on_press(Message::CloseModal),
            ]
            .spacing(24)
            .align_y(Alignment::Center),
        ]
        .spacing(14)
        .align_x(Alignment::Center),
    )
    .padding(24)
    .style(container::rounded_box);

    opaque(
        mouse_area(center(opaque(card)))
            .on_press(Message::CloseModal),
    )
}
