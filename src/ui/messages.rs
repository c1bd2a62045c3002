use iced::widget::{button, column, container, horizontal_space, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::data::FeedbackMessage;
use crate::Message;

/// The guest book messages page: all feedback, newest first
pub fn page<'a>(
    messages: Option<&'a [FeedbackMessage]>,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let header = row![
        button(text("← Back to the card")).on_press(Message::BackToCard),
        horizontal_space(),
        text("Birthday Messages").size(32),
        horizontal_space(),
    ]
    .align_y(Alignment::Center)
    .spacing(16);

    let body: Element<'a, Message> = match (messages, error) {
        (_, Some(error)) => text(format!("Error loading messages: {error}"))
            .size(16)
            .style(text::danger)
            .into(),
        (None, None) => text("Loading messages...").size(16).into(),
        (Some([]), None) => column![
            text("No Messages Yet").size(24),
            text("When your guest sends their feedback, it will appear here.").size(15),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into(),
        (Some(messages), None) => {
            let mut list = Column::new()
                .push(text(format!("Total messages: {}", messages.len())).size(15))
                .spacing(14)
                .align_x(Alignment::Center);

            for (index, message) in messages.iter().enumerate() {
                let title = format!("Message #{}", messages.len() - index);
                let sent = message.created_at.format("%B %e, %Y %H:%M UTC").to_string();
                list = list.push(
                    container(
                        column![
                            row![text(title).size(16), horizontal_space(), text(sent).size(13)]
                                .align_y(Alignment::Center),
                            text(message.message.clone()).size(15),
                        ]
                        .spacing(8),
                    )
                    .padding(16)
                    .width(Length::Fixed(560.0))
                    .style(container::rounded_box),
                );
            }

            scrollable(list).into()
        }
    };

    container(
        column![header, body]
            .spacing(24)
            .align_x(Alignment::Center)
            .width(Length::Fill),
    )
    .padding(32)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
