use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Wish cards shown on the main page
const WISHES: [(&str, &str); 3] = [
    (
        "May your birthday be the start of a year filled with good luck, good health, \
         and much happiness. You deserve all the wonderful things that life has to offer!",
        "With love and best wishes 💜",
    ),
    (
        "Your kindness, wisdom, and beautiful spirit have touched so many lives. Today \
         we celebrate not just your birthday, but the amazing person you are!",
        "From everyone who adores you 💖",
    ),
    (
        "Another year older, another year wiser, and another year more wonderful! \
         Here's to celebrating you and all the joy you bring to the world.",
        "Cheers to you 🥂",
    ),
];

pub fn section() -> Element<'static, Message> {
    let mut cards = column![
        text("✨ Birthday Wishes").size(36),
        text("Special messages just for you").size(16),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    for (message, from) in WISHES {
        cards = cards.push(
            container(
                column![
                    text(format!("\u{201c}{message}\u{201d}")).size(16),
                    text(from).size(14),
                ]
                .spacing(8),
            )
            .padding(20)
            .max_width(640)
            .style(container::rounded_box),
        );
    }

    container(cards).width(Length::Fill).center_x(Length::Fill).into()
}
