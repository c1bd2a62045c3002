use iced::widget::{button, column, container, text, text_input};
use iced::{Alignment, Element, Length};

use crate::state::feedback::FeedbackFlow;
use crate::Message;

/// The feedback section: the form while editing or submitting,
/// the thank-you card once the message is saved.
pub fn section(flow: &FeedbackFlow) -> Element<'_, Message> {
    if flow.is_submitted() {
        return container(
            column![
                text("💕").size(48),
                text("Thank You!").size(32),
                text("Your message has been received with so much love!").size(16),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        )
        .padding(32)
        .style(container::rounded_box)
        .into();
    }

    let mut input = text_input(
        "Share your thoughts, or just say hi! ✨",
        flow.draft(),
    )
    .padding(12)
    .size(16);

    // Editing is disabled while a submission is in flight
    if !flow.is_submitting() {
        input = input
            .on_input(Message::DraftChanged)
            .on_submit(Message::SubmitFeedback);
    }

    let submit_label = if flow.is_submitting() {
        "Sending..."
    } else {
        "Send Your Message"
    };
    let submit = button(text(submit_label))
        .padding(12)
        .on_press_maybe(flow.can_submit().then_some(Message::SubmitFeedback));

    let mut form = column![
        text("💌 Share Your Thoughts").size(36),
        text("How did this birthday surprise make you feel?").size(16),
        input,
    ]
    .spacing(14)
    .align_x(Alignment::Center)
    .max_width(620);

    if let Some(error) = flow.error() {
        form = form.push(
            text(format!("Could not send your message: {error}. Please try again."))
                .size(14)
                .style(text::danger),
        );
    }

    form = form.push(submit);
    form = form.push(text("Your message will be delivered with lots of love 💕").size(13));

    container(form)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
