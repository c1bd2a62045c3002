use iced::widget::{button, column, container, horizontal_space, row, slider, text, Column};
use iced::{Alignment, Element, Length};
use std::time::Duration;

use crate::audio::player::{PlaybackState, PlayerSnapshot};
use crate::Message;

const PANEL_WIDTH: f32 = 300.0;

/// m:ss display for track positions and durations
pub fn format_time(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// The floating music player panel
pub fn panel(snapshot: PlayerSnapshot) -> Element<'static, Message> {
    let play_label = if snapshot.state == PlaybackState::Playing {
        "⏸"
    } else {
        "▶"
    };
    let mute_label = if snapshot.muted { "🔇" } else { "🔊" };

    let now_playing = column![
        text(snapshot.title.clone()).size(16),
        text(snapshot.artist.clone()).size(13),
    ]
    .spacing(2);

    let progress = slider(0.0..=1.0, snapshot.progress, Message::SeekTo).step(0.001);
    let times = row![
        text(format_time(snapshot.position)).size(12),
        horizontal_space(),
        text(format_time(snapshot.duration)).size(12),
    ];

    let controls = row![
        button(text("⏮")).on_press(Message::PreviousTrack),
        button(text(play_label)).on_press(Message::TogglePlay),
        button(text("⏭")).on_press(Message::NextTrack),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let volume = row![
        button(text(mute_label)).on_press(Message::ToggleMute),
        slider(0.0..=1.0, snapshot.volume, Message::VolumeChanged).step(0.01),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut playlist = Column::new().spacing(4);
    for (index, track) in snapshot.tracks.iter().enumerate() {
        let marker = if index == snapshot.current { "▸ " } else { "" };
        let label = format!(
            "{marker}{} · {} · {}",
            track.title,
            track.artist,
            format_time(track.duration),
        );
        playlist = playlist.push(
            button(text(label).size(13))
                .style(button::text)
                .on_press(Message::SelectTrack(index)),
        );
    }

    container(
        column![
            text("Birthday Playlist 🎵").size(18),
            now_playing,
            progress,
            times,
            controls,
            volume,
            playlist,
        ]
        .spacing(10),
    )
    .padding(16)
    .width(Length::Fixed(PANEL_WIDTH))
    .style(container::rounded_box)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_secs(9)), "0:09");
        assert_eq!(format_time(Duration::from_secs(75)), "1:15");
        assert_eq!(format_time(Duration::from_secs(600)), "10:00");
    }
}
