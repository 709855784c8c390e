//! Status bar payload for the current timer state.

use crate::models::{TimerRecord, TimerStatus};
use serde::Serialize;

/// JSON object consumed by the status bar (Waybar `return-type: json`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusOutput {
    pub text: String,
    pub tooltip: String,
    pub class: &'static str,
}

impl StatusOutput {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Builds the status bar payload for a record.
pub fn render(record: &TimerRecord) -> StatusOutput {
    StatusOutput {
        text: format_text(record.status(), record.time_left),
        tooltip: format!("Pomodoros: {}", record.pomodoros),
        class: record.status().as_str(),
    }
}

/// Formats the status bar text based on current timer state.
pub fn format_text(status: TimerStatus, time_left: u32) -> String {
    match status {
        TimerStatus::Idle => "󰔟 Start".to_string(),
        TimerStatus::Work => format!("󰔛 {}", format_time(time_left)),
        TimerStatus::ShortBreak | TimerStatus::LongBreak => {
            format!("󰭹 {}", format_time(time_left))
        }
        TimerStatus::Paused => format!("󰏤 {}", format_time(time_left)),
    }
}

/// Formats time in MM:SS format.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
