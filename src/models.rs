//! Data models for the Pomobar status helper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of the pomodoro timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// No active session, ready to start a pomodoro.
    #[default]
    Idle,
    /// Pomodoro work session in progress.
    Work,
    ShortBreak,
    LongBreak,
    /// Suspended; `previous_status` holds the phase that was interrupted.
    Paused,
}

impl TimerStatus {
    /// Returns true if the phase is counting down.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Work | Self::ShortBreak | Self::LongBreak)
    }

    /// Returns true if currently on a break (short or long).
    pub fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }

    /// Snake-case name, used as the status bar CSS class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
            Self::Paused => "paused",
        }
    }
}

/// The persisted timer state. One record exists per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerRecord {
    status: TimerStatus,
    previous_status: TimerStatus,
    /// Seconds remaining in the current phase.
    pub time_left: u32,
    /// Completed work sessions.
    pub pomodoros: u32,
    /// When this record was last saved.
    pub last_update: DateTime<Utc>,
}

impl Default for TimerRecord {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl TimerRecord {
    /// Creates an idle record observed at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: TimerStatus::Idle,
            previous_status: TimerStatus::Idle,
            time_left: 0,
            pomodoros: 0,
            last_update: now,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn previous_status(&self) -> TimerStatus {
        self.previous_status
    }

    /// Changes the phase, remembering the one it replaces.
    ///
    /// This is the only way to change `status`, so `previous_status` always
    /// points at the phase a pause interrupted.
    pub fn set_status(&mut self, status: TimerStatus) {
        self.previous_status = self.status;
        self.status = status;
    }
}

/// User-configurable settings for the pomodoro timer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Duration of a pomodoro work session in minutes.
    pub pomodoro_mins: u32,
    /// Duration of a short break in minutes.
    pub short_break_mins: u32,
    /// Duration of a long break in minutes.
    pub long_break_mins: u32,
    /// Number of pomodoros before a long break.
    pub pomodoros_for_long_break: u32,
    /// Whether long breaks are granted at all.
    pub long_breaks_enabled: bool,
    /// Whether to show system notifications.
    pub notifications_enabled: bool,
    /// Whether the pomodoro count is cleared once a day.
    pub daily_reset_enabled: bool,
    /// Local hour (0-23) at which the daily reset happens.
    pub daily_reset_hour: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_mins: 25,
            short_break_mins: 5,
            long_break_mins: 15,
            pomodoros_for_long_break: 4,
            long_breaks_enabled: true,
            notifications_enabled: true,
            daily_reset_enabled: false,
            daily_reset_hour: 4,
        }
    }
}

impl Settings {
    pub fn pomodoro_secs(&self) -> u32 {
        self.pomodoro_mins.saturating_mul(60)
    }

    pub fn short_break_secs(&self) -> u32 {
        self.short_break_mins.saturating_mul(60)
    }

    pub fn long_break_secs(&self) -> u32 {
        self.long_break_mins.saturating_mul(60)
    }

    /// Returns true if completing the `count`-th pomodoro earns a long break.
    pub fn is_long_break_due(&self, count: u32) -> bool {
        self.long_breaks_enabled && count % self.pomodoros_for_long_break.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_timer_status_predicates() {
        assert!(!TimerStatus::Idle.is_active());
        assert!(TimerStatus::Work.is_active());
        assert!(TimerStatus::ShortBreak.is_active());
        assert!(TimerStatus::LongBreak.is_active());
        assert!(!TimerStatus::Paused.is_active());

        assert!(TimerStatus::ShortBreak.is_break());
        assert!(TimerStatus::LongBreak.is_break());
        assert!(!TimerStatus::Work.is_break());
        assert!(!TimerStatus::Paused.is_break());
    }

    #[test]
    fn test_timer_status_names_match_serde() {
        for status in [
            TimerStatus::Idle,
            TimerStatus::Work,
            TimerStatus::ShortBreak,
            TimerStatus::LongBreak,
            TimerStatus::Paused,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_record_new() {
        let record = TimerRecord::new(at(1_000));
        assert_eq!(record.status(), TimerStatus::Idle);
        assert_eq!(record.previous_status(), TimerStatus::Idle);
        assert_eq!(record.time_left, 0);
        assert_eq!(record.pomodoros, 0);
        assert_eq!(record.last_update, at(1_000));
    }

    #[test]
    fn test_set_status_tracks_previous() {
        let mut record = TimerRecord::new(at(0));
        record.set_status(TimerStatus::Work);
        assert_eq!(record.previous_status(), TimerStatus::Idle);

        record.set_status(TimerStatus::Paused);
        assert_eq!(record.status(), TimerStatus::Paused);
        assert_eq!(record.previous_status(), TimerStatus::Work);

        record.set_status(TimerStatus::ShortBreak);
        assert_eq!(record.previous_status(), TimerStatus::Paused);
    }

    #[test]
    fn test_record_missing_fields_use_defaults() {
        let record: TimerRecord =
            serde_json::from_str(r#"{"status": "work", "time_left": 42, "extra": true}"#).unwrap();
        assert_eq!(record.status(), TimerStatus::Work);
        assert_eq!(record.previous_status(), TimerStatus::Idle);
        assert_eq!(record.time_left, 42);
        assert_eq!(record.pomodoros, 0);
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.pomodoro_secs(), 1500);
        assert_eq!(settings.short_break_secs(), 300);
        assert_eq!(settings.long_break_secs(), 900);
        assert_eq!(settings.pomodoros_for_long_break, 4);
        assert!(settings.long_breaks_enabled);
        assert!(settings.notifications_enabled);
        assert!(!settings.daily_reset_enabled);
        assert_eq!(settings.daily_reset_hour, 4);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"pomodoro_mins": 50}"#).unwrap();
        assert_eq!(settings.pomodoro_mins, 50);
        assert_eq!(settings.short_break_mins, 5);
    }

    #[test]
    fn test_long_break_due() {
        let settings = Settings::default();
        assert!(!settings.is_long_break_due(1));
        assert!(!settings.is_long_break_due(3));
        assert!(settings.is_long_break_due(4));
        assert!(settings.is_long_break_due(8));
    }

    #[test]
    fn test_long_break_disabled() {
        let settings = Settings {
            long_breaks_enabled: false,
            ..Settings::default()
        };
        assert!(!settings.is_long_break_due(4));
    }

    #[test]
    fn test_long_break_threshold_zero() {
        let settings = Settings {
            pomodoros_for_long_break: 0,
            ..Settings::default()
        };
        assert!(settings.is_long_break_due(1));
    }
}
