//! Timer engine: elapsed-time bookkeeping and phase transitions.

use crate::models::{Settings, TimerRecord, TimerStatus};
use chrono::{DateTime, Days, Duration, Local, NaiveDateTime, TimeZone, Utc};
use clap::ValueEnum;
use tracing::{debug, warn};

/// Events that should trigger a desktop notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionEvent {
    PomodoroComplete { count: u32, is_long_break: bool },
    BreakComplete,
}

/// Command requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Action {
    /// Only report the current state
    #[default]
    Status,
    /// Start, pause or resume
    Toggle,
    /// Skip to the next phase
    Skip,
    /// Go idle and clear the pomodoro count
    Reset,
    /// Go idle, keeping the pomodoro count
    Stop,
}

/// Timer state together with the settings that drive it.
pub struct App {
    pub record: TimerRecord,
    pub settings: Settings,
    /// Sub-second part of the last elapsed time, not yet taken off the clock.
    carry: Duration,
}

impl App {
    pub fn new(record: TimerRecord, settings: Settings) -> Self {
        Self {
            record,
            settings,
            carry: Duration::zero(),
        }
    }

    /// Consumes the wall-clock time elapsed since the record was last saved.
    ///
    /// Returns a completion event when the running phase expired during this
    /// call. A phase that was already at zero never fires again.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<CompletionEvent> {
        let mut event = None;
        self.carry = Duration::zero();

        if self.record.status().is_active() {
            // Whole seconds only; the remainder is returned by `accounted_until`.
            let delta = now - self.record.last_update;
            let elapsed = delta.num_seconds().max(0);
            if delta > Duration::zero() {
                self.carry = delta - Duration::seconds(elapsed);
            }
            let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
            let original_time_left = self.record.time_left;
            self.record.time_left = original_time_left.saturating_sub(elapsed);

            if self.record.time_left == 0 && original_time_left > 0 {
                event = Some(if self.record.status() == TimerStatus::Work {
                    self.finish_pomodoro()
                } else {
                    self.finish_break();
                    CompletionEvent::BreakComplete
                });
                debug!(?event, "phase expired");
            }
        }

        if self.settings.daily_reset_enabled
            && crossed_daily_reset(
                self.record.last_update,
                now,
                self.settings.daily_reset_hour,
                &Local,
            )
        {
            debug!(pomodoros = self.record.pomodoros, "daily reset");
            self.record.pomodoros = 0;
        }

        event
    }

    /// The instant up to which `advance(now)` has charged time to the record.
    ///
    /// Saving with this as `last_update` lets the next invocation pick up the
    /// sub-second remainder the last one left over.
    pub fn accounted_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.carry
    }

    /// Applies one explicit user command.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Status => {}
            Action::Toggle => self.toggle(),
            Action::Skip => self.skip(),
            Action::Reset => self.reset(),
            Action::Stop => self.stop(),
        }
    }

    /// Starts a pomodoro when idle, resumes when paused, pauses otherwise.
    pub fn toggle(&mut self) {
        match self.record.status() {
            TimerStatus::Idle => self.start_pomodoro(),
            TimerStatus::Paused => {
                let resumed = self.record.previous_status();
                self.record.set_status(resumed);
            }
            _ => self.record.set_status(TimerStatus::Paused),
        }
    }

    /// Skips the remainder of a break, or counts the current pomodoro as done.
    ///
    /// Skipping while idle also counts as a completed pomodoro.
    pub fn skip(&mut self) {
        let record = &self.record;
        let in_break = record.status().is_break()
            || (record.status() == TimerStatus::Paused && record.previous_status().is_break());

        if in_break {
            self.start_pomodoro();
        } else {
            self.next_break();
        }
    }

    /// Returns to idle and clears the pomodoro count.
    pub fn reset(&mut self) {
        self.stop();
        self.record.pomodoros = 0;
    }

    /// Returns to idle, keeping the pomodoro count.
    pub fn stop(&mut self) {
        self.record.set_status(TimerStatus::Idle);
        self.record.time_left = 0;
    }

    fn start_pomodoro(&mut self) {
        self.record.set_status(TimerStatus::Work);
        self.record.time_left = self.settings.pomodoro_secs();
    }

    /// Counts a pomodoro and starts the break it earned.
    fn next_break(&mut self) -> bool {
        match self.record.pomodoros.checked_add(1) {
            Some(count) => self.record.pomodoros = count,
            None => warn!(pomodoros = self.record.pomodoros, "pomodoro count saturated"),
        }
        let is_long = self.settings.is_long_break_due(self.record.pomodoros);

        if is_long {
            self.record.set_status(TimerStatus::LongBreak);
            self.record.time_left = self.settings.long_break_secs();
        } else {
            self.record.set_status(TimerStatus::ShortBreak);
            self.record.time_left = self.settings.short_break_secs();
        }
        is_long
    }

    fn finish_pomodoro(&mut self) -> CompletionEvent {
        let is_long_break = self.next_break();
        CompletionEvent::PomodoroComplete {
            count: self.record.pomodoros,
            is_long_break,
        }
    }

    fn finish_break(&mut self) {
        self.start_pomodoro();
    }
}

/// Returns true if a `hour:00` boundary in `tz` lies in `(last_update, now]`.
fn crossed_daily_reset<Tz: TimeZone>(
    last_update: DateTime<Utc>,
    now: DateTime<Utc>,
    hour: u32,
    tz: &Tz,
) -> bool {
    let local_now = now.with_timezone(tz);
    let Some(today) = local_now.date_naive().and_hms_opt(hour, 0, 0) else {
        return false;
    };

    let boundary = match resolve_local(tz, &today) {
        Some(boundary) if boundary <= local_now => Some(boundary),
        _ => today
            .checked_sub_days(Days::new(1))
            .and_then(|yesterday| resolve_local(tz, &yesterday)),
    };

    boundary.is_some_and(|boundary| boundary.with_timezone(&Utc) > last_update)
}

/// Maps a local wall-clock time to an instant. A time skipped by a DST jump
/// maps to the first instant after the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(local).earliest().or_else(|| {
        let after_gap = local.checked_add_signed(Duration::hours(1))?;
        tz.from_local_datetime(&after_gap).earliest()
    })
}
