//! Desktop notifications for automatic phase changes.

use crate::app::CompletionEvent;
use notify_rust::{Notification, Timeout};
use tracing::{debug, warn};

const EXPIRE_MS: u32 = 4000;

/// Builds the notification for a completion event.
fn build(event: CompletionEvent) -> Notification {
    let mut notification = Notification::new();
    match event {
        CompletionEvent::PomodoroComplete {
            count,
            is_long_break,
        } => {
            let kind = if is_long_break { "long" } else { "short" };
            let done = if count == 1 {
                "1 pomodoro".to_string()
            } else {
                format!("{} pomodoros", count)
            };
            notification
                .summary("Pomodoro Complete!")
                .body(&format!("Time for a {} break. {} done.", kind, done));
        }
        CompletionEvent::BreakComplete => {
            notification.summary("Break Complete!").body("Time to focus");
        }
    }

    notification.timeout(Timeout::Milliseconds(EXPIRE_MS));

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        use notify_rust::{Hint, Urgency};
        notification.urgency(Urgency::Low).hint(Hint::Transient(true));
    }

    notification
}

/// Shows a notification for a completion event.
///
/// Runs on the calling thread: the process exits right after, which would
/// kill a background thread before the notification is delivered. Failures
/// are logged and otherwise ignored.
pub fn notify(event: CompletionEvent) {
    match build(event).show() {
        Ok(_) => debug!(?event, "notification sent"),
        Err(e) => warn!(error = %e, "failed to show notification"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_pomodoro_notification() {
        let notification = build(CompletionEvent::PomodoroComplete {
            count: 1,
            is_long_break: false,
        });
        assert_eq!(notification.summary, "Pomodoro Complete!");
        assert_eq!(notification.body, "Time for a short break. 1 pomodoro done.");
    }

    #[test]
    fn test_build_long_break_notification() {
        let notification = build(CompletionEvent::PomodoroComplete {
            count: 4,
            is_long_break: true,
        });
        assert_eq!(notification.body, "Time for a long break. 4 pomodoros done.");
    }

    #[test]
    fn test_build_break_notification() {
        let notification = build(CompletionEvent::BreakComplete);
        assert_eq!(notification.summary, "Break Complete!");
        assert_eq!(notification.body, "Time to focus");
        assert_eq!(notification.timeout, Timeout::Milliseconds(EXPIRE_MS));
    }

    #[test]
    #[ignore = "Requires system notification interaction"]
    fn test_pomodoro_notification() {
        notify(CompletionEvent::PomodoroComplete {
            count: 2,
            is_long_break: false,
        });
    }

    #[test]
    #[ignore = "Requires system notification interaction"]
    fn test_break_notification() {
        notify(CompletionEvent::BreakComplete);
    }
}
