//! Workflow timing.

use std::time::Duration;

/// Delays used by the workflow.
///
/// The view-switch delays smooth the interactive experience and carry no
/// correctness role; headless sessions set them to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Time a view transition takes to settle.
    pub view_settle: Duration,

    /// Delay between settling on the manage view and focusing its search field.
    pub focus_delay: Duration,

    /// How long a notification stays visible.
    pub notification_ttl: Duration,
}

impl Timing {
    /// Delays for an interactive front end.
    pub fn interactive() -> Self {
        Self {
            view_settle: Duration::from_millis(800),
            focus_delay: Duration::from_millis(500),
            notification_ttl: Duration::from_millis(3000),
        }
    }

    /// No view delays; notifications still expire.
    pub fn headless() -> Self {
        Self {
            view_settle: Duration::ZERO,
            focus_delay: Duration::ZERO,
            ..Self::interactive()
        }
    }

    /// Headless when `BOOKING_HEADLESS` is set to `1` or `true`.
    pub fn from_env() -> Self {
        let headless = std::env::var("BOOKING_HEADLESS")
            .map(|v| matches!(v.trim(), "1" | "true"))
            .unwrap_or(false);
        if headless {
            Self::headless()
        } else {
            Self::interactive()
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::interactive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_delays() {
        let timing = Timing::default();
        assert_eq!(timing.view_settle, Duration::from_millis(800));
        assert_eq!(timing.focus_delay, Duration::from_millis(500));
        assert_eq!(timing.notification_ttl, Duration::from_secs(3));
    }

    #[test]
    fn headless_keeps_notification_ttl() {
        let timing = Timing::headless();
        assert_eq!(timing.view_settle, Duration::ZERO);
        assert_eq!(timing.focus_delay, Duration::ZERO);
        assert_eq!(timing.notification_ttl, Duration::from_secs(3));
    }
}
