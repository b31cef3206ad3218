//! Single-slot toast notifications.
//!
//! [`NotificationCenter`] holds at most one notification. Showing a new one
//! evicts the current one. A notification stays visible for
//! [`AUTO_DISMISS_AFTER`] unless closed earlier, then plays a leave phase of
//! [`LEAVE_DURATION`] before it is removed.
//!
//! The center never reads the clock itself: every transition takes the
//! current instant, and [`NotificationCenter::next_deadline`] tells the owner
//! when to call [`NotificationCenter::tick`] again.

use std::time::{Duration, Instant};

use quarkfm_bridge::notification::{NotificationKind, NotificationMessage};

pub const AUTO_DISMISS_AFTER: Duration = Duration::from_millis(5000);
pub const LEAVE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Leaving { since: Instant },
}

#[derive(Debug, Clone)]
pub struct ActiveNotification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
    phase: Phase,
}

impl ActiveNotification {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, Phase::Leaving { .. })
    }

    fn deadline(&self) -> Instant {
        match self.phase {
            Phase::Visible => self.shown_at + AUTO_DISMISS_AFTER,
            Phase::Leaving { since } => since + LEAVE_DURATION,
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: Option<ActiveNotification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ActiveNotification> {
        self.current.as_ref()
    }

    /// Replaces whatever is shown with `notification`.
    pub fn show(&mut self, notification: NotificationMessage, now: Instant) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        if let Some(previous) = self.current.take() {
            log::trace!("Evicting notification {:?}", previous.id);
        }
        self.current = Some(ActiveNotification {
            id,
            kind: notification.kind,
            message: notification.message,
            shown_at: now,
            phase: Phase::Visible,
        });
        id
    }

    /// Starts the leave phase of notification `id` (the close control).
    /// Returns `false` if `id` is no longer shown or is already leaving.
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) -> bool {
        match self.current.as_mut() {
            Some(current) if current.id == id && !current.is_leaving() => {
                current.phase = Phase::Leaving { since: now };
                true
            }
            _ => false,
        }
    }

    /// Applies every transition that is due at `now`. Returns whether the
    /// visible state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(current) = self.current.as_mut() {
            let deadline = current.deadline();
            if now < deadline {
                break;
            }
            match current.phase {
                Phase::Visible => current.phase = Phase::Leaving { since: deadline },
                Phase::Leaving { .. } => self.current = None,
            }
            changed = true;
        }
        changed
    }

    /// When the next transition is due, if anything is shown.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(ActiveNotification::deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn new_notification_evicts_the_current_one() {
        let start = Instant::now();
        let mut center = NotificationCenter::new();

        let first = center.show(NotificationMessage::info("first"), start);
        let second = center.show(NotificationMessage::error("second"), start + ms(10));

        assert_ne!(first, second);
        let current = center.current().unwrap();
        assert_eq!(current.id, second);
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.message, "second");
    }

    #[test]
    fn untouched_notification_is_gone_between_5000_and_5300_ms() {
        let start = Instant::now();
        let mut center = NotificationCenter::new();
        center.show(NotificationMessage::success("saved"), start);

        assert!(!center.tick(start + ms(4999)));
        assert_eq!(center.current().unwrap().phase(), Phase::Visible);

        assert!(center.tick(start + ms(5000)));
        assert!(center.current().unwrap().is_leaving());

        center.tick(start + ms(5299));
        assert!(center.current().is_some());

        center.tick(start + ms(5300));
        assert!(center.current().is_none());
        assert_eq!(center.next_deadline(), None);
    }

    #[test]
    fn late_tick_removes_in_one_step() {
        let start = Instant::now();
        let mut center = NotificationCenter::new();
        center.show(NotificationMessage::info("hello"), start);

        assert!(center.tick(start + ms(60_000)));
        assert!(center.current().is_none());
    }

    #[test]
    fn close_control_starts_the_leave_phase() {
        let start = Instant::now();
        let mut center = NotificationCenter::new();
        let id = center.show(NotificationMessage::info("hello"), start);

        assert!(center.dismiss(id, start + ms(1000)));
        assert!(!center.dismiss(id, start + ms(1100)));
        assert_eq!(center.next_deadline(), Some(start + ms(1300)));

        center.tick(start + ms(1299));
        assert!(center.current().is_some());
        center.tick(start + ms(1300));
        assert!(center.current().is_none());
    }

    #[test]
    fn stale_handles_do_not_touch_a_newer_notification() {
        let start = Instant::now();
        let mut center = NotificationCenter::new();
        let old = center.show(NotificationMessage::info("old"), start);
        let new = center.show(NotificationMessage::info("new"), start + ms(4000));

        assert!(!center.dismiss(old, start + ms(4100)));

        // The old notification's deadline passes without affecting the new one.
        center.tick(start + ms(5300));
        let current = center.current().unwrap();
        assert_eq!(current.id, new);
        assert_eq!(current.phase(), Phase::Visible);
        assert_eq!(center.next_deadline(), Some(start + ms(9000)));
    }
}
