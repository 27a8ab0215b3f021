//! Notification channel - a single transient advisory message
//!
//! At most one [`Notification`] is live. Posting replaces whatever is showing
//! and re-arms the dismissal timer; the previous timer is always torn down
//! before a new one is armed, so there is never more than one outstanding.
//! Renderers observe the slot through [`NotificationChannel::subscribe`].

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long a notification stays up unless configured otherwise
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a notification, drives its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// A posted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic per channel, lets a stale timer recognise it lost the slot
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Capability to report something to the user
///
/// Form controllers get this instead of the whole channel.
pub trait Notify {
    fn notify(&mut self, message: String, severity: Severity);
}

/// Pending auto-dismiss; aborting on drop covers every exit path
struct DismissTimer {
    handle: JoinHandle<()>,
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Single-slot notification owner
///
/// Timers are tokio tasks, so posting with a non-zero duration must happen
/// inside a runtime.
pub struct NotificationChannel {
    slot: Arc<watch::Sender<Option<Notification>>>,
    timer: Option<DismissTimer>,
    next_id: u64,
    default_duration: Duration,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION)
    }

    /// Channel whose [`post`](Self::post) uses `default_duration`
    pub fn with_duration(default_duration: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            timer: None,
            next_id: 0,
            default_duration,
        }
    }

    /// Post with the channel's default duration
    pub fn post(&mut self, message: impl Into<String>, severity: Severity) {
        self.post_for(message, severity, self.default_duration);
    }

    /// Post with an explicit duration; zero means sticky until [`dismiss`](Self::dismiss)
    pub fn post_for(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        // Tear down before arming
        self.timer = None;

        self.next_id += 1;
        let id = self.next_id;
        let notification = Notification {
            id,
            message: message.into(),
            severity,
        };
        tracing::debug!(
            "Notification #{} [{}]: {}",
            id,
            severity.as_str(),
            notification.message
        );
        self.slot.send_replace(Some(notification));

        if duration.is_zero() {
            return;
        }

        let slot = Arc::clone(&self.slot);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            slot.send_if_modified(|live| {
                if live.as_ref().is_some_and(|n| n.id == id) {
                    *live = None;
                    true
                } else {
                    false
                }
            });
        });
        self.timer = Some(DismissTimer { handle });
    }

    /// Clear the live notification and cancel its timer; no-op when empty
    pub fn dismiss(&mut self) {
        self.timer = None;
        self.slot.send_if_modified(|live| live.take().is_some());
    }

    /// Snapshot of the live notification
    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    /// Watch the slot; changes include timer-driven dismissal
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }

    /// Number of dismissal timers still waiting to fire (0 or 1)
    pub fn pending_timers(&self) -> usize {
        self.timer
            .as_ref()
            .filter(|t| !t.handle.is_finished())
            .map_or(0, |_| 1)
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Notify for NotificationChannel {
    fn notify(&mut self, message: String, severity: Severity) {
        self.post(message, severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_auto_dismisses_after_duration() {
        let mut channel = NotificationChannel::new();
        channel.post("Tersimpan", Severity::Success);
        assert_eq!(channel.pending_timers(), 1);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(channel.current().unwrap().message, "Tersimpan");

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(channel.current(), None);
        assert_eq!(channel.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_posts_leave_one_live_and_one_timer() {
        let mut channel = NotificationChannel::new();
        for i in 0..5 {
            channel.post(format!("pesan {}", i), Severity::Info);
        }

        let live = channel.current().unwrap();
        assert_eq!(live.message, "pesan 4");
        assert_eq!(live.id, 5);
        assert_eq!(channel.pending_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_cancels_previous_timer() {
        let mut channel = NotificationChannel::new();
        channel.post("first", Severity::Info);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        channel.post("second", Severity::Warning);

        // Past the first notification's deadline, before the second's
        tokio::time::sleep(Duration::from_millis(1500)).await;
        settle().await;
        let live = channel.current().unwrap();
        assert_eq!(live.message, "second");
        assert_eq!(live.severity, Severity::Warning);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        settle().await;
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_is_sticky() {
        let mut channel = NotificationChannel::new();
        channel.post_for("sticky", Severity::Error, Duration::ZERO);
        assert_eq!(channel.pending_timers(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(channel.current().unwrap().message, "sticky");

        channel.dismiss();
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer_and_is_idempotent() {
        let mut channel = NotificationChannel::new();
        let mut rx = channel.subscribe();

        channel.post("bye", Severity::Info);
        channel.dismiss();
        assert_eq!(channel.current(), None);
        assert_eq!(channel.pending_timers(), 0);
        channel.dismiss();

        // Subscribers see the final empty slot
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_channel_cancels_timer() {
        let channel_rx = {
            let mut channel = NotificationChannel::new();
            channel.post("gone", Severity::Info);
            channel.subscribe()
        };

        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        // Sender is gone and the timer never touched the slot
        assert!(channel_rx.has_changed().is_err());
        assert_eq!(channel_rx.borrow().as_ref().unwrap().message, "gone");
    }
}
