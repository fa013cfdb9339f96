//! Timeout timer substrate
//!
//! Timers deliver a `TimerFired` command on the actor's own queue, so a
//! timeout is serialized with admissions and driver events.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::actor::ScanActorCommand;
use crate::state::{ScanClass, TimerTag};

/// Schedules and cancels one timeout per request class
pub trait TimerScheduler {
    /// Arm the timer for `tag.class`, replacing any timer already armed for it
    fn arm(&mut self, tag: TimerTag, delay: Duration);

    /// Cancel the timer for `class`, if armed
    fn disarm(&mut self, class: ScanClass);
}

/// Timer substrate backed by tokio tasks
///
/// Holds only a weak sender to the actor queue so pending timers do not
/// keep the actor alive after every handle is dropped.
pub struct TokioTimerScheduler {
    actor_tx: mpsc::WeakSender<ScanActorCommand>,
    pending: HashMap<ScanClass, JoinHandle<()>>,
}

impl TokioTimerScheduler {
    /// Create a scheduler posting to the given actor queue
    pub fn new(actor_tx: mpsc::WeakSender<ScanActorCommand>) -> Self {
        Self {
            actor_tx,
            pending: HashMap::new(),
        }
    }
}

impl TimerScheduler for TokioTimerScheduler {
    fn arm(&mut self, tag: TimerTag, delay: Duration) {
        if let Some(previous) = self.pending.remove(&tag.class) {
            previous.abort();
        }

        let actor_tx = self.actor_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = actor_tx.upgrade() {
                let _ = tx.send(ScanActorCommand::TimerFired { tag }).await;
            }
        });

        debug!(
            "Armed {} scan timer (epoch {}) for {:?}",
            tag.class, tag.epoch, delay
        );
        self.pending.insert(tag.class, task);
    }

    fn disarm(&mut self, class: ScanClass) {
        if let Some(task) = self.pending.remove(&class) {
            task.abort();
            debug!("Disarmed {} scan timer", class);
        }
    }
}

impl Drop for TokioTimerScheduler {
    fn drop(&mut self) {
        for (_, task) in self.pending.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_armed_timer_posts_command() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = TokioTimerScheduler::new(tx.downgrade());
        let tag = TimerTag {
            class: ScanClass::Single,
            epoch: 7,
        };

        timers.arm(tag, Duration::from_secs(15));
        tokio::time::sleep(Duration::from_secs(16)).await;

        match rx.try_recv() {
            Ok(ScanActorCommand::TimerFired { tag: fired }) => assert_eq!(fired, tag),
            other => panic!("expected TimerFired, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_is_silent() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = TokioTimerScheduler::new(tx.downgrade());

        timers.arm(
            TimerTag {
                class: ScanClass::Background,
                epoch: 1,
            },
            Duration::from_secs(1),
        );
        timers.disarm(ScanClass::Background);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut timers = TokioTimerScheduler::new(tx.downgrade());

        let first = TimerTag {
            class: ScanClass::Single,
            epoch: 1,
        };
        let second = TimerTag {
            class: ScanClass::Single,
            epoch: 2,
        };
        timers.arm(first, Duration::from_secs(1));
        timers.arm(second, Duration::from_secs(1));
        tokio::time::sleep(Duration::from_secs(2)).await;

        match rx.try_recv() {
            Ok(ScanActorCommand::TimerFired { tag }) => assert_eq!(tag, second),
            other => panic!("expected TimerFired, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
