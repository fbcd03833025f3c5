//! Headless notifier: an alert list with auto-dismiss and a confirmation
//! channel for whichever UI renders the prompts.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::traits::{AlertLevel, ConfirmRequest, Confirmation, Notifier};

/// How long an alert stays up unless configured otherwise.
pub const DEFAULT_ALERT_DELAY: Duration = Duration::from_millis(2000);

const CONFIRM_QUEUE: usize = 16;
const HISTORY_LIMIT: usize = 100;

/// One raised alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: u64,
    pub level: AlertLevel,
    pub message: String,
    pub raised_at: Instant,
    pub delay: Duration,
}

impl Alert {
    pub fn expires_at(&self) -> Instant {
        self.raised_at + self.delay
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// A confirmation prompt waiting for the user.
///
/// Dropping it without calling [`answer`](Self::answer) resolves the prompt
/// as [`Confirmation::Negative`].
#[derive(Debug)]
pub struct PendingConfirm {
    pub request: ConfirmRequest,
    respond_to: oneshot::Sender<Confirmation>,
}

impl PendingConfirm {
    pub fn answer(self, confirmation: Confirmation) {
        let _ = self.respond_to.send(confirmation);
    }
}

#[derive(Default)]
struct AlertCenterInner {
    next_id: u64,
    visible: Vec<Alert>,
    history: VecDeque<Alert>,
}

/// In-memory [`Notifier`].
///
/// A view polls [`active`](Self::active) to render alerts and drains the
/// receiver returned by [`new`](Self::new) to render confirmation prompts.
#[derive(Clone)]
pub struct AlertCenter {
    inner: Arc<Mutex<AlertCenterInner>>,
    delay: Duration,
    confirms: mpsc::Sender<PendingConfirm>,
}

impl AlertCenter {
    pub fn new(delay: Duration) -> (Self, mpsc::Receiver<PendingConfirm>) {
        let (confirms, receiver) = mpsc::channel(CONFIRM_QUEUE);
        let center = Self {
            inner: Arc::new(Mutex::new(AlertCenterInner::default())),
            delay,
            confirms,
        };
        (center, receiver)
    }

    /// Alerts still on screen. Expired ones are dropped.
    pub fn active(&self) -> Vec<Alert> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.visible.retain(|alert| !alert.is_expired(now));
        inner.visible.clone()
    }

    /// Close an alert before its delay runs out.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.visible.len();
        inner.visible.retain(|alert| alert.id != id);
        inner.visible.len() != before
    }

    /// The most recent alerts, oldest first, including dismissed ones.
    pub fn history(&self) -> Vec<Alert> {
        self.inner.lock().history.iter().cloned().collect()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Notifier for AlertCenter {
    fn alert(&self, level: AlertLevel, message: &str) {
        match level {
            AlertLevel::Error => tracing::error!(%message, "alert"),
            AlertLevel::Warning => tracing::warn!(%message, "alert"),
            AlertLevel::Info | AlertLevel::Success => tracing::info!(%level, %message, "alert"),
        }

        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.visible.retain(|alert| !alert.is_expired(now));
        inner.next_id += 1;
        let alert = Alert {
            id: inner.next_id,
            level,
            message: message.to_string(),
            raised_at: now,
            delay: self.delay,
        };
        inner.visible.push(alert.clone());
        if inner.history.len() == HISTORY_LIMIT {
            inner.history.pop_front();
        }
        inner.history.push_back(alert);
    }

    async fn confirm(&self, request: ConfirmRequest) -> Confirmation {
        let (respond_to, receiver) = oneshot::channel();
        let pending = PendingConfirm {
            request,
            respond_to,
        };
        if self.confirms.send(pending).await.is_err() {
            tracing::debug!("no confirmation handler attached");
            return Confirmation::Negative;
        }
        receiver.await.unwrap_or_default()
    }
}

impl Default for AlertCenter {
    /// A center nobody answers prompts for: every confirmation is negative.
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_DELAY).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn alerts_expire_after_delay() {
        let (center, _rx) = AlertCenter::new(DEFAULT_ALERT_DELAY);
        center.success("saved");
        assert_eq!(center.active().len(), 1);

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert_eq!(center.active().len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(center.active().is_empty());
        assert_eq!(center.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn raising_an_alert_drops_expired_ones() {
        let (center, _rx) = AlertCenter::new(Duration::from_millis(50));
        for i in 0..10 {
            center.error(&format!("failure {}", i));
            tokio::time::advance(Duration::from_millis(60)).await;
        }

        assert_eq!(center.inner.lock().visible.len(), 1);
        assert_eq!(center.history().len(), 10);
    }

    #[tokio::test]
    async fn dismiss_removes_only_that_alert() {
        let (center, _rx) = AlertCenter::new(DEFAULT_ALERT_DELAY);
        center.info("one");
        center.warning("two");
        let first = center.active()[0].id;

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");
        assert_eq!(active[0].level, AlertLevel::Warning);
    }

    #[tokio::test]
    async fn confirm_resolves_with_the_answer() {
        let (center, mut rx) = AlertCenter::new(DEFAULT_ALERT_DELAY);
        tokio::spawn(async move {
            if let Some(pending) = rx.recv().await {
                assert_eq!(pending.request.title, "Delete Confirm");
                pending.answer(Confirmation::Positive);
            }
        });

        let answer = center
            .confirm(ConfirmRequest::new("Delete Confirm", "sure?"))
            .await;
        assert_eq!(answer, Confirmation::Positive);
    }

    #[tokio::test]
    async fn dropped_prompt_is_negative() {
        let (center, mut rx) = AlertCenter::new(DEFAULT_ALERT_DELAY);
        tokio::spawn(async move {
            let _ = rx.recv().await;
        });

        let answer = center.confirm(ConfirmRequest::new("t", "c")).await;
        assert_eq!(answer, Confirmation::Negative);
    }

    #[tokio::test]
    async fn default_center_declines_everything() {
        let center = AlertCenter::default();
        let answer = center.confirm(ConfirmRequest::new("t", "c")).await;
        assert_eq!(answer, Confirmation::Negative);
    }
}
