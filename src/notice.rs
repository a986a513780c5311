use crate::config::NoticeConfig;
use serde::Serialize;
use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

pub type NoticeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticePhase {
    Visible,
    FadingOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: NoticeId,
    pub text: String,
    pub phase: NoticePhase,
}

/// Transient confirmation notices.
///
/// Each notice is visible for `visible_ms`, fades for `fade_ms`, then is
/// removed. Timers need a tokio runtime; without one the notice stays until
/// [`NoticeBoard::dismiss`] is called.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
    next_id: Arc<AtomicU64>,
    visible_for: Duration,
    fade_for: Duration,
}

impl NoticeBoard {
    pub fn new(config: &NoticeConfig) -> Self {
        Self {
            notices: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            visible_for: Duration::from_millis(config.visible_ms),
            fade_for: Duration::from_millis(config.fade_ms),
        }
    }

    /// Total time between [`NoticeBoard::show`] and removal.
    pub fn lifetime(&self) -> Duration {
        self.visible_for + self.fade_for
    }

    pub fn show(&self, text: impl Into<String>) -> NoticeId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = text.into();
        debug!("Showing notice {}: {}", id, text);

        lock(&self.notices).push(Notice {
            id,
            text,
            phase: NoticePhase::Visible,
        });

        match Handle::try_current() {
            Ok(handle) => {
                let notices = Arc::clone(&self.notices);
                let (visible_for, fade_for) = (self.visible_for, self.fade_for);
                handle.spawn(async move {
                    tokio::time::sleep(visible_for).await;
                    if let Some(notice) = lock(&notices).iter_mut().find(|n| n.id == id) {
                        notice.phase = NoticePhase::FadingOut;
                    }
                    tokio::time::sleep(fade_for).await;
                    lock(&notices).retain(|n| n.id != id);
                    debug!("Notice {} dismissed", id);
                });
            }
            Err(_) => warn!("No async runtime, notice {} will not auto-dismiss", id),
        }

        id
    }

    pub fn dismiss(&self, id: NoticeId) -> bool {
        let mut notices = lock(&self.notices);
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    pub fn active(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.notices).is_empty()
    }
}

// Every critical section leaves the list consistent, so poisoning is ignored.
fn lock(notices: &Mutex<Vec<Notice>>) -> MutexGuard<'_, Vec<Notice>> {
    notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board() -> NoticeBoard {
        NoticeBoard::new(&NoticeConfig::default())
    }

    #[test]
    fn test_show_without_runtime_keeps_notice() {
        let board = board();
        let id = board.show("Prenotazione inviata");
        assert_eq!(board.active().len(), 1);
        assert_eq!(board.active()[0].phase, NoticePhase::Visible);

        assert!(board.dismiss(id));
        assert!(board.is_empty());
        assert!(!board.dismiss(id));
    }

    #[test]
    fn test_lifetime() {
        assert_eq!(board().lifetime(), Duration::from_millis(4400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_fades_then_disappears() {
        let board = board();
        board.show("Prenotazione inviata");
        tokio::task::yield_now().await;

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert_eq!(board.active()[0].phase, NoticePhase::Visible);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(board.active()[0].phase, NoticePhase::FadingOut);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(board.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_expire_independently() {
        let board = board();
        let first = board.show("uno");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        let second = board.show("due");

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let ids: Vec<_> = board.active().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second]);
        assert_ne!(first, second);
    }
}
