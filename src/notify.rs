//! In-process notification queue backing the admin panel toasts.
//!
//! One ordered queue of timed messages instead of per-page ad-hoc toasts.
//! Messages expire after a fixed TTL and are pruned on read; live consumers
//! can also subscribe to a broadcast channel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::broadcast;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: Level,
    pub message: String,
    #[serde(skip)]
    expires_at: Instant,
}

pub struct NotificationQueue {
    ttl: Duration,
    capacity: usize,
    next_id: AtomicU64,
    inner: Mutex<VecDeque<Notice>>,
    tx: broadcast::Sender<Notice>,
}

impl NotificationQueue {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        NotificationQueue {
            ttl,
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            inner: Mutex::new(VecDeque::new()),
            tx,
        }
    }

    pub fn success(&self, message: impl Into<String>) -> Notice {
        self.publish(Level::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notice {
        self.publish(Level::Error, message)
    }

    /// Appends a message and fans it out to subscribers. When the queue is
    /// full the oldest entry is dropped first.
    pub fn publish(&self, level: Level, message: impl Into<String>) -> Notice {
        let notice = Notice {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            level,
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        };

        let mut queue = self.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notice.clone());
        drop(queue);

        // no receivers is fine
        let _ = self.tx.send(notice.clone());
        notice
    }

    /// Current non-expired messages in publish order. Expired entries are
    /// removed as a side effect.
    pub fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut queue = self.lock();
        queue.retain(|n| n.expires_at > now);
        queue.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        NotificationQueue::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_order_is_preserved() {
        let queue = NotificationQueue::default();
        queue.success("saved car");
        queue.error("upload failed");
        queue.success("saved blog");

        let active = queue.active();
        let messages: Vec<&str> = active.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["saved car", "upload failed", "saved blog"]);
        assert!(active.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn expired_messages_are_pruned() {
        let queue = NotificationQueue::new(Duration::from_millis(0), 8);
        queue.success("gone immediately");
        std::thread::sleep(Duration::from_millis(5));
        assert!(queue.active().is_empty());
    }

    #[test]
    fn capacity_drops_oldest_first() {
        let queue = NotificationQueue::new(Duration::from_secs(60), 2);
        queue.success("first");
        queue.success("second");
        queue.success("third");

        let messages: Vec<String> = queue.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, ["second", "third"]);
    }

    #[tokio::test]
    async fn subscribers_receive_published_notices() {
        let queue = NotificationQueue::default();
        let mut rx = queue.subscribe();
        queue.error("boom");

        let got = rx.recv().await.unwrap();
        assert_eq!(got.level, Level::Error);
        assert_eq!(got.message, "boom");
    }
}
