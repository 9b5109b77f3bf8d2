//! User-facing notifications raised by coordinators.

use std::collections::VecDeque;

use serde::Serialize;

/// Oldest notifications are dropped beyond this many.
const MAX_QUEUED: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        if self.queue.len() == MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            id: self.next_id,
            level,
            message: message.into(),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.queue.retain(|n| n.id != id);
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_dismiss_drain() {
        let mut n = Notifications::default();
        let a = n.push(NotificationLevel::Error, "a");
        n.push(NotificationLevel::Info, "b");
        n.dismiss(a);
        let drained = n.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "b");
        assert!(n.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut n = Notifications::default();
        for i in 0..(MAX_QUEUED + 5) {
            n.push(NotificationLevel::Info, i.to_string());
        }
        assert_eq!(n.len(), MAX_QUEUED);
        assert_eq!(n.iter().next().map(|x| x.message.as_str()), Some("5"));
    }
}
