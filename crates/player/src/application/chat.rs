//! Chat log and reply ordering
//!
//! [`ChatLog`] is the capped, append-only message sequence. [`ReplyQueue`]
//! hands out a ticket per submitted message and releases completed replies
//! strictly in ticket order, so a slow first reply never lands after a fast
//! second one.

use std::collections::{BTreeMap, VecDeque};

use explorers_domain::Message;

/// Capped, append-only message log. The oldest entries are evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLog {
    messages: VecDeque<Message>,
    cap: usize,
    /// Messages ever evicted from the head
    evicted: u64,
}

impl ChatLog {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            messages: VecDeque::with_capacity(cap),
            cap,
            evicted: 0,
        }
    }

    /// Build a log from persisted messages, keeping only the newest `cap`.
    pub fn restore(messages: Vec<Message>, cap: usize) -> Self {
        let mut log = Self::new(cap);
        for message in messages {
            log.push(message);
        }
        log
    }

    /// Append a message, evicting from the head if the cap is exceeded.
    /// Returns the number of evicted messages.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push_back(message);
        let mut evicted = 0;
        while self.messages.len() > self.cap {
            self.messages.pop_front();
            evicted += 1;
        }
        self.evicted += evicted as u64;
        evicted
    }

    /// The last `window` messages in order
    pub fn recent(&self, window: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(window);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Messages paired with their position since the log was created.
    /// Positions do not shift when the head is evicted.
    pub fn positioned(&self) -> impl Iterator<Item = (u64, &Message)> {
        (self.evicted..).zip(self.messages.iter())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

/// Position of a submitted message in the reply order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyTicket(u64);

impl std::fmt::Display for ReplyTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reorders reply completions into submission order
#[derive(Debug)]
pub struct ReplyQueue<T> {
    next_ticket: u64,
    next_to_release: u64,
    parked: BTreeMap<u64, T>,
}

impl<T> ReplyQueue<T> {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            next_to_release: 0,
            parked: BTreeMap::new(),
        }
    }

    /// Reserve the next position
    pub fn issue(&mut self) -> ReplyTicket {
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Record the completion for `ticket` and return every completion that
    /// is now releasable, in submission order. Completions for tickets that
    /// were never issued or were already released are dropped.
    pub fn complete(&mut self, ticket: ReplyTicket, value: T) -> Vec<T> {
        if ticket.0 < self.next_to_release || ticket.0 >= self.next_ticket {
            tracing::warn!(ticket = %ticket, "Ignoring completion for unknown or released ticket");
            return Vec::new();
        }
        if self.parked.insert(ticket.0, value).is_some() {
            tracing::warn!(ticket = %ticket, "Duplicate completion replaced");
        }

        let mut released = Vec::new();
        while let Some(value) = self.parked.remove(&self.next_to_release) {
            released.push(value);
            self.next_to_release += 1;
        }
        released
    }

    /// Number of issued tickets that have not been released yet
    pub fn outstanding(&self) -> usize {
        (self.next_ticket - self.next_to_release) as usize
    }

    /// Completions waiting on an earlier ticket
    pub fn parked(&self) -> usize {
        self.parked.len()
    }
}

impl<T> Default for ReplyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(text: &str) -> Message {
        Message::user(text, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
    }

    fn texts(log: &ChatLog) -> Vec<String> {
        log.iter().map(|m| m.text().to_string()).collect()
    }

    #[test]
    fn push_evicts_oldest_over_cap() {
        let mut log = ChatLog::new(3);
        for text in ["a", "b", "c"] {
            assert_eq!(log.push(msg(text)), 0);
        }
        assert_eq!(log.push(msg("d")), 1);
        assert_eq!(texts(&log), vec!["b", "c", "d"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn restore_keeps_newest_entries_in_order() {
        let persisted: Vec<Message> = (0..7).map(|i| msg(&i.to_string())).collect();
        let log = ChatLog::restore(persisted, 5);
        assert_eq!(texts(&log), vec!["2", "3", "4", "5", "6"]);
    }

    #[test]
    fn recent_returns_tail_window() {
        let log = ChatLog::restore(vec![msg("a"), msg("b"), msg("c")], 50);
        let recent: Vec<_> = log.recent(2).iter().map(|m| m.text().to_string()).collect();
        assert_eq!(recent, vec!["b", "c"]);
        assert_eq!(log.recent(10).len(), 3);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn positions_survive_eviction() {
        let mut log = ChatLog::new(2);
        log.push(msg("a"));
        log.push(msg("b"));
        let before: Vec<_> = log.positioned().map(|(pos, m)| (pos, m.text().to_string())).collect();
        assert_eq!(before, vec![(0, "a".to_string()), (1, "b".to_string())]);

        log.push(msg("c"));
        let after: Vec<_> = log.positioned().map(|(pos, m)| (pos, m.text().to_string())).collect();
        assert_eq!(after, vec![(1, "b".to_string()), (2, "c".to_string())]);
    }

    #[test]
    fn zero_cap_behaves_as_one() {
        let mut log = ChatLog::new(0);
        log.push(msg("a"));
        log.push(msg("b"));
        assert_eq!(texts(&log), vec!["b"]);
    }

    #[test]
    fn in_order_completions_release_immediately() {
        let mut queue = ReplyQueue::new();
        let first = queue.issue();
        let second = queue.issue();

        assert_eq!(queue.complete(first, "one"), vec!["one"]);
        assert_eq!(queue.complete(second, "two"), vec!["two"]);
        assert_eq!(queue.outstanding(), 0);
    }

    #[test]
    fn early_completion_waits_for_earlier_ticket() {
        let mut queue = ReplyQueue::new();
        let first = queue.issue();
        let second = queue.issue();
        let third = queue.issue();

        assert!(queue.complete(third, "three").is_empty());
        assert!(queue.complete(second, "two").is_empty());
        assert_eq!(queue.parked(), 2);

        assert_eq!(queue.complete(first, "one"), vec!["one", "two", "three"]);
        assert_eq!(queue.parked(), 0);
    }

    #[test]
    fn stale_and_unknown_tickets_are_ignored() {
        let mut queue = ReplyQueue::new();
        let first = queue.issue();
        assert_eq!(queue.complete(first, 1), vec![1]);

        assert!(queue.complete(first, 2).is_empty());
        assert!(queue.complete(ReplyTicket(42), 3).is_empty());
        assert_eq!(queue.outstanding(), 0);
    }
}
