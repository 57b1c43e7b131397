use std::time::{Duration, Instant};

/// A payload held back until its due instant. Dropping the queue (or calling
/// `cancel_all`) guarantees nothing is delivered afterwards.
#[derive(Debug)]
pub struct Scheduled<T> {
    due: Instant,
    payload: T,
}

impl<T> Scheduled<T> {
    pub fn due(&self) -> Instant {
        self.due
    }
}

#[derive(Debug)]
pub struct ScheduleQueue<T> {
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for ScheduleQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> ScheduleQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) {
        let due = now + delay;
        // Keep due order; equal instants stay in insertion order.
        let pos = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(pos, Scheduled { due, payload });
    }

    /// Remove and return every payload due at `now`, oldest first.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        let ready = self.pending.partition_point(|s| s.due <= now);
        self.pending.drain(..ready).map(|s| s.payload).collect()
    }

    /// Drop all pending payloads, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(Scheduled::due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_delivered_early() {
        let now = Instant::now();
        let mut q = ScheduleQueue::new();
        q.schedule(now, Duration::from_millis(1500), "reply");
        assert!(q.poll(now + Duration::from_millis(1499)).is_empty());
        assert_eq!(q.poll(now + Duration::from_millis(1500)), vec!["reply"]);
        assert!(q.is_empty());
    }

    #[test]
    fn delivers_in_due_order() {
        let now = Instant::now();
        let mut q = ScheduleQueue::new();
        q.schedule(now, Duration::from_secs(2), "late");
        q.schedule(now, Duration::from_secs(1), "early");
        q.schedule(now, Duration::from_secs(1), "early-2");
        assert_eq!(q.next_due(), Some(now + Duration::from_secs(1)));
        assert_eq!(
            q.poll(now + Duration::from_secs(5)),
            vec!["early", "early-2", "late"]
        );
    }

    #[test]
    fn cancelled_payloads_never_arrive() {
        let now = Instant::now();
        let mut q = ScheduleQueue::new();
        q.schedule(now, Duration::from_millis(10), 1);
        q.schedule(now, Duration::from_millis(20), 2);
        assert_eq!(q.cancel_all(), 2);
        assert!(q.poll(now + Duration::from_secs(60)).is_empty());
    }
}
