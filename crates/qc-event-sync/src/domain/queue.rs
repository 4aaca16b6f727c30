//! Durable priority queue keyed by `(priority ASC, createdAt ASC)`.

use super::errors::EventSyncError;
use super::event::Event;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct QueueEntry(Event);

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority && self.0.created_at == other.0.created_at
    }
}
impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse priority and creation order so
        // the lowest priority value (highest urgency) and earliest arrival
        // pop first.
        other
            .0
            .priority
            .cmp(&self.0.priority)
            .then_with(|| other.0.created_at.cmp(&self.0.created_at))
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded priority queue; back-pressure trips when `len() >= high_water_mark`.
pub struct EventQueue {
    heap: BinaryHeap<QueueEntry>,
    high_water_mark: usize,
}

impl EventQueue {
    #[must_use]
    pub fn new(high_water_mark: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            high_water_mark,
        }
    }

    pub fn push(&mut self, event: Event) -> Result<(), EventSyncError> {
        if self.heap.len() >= self.high_water_mark {
            return Err(EventSyncError::QueueOverflow);
        }
        self.heap.push(QueueEntry(event));
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|e| e.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::event::EventType;
    use super::*;

    fn ev(priority: u8, created_at: u64) -> Event {
        let mut e = Event::originate(format!("{priority}-{created_at}"), EventType::Heartbeat, vec![], "n1", created_at);
        e.priority = priority;
        e
    }

    #[test]
    fn pops_lowest_priority_value_first() {
        let mut q = EventQueue::new(10);
        q.push(ev(3, 1)).unwrap();
        q.push(ev(1, 2)).unwrap();
        q.push(ev(2, 3)).unwrap();
        assert_eq!(q.pop().unwrap().priority, 1);
        assert_eq!(q.pop().unwrap().priority, 2);
        assert_eq!(q.pop().unwrap().priority, 3);
    }

    #[test]
    fn ties_broken_by_creation_order() {
        let mut q = EventQueue::new(10);
        q.push(ev(2, 5)).unwrap();
        q.push(ev(2, 1)).unwrap();
        assert_eq!(q.pop().unwrap().created_at, 1);
        assert_eq!(q.pop().unwrap().created_at, 5);
    }

    #[test]
    fn rejects_push_past_high_water_mark() {
        let mut q = EventQueue::new(1);
        q.push(ev(1, 1)).unwrap();
        let err = q.push(ev(1, 2)).unwrap_err();
        assert!(matches!(err, EventSyncError::QueueOverflow));
    }
}
