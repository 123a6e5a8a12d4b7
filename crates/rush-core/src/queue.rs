//! Consumer queues and orders.
//!
//! A [`ServiceQueue`] only stores consumer ids in line order; position is the
//! index. The owning station reflows consumers (new position and waypoint)
//! after every departure from the front.

use std::collections::VecDeque;

/// Where a consumer is in its visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ServicePhase {
    /// Walking or driving to its queue slot.
    Queued,
    /// At the front slot, about to order.
    AwaitingOrder,
    /// Order placed; `remaining` may already be below `requested`.
    Ordered,
    /// Order complete, waiting for somewhere to go.
    Served,
    /// Left the line for a seat or the exit.
    Routed,
    Removed,
}

/// Units still owed to a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    requested: u32,
    remaining: u32,
}

impl Order {
    pub fn new(count: u32) -> Self {
        assert!(count > 0, "an order must ask for at least one unit");
        Self {
            requested: count,
            remaining: count,
        }
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Record one delivered unit. Returns what is still owed.
    pub fn fill_one(&mut self) -> u32 {
        assert!(self.remaining > 0, "served a unit to a completed order");
        self.remaining -= 1;
        self.remaining
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue is full ({capacity} consumers)")]
pub struct QueueFull {
    pub capacity: usize,
}

/// Bounded FIFO of consumer ids.
#[derive(Debug, Clone)]
pub struct ServiceQueue<K> {
    entries: VecDeque<K>,
    capacity: usize,
}

impl<K: Copy + Eq> ServiceQueue<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append at the tail. Returns the new entry's position.
    pub fn push_back(&mut self, id: K) -> Result<usize, QueueFull> {
        if self.is_full() {
            return Err(QueueFull {
                capacity: self.capacity,
            });
        }
        self.entries.push_back(id);
        Ok(self.entries.len() - 1)
    }

    pub fn front(&self) -> Option<K> {
        self.entries.front().copied()
    }

    pub fn position_of(&self, id: K) -> Option<usize> {
        self.entries.iter().position(|e| *e == id)
    }

    /// Remove the front entry. Callers must [`reflow`](Self::reflow) after.
    pub fn dequeue_front(&mut self) -> Option<K> {
        self.entries.pop_front()
    }

    /// Visit every entry with its current position.
    pub fn reflow(&self, mut assign: impl FnMut(K, usize)) {
        for (position, id) in self.entries.iter().enumerate() {
            assign(*id, position);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_counts_down() {
        let mut order = Order::new(2);
        assert_eq!(order.fill_one(), 1);
        assert_eq!(order.fill_one(), 0);
        assert!(order.is_complete());
        assert_eq!(order.requested(), 2);
    }

    #[test]
    #[should_panic(expected = "completed order")]
    fn overfilling_is_a_bug() {
        let mut order = Order::new(1);
        order.fill_one();
        order.fill_one();
    }

    #[test]
    #[should_panic(expected = "at least one unit")]
    fn empty_order_is_a_bug() {
        let _ = Order::new(0);
    }

    #[test]
    fn queue_appends_at_tail_and_bounds() {
        let mut q = ServiceQueue::new(2);
        assert_eq!(q.push_back('a'), Ok(0));
        assert_eq!(q.push_back('b'), Ok(1));
        assert_eq!(q.push_back('c'), Err(QueueFull { capacity: 2 }));
        assert_eq!(q.front(), Some('a'));
    }

    #[test]
    fn reflow_shifts_positions_by_one() {
        let mut q = ServiceQueue::new(10);
        for id in ['a', 'b', 'c'] {
            q.push_back(id).unwrap();
        }
        assert_eq!(q.dequeue_front(), Some('a'));
        let mut seen = Vec::new();
        q.reflow(|id, pos| seen.push((id, pos)));
        assert_eq!(seen, vec![('b', 0), ('c', 1)]);
        assert_eq!(q.position_of('c'), Some(1));
    }
}
