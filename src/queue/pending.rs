use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::DispatchOrder;

use super::job::JobId;

/// Pending jobs in the order they will be served.
///
/// Both shapes share one interface; the queue picks a shape at
/// construction from [`DispatchOrder`] and never changes it.
pub(crate) enum PendingStore {
    Fifo(FifoStore),
    Priority(PriorityStore),
}

impl PendingStore {
    pub(crate) fn new(order: DispatchOrder, compact_fill: f64) -> Self {
        match order {
            DispatchOrder::Admission => PendingStore::Fifo(FifoStore::new(compact_fill)),
            DispatchOrder::Priority => PendingStore::Priority(PriorityStore::new()),
        }
    }

    pub(crate) fn push(&mut self, id: JobId, priority: i32) {
        match self {
            PendingStore::Fifo(store) => store.push(id),
            PendingStore::Priority(store) => store.push(id, priority),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<JobId> {
        match self {
            PendingStore::Fifo(store) => store.pop(),
            PendingStore::Priority(store) => store.pop(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            PendingStore::Fifo(store) => store.len(),
            PendingStore::Priority(store) => store.len(),
        }
    }
}

/// Admission-ordered slab. Consumed entries leave dead slots behind the
/// head cursor; storage is reclaimed once live entries fall below the
/// configured fill ratio.
pub(crate) struct FifoStore {
    slots: Vec<Option<JobId>>,
    head: usize,
    live: usize,
    compact_fill: f64,
}

impl FifoStore {
    fn new(compact_fill: f64) -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            live: 0,
            compact_fill,
        }
    }

    fn push(&mut self, id: JobId) {
        self.slots.push(Some(id));
        self.live += 1;
    }

    fn pop(&mut self) -> Option<JobId> {
        if self.live == 0 {
            return None;
        }
        // Slots at or past the head are always occupied.
        let id = self.slots[self.head].take();
        self.head += 1;
        self.live -= 1;
        self.maybe_compact();
        id
    }

    fn len(&self) -> usize {
        self.live
    }

    /// Drop the dead prefix once the live share of the slab dips below
    /// the fill ratio. Relative order of the survivors is untouched.
    fn maybe_compact(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        if (self.live as f64) / (self.slots.len() as f64) < self.compact_fill {
            self.slots.drain(..self.head);
            self.head = 0;
        }
    }
}

/// Max-heap on priority; equal priorities serve the earlier admission.
pub(crate) struct PriorityStore {
    heap: BinaryHeap<PendingEntry>,
    admitted: u64,
}

impl PriorityStore {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            admitted: 0,
        }
    }

    fn push(&mut self, id: JobId, priority: i32) {
        // Re-admitted jobs take a fresh sequence number, so an expired
        // job queues behind its peers rather than reclaiming its slot.
        let seq = self.admitted;
        self.admitted += 1;
        self.heap.push(PendingEntry { priority, seq, id });
    }

    fn pop(&mut self) -> Option<JobId> {
        self.heap.pop().map(|entry| entry.id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

struct PendingEntry {
    priority: i32,
    seq: u64,
    id: JobId,
}

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingEntry {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<JobId> {
        (0..n).map(|_| JobId::new()).collect()
    }

    #[test]
    fn test_fifo_serves_admission_order() {
        let mut store = FifoStore::new(0.5);
        let ids = ids(3);
        for id in &ids {
            store.push(*id);
        }
        assert_eq!(store.pop(), Some(ids[0]));
        assert_eq!(store.pop(), Some(ids[1]));
        assert_eq!(store.pop(), Some(ids[2]));
        assert_eq!(store.pop(), None);
    }

    #[test]
    fn test_fifo_pop_empty_returns_none() {
        let mut store = FifoStore::new(0.5);
        assert_eq!(store.pop(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_fifo_compacts_dead_prefix() {
        let mut store = FifoStore::new(0.5);
        for id in ids(4) {
            store.push(id);
        }

        // 3/4 then 2/4 live: neither is below the 0.5 fill ratio.
        store.pop();
        store.pop();
        assert_eq!(store.slots.len(), 4);
        assert_eq!(store.head, 2);

        // 1/4 live crosses the ratio and the dead prefix is dropped.
        store.pop();
        assert_eq!(store.slots.len(), 1);
        assert_eq!(store.head, 0);
        assert_eq!(store.len(), 1);

        store.pop();
        assert!(store.slots.is_empty());
    }

    #[test]
    fn test_fifo_zero_fill_never_compacts() {
        let mut store = FifoStore::new(0.0);
        let ids = ids(3);
        for id in &ids {
            store.push(*id);
        }
        for id in &ids {
            assert_eq!(store.pop(), Some(*id));
        }
        assert_eq!(store.slots.len(), 3);
        assert_eq!(store.head, 3);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_fifo_order_survives_compaction() {
        // A high fill ratio forces a compaction on nearly every pop.
        let mut store = FifoStore::new(0.9);
        let ids = ids(8);
        for id in &ids[..5] {
            store.push(*id);
        }
        let mut served = vec![store.pop().unwrap(), store.pop().unwrap()];
        for id in &ids[5..] {
            store.push(*id);
        }
        while let Some(id) = store.pop() {
            served.push(id);
        }
        assert_eq!(served, ids);
    }

    #[test]
    fn test_priority_serves_highest_first() {
        let mut store = PriorityStore::new();
        let ids = ids(4);
        store.push(ids[0], 1);
        store.push(ids[1], 5);
        store.push(ids[2], 3);
        store.push(ids[3], -2);
        assert_eq!(store.pop(), Some(ids[1]));
        assert_eq!(store.pop(), Some(ids[2]));
        assert_eq!(store.pop(), Some(ids[0]));
        assert_eq!(store.pop(), Some(ids[3]));
        assert_eq!(store.pop(), None);
    }

    #[test]
    fn test_priority_ties_serve_earlier_admission() {
        let mut store = PriorityStore::new();
        let ids = ids(3);
        for id in &ids {
            store.push(*id, 7);
        }
        assert_eq!(store.pop(), Some(ids[0]));
        assert_eq!(store.pop(), Some(ids[1]));
        assert_eq!(store.pop(), Some(ids[2]));
    }

    #[test]
    fn test_priority_readmission_queues_behind_peers() {
        let mut store = PriorityStore::new();
        let ids = ids(3);
        for id in &ids {
            store.push(*id, 1);
        }
        let first = store.pop().unwrap();
        assert_eq!(first, ids[0]);
        store.push(first, 1);
        assert_eq!(store.pop(), Some(ids[1]));
        assert_eq!(store.pop(), Some(ids[2]));
        assert_eq!(store.pop(), Some(first));
    }

    #[test]
    fn test_store_shape_follows_order() {
        let ids = ids(2);

        let mut fifo = PendingStore::new(DispatchOrder::Admission, 0.5);
        fifo.push(ids[0], 0);
        fifo.push(ids[1], 9);
        assert_eq!(fifo.pop(), Some(ids[0]));

        let mut prio = PendingStore::new(DispatchOrder::Priority, 0.5);
        prio.push(ids[0], 0);
        prio.push(ids[1], 9);
        assert_eq!(prio.pop(), Some(ids[1]));
        assert_eq!(prio.len(), 1);
    }
}
