// Pending queue and demand tracker.
//
// Purpose
// - Buffer decoded ranges until the consumer has capacity for them.
//
// Responsibilities
// - Append at the tail, remove from the head. Never reorder.
// - Spend exactly one unit of demand per range handed out.
// - No bound on the queue: a slow consumer grows it, nothing is dropped.

use crate::modules::event_notifications::core::event_range::EventRange;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct PendingQueue {
    ranges: VecDeque<EventRange>,
    demand: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, range: EventRange) {
        self.ranges.push_back(range);
    }

    pub fn add_demand(&mut self, n: u64) {
        self.demand = self.demand.saturating_add(n);
    }

    /// Hands out as many ranges as demand allows, oldest first.
    pub fn drain(&mut self) -> Vec<EventRange> {
        let count = self.ranges.len().min(usize::try_from(self.demand).unwrap_or(usize::MAX));
        self.demand -= count as u64;
        self.ranges.drain(..count).collect()
    }

    pub fn demand(&self) -> u64 {
        self.demand
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
