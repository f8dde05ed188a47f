use std::collections::HashMap;

use crate::domain::utils::id::NodeId;

/// Returns `true` when the first cost must leave the queue before the second.
pub type CostComparator = fn(f64, f64) -> bool;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub node_id: NodeId,
    pub cost: f64,

    /// Push order, breaks ties between equal costs in favour of the earlier item.
    sequence: u64,
}

/// Array backed binary heap over `(node, cost)` with an index by node id.
///
/// The index allows the cost of a queued node to be changed in place (decrease-key),
/// which the path calculations need during relaxation. The ordering is injected so the
/// same queue serves minimizing and maximizing searches.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue {
    heap: Vec<QueueItem>,
    index: HashMap<NodeId, usize>,
    comparator: CostComparator,
    next_sequence: u64,
}

impl IndexedPriorityQueue {
    pub fn new(comparator: CostComparator) -> Self {
        Self { heap: Vec::new(), index: HashMap::new(), comparator, next_sequence: 0 }
    }

    /// Lowest cost first.
    pub fn min() -> Self {
        Self::new(|a, b| a < b)
    }

    /// Highest cost first.
    pub fn max() -> Self {
        Self::new(|a, b| a > b)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.index.contains_key(node_id)
    }

    /// Heap position of a queued node.
    pub fn get_index(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    pub fn get_cost(&self, node_id: &NodeId) -> Option<f64> {
        self.get_index(node_id).map(|position| self.heap[position].cost)
    }

    pub fn peek(&self) -> Option<&QueueItem> {
        self.heap.first()
    }

    /// Queues a node. A node that is already queued gets its cost updated instead.
    pub fn push(&mut self, node_id: NodeId, cost: f64) {
        if self.contains(&node_id) {
            self.update(&node_id, cost);
            return;
        }

        let position = self.heap.len();
        self.index.insert(node_id.clone(), position);
        self.heap.push(QueueItem { node_id, cost, sequence: self.next_sequence });
        self.next_sequence += 1;
        self.sift_up(position);
    }

    pub fn pop(&mut self) -> Option<QueueItem> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let item = self.heap.pop()?;
        self.index.remove(&item.node_id);

        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Changes the cost of a queued node and restores the heap order.
    ///
    /// Returns `false` when the node is not queued.
    pub fn update(&mut self, node_id: &NodeId, cost: f64) -> bool {
        let Some(position) = self.get_index(node_id) else {
            return false;
        };

        self.heap[position].cost = cost;
        let position = self.sift_up(position);
        self.sift_down(position);
        true
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        let (first, second) = (&self.heap[a], &self.heap[b]);

        if (self.comparator)(first.cost, second.cost) {
            return true;
        }
        if (self.comparator)(second.cost, first.cost) {
            return false;
        }
        first.sequence < second.sequence
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.index.insert(self.heap[a].node_id.clone(), a);
        self.index.insert(self.heap[b].node_id.clone(), b);
    }

    fn sift_up(&mut self, mut position: usize) -> usize {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.precedes(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
        position
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();

        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut first = position;

            if left < len && self.precedes(left, first) {
                first = left;
            }
            if right < len && self.precedes(right, first) {
                first = right;
            }
            if first == position {
                break;
            }

            self.swap(position, first);
            position = first;
        }
    }
}
