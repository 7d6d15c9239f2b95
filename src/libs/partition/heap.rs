use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An edge weight with a total order, so it can live in a heap.
#[derive(Debug, Clone, Copy)]
pub struct Weight(pub f64);

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Keeps the `capacity` greatest items pushed into it.
///
/// Once full, an item is admitted only if it is strictly greater than the
/// current minimum, which is then evicted.
#[derive(Debug, Clone)]
pub struct BoundedHeap<T: Ord> {
    capacity: usize,
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> BoundedHeap<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn min(&self) -> Option<&T> {
        self.heap.peek().map(|Reverse(item)| item)
    }

    /// Returns whether the item was kept.
    pub fn push(&mut self, item: T) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(min)) if item > *min => {
                self.heap.pop();
                self.heap.push(Reverse(item));
                true
            }
            _ => false,
        }
    }

    /// Drain into a vector, greatest first.
    pub fn into_sorted_desc(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(item)| item)
            .collect()
    }
}

impl BoundedHeap<Weight> {
    pub fn sum(&self) -> f64 {
        self.heap.iter().map(|Reverse(w)| w.0).sum()
    }
}

/// Sum of the `k` largest weights.
///
/// ```
/// use hmr::libs::partition::heap::top_k_sum;
/// assert_eq!(top_k_sum([5.0, 1.0, 3.0, 4.0], 2), 9.0);
/// assert_eq!(top_k_sum([5.0, 1.0], 10), 6.0);
/// assert_eq!(top_k_sum([5.0, 1.0], 0), 0.0);
/// ```
pub fn top_k_sum<I: IntoIterator<Item = f64>>(weights: I, k: usize) -> f64 {
    let mut heap = BoundedHeap::new(k);
    for w in weights {
        heap.push(Weight(w));
    }
    heap.sum()
}
