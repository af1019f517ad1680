use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A mutex-protected FIFO queue shared between the foreground loop and the
/// chunk update worker.
///
/// Every access takes the internal lock for the duration of a single queue
/// operation, so the critical section around insert/dequeue/contains is
/// enforced by the type rather than by caller convention. Cloning the queue
/// clones the handle, not the contents; all clones observe the same entries.
///
/// The deduplicating insert methods ([`LockedQueue::enqueue`] and
/// [`LockedQueue::enqueue_front`]) are a linear scan, which is fine at the
/// queue lengths the scheduler produces (bounded by the active chunk window).
///
/// # Examples
/// ```
/// use voxel_world::core::LockedQueue;
///
/// let queue = LockedQueue::new();
/// assert!(queue.enqueue(7));
/// assert!(!queue.enqueue(7)); // already queued
/// assert_eq!(queue.pop_front(), Some(7));
/// assert!(queue.is_empty());
/// ```
pub struct LockedQueue<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> LockedQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Appends an item without checking for duplicates.
    pub fn push_back(&self, item: T) {
        self.inner.lock().unwrap().push_back(item);
    }

    /// Removes and returns the item at the front of the queue.
    ///
    /// # Returns
    /// The front item, or `None` if the queue is empty.
    pub fn pop_front(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Removes and returns the first item (in queue order) that satisfies
    /// `predicate`, leaving the rest in place.
    ///
    /// Used for the rebuild queue: the scheduler skips over chunks that are
    /// not yet editable and services the first one that is.
    pub fn pop_front_where(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let mut queue = self.inner.lock().unwrap();
        let index = queue.iter().position(|item| predicate(item))?;
        queue.remove(index)
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Removes all queued items.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}

impl<T: PartialEq> LockedQueue<T> {
    /// Appends an item unless an equal item is already queued.
    ///
    /// # Returns
    /// `true` if the item was inserted, `false` if it was already present.
    pub fn enqueue(&self, item: T) -> bool {
        let mut queue = self.inner.lock().unwrap();
        if queue.contains(&item) {
            return false;
        }
        queue.push_back(item);
        true
    }

    /// Inserts an item at the front unless an equal item is already queued.
    ///
    /// Boundary edits use this to prioritize the neighboring chunk's rebuild.
    ///
    /// # Returns
    /// `true` if the item was inserted, `false` if it was already present.
    pub fn enqueue_front(&self, item: T) -> bool {
        let mut queue = self.inner.lock().unwrap();
        if queue.contains(&item) {
            return false;
        }
        queue.push_front(item);
        true
    }

    /// Returns `true` if an equal item is currently queued.
    pub fn contains(&self, item: &T) -> bool {
        self.inner.lock().unwrap().contains(item)
    }
}

impl<T> Default for LockedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for LockedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_deduplicates() {
        let queue = LockedQueue::new();
        assert!(queue.enqueue(1));
        assert!(queue.enqueue(2));
        assert!(!queue.enqueue(1), "duplicate enqueue should be rejected");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn enqueue_front_takes_priority() {
        let queue = LockedQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue_front(3);
        assert_eq!(queue.pop_front(), Some(3));
        assert_eq!(queue.pop_front(), Some(1));
        assert_eq!(queue.pop_front(), Some(2));
    }

    #[test]
    fn pop_front_where_skips_non_matching() {
        let queue = LockedQueue::new();
        queue.enqueue(10);
        queue.enqueue(11);
        queue.enqueue(12);
        assert_eq!(queue.pop_front_where(|v| v % 2 == 1), Some(11));
        // Skipped entries keep their order.
        assert_eq!(queue.pop_front(), Some(10));
        assert_eq!(queue.pop_front(), Some(12));
    }

    #[test]
    fn clones_share_contents() {
        let queue = LockedQueue::new();
        let other = queue.clone();
        queue.enqueue(9);
        assert_eq!(other.pop_front(), Some(9));
        assert!(queue.is_empty());
    }
}
