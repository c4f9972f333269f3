//! FIFO queue layered on [`Array`].

use super::array::Array;

/// First-in, first-out queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: Array<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self { items: Array::new() }
    }

    /// Adds `item` at the back and returns the new queue length.
    pub fn enqueue(&mut self, item: T) -> usize {
        self.items.push(item)
    }

    /// Removes and returns the front item, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.delete(0)
    }

    /// Returns the front item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.get(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
