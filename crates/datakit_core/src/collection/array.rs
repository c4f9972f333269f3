//! Ordered, index-addressable collection used as the bulk read result type.
//!
//! # Responsibility
//! - Own an ordered sequence of values with explicit length tracking.
//! - Offer lenient (`lookup`/`set`) and strict (`try_lookup`/`try_set`)
//!   index access.
//!
//! # Invariants
//! - `len()` always equals the number of live elements.
//! - Valid indexes are `[0, len)`; nothing reads or writes past the end.
//! - Serializes as a plain JSON array in element order.

use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned by strict index access outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "index {} out of range for collection of length {}",
            self.index, self.len
        )
    }
}

impl Error for IndexOutOfRange {}

/// Growable ordered collection of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Array<T> {
    values: Vec<T>,
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Array<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrowed view over all elements in order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Returns a reference to the element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Appends `value` and returns the new length.
    pub fn push(&mut self, value: T) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// Removes and returns the last element, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        self.values.pop()
    }

    /// Assigns `value` at `index`.
    ///
    /// Out-of-range writes are dropped and reported through a `warn` event;
    /// use [`Array::try_set`] when the caller needs to branch on it.
    pub fn set(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_set(index, value) {
            warn!("event=array_set module=collection status=skip error={err}");
        }
    }

    /// Assigns `value` at `index`, failing when `index >= len`.
    pub fn try_set(&mut self, index: usize, value: T) -> Result<(), IndexOutOfRange> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(IndexOutOfRange { index, len }),
        }
    }

    /// Removes the element at `index`, shifting later elements left by one.
    ///
    /// Returns `None` and leaves the collection untouched when out of range.
    pub fn delete(&mut self, index: usize) -> Option<T> {
        if index >= self.values.len() {
            return None;
        }
        Some(self.values.remove(index))
    }

    /// Reverses element order in place.
    pub fn reverse(&mut self) {
        if self.values.len() < 2 {
            return;
        }
        self.values.reverse();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T: Clone> Array<T> {
    /// Returns an independent collection holding clones of every element.
    pub fn copy(&self) -> Self {
        self.iter().cloned().collect()
    }

    /// Returns a new collection with `self`'s elements followed by `other`'s.
    ///
    /// Neither input is modified.
    pub fn merge(&self, other: &Array<T>) -> Self {
        let mut merged = Self::with_capacity(self.len() + other.len());
        merged.values.extend_from_slice(&self.values);
        merged.values.extend_from_slice(&other.values);
        merged
    }

    /// Returns a clone of the element at `index`, failing when `index >= len`.
    pub fn try_lookup(&self, index: usize) -> Result<T, IndexOutOfRange> {
        self.values.get(index).cloned().ok_or(IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }
}

impl<T: Clone + Default> Array<T> {
    /// Returns a clone of the element at `index`, or `T::default()` when out
    /// of range. Never panics and never mutates.
    pub fn lookup(&self, index: usize) -> T {
        match self.try_lookup(index) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=array_lookup module=collection status=default error={err}");
                T::default()
            }
        }
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
