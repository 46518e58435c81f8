//! Fixed-capacity dense storage with swap-remove
//!
//! Removing an element moves the last element into its slot, so iteration
//! that erases must revisit the same index afterwards.

use std::ops::{Deref, DerefMut};

use thiserror::Error;

/// Returned when an insert would exceed a pool's capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pool is full ({capacity} slots)")]
pub struct PoolFull {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Append an element, returning its index
    pub fn push(&mut self, item: T) -> Result<usize, PoolFull> {
        if self.is_full() {
            return Err(PoolFull {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Remove `index`, filling the hole with the last element.
    /// Out-of-range indices are ignored.
    pub fn swap_remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.swap_remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Deref for Pool<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for Pool<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
