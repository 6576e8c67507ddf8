//! A plain LIFO stack used for every free list in this crate.

use std::prelude::v1::*;

use crate::Error;


/// Strict LIFO stack.
///
/// It is used at two levels to drive slot reuse: each block keeps a stack of
/// the tombstones of its erased slots, and the storage keeps a stack of the
/// blocks that currently have a reusable slot. The block arena also uses one
/// to recycle its entries.
///
/// Entries are stored contiguously in a `Vec` instead of one heap node per
/// entry. Nothing is ever deduplicated: pushing the same value twice means it
/// is popped twice.
#[derive(Clone, Debug)]
pub(crate) struct FreeStack<T> {
    items: Vec<T>,
}

impl<T> FreeStack<T> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes and returns the most recently pushed value, or `None` if the
    /// stack is empty.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns the most recently pushed value without removing it.
    ///
    /// Fails with [`Error::EmptyContainer`] if the stack is empty.
    #[inline]
    pub(crate) fn top(&self) -> Result<&T, Error> {
        self.items.last().ok_or(Error::EmptyContainer)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every entry for which `keep` returns `false`. The relative order
    /// of the remaining entries is preserved.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Visits all entries, bottom to top.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}
