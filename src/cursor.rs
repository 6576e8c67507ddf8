//! Positions inside a [`BucketStorage`].
//!
//! A [`Cursor`] is a small `Copy` handle that does not borrow the storage, so
//! it can be kept around while the storage is mutated and then handed back
//! to methods like [`BucketStorage::erase`]. Stepping and dereferencing go
//! through the storage ([`BucketStorage::advance`], [`BucketStorage::get`],
//! ...). [`CursorRef`] bundles a cursor with a shared borrow of its storage
//! for read-only walking.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{block::SlotRef, BucketStorage};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Target {
    Slot { slot: SlotRef, generation: u32 },
    End,
}

/// A bidirectional position in a [`BucketStorage`]: either one element or
/// the past-the-end position.
///
/// Two cursors are equal iff they point to the same slot of the same block
/// (or are both past-the-end). A cursor whose block was reclaimed never
/// compares equal to a cursor created afterwards, even if the storage reuses
/// the block's memory.
///
/// Cursors additionally carry a *logical position*: the absolute slot index
/// (slots of all preceding blocks plus the index within the block) at the
/// time the cursor was produced. It orders cursors (`<`, `>`, ...) and is
/// *not* updated when the storage changes afterwards. Comparing cursors
/// across an insertion or erasure can give stale results.
///
/// Stepping uses a "ghost" past-the-end position: advancing the last element
/// or retreating the first one yields `end()`, advancing `end()` yields
/// `begin()` and retreating `end()` yields the last element.
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    pub(crate) target: Target,
    pub(crate) position: usize,
}

impl Cursor {
    pub(crate) fn end(position: usize) -> Self {
        Self {
            target: Target::End,
            position,
        }
    }

    /// Returns `true` if this is the past-the-end cursor.
    pub fn is_end(&self) -> bool {
        self.target == Target::End
    }

    /// The logical position this cursor was created with. See the type
    /// documentation for its caveats.
    pub fn logical_position(&self) -> usize {
        self.position
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for Cursor {}

impl Hash for Cursor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        match self.position.cmp(&other.position) {
            Ordering::Equal => None,
            ord => Some(ord),
        }
    }
}


/// A read-only cursor borrowing its [`BucketStorage`].
///
/// Obtained from [`BucketStorage::cbegin`] and [`BucketStorage::cend`]. It
/// compares equal to a [`Cursor`] (and vice versa) iff both denote the same
/// position.
pub struct CursorRef<'a, T> {
    storage: &'a BucketStorage<T>,
    cursor: Cursor,
}

impl<'a, T> CursorRef<'a, T> {
    pub(crate) fn new(storage: &'a BucketStorage<T>, cursor: Cursor) -> Self {
        Self { storage, cursor }
    }

    /// The element at this position, or `None` at the end.
    pub fn current(&self) -> Option<&'a T> {
        self.storage.get(self.cursor)
    }

    /// Steps to the next element (or to the end).
    pub fn move_next(&mut self) {
        self.cursor = self.storage.advance(self.cursor);
    }

    /// Steps to the previous element (or to the end when at the first one).
    pub fn move_prev(&mut self) {
        self.cursor = self.storage.retreat(self.cursor);
    }

    /// The owned position handle, usable with mutating storage methods once
    /// this borrow has ended.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns `true` at the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }
}

impl<T> Clone for CursorRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CursorRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for CursorRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorRef")
            .field("cursor", &self.cursor)
            .field("current", &self.current())
            .finish()
    }
}

impl<T> PartialEq for CursorRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor
    }
}

impl<T> PartialEq<Cursor> for CursorRef<'_, T> {
    fn eq(&self, other: &Cursor) -> bool {
        self.cursor == *other
    }
}

impl<T> PartialEq<CursorRef<'_, T>> for Cursor {
    fn eq(&self, other: &CursorRef<'_, T>) -> bool {
        *self == other.cursor
    }
}
