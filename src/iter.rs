//! Contains all iterator types and implementations.
//!
//! This is in its own module to not pollute the top-level namespace.
//!
//! All iterators walk the active list of the storage. Erased slots are never
//! visited, no matter how many of them there are.

use std::{fmt, iter::FusedIterator};

use crate::{
    block::{Blocks, SlotRef},
    BucketStorage,
};


/// Iterator over immutable references to the elements of a
/// `BucketStorage`.
///
/// Use the method [`BucketStorage::iter`] or the `IntoIterator` impl of
/// `&BucketStorage` to obtain an iterator of this kind.
pub struct Iter<'a, T> {
    blocks: &'a Blocks<T>,
    front: Option<SlotRef>,
    back: Option<SlotRef>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(storage: &'a BucketStorage<T>) -> Self {
        Self {
            blocks: &storage.blocks,
            front: storage.first,
            back: storage.last,
            remaining: storage.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let blocks = self.blocks;
        let at = self.front.expect("bug in BucketStorage iterator: active list too short");
        let slot = &blocks[at];
        self.front = slot.next;
        self.remaining -= 1;

        slot.get()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn count(self) -> usize {
        self.remaining
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let blocks = self.blocks;
        let at = self.back.expect("bug in BucketStorage iterator: active list too short");
        let slot = &blocks[at];
        self.back = slot.prev;
        self.remaining -= 1;

        slot.get()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}


/// Iterator over mutable references to the elements of a `BucketStorage`.
///
/// Use the method [`BucketStorage::iter_mut`] or the `IntoIterator` impl of
/// `&mut BucketStorage` to obtain an iterator of this kind.
pub struct IterMut<'a, T> {
    blocks: &'a mut Blocks<T>,
    front: Option<SlotRef>,
    back: Option<SlotRef>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(storage: &'a mut BucketStorage<T>) -> Self {
        Self {
            front: storage.first,
            back: storage.last,
            remaining: storage.len,
            blocks: &mut storage.blocks,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let at = self.front.expect("bug in BucketStorage iterator: active list too short");
        let slot = &mut self.blocks[at];
        self.front = slot.next;
        self.remaining -= 1;

        // We extend the lifetime of the reference returned by `get_mut` to
        // `'a`. The active list visits every slot at most once and `remaining`
        // stops us before the front and back ends cross, so the same
        // reference is never returned twice. All other access to the storage
        // is blocked by our mutable borrow.
        slot.get_mut().map(|r| unsafe { &mut *(r as *mut T) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn count(self) -> usize {
        self.remaining
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let at = self.back.expect("bug in BucketStorage iterator: active list too short");
        let slot = &mut self.blocks[at];
        self.back = slot.prev;
        self.remaining -= 1;

        // See `Self::next()` for more information on this.
        slot.get_mut().map(|r| unsafe { &mut *(r as *mut T) })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}


/// Iterator over owned elements of a `BucketStorage`.
///
/// Use the method `BucketStorage::into_iter` to obtain an iterator of this
/// kind.
pub struct IntoIter<T> {
    storage: BucketStorage<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(storage: BucketStorage<T>) -> Self {
        Self { storage }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.storage.detach_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.storage.len, Some(self.storage.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.storage.detach_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.storage).finish()
    }
}
