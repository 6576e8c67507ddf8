//! A container that stores elements in fixed-capacity blocks, with stable
//! slots, O(1) insertion and deletion and iteration over live elements only.
//!
//! This crate provides the [`BucketStorage`] type, a building block for
//! object pools, entity stores and similar structures where elements must
//! not move once inserted and where removal in the middle has to be cheap.
//!
//! ```
//! use bucket_storage::BucketStorage;
//!
//! let mut storage = BucketStorage::with_block_capacity(2).unwrap();
//! storage.insert(1);
//! let two = storage.insert(2);
//! storage.insert(3);
//!
//! storage.erase(two);
//! storage.insert(4); // reuses the slot that held `2`
//!
//! assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [1, 4, 3]);
//! ```

#![no_std]

extern crate no_std_compat as std;

#[cfg(test)]
extern crate alloc;

use std::prelude::v1::*;
use std::{
    fmt,
    iter::FromIterator,
    mem,
};

// Emits a `tracing` event when the `tracing` feature is enabled; expands to
// nothing otherwise.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

mod block;
mod cursor;
mod error;
mod free_stack;
pub mod iter;


use crate::{
    block::{Block, Blocks, Neighbor, SlotRef, Tombstone},
    cursor::Target,
    free_stack::FreeStack,
    iter::{IntoIter, Iter, IterMut},
};

pub use crate::{
    cursor::{Cursor, CursorRef},
    error::Error,
};


/// Block capacity used by [`BucketStorage::new`] and `Default`.
pub const DEFAULT_BLOCK_CAPACITY: usize = 64;

/// A container storing elements in a chain of fixed-capacity blocks.
///
/// # How?
///
/// Memory is organized in *blocks*, each an array of `block_capacity`
/// *slots*. Blocks are allocated one at a time when the last one is full and
/// are never resized, so an element never moves once it is inserted. All
/// live slots are threaded into one doubly linked *active list* that spans
/// block boundaries. Iterating walks that list and never looks at empty
/// slots.
///
/// Erasing an element unlinks its slot and records a *tombstone* (the slot
/// plus its neighbors at that time) in the slot's block. The block is also
/// pushed onto a storage-wide stack of blocks with reusable slots. The next
/// insertion pops that stack and puts the new element into the most recently
/// erased slot, splicing it back where it was. Only when no erased slot is
/// waiting does an insertion append at the end. Both stacks are strict LIFO:
/// erasing `a` and then `b` means the next two insertions land in `b`'s slot
/// and then `a`'s slot.
///
/// A block whose slots have all been erased (without any being reused since)
/// is freed right away, together with its tombstones. Tombstones elsewhere
/// that named one of its slots as a neighbor find the closest live slot by
/// scanning when they are reused, so such an insertion is not O(1).
///
/// # Positions
///
/// Elements are addressed with [`Cursor`]s: `begin()`, `end()`, the return
/// values of [`insert`][BucketStorage::insert] and
/// [`erase`][BucketStorage::erase], stepped with
/// [`advance`][BucketStorage::advance] and [`retreat`][BucketStorage::retreat].
/// A cursor into a block that has since been freed is detected: `get`
/// returns `None` for it and stepping it yields `end()`. There is no
/// indexing by position.
///
/// # Copying
///
/// `clone()` and [`shrink_to_fit`][BucketStorage::shrink_to_fit] rebuild the
/// storage by inserting the live values in order into a fresh storage with
/// the same block capacity. The logical sequence of values is preserved,
/// the physical layout (block boundaries, erased slots) is not.
pub struct BucketStorage<T> {
    blocks: Blocks<T>,

    /// One entry per reusable slot: the block holding it. A block appears as
    /// often as it has tombstones.
    reusable: FreeStack<usize>,

    head_block: Option<usize>,
    tail_block: Option<usize>,
    num_blocks: usize,

    /// First and last live slot of the active list.
    first: Option<SlotRef>,
    last: Option<SlotRef>,

    len: usize,
    block_capacity: usize,

    /// Absolute index of the next never-used slot. Only the append path
    /// advances it.
    cursor: usize,
}

impl<T> BucketStorage<T> {
    /// Creates an empty storage with blocks of [`DEFAULT_BLOCK_CAPACITY`]
    /// slots.
    ///
    /// No memory is allocated until the first element is inserted.
    pub fn new() -> Self {
        Self::empty(DEFAULT_BLOCK_CAPACITY)
    }

    /// Creates an empty storage whose blocks hold `block_capacity` elements
    /// each.
    ///
    /// Fails with [`Error::InvalidArgument`] if `block_capacity` is 0.
    pub fn with_block_capacity(block_capacity: usize) -> Result<Self, Error> {
        if block_capacity == 0 {
            return Err(Error::InvalidArgument("the block capacity cannot be 0"));
        }

        Ok(Self::empty(block_capacity))
    }

    fn empty(block_capacity: usize) -> Self {
        Self {
            blocks: Blocks::new(),
            reusable: FreeStack::new(),
            head_block: None,
            tail_block: None,
            num_blocks: 0,
            first: None,
            last: None,
            len: 0,
            block_capacity,
            cursor: 0,
        }
    }

    /// Inserts `elem` and returns a cursor to it.
    ///
    /// If some slot was erased earlier and not reused yet, the most recently
    /// erased one is reused and `elem` takes the erased element's place in
    /// the iteration order. Otherwise `elem` is appended after all other
    /// elements, allocating a new block if the last one is full.
    ///
    /// No other element is moved. Cursors to other elements stay valid.
    pub fn insert(&mut self, elem: T) -> Cursor {
        let at = match self.reusable.top() {
            Ok(&block) => self.revive(block, elem),
            Err(_) => self.append(elem),
        };
        self.len += 1;

        self.cursor_at(at)
    }

    /// Reuses the most recent tombstone of `block`.
    fn revive(&mut self, block: usize, elem: T) -> SlotRef {
        self.reusable.pop();
        let tombstone = self.blocks[block]
            .tombstones_mut()
            .pop()
            .expect("bug in BucketStorage: reusable block without tombstone");
        let position = tombstone.position;
        debug_assert_eq!(position.block, block);

        let left = match tombstone.left {
            Neighbor::Known(left) => left,
            Neighbor::Lost => self.live_before(position),
        };
        let right = match tombstone.right {
            Neighbor::Known(right) => right,
            Neighbor::Lost => self.live_after(position),
        };
        debug_assert_eq!(
            left.map_or(self.first, |l| self.blocks[l].next),
            right,
            "bug in BucketStorage: tombstone neighbors are not adjacent",
        );

        match left {
            Some(l) => self.blocks[l].next = Some(position),
            None => self.first = Some(position),
        }
        match right {
            Some(r) => self.blocks[r].prev = Some(position),
            None => self.last = Some(position),
        }

        let slot = &mut self.blocks[position];
        slot.prev = left;
        slot.next = right;
        slot.fill(elem);

        position
    }

    /// Finds the closest live slot before `at` in storage order by scanning
    /// the slots, crossing into earlier blocks as needed.
    fn live_before(&self, at: SlotRef) -> Option<SlotRef> {
        let mut block = at.block;
        let mut end = at.index;
        loop {
            let b = &self.blocks[block];
            let found = (0..end).rev().find(|&i| b.slot(i).map_or(false, |s| s.is_active()));
            if let Some(index) = found {
                return Some(SlotRef { block, index });
            }

            block = b.prev?;
            end = self.blocks[block].capacity();
        }
    }

    /// Counterpart of [`BucketStorage::live_before`] looking forward.
    fn live_after(&self, at: SlotRef) -> Option<SlotRef> {
        let mut block = at.block;
        let mut start = at.index + 1;
        loop {
            let b = &self.blocks[block];
            let found = (start..b.capacity()).find(|&i| b.slot(i).map_or(false, |s| s.is_active()));
            if let Some(index) = found {
                return Some(SlotRef { block, index });
            }

            block = b.next?;
            start = 0;
        }
    }

    /// Writes `elem` into the slot at the append cursor.
    fn append(&mut self, elem: T) -> SlotRef {
        debug_assert!(self.reusable.is_empty());
        if self.cursor == self.num_blocks * self.block_capacity {
            self.push_block();
        }

        let block = self.tail_block.expect("bug in BucketStorage: no tail block after growing");
        let at = SlotRef {
            block,
            index: self.cursor % self.block_capacity,
        };
        debug_assert_eq!(self.blocks[block].base() + at.index, self.cursor);

        let prev = self.last;
        match prev {
            Some(p) => self.blocks[p].next = Some(at),
            None => self.first = Some(at),
        }

        let slot = &mut self.blocks[at];
        debug_assert_eq!(slot.index(), at.index);
        slot.prev = prev;
        slot.next = None;
        slot.fill(elem);

        self.last = Some(at);
        self.cursor += 1;

        at
    }

    /// Allocates a new block and links it at the end of the chain.
    fn push_block(&mut self) {
        // The block is complete before it becomes reachable.
        let id = self.blocks.insert(Block::new(self.block_capacity, self.cursor));

        match self.tail_block {
            Some(tail) => {
                self.blocks[tail].next = Some(id);
                self.blocks[id].prev = Some(tail);
            }
            None => self.head_block = Some(id),
        }
        self.tail_block = Some(id);
        self.num_blocks += 1;

        trace_event!(block = id, base = self.cursor, "allocated block");
    }

    /// Erases the element at `at`, dropping it, and returns a cursor to the
    /// element that followed it (or `end()`).
    ///
    /// If this empties a block completely, the block is freed. All cursors
    /// into that block become invalid (dereferencing them yields `None`).
    ///
    /// # Panics
    ///
    /// Panics if `at` does not point to a live element of this storage.
    pub fn erase(&mut self, at: Cursor) -> Cursor {
        let slot = self
            .live_slot(at)
            .expect("`BucketStorage::erase` called with a cursor that does not point to an element");
        let (_, next) = self.remove_slot(slot);

        self.cursor_or_end(next)
    }

    /// Removes and returns the element at `at`, or returns `None` if `at`
    /// does not point to a live element.
    ///
    /// Apart from returning the element instead of dropping it, this behaves
    /// exactly like [`erase`][BucketStorage::erase].
    pub fn remove(&mut self, at: Cursor) -> Option<T> {
        let slot = self.live_slot(at)?;
        Some(self.remove_slot(slot).0)
    }

    /// Removes and returns the first element, or `None` if the storage is
    /// empty.
    pub fn remove_first(&mut self) -> Option<T> {
        let first = self.first?;
        Some(self.remove_slot(first).0)
    }

    /// Removes and returns the last element, or `None` if the storage is
    /// empty.
    pub fn remove_last(&mut self) -> Option<T> {
        let last = self.last?;
        Some(self.remove_slot(last).0)
    }

    /// Unlinks the live slot `at`, records its tombstone and reclaims its
    /// block if that was the block's last live slot. Returns the value and
    /// the following live slot.
    fn remove_slot(&mut self, at: SlotRef) -> (T, Option<SlotRef>) {
        let slot = &mut self.blocks[at];
        let (left, right) = (slot.prev, slot.next);
        let elem = slot.take().expect("bug in BucketStorage: removing an inactive slot");

        match left {
            Some(l) => self.blocks[l].next = right,
            None => self.first = right,
        }
        match right {
            Some(r) => self.blocks[r].prev = left,
            None => self.last = left,
        }

        let block = &mut self.blocks[at.block];
        block.tombstones_mut().push(Tombstone::new(left, at, right));
        let vacated = block.is_vacated();
        self.reusable.push(at.block);
        self.len -= 1;

        if vacated {
            self.reclaim(at.block);
        }

        (elem, right)
    }

    /// Frees the fully vacated block `id`.
    fn reclaim(&mut self, id: usize) {
        let (prev, next) = {
            let block = &self.blocks[id];
            (block.prev, block.next)
        };

        if prev.is_none() && next.is_none() {
            trace_event!(block = id, "reclaimed the only block, resetting");
            self.clear();
            return;
        }

        match prev {
            Some(p) => self.blocks[p].next = next,
            None => self.head_block = next,
        }
        match next {
            Some(n) => self.blocks[n].prev = prev,
            None => self.tail_block = prev,
        }

        // All following blocks move one block towards the front.
        let mut current = next;
        while let Some(b) = current {
            let block = &mut self.blocks[b];
            block.shift_down(self.block_capacity);
            current = block.next;
        }

        // Tombstones of other blocks may name slots of this one as their
        // neighbors.
        self.reusable.retain(|&b| b != id);
        let mut current = self.head_block;
        while let Some(b) = current {
            let block = &mut self.blocks[b];
            for tombstone in block.tombstones_mut().iter_mut() {
                tombstone.forget_block(id);
            }
            current = block.next;
        }

        self.cursor -= self.block_capacity;
        self.num_blocks -= 1;
        self.blocks.remove(id);

        trace_event!(block = id, remaining = self.num_blocks, "reclaimed block");
    }

    /// Returns the slot `at` points to if it holds a live element.
    fn live_slot(&self, at: Cursor) -> Option<SlotRef> {
        match at.target {
            Target::Slot { slot, generation } => self
                .blocks
                .checked_slot(slot, generation)
                .filter(|s| s.is_active())
                .map(|_| slot),
            Target::End => None,
        }
    }

    fn cursor_at(&self, at: SlotRef) -> Cursor {
        Cursor {
            target: Target::Slot {
                slot: at,
                generation: self.blocks.generation(at.block),
            },
            position: self.blocks[at.block].base() + at.index,
        }
    }

    fn cursor_or_end(&self, at: Option<SlotRef>) -> Cursor {
        match at {
            Some(at) => self.cursor_at(at),
            None => self.end(),
        }
    }

    /// Returns a cursor to the first element, or `end()` if the storage is
    /// empty.
    pub fn begin(&self) -> Cursor {
        self.cursor_or_end(self.first)
    }

    /// Returns the past-the-end cursor. It never points to an element.
    pub fn end(&self) -> Cursor {
        Cursor::end(self.cursor)
    }

    /// Read-only version of [`begin`][BucketStorage::begin] that borrows the
    /// storage.
    pub fn cbegin(&self) -> CursorRef<'_, T> {
        CursorRef::new(self, self.begin())
    }

    /// Read-only version of [`end`][BucketStorage::end] that borrows the
    /// storage.
    pub fn cend(&self) -> CursorRef<'_, T> {
        CursorRef::new(self, self.end())
    }

    /// Returns the cursor following `at`.
    ///
    /// Advancing the last element yields `end()` and advancing `end()`
    /// yields `begin()`. A cursor that no longer points to a live element
    /// (its element was erased or its block freed) yields `end()`.
    pub fn advance(&self, at: Cursor) -> Cursor {
        match at.target {
            Target::End => self.begin(),
            Target::Slot { .. } => match self.live_slot(at) {
                Some(slot) => self.cursor_or_end(self.blocks[slot].next),
                None => self.end(),
            },
        }
    }

    /// Returns the cursor preceding `at`.
    ///
    /// Retreating the first element yields `end()` and retreating `end()`
    /// yields the last element. A cursor that no longer points to a live
    /// element yields `end()`.
    pub fn retreat(&self, at: Cursor) -> Cursor {
        match at.target {
            Target::End => self.cursor_or_end(self.last),
            Target::Slot { .. } => match self.live_slot(at) {
                Some(slot) => self.cursor_or_end(self.blocks[slot].prev),
                None => self.end(),
            },
        }
    }

    /// Steps `distance` times from `at`: forward for positive and backward
    /// for negative distances. This takes O(|distance|) time.
    pub fn get_to_distance(&self, at: Cursor, distance: isize) -> Cursor {
        let mut out = at;
        if distance >= 0 {
            for _ in 0..distance {
                out = self.advance(out);
            }
        } else {
            for _ in distance..0 {
                out = self.retreat(out);
            }
        }

        out
    }

    /// Returns a reference to the element at `at`, or `None` if `at` is the
    /// end or its element no longer exists.
    pub fn get(&self, at: Cursor) -> Option<&T> {
        match at.target {
            Target::Slot { slot, generation } => self.blocks.checked_slot(slot, generation)?.get(),
            Target::End => None,
        }
    }

    /// Returns a mutable reference to the element at `at`, or `None` if `at`
    /// is the end or its element no longer exists.
    pub fn get_mut(&mut self, at: Cursor) -> Option<&mut T> {
        match at.target {
            Target::Slot { slot, generation } => {
                self.blocks.checked_slot_mut(slot, generation)?.get_mut()
            }
            Target::End => None,
        }
    }

    /// Returns `true` if `at` points to a live element of this storage.
    pub fn contains(&self, at: Cursor) -> bool {
        self.live_slot(at).is_some()
    }

    /// Returns a reference to the first element, or `None` if the storage is
    /// empty.
    pub fn first(&self) -> Option<&T> {
        self.first.and_then(|at| self.blocks[at].get())
    }

    /// Returns a mutable reference to the first element, or `None` if the
    /// storage is empty.
    pub fn first_mut(&mut self) -> Option<&mut T> {
        let at = self.first?;
        self.blocks[at].get_mut()
    }

    /// Returns a reference to the last element, or `None` if the storage is
    /// empty.
    pub fn last(&self) -> Option<&T> {
        self.last.and_then(|at| self.blocks[at].get())
    }

    /// Returns a mutable reference to the last element, or `None` if the
    /// storage is empty.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        let at = self.last?;
        self.blocks[at].get_mut()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the storage holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in all blocks up to the last one ever
    /// appended to, or 0 if the storage holds no elements.
    ///
    /// Blocks are only allocated whole, so this is always a multiple of
    /// [`block_capacity`][BucketStorage::block_capacity].
    pub fn capacity(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.block_capacity * ((self.cursor - 1) / self.block_capacity + 1)
        }
    }

    /// Returns the number of slots per block, fixed at construction.
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    /// Returns the number of currently allocated blocks.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Removes and drops all elements and frees all blocks. The block
    /// capacity is kept.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.reusable.clear();
        self.head_block = None;
        self.tail_block = None;
        self.num_blocks = 0;
        self.first = None;
        self.last = None;
        self.len = 0;
        self.cursor = 0;
    }

    /// Rebuilds the storage so that the elements occupy the minimal number
    /// of blocks, without any erased slots.
    ///
    /// The order of elements is preserved. **All cursors are invalidated.**
    /// Using an old cursor afterwards yields `None`/`end()` like a cursor
    /// into a freed block. This takes O(n) time.
    pub fn shrink_to_fit(&mut self) {
        let fresh = Self {
            blocks: self.blocks.successor(),
            ..Self::empty(self.block_capacity)
        };
        let old = mem::replace(self, fresh);
        self.extend(old);

        trace_event!(len = self.len, blocks = self.num_blocks, "compacted storage");
    }

    /// Exchanges the contents of `self` and `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves all elements out into a new storage, leaving `self` empty with
    /// the same block capacity. Cursors into `self` now refer to the
    /// returned storage and no longer resolve in `self`.
    pub fn take(&mut self) -> Self {
        let fresh = Self {
            blocks: self.blocks.successor(),
            ..Self::empty(self.block_capacity)
        };
        mem::replace(self, fresh)
    }

    /// Returns an iterator over immutable references to the elements, in
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns an iterator over mutable references to the elements, in
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Takes the first element out without leaving a tombstone. Only used
    /// while the storage is consumed, as it leaves the reuse bookkeeping
    /// inconsistent.
    pub(crate) fn detach_first(&mut self) -> Option<T> {
        let at = self.first?;
        let slot = &mut self.blocks[at];
        let next = slot.next;
        let elem = slot.take();

        self.first = next;
        match next {
            Some(n) => self.blocks[n].prev = None,
            None => self.last = None,
        }
        self.len -= 1;

        elem
    }

    /// Counterpart of [`BucketStorage::detach_first`] for the back.
    pub(crate) fn detach_last(&mut self) -> Option<T> {
        let at = self.last?;
        let slot = &mut self.blocks[at];
        let prev = slot.prev;
        let elem = slot.take();

        self.last = prev;
        match prev {
            Some(p) => self.blocks[p].next = None,
            None => self.first = None,
        }
        self.len -= 1;

        elem
    }
}

impl<T> Default for BucketStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BucketStorage<T> {
    fn clone(&self) -> Self {
        let mut out = Self::empty(self.block_capacity);
        out.extend(self.iter().cloned());
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for BucketStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BucketStorage ")?;
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for BucketStorage<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T> Extend<T> for BucketStorage<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for BucketStorage<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for BucketStorage<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a BucketStorage<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BucketStorage<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<A, B> PartialEq<BucketStorage<B>> for BucketStorage<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &BucketStorage<B>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for BucketStorage<T> {}

impl<A, B> PartialEq<[B]> for BucketStorage<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &[B]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<A, B, const N: usize> PartialEq<[B; N]> for BucketStorage<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &[B; N]) -> bool {
        self == &other[..]
    }
}

impl<'other, A, B> PartialEq<&'other [B]> for BucketStorage<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &&'other [B]) -> bool {
        self == *other
    }
}

impl<A, B> PartialEq<Vec<B>> for BucketStorage<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, other: &Vec<B>) -> bool {
        self == &other[..]
    }
}
