//! Blocks of slots and the arena owning them.
//!
//! A [`Block`] is a fixed-size array of [`Slot`]s plus the stack of
//! [`Tombstone`]s of its erased slots. Blocks are never moved or resized;
//! they live in [`Blocks`], an arena addressed by plain `usize` handles. The
//! order of blocks inside the storage is not the arena order but the doubly
//! linked chain formed by `Block::next`/`Block::prev`.
//!
//! Every arena entry carries a generation counter that is bumped whenever the
//! block living there is freed. Cursors remember the generation they were
//! created with, which lets the storage detect cursors into reclaimed blocks.

use std::prelude::v1::*;
use std::ops::{Index, IndexMut};

use crate::free_stack::FreeStack;

pub(crate) use self::{
    slot::{Slot, SlotRef},
    tombstone::{Neighbor, Tombstone},
};

mod slot;
mod tombstone;


#[derive(Debug)]
pub(crate) struct Block<T> {
    slots: Box<[Slot<T>]>,
    tombstones: FreeStack<Tombstone>,

    /// Absolute index of this block's first slot, i.e. the number of slots
    /// in all blocks before it in the chain.
    base: usize,

    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
}

impl<T> Block<T> {
    /// Allocates a block with `capacity` vacant slots, no tombstones and no
    /// neighbors.
    pub(crate) fn new(capacity: usize, base: usize) -> Self {
        let slots = (0..capacity)
            .map(Slot::vacant)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            tombstones: FreeStack::new(),
            base,
            next: None,
            prev: None,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn base(&self) -> usize {
        self.base
    }

    /// Moves this block `by` slots towards the front, after an earlier block
    /// was removed from the chain.
    pub(crate) fn shift_down(&mut self, by: usize) {
        debug_assert!(self.base >= by);
        self.base -= by;
    }

    pub(crate) fn tombstones_mut(&mut self) -> &mut FreeStack<Tombstone> {
        &mut self.tombstones
    }

    /// Returns `true` if every slot of this block has been erased and none
    /// of them reused since.
    #[inline]
    pub(crate) fn is_vacated(&self) -> bool {
        self.tombstones.len() == self.capacity()
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> Option<&Slot<T>> {
        self.slots.get(index)
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<T>> {
        self.slots.get_mut(index)
    }
}


#[derive(Debug)]
struct Entry<T> {
    generation: u32,
    block: Option<Block<T>>,
}

/// Arena of blocks handing out stable `usize` handles.
///
/// Handles of freed blocks are recycled (most recently freed first); the
/// entry's generation tells old and new occupants apart.
#[derive(Debug)]
pub(crate) struct Blocks<T> {
    entries: Vec<Entry<T>>,
    vacant: FreeStack<usize>,
}

impl<T> Blocks<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: FreeStack::new(),
        }
    }

    /// Moves `block` into the arena and returns its handle.
    pub(crate) fn insert(&mut self, block: Block<T>) -> usize {
        match self.vacant.pop() {
            Some(id) => {
                let entry = &mut self.entries[id];
                debug_assert!(entry.block.is_none());
                entry.block = Some(block);
                id
            }
            None => {
                self.entries.push(Entry {
                    generation: 0,
                    block: Some(block),
                });
                self.entries.len() - 1
            }
        }
    }

    /// Frees the block with handle `id`, invalidating its generation.
    pub(crate) fn remove(&mut self, id: usize) -> Option<Block<T>> {
        let entry = self.entries.get_mut(id)?;
        let block = entry.block.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.vacant.push(id);
        Some(block)
    }

    /// Returns an empty arena whose handles are all invalid for cursors into
    /// `self`: every entry starts one generation later.
    pub(crate) fn successor(&self) -> Self {
        let entries = self.entries
            .iter()
            .map(|e| Entry {
                generation: e.generation.wrapping_add(1),
                block: None,
            })
            .collect();
        let mut vacant = FreeStack::new();
        for id in (0..self.entries.len()).rev() {
            vacant.push(id);
        }

        Self { entries, vacant }
    }

    /// Frees all blocks, dropping every value still stored in them.
    pub(crate) fn clear(&mut self) {
        for id in 0..self.entries.len() {
            self.remove(id);
        }
    }

    #[inline]
    pub(crate) fn generation(&self, id: usize) -> u32 {
        self.entries[id].generation
    }

    #[inline]
    pub(crate) fn get(&self, id: usize) -> Option<&Block<T>> {
        self.entries.get(id)?.block.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut Block<T>> {
        self.entries.get_mut(id)?.block.as_mut()
    }

    /// Returns the slot `at` if its block is still the one of the given
    /// `generation`.
    pub(crate) fn checked_slot(&self, at: SlotRef, generation: u32) -> Option<&Slot<T>> {
        let entry = self.entries.get(at.block)?;
        if entry.generation != generation {
            return None;
        }
        entry.block.as_ref()?.slot(at.index)
    }

    /// Mutable version of [`Blocks::checked_slot`].
    pub(crate) fn checked_slot_mut(
        &mut self,
        at: SlotRef,
        generation: u32,
    ) -> Option<&mut Slot<T>> {
        let entry = self.entries.get_mut(at.block)?;
        if entry.generation != generation {
            return None;
        }
        entry.block.as_mut()?.slot_mut(at.index)
    }
}

impl<T> Index<usize> for Blocks<T> {
    type Output = Block<T>;

    fn index(&self, id: usize) -> &Block<T> {
        self.get(id).expect("bug in BucketStorage: dangling block handle")
    }
}

impl<T> IndexMut<usize> for Blocks<T> {
    fn index_mut(&mut self, id: usize) -> &mut Block<T> {
        self.get_mut(id).expect("bug in BucketStorage: dangling block handle")
    }
}

impl<T> Index<SlotRef> for Blocks<T> {
    type Output = Slot<T>;

    fn index(&self, at: SlotRef) -> &Slot<T> {
        self[at.block]
            .slot(at.index)
            .expect("bug in BucketStorage: slot index out of block bounds")
    }
}

impl<T> IndexMut<SlotRef> for Blocks<T> {
    fn index_mut(&mut self, at: SlotRef) -> &mut Slot<T> {
        self[at.block]
            .slot_mut(at.index)
            .expect("bug in BucketStorage: slot index out of block bounds")
    }
}
