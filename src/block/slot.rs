/// Address of one slot: the arena handle of its block plus its index inside
/// that block.
///
/// Slot addresses never change while their block is alive. They are what the
/// active list and the tombstones link together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SlotRef {
    pub(crate) block: usize,
    pub(crate) index: usize,
}

/// One storage cell of a block.
///
/// A slot is *active* iff it holds a value. Only active slots are part of the
/// active list; the `next`/`prev` links of an inactive slot are cleared and
/// carry no meaning.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    value: Option<T>,
    index: usize,

    /// Next live slot in storage order, possibly in a later block.
    pub(crate) next: Option<SlotRef>,

    /// Previous live slot in storage order, possibly in an earlier block.
    pub(crate) prev: Option<SlotRef>,
}

impl<T> Slot<T> {
    pub(crate) fn vacant(index: usize) -> Self {
        Self {
            value: None,
            index,
            next: None,
            prev: None,
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.value.is_some()
    }

    /// Position of this slot inside its block.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Stores `value` and marks the slot active. The caller links the slot.
    #[inline]
    pub(crate) fn fill(&mut self, value: T) {
        debug_assert!(!self.is_active(), "bug in BucketStorage: filling an active slot");
        self.value = Some(value);
    }

    /// Moves the value out, marking the slot inactive and clearing its links.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<T> {
        self.next = None;
        self.prev = None;
        self.value.take()
    }
}
