use super::SlotRef;


/// One side of a tombstone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Neighbor {
    /// The live slot next to the erased one on this side, or `None` for the
    /// end of the active list.
    Known(Option<SlotRef>),

    /// The recorded slot's block has been freed. The neighbor has to be
    /// looked up when the tombstone is consumed.
    Lost,
}

/// Record of an erased slot: the slot itself and its live neighbors at the
/// time it was erased.
///
/// Reusing the slot splices it back between `left` and `right`. Slots between
/// a recorded neighbor and `position` stay dead until this tombstone is
/// consumed, and a recorded neighbor that was erased later is revived before
/// that (reuse is LIFO). The only way a recorded neighbor can be dead at
/// reuse time is that its whole block was freed, which is what
/// [`Neighbor::Lost`] marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tombstone {
    pub(crate) left: Neighbor,
    pub(crate) position: SlotRef,
    pub(crate) right: Neighbor,
}

impl Tombstone {
    pub(crate) fn new(left: Option<SlotRef>, position: SlotRef, right: Option<SlotRef>) -> Self {
        Self {
            left: Neighbor::Known(left),
            position,
            right: Neighbor::Known(right),
        }
    }

    /// Marks neighbors living in the block `reclaimed` as lost.
    pub(crate) fn forget_block(&mut self, reclaimed: usize) {
        for side in [&mut self.left, &mut self.right] {
            if let Neighbor::Known(Some(s)) = *side {
                if s.block == reclaimed {
                    *side = Neighbor::Lost;
                }
            }
        }
    }
}
