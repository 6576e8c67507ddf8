//! This is just a dummy library to check the assembly output of some
//! functions.

use bucket_storage::{BucketStorage, Cursor};

pub fn get_u32(bs: &BucketStorage<u32>, at: Cursor) -> Option<u32> {
    bs.get(at).copied()
}

pub fn insert_u32(bs: &mut BucketStorage<u32>, val: u32) -> Cursor {
    bs.insert(val)
}

pub fn erase_u32(bs: &mut BucketStorage<u32>, at: Cursor) -> Cursor {
    bs.erase(at)
}

pub fn advance_u32(bs: &BucketStorage<u32>, at: Cursor) -> Cursor {
    bs.advance(at)
}

pub fn count_u32(bs: &BucketStorage<u32>) -> usize {
    bs.iter().count()
}

pub fn sum_u32(bs: &BucketStorage<u32>) -> u64 {
    bs.iter().map(|&e| e as u64).sum()
}
