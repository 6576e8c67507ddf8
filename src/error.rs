//! Error type of this crate.

use std::fmt;


/// Errors reported by a [`BucketStorage`][crate::BucketStorage] and its
/// internal stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An argument was rejected. Currently only raised when constructing a
    /// storage with a block capacity of 0.
    InvalidArgument(&'static str),

    /// The top of an empty stack was requested.
    EmptyContainer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(reason) => write!(f, "invalid argument: {}", reason),
            Error::EmptyContainer => f.write_str("the container is empty"),
        }
    }
}

impl core::error::Error for Error {}
