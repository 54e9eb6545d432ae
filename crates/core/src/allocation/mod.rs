//! Cent-exact allocation of expense totals.

pub mod allocator;
pub mod error;

#[cfg(test)]
mod props;

pub use allocator::SplitAllocator;
pub use error::AllocationError;
