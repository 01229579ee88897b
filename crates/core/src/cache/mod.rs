//! In-process page cache.
//!
//! The homepage aggregate is held in a single slot: one entry, overwritten on
//! every refresh, served only while younger than the TTL. Nothing is persisted.

mod slot;

pub use slot::{CacheEntry, SlotCache};
