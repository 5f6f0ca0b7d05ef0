//! In-memory block cache for decompressed SWORD module data.
//!
//! SWORD's compressed drivers (zText, zCom, zLD) group many verses or
//! entries into a single zlib block. Decompressing that block is the
//! expensive step, so every decoder in `juniper-formats` shares this
//! cache to avoid re-inflating the same bytes on every lookup.
//!
//! # Design
//!
//! The cache has no eviction policy, no TTL, and no size bound by
//! default. It is a [`std::sync::RwLock`]-guarded map from an
//! application-chosen key to a decompressed buffer, with a single
//! mutating operation ([`BlockCache::get_or_insert_with`]) and a single
//! bulk operation ([`BlockCache::clear`]). Callers who want bounded
//! memory wrap the cache externally rather than configuring it here.
//!
//! Reads proceed concurrently; a miss briefly takes the write lock to
//! insert the freshly decompressed block. Losing a race to insert the
//! same key is harmless — the loser's bytes are dropped and the
//! winner's are returned.

pub mod cache;
pub mod key;
pub mod stats;

pub use cache::BlockCache;
pub use key::{BlockKey, Testament};
pub use stats::CacheStats;
