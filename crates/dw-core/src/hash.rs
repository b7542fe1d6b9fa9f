//! Fast hash map and hash set type aliases.
//!
//! The coordinator's registry is keyed by paths, so the Fx hash from
//! `rustc-hash` is used instead of the standard SipHash. Keys are local file
//! paths, never attacker-controlled input.
//!
//! # Examples
//!
//! ```
//! use dw_core::{FxHashMap, fx_hash_map};
//!
//! let mut map: FxHashMap<&str, u32> = fx_hash_map();
//! map.insert("src/lib.rs", 1);
//! assert_eq!(map.get("src/lib.rs"), Some(&1));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
