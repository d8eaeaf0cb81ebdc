// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty flags: one boolean per tracked key.

use core::hash::Hash;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

/// Per-key dirty flags with generation tracking.
///
/// `DirtyFlags` maps each tracked key to a boolean. A key becomes tracked the
/// first time it is [marked](Self::mark) and stays tracked, clean or dirty,
/// until it is [forgotten](Self::forget) or the table is [cleared](Self::clear).
///
/// A generation counter increments whenever a flag actually changes state,
/// so callers can cheaply detect whether anything happened since a previous
/// observation.
///
/// # Type Parameters
///
/// - `K`: The key type. Must be `Eq + Hash`.
///
/// # Example
///
/// ```
/// use understory_dirty_flags::DirtyFlags;
///
/// let mut flags = DirtyFlags::<u32>::new();
///
/// assert!(flags.mark(1));
/// assert!(!flags.mark(1)); // already dirty
///
/// let generation = flags.generation();
/// assert!(flags.clean(&1));
/// assert!(flags.generation() > generation);
///
/// // Cleaned keys remain tracked.
/// assert!(flags.is_tracked(&1));
/// assert!(!flags.is_dirty(&1));
/// ```
#[derive(Clone, Debug)]
pub struct DirtyFlags<K>
where
    K: Eq + Hash,
{
    /// Flag per key, in first-mark order.
    flags: IndexMap<K, bool, DefaultHashBuilder>,
    /// Generation counter, incremented on each state change.
    generation: u64,
}

impl<K> Default for DirtyFlags<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DirtyFlags<K>
where
    K: Eq + Hash,
{
    /// Creates an empty flag table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty flag table with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            flags: IndexMap::with_capacity_and_hasher(capacity, DefaultHashBuilder::default()),
            generation: 0,
        }
    }

    /// Returns the current generation.
    ///
    /// The generation is incremented whenever a mutation changes a flag,
    /// starts or stops tracking a key, or clears a non-empty table.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns the number of tracked keys, clean or dirty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Marks a key as dirty, tracking it if it was not tracked yet.
    ///
    /// Returns `true` if the key was not dirty before this call.
    pub fn mark(&mut self, key: K) -> bool {
        match self.flags.get_mut(&key) {
            Some(true) => false,
            Some(flag) => {
                *flag = true;
                self.bump();
                true
            }
            None => {
                self.flags.insert(key, true);
                self.bump();
                true
            }
        }
    }

    /// Resets a tracked key's flag to clean.
    ///
    /// Untracked keys are left untracked. Returns `true` if the key was dirty.
    pub fn clean(&mut self, key: &K) -> bool {
        match self.flags.get_mut(key) {
            Some(flag) if *flag => {
                *flag = false;
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Resets every tracked flag to clean.
    ///
    /// Returns the number of flags that were dirty.
    pub fn clean_all(&mut self) -> usize {
        let mut cleaned = 0;
        for flag in self.flags.values_mut() {
            if *flag {
                *flag = false;
                cleaned += 1;
            }
        }
        if cleaned > 0 {
            self.bump();
        }
        cleaned
    }

    /// Returns the flag for `key`, or `None` if the key is not tracked.
    #[must_use]
    pub fn state(&self, key: &K) -> Option<bool> {
        self.flags.get(key).copied()
    }

    /// Returns `true` if the key is tracked and dirty.
    #[must_use]
    pub fn is_dirty(&self, key: &K) -> bool {
        self.state(key).unwrap_or(false)
    }

    /// Returns `true` if the key is tracked, whatever its flag.
    #[must_use]
    pub fn is_tracked(&self, key: &K) -> bool {
        self.flags.contains_key(key)
    }

    /// Returns `true` if any tracked key is dirty.
    #[must_use]
    pub fn has_dirty(&self) -> bool {
        self.flags.values().any(|dirty| *dirty)
    }

    /// Returns the number of dirty keys.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.flags.values().filter(|dirty| **dirty).count()
    }

    /// Stops tracking a key.
    ///
    /// Returns the flag the key had, or `None` if it was not tracked. The
    /// remaining keys keep their relative order.
    pub fn forget(&mut self, key: &K) -> Option<bool> {
        let removed = self.flags.shift_remove(key);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Stops tracking every key.
    pub fn clear(&mut self) {
        if !self.flags.is_empty() {
            self.flags.clear();
            self.bump();
        }
    }

    /// Returns an iterator over all tracked keys and their flags, in
    /// first-mark order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, bool)> + '_ {
        self.flags.iter().map(|(key, dirty)| (key, *dirty))
    }

    /// Returns an iterator over the dirty keys, in first-mark order.
    pub fn dirty(&self) -> impl Iterator<Item = &K> + '_ {
        self.flags
            .iter()
            .filter_map(|(key, dirty)| dirty.then_some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn new_is_empty() {
        let flags = DirtyFlags::<u32>::new();
        assert!(flags.is_empty());
        assert_eq!(flags.len(), 0);
        assert_eq!(flags.generation(), 0);
        assert!(!flags.has_dirty());
    }

    #[test]
    fn mark_tracks_and_flags() {
        let mut flags = DirtyFlags::<u32>::new();

        assert!(flags.mark(1));
        assert_eq!(flags.state(&1), Some(true));
        assert!(flags.is_dirty(&1));
        assert!(flags.is_tracked(&1));
        assert_eq!(flags.len(), 1);

        // Unknown keys are neither dirty nor tracked.
        assert_eq!(flags.state(&2), None);
        assert!(!flags.is_dirty(&2));
        assert!(!flags.is_tracked(&2));
    }

    #[test]
    fn mark_twice_is_stable() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);
        let generation = flags.generation();

        assert!(!flags.mark(1));
        assert_eq!(flags.generation(), generation);
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn clean_keeps_key_tracked() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);

        assert!(flags.clean(&1));
        assert_eq!(flags.state(&1), Some(false));
        assert!(flags.is_tracked(&1));

        // Cleaning again changes nothing.
        let generation = flags.generation();
        assert!(!flags.clean(&1));
        assert_eq!(flags.generation(), generation);
    }

    #[test]
    fn clean_untracked_is_noop() {
        let mut flags = DirtyFlags::<u32>::new();
        assert!(!flags.clean(&7));
        assert!(!flags.is_tracked(&7));
        assert_eq!(flags.generation(), 0);
    }

    #[test]
    fn remark_after_clean() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);
        flags.clean(&1);

        assert!(flags.mark(1));
        assert!(flags.is_dirty(&1));
    }

    #[test]
    fn clean_all_counts_dirty() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);
        flags.mark(2);
        flags.mark(3);
        flags.clean(&2);

        assert_eq!(flags.dirty_count(), 2);
        assert_eq!(flags.clean_all(), 2);
        assert_eq!(flags.dirty_count(), 0);
        assert_eq!(flags.len(), 3);

        let generation = flags.generation();
        assert_eq!(flags.clean_all(), 0);
        assert_eq!(flags.generation(), generation);
    }

    #[test]
    fn dirty_iterates_in_first_mark_order() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(3);
        flags.mark(1);
        flags.mark(2);
        flags.clean(&1);
        // Re-marking keeps the original position.
        flags.mark(3);

        let dirty: Vec<_> = flags.dirty().copied().collect();
        assert_eq!(dirty, [3, 2]);

        let all: Vec<_> = flags.iter().map(|(k, d)| (*k, d)).collect();
        assert_eq!(all, [(3, true), (1, false), (2, true)]);
    }

    #[test]
    fn forget_removes_and_reorders() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);
        flags.mark(2);
        flags.clean(&1);

        assert_eq!(flags.forget(&1), Some(false));
        assert_eq!(flags.forget(&1), None);
        assert!(!flags.is_tracked(&1));

        flags.mark(1);
        let keys: Vec<_> = flags.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [2, 1]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);
        flags.mark(2);

        let generation = flags.generation();
        flags.clear();
        assert!(flags.is_empty());
        assert!(!flags.has_dirty());
        assert!(flags.generation() > generation);

        // Clearing an empty table is not a change.
        let generation = flags.generation();
        flags.clear();
        assert_eq!(flags.generation(), generation);
    }

    #[test]
    fn clone_is_independent() {
        let mut flags = DirtyFlags::<u32>::new();
        flags.mark(1);

        let mut cloned = flags.clone();
        cloned.clean(&1);

        assert!(flags.is_dirty(&1));
        assert!(!cloned.is_dirty(&1));
    }
}
