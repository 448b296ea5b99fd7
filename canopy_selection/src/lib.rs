// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Selection: the selected-node set of a canvas.
//!
//! This crate only does the _bookkeeping_ of a selection. It does not know how
//! nodes are laid out or nested; the gesture layer in `canopy_canvas` decides
//! which keys a click, a shift-click on a branch or a box gesture produces and
//! then applies them here.
//!
//! [`Selection`] tracks:
//! - The selected keys, in insertion order.
//! - The **primary** key: the most recently added key. Mind-map commands such
//!   as "add child" or "center on selection" act on it.
//! - A **revision** counter that bumps only when the selection changes, so a
//!   host can emit a `selectionChanged` notification exactly once per change.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_selection::Selection;
//!
//! let mut selection = Selection::<u32>::new();
//!
//! // Plain click: replace selection with a single node.
//! selection.select_only(10);
//! assert_eq!(selection.primary(), Some(&10));
//!
//! // Ctrl/Cmd-click: toggle a node.
//! selection.toggle(11);
//! assert_eq!(selection.items(), &[10, 11]);
//! assert_eq!(selection.primary(), Some(&11));
//!
//! // Box gesture released with Shift: union with the prior selection.
//! selection.extend_with([11, 12, 13]);
//! assert_eq!(selection.items(), &[10, 11, 12, 13]);
//! assert_eq!(selection.primary(), Some(&13));
//! ```
//!
//! ## Snapshots
//!
//! Gestures that may be cancelled (a box selection interrupted by Escape)
//! take a [`Selection::snapshot`] at pointer-down and hand it back through
//! [`Selection::restore`] on cancel. Restoring an identical snapshot is a
//! no-op and does not bump the revision.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// An insertion-ordered selection with a primary (last added) key and a revision.
///
/// `Selection` only requires equality on `T` for most operations; it stores
/// keys in a `Vec<T>` and enforces uniqueness by scanning. With the
/// `hashbrown` feature, batch operations can de-duplicate by hashing instead.
#[derive(Clone, Debug, Default)]
pub struct Selection<T> {
    keys: Vec<T>,
    last: Option<usize>,
    revision: u64,
}

/// A saved copy of a selection's contents, used to undo a cancelled gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSnapshot<T> {
    keys: Vec<T>,
    last: Option<usize>,
}

impl<T> SelectionSnapshot<T> {
    /// Returns the keys captured by this snapshot.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.keys
    }
}

impl<T> Selection<T> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: Vec::new(),
            last: None,
            revision: 0,
        }
    }

    /// Returns `true` if the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns the selected keys in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.keys
    }

    /// Returns an iterator over the selected keys.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.keys.iter()
    }

    /// Returns the primary key: the most recently added one, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&T> {
        self.last.map(|idx| &self.keys[idx])
    }

    /// Returns the current revision counter.
    ///
    /// The revision only bumps when the contents or the primary key change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes all keys.
    pub fn clear(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        self.keys.clear();
        self.last = None;
        self.touch();
    }

    /// Keeps only the keys for which `keep` returns `true`.
    ///
    /// Used after a new document snapshot arrives to drop keys whose node no
    /// longer exists. If the primary key is dropped, the last remaining key
    /// becomes primary.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let before = self.keys.len();
        let original = self.last;
        let mut idx = 0;
        let mut shift = 0;
        let mut lost_last = false;
        self.keys.retain(|key| {
            let kept = keep(key);
            if !kept {
                match original {
                    Some(p) if p == idx => lost_last = true,
                    Some(p) if p > idx => shift += 1,
                    _ => {}
                }
            }
            idx += 1;
            kept
        });
        if self.keys.len() == before {
            return;
        }
        self.last = if lost_last || self.keys.is_empty() {
            self.keys.len().checked_sub(1)
        } else {
            original.map(|p| p - shift)
        };
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<T> Selection<T>
where
    T: PartialEq,
{
    /// Returns `true` if the selection currently contains `key`.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.index_of(key).is_some()
    }

    /// Replaces the selection with a single key, which becomes primary.
    pub fn select_only(&mut self, key: T) {
        if self.keys.len() == 1 && self.keys.first() == Some(&key) {
            return;
        }
        self.keys.clear();
        self.keys.push(key);
        self.last = Some(0);
        self.touch();
    }

    /// Replaces the selection with a batch of keys.
    ///
    /// Duplicates are ignored and the last unique key becomes primary. Like
    /// the rest of this type it scans for duplicates, so it is quadratic in
    /// the batch size; see `replace_with_hashed` for large batches.
    pub fn replace_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut fresh: Vec<T> = Vec::new();
        for key in keys {
            if !fresh.iter().any(|existing| existing == &key) {
                fresh.push(key);
            }
        }
        self.set_keys(fresh);
    }

    /// Adds a batch of keys, keeping existing ones.
    ///
    /// The last newly added key becomes primary. Keys already selected keep
    /// their position.
    pub fn extend_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut last_added = None;
        for key in keys {
            if self.index_of(&key).is_none() {
                self.keys.push(key);
                last_added = Some(self.keys.len() - 1);
            }
        }
        if let Some(idx) = last_added {
            self.last = Some(idx);
            self.touch();
        }
    }

    /// Adds `key`, making it primary.
    pub fn add(&mut self, key: T) {
        if let Some(idx) = self.index_of(&key) {
            if self.last != Some(idx) {
                self.last = Some(idx);
                self.touch();
            }
        } else {
            self.keys.push(key);
            self.last = Some(self.keys.len() - 1);
            self.touch();
        }
    }

    /// Removes `key` if present.
    pub fn remove(&mut self, key: &T) {
        if let Some(idx) = self.index_of(key) {
            self.detach(idx);
            self.touch();
        }
    }

    /// Toggles membership of `key`.
    ///
    /// An added key becomes primary. Removing the primary key hands the role
    /// to the most recently added remaining key.
    pub fn toggle(&mut self, key: T) {
        if let Some(idx) = self.index_of(&key) {
            self.detach(idx);
        } else {
            self.keys.push(key);
            self.last = Some(self.keys.len() - 1);
        }
        self.touch();
    }

    /// Returns `true` if both selections hold the same keys, ignoring order.
    #[must_use]
    pub fn same_keys(&self, other: &[T]) -> bool {
        self.keys.len() == other.len() && other.iter().all(|key| self.contains(key))
    }

    fn index_of(&self, key: &T) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn set_keys(&mut self, fresh: Vec<T>) {
        let fresh_last = fresh.len().checked_sub(1);
        if fresh == self.keys && self.last == fresh_last {
            return;
        }
        self.keys = fresh;
        self.last = fresh_last;
        self.touch();
    }

    fn detach(&mut self, idx: usize) {
        self.keys.remove(idx);
        self.last = match self.last {
            Some(p) if p == idx => self.keys.len().checked_sub(1),
            Some(p) if p > idx => Some(p - 1),
            other => other,
        };
        if self.keys.is_empty() {
            self.last = None;
        }
    }
}

impl<T> Selection<T>
where
    T: Clone,
{
    /// Captures the current contents so they can be restored later.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot<T> {
        SelectionSnapshot {
            keys: self.keys.clone(),
            last: self.last,
        }
    }
}

impl<T> Selection<T>
where
    T: PartialEq,
{
    /// Restores contents captured by [`Selection::snapshot`].
    ///
    /// The revision bumps only if the restored contents differ.
    pub fn restore(&mut self, snapshot: SelectionSnapshot<T>) {
        if snapshot.keys == self.keys && snapshot.last == self.last {
            return;
        }
        self.keys = snapshot.keys;
        self.last = snapshot.last;
        self.touch();
    }
}

#[cfg(feature = "hashbrown")]
impl<T> Selection<T>
where
    T: core::hash::Hash + Eq + Clone,
{
    /// Replaces the selection with a batch, de-duplicating with a hash set.
    ///
    /// Produces the same result as [`Selection::replace_with`] in linear time.
    /// Box selections over large maps go through this path.
    pub fn replace_with_hashed<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = keys.into_iter();
        let (lower, upper) = iter.size_hint();
        let cap = upper.unwrap_or(lower);

        let mut seen = hashbrown::HashSet::with_capacity(cap);
        let mut fresh: Vec<T> = Vec::with_capacity(cap);
        for key in iter {
            if seen.insert(key.clone()) {
                fresh.push(key);
            }
        }
        self.set_keys(fresh);
    }

    /// Adds a batch, de-duplicating against the current contents by hashing.
    ///
    /// Produces the same result as [`Selection::extend_with`].
    pub fn extend_with_hashed<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut seen: hashbrown::HashSet<T> = self.keys.iter().cloned().collect();
        let mut last_added = None;
        for key in keys {
            if seen.insert(key.clone()) {
                self.keys.push(key);
                last_added = Some(self.keys.len() - 1);
            }
        }
        if let Some(idx) = last_added {
            self.last = Some(idx);
            self.touch();
        }
    }
}
