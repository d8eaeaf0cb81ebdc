// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dirty Flags: per-key change tracking.
//!
//! This crate provides [`DirtyFlags`], a small table that remembers, for each
//! key it has ever been told about, whether that key is currently dirty.
//!
//! It differs from a plain dirty *set* in one respect: cleaning a key does not
//! forget it. A key that was marked and later cleaned is still *tracked*, with
//! a `false` flag, which lets callers distinguish "clean" from "never seen".
//!
//! - `mark(key)` - flag a key as dirty, tracking it if new
//! - `clean(&key)` - reset a tracked key's flag to `false`
//! - `forget(&key)` - stop tracking a key entirely
//! - `dirty()` - iterate dirty keys in first-mark order
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_dirty_flags::DirtyFlags;
//!
//! let mut flags = DirtyFlags::<&str>::new();
//!
//! flags.mark("width");
//! flags.mark("height");
//! assert!(flags.is_dirty(&"width"));
//!
//! flags.clean(&"width");
//! assert_eq!(flags.state(&"width"), Some(false));
//! assert_eq!(flags.state(&"depth"), None);
//!
//! let dirty: Vec<_> = flags.dirty().collect();
//! assert_eq!(dirty, [&"height"]);
//! ```
//!
//! ## Ordering
//!
//! Keys are kept in the order they were first marked. Cleaning keeps a key's
//! position; [`DirtyFlags::forget`] removes it, so a later mark appends it at
//! the end.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod flags;

pub use flags::DirtyFlags;
