//! mapkit: generic, single-threaded associative-container building blocks
//! with explicit control over probing, resizing, and traversal.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: provide the two classic associative engines as reusable,
//!   type-parameterized components with no runtime type erasure, each
//!   small enough to be reasoned about independently.
//! - Engines:
//!   - ProbeMap<K, V, S>: open-addressing hash table with linear probing,
//!     power-of-two capacity, automatic doubling/halving, and
//!     tombstone-free backward-shift deletion.
//!   - OrderedMap<K, V, M>: balanced multiway (B-tree) map with branching
//!     factor `M`, split-based insertion, and bidirectional cursors over
//!     an explicit parent stack (nodes carry no parent links).
//!   - hash::SipHasher24 / hash::FixedState: SipHash-2-4 byte-hash
//!     primitive and a deterministic `BuildHasher` for reproducible
//!     layouts.
//!
//! Constraints
//! - Single-threaded: no internal synchronization; exclusive access is
//!   expressed through `&`/`&mut` receivers.
//! - Keys and values are stored by value (moved in); entry references
//!   returned to callers borrow the engine and are invalidated by the
//!   borrow checker before any structural mutation can happen.
//! - Parameterization is purely through capability traits: `Hash + Eq`
//!   (plus a `BuildHasher`) for the hash table, `Ord` for the ordered map.
//!   Borrowed-key lookups go through `K: Borrow<Q>`.
//!
//! Hasher and rehashing invariants
//! - Keys that compare equal must hash identically (the `Hash`/`Eq`
//!   contract). Each entry stores its `u64` hash at insertion and all
//!   probing, rehashing, and backward shifting use the stored hash;
//!   `K: Hash` is never invoked after insertion, so resizes never call
//!   back into user code.
//!
//! Load-factor invariants
//! - `ProbeMap` keeps `len / capacity` below [`probe_map::HIGH_LOAD`]
//!   after every insert (growing first so the new entry also lands in the
//!   larger table) and above [`probe_map::LOW_LOAD`] after every remove,
//!   except when already at [`probe_map::MIN_CAPACITY`]. Capacity is
//!   always a power of two.
//!
//! Tree invariants
//! - `OrderedMap` nodes hold strictly sorted entries; an internal node
//!   has exactly one more child than it has entries; all leaves sit at
//!   the same depth. Height grows only by splitting the root. A node that
//!   reaches `M - 1` entries splits immediately: the median is promoted
//!   upward as a "floater" whose less-than child is the freshly created
//!   left sibling, while the original node keeps the upper half.
//!
//! Failure semantics
//! - A missed lookup is an ordinary `None`, never an error. Allocation
//!   failure aborts, as is standard for Rust collections; there is no
//!   partial-allocation recovery mid-resize or mid-split. Remaining
//!   preconditions that the type system cannot express (such as the
//!   minimum branching factor) are checked with always-on assertions.
//!
//! Notes and non-goals
//! - No persistence, no on-disk layout, no concurrency control.
//! - `OrderedMap` does not support deletion; the split-only balancing
//!   scheme has no rebalancing-on-delete counterpart here.
//! - The deterministic `FixedState` hasher is not DoS-resistant; the
//!   default `RandomState` is.

pub mod cursor;
pub mod hash;
pub mod ordered_map;
pub mod probe_map;

mod ordered_map_proptest;
mod probe_map_proptest;

// Public surface
pub use cursor::Cursor;
pub use hash::{siphash24, FixedState, SipHasher24};
pub use ordered_map::OrderedMap;
pub use probe_map::ProbeMap;
