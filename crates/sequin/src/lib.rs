//! Sequin - Lazy, composable queries over any iterable.
//!
//! Sequin wraps a source in a [`Seq`] and exposes a chainable set of
//! operators. Nothing runs until a terminal operator (or a plain `for` loop)
//! pulls from the chain, and each pull threads a single value through every
//! operator without intermediate buffering. It supports:
//!
//! - Projection and filtering with optional position indexes
//! - Partitioning: `skip`, `take`, `skip_while`, `take_while`
//! - Set operators: `distinct`, `union`, `except`, `intersect`
//! - Grouping, lookups and joins backed by a one-pass index
//! - Stable multi-key ordering with `order_by` / `then_by`
//! - Aggregates: `count`, `sum`, `min`, `max`, `average`, `aggregate`
//!
//! # Quick Start
//!
//! ```rust
//! use sequin::{seq, Seq};
//!
//! #[derive(Clone)]
//! struct Task {
//!     project: &'static str,
//!     name: &'static str,
//!     priority: u8,
//! }
//!
//! let tasks = seq(vec![
//!     Task { project: "docs", name: "Write intro", priority: 3 },
//!     Task { project: "core", name: "Fix bug", priority: 5 },
//!     Task { project: "core", name: "Add test", priority: 5 },
//!     Task { project: "docs", name: "Typos", priority: 1 },
//! ]);
//!
//! let urgent: Vec<_> = tasks
//!     .filter(|t| t.priority >= 3)
//!     .order_by_descending(|t| t.priority)
//!     .then_by(|t| t.name)
//!     .select(|t| t.name)
//!     .to_vec();
//! assert_eq!(urgent, vec!["Add test", "Fix bug", "Write intro"]);
//!
//! let per_project: Vec<_> = tasks
//!     .group_by(|t| t.project)
//!     .select(|group| (*group.key(), group.count()))
//!     .to_vec();
//! assert_eq!(per_project, vec![("docs", 2), ("core", 2)]);
//!
//! assert_eq!(Seq::range(1, 4).sum(), 10);
//! ```
//!
//! # Evaluation
//!
//! ```text
//! deferred operator   returns a new Seq, touches nothing
//! terminal operator   starts a pass and drains as much as it needs
//! index operator      builds its index on the first pull, then reuses it
//! ```
//!
//! Index operators are `group_by`, `distinct`, `distinct_by`, `order_by`,
//! `then_by`, `join`, `group_join`, `except` and `intersect`. `reverse`
//! buffers its source once per pass. `union` remembers what it has yielded
//! during the current pass only, so it stays usable on infinite sources.
//!
//! A key selector must not iterate the query whose index it is helping to
//! build; that pass panics.
//!
//! A `Seq` is re-iterable: every pass re-runs the chain from the source.
//! Handles are reference counted and not `Send`.

mod backing;
mod error;
mod factory;
mod grouped;
mod index;
mod lookup;
mod map;
mod number;
mod ordering;
mod seq;
mod set;
mod surface;
mod terminal;

// Re-export public API
pub use backing::{KeyedAccess, MapBacking, Membership, SetBacking};
pub use error::{Result, SeqError};
pub use factory::{seq, IntoSeq};
pub use grouped::Grouping;
pub use index::IndexedMap;
pub use map::{Lookup, SeqMap};
pub use number::Number;
pub use ordering::{compare_keys, Dir, OrderedSeq};
pub use seq::{Iter, Seq};
pub use set::SeqSet;
pub use surface::{Arg, Binding, Surface};
