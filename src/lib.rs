//! A multiset implementation storing each distinct item once, alongside its number of occurrences.
//!
//! ---
//!
//! [`CountedMultiset`] is a [multiset](https://en.wikipedia.org/wiki/Multiset)
//! implementation where items are stored as a list of counted entries:
//!  - `a -> 2`
//!  - `b -> 1`
//!
//! as opposed to storing every occurrence separately:
//!  - `a`
//!  - `a`
//!  - `b`
//!
//! Entries are kept in the order their items were first inserted.
//! [`HashMultiset`] keeps the same entries but indexes them with a hash table.
//!
//! ---
//!
//! Both are traversed with a [`Cursor`], which visits every occurrence one at a time,
//! as if each were stored separately, and can remove the occurrence it just visited:
//!
//! ```
//! use counted_multiset::CountedMultiset;
//!
//! let mut set = CountedMultiset::from(["a", "b", "a", "c"]);
//! let mut cursor = set.cursor();
//!
//! while let Ok(&item) = cursor.next() {
//!     if item == "a" {
//!         cursor.remove().unwrap();
//!     }
//! }
//!
//! assert_eq!(set.to_string(), "[b x 1, c x 1]");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

/// Multiset implementation backed by an insertion-ordered list of counted entries.
pub mod counted;

/// Cursor flattening counted entries into individual occurrences.
pub mod cursor;

mod error;

/// Multiset implementation backed by counted entries indexed by a hash table.
pub mod hashed;

/// Iterators shared by the multiset implementations.
pub mod iter;

mod multiset;

#[cfg(feature = "serde")]
mod serde;

pub use counted::CountedMultiset;
pub use cursor::Cursor;
pub use error::{CountOverflow, CursorError};
pub use hashbrown::TryReserveError;
pub use hashed::HashMultiset;
pub use multiset::{Decrement, Multiset};

fn fmt_entries<'a, T, I>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    T: 'a + Display,
    I: IntoIterator<Item = (&'a T, usize)>,
{
    f.write_str("[")?;
    for (i, (item, count)) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} x {}", item, count)?;
    }
    f.write_str("]")
}

// Entries are hashed one by one with a fixed-key hasher and summed, so the result is the same
// for any insertion order and any `BuildHasher` the set was built with.
fn hash_entries<'a, T, I, H>(state: &mut H, len: usize, entries: I)
where
    T: 'a + Hash,
    I: IntoIterator<Item = (&'a T, usize)>,
    H: Hasher,
{
    let sum = entries
        .into_iter()
        .map(|entry| {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add);

    len.hash(state);
    sum.hash(state);
}
