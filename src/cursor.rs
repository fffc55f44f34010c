use crate::error::CursorError;
use crate::multiset::{Decrement, Multiset};
use std::fmt::{self, Debug};
use std::marker::PhantomData;

/// A cursor visiting every occurrence of a multiset, one at a time.
///
/// An item stored with count `k` is visited `k` times in a row, and distinct items
/// are visited in the order they were first inserted. The occurrence most recently
/// returned by [`next`](Cursor::next) can be removed with [`remove`](Cursor::remove)
/// without disturbing the rest of the traversal.
///
/// The cursor borrows its multiset mutably, so the multiset cannot be modified
/// behind its back while it is alive.
///
/// # Examples
///
/// ```
/// use counted_multiset::{CountedMultiset, CursorError};
///
/// let mut set = CountedMultiset::new();
/// set.insert_many("a", 2);
/// set.insert("b");
///
/// let mut cursor = set.cursor();
/// assert_eq!(cursor.next(), Ok(&"a"));
/// assert_eq!(cursor.remove(), Ok(()));
/// assert_eq!(cursor.remove(), Err(CursorError::InvalidRemoval));
/// assert_eq!(cursor.next(), Ok(&"a"));
/// assert_eq!(cursor.next(), Ok(&"b"));
/// assert!(!cursor.has_next());
/// assert_eq!(cursor.next(), Err(CursorError::Exhausted));
///
/// assert_eq!(set.len(), 2);
/// ```
pub struct Cursor<'a, T, M: ?Sized> {
    set: &'a mut M,
    // Either `slot == set.distinct_len()`, or `1 <= remaining <= count(slot)`.
    slot: usize,
    remaining: usize,
    last: Option<usize>,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T, M> Cursor<'a, T, M>
where
    M: Multiset<T> + ?Sized,
{
    /// Creates a cursor positioned before the first occurrence of `set`.
    pub fn new(set: &'a mut M) -> Self {
        let remaining = set.entry(0).map_or(0, |(_, count)| count);

        Self {
            set,
            slot: 0,
            remaining,
            last: None,
            marker: PhantomData,
        }
    }

    /// Returns `true` if at least one occurrence has not been visited yet.
    pub fn has_next(&self) -> bool {
        self.slot < self.set.distinct_len()
    }

    /// Visits the next occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Exhausted`] if every occurrence has been visited.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&T, CursorError> {
        if !self.has_next() {
            return Err(CursorError::Exhausted);
        }

        let slot = self.slot;
        self.remaining -= 1;

        if self.remaining == 0 {
            self.slot += 1;
            self.remaining = self.set.entry(self.slot).map_or(0, |(_, count)| count);
        }

        self.last = Some(slot);

        match self.set.entry(slot) {
            Some((item, _)) => Ok(item),
            None => Err(CursorError::Exhausted),
        }
    }

    /// Removes the occurrence most recently returned by [`next`](Cursor::next).
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InvalidRemoval`] if `next` has not been called yet,
    /// or if that occurrence has already been removed.
    pub fn remove(&mut self) -> Result<(), CursorError> {
        let last = self.last.take().ok_or(CursorError::InvalidRemoval)?;

        match self.set.decrement(last) {
            Some(Decrement::Removed) => {
                // The entry of `last` was fully visited, so the cursor already moved past it.
                if self.slot > last {
                    self.slot -= 1;
                }
                log::trace!("cursor removed entry at slot {}, resuming at slot {}", last, self.slot);
                Ok(())
            }
            Some(Decrement::Retained(_)) => Ok(()),
            None => Err(CursorError::InvalidRemoval),
        }
    }
}

impl<T, M: ?Sized> Debug for Cursor<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("slot", &self.slot)
            .field("remaining", &self.remaining)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CountedMultiset;

    fn position<T, M: Multiset<T>>(cursor: &Cursor<'_, T, M>) -> (usize, usize) {
        (cursor.slot, cursor.remaining)
    }

    #[test]
    fn starts_on_first_entry() {
        let mut set = CountedMultiset::new();
        set.insert_many('a', 3);
        set.insert('b');

        let cursor = set.cursor();
        assert_eq!(position(&cursor), (0, 3));
        assert_eq!(cursor.last, None);
    }

    #[test]
    fn advances_slot_after_last_occurrence() {
        let mut set = CountedMultiset::new();
        set.insert_many('a', 2);
        set.insert_many('b', 4);

        let mut cursor = set.cursor();
        cursor.next().unwrap();
        assert_eq!(position(&cursor), (0, 1));
        cursor.next().unwrap();
        assert_eq!(position(&cursor), (1, 4));
        assert_eq!(cursor.last, Some(0));
    }

    #[test]
    fn removing_deleted_entry_moves_slot_back() {
        let mut set = CountedMultiset::new();
        set.insert('a');
        set.insert_many('b', 2);

        let mut cursor = set.cursor();
        cursor.next().unwrap();
        assert_eq!(position(&cursor), (1, 2));
        cursor.remove().unwrap();
        assert_eq!(position(&cursor), (0, 2));
        assert_eq!(cursor.next(), Ok(&'b'));
    }

    #[test]
    fn removing_retained_entry_keeps_position() {
        let mut set = CountedMultiset::new();
        set.insert_many('a', 3);

        let mut cursor = set.cursor();
        cursor.next().unwrap();
        cursor.remove().unwrap();
        assert_eq!(position(&cursor), (0, 2));
        drop(cursor);

        assert_eq!(set.count(&'a'), 2);
    }

    #[test]
    fn removal_at_end_stays_exhausted() {
        let mut set = CountedMultiset::new();
        set.insert('a');
        set.insert('b');

        let mut cursor = set.cursor();
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert!(!cursor.has_next());
        cursor.remove().unwrap();
        assert!(!cursor.has_next());
        assert_eq!(position(&cursor), (1, 0));
        assert_eq!(cursor.next(), Err(CursorError::Exhausted));
    }
}
