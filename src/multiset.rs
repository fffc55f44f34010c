use crate::cursor::Cursor;
use crate::error::CountOverflow;

/// Outcome of removing a single occurrence from the entry in a given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The entry is still present and now holds this many occurrences.
    Retained(usize),
    /// That was the last occurrence, the entry is gone and every later slot moved down by one.
    Removed,
}

/// A collection holding each distinct item once together with its number of occurrences.
///
/// Entries are addressed by slot, in the order their items were first inserted.
/// The trait is object safe, so stores can be used through `&mut dyn Multiset<T>`.
///
/// # Examples
///
/// ```
/// use counted_multiset::{CountedMultiset, HashMultiset, Multiset};
///
/// fn fill(set: &mut dyn Multiset<&'static str>) {
///     set.insert_many("a", 3);
///     set.insert("b");
/// }
///
/// let mut counted: CountedMultiset<&str> = CountedMultiset::new();
/// let mut hashed: HashMultiset<&str> = HashMultiset::new();
/// fill(&mut counted);
/// fill(&mut hashed);
///
/// assert!(counted.eq_counts(&hashed));
/// ```
pub trait Multiset<T> {
    /// Adds `n` occurrences of `item`, returning how many there were before.
    ///
    /// Adding zero occurrences does nothing and returns 0. Leaves the collection untouched
    /// and returns [`CountOverflow`] if the total number of occurrences would exceed `usize::MAX`.
    fn try_insert_many(&mut self, item: T, n: usize) -> Result<usize, CountOverflow>;

    /// Removes a single occurrence of `item`. Returns whether it was present.
    fn remove(&mut self, item: &T) -> bool;

    /// Returns the number of occurrences of `item`.
    fn count(&self, item: &T) -> usize;

    /// Returns the total number of occurrences.
    fn len(&self) -> usize;

    /// Returns the number of distinct items.
    fn distinct_len(&self) -> usize;

    /// Removes every occurrence of every item.
    fn clear(&mut self);

    /// Returns the item and count stored in `slot`.
    fn entry(&self, slot: usize) -> Option<(&T, usize)>;

    /// Removes one occurrence of the item stored in `slot`.
    ///
    /// Returns `None` if there is no such slot.
    fn decrement(&mut self, slot: usize) -> Option<Decrement>;

    /// Adds `n` occurrences of `item`, returning how many there were before.
    ///
    /// # Panics
    ///
    /// Panics if the total number of occurrences would exceed `usize::MAX`.
    fn insert_many(&mut self, item: T, n: usize) -> usize {
        match self.try_insert_many(item, n) {
            Ok(previous) => previous,
            Err(err) => panic!("{}", err),
        }
    }

    /// Adds a single occurrence of `item`.
    fn insert(&mut self, item: T) {
        self.insert_many(item, 1);
    }

    /// Returns `true` if at least one occurrence of `item` is present.
    fn contains(&self, item: &T) -> bool {
        self.count(item) > 0
    }

    /// Returns `true` if there are no occurrences at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both collections hold the same items with the same counts,
    /// regardless of insertion order.
    fn eq_counts(&self, other: &dyn Multiset<T>) -> bool {
        if self.len() != other.len() {
            return false;
        }

        // Equal totals make a one-sided comparison sufficient.
        (0..self.distinct_len()).all(|slot| match self.entry(slot) {
            Some((item, count)) => other.count(item) == count,
            None => false,
        })
    }

    /// Returns a cursor visiting every occurrence, able to remove them one at a time.
    fn cursor(&mut self) -> Cursor<'_, T, Self>
    where
        Self: Sized,
    {
        Cursor::new(self)
    }

    /// Retains only the occurrences specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::{CountedMultiset, Multiset};
    ///
    /// let mut set = CountedMultiset::from([1, 1, 2, 3, 3, 3]);
    /// set.retain(|&x| x != 3);
    ///
    /// assert_eq!(set.len(), 3);
    /// assert_eq!(set.to_string(), "[1 x 2, 2 x 1]");
    /// ```
    fn retain<F>(&mut self, mut f: F)
    where
        Self: Sized,
        F: FnMut(&T) -> bool,
    {
        let mut cursor = Cursor::new(self);

        while let Ok(item) = cursor.next() {
            if !f(item) {
                let removed = cursor.remove();
                debug_assert_eq!(removed, Ok(()));
            }
        }
    }
}
