use crate::cursor::Cursor;
use crate::error::CountOverflow;
use crate::iter::{Entries, IntoIter, Iter};
use crate::multiset::{Decrement, Multiset};
use log::{debug, trace};
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

/// Multiset implementation storing each distinct item once, alongside its number of occurrences.
///
/// Items are kept in a vector in the order they were first inserted and are found by linear
/// search, so only `T: Eq` is required. See [`HashMultiset`](crate::HashMultiset) for a
/// hash-indexed alternative.
///
/// # Examples
///
/// ```
/// use counted_multiset::CountedMultiset;
///
/// let mut set = CountedMultiset::new();
/// set.insert_many("a", 3);
/// set.insert_many("b", 2);
///
/// assert_eq!(set.len(), 5);
/// assert_eq!(set.count("a"), 3);
/// assert!(set.remove("a"));
/// assert_eq!(set.count("a"), 2);
/// assert_eq!(set.to_string(), "[a x 2, b x 2]");
/// ```
#[derive(Clone)]
pub struct CountedMultiset<T> {
    entries: Vec<(T, usize)>,
    len: usize,
}

impl<T> CountedMultiset<T> {
    /// Creates an empty `CountedMultiset` with a capacity of 0,
    /// so it will not allocate until it is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::CountedMultiset;
    ///
    /// let set: CountedMultiset<i32> = CountedMultiset::new();
    ///
    /// assert_eq!(set.capacity(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty `CountedMultiset` with room for at least `capacity` distinct items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Returns the number of distinct items the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Reserves capacity for at least `additional` more distinct items.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Shrinks the capacity of the set as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// Returns the total number of occurrences in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of distinct items in the set.
    pub fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all occurrences. Keeps the allocated memory for reuse.
    pub fn clear(&mut self) {
        debug!(
            "clearing {} occurrences of {} distinct items",
            self.len,
            self.entries.len()
        );
        self.entries.clear();
        self.len = 0;
    }

    /// An iterator visiting every occurrence, each item repeated as many times as it was
    /// inserted, in first-insertion order. The iterator element type is `&'a T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::CountedMultiset;
    ///
    /// let set = CountedMultiset::from(['b', 'a', 'b']);
    /// let items: Vec<_> = set.iter().collect();
    ///
    /// assert_eq!(items, [&'b', &'b', &'a']);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.entries, self.len)
    }

    /// An iterator visiting every distinct item once, together with its count.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries::new(&self.entries)
    }

    fn check_len(&self) {
        debug_assert_eq!(
            self.len,
            self.entries.iter().map(|(_, count)| count).sum::<usize>()
        );
    }
}

impl<T> CountedMultiset<T>
where
    T: Eq,
{
    /// Adds a single occurrence of `value` to the set.
    pub fn insert(&mut self, value: T) {
        self.insert_many(value, 1);
    }

    /// Adds `n` occurrences of `value` to the set, returning how many there were before.
    ///
    /// Adding zero occurrences leaves the set untouched and returns 0.
    ///
    /// # Panics
    ///
    /// Panics if the total number of occurrences would exceed `usize::MAX`.
    /// See [`try_insert_many`](Self::try_insert_many) for a non-panicking version.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::CountedMultiset;
    ///
    /// let mut set = CountedMultiset::new();
    ///
    /// assert_eq!(set.insert_many('x', 2), 0);
    /// assert_eq!(set.insert_many('x', 3), 2);
    /// assert_eq!(set.insert_many('x', 0), 0);
    /// assert_eq!(set.count(&'x'), 5);
    /// ```
    pub fn insert_many(&mut self, value: T, n: usize) -> usize {
        match self.try_insert_many(value, n) {
            Ok(previous) => previous,
            Err(err) => panic!("{}", err),
        }
    }

    /// Adds `n` occurrences of `value` to the set, returning how many there were before.
    ///
    /// If the total number of occurrences would exceed `usize::MAX`, the set is left untouched
    /// and an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::{CountOverflow, CountedMultiset};
    ///
    /// let mut set = CountedMultiset::new();
    ///
    /// assert_eq!(set.try_insert_many('x', usize::MAX), Ok(0));
    /// assert_eq!(set.try_insert_many('y', 1), Err(CountOverflow));
    /// assert!(!set.contains(&'y'));
    /// ```
    pub fn try_insert_many(&mut self, value: T, n: usize) -> Result<usize, CountOverflow> {
        if n == 0 {
            return Ok(0);
        }

        // No single count exceeds the total, so a total that fits means the count fits too.
        let len = self.len.checked_add(n).ok_or(CountOverflow)?;

        let previous = match self.position(&value) {
            Some(slot) => {
                let count = &mut self.entries[slot].1;
                let previous = *count;
                *count += n;
                previous
            }
            None => {
                trace!("new entry at slot {} with count {}", self.entries.len(), n);
                self.entries.push((value, n));
                0
            }
        };

        self.len = len;
        self.check_len();
        Ok(previous)
    }

    /// Removes a single occurrence of `value`. Returns whether the value was present in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::CountedMultiset;
    ///
    /// let mut set = CountedMultiset::new();
    /// set.insert_many(1, 2);
    ///
    /// assert!(set.remove(&1));
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert!(set.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        match self.position(value) {
            Some(slot) => self.decrement_slot(slot).is_some(),
            None => false,
        }
    }

    /// Returns `true` if the set contains at least one occurrence of `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(value).is_some()
    }

    /// Returns the number of occurrences of `value` in the set.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(value)
            .map_or(0, |slot| self.entries[slot].1)
    }

    /// Returns a cursor over every occurrence which can remove them one at a time.
    pub fn cursor(&mut self) -> Cursor<'_, T, Self> {
        Cursor::new(self)
    }

    fn position<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries
            .iter()
            .position(|(item, _)| item.borrow() == value)
    }

    fn decrement_slot(&mut self, slot: usize) -> Option<Decrement> {
        let count = &mut self.entries.get_mut(slot)?.1;
        self.len -= 1;

        let outcome = if *count > 1 {
            *count -= 1;
            Decrement::Retained(*count)
        } else {
            self.entries.remove(slot);
            trace!("entry at slot {} removed", slot);
            Decrement::Removed
        };

        self.check_len();
        Some(outcome)
    }
}

impl<T> Multiset<T> for CountedMultiset<T>
where
    T: Eq,
{
    fn try_insert_many(&mut self, item: T, n: usize) -> Result<usize, CountOverflow> {
        CountedMultiset::try_insert_many(self, item, n)
    }

    fn remove(&mut self, item: &T) -> bool {
        CountedMultiset::remove(self, item)
    }

    fn count(&self, item: &T) -> usize {
        CountedMultiset::count(self, item)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        CountedMultiset::clear(self);
    }

    fn entry(&self, slot: usize) -> Option<(&T, usize)> {
        self.entries.get(slot).map(|(item, count)| (item, *count))
    }

    fn decrement(&mut self, slot: usize) -> Option<Decrement> {
        self.decrement_slot(slot)
    }
}

impl<T, M> PartialEq<M> for CountedMultiset<T>
where
    T: Eq,
    M: Multiset<T>,
{
    fn eq(&self, other: &M) -> bool {
        self.eq_counts(other)
    }
}

impl<T: Eq> Eq for CountedMultiset<T> {}

impl<T: Eq + Hash> Hash for CountedMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        crate::hash_entries(state, self.len, self.entries());
    }
}

impl<T: Eq> FromIterator<T> for CountedMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Eq> Extend<T> for CountedMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> Extend<&'a T> for CountedMultiset<T>
where
    T: 'a + Eq + Copy,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a CountedMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for CountedMultiset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.entries, self.len)
    }
}

impl<T> Default for CountedMultiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for CountedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<T: Display> Display for CountedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::fmt_entries(f, self.entries())
    }
}

impl<T: Eq, const N: usize> From<[T; N]> for CountedMultiset<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}
