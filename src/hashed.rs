use crate::cursor::Cursor;
use crate::error::CountOverflow;
use crate::iter::{Entries, IntoIter, Iter};
use crate::multiset::{Decrement, Multiset};
use hashbrown::raw::RawTable;
use hashbrown::TryReserveError;
use log::{debug, trace};
use std::alloc::Layout;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug, Display};
use std::hash::{BuildHasher, Hash, Hasher};

/// Multiset implementation storing each distinct item once, indexed by a hash table.
///
/// Behaves exactly like [`CountedMultiset`](crate::CountedMultiset), including first-insertion
/// ordering, but finds items in constant time on average. The table stores slots into the
/// ordered entry vector.
///
/// # Examples
///
/// ```
/// use counted_multiset::HashMultiset;
///
/// let mut set = HashMultiset::new();
/// set.insert(1);
/// set.insert(1);
/// set.insert(2);
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.distinct_len(), 2);
/// ```
#[derive(Clone)]
pub struct HashMultiset<T, S = RandomState> {
    hash_builder: S,
    table: RawTable<usize>,
    entries: Vec<(T, usize)>,
    len: usize,
}

impl<T> HashMultiset<T, RandomState> {
    /// Creates an empty `HashMultiset` with a capacity of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }

    /// Creates an empty `HashMultiset` with room for at least `capacity` distinct items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<T, S> HashMultiset<T, S> {
    /// Creates an empty `HashMultiset` which will use the given hash builder to hash items.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::new(),
            entries: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty `HashMultiset` with room for at least `capacity` distinct items,
    /// using the given hash builder to hash items.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Returns the number of distinct items the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity().min(self.entries.capacity())
    }

    /// Returns a reference to the set's [`BuildHasher`].
    pub const fn hasher(&self) -> &S {
        &self.hash_builder
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
        self.table.clear();
        self.entries.clear();
        self.len = 0;
    }

    /// An iterator visiting every occurrence in first-insertion order.
    /// The iterator element type is `&'a T`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.entries, self.len)
    }

    /// An iterator visiting every distinct item once, together with its count.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries::new(&self.entries)
    }

    fn check_len(&self) {
        debug_assert_eq!(self.table.len(), self.entries.len());
        debug_assert_eq!(
            self.len,
            self.entries.iter().map(|(_, count)| count).sum::<usize>()
        );
    }
}

impl<T, S> HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Reserves capacity for at least `additional` more distinct items.
    pub fn reserve(&mut self, additional: usize) {
        let entries = &self.entries;
        let hash_builder = &self.hash_builder;

        self.table
            .reserve(additional, |&slot| make_hash(hash_builder, &entries[slot].0));
        self.entries.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more distinct items.
    ///
    /// # Errors
    ///
    /// Returns [`TryReserveError::CapacityOverflow`] if the requested capacity cannot be
    /// represented, or [`TryReserveError::AllocError`] if the allocator reports a failure.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let entries = &self.entries;
        let hash_builder = &self.hash_builder;

        self.table
            .try_reserve(additional, |&slot| make_hash(hash_builder, &entries[slot].0))?;

        self.entries.try_reserve(additional).map_err(|_| {
            // A representable layout means the request itself was valid and allocation failed.
            match self
                .entries
                .len()
                .checked_add(additional)
                .and_then(|capacity| Layout::array::<(T, usize)>(capacity).ok())
            {
                Some(layout) => TryReserveError::AllocError { layout },
                None => TryReserveError::CapacityOverflow,
            }
        })
    }

    /// Shrinks the capacity of the set as much as possible.
    pub fn shrink_to_fit(&mut self) {
        let entries = &self.entries;
        let hash_builder = &self.hash_builder;

        self.table
            .shrink_to(0, |&slot| make_hash(hash_builder, &entries[slot].0));
        self.entries.shrink_to_fit();
    }

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
    pub fn insert_many(&mut self, value: T, n: usize) -> usize {
        match self.try_insert_many(value, n) {
            Ok(previous) => previous,
            Err(err) => panic!("{}", err),
        }
    }

    /// Adds `n` occurrences of `value` to the set, returning how many there were before,
    /// or leaves the set untouched if the total number of occurrences would exceed `usize::MAX`.
    pub fn try_insert_many(&mut self, value: T, n: usize) -> Result<usize, CountOverflow> {
        if n == 0 {
            return Ok(0);
        }

        let len = self.len.checked_add(n).ok_or(CountOverflow)?;
        let hash = make_hash(&self.hash_builder, &value);

        if let Some(&slot) = self.table.get(hash, equivalent_key(&value, &self.entries)) {
            let count = &mut self.entries[slot].1;
            let previous = *count;
            *count += n;
            self.len = len;
            self.check_len();
            return Ok(previous);
        }

        let slot = self.entries.len();
        let entries = &self.entries;
        let hash_builder = &self.hash_builder;

        self.table
            .insert(hash, slot, |&x| make_hash(hash_builder, &entries[x].0));
        self.entries.push((value, n));
        self.len = len;
        trace!("new entry at slot {} with count {}", slot, n);

        self.check_len();
        Ok(0)
    }

    /// Removes a single occurrence of `value`. Returns whether the value was present in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::HashMultiset;
    ///
    /// let mut set = HashMultiset::new();
    /// set.insert_many("a", 2);
    ///
    /// assert!(set.remove("a"));
    /// assert!(set.remove("a"));
    /// assert!(!set.remove("a"));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(value) {
            Some(slot) => self.decrement_slot(slot).is_some(),
            None => false,
        }
    }

    /// Returns `true` if the set contains at least one occurrence of `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(value).is_some()
    }

    /// Returns the number of occurrences of `value` in the set.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(value).map_or(0, |slot| self.entries[slot].1)
    }

    /// Returns a cursor over every occurrence which can remove them one at a time.
    pub fn cursor(&mut self) -> Cursor<'_, T, Self> {
        Cursor::new(self)
    }

    fn find<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, value);

        self.table
            .get(hash, equivalent_key(value, &self.entries))
            .copied()
    }

    fn decrement_slot(&mut self, slot: usize) -> Option<Decrement> {
        let count = &mut self.entries.get_mut(slot)?.1;
        self.len -= 1;

        if *count > 1 {
            *count -= 1;
            let count = *count;
            self.check_len();
            return Some(Decrement::Retained(count));
        }

        let hash = make_hash(&self.hash_builder, &self.entries[slot].0);
        let erased = self.table.erase_entry(hash, |&x| x == slot);
        debug_assert!(erased);
        self.entries.remove(slot);

        // Later entries moved down by one.
        unsafe {
            for bucket in self.table.iter() {
                let x = bucket.as_mut();
                if *x > slot {
                    *x -= 1;
                }
            }
        }
        trace!("entry at slot {} removed, later slots reindexed", slot);
        self.check_len();

        Some(Decrement::Removed)
    }
}

impl<T, S> Multiset<T> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn try_insert_many(&mut self, item: T, n: usize) -> Result<usize, CountOverflow> {
        HashMultiset::try_insert_many(self, item, n)
    }

    fn remove(&mut self, item: &T) -> bool {
        HashMultiset::remove(self, item)
    }

    fn count(&self, item: &T) -> usize {
        HashMultiset::count(self, item)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        HashMultiset::clear(self);
    }

    fn entry(&self, slot: usize) -> Option<(&T, usize)> {
        self.entries.get(slot).map(|(item, count)| (item, *count))
    }

    fn decrement(&mut self, slot: usize) -> Option<Decrement> {
        self.decrement_slot(slot)
    }
}

impl<T, S, M> PartialEq<M> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    M: Multiset<T>,
{
    fn eq(&self, other: &M) -> bool {
        self.eq_counts(other)
    }
}

impl<T, S> Eq for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> Hash for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        crate::hash_entries(state, self.len, self.entries());
    }
}

impl<T, S> FromIterator<T> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for HashMultiset<T, S>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, S> IntoIterator for &'a HashMultiset<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Clone, S> IntoIterator for HashMultiset<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.entries, self.len)
    }
}

impl<T, S> Default for HashMultiset<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Debug, S> Debug for HashMultiset<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<T: Display, S> Display for HashMultiset<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::fmt_entries(f, self.entries())
    }
}

impl<T, const N: usize> From<[T; N]> for HashMultiset<T, RandomState>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

fn equivalent_key<'a, Q, T>(k: &'a Q, entries: &'a [(T, usize)]) -> impl Fn(&usize) -> bool + 'a
where
    T: Borrow<Q>,
    Q: ?Sized + Eq,
{
    move |slot: &usize| k == entries[*slot].0.borrow()
}

fn make_hash<T, S>(hash_builder: &S, value: &T) -> u64
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    value.hash(&mut state);
    state.finish()
}
