use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::{slice, vec};

/// An iterator over every occurrence of a multiset, in first-insertion order.
///
/// Created by `iter` on [`CountedMultiset`](crate::CountedMultiset) and
/// [`HashMultiset`](crate::HashMultiset).
pub struct Iter<'a, T> {
    entries: slice::Iter<'a, (T, usize)>,
    front: Option<(&'a T, usize)>,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(entries: &'a [(T, usize)], len: usize) -> Self {
        Self {
            entries: entries.iter(),
            front: None,
            len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            front: self.front,
            len: self.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            match self.front {
                Some((item, remaining)) if remaining > 0 => {
                    self.front = Some((item, remaining - 1));
                    self.len -= 1;
                    return Some(item);
                }
                _ => {
                    let (item, count) = self.entries.next()?;
                    self.front = Some((item, *count));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the distinct items of a multiset and their counts.
pub struct Entries<'a, T> {
    iter: slice::Iter<'a, (T, usize)>,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(entries: &'a [(T, usize)]) -> Self {
        Self {
            iter: entries.iter(),
        }
    }
}

impl<T> Clone for Entries<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<(&'a T, usize)> {
        self.iter.next().map(|(item, count)| (item, *count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Entries<'_, T> {}

impl<T: Debug> Debug for Entries<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over every occurrence of a multiset.
///
/// All but the last occurrence of each item are clones.
pub struct IntoIter<T> {
    entries: vec::IntoIter<(T, usize)>,
    front: Option<(T, usize)>,
    len: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(entries: Vec<(T, usize)>, len: usize) -> Self {
        Self {
            entries: entries.into_iter(),
            front: None,
            len,
        }
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            match self.front.take() {
                Some((item, remaining)) if remaining > 1 => {
                    self.front = Some((item.clone(), remaining - 1));
                    self.len -= 1;
                    return Some(item);
                }
                Some((item, _)) => {
                    self.len -= 1;
                    return Some(item);
                }
                None => self.front = Some(self.entries.next()?),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<T: Clone> FusedIterator for IntoIter<T> {}

impl<T: Debug> Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("front", &self.front)
            .field("entries", &self.entries.as_slice())
            .finish()
    }
}
