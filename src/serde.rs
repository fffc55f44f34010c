use crate::{CountedMultiset, HashMultiset, Multiset};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

// Both multisets are written as a sequence of `(item, count)` pairs in first-insertion order.

impl<T> Serialize for CountedMultiset<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.entries())
    }
}

impl<T, H> Serialize for HashMultiset<T, H>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.entries())
    }
}

impl<'de, T> Deserialize<'de> for CountedMultiset<T>
where
    T: Deserialize<'de> + Eq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(EntriesVisitor::<T, Self> {
            marker: PhantomData,
        })
    }
}

impl<'de, T, S> Deserialize<'de> for HashMultiset<T, S>
where
    T: Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(EntriesVisitor::<T, Self> {
            marker: PhantomData,
        })
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesInPlaceVisitor<'a, T, S>(&'a mut HashMultiset<T, S>);

        impl<'a, 'de, T, S> Visitor<'de> for EntriesInPlaceVisitor<'a, T, S>
        where
            T: Deserialize<'de> + Eq + Hash,
            S: BuildHasher + Default,
        {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a sequence of (item, count) pairs")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                self.0.clear();
                self.0.reserve(seq.size_hint().unwrap_or(0));

                while let Some((item, count)) = seq.next_element::<(T, usize)>()? {
                    self.0
                        .try_insert_many(item, count)
                        .map_err(de::Error::custom)?;
                }

                Ok(())
            }
        }

        deserializer.deserialize_seq(EntriesInPlaceVisitor(place))
    }
}

struct EntriesVisitor<T, M> {
    marker: PhantomData<fn() -> (T, M)>,
}

impl<'de, T, M> Visitor<'de> for EntriesVisitor<T, M>
where
    T: Deserialize<'de>,
    M: Multiset<T> + Default,
{
    type Value = M;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of (item, count) pairs")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = M::default();

        // Repeated items merge and zero counts are dropped, as with `insert_many`.
        while let Some((item, count)) = seq.next_element::<(T, usize)>()? {
            values
                .try_insert_many(item, count)
                .map_err(de::Error::custom)?;
        }

        Ok(values)
    }
}
