use core::fmt::Debug;
use std::collections::hash_map;
use std::collections::HashMap;

use super::Rank;

pub struct DataByRank<T>(HashMap<Rank, T>);

impl<T> Debug for DataByRank<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> Clone for DataByRank<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> DataByRank<T> {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, rank: &Rank) -> Option<&T> {
        self.0.get(rank)
    }

    pub fn remove(&mut self, rank: &Rank) -> Option<T> {
        self.0.remove(rank)
    }

    pub fn insert(&mut self, rank: Rank, data: T) {
        self.0.insert(rank, data);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_sorted(self) -> impl Iterator<Item = (Rank, T)> {
        let mut entries: Vec<_> = self.0.into_iter().collect();
        entries.sort_by_key(|(rank, _)| *rank);
        entries.into_iter()
    }
}

impl<T> FromIterator<(Rank, T)> for DataByRank<T> {
    fn from_iter<I: IntoIterator<Item = (Rank, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for DataByRank<T> {
    type Item = (Rank, T);

    type IntoIter = hash_map::IntoIter<Rank, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
