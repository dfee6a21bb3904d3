use crate::{error, Change};
use core::hash::Hash;
use dashmap::{mapref::entry::Entry, DashMap};
use tokio::sync::broadcast;

/// A keyed set of records. Every single-record operation runs under the record's shard lock, so a
/// filter and the write it guards are atomic with respect to other writers of the same record.
/// Nothing is atomic across records or collections.
pub struct Collection<K, T> {
    records: DashMap<K, T>,
    change: Change,
    feed: broadcast::Sender<Change>,
}

impl<K, T> Collection<K, T>
where
    K: Copy + Ord + Hash,
    T: Clone,
{
    pub(crate) fn new(change: Change, feed: broadcast::Sender<Change>) -> Self {
        Self { records: DashMap::new(), change, feed }
    }

    fn notify(&self) {
        match self.feed.send(self.change) {
            Ok(count) => log::debug!("{:?} changed; notified {count} subscribers.", self.change),
            Err(_) => log::trace!("{:?} changed with no subscribers.", self.change),
        }
    }

    pub fn get(&self, key: &K) -> Option<T> {
        self.records.get(key).map(|record| record.value().clone())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every record matching `filter`, ordered by key.
    pub fn find<F>(&self, mut filter: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut found: Vec<_> = self
            .records
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        found.sort_unstable_by_key(|&(key, _)| key);
        found.into_iter().map(|(_, record)| record).collect()
    }

    pub fn insert(&self, key: K, record: T) {
        self.records.insert(key, record);
        self.notify();
    }

    /// Applies `set` to the record at `key` only if `filter` accepts its current state.
    pub fn update<F, S>(&self, key: &K, filter: F, set: S) -> error::Result<()>
    where
        F: FnOnce(&T) -> bool,
        S: FnOnce(&mut T),
    {
        {
            let mut record = self.records.get_mut(key).ok_or(error::Error::NotFound)?;
            if !filter(record.value()) {
                return Err(error::Error::NotFound);
            }
            set(record.value_mut());
        }
        self.notify();
        Ok(())
    }

    /// Inserts a fresh record if `key` is vacant, otherwise applies `set` to the existing one.
    /// Returns `true` if a record was inserted.
    pub fn upsert<I, S>(&self, key: K, insert: I, set: S) -> bool
    where
        I: FnOnce() -> T,
        S: FnOnce(&mut T),
    {
        let inserted = match self.records.entry(key) {
            Entry::Occupied(mut entry) => {
                set(entry.get_mut());
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(insert());
                true
            }
        };
        self.notify();
        inserted
    }

    pub fn remove<F>(&self, key: &K, filter: F) -> error::Result<T>
    where
        F: FnOnce(&T) -> bool,
    {
        let (_, record) = self.records.remove_if(key, |_, record| filter(record)).ok_or(error::Error::NotFound)?;
        self.notify();
        Ok(record)
    }

    /// Removes every record matching `filter` and returns them.
    pub fn remove_where<F>(&self, mut filter: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        self.records.retain(|_, record| {
            if filter(record) {
                removed.push(record.clone());
                return false;
            }
            true
        });
        if !removed.is_empty() {
            self.notify();
        }
        removed
    }

    /// Applies `set` to every record matching `filter`. Returns the number of records touched.
    pub fn update_where<F, S>(&self, mut filter: F, mut set: S) -> usize
    where
        F: FnMut(&T) -> bool,
        S: FnMut(&mut T),
    {
        let mut count = 0;
        for mut entry in self.records.iter_mut() {
            if filter(entry.value()) {
                set(entry.value_mut());
                count += 1;
            }
        }
        if count > 0 {
            self.notify();
        }
        count
    }
}
