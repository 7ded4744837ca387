#![forbid(unsafe_code)]

//! Identity-keyed record storage shared by every registry.
//!
//! A [`Record`] owns the live subscriptions of one binding plus `Weak`
//! anchors to its participants. The anchors keep participant addresses
//! reserved, so an [`ObjectId`](ftui_notify::ObjectId) in a key can never be
//! reused by a different object while the record exists.
//!
//! Tables never drop records themselves on removal: every removal hands the
//! records back to the caller, which drops them after releasing its borrow.

use std::any::Any;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use ftui_notify::Subscription;

/// Type-erased weak handle on a participant.
pub(crate) type Anchor = Weak<dyn Any>;

pub(crate) fn anchor<T: 'static>(participant: &Rc<T>) -> Anchor {
    let weak: Weak<T> = Rc::downgrade(participant);
    weak
}

/// One live binding.
pub(crate) struct Record<M = ()> {
    pub(crate) meta: M,
    subscriptions: Vec<Subscription>,
    anchors: Vec<Anchor>,
}

impl<M> Record<M> {
    pub(crate) fn new(meta: M, subscriptions: Vec<Subscription>, anchors: Vec<Anchor>) -> Self {
        Self {
            meta,
            subscriptions,
            anchors,
        }
    }

    /// Whether every participant is still alive.
    pub(crate) fn is_alive(&self) -> bool {
        self.anchors.iter().all(|a| a.strong_count() > 0)
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// Records keyed by their identity tuple.
pub(crate) struct RecordTable<K, M = ()> {
    records: AHashMap<K, Record<M>>,
}

impl<K, M> Default for RecordTable<K, M> {
    fn default() -> Self {
        Self {
            records: AHashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, M> RecordTable<K, M> {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    /// Insert a record. On a key collision the table is unchanged and the
    /// rejected record is handed back.
    pub(crate) fn insert(&mut self, key: K, record: Record<M>) -> Result<(), Record<M>> {
        if self.records.contains_key(&key) {
            return Err(record);
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<Record<M>> {
        self.records.remove(key)
    }

    /// Remove every record matching `pred` and return them.
    pub(crate) fn take_where(
        &mut self,
        pred: impl Fn(&K, &Record<M>) -> bool,
    ) -> Vec<(K, Record<M>)> {
        let keys: Vec<K> = self
            .records
            .iter()
            .filter(|&(k, r)| pred(k, r))
            .map(|(k, _)| *k)
            .collect();
        keys.into_iter()
            .filter_map(|k| self.records.remove(&k).map(|r| (k, r)))
            .collect()
    }

    pub(crate) fn any(&self, pred: impl Fn(&K, &Record<M>) -> bool) -> bool {
        self.records.iter().any(|(k, r)| pred(k, r))
    }

    pub(crate) fn count_where(&self, pred: impl Fn(&K, &Record<M>) -> bool) -> usize {
        self.records.iter().filter(|&(k, r)| pred(k, r)).count()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.records.keys()
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.records.values().map(Record::subscription_count).sum()
    }
}
