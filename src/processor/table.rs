//! Queue table and the entry access protocol
//!
//! Two lock levels:
//!
//! - the table `RwLock` guards the key to entry map. It is held only for
//!   lookups (read) and for inserting or erasing entries (write), never while
//!   waiting on an entry lock. The single exception is a freshly inserted
//!   entry, which is locked before the write lock is released so creation and
//!   first lock form one step. Nobody else can see that entry yet, so the
//!   lock is uncontended.
//! - each entry `Mutex` serialises every operation on one key.
//!
//! Releasing is done by [`EntryAccess`]'s `Drop`, so it runs on every exit
//! path, including early error returns and unwinding out of a consumer.

use crate::core::error_handling::log_error_with_context;
use crate::core::sync::{handle_mutex_poison, handle_rwlock_read, handle_rwlock_write};
use crate::processor::entry::QueueEntry;
use crate::processor::error::{ProcessorError, ProcessorResult};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockWriteGuard};

pub(crate) type SharedEntry<'c, K, V> = Arc<Mutex<QueueEntry<'c, K, V>>>;

type EntryMap<'c, K, V> = HashMap<K, SharedEntry<'c, K, V>>;

/// Table write lock still held after inserting a new entry
type CreationLock<'t, 'c, K, V> = RwLockWriteGuard<'t, EntryMap<'c, K, V>>;

/// Whether resolving a key may create its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    CreateIfAbsent,
    ExistingOnly,
}

pub(crate) struct QueueTable<'c, K, V> {
    entries: RwLock<EntryMap<'c, K, V>>,
}

impl<'c, K, V> QueueTable<'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Run `op` with exclusive access to the entry for `key`
    ///
    /// With [`Access::ExistingOnly`] an absent key fails with
    /// [`ProcessorError::UnknownKey`] and `op` is not called. Whatever `op`
    /// returns, the entry is released afterwards and erased if it is idle.
    pub(crate) fn with_entry<R>(
        &self,
        key: &K,
        access: Access,
        op: impl FnOnce(&mut QueueEntry<'c, K, V>) -> ProcessorResult<R>,
    ) -> ProcessorResult<R> {
        loop {
            let Some((cell, creation_lock)) = self.resolve(key, access)? else {
                return Err(ProcessorError::UnknownKey);
            };

            // A fresh entry's mutex cannot be poisoned, so this only fails
            // for existing entries, after the table lock is gone.
            let guard = handle_mutex_poison(cell.lock(), ProcessorError::poisoned)?;
            drop(creation_lock);

            if guard.is_retired() {
                // Erased while we waited; its key may already map to a new entry
                log::trace!("Queue for key {:?} was retired, resolving again", key);
                continue;
            }

            let mut entry = EntryAccess {
                table: self,
                key,
                cell: &cell,
                guard,
            };
            return op(&mut *entry);
        }
    }

    /// Look `key` up, inserting an empty entry when allowed
    ///
    /// Returns the table write lock alongside a newly inserted entry; the
    /// caller locks the entry before dropping it.
    #[allow(clippy::type_complexity)]
    fn resolve(
        &self,
        key: &K,
        access: Access,
    ) -> ProcessorResult<Option<(SharedEntry<'c, K, V>, Option<CreationLock<'_, 'c, K, V>>)>> {
        {
            let entries = handle_rwlock_read(self.entries.read(), ProcessorError::poisoned)?;
            if let Some(cell) = entries.get(key) {
                return Ok(Some((Arc::clone(cell), None)));
            }
        }

        if access == Access::ExistingOnly {
            return Ok(None);
        }

        let mut entries = handle_rwlock_write(self.entries.write(), ProcessorError::poisoned)?;
        if let Some(cell) = entries.get(key) {
            // Another thread created it between our read and write locks
            return Ok(Some((Arc::clone(cell), None)));
        }

        let cell = Arc::new(Mutex::new(QueueEntry::new()));
        entries.insert(key.clone(), Arc::clone(&cell));
        log::trace!("Created queue for key {:?}", key);

        Ok(Some((cell, Some(entries))))
    }

    /// Number of live entries
    pub(crate) fn len(&self) -> ProcessorResult<usize> {
        let entries = handle_rwlock_read(self.entries.read(), ProcessorError::poisoned)?;
        Ok(entries.len())
    }

    pub(crate) fn contains_key(&self, key: &K) -> ProcessorResult<bool> {
        let entries = handle_rwlock_read(self.entries.read(), ProcessorError::poisoned)?;
        Ok(entries.contains_key(key))
    }

    /// Handles to every live entry, taken under a short read lock
    pub(crate) fn snapshot(&self) -> ProcessorResult<Vec<SharedEntry<'c, K, V>>> {
        let entries = handle_rwlock_read(self.entries.read(), ProcessorError::poisoned)?;
        Ok(entries.values().cloned().collect())
    }

    /// Remove every entry, returning (entries, buffered items) discarded
    ///
    /// Exclusive access means no operation can be in flight, so poisoned
    /// locks are recovered rather than reported.
    pub(crate) fn clear(&mut self) -> (usize, usize) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        let queue_count = entries.len();
        let item_count = entries
            .drain()
            .map(|(_, cell)| {
                let mut entry = cell.lock().unwrap_or_else(PoisonError::into_inner);
                entry.retire();
                entry.len()
            })
            .sum::<usize>();

        (queue_count, item_count)
    }
}

/// Exclusive, scoped access to one entry
///
/// Dropping it performs the release step: an idle entry is erased from the
/// table and retired, anything else is simply unlocked.
pub(crate) struct EntryAccess<'a, 'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    table: &'a QueueTable<'c, K, V>,
    key: &'a K,
    cell: &'a SharedEntry<'c, K, V>,
    guard: MutexGuard<'a, QueueEntry<'c, K, V>>,
}

impl<'c, K, V> Deref for EntryAccess<'_, 'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    type Target = QueueEntry<'c, K, V>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<K, V> DerefMut for EntryAccess<'_, '_, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<K, V> Drop for EntryAccess<'_, '_, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn drop(&mut self) {
        if !self.guard.is_idle() {
            return;
        }

        match handle_rwlock_write(self.table.entries.write(), ProcessorError::poisoned) {
            Ok(mut entries) => {
                if entries
                    .get(self.key)
                    .is_some_and(|cell| Arc::ptr_eq(cell, self.cell))
                {
                    entries.remove(self.key);
                }
                self.guard.retire();
                log::trace!("Removed idle queue for key {:?}", self.key);
            }
            Err(e) => log_error_with_context(&e, "Removing idle queue entry"),
        }
        // The entry mutex unlocks when `guard` drops after this
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    type Table = QueueTable<'static, String, u32>;

    fn key(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn test_existing_only_on_absent_key() {
        let table = Table::new();
        let mut called = false;

        let result = table.with_entry(&key("missing"), Access::ExistingOnly, |_| {
            called = true;
            Ok(())
        });

        assert_eq!(result, Err(ProcessorError::UnknownKey));
        assert!(!called);
        assert_eq!(table.len().unwrap(), 0);
    }

    #[test]
    fn test_idle_entry_removed_on_release() {
        let table = Table::new();

        table
            .with_entry(&key("k"), Access::CreateIfAbsent, |entry| {
                assert!(entry.is_idle());
                Ok(())
            })
            .unwrap();

        assert!(!table.contains_key(&key("k")).unwrap());
    }

    #[test]
    fn test_entry_with_items_retained() {
        let table = Table::new();

        table
            .with_entry(&key("k"), Access::CreateIfAbsent, |entry| {
                entry.push(1);
                Ok(())
            })
            .unwrap();

        assert!(table.contains_key(&key("k")).unwrap());
        assert_eq!(table.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_error_path_still_releases() {
        let table = Table::new();

        let result: ProcessorResult<()> =
            table.with_entry(&key("k"), Access::CreateIfAbsent, |_| {
                Err(ProcessorError::QueueEmpty)
            });

        assert_eq!(result, Err(ProcessorError::QueueEmpty));
        // Released and erased: a second access does not deadlock
        assert!(!table.contains_key(&key("k")).unwrap());
        table
            .with_entry(&key("k"), Access::CreateIfAbsent, |entry| {
                entry.push(2);
                Ok(())
            })
            .unwrap();
        assert_eq!(table.len().unwrap(), 1);
    }

    #[test]
    fn test_waiter_on_retired_entry_resolves_again() {
        let table = Table::new();
        table
            .with_entry(&key("k"), Access::CreateIfAbsent, |entry| {
                entry.push(1);
                Ok(())
            })
            .unwrap();

        let (held_tx, held_rx) = mpsc::channel();
        let (go_tx, go_rx) = mpsc::channel::<()>();

        thread::scope(|s| {
            let table = &table;
            let draining = s.spawn(move || {
                table
                    .with_entry(&key("k"), Access::ExistingOnly, |entry| {
                        held_tx.send(()).unwrap();
                        go_rx.recv().unwrap();
                        Ok(entry.pop())
                    })
                    .unwrap()
            });

            held_rx.recv().unwrap();
            let pushing = s.spawn(move || {
                table.with_entry(&key("k"), Access::CreateIfAbsent, |entry| {
                    entry.push(5);
                    Ok(())
                })
            });
            go_tx.send(()).unwrap();

            assert_eq!(draining.join().unwrap(), Some(1));
            pushing.join().unwrap().unwrap();
        });

        // Whichever entry the pusher locked, its item must be reachable
        let value = table
            .with_entry(&key("k"), Access::ExistingOnly, |entry| Ok(entry.pop()))
            .unwrap();
        assert_eq!(value, Some(5));
        assert_eq!(table.len().unwrap(), 0);
    }

    #[test]
    fn test_clear_reports_discarded_items() {
        let mut table = Table::new();
        for (name, count) in [("a", 2), ("b", 3)] {
            table
                .with_entry(&key(name), Access::CreateIfAbsent, |entry| {
                    for i in 0..count {
                        entry.push(i);
                    }
                    Ok(())
                })
                .unwrap();
        }

        assert_eq!(table.clear(), (2, 5));
        assert_eq!(table.len().unwrap(), 0);
    }
}
