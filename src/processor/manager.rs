//! MultiQueueProcessor - keyed queue multiplexer
//!
//! Owns one queue table and implements the four queue operations on top of
//! the table's entry access protocol. Each operation holds exactly one entry
//! lock for its whole duration, so operations on the same key are totally
//! ordered while operations on different keys never wait for each other.

use crate::core::config::{ProcessorConfig, DEFAULT_CAPACITY};
use crate::core::sync::handle_mutex_poison;
use crate::processor::consumer::Consumer;
use crate::processor::error::{ProcessorError, ProcessorResult};
use crate::processor::table::{Access, QueueTable};
use crate::processor::types::ProcessorStats;
use std::fmt::Debug;
use std::hash::Hash;

/// Keyed FIFO queues with per-key push or pull delivery
///
/// Every key starts absent. `enqueue` buffers items (pull mode) until a
/// consumer subscribes; `subscribe` flushes the buffer to the consumer and
/// from then on `enqueue` hands items straight to it (push mode). A key's
/// storage is released as soon as it holds no items and no consumer, so
/// dequeuing the last item or unsubscribing makes the key unknown again.
///
/// # Thread Safety
///
/// All operations take `&self`; share the processor by reference, e.g. with
/// `std::thread::scope` or an `Arc`. Consumers are borrowed for `'c`, which
/// the borrow checker ensures outlives the processor.
///
/// # Example
///
/// ```rust
/// use keyqueue::processor::api::{MultiQueueProcessor, ProcessorError};
///
/// let processor = MultiQueueProcessor::with_capacity(3);
/// for value in 1..=3 {
///     processor.enqueue(&"x", value).unwrap();
/// }
/// assert_eq!(
///     processor.enqueue(&"x", 4),
///     Err(ProcessorError::QueueFull { capacity: 3 })
/// );
///
/// assert_eq!(processor.dequeue(&"x"), Ok(1));
/// processor.enqueue(&"x", 4).unwrap();
/// ```
pub struct MultiQueueProcessor<'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    table: QueueTable<'c, K, V>,
    capacity: usize,
}

impl<'c, K, V> Default for MultiQueueProcessor<'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'c, K, V> MultiQueueProcessor<'c, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Processor with the default per-key capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Processor with an explicit per-key capacity
    ///
    /// A capacity of zero is raised to one; use [`ProcessorConfig::new`] to
    /// have invalid capacities rejected instead.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: QueueTable::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn with_config(config: &ProcessorConfig) -> Self {
        Self::with_capacity(config.capacity())
    }

    /// Maximum number of buffered items per key
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Attach `consumer` to `key` and flush the key's buffer to it
    ///
    /// Buffered items are delivered in order, on this thread, before this
    /// returns. No enqueue on the same key can interleave with the flush.
    ///
    /// # Errors
    ///
    /// [`ProcessorError::AlreadySubscribed`] if the key already has a consumer.
    pub fn subscribe(&self, key: &K, consumer: &'c dyn Consumer<K, V>) -> ProcessorResult<()> {
        self.table.with_entry(key, Access::CreateIfAbsent, |entry| {
            if entry.has_subscriber() {
                return Err(ProcessorError::AlreadySubscribed);
            }

            entry.attach(consumer);

            let pending = entry.len();
            while let Some(value) = entry.pop() {
                consumer.consume(key, value);
            }

            log::debug!(
                "Subscribed consumer to key {:?}, flushed {} buffered items",
                key,
                pending
            );
            Ok(())
        })
    }

    /// Detach the consumer from `key`
    ///
    /// The key holds no items while subscribed, so it becomes absent.
    ///
    /// # Errors
    ///
    /// [`ProcessorError::UnknownKey`] if the key has no queue,
    /// [`ProcessorError::NoSubscriber`] if it is not subscribed.
    pub fn unsubscribe(&self, key: &K) -> ProcessorResult<()> {
        self.table.with_entry(key, Access::ExistingOnly, |entry| {
            if !entry.has_subscriber() {
                return Err(ProcessorError::NoSubscriber);
            }

            entry.detach();
            log::debug!("Unsubscribed consumer from key {:?}", key);
            Ok(())
        })
    }

    /// Add `value` to the queue for `key`
    ///
    /// Delivered to the consumer immediately if the key is subscribed,
    /// buffered otherwise.
    ///
    /// # Errors
    ///
    /// [`ProcessorError::QueueFull`] if the key already buffers `capacity`
    /// items. Never waits for space.
    pub fn enqueue(&self, key: &K, value: V) -> ProcessorResult<()> {
        self.table.with_entry(key, Access::CreateIfAbsent, |entry| {
            if entry.is_full(self.capacity) {
                log::debug!(
                    "Rejected item for key {:?}: queue full ({} items)",
                    key,
                    self.capacity
                );
                return Err(ProcessorError::QueueFull {
                    capacity: self.capacity,
                });
            }

            match entry.subscriber() {
                Some(consumer) => consumer.consume(key, value),
                None => entry.push(value),
            }
            Ok(())
        })
    }

    /// Remove and return the oldest buffered item for `key`
    ///
    /// # Errors
    ///
    /// [`ProcessorError::UnknownKey`] if the key has no queue (including a
    /// queue that was just drained), [`ProcessorError::HasSubscriber`] if the
    /// key is in push mode, [`ProcessorError::QueueEmpty`] if nothing is
    /// buffered. Never waits for data.
    pub fn dequeue(&self, key: &K) -> ProcessorResult<V> {
        self.table.with_entry(key, Access::ExistingOnly, |entry| {
            if entry.has_subscriber() {
                return Err(ProcessorError::HasSubscriber);
            }

            entry.pop().ok_or(ProcessorError::QueueEmpty)
        })
    }

    /// Number of keys that currently have a queue
    pub fn queue_count(&self) -> ProcessorResult<usize> {
        self.table.len()
    }

    pub fn contains_key(&self, key: &K) -> ProcessorResult<bool> {
        self.table.contains_key(key)
    }

    /// Number of items buffered for `key`, zero for an absent key
    pub fn buffered_len(&self, key: &K) -> ProcessorResult<usize> {
        absent_as_default(self.table.with_entry(key, Access::ExistingOnly, |entry| {
            Ok(entry.len())
        }))
    }

    /// Whether `key` currently has a consumer attached
    pub fn is_subscribed(&self, key: &K) -> ProcessorResult<bool> {
        absent_as_default(self.table.with_entry(key, Access::ExistingOnly, |entry| {
            Ok(entry.has_subscriber())
        }))
    }

    /// Collect per-key statistics
    ///
    /// Takes the table lock only to copy out entry handles, then visits each
    /// entry under its own lock.
    pub fn stats(&self) -> ProcessorResult<ProcessorStats> {
        let mut stats = ProcessorStats::default();

        for cell in self.table.snapshot()? {
            let entry = handle_mutex_poison(cell.lock(), ProcessorError::poisoned)?;
            if entry.is_retired() {
                continue;
            }

            stats.active_keys += 1;
            stats.buffered_items += entry.len();
            if entry.has_subscriber() {
                stats.subscribed_keys += 1;
            }
        }

        Ok(stats)
    }
}

impl<K, V> Drop for MultiQueueProcessor<'_, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn drop(&mut self) {
        let (queue_count, item_count) = self.table.clear();
        if queue_count > 0 {
            log::debug!(
                "Processor dropped with {} live queues, discarding {} buffered items",
                queue_count,
                item_count
            );
        }
    }
}

fn absent_as_default<T: Default>(result: ProcessorResult<T>) -> ProcessorResult<T> {
    match result {
        Err(ProcessorError::UnknownKey) => Ok(T::default()),
        other => other,
    }
}
