//! Per-key queue state
//!
//! A `QueueEntry` is only ever touched while its owning mutex is held, so
//! none of its methods synchronise on their own.

use crate::processor::consumer::Consumer;
use std::collections::VecDeque;

pub(crate) struct QueueEntry<'c, K, V> {
    values: VecDeque<V>,
    subscriber: Option<&'c dyn Consumer<K, V>>,
    /// Set once the entry has been removed from the table. A thread that
    /// locks a retired entry must resolve the key again.
    retired: bool,
}

impl<'c, K, V> QueueEntry<'c, K, V> {
    pub(crate) fn new() -> Self {
        Self {
            values: VecDeque::new(),
            subscriber: None,
            retired: false,
        }
    }

    pub(crate) fn push(&mut self, value: V) {
        self.values.push_back(value);
    }

    pub(crate) fn pop(&mut self) -> Option<V> {
        self.values.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn is_full(&self, capacity: usize) -> bool {
        self.values.len() >= capacity
    }

    pub(crate) fn subscriber(&self) -> Option<&'c dyn Consumer<K, V>> {
        self.subscriber
    }

    pub(crate) fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }

    pub(crate) fn attach(&mut self, consumer: &'c dyn Consumer<K, V>) {
        self.subscriber = Some(consumer);
    }

    pub(crate) fn detach(&mut self) {
        self.subscriber = None;
    }

    /// Idle entries hold nothing and must leave the table
    pub(crate) fn is_idle(&self) -> bool {
        self.is_empty() && !self.has_subscriber()
    }

    pub(crate) fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
    }
}
