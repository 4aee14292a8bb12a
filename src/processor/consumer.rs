//! Push-mode consumer capability

/// Receiver of items pushed from a subscribed key
///
/// `consume` runs synchronously on the thread that called
/// [`subscribe`](crate::processor::api::MultiQueueProcessor::subscribe) or
/// [`enqueue`](crate::processor::api::MultiQueueProcessor::enqueue), while that
/// key's entry lock is held. Every other operation on the same key waits
/// until it returns, so implementations must do bounded, non-blocking work
/// and must not call back into the processor for the same key (that would
/// deadlock). A panic inside `consume` poisons the key.
///
/// The processor only borrows a consumer; the `'c` lifetime on the processor
/// guarantees it outlives every subscription.
///
/// Any `Fn(&K, V) + Send + Sync` closure is a consumer:
///
/// ```rust
/// use keyqueue::processor::api::MultiQueueProcessor;
/// use std::sync::Mutex;
///
/// let seen = Mutex::new(Vec::new());
/// let record = |key: &&'static str, value: u32| seen.lock().unwrap().push((*key, value));
///
/// let processor = MultiQueueProcessor::new();
/// processor.subscribe(&"t1", &record).unwrap();
/// processor.enqueue(&"t1", 7).unwrap();
/// processor.unsubscribe(&"t1").unwrap();
/// drop(processor);
///
/// assert_eq!(*seen.lock().unwrap(), vec![("t1", 7)]);
/// ```
pub trait Consumer<K, V>: Send + Sync {
    /// Handle one item delivered for `key`
    fn consume(&self, key: &K, value: V);
}

impl<K, V, F> Consumer<K, V> for F
where
    F: Fn(&K, V) + Send + Sync,
{
    fn consume(&self, key: &K, value: V) {
        self(key, value)
    }
}
