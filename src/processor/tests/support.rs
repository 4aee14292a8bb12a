//! Shared helpers for processor tests

use crate::processor::api::Consumer;
use std::sync::Mutex;

/// Consumer that records every delivery in order
pub(crate) struct RecordingConsumer<K, V> {
    items: Mutex<Vec<(K, V)>>,
}

impl<K: Clone, V: Clone> RecordingConsumer<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn items(&self) -> Vec<(K, V)> {
        self.items.lock().unwrap().clone()
    }

    pub(crate) fn values(&self) -> Vec<V> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

impl<K, V> Consumer<K, V> for RecordingConsumer<K, V>
where
    K: Clone + Send,
    V: Send,
{
    fn consume(&self, key: &K, value: V) {
        self.items.lock().unwrap().push((key.clone(), value));
    }
}

pub(crate) fn key(name: &str) -> String {
    name.to_string()
}
