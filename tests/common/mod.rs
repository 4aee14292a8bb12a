//! Common test utilities and helpers
//!
//! Shared consumers for integration tests.

use keyqueue::processor::api::Consumer;
use std::sync::Mutex;

/// Named consumer that keeps every delivery, like a log line per item
pub struct NamedConsumer {
    name: String,
    received: Mutex<Vec<(String, i64)>>,
}

impl NamedConsumer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn received(&self) -> Vec<(String, i64)> {
        self.received.lock().unwrap().clone()
    }

    pub fn values_for(&self, key: &str) -> Vec<i64> {
        self.received()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }
}

impl Consumer<String, i64> for NamedConsumer {
    fn consume(&self, key: &String, value: i64) {
        log::trace!("{} {} {}", self.name, key, value);
        self.received.lock().unwrap().push((key.clone(), value));
    }
}
