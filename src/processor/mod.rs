//! Keyed Queue Processor
//!
//! Any number of independent FIFO queues, each addressed by a key and created
//! on first use. A key is in one of three states:
//!
//! ```text
//!  state        operation     next state
//!  ───────────  ────────────  ─────────────────────────────────────
//!  Absent       enqueue       Buffered
//!  Absent       subscribe     Subscribed
//!  Buffered     enqueue       Buffered (append, or QueueFull)
//!  Buffered     dequeue       Buffered, or Absent once drained
//!  Buffered     subscribe     Subscribed (buffer flushed in order)
//!  Subscribed   enqueue       Subscribed (item pushed to consumer)
//!  Subscribed   unsubscribe   Absent
//! ```
//!
//! - **Pull mode**: items are buffered up to a fixed capacity and taken with
//!   `dequeue`. Operations fail fast instead of waiting for space or data.
//! - **Push mode**: a single [`Consumer`](api::Consumer) receives each item
//!   synchronously inside `enqueue`.
//!
//! A key's entry is removed as soon as it holds no items and no consumer, so
//! a drained key is indistinguishable from one never used: `dequeue` on it
//! fails with `UnknownKey`.
//!
//! # Example Usage
//!
//! ```rust
//! use keyqueue::processor::api::{MultiQueueProcessor, ProcessorError};
//! use std::sync::Mutex;
//!
//! let received = Mutex::new(Vec::new());
//! let consumer = |_: &String, value: i32| received.lock().unwrap().push(value);
//!
//! let processor: MultiQueueProcessor<'_, String, i32> = MultiQueueProcessor::new();
//! let key = "t1".to_string();
//!
//! processor.enqueue(&key, 1).unwrap();
//! processor.enqueue(&key, 2).unwrap();
//! processor.subscribe(&key, &consumer).unwrap(); // delivers 1, 2
//! processor.enqueue(&key, 3).unwrap(); // delivered immediately
//! assert_eq!(processor.dequeue(&key), Err(ProcessorError::HasSubscriber));
//!
//! processor.unsubscribe(&key).unwrap();
//! assert_eq!(processor.dequeue(&key), Err(ProcessorError::UnknownKey));
//! drop(processor);
//!
//! assert_eq!(*received.lock().unwrap(), vec![1, 2, 3]);
//! ```

mod consumer;
mod entry;
mod error;
mod manager;
mod table;
mod types;

// Public API module - the only public interface for the processor
pub mod api;

#[cfg(test)]
mod tests;
