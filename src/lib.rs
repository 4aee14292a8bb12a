//! keyqueue - keyed FIFO queue multiplexer
//!
//! Manages any number of independent FIFO queues, each addressed by a key.
//! Producers enqueue under a key; a key is either drained on demand (pull) or
//! delivers straight to a single attached consumer (push).
//!
//! # Core Modules
//!
//! - [`processor`]: the queue processor, its consumer trait and errors
//! - [`core`]: configuration, logging and synchronisation helpers

pub mod core;
pub mod processor;
