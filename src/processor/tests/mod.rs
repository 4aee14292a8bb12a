//! Test modules for the keyed queue processor
//!
//! Tests are organized by functional area.

mod lifecycle;
mod support;
