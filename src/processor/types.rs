//! Statistics types for the processor

/// Point-in-time view of the processor's queues
///
/// Collected entry by entry, so under concurrent load the totals are not an
/// atomic snapshot of the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Keys that currently have an entry
    pub active_keys: usize,
    /// Keys with a consumer attached (push mode)
    pub subscribed_keys: usize,
    /// Items waiting across all unsubscribed keys
    pub buffered_items: usize,
}
