//! Processor Error Types

/// Error category, one per failure class of the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operation is not valid in the key's current delivery mode
    Precondition,
    /// The operation requires an existing queue for the key
    NotFound,
    /// The key's buffer is at its capacity bound
    Capacity,
    /// No buffered item to return
    Empty,
    /// A lock was poisoned by a panic in another thread
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
    #[error("Queue already has a subscriber")]
    AlreadySubscribed,

    #[error("Queue has no subscriber")]
    NoSubscriber,

    #[error("Queue has a subscriber, items are delivered by push only")]
    HasSubscriber,

    #[error("No queue exists for this key")]
    UnknownKey,

    #[error("Queue is full (capacity: {capacity})")]
    QueueFull { capacity: usize },

    #[error("Queue is empty")]
    QueueEmpty,

    #[error("Lock poisoned: {message}")]
    LockPoisoned { message: String },
}

impl ProcessorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessorError::AlreadySubscribed
            | ProcessorError::NoSubscriber
            | ProcessorError::HasSubscriber => ErrorKind::Precondition,
            ProcessorError::UnknownKey => ErrorKind::NotFound,
            ProcessorError::QueueFull { .. } => ErrorKind::Capacity,
            ProcessorError::QueueEmpty => ErrorKind::Empty,
            ProcessorError::LockPoisoned { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn poisoned(message: String) -> Self {
        ProcessorError::LockPoisoned { message }
    }
}

impl crate::core::error_handling::ContextualError for ProcessorError {
    fn is_user_actionable(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ProcessorError::AlreadySubscribed => Some("Unsubscribe the current consumer first"),
            ProcessorError::NoSubscriber => Some("Queue has no subscriber to remove"),
            ProcessorError::HasSubscriber => Some("Unsubscribe before dequeuing"),
            ProcessorError::UnknownKey => Some("No queue exists for this key"),
            ProcessorError::QueueFull { .. } => Some("Dequeue items before enqueuing more"),
            ProcessorError::QueueEmpty => Some("Queue has no buffered items"),
            ProcessorError::LockPoisoned { .. } => None,
        }
    }
}

/// Result type for processor operations
pub type ProcessorResult<T> = Result<T, ProcessorError>;
