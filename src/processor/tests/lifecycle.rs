//! Lifecycle Tests - per-key entry creation and reclamation

#[cfg(test)]
mod tests {
    use crate::processor::api::{MultiQueueProcessor, ProcessorError, ProcessorStats};
    use crate::processor::tests::support::{key, RecordingConsumer};

    #[test]
    fn test_enqueue_creates_entry_and_last_dequeue_removes_it() {
        let processor = MultiQueueProcessor::new();
        let k = key("k");

        assert_eq!(processor.contains_key(&k), Ok(false));
        processor.enqueue(&k, 1).unwrap();
        processor.enqueue(&k, 2).unwrap();
        assert_eq!(processor.contains_key(&k), Ok(true));
        assert_eq!(processor.queue_count(), Ok(1));

        processor.dequeue(&k).unwrap();
        assert_eq!(processor.contains_key(&k), Ok(true));

        processor.dequeue(&k).unwrap();
        assert_eq!(processor.contains_key(&k), Ok(false));
        assert_eq!(processor.queue_count(), Ok(0));
    }

    #[test]
    fn test_drained_key_reports_unknown_not_empty() {
        // Eager deletion: "used and drained" looks the same as "never used"
        let processor = MultiQueueProcessor::new();
        let k = key("drained");

        processor.enqueue(&k, 'a').unwrap();
        processor.dequeue(&k).unwrap();

        assert_eq!(processor.dequeue(&k), Err(ProcessorError::UnknownKey));
        assert_eq!(
            processor.dequeue(&key("fresh")),
            Err(ProcessorError::UnknownKey)
        );
    }

    #[test]
    fn test_subscribe_on_absent_key_creates_subscribed_entry() {
        let consumer = RecordingConsumer::new();
        let processor: MultiQueueProcessor<'_, String, u32> = MultiQueueProcessor::new();
        let k = key("push-only");

        processor.subscribe(&k, &consumer).unwrap();

        assert_eq!(processor.contains_key(&k), Ok(true));
        assert_eq!(processor.is_subscribed(&k), Ok(true));
        assert_eq!(processor.buffered_len(&k), Ok(0));
    }

    #[test]
    fn test_unsubscribe_collapses_to_absent() {
        let consumer = RecordingConsumer::new();
        let processor = MultiQueueProcessor::new();
        let k = key("k");

        processor.enqueue(&k, 1).unwrap();
        processor.subscribe(&k, &consumer).unwrap();
        processor.enqueue(&k, 2).unwrap();
        processor.unsubscribe(&k).unwrap();

        assert_eq!(processor.contains_key(&k), Ok(false));
        assert_eq!(processor.unsubscribe(&k), Err(ProcessorError::UnknownKey));

        // The key starts over in pull mode
        processor.enqueue(&k, 3).unwrap();
        assert_eq!(processor.dequeue(&k), Ok(3));
        assert_eq!(consumer.values(), vec![1, 2]);
    }

    #[test]
    fn test_failed_operations_do_not_leave_entries() {
        let processor: MultiQueueProcessor<'_, String, u32> = MultiQueueProcessor::new();

        assert!(processor.dequeue(&key("a")).is_err());
        assert!(processor.unsubscribe(&key("b")).is_err());
        assert_eq!(processor.buffered_len(&key("c")), Ok(0));
        assert_eq!(processor.is_subscribed(&key("d")), Ok(false));

        assert_eq!(processor.queue_count(), Ok(0));
    }

    #[test]
    fn test_stats_track_state() {
        let consumer = RecordingConsumer::new();
        let processor = MultiQueueProcessor::new();

        assert_eq!(processor.stats(), Ok(ProcessorStats::default()));

        processor.enqueue(&key("a"), 1).unwrap();
        processor.enqueue(&key("a"), 2).unwrap();
        processor.enqueue(&key("b"), 3).unwrap();
        processor.subscribe(&key("c"), &consumer).unwrap();

        assert_eq!(
            processor.stats(),
            Ok(ProcessorStats {
                active_keys: 3,
                subscribed_keys: 1,
                buffered_items: 3,
            })
        );
    }

    #[test]
    fn test_drop_with_live_queues() {
        let consumer = RecordingConsumer::new();
        {
            let processor = MultiQueueProcessor::new();
            processor.enqueue(&key("buffered"), 1).unwrap();
            processor.subscribe(&key("subscribed"), &consumer).unwrap();
            // Dropped here with both entries still present
        }
        assert_eq!(consumer.len(), 0);
    }
}
