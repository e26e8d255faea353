//! Unbounded FIFO hand-off between the ingestion worker and the render loop.
//!
//! One producer, one consumer. [`QueueProducer::push`] never blocks;
//! [`QueueConsumer::drain_all`] never blocks and returns everything queued so
//! far, oldest first. A push racing a drain lands in that drain or the next.

use std::sync::mpsc;

/// Creates a connected producer/consumer pair.
#[must_use]
pub fn transfer_queue<T>() -> (QueueProducer<T>, QueueConsumer<T>) {
    let (tx, rx) = mpsc::channel();
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Sending half, owned by the ingestion worker.
#[derive(Debug)]
pub struct QueueProducer<T> {
    tx: mpsc::Sender<T>,
}

impl<T> QueueProducer<T> {
    /// Appends an item.
    ///
    /// Returns false once the consumer has been dropped; the item is lost
    /// because nobody can ever read it.
    pub fn push(&self, item: T) -> bool {
        self.tx.send(item).is_ok()
    }
}

/// Receiving half, owned by the render loop.
#[derive(Debug)]
pub struct QueueConsumer<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> QueueConsumer<T> {
    /// Removes and returns every queued item in FIFO order.
    pub fn drain_all(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_drain_is_fifo() {
        let (producer, consumer) = transfer_queue();
        assert!(producer.push("s1"));
        assert!(producer.push("s2"));
        assert!(producer.push("s3"));

        assert_eq!(consumer.drain_all(), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_drain_empties_queue() {
        let (producer, consumer) = transfer_queue();
        producer.push(1);

        assert_eq!(consumer.drain_all(), vec![1]);
        assert!(consumer.drain_all().is_empty());
    }

    #[test]
    fn test_empty_drain_does_not_block() {
        let (_producer, consumer) = transfer_queue::<u32>();
        assert!(consumer.drain_all().is_empty());
    }

    #[test]
    fn test_push_after_consumer_dropped() {
        let (producer, consumer) = transfer_queue();
        drop(consumer);
        assert!(!producer.push(5));
    }

    #[test]
    fn test_concurrent_producer_loses_and_duplicates_nothing() {
        let (producer, consumer) = transfer_queue();

        let worker = thread::spawn(move || {
            for i in 0..10_000u32 {
                producer.push(i);
            }
        });

        let mut received = Vec::new();
        while !worker.is_finished() {
            received.extend(consumer.drain_all());
        }
        worker.join().unwrap();
        received.extend(consumer.drain_all());

        let expected: Vec<u32> = (0..10_000).collect();
        assert_eq!(received, expected);
    }

    #[test]
    fn test_queue_halves_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<QueueProducer<String>>();
        assert_send::<QueueConsumer<String>>();
    }
}
