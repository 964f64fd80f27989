// Change notification fan-out.
//
// State holders keep a `Notifier` and emit a message after every mutation.
// Renderers and the app subscribe and drain their receivers on their own
// schedule. Sending never blocks, so emitting from inside a pointer handler
// is safe on a single-threaded runtime.

use tokio::sync::mpsc;

/// A list of subscribers that each receive a clone of every emitted message.
#[derive(Debug)]
pub struct Notifier<T> {
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Notifier {
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> Notifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Messages emitted before this call are not
    /// replayed.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `msg` to every live subscriber. Subscribers whose receiver has
    /// been dropped are forgotten.
    pub fn emit(&mut self, msg: T) {
        self.subscribers.retain(|tx| tx.send(msg.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_a_copy() {
        let mut n = Notifier::new();
        let mut a = n.subscribe();
        let mut b = n.subscribe();
        n.emit(7u32);
        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut n = Notifier::new();
        let keep = n.subscribe();
        let gone = n.subscribe();
        drop(gone);
        n.emit("x".to_string());
        assert_eq!(n.subscriber_count(), 1);
        drop(keep);
        n.emit("y".to_string());
        assert_eq!(n.subscriber_count(), 0);
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let mut n: Notifier<u8> = Notifier::new();
        n.emit(1);
        assert_eq!(n.subscriber_count(), 0);
    }
}
