//! Channel-backed fragment sink
//!
//! Bridges the orchestrator's synchronous sink to an HTTP response body.
//! A closed receiver only means the client went away; delivery is dropped.

use tokio::sync::mpsc::UnboundedSender;
use turing::models::TurnEvent;
use turing::FragmentSink;

pub struct ChannelSink {
    tx: UnboundedSender<TurnEvent>,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<TurnEvent>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }

    /// Send a terminal event (done or error)
    pub fn finish(self, event: TurnEvent) {
        let _ = self.tx.send(event);
    }
}

impl FragmentSink for ChannelSink {
    fn deliver(&mut self, fragment: &str) {
        if self.tx.send(TurnEvent::fragment(fragment)).is_err() && !self.disconnected {
            self.disconnected = true;
            tracing::debug!("consumer disconnected, continuing turn without delivery");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_in_order_and_survives_disconnect() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        sink.deliver("a");
        sink.deliver("b");

        assert_eq!(rx.try_recv().unwrap(), TurnEvent::fragment("a"));
        assert_eq!(rx.try_recv().unwrap(), TurnEvent::fragment("b"));

        drop(rx);
        sink.deliver("c");
        sink.finish(TurnEvent::Error {
            message: "late".to_string(),
        });
    }
}
