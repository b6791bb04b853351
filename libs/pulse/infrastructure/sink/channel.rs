use super::{AlertSink, SinkError, SinkResult};
use crate::domain::AlertEvent;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Forwards alerts into a bounded channel for a consumer task
pub struct ChannelSink {
    sender: mpsc::Sender<AlertEvent>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<AlertEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with its receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AlertEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl AlertSink for ChannelSink {
    fn notify(&self, event: &AlertEvent) -> SinkResult<()> {
        self.sender.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::ChannelFull,
            TrySendError::Closed(_) => SinkError::ChannelClosed,
        })
    }
}
