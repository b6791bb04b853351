//! Alert delivery with per-destination failure isolation

use crate::domain::AlertEvent;
use crate::infrastructure::{AlertRecorder, AlertSink};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct AlertDispatcher {
    sink: Option<Arc<dyn AlertSink>>,
    recorder: Option<Arc<dyn AlertRecorder>>,
}

impl AlertDispatcher {
    pub fn new(sink: Option<Arc<dyn AlertSink>>, recorder: Option<Arc<dyn AlertRecorder>>) -> Self {
        Self { sink, recorder }
    }

    /// Notify the sink, then hand the event to the recorder.
    ///
    /// A failure of one destination is logged and never affects the other.
    pub fn dispatch(&self, event: AlertEvent) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.notify(&event) {
                warn!(key = %event.key(), "Alert sink failed: {}", e);
            }
        }

        match &self.recorder {
            Some(recorder) => {
                let key = event.key();
                if let Err(e) = recorder.record(event) {
                    warn!(%key, "Alert recorder failed: {}", e);
                }
            }
            None => debug!("No alert recorder configured"),
        }
    }

    /// Ask the sink for notification permission once. Never retried.
    pub fn request_permission(&self) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };

        match sink.request_permission() {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Notification permission request failed: {}", e);
                false
            }
        }
    }
}
