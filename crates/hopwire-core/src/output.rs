use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::hop::HopRecord;
use crossbeam::channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::time::Duration;

/// How often a blocked send re-checks for cancellation.
const SEND_POLL: Duration = Duration::from_millis(100);

/// Create a bounded hop record channel.
///
/// Records are delivered losslessly and in emission order. The channel
/// holds at most `capacity` undelivered records, a producer which runs
/// ahead of the consumer blocks until the consumer catches up.
#[must_use]
pub fn hop_channel(capacity: usize, cancel: CancelToken) -> (HopSender, HopReceiver) {
    let (tx, rx) = bounded(capacity);
    (HopSender { tx, cancel }, HopReceiver { rx })
}

/// The sending half of the hop record channel.
///
/// The sender is not cloneable, dropping it closes the channel and ends
/// the receiver's iteration.
#[derive(Debug)]
pub struct HopSender {
    tx: Sender<HopRecord>,
    cancel: CancelToken,
}

impl HopSender {
    /// Deliver a record to the consumer.
    ///
    /// Blocks while the channel is full. Fails with [`Error::Cancelled`]
    /// if cancellation is requested while blocked or if the receiver has
    /// been dropped.
    pub fn send(&self, record: HopRecord) -> Result<()> {
        let mut record = record;
        loop {
            match self.tx.send_timeout(record, SEND_POLL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(rec)) => {
                    if self.cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    record = rec;
                }
                Err(SendTimeoutError::Disconnected(_)) => return Err(Error::Cancelled),
            }
        }
    }
}

/// The receiving half of the hop record channel.
///
/// Iteration yields records in emission order and ends when the sender is
/// dropped.
#[derive(Debug)]
pub struct HopReceiver {
    rx: Receiver<HopRecord>,
}

impl Iterator for HopReceiver {
    type Item = HopRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}
