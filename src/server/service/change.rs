//! Store change notifications.
//!
//! Every write made through the services is published on a broadcast channel. Workspaces
//! listen to it and mark themselves stale when a change concerns the comet they show, so
//! the next read reconciles against the store.

use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreChange {
    CometRegistered { comet_id: i32 },
    FlybyAdded { comet_id: i32, flyby_id: i32 },
    SummaryCreated { comet_id: i32, summary_id: i32 },
    SummaryUpdated { comet_id: i32, summary_id: i32 },
}

impl StoreChange {
    pub fn comet_id(&self) -> i32 {
        match *self {
            Self::CometRegistered { comet_id }
            | Self::FlybyAdded { comet_id, .. }
            | Self::SummaryCreated { comet_id, .. }
            | Self::SummaryUpdated { comet_id, .. } => comet_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, change: StoreChange) {
        // No subscribers is not an error: nothing is cached yet
        if self.sender.send(change).is_err() {
            tracing::debug!(?change, "Store change published without subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }
}
