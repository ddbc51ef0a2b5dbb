// Mailbox protocol of the dispatcher task.
//
// Every input reaches the dispatcher through one ordered channel, so state is
// only ever mutated by the task draining it.

use crate::modules::event_notifications::core::state::ConnectionState;
use crate::shared::infrastructure::connection_monitor::Liveness;
use crate::shared::infrastructure::notification_source::SubscriptionHandle;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum DispatcherMessage {
    /// UP or DOWN for a connection target.
    Liveness(Liveness),

    /// Raw payload forwarded from the subscription identified by `handle`.
    Notification {
        handle: SubscriptionHandle,
        channel: String,
        payload: String,
    },

    /// Consumer asks for `n` more ranges.
    Demand(u64),

    /// Snapshot request. Does not change state.
    Status(oneshot::Sender<DispatcherStatus>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherStatus {
    pub connection: ConnectionState,
    pub demand: u64,
    pub queued: usize,
}
