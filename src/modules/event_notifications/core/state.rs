// Dispatcher state machine.
//
// Purpose
// - Hold everything the dispatcher mutates: the current subscription handle,
//   the pending queue and the outstanding demand.
//
// Responsibilities
// - Disconnected until a subscription handle is recorded, Subscribed after.
// - Payloads are only accepted from the current handle on the derived channel.
// - Queue and demand survive connection flaps.
// - Never perform input or output.

use crate::modules::event_notifications::core::event_range::EventRange;
use crate::modules::event_notifications::core::pending::PendingQueue;
use crate::shared::infrastructure::notification_source::SubscriptionHandle;

const CHANNEL_SUFFIX: &str = ".events";

pub fn channel_name(namespace: &str) -> String {
    format!("{namespace}{CHANNEL_SUFFIX}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Subscribed(SubscriptionHandle),
}

#[derive(Debug)]
pub struct DispatcherState {
    target: String,
    channel: String,
    connection: ConnectionState,
    pending: PendingQueue,
}

impl DispatcherState {
    pub fn new(target: impl Into<String>, namespace: &str) -> Self {
        Self {
            target: target.into(),
            channel: channel_name(namespace),
            connection: ConnectionState::Disconnected,
            pending: PendingQueue::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self.connection, ConnectionState::Subscribed(_))
    }

    pub fn demand(&self) -> u64 {
        self.pending.demand()
    }

    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Records a fresh subscription, replacing any previous one.
    pub fn subscribed(&mut self, handle: SubscriptionHandle) {
        self.connection = ConnectionState::Subscribed(handle);
    }

    pub fn disconnected(&mut self) {
        self.connection = ConnectionState::Disconnected;
    }

    /// Whether a payload from `handle` on `channel` belongs to the live subscription.
    pub fn accepts(&self, handle: SubscriptionHandle, channel: &str) -> bool {
        self.connection == ConnectionState::Subscribed(handle) && self.channel == channel
    }

    pub fn push(&mut self, range: EventRange) -> Vec<EventRange> {
        self.pending.enqueue(range);
        self.pending.drain()
    }

    pub fn add_demand(&mut self, n: u64) -> Vec<EventRange> {
        self.pending.add_demand(n);
        self.pending.drain()
    }
}

#[cfg(test)]
mod dispatcher_state_tests {
    use super::*;
    use crate::tests::fixtures::event_ranges::make_event_ranges;
    use rstest::{fixture, rstest};

    const HANDLE: SubscriptionHandle = SubscriptionHandle::new(1);

    #[fixture]
    fn before_each() -> DispatcherState {
        DispatcherState::new("event-store", "public")
    }

    #[rstest]
    fn it_should_start_disconnected_and_empty(before_each: DispatcherState) {
        let state = before_each;
        assert_eq!(state.connection(), ConnectionState::Disconnected);
        assert_eq!(state.target(), "event-store");
        assert_eq!(state.channel(), "public.events");
        assert_eq!(state.demand(), 0);
        assert_eq!(state.queued(), 0);
    }

    #[rstest]
    fn it_should_only_accept_payloads_from_the_live_subscription(
        mut before_each: DispatcherState,
    ) {
        assert!(!before_each.accepts(HANDLE, "public.events"));

        before_each.subscribed(HANDLE);
        assert!(before_each.accepts(HANDLE, "public.events"));
        assert!(!before_each.accepts(SubscriptionHandle::new(2), "public.events"));
        assert!(!before_each.accepts(HANDLE, "other.events"));

        before_each.disconnected();
        assert!(!before_each.accepts(HANDLE, "public.events"));
    }

    #[rstest]
    fn it_should_buffer_until_demand_arrives(mut before_each: DispatcherState) {
        let ranges = make_event_ranges(2);
        before_each.subscribed(HANDLE);
        assert!(before_each.push(ranges[0].clone()).is_empty());
        assert!(before_each.push(ranges[1].clone()).is_empty());
        assert_eq!(before_each.queued(), 2);

        assert_eq!(before_each.add_demand(5), ranges);
        assert_eq!(before_each.demand(), 3);
        assert_eq!(before_each.queued(), 0);
    }

    #[rstest]
    fn it_should_dispatch_immediately_when_demand_is_outstanding(
        mut before_each: DispatcherState,
    ) {
        let ranges = make_event_ranges(1);
        assert!(before_each.add_demand(1).is_empty());
        before_each.subscribed(HANDLE);
        assert_eq!(before_each.push(ranges[0].clone()), ranges);
        assert_eq!(before_each.demand(), 0);
    }

    #[rstest]
    fn it_should_keep_the_queue_and_demand_across_a_disconnect(mut before_each: DispatcherState) {
        let ranges = make_event_ranges(3);
        before_each.subscribed(HANDLE);
        for range in ranges.clone() {
            before_each.push(range);
        }
        before_each.add_demand(1);

        before_each.disconnected();
        assert_eq!(before_each.queued(), 2);
        assert_eq!(before_each.demand(), 0);

        before_each.subscribed(SubscriptionHandle::new(2));
        assert_eq!(before_each.add_demand(2), ranges[1..].to_vec());
    }
}
