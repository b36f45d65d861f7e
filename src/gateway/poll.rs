// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-delay poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::dispatch::ChangeDispatcher;
use crate::event::{EventBus, GatewayEvent};
use crate::protocol::GatewayApi;
use crate::session::SessionManager;
use crate::state::{ChangeSet, Snapshot, StateStore};

/// Default delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One poll generation of a gateway.
///
/// Cycles run one `interval` apart, measured from the end of the previous
/// cycle; the first cycle runs one interval after the loop starts. Cycles
/// started through [`Gateway::refresh`](super::Gateway::refresh) share the
/// same cycle lock, so no two cycles ever overlap.
pub(crate) struct PollLoop<C> {
    pub(super) client: Arc<C>,
    pub(super) session: Arc<SessionManager<C>>,
    pub(super) store: Arc<StateStore>,
    pub(super) dispatcher: Arc<ChangeDispatcher>,
    pub(super) events: EventBus,
    pub(super) cycle_lock: Arc<Mutex<()>>,
    pub(super) interval: Duration,
}

impl<C: GatewayApi> PollLoop<C> {
    /// Runs cycles until `cancel` fires.
    pub(crate) async fn run(self, cancel: CancellationToken) {
        tracing::debug!(interval = ?self.interval, "Poll loop started");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = self.run_cycle(&cancel) => {}
            }
        }

        tracing::debug!("Poll loop stopped");
    }

    /// Fetches the output status once and dispatches the resulting changes.
    ///
    /// A failed fetch leaves the current snapshot in place and yields an
    /// empty change set. A result that arrives after `cancel` fired is
    /// discarded.
    pub(crate) async fn run_cycle(&self, cancel: &CancellationToken) -> ChangeSet {
        let _cycle = self.cycle_lock.lock().await;
        if cancel.is_cancelled() {
            return ChangeSet::new();
        }

        self.store.rotate();

        match self
            .session
            .with_reauth(|| self.client.get_output_status())
            .await
        {
            Ok(records) => {
                if cancel.is_cancelled() {
                    tracing::debug!("Discarding output status received after shutdown");
                    return ChangeSet::new();
                }
                tracing::debug!(outputs = records.len(), "Output status received");
                self.store.publish(Snapshot::from_records(&records));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Poll cycle failed, keeping previous state");
                self.store.record_failure();
            }
        }

        let changes = self.store.changes();
        if !changes.is_empty() {
            self.dispatcher.dispatch(&changes);
            self.events
                .publish(GatewayEvent::OutputsChanged(changes.clone()));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::gateway::lifecycle::Lifecycle;
    use crate::mock::{MockGateway, record, unauthorized};
    use crate::protocol::LoginResponse;
    use crate::session::Credentials;
    use crate::types::OutputId;

    struct Fixture {
        mock: Arc<MockGateway>,
        lifecycle: Arc<Lifecycle>,
        events: EventBus,
        poll: PollLoop<MockGateway>,
    }

    fn fixture() -> Fixture {
        let mock = Arc::new(MockGateway::new());
        let events = EventBus::new();
        let lifecycle = Arc::new(Lifecycle::new(events.clone()));
        let session = Arc::new(SessionManager::new(
            Arc::clone(&mock),
            Credentials::new("admin", "secret"),
            3600,
            Arc::clone(&lifecycle),
        ));
        let poll = PollLoop {
            client: Arc::clone(&mock),
            session,
            store: Arc::new(StateStore::new()),
            dispatcher: Arc::new(ChangeDispatcher::new()),
            events: events.clone(),
            cycle_lock: Arc::new(Mutex::new(())),
            interval: DEFAULT_POLL_INTERVAL,
        };
        Fixture {
            mock,
            lifecycle,
            events,
            poll,
        }
    }

    fn ids(changes: &ChangeSet) -> Vec<u32> {
        changes.iter().map(|id| id.value()).collect()
    }

    #[tokio::test]
    async fn first_cycle_reports_every_output() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.mock.set_outputs(vec![record(1, 0, 0), record(2, 1, 0)]);

        let changes = fx.poll.run_cycle(&cancel).await;

        assert_eq!(ids(&changes), vec![1, 2]);
    }

    #[tokio::test]
    async fn only_changed_output_is_reported() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        let mut rx = fx.events.subscribe();

        fx.mock.set_outputs(vec![record(3, 0, 0), record(4, 1, 0)]);
        fx.poll.run_cycle(&cancel).await;

        fx.mock.set_outputs(vec![record(3, 1, 0), record(4, 1, 0)]);
        let changes = fx.poll.run_cycle(&cancel).await;

        assert_eq!(ids(&changes), vec![3]);

        // First cycle's event, then the one for output 3.
        rx.recv().await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            GatewayEvent::OutputsChanged(changes)
        );
    }

    #[tokio::test]
    async fn identical_poll_yields_no_changes() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.mock.set_outputs(vec![record(3, 1, 40)]);

        fx.poll.run_cycle(&cancel).await;
        let changes = fx.poll.run_cycle(&cancel).await;

        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_keeps_current_snapshot() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.mock.set_outputs(vec![record(3, 1, 0)]);
        fx.poll.run_cycle(&cancel).await;

        fx.mock
            .push_status(Err(ProtocolError::ConnectionFailed("timeout".into())));
        let changes = fx.poll.run_cycle(&cancel).await;

        assert!(changes.is_empty());
        assert_eq!(fx.poll.store.status_of(OutputId::new(3)), Some(1));
        assert_eq!(fx.poll.store.failed_cycles(), 1);
        assert!(fx.lifecycle.is_online());
    }

    #[tokio::test]
    async fn unauthorized_with_failed_relogin_leaves_store_and_goes_offline() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.mock.set_outputs(vec![record(3, 1, 0)]);
        fx.poll.run_cycle(&cancel).await;
        let before = fx.poll.store.snapshot();

        fx.mock.push_status(Err(unauthorized()));
        fx.mock.push_login(Ok(LoginResponse::rejected()));
        let changes = fx.poll.run_cycle(&cancel).await;

        assert!(changes.is_empty());
        assert!(Arc::ptr_eq(&before, &fx.poll.store.snapshot()));
        assert!(cancel.is_cancelled());
        assert!(fx.lifecycle.status().is_offline());
    }

    #[tokio::test]
    async fn cancelled_cycle_does_not_fetch() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.lifecycle.cancel_polling();

        let changes = fx.poll.run_cycle(&cancel).await;

        assert!(changes.is_empty());
        assert_eq!(fx.mock.status_calls(), 0);
    }

    #[tokio::test]
    async fn late_result_after_cancel_is_discarded() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        fx.mock.set_outputs(vec![record(3, 1, 0)]);
        let gate = fx.mock.gate_status();

        let cycle = fx.poll.run_cycle(&cancel);
        tokio::pin!(cycle);

        // Drive the cycle until it waits on the gateway.
        tokio::select! {
            biased;
            _ = &mut cycle => panic!("cycle finished before the gateway answered"),
            () = tokio::task::yield_now() => {}
        }

        fx.lifecycle.cancel_polling();
        gate.notify_one();

        assert!(cycle.await.is_empty());
        assert!(!fx.poll.store.contains(OutputId::new(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn first_cycle_runs_one_interval_after_start() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        let mock = Arc::clone(&fx.mock);
        let task = tokio::spawn(fx.poll.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(mock.status_calls(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(mock.status_calls(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(mock.status_calls(), 2);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_change_the_schedule() {
        let fx = fixture();
        let cancel = fx.lifecycle.go_online();
        let mock = Arc::clone(&fx.mock);
        mock.push_status(Err(ProtocolError::ConnectionFailed("down".into())));
        let task = tokio::spawn(fx.poll.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(10_100)).await;
        assert_eq!(mock.status_calls(), 2);

        cancel.cancel();
        task.await.unwrap();
    }
}
