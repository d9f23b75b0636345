//! Poll engine.
//!
//! Each cycle sweeps empty rooms, fetches a batch from the feed, routes the
//! batch's messages one at a time in arrival order and delivers each
//! message's replies before routing the next one.

use crate::metrics;
use futures_util::future::join_all;
use huddle_core::{Hub, HubStats, Outbound, Router, Sequence, SessionId};
use huddle_feed::MessageFeed;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Outcome of delivering a set of outbound messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Messages accepted by the feed.
    pub sent: usize,
    /// Messages the feed failed to deliver.
    pub failed: usize,
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Empty rooms removed before routing.
    pub swept: usize,
    /// Whether the fetch failed (cycle skipped).
    pub fetch_failed: bool,
    /// Messages fetched.
    pub fetched: usize,
    /// Messages that reached a handler.
    pub routed: usize,
    /// Delivery totals.
    pub delivery: Delivery,
}

/// Deliver outbound messages.
///
/// Different recipients are served concurrently; messages to the same
/// recipient keep their order. Each failure is logged on its own and never
/// stops the remaining deliveries.
pub async fn deliver(feed: &dyn MessageFeed, outbound: Vec<Outbound>) -> Delivery {
    let mut queues: Vec<(SessionId, Vec<String>)> = Vec::new();
    for message in outbound {
        match queues.iter_mut().find(|(target, _)| *target == message.target) {
            Some((_, texts)) => texts.push(message.text),
            None => queues.push((message.target, vec![message.text])),
        }
    }

    let results = join_all(queues.into_iter().map(|(target, texts)| async move {
        let mut delivery = Delivery::default();
        for text in texts {
            match feed.send_outbound(target, &text).await {
                Ok(()) => {
                    metrics::record_delivery(true);
                    delivery.sent += 1;
                }
                Err(e) => {
                    warn!(session = target, error = %e, "Error while sending message");
                    metrics::record_delivery(false);
                    metrics::record_error("delivery");
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }))
    .await;

    results.into_iter().fold(Delivery::default(), |acc, d| Delivery {
        sent: acc.sent + d.sent,
        failed: acc.failed + d.failed,
    })
}

/// The poll engine. Sole owner of the hub.
pub struct Engine {
    feed: Arc<dyn MessageFeed>,
    hub: Hub,
    router: Router,
    cursor: Sequence,
    stats: watch::Sender<HubStats>,
}

impl Engine {
    /// Create a new engine starting from cursor 0.
    #[must_use]
    pub fn new(feed: Arc<dyn MessageFeed>, hub: Hub, router: Router) -> Self {
        let (stats, _) = watch::channel(hub.stats());
        Self {
            feed,
            hub,
            router,
            cursor: 0,
            stats,
        }
    }

    /// Get the hub.
    #[must_use]
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Get the next sequence to fetch from.
    #[must_use]
    pub fn cursor(&self) -> Sequence {
        self.cursor
    }

    /// Receive hub statistics after every cycle.
    #[must_use]
    pub fn subscribe_stats(&self) -> watch::Receiver<HubStats> {
        self.stats.subscribe()
    }

    /// Run one poll cycle.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let start = Instant::now();
        let mut report = CycleReport {
            swept: self.hub.sweep().len(),
            ..Default::default()
        };
        metrics::record_swept(report.swept);

        match self.feed.fetch_inbound(self.cursor).await {
            Ok(batch) => {
                report.fetched = batch.messages.len();
                if report.fetched > 0 {
                    info!(count = report.fetched, "Received messages");
                    metrics::record_updates(report.fetched);
                }

                for message in &batch.messages {
                    let Some(dispatch) = self.router.route(&mut self.hub, message) else {
                        continue;
                    };
                    report.routed += 1;
                    metrics::record_command(dispatch.route.command_name());

                    let delivery = deliver(self.feed.as_ref(), dispatch.outbound).await;
                    report.delivery.sent += delivery.sent;
                    report.delivery.failed += delivery.failed;
                }

                self.cursor = batch.next_cursor(self.cursor);
            }
            Err(e) => {
                warn!(feed = self.feed.name(), error = %e, "Error while receiving updates");
                metrics::record_error("fetch");
                report.fetch_failed = true;
            }
        }

        let stats = self.hub.stats();
        metrics::set_hub_stats(&stats);
        self.stats.send_replace(stats);
        metrics::record_cycle(start.elapsed().as_secs_f64());

        debug!(?report, cursor = self.cursor, "Cycle finished");
        report
    }

    /// Run cycles every `interval` until `shutdown` resolves.
    ///
    /// A cycle in progress always completes before shutdown.
    pub async fn run(mut self, interval: Duration, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(feed = self.feed.name(), ?interval, "Poll loop started");
        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("Poll loop stopping");
                    break;
                }

                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::replies;
    use huddle_feed::MemoryFeed;

    fn engine() -> (Engine, Arc<MemoryFeed>) {
        let feed = Arc::new(MemoryFeed::new());
        let engine = Engine::new(feed.clone(), Hub::new(), Router::seeded(0));
        (engine, feed)
    }

    #[tokio::test]
    async fn test_engine_scenario() {
        let (mut engine, feed) = engine();

        feed.push(1, "Ann", "/create Alpha 2").await;
        feed.push(2, "Bob", "/join 0").await;
        feed.push(3, "Cat", "/join 0").await;
        feed.push(2, "Bob", "hi").await;
        let report = engine.run_cycle().await;
        assert_eq!(report.fetched, 4);
        assert_eq!(report.routed, 4);
        assert_eq!(engine.cursor(), 4);

        assert_eq!(feed.sent_to(3).await, vec!["Room Alpha is full".to_string()]);
        assert_eq!(feed.sent_to(1).await.last().map(String::as_str), Some("Bob: hi"));
        assert!(!feed.sent_to(2).await.contains(&"Bob: hi".to_string()));
        assert!(engine.hub().is_consistent());

        feed.push(1, "Ann", "/quit").await;
        engine.run_cycle().await;
        assert_eq!(engine.hub().rooms().get(0).unwrap().members(), &[2]);

        feed.push(2, "Bob", "/quit").await;
        let report = engine.run_cycle().await;
        assert_eq!(report.swept, 0);
        assert!(engine.hub().rooms().contains(0));

        let report = engine.run_cycle().await;
        assert_eq!(report.swept, 1);
        assert!(engine.hub().rooms().is_empty());
    }

    #[tokio::test]
    async fn test_engine_batch_is_ordered() {
        let (mut engine, feed) = engine();

        // A join later in the batch sees the room created earlier in it.
        feed.push(1, "Ann", "/create Alpha").await;
        feed.push(2, "Bob", "/join 0").await;
        feed.push(2, "Bob", "/info").await;
        engine.run_cycle().await;

        let room = engine.hub().rooms().get(0).unwrap();
        assert_eq!(
            feed.sent_to(2).await,
            vec![replies::joined(room), replies::info(room)]
        );
    }

    #[tokio::test]
    async fn test_engine_fetch_failure_keeps_cursor() {
        let (mut engine, feed) = engine();
        feed.push(1, "Ann", "/start").await;
        feed.fail_fetches(1).await;

        let report = engine.run_cycle().await;
        assert!(report.fetch_failed);
        assert_eq!(engine.cursor(), 0);
        assert!(feed.sent().await.is_empty());

        let report = engine.run_cycle().await;
        assert!(!report.fetch_failed);
        assert_eq!(engine.cursor(), 1);
        assert_eq!(feed.sent_to(1).await, vec![replies::welcome("Ann")]);
    }

    #[tokio::test]
    async fn test_engine_delivery_failure_is_isolated() {
        let (mut engine, feed) = engine();
        feed.push(1, "Ann", "/create Alpha").await;
        feed.push(2, "Bob", "/join 0").await;
        feed.push(3, "Cat", "/join 0").await;
        engine.run_cycle().await;
        feed.take_sent().await;

        feed.make_unreachable(2).await;
        feed.push(1, "Ann", "hello").await;
        let report = engine.run_cycle().await;

        assert_eq!(report.delivery, Delivery { sent: 1, failed: 1 });
        assert_eq!(feed.sent().await, vec![Outbound::new(3, "Ann: hello")]);
        // State changes are never rolled back by delivery failures.
        assert_eq!(engine.hub().rooms().get(0).unwrap().member_count(), 3);
    }

    #[tokio::test]
    async fn test_engine_blank_messages_advance_cursor() {
        let (mut engine, feed) = engine();
        feed.push(1, "Ann", "").await;
        feed.push(1, "Ann", "   ").await;

        let report = engine.run_cycle().await;
        assert_eq!(report.fetched, 2);
        assert_eq!(report.routed, 0);
        assert_eq!(engine.cursor(), 2);
        assert!(feed.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_engine_publishes_stats() {
        let (mut engine, feed) = engine();
        let stats = engine.subscribe_stats();
        assert_eq!(*stats.borrow(), HubStats::default());

        feed.push(1, "Ann", "/create Open 3").await;
        engine.run_cycle().await;
        assert_eq!(
            *stats.borrow(),
            HubStats {
                rooms: 1,
                public_rooms: 1,
                sessions: 1
            }
        );
    }

    #[tokio::test]
    async fn test_deliver_keeps_per_recipient_order() {
        let feed = MemoryFeed::new();
        let delivery = deliver(
            &feed,
            vec![
                Outbound::new(1, "a"),
                Outbound::new(2, "x"),
                Outbound::new(1, "b"),
                Outbound::new(1, "c"),
            ],
        )
        .await;

        assert_eq!(delivery, Delivery { sent: 4, failed: 0 });
        assert_eq!(feed.sent_to(1).await, vec!["a", "b", "c"]);
        assert_eq!(feed.sent_to(2).await, vec!["x"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_run_stops_on_shutdown() {
        let (engine, feed) = engine();
        feed.push(1, "Ann", "/help").await;

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(engine.run(Duration::from_millis(100), async {
            let _ = rx.await;
        }));

        tokio::time::sleep(Duration::from_millis(250)).await;
        tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(feed.sent_to(1).await, vec![replies::HELP.to_string()]);
    }
}
