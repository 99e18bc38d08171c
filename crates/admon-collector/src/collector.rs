//! Collection loop: fetch, aggregate, submit, budget, sleep.
//!
//! One cycle runs to completion before the next sleep starts; cycles never
//! overlap. Within a cycle, the fetches for a category run concurrently and
//! are all joined before aggregation. Per-call errors are logged and folded
//! into the cycle verdict; only budget exhaustion escapes the loop.

use std::sync::Arc;
use std::time::Duration;

use admon_core::config::{EmptyCategoryPolicy, PartialFetchPolicy, RelayConfig, ServersConfig};
use admon_core::{Category, MetaSnapshot, ServerId, Snapshot, StorageSnapshot};
use admon_sink::{collection_name, SinkClient};
use admon_store::{SnapshotSource, StoreError};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::aggregator::aggregate;
use crate::budget::{CycleVerdict, FailureBudget, LoopState};
use crate::sleeper::{Sleeper, TokioSleeper};

/// Everything the loop needs from configuration.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Prefix for sink collection names.
    pub namespace: String,
    pub servers: ServersConfig,
    pub interval: Duration,
    /// Bound on each snapshot fetch. Submissions are bounded by the sink client.
    pub fetch_timeout: Duration,
    pub empty_category: EmptyCategoryPolicy,
    pub partial_fetch: PartialFetchPolicy,
    pub failure_budget: u32,
    pub reset_window_cycles: u32,
}

impl LoopSettings {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            namespace: config.sink.namespace.clone(),
            servers: config.servers.clone(),
            interval: config.collector.poll_interval(),
            fetch_timeout: config.store.timeout,
            empty_category: config.collector.empty_category,
            partial_fetch: config.collector.partial_fetch,
            failure_budget: config.collector.failure_budget,
            reset_window_cycles: config.collector.reset_window_cycles,
        }
    }
}

/// What happened to one category in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// A document was accepted by the sink.
    Submitted { servers: usize, missing: usize },
    /// No servers are configured for the category.
    NotConfigured,
    /// Too many fetches failed to build a document.
    FetchFailed { configured: usize, missing: usize },
    /// A document was built but the sink did not accept it.
    SubmitFailed,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    pub meta: CategoryOutcome,
    pub storage: CategoryOutcome,
    pub verdict: CycleVerdict,
}

impl CycleReport {
    pub fn outcome(&self, category: Category) -> &CategoryOutcome {
        match category {
            Category::Meta => &self.meta,
            Category::Storage => &self.storage,
        }
    }
}

/// Why [`CollectionLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Shutdown was requested while sleeping between cycles.
    Shutdown { cycles: u64 },
    /// The failure budget ran out.
    BudgetExhausted { cycles: u64, failed_cycles: u32 },
}

pub struct CollectionLoop {
    source: Arc<dyn SnapshotSource>,
    sink: Arc<dyn SinkClient>,
    sleeper: Arc<dyn Sleeper>,
    settings: LoopSettings,
    budget: FailureBudget,
    cycles: u64,
    span: Span,
}

impl CollectionLoop {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        sink: Arc<dyn SinkClient>,
        settings: LoopSettings,
    ) -> Self {
        let budget = FailureBudget::new(settings.failure_budget, settings.reset_window_cycles);
        Self {
            source,
            sink,
            sleeper: Arc::new(TokioSleeper),
            settings,
            budget,
            cycles: 0,
            span: info_span!("collector"),
        }
    }

    /// Replace the sleeper used between cycles.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Span every cycle's log lines are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn state(&self) -> LoopState {
        self.budget.state()
    }

    pub fn budget(&self) -> &FailureBudget {
        &self.budget
    }

    /// Number of cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle and fold its verdict into the failure budget.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let cycle = self.cycles + 1;
        let span = info_span!(parent: &self.span, "cycle", cycle);
        let (meta, storage) = async {
            let meta = self.collect_category::<MetaSnapshot>().await;
            let storage = self.collect_category::<StorageSnapshot>().await;
            (meta, storage)
        }
        .instrument(span.clone())
        .await;

        let verdict = if self.category_failed(&meta) || self.category_failed(&storage) {
            CycleVerdict::Failed
        } else {
            CycleVerdict::Succeeded
        };

        self.cycles = cycle;
        let state = self.budget.record(verdict);

        span.in_scope(|| {
            let failed_cycles = self.budget.consecutive_failed_cycles();
            match verdict {
                CycleVerdict::Succeeded => {
                    debug!(?meta, ?storage, failed_cycles, "cycle complete")
                }
                CycleVerdict::Failed => warn!(
                    ?meta,
                    ?storage,
                    failed_cycles,
                    budget = self.budget.budget(),
                    ?state,
                    "cycle failed"
                ),
            }
        });

        CycleReport {
            cycle,
            meta,
            storage,
            verdict,
        }
    }

    /// Run cycles until the budget is exhausted or `shutdown` fires.
    ///
    /// Shutdown is only observed while sleeping between cycles, so a cycle
    /// that has started always completes.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> LoopExit {
        let span = self.span.clone();
        self.run_inner(shutdown).instrument(span).await
    }

    async fn run_inner(&mut self, mut shutdown: watch::Receiver<bool>) -> LoopExit {
        info!(
            interval_secs = self.settings.interval.as_secs(),
            meta_servers = self.settings.servers.meta.len(),
            storage_servers = self.settings.servers.storage.len(),
            failure_budget = self.budget.budget(),
            reset_window = self.budget.reset_window(),
            "collection loop started"
        );

        loop {
            self.run_cycle().await;

            let cycles = self.cycles;
            if self.budget.state() == LoopState::Terminated {
                let failed_cycles = self.budget.consecutive_failed_cycles();
                error!(
                    cycles,
                    failed_cycles,
                    budget = self.budget.budget(),
                    "failure budget exhausted, stopping collection"
                );
                return LoopExit::BudgetExhausted {
                    cycles,
                    failed_cycles,
                };
            }

            tokio::select! {
                _ = self.sleeper.sleep(self.settings.interval) => {}
                _ = shutdown.changed() => {
                    info!(cycles, "collection loop shutting down");
                    return LoopExit::Shutdown { cycles };
                }
            }
        }
    }

    fn category_failed(&self, outcome: &CategoryOutcome) -> bool {
        match outcome {
            CategoryOutcome::Submitted { .. } => false,
            CategoryOutcome::NotConfigured => {
                self.settings.empty_category == EmptyCategoryPolicy::Fail
            }
            CategoryOutcome::FetchFailed { .. } | CategoryOutcome::SubmitFailed => true,
        }
    }

    /// Fetch, aggregate and submit one category.
    async fn collect_category<S: Snapshot>(&self) -> CategoryOutcome {
        let category = S::CATEGORY;
        let servers = self.settings.servers.for_category(category);
        if servers.is_empty() {
            debug!(%category, "no servers configured");
            return CategoryOutcome::NotConfigured;
        }

        let configured = servers.len();
        let snapshots = self.fetch_all::<S>(servers).await;
        let missing = configured - snapshots.len();

        let abort = match self.settings.partial_fetch {
            PartialFetchPolicy::AbortCategory => missing > 0,
            PartialFetchPolicy::Tolerate => snapshots.is_empty(),
        };
        if abort {
            warn!(%category, configured, missing, "skipping category this cycle");
            return CategoryOutcome::FetchFailed {
                configured,
                missing,
            };
        }

        let fetched = snapshots.len();
        let document = match aggregate(snapshots) {
            Ok(document) => document,
            Err(e) => {
                warn!(%category, error = %e, "aggregation failed");
                return CategoryOutcome::FetchFailed {
                    configured,
                    missing,
                };
            }
        };

        let collection = collection_name(&self.settings.namespace, document.category());
        let body = match serde_json::to_value(&document) {
            Ok(body) => body,
            Err(e) => {
                warn!(%category, %collection, error = %e, "failed to encode document");
                return CategoryOutcome::SubmitFailed;
            }
        };

        match self.sink.submit(&collection, &body).await {
            Ok(()) => {
                info!(%category, %collection, servers = fetched, missing, "aggregate submitted");
                CategoryOutcome::Submitted {
                    servers: fetched,
                    missing,
                }
            }
            Err(e) => {
                warn!(%category, %collection, error = %e, "submission failed");
                CategoryOutcome::SubmitFailed
            }
        }
    }

    /// Fetch every server of one category concurrently.
    ///
    /// Returns only the usable snapshots; failures are logged here.
    async fn fetch_all<S: Snapshot>(&self, servers: &[ServerId]) -> Vec<S> {
        let category = S::CATEGORY;
        let timeout = self.settings.fetch_timeout;
        let mut tasks = JoinSet::new();

        for server in servers {
            let source = Arc::clone(&self.source);
            let server = server.clone();
            tasks.spawn(async move {
                let result =
                    match tokio::time::timeout(timeout, source.fetch_latest(category, &server))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(StoreError::Timeout {
                            category,
                            server: server.clone(),
                            timeout,
                        }),
                    };
                (server, result)
            });
        }

        let mut snapshots = Vec::with_capacity(servers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((server, Ok(record))) => match S::try_from(record) {
                    Ok(snapshot) => snapshots.push(snapshot),
                    Err(other) => warn!(
                        %category,
                        %server,
                        returned = %other.category(),
                        "store returned a snapshot of the wrong category"
                    ),
                },
                Ok((server, Err(e))) => {
                    warn!(%category, %server, error = %e, "snapshot fetch failed");
                }
                Err(e) => {
                    warn!(%category, error = %e, "snapshot fetch task failed");
                }
            }
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admon_core::{BoxFuture, SnapshotRecord};
    use admon_sink::{MemorySink, SinkError, SinkResult};
    use admon_store::{MemorySnapshotSource, StoreResult};

    use crate::sleeper::InstantSleeper;

    fn sid(s: &str) -> ServerId {
        ServerId::new(s).unwrap()
    }

    fn meta(work: i64, queued: i64) -> MetaSnapshot {
        MetaSnapshot {
            work_requests: work,
            queued_requests: queued,
        }
    }

    fn storage(read: i64) -> StorageSnapshot {
        StorageSnapshot {
            disk_read: read,
            disk_write: 2 * read,
            disk_read_per_sec: 1,
            disk_write_per_sec: 1,
            disk_space_total: 1000,
            disk_space_free: 500,
        }
    }

    fn settings(meta: &[&str], storage: &[&str]) -> LoopSettings {
        LoopSettings {
            namespace: "fhgfs".to_string(),
            servers: ServersConfig {
                meta: meta.iter().map(|s| sid(s)).collect(),
                storage: storage.iter().map(|s| sid(s)).collect(),
            },
            interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(1),
            empty_category: EmptyCategoryPolicy::Skip,
            partial_fetch: PartialFetchPolicy::AbortCategory,
            failure_budget: 5,
            reset_window_cycles: 10,
        }
    }

    struct Harness {
        source: Arc<MemorySnapshotSource>,
        sink: Arc<MemorySink>,
        sleeper: Arc<InstantSleeper>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                source: Arc::new(MemorySnapshotSource::new()),
                sink: Arc::new(MemorySink::new()),
                sleeper: Arc::new(InstantSleeper::new()),
            }
        }

        fn build(&self, settings: LoopSettings) -> CollectionLoop {
            CollectionLoop::new(self.source.clone(), self.sink.clone(), settings)
                .with_sleeper(self.sleeper.clone())
        }
    }

    /// A source that never answers.
    struct StalledSource;

    impl SnapshotSource for StalledSource {
        fn fetch_latest<'a>(
            &'a self,
            _category: Category,
            _server: &'a ServerId,
        ) -> BoxFuture<'a, StoreResult<SnapshotRecord>> {
            Box::pin(std::future::pending())
        }
    }

    /// A sink whose every submission runs out of time.
    struct TimedOutSink;

    impl SinkClient for TimedOutSink {
        fn submit<'a>(
            &'a self,
            _collection: &'a str,
            _document: &'a serde_json::Value,
        ) -> BoxFuture<'a, SinkResult<()>> {
            Box::pin(std::future::ready(Err(SinkError::Timeout {
                address: "127.0.0.1:9200".to_string(),
                timeout: Duration::from_secs(10),
            })))
        }
    }

    /// A sleeper that never wakes, so only shutdown can end the sleep.
    struct NeverWake;

    impl Sleeper for NeverWake {
        fn sleep(&self, _duration: Duration) -> BoxFuture<'_, ()> {
            Box::pin(std::future::pending())
        }
    }

    #[tokio::test]
    async fn sums_metadata_servers() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(3, 1));
        h.source.insert(&sid("meta02"), meta(5, 0));
        let mut collector = h.build(settings(&["meta01", "meta02"], &[]));

        let report = collector.run_cycle().await;
        assert_eq!(report.cycle, 1);
        assert_eq!(report.verdict, CycleVerdict::Succeeded);
        assert_eq!(
            report.meta,
            CategoryOutcome::Submitted {
                servers: 2,
                missing: 0
            }
        );
        assert_eq!(report.storage, CategoryOutcome::NotConfigured);

        let accepted = h.sink.accepted();
        assert_eq!(accepted.len(), 1);
        let (collection, doc) = &accepted[0];
        assert_eq!(collection, "fhgfs-meta");
        assert_eq!(doc["workRequests"], 8);
        assert_eq!(doc["queuedRequests"], 1);
        assert!(doc["timestamp"].is_string());
    }

    #[tokio::test]
    async fn submits_both_categories() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 1));
        h.source.insert(&sid("st01"), storage(10));
        h.source.insert(&sid("st02"), storage(5));
        let mut collector = h.build(settings(&["meta01"], &["st01", "st02"]));

        let report = collector.run_cycle().await;
        assert_eq!(report.verdict, CycleVerdict::Succeeded);

        let accepted = h.sink.accepted();
        let (_, doc) = accepted
            .iter()
            .find(|(c, _)| c == "fhgfs-storage")
            .expect("storage document");
        assert_eq!(doc["diskRead"], 15);
        assert_eq!(doc["diskWrite"], 30);
        assert_eq!(doc["diskSpaceTotal"], 2000);
        assert_eq!(doc["diskSpaceFree"], 1000);
    }

    #[tokio::test]
    async fn missing_storage_server_fails_cycle() {
        let h = Harness::new();
        let mut collector = h.build(settings(&[], &["storage01"]));

        let report = collector.run_cycle().await;
        assert_eq!(
            report.storage,
            CategoryOutcome::FetchFailed {
                configured: 1,
                missing: 1
            }
        );
        assert_eq!(report.verdict, CycleVerdict::Failed);
        assert!(h.sink.accepted().is_empty());
        assert_eq!(collector.budget().consecutive_failed_cycles(), 1);
    }

    #[tokio::test]
    async fn failed_category_does_not_block_the_other() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(2, 2));
        let mut collector = h.build(settings(&["meta01"], &["storage01"]));

        let report = collector.run_cycle().await;
        assert!(matches!(report.meta, CategoryOutcome::Submitted { .. }));
        assert!(matches!(report.storage, CategoryOutcome::FetchFailed { .. }));
        assert_eq!(report.verdict, CycleVerdict::Failed);
        assert_eq!(h.sink.accepted().len(), 1);
    }

    #[tokio::test]
    async fn partial_fetch_aborts_category_by_default() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(3, 1));
        let mut collector = h.build(settings(&["meta01", "meta02"], &[]));

        let report = collector.run_cycle().await;
        assert_eq!(
            report.meta,
            CategoryOutcome::FetchFailed {
                configured: 2,
                missing: 1
            }
        );
        assert!(h.sink.accepted().is_empty());
    }

    #[tokio::test]
    async fn partial_fetch_tolerated_when_configured() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(3, 1));
        let mut s = settings(&["meta01", "meta02"], &[]);
        s.partial_fetch = PartialFetchPolicy::Tolerate;
        let mut collector = h.build(s);

        let report = collector.run_cycle().await;
        assert_eq!(
            report.meta,
            CategoryOutcome::Submitted {
                servers: 1,
                missing: 1
            }
        );
        assert_eq!(report.verdict, CycleVerdict::Succeeded);
        assert_eq!(h.sink.accepted()[0].1["workRequests"], 3);
    }

    #[tokio::test]
    async fn tolerate_still_fails_when_nothing_fetched() {
        let h = Harness::new();
        let mut s = settings(&["meta01", "meta02"], &[]);
        s.partial_fetch = PartialFetchPolicy::Tolerate;
        let mut collector = h.build(s);

        let report = collector.run_cycle().await;
        assert_eq!(report.verdict, CycleVerdict::Failed);
    }

    #[tokio::test]
    async fn empty_category_policy() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 0));

        let mut collector = h.build(settings(&["meta01"], &[]));
        assert_eq!(collector.run_cycle().await.verdict, CycleVerdict::Succeeded);

        let mut s = settings(&["meta01"], &[]);
        s.empty_category = EmptyCategoryPolicy::Fail;
        let mut collector = h.build(s);
        let report = collector.run_cycle().await;
        assert_eq!(report.storage, CategoryOutcome::NotConfigured);
        assert_eq!(report.verdict, CycleVerdict::Failed);
    }

    #[tokio::test]
    async fn store_outage_fails_cycle() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 0));
        h.source.set_unavailable(true);
        let mut collector = h.build(settings(&["meta01"], &[]));

        let report = collector.run_cycle().await;
        assert!(matches!(report.meta, CategoryOutcome::FetchFailed { .. }));
        assert_eq!(h.sink.attempts(), 0);
    }

    #[tokio::test]
    async fn rejected_submission_fails_cycle() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 0));
        h.sink.set_rejecting(true);
        let mut collector = h.build(settings(&["meta01"], &[]));

        let report = collector.run_cycle().await;
        assert_eq!(report.meta, CategoryOutcome::SubmitFailed);
        assert_eq!(report.verdict, CycleVerdict::Failed);
        assert_eq!(h.sink.attempts(), 1);
    }

    #[tokio::test]
    async fn stalled_fetch_times_out() {
        let sink = Arc::new(MemorySink::new());
        let mut s = settings(&["meta01"], &[]);
        s.fetch_timeout = Duration::from_millis(50);
        let mut collector = CollectionLoop::new(Arc::new(StalledSource), sink.clone(), s);

        let report = collector.run_cycle().await;
        assert_eq!(
            report.meta,
            CategoryOutcome::FetchFailed {
                configured: 1,
                missing: 1
            }
        );
        assert_eq!(sink.attempts(), 0);
    }

    #[tokio::test]
    async fn submit_timeout_fails_cycle() {
        let source = Arc::new(MemorySnapshotSource::new());
        source.insert(&sid("meta01"), meta(1, 0));
        let mut collector =
            CollectionLoop::new(source, Arc::new(TimedOutSink), settings(&["meta01"], &[]));

        let report = collector.run_cycle().await;
        assert_eq!(report.meta, CategoryOutcome::SubmitFailed);
        assert_eq!(report.verdict, CycleVerdict::Failed);
    }

    #[tokio::test]
    async fn rejecting_sink_terminates_on_fifth_cycle() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 0));
        h.sink.set_rejecting(true);
        let mut s = settings(&["meta01"], &[]);
        s.failure_budget = 5;
        s.reset_window_cycles = 50;
        let mut collector = h.build(s);

        let (_tx, rx) = watch::channel(false);
        let exit = collector.run(rx).await;

        assert_eq!(
            exit,
            LoopExit::BudgetExhausted {
                cycles: 5,
                failed_cycles: 5
            }
        );
        assert_eq!(collector.state(), LoopState::Terminated);
        assert_eq!(h.sink.attempts(), 5);
        // Slept between cycles 1-5, never after the terminal one.
        assert_eq!(h.sleeper.sleeps(), 4);
    }

    #[tokio::test]
    async fn still_running_after_four_failures() {
        let h = Harness::new();
        h.sink.set_rejecting(true);
        h.source.insert(&sid("meta01"), meta(1, 0));
        let mut s = settings(&["meta01"], &[]);
        s.reset_window_cycles = 50;
        let mut collector = h.build(s);

        for _ in 0..4 {
            collector.run_cycle().await;
        }
        assert_eq!(collector.state(), LoopState::Running);
        collector.run_cycle().await;
        assert_eq!(collector.state(), LoopState::Terminated);
    }

    #[tokio::test]
    async fn reset_window_keeps_a_failing_agent_alive() {
        let h = Harness::new();
        h.sink.set_rejecting(true);
        h.source.insert(&sid("meta01"), meta(1, 0));
        let mut s = settings(&["meta01"], &[]);
        s.failure_budget = 3;
        s.reset_window_cycles = 2;
        let mut collector = h.build(s);

        for _ in 0..20 {
            collector.run_cycle().await;
        }
        assert_eq!(collector.state(), LoopState::Running);
        assert_eq!(collector.cycles(), 20);
    }

    #[tokio::test]
    async fn recovery_resumes_submissions() {
        let h = Harness::new();
        h.source.insert(&sid("meta01"), meta(1, 0));
        h.sink.set_rejecting(true);
        let mut collector = h.build(settings(&["meta01"], &[]));

        collector.run_cycle().await;
        collector.run_cycle().await;
        h.sink.set_rejecting(false);
        let report = collector.run_cycle().await;

        assert_eq!(report.verdict, CycleVerdict::Succeeded);
        assert_eq!(h.sink.accepted().len(), 1);
        // Failures are only forgiven by the reset window.
        assert_eq!(collector.budget().consecutive_failed_cycles(), 2);
    }

    #[tokio::test]
    async fn shutdown_is_observed_while_sleeping() {
        let source = Arc::new(MemorySnapshotSource::new());
        source.insert(&sid("meta01"), meta(1, 0));
        let sink = Arc::new(MemorySink::new());
        let mut collector =
            CollectionLoop::new(source, sink.clone(), settings(&["meta01"], &[]))
                .with_sleeper(Arc::new(NeverWake));

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let exit = collector.run(rx).await;

        assert_eq!(exit, LoopExit::Shutdown { cycles: 1 });
        assert_eq!(collector.state(), LoopState::Running);
        assert_eq!(sink.accepted().len(), 1);
    }

    #[test]
    fn from_config_maps_every_knob() {
        let config = RelayConfig::parse(
            r#"
[store]
path = "/tmp/admon.db"
timeout = "2s"

[sink]
host = "localhost"
namespace = "beegfs"
timeout = "3s"

[servers]
meta = ["m1"]

[collector]
poll_interval_secs = 15
failure_budget = 7
reset_window_cycles = 50
empty_category = "fail"
partial_fetch = "tolerate"
"#,
        )
        .unwrap();

        let s = LoopSettings::from_config(&config);
        assert_eq!(s.namespace, "beegfs");
        assert_eq!(s.interval, Duration::from_secs(15));
        assert_eq!(s.fetch_timeout, Duration::from_secs(2));
        assert_eq!(s.failure_budget, 7);
        assert_eq!(s.reset_window_cycles, 50);
        assert_eq!(s.empty_category, EmptyCategoryPolicy::Fail);
        assert_eq!(s.partial_fetch, PartialFetchPolicy::Tolerate);
        assert_eq!(s.servers.meta.len(), 1);
    }
}
