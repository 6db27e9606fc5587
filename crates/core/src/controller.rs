//! The dashboard controller: loaders, the manual scan trigger, and the
//! periodic refresh loop.
//!
//! Loads are sequenced by a request token taken when the load starts. A
//! response is applied only while its token is still the newest one, so the
//! view always shows the most recently initiated load no matter in which order
//! responses arrive.

use crate::api::DashboardApi;
use crate::config::{FailureVisibility, Settings};
use crate::domain::recommendation::{Recommendation, RecommendationRef, RecommendationSummary};
use crate::domain::reply::Reply;
use crate::domain::scan::ScanSnapshot;
use crate::render::{format_currency, region_summary_html};
use crate::status::{Severity, StatusBoard};
use crate::time::scan_time::format_scan_time;
use crate::view::{lock, ElementId, SharedView, View};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub const NO_SCAN_DATA_MESSAGE: &str =
    "No scan data available. Click \"Run Manual Scan\" to start.";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading dashboard data";
pub const NO_SAVINGS_DATA_MESSAGE: &str = "No recommendation data available";
pub const SAVINGS_FAILED_MESSAGE: &str = "Error loading savings data";
pub const SCANNING_MESSAGE: &str = "Scanning AWS resources across all regions...";
pub const IDLE_LABEL: &str = "Run Manual Scan";
pub const SCANNING_LABEL: &str = "Scanning...";
pub const VIEW_RECOMMENDATIONS_LABEL: &str = "View Recommendations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderPolicy {
    pub scan: FailureVisibility,
    pub savings: FailureVisibility,
}

impl Default for LoaderPolicy {
    fn default() -> Self {
        Self {
            scan: FailureVisibility::Status,
            savings: FailureVisibility::Log,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    Unavailable,
    Failed,
    /// A newer load was started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Completed {
        recommendations_count: u64,
        potential_savings: f64,
    },
    Failed(String),
    Errored(String),
    /// The trigger control was disabled; nothing was sent.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Executed(String),
    Failed(String),
    Errored(String),
}

pub struct DashboardController<A, V> {
    api: Arc<A>,
    view: SharedView<V>,
    status: StatusBoard<V>,
    policy: LoaderPolicy,
    refresh_interval: Duration,
    scan_seq: Arc<AtomicU64>,
    savings_seq: Arc<AtomicU64>,
}

impl<A, V> Clone for DashboardController<A, V> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            view: Arc::clone(&self.view),
            status: self.status.clone(),
            policy: self.policy,
            refresh_interval: self.refresh_interval,
            scan_seq: Arc::clone(&self.scan_seq),
            savings_seq: Arc::clone(&self.savings_seq),
        }
    }
}

impl<A, V> DashboardController<A, V>
where
    A: DashboardApi + 'static,
    V: View + 'static,
{
    pub fn from_settings(api: Arc<A>, view: SharedView<V>, settings: &Settings) -> Self {
        let policy = LoaderPolicy {
            scan: settings.scan_failure_visibility,
            savings: settings.savings_failure_visibility,
        };
        Self::new(
            api,
            view,
            policy,
            settings.refresh_interval(),
            settings.status_timeout(),
        )
    }

    pub fn new(
        api: Arc<A>,
        view: SharedView<V>,
        policy: LoaderPolicy,
        refresh_interval: Duration,
        status_timeout: Duration,
    ) -> Self {
        {
            let mut v = lock(&view);
            v.set_text(ElementId::TriggerScan, IDLE_LABEL);
            v.set_text(ElementId::ViewRecommendations, VIEW_RECOMMENDATIONS_LABEL);
        }
        let status = StatusBoard::new(Arc::clone(&view), status_timeout);
        Self {
            api,
            view,
            status,
            policy,
            refresh_interval,
            scan_seq: Arc::new(AtomicU64::new(0)),
            savings_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn view(&self) -> &SharedView<V> {
        &self.view
    }

    /// Load the latest scan snapshot into the metric, scan-time and region elements.
    pub async fn load_dashboard(&self) -> LoadOutcome {
        let token = self.scan_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let res = self.api.latest_scan().await;

        let outcome = {
            let mut view = lock(&self.view);
            if self.scan_seq.load(Ordering::SeqCst) != token {
                tracing::debug!(token, "dropping superseded scan snapshot");
                return LoadOutcome::Superseded;
            }

            match res {
                Ok(Reply::Ready(snapshot)) => {
                    apply_snapshot(&mut *view, &snapshot);
                    LoadOutcome::Rendered
                }
                Ok(Reply::Unavailable(reason)) => {
                    tracing::info!(%reason, "no scan data available");
                    self.report(&mut *view, self.policy.scan, NO_SCAN_DATA_MESSAGE);
                    LoadOutcome::Unavailable
                }
                Err(err) => {
                    tracing::error!(error = %format!("{err:#}"), "error loading dashboard");
                    self.report(&mut *view, self.policy.scan, LOAD_FAILED_MESSAGE);
                    LoadOutcome::Failed
                }
            }
        };

        if outcome == LoadOutcome::Rendered {
            self.load_savings().await;
        }
        outcome
    }

    /// Load the latest recommendation summary into the savings element.
    pub async fn load_savings(&self) -> LoadOutcome {
        let token = self.savings_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let res = self.api.latest_recommendations().await;

        let mut view = lock(&self.view);
        if self.savings_seq.load(Ordering::SeqCst) != token {
            tracing::debug!(token, "dropping superseded savings summary");
            return LoadOutcome::Superseded;
        }

        match res {
            Ok(Reply::Ready(RecommendationSummary {
                total_potential_savings: Some(total),
                ..
            })) => {
                view.set_text(ElementId::PotentialSavings, &format_currency(total));
                LoadOutcome::Rendered
            }
            Ok(Reply::Ready(_)) => {
                tracing::error!("recommendation report has no total_potential_savings");
                self.report(&mut *view, self.policy.savings, SAVINGS_FAILED_MESSAGE);
                LoadOutcome::Failed
            }
            Ok(Reply::Unavailable(reason)) => {
                tracing::info!(%reason, "no recommendation data available");
                self.report(&mut *view, self.policy.savings, NO_SAVINGS_DATA_MESSAGE);
                LoadOutcome::Unavailable
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "error loading savings");
                self.report(&mut *view, self.policy.savings, SAVINGS_FAILED_MESSAGE);
                LoadOutcome::Failed
            }
        }
    }

    /// Ask the backend for a fresh scan, then reload the dashboard on success.
    pub async fn trigger_manual_scan(&self) -> TriggerOutcome {
        match self.begin_manual_scan() {
            Some(scan) => scan.await,
            None => TriggerOutcome::Busy,
        }
    }

    /// Put the trigger control into its scanning state now and return the
    /// request still to be driven. `None` while a scan is already in flight.
    pub fn begin_manual_scan(&self) -> Option<impl Future<Output = TriggerOutcome> + Send + 'static> {
        let Some(control) = ScanControl::engage(&self.view) else {
            tracing::debug!("trigger ignored; scan already in progress");
            return None;
        };
        self.status.show(SCANNING_MESSAGE, Severity::Success);
        tracing::info!("manual scan triggered");

        let this = self.clone();
        Some(async move { this.finish_manual_scan(control).await })
    }

    async fn finish_manual_scan(&self, control: ScanControl<V>) -> TriggerOutcome {
        let outcome = {
            let _control = control;
            match self.api.trigger_scan().await {
                Ok(res) if res.success => {
                    let recommendations_count = res.recommendations_count.unwrap_or(0);
                    let potential_savings = res.potential_savings.unwrap_or(0.0);
                    tracing::info!(recommendations_count, potential_savings, "manual scan complete");
                    self.status.show(
                        &format!(
                            "Scan complete! Found {recommendations_count} recommendations. Potential savings: ${potential_savings}/month"
                        ),
                        Severity::Success,
                    );
                    TriggerOutcome::Completed {
                        recommendations_count,
                        potential_savings,
                    }
                }
                Ok(res) => {
                    let reason = res.error.unwrap_or_else(|| "unknown error".to_string());
                    tracing::warn!(%reason, "manual scan failed");
                    self.status
                        .show(&format!("Scan failed: {reason}"), Severity::Error);
                    TriggerOutcome::Failed(reason)
                }
                Err(err) => {
                    let detail = format!("{err:#}");
                    tracing::error!(error = %detail, "manual scan request failed");
                    self.status.show(&format!("Error: {detail}"), Severity::Error);
                    TriggerOutcome::Errored(detail)
                }
            }
        };

        if matches!(outcome, TriggerOutcome::Completed { .. }) {
            self.load_dashboard().await;
        }
        outcome
    }

    pub async fn latest_recommendations(&self) -> anyhow::Result<Reply<RecommendationSummary>> {
        self.api.latest_recommendations().await
    }

    /// Execute the picked row of the latest report, provided it still names the
    /// same resource and action.
    pub async fn execute_latest(&self, picked: &RecommendationRef) -> ActionOutcome {
        let index = picked.index;
        let summary = match self.api.latest_recommendations().await {
            Ok(Reply::Ready(summary)) => summary,
            Ok(Reply::Unavailable(reason)) => {
                self.status
                    .show(&format!("Action failed: {reason}"), Severity::Error);
                return ActionOutcome::Failed(reason);
            }
            Err(err) => {
                let detail = format!("{err:#}");
                tracing::error!(error = %detail, "error loading recommendations");
                self.status.show(&format!("Error: {detail}"), Severity::Error);
                return ActionOutcome::Errored(detail);
            }
        };

        let Some(rec) = summary.recommendations.get(index) else {
            let reason = format!(
                "recommendation #{index} not found (latest report has {})",
                summary.recommendations.len()
            );
            self.status
                .show(&format!("Action failed: {reason}"), Severity::Error);
            return ActionOutcome::Failed(reason);
        };

        if !picked.matches(rec) {
            tracing::warn!(
                index,
                expected_resource = %picked.resource_id,
                expected_action = %picked.action,
                found_resource = %rec.resource_id,
                found_action = %rec.action,
                "recommendation changed since it was listed"
            );
            let reason = "recommendation changed".to_string();
            self.status
                .show(&format!("Action failed: {reason}"), Severity::Error);
            return ActionOutcome::Failed(reason);
        }

        self.execute(rec).await
    }

    pub async fn execute(&self, rec: &Recommendation) -> ActionOutcome {
        tracing::info!(action = %rec.action, resource_id = %rec.resource_id, region = %rec.region, "executing recommendation");

        match self.api.execute_action(rec).await {
            Ok(res) if res.success => {
                let message = res
                    .message
                    .unwrap_or_else(|| format!("Executed {} on {}", rec.action, rec.resource_id));
                self.status.show(&message, Severity::Success);
                ActionOutcome::Executed(message)
            }
            Ok(res) => {
                let reason = res.error.unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!(%reason, resource_id = %rec.resource_id, "action failed");
                self.status
                    .show(&format!("Action failed: {reason}"), Severity::Error);
                ActionOutcome::Failed(reason)
            }
            Err(err) => {
                let detail = format!("{err:#}");
                tracing::error!(error = %detail, "execute-action request failed");
                self.status.show(&format!("Error: {detail}"), Severity::Error);
                ActionOutcome::Errored(detail)
            }
        }
    }

    /// Load once immediately, then every refresh interval until `shutdown` resolves.
    ///
    /// Each tick's load runs on its own task, so a slow backend does not delay
    /// the next tick.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("dashboard refresh loop stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let this = self.clone();
                    tokio::spawn(async move {
                        this.load_dashboard().await;
                    });
                }
            }
        }
    }

    fn report(&self, view: &mut V, visibility: FailureVisibility, message: &str) {
        if visibility == FailureVisibility::Status {
            self.status.show_locked(view, message, Severity::Error);
        }
    }
}

fn apply_snapshot<V: View + ?Sized>(view: &mut V, snapshot: &ScanSnapshot) {
    let summary = &snapshot.summary;
    view.set_text(ElementId::TotalEc2, &summary.total_ec2_instances.to_string());
    view.set_text(ElementId::IdleEc2, &summary.idle_ec2_instances.to_string());
    view.set_text(
        ElementId::UnattachedEbs,
        &summary.unattached_ebs_volumes.to_string(),
    );
    view.set_text(
        ElementId::ScanTime,
        &format!("Last scan: {}", format_scan_time(&snapshot.scan_time)),
    );
    view.set_html(
        ElementId::RegionsSummary,
        &region_summary_html(&snapshot.regions),
    );
}

/// Holds the trigger control in its scanning state; dropping it always
/// restores the idle state, whatever happened to the request.
struct ScanControl<V: View> {
    view: SharedView<V>,
}

impl<V: View> ScanControl<V> {
    fn engage(view: &SharedView<V>) -> Option<Self> {
        let mut v = lock(view);
        if v.is_disabled(ElementId::TriggerScan) {
            return None;
        }
        v.set_disabled(ElementId::TriggerScan, true);
        v.set_text(ElementId::TriggerScan, SCANNING_LABEL);
        Some(Self {
            view: Arc::clone(view),
        })
    }
}

impl<V: View> Drop for ScanControl<V> {
    fn drop(&mut self) {
        let mut v = lock(&self.view);
        v.set_disabled(ElementId::TriggerScan, false);
        v.set_text(ElementId::TriggerScan, IDLE_LABEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::ActionResult;
    use crate::domain::scan::ScanTriggerResult;
    use crate::view::{shared, MemoryView};
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct Scripted {
        delay: Duration,
        body: Result<Value, String>,
    }

    fn ok(body: Value) -> Scripted {
        Scripted {
            delay: Duration::ZERO,
            body: Ok(body),
        }
    }

    fn delayed(ms: u64, body: Value) -> Scripted {
        Scripted {
            delay: Duration::from_millis(ms),
            body: Ok(body),
        }
    }

    fn unreachable(ms: u64) -> Scripted {
        Scripted {
            delay: Duration::from_millis(ms),
            body: Err("connection refused".to_string()),
        }
    }

    #[derive(Default)]
    struct FakeApi {
        scans: Mutex<VecDeque<Scripted>>,
        recommendations: Mutex<VecDeque<Scripted>>,
        triggers: Mutex<VecDeque<Scripted>>,
        actions: Mutex<VecDeque<Scripted>>,
        scan_calls: AtomicUsize,
        savings_calls: AtomicUsize,
        trigger_calls: AtomicUsize,
        executed: Mutex<Vec<Recommendation>>,
    }

    impl FakeApi {
        fn push(queue: &Mutex<VecDeque<Scripted>>, s: Scripted) {
            queue.lock().unwrap().push_back(s);
        }

        async fn next(queue: &Mutex<VecDeque<Scripted>>, calls: Option<&AtomicUsize>) -> anyhow::Result<Value> {
            if let Some(calls) = calls {
                calls.fetch_add(1, Ordering::SeqCst);
            }
            let scripted = queue.lock().unwrap().pop_front();
            let Some(scripted) = scripted else {
                anyhow::bail!("no scripted response");
            };
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.body.map_err(|e| anyhow::anyhow!(e))
        }
    }

    #[async_trait::async_trait]
    impl DashboardApi for FakeApi {
        async fn latest_scan(&self) -> anyhow::Result<Reply<ScanSnapshot>> {
            Reply::from_value(Self::next(&self.scans, Some(&self.scan_calls)).await?)
        }

        async fn latest_recommendations(&self) -> anyhow::Result<Reply<RecommendationSummary>> {
            Reply::from_value(Self::next(&self.recommendations, Some(&self.savings_calls)).await?)
        }

        async fn trigger_scan(&self) -> anyhow::Result<ScanTriggerResult> {
            let raw = Self::next(&self.triggers, Some(&self.trigger_calls)).await?;
            Ok(serde_json::from_value(raw)?)
        }

        async fn execute_action(&self, rec: &Recommendation) -> anyhow::Result<ActionResult> {
            self.executed.lock().unwrap().push(rec.clone());
            let raw = Self::next(&self.actions, None).await?;
            Ok(serde_json::from_value(raw)?)
        }
    }

    fn snapshot(total: u64, idle: u64, ebs: u64) -> Value {
        json!({
            "scan_time": "2025-01-15T10:30:00.123456",
            "summary": {
                "total_ec2_instances": total,
                "idle_ec2_instances": idle,
                "unattached_ebs_volumes": ebs
            },
            "regions": {
                "us-east-1": {
                    "ec2_instances": [{"instance_id": "i-1"}, {"instance_id": "i-2"}],
                    "ebs_volumes": [{"volume_id": "vol-1"}],
                    "rds_instances": []
                },
                "eu-west-1": {"ec2_instances": [], "ebs_volumes": [], "rds_instances": [{}]}
            }
        })
    }

    fn recommendations() -> Value {
        json!({
            "timestamp": "2025-01-15T10:31:00",
            "total_potential_savings": 1234.5,
            "recommendations": [
                {
                    "type": "EC2_IDLE",
                    "severity": "HIGH",
                    "region": "us-east-1",
                    "resource_id": "i-1",
                    "action": "STOP",
                    "monthly_savings": 8.35
                },
                {
                    "type": "EBS_UNATTACHED",
                    "severity": "MEDIUM",
                    "region": "us-east-1",
                    "resource_id": "vol-1",
                    "action": "SNAPSHOT_DELETE",
                    "monthly_savings": 10.0
                }
            ]
        })
    }

    fn setup(policy: LoaderPolicy) -> (Arc<FakeApi>, SharedView<MemoryView>, DashboardController<FakeApi, MemoryView>) {
        let api = Arc::new(FakeApi::default());
        let view = shared(MemoryView::new());
        let controller = DashboardController::new(
            Arc::clone(&api),
            Arc::clone(&view),
            policy,
            Duration::from_secs(60),
            Duration::from_millis(5000),
        );
        (api, view, controller)
    }

    fn picked(index: usize, resource_id: &str, action: &str) -> RecommendationRef {
        RecommendationRef {
            index,
            resource_id: resource_id.to_string(),
            action: action.to_string(),
        }
    }

    const METRICS: [ElementId; 5] = [
        ElementId::TotalEc2,
        ElementId::IdleEc2,
        ElementId::UnattachedEbs,
        ElementId::ScanTime,
        ElementId::RegionsSummary,
    ];

    #[tokio::test]
    async fn error_snapshot_shows_fixed_message_and_touches_no_metric() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.scans, ok(json!({"error": "No scan data available"})));

        assert_eq!(controller.load_dashboard().await, LoadOutcome::Unavailable);

        let v = lock(&view);
        assert_eq!(v.text(ElementId::StatusMessage), Some(NO_SCAN_DATA_MESSAGE));
        assert_eq!(v.class(ElementId::StatusMessage), Some("status error show"));
        for id in METRICS {
            assert_eq!(v.write_count(id), 0, "{id} was modified");
        }
        assert_eq!(api.savings_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_snapshot_renders_everything() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.scans, ok(snapshot(12, 4, 3)));
        FakeApi::push(&api.recommendations, ok(recommendations()));

        assert_eq!(controller.load_dashboard().await, LoadOutcome::Rendered);

        let v = lock(&view);
        assert_eq!(v.text(ElementId::TotalEc2), Some("12"));
        assert_eq!(v.text(ElementId::IdleEc2), Some("4"));
        assert_eq!(v.text(ElementId::UnattachedEbs), Some("3"));
        assert_eq!(v.text(ElementId::PotentialSavings), Some("$1234.50"));
        assert_eq!(
            v.text(ElementId::ScanTime),
            Some("Last scan: 1/15/2025, 10:30:00 AM")
        );
        let regions = v.html(ElementId::RegionsSummary).unwrap();
        assert!(regions.contains("EC2: 2 | EBS: 1 | RDS: 0"));
        assert!(regions.contains("EC2: 0 | EBS: 0 | RDS: 1"));
        assert!(regions.find("us-east-1").unwrap() < regions.find("eu-west-1").unwrap());
        assert_eq!(v.write_count(ElementId::StatusMessage), 0);
        assert_eq!(api.savings_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_failure_keeps_stale_values() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.scans, ok(snapshot(5, 1, 0)));
        FakeApi::push(&api.recommendations, ok(recommendations()));
        FakeApi::push(&api.scans, unreachable(0));

        controller.load_dashboard().await;
        assert_eq!(controller.load_dashboard().await, LoadOutcome::Failed);

        let v = lock(&view);
        assert_eq!(v.text(ElementId::TotalEc2), Some("5"));
        assert_eq!(v.text(ElementId::StatusMessage), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(v.class(ElementId::StatusMessage), Some("status error show"));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_load_failure() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.scans, ok(json!({"scan_time": "x", "summary": {}})));

        assert_eq!(controller.load_dashboard().await, LoadOutcome::Failed);
        assert_eq!(
            lock(&view).text(ElementId::StatusMessage),
            Some(LOAD_FAILED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn savings_failures_only_log_by_default() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.recommendations, ok(json!({"error": "No recommendations available"})));
        FakeApi::push(&api.recommendations, unreachable(0));

        assert_eq!(controller.load_savings().await, LoadOutcome::Unavailable);
        assert_eq!(controller.load_savings().await, LoadOutcome::Failed);

        let v = lock(&view);
        assert_eq!(v.write_count(ElementId::PotentialSavings), 0);
        assert_eq!(v.write_count(ElementId::StatusMessage), 0);
    }

    #[tokio::test]
    async fn failure_visibility_is_configurable_per_loader() {
        let (api, view, controller) = setup(LoaderPolicy {
            scan: FailureVisibility::Log,
            savings: FailureVisibility::Status,
        });
        FakeApi::push(&api.scans, unreachable(0));
        controller.load_dashboard().await;
        assert_eq!(lock(&view).write_count(ElementId::StatusMessage), 0);

        FakeApi::push(&api.recommendations, unreachable(0));
        controller.load_savings().await;
        assert_eq!(
            lock(&view).text(ElementId::StatusMessage),
            Some(SAVINGS_FAILED_MESSAGE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn latest_initiated_load_wins_over_late_arrival() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        // The first load is slow, the second fast: the second must stay on screen.
        FakeApi::push(&api.scans, delayed(500, snapshot(1, 1, 1)));
        FakeApi::push(&api.scans, delayed(50, snapshot(2, 2, 2)));
        FakeApi::push(&api.recommendations, ok(recommendations()));

        let older = controller.clone();
        let older = tokio::spawn(async move { older.load_dashboard().await });
        tokio::task::yield_now().await;
        let newer = controller.load_dashboard().await;

        assert_eq!(newer, LoadOutcome::Rendered);
        assert_eq!(older.await.unwrap(), LoadOutcome::Superseded);
        assert_eq!(lock(&view).text(ElementId::TotalEc2), Some("2"));
    }

    #[tokio::test]
    async fn trigger_success_reports_and_reloads_once() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(
            &api.triggers,
            ok(json!({"success": true, "recommendations_count": 3, "potential_savings": 42.5})),
        );
        FakeApi::push(&api.scans, ok(snapshot(9, 0, 0)));
        FakeApi::push(&api.recommendations, ok(recommendations()));

        let outcome = controller.trigger_manual_scan().await;
        assert_eq!(
            outcome,
            TriggerOutcome::Completed {
                recommendations_count: 3,
                potential_savings: 42.5
            }
        );
        assert_eq!(api.scan_calls.load(Ordering::SeqCst), 1);

        let v = lock(&view);
        let message = v.text(ElementId::StatusMessage).unwrap();
        assert_eq!(
            message,
            "Scan complete! Found 3 recommendations. Potential savings: $42.5/month"
        );
        assert_eq!(v.text(ElementId::TotalEc2), Some("9"));
        assert!(!v.is_disabled(ElementId::TriggerScan));
        assert_eq!(v.text(ElementId::TriggerScan), Some(IDLE_LABEL));
    }

    #[tokio::test]
    async fn trigger_failure_shows_backend_reason() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.triggers, ok(json!({"success": false, "error": "AccessDenied"})));

        let outcome = controller.trigger_manual_scan().await;
        assert_eq!(outcome, TriggerOutcome::Failed("AccessDenied".to_string()));
        assert_eq!(api.scan_calls.load(Ordering::SeqCst), 0);

        let v = lock(&view);
        assert_eq!(v.text(ElementId::StatusMessage), Some("Scan failed: AccessDenied"));
        assert_eq!(v.class(ElementId::StatusMessage), Some("status error show"));
    }

    #[tokio::test]
    async fn trigger_transport_error_shows_description() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.triggers, unreachable(0));

        let outcome = controller.trigger_manual_scan().await;
        assert!(matches!(outcome, TriggerOutcome::Errored(ref d) if d.contains("connection refused")));
        assert_eq!(
            lock(&view).text(ElementId::StatusMessage),
            Some("Error: connection refused")
        );
    }

    #[tokio::test]
    async fn trigger_control_is_restored_exactly_once_for_every_outcome() {
        let scripts = [
            ok(json!({"success": true, "recommendations_count": 0, "potential_savings": 0})),
            ok(json!({"success": false, "error": "boom"})),
            unreachable(0),
        ];
        for script in scripts {
            let (api, view, controller) = setup(LoaderPolicy::default());
            FakeApi::push(&api.triggers, script);
            let before = lock(&view).write_count(ElementId::TriggerScan);

            controller.trigger_manual_scan().await;

            let v = lock(&view);
            assert!(!v.is_disabled(ElementId::TriggerScan));
            assert_eq!(v.text(ElementId::TriggerScan), Some(IDLE_LABEL));
            // disable + busy label, then enable + idle label.
            assert_eq!(v.write_count(ElementId::TriggerScan), before + 4);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_control_is_disabled_while_scanning() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(
            &api.triggers,
            delayed(1000, json!({"success": false, "error": "slow"})),
        );

        let running = controller.clone();
        let handle = tokio::spawn(async move { running.trigger_manual_scan().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        {
            let v = lock(&view);
            assert!(v.is_disabled(ElementId::TriggerScan));
            assert_eq!(v.text(ElementId::TriggerScan), Some(SCANNING_LABEL));
            assert_eq!(v.text(ElementId::StatusMessage), Some(SCANNING_MESSAGE));
        }
        assert_eq!(controller.trigger_manual_scan().await, TriggerOutcome::Busy);
        assert_eq!(api.trigger_calls.load(Ordering::SeqCst), 1);

        handle.await.unwrap();
        assert!(!lock(&view).is_disabled(ElementId::TriggerScan));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_trigger_still_restores_control() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(
            &api.triggers,
            delayed(60_000, json!({"success": true})),
        );

        let res = tokio::time::timeout(Duration::from_millis(100), controller.trigger_manual_scan()).await;
        assert!(res.is_err());

        let v = lock(&view);
        assert!(!v.is_disabled(ElementId::TriggerScan));
        assert_eq!(v.text(ElementId::TriggerScan), Some(IDLE_LABEL));
    }

    #[tokio::test]
    async fn execute_latest_posts_selected_recommendation() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.recommendations, ok(recommendations()));
        FakeApi::push(
            &api.actions,
            ok(json!({"success": true, "message": "Executed SNAPSHOT_DELETE on vol-1"})),
        );

        let outcome = controller.execute_latest(&picked(1, "vol-1", "SNAPSHOT_DELETE")).await;
        assert_eq!(
            outcome,
            ActionOutcome::Executed("Executed SNAPSHOT_DELETE on vol-1".to_string())
        );
        assert_eq!(api.executed.lock().unwrap()[0].resource_id, "vol-1");
        assert_eq!(
            lock(&view).class(ElementId::StatusMessage),
            Some("status success show")
        );
    }

    #[tokio::test]
    async fn execute_latest_rejects_unknown_index() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.recommendations, ok(recommendations()));

        let outcome = controller.execute_latest(&picked(7, "i-1", "STOP")).await;
        assert!(matches!(outcome, ActionOutcome::Failed(_)));
        assert!(api.executed.lock().unwrap().is_empty());
        assert!(lock(&view)
            .text(ElementId::StatusMessage)
            .unwrap()
            .starts_with("Action failed: recommendation #7 not found"));
    }

    #[tokio::test]
    async fn execute_latest_refuses_a_row_replaced_by_a_newer_report() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(
            &api.recommendations,
            ok(json!({
                "total_potential_savings": 10.0,
                "recommendations": [
                    {"type": "EBS_UNATTACHED", "severity": "MEDIUM", "region": "us-west-2",
                     "resource_id": "vol-OTHER", "action": "SNAPSHOT_DELETE", "monthly_savings": 10.0}
                ]
            })),
        );

        let outcome = controller.execute_latest(&picked(0, "i-1", "STOP")).await;
        assert_eq!(outcome, ActionOutcome::Failed("recommendation changed".to_string()));
        assert!(api.executed.lock().unwrap().is_empty());

        let v = lock(&view);
        assert_eq!(
            v.text(ElementId::StatusMessage),
            Some("Action failed: recommendation changed")
        );
        assert_eq!(v.class(ElementId::StatusMessage), Some("status error show"));
    }

    #[tokio::test]
    async fn execute_latest_accepts_a_scheduled_report() {
        let (api, _view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(
            &api.recommendations,
            ok(json!({
                "timestamp": "2025-01-15T02:00:04",
                "potential_savings": 16.7,
                "total_recommendations": 1,
                "recommendations": [
                    {"type": "EC2_IDLE", "severity": "HIGH", "region": "us-east-1",
                     "resource_id": "i-1", "action": "STOP", "monthly_savings": 16.7}
                ],
                "actions_taken": []
            })),
        );
        FakeApi::push(&api.actions, ok(json!({"success": true})));

        let outcome = controller.execute_latest(&picked(0, "i-1", "STOP")).await;
        assert_eq!(outcome, ActionOutcome::Executed("Executed STOP on i-1".to_string()));
        assert_eq!(api.executed.lock().unwrap()[0].resource_id, "i-1");
    }

    #[tokio::test]
    async fn savings_card_needs_the_analyzer_total() {
        let (api, view, controller) = setup(LoaderPolicy {
            scan: FailureVisibility::Status,
            savings: FailureVisibility::Status,
        });
        FakeApi::push(
            &api.recommendations,
            ok(json!({"potential_savings": 16.7, "recommendations": []})),
        );

        assert_eq!(controller.load_savings().await, LoadOutcome::Failed);
        let v = lock(&view);
        assert_eq!(v.write_count(ElementId::PotentialSavings), 0);
        assert_eq!(v.text(ElementId::StatusMessage), Some(SAVINGS_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn begin_manual_scan_engages_control_before_the_request_runs() {
        let (api, view, controller) = setup(LoaderPolicy::default());
        FakeApi::push(&api.triggers, ok(json!({"success": false, "error": "throttled"})));

        let scan = controller.begin_manual_scan().unwrap();
        {
            let v = lock(&view);
            assert!(v.is_disabled(ElementId::TriggerScan));
            assert_eq!(v.text(ElementId::TriggerScan), Some(SCANNING_LABEL));
            assert_eq!(v.text(ElementId::StatusMessage), Some(SCANNING_MESSAGE));
        }
        assert_eq!(api.trigger_calls.load(Ordering::SeqCst), 0);
        assert!(controller.begin_manual_scan().is_none());

        assert_eq!(scan.await, TriggerOutcome::Failed("throttled".to_string()));
        assert!(!lock(&view).is_disabled(ElementId::TriggerScan));
    }

    #[tokio::test(start_paused = true)]
    async fn run_loads_immediately_then_every_interval() {
        let (api, _view, controller) = setup(LoaderPolicy::default());

        controller
            .run(tokio::time::sleep(Duration::from_secs(125)))
            .await;

        assert_eq!(api.scan_calls.load(Ordering::SeqCst), 3);
    }
}
