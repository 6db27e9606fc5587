pub mod http;

use crate::domain::recommendation::{ActionResult, Recommendation, RecommendationSummary};
use crate::domain::reply::Reply;
use crate::domain::scan::{ScanSnapshot, ScanTriggerResult};

pub const LATEST_SCAN_PATH: &str = "/api/latest-scan";
pub const LATEST_RECOMMENDATIONS_PATH: &str = "/api/latest-recommendations";
pub const TRIGGER_SCAN_PATH: &str = "/api/trigger-scan";
pub const EXECUTE_ACTION_PATH: &str = "/api/execute-action";

/// The cost-optimizer backend as seen by the dashboard.
///
/// An `Err` is a transport or parse failure; a backend that answers with an
/// `error` body is an `Ok(Reply::Unavailable(..))`.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn latest_scan(&self) -> anyhow::Result<Reply<ScanSnapshot>>;

    async fn latest_recommendations(&self) -> anyhow::Result<Reply<RecommendationSummary>>;

    async fn trigger_scan(&self) -> anyhow::Result<ScanTriggerResult>;

    async fn execute_action(&self, recommendation: &Recommendation) -> anyhow::Result<ActionResult>;
}
