use serde::{Deserialize, Serialize};

/// A recommendation report.
///
/// The on-demand analyzer writes `total_potential_savings`; the scheduled
/// optimization job writes `potential_savings` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_potential_savings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationSummary {
    /// Total monthly savings, whichever producer wrote the report.
    pub fn savings(&self) -> Option<f64> {
        self.total_potential_savings.or(self.potential_savings)
    }
}

/// One optimization finding from the backend analyzer.
///
/// Fields the dashboard does not display are kept in `extra` so the record can be
/// posted back unchanged to the execute-action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub severity: String,
    pub region: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_savings: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recommendation {
    /// Free-text description: the issue when present, otherwise the recommendation line.
    pub fn description(&self) -> &str {
        self.issue
            .as_deref()
            .or(self.recommendation.as_deref())
            .unwrap_or("")
    }
}

/// The row a user picked from a listed report. It only refers to the row at
/// `index` while that row still names the same resource and action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecommendationRef {
    pub index: usize,
    pub resource_id: String,
    pub action: String,
}

impl RecommendationRef {
    pub fn matches(&self, rec: &Recommendation) -> bool {
        rec.resource_id == self.resource_id && rec.action == self.action
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}
