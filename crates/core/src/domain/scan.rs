use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub scan_time: String,
    pub summary: ScanSummary,
    pub regions: IndexMap<String, RegionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_ec2_instances: u64,
    pub idle_ec2_instances: u64,
    pub unattached_ebs_volumes: u64,
}

/// Per-region resource records. Only the lengths are rendered; the record
/// shape belongs to the backend scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionDetail {
    #[serde(default)]
    pub ec2_instances: Vec<serde_json::Value>,
    #[serde(default)]
    pub ebs_volumes: Vec<serde_json::Value>,
    #[serde(default)]
    pub rds_instances: Vec<serde_json::Value>,
}

impl RegionDetail {
    pub fn counts(&self) -> RegionCounts {
        RegionCounts {
            ec2: self.ec2_instances.len(),
            ebs: self.ebs_volumes.len(),
            rds: self.rds_instances.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCounts {
    pub ec2: usize,
    pub ebs: usize,
    pub rds: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanTriggerResult {
    #[serde(default)]
    pub success: bool,
    pub recommendations_count: Option<u64>,
    pub potential_savings: Option<f64>,
    pub error: Option<String>,
}
