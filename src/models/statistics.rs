//! Dashboard counters.

use serde::{Deserialize, Serialize};

/// Complaint counts per status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintCounts {
    pub total: u64,
    pub submitted: u64,
    pub under_review: u64,
    pub investigating: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl ComplaintCounts {
    /// Complaints that still need attention.
    pub fn open(&self) -> u64 {
        self.submitted + self.under_review + self.investigating
    }

    /// Share of complaints resolved or closed, in percent.
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.resolved + self.closed) as f64 * 100.0 / self.total as f64
    }
}

/// Figures behind the dashboard cards and charts.
///
/// The public variant leaves staff-only counters at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub complaints: ComplaintCounts,
    pub total_employees: u64,
    pub total_feedback: u64,
    pub pending_feedback: u64,
    pub total_ratings: u64,
    pub average_rating: f64,
}
