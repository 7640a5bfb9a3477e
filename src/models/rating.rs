//! Employee service rating model and score arithmetic.

use serde::{Deserialize, Serialize};

use crate::errors::PortalError;

/// Lowest and highest score a single dimension may carry.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// One citizen's rating of one employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub employee_id: String,
    pub courtesy: u8,
    pub punctuality: u8,
    pub knowledge: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_name: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Rating {
    /// Mean of the three scored dimensions.
    pub fn average(&self) -> f64 {
        (f64::from(self.courtesy) + f64::from(self.punctuality) + f64::from(self.knowledge)) / 3.0
    }
}

/// Render a score with one decimal, the way every rating card shows it.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Request body for the public rating form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub employee_id: String,
    pub courtesy: u8,
    pub punctuality: u8,
    pub knowledge: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_phone: Option<String>,
}

impl NewRating {
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.employee_id.trim().is_empty() {
            return Err(PortalError::Validation("Employee is required".to_string()));
        }
        let scores = [
            ("courtesy", self.courtesy),
            ("punctuality", self.punctuality),
            ("knowledge", self.knowledge),
        ];
        for (label, score) in scores {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(PortalError::Validation(format!(
                    "{} must be between {} and {}",
                    label, MIN_SCORE, MAX_SCORE
                )));
            }
        }
        Ok(())
    }
}

/// Per-dimension averages over a set of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub count: usize,
    pub courtesy: f64,
    pub punctuality: f64,
    pub knowledge: f64,
    pub overall: f64,
}

impl RatingSummary {
    /// Aggregate ratings; an empty slice yields all zeroes.
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let courtesy = mean(ratings, |r| r.courtesy);
        let punctuality = mean(ratings, |r| r.punctuality);
        let knowledge = mean(ratings, |r| r.knowledge);

        Self {
            count: ratings.len(),
            courtesy,
            punctuality,
            knowledge,
            overall: (courtesy + punctuality + knowledge) / 3.0,
        }
    }
}

fn mean(ratings: &[Rating], score: impl Fn(&Rating) -> u8) -> f64 {
    let total: f64 = ratings.iter().map(|r| f64::from(score(r))).sum();
    total / ratings.len() as f64
}
