//! Filter objects and client-side list projections.
//!
//! The same filter structs key the query cache, travel to the backend as
//! query parameters and narrow already-fetched lists for the tables. Every
//! projection returns a subset of its input in the original order unless it
//! is explicitly a sort.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    parse_timestamp, Complaint, ComplaintPriority, ComplaintStatus, Employee, Feedback,
    FeedbackStatus, Rating,
};

/// Inclusive calendar-day range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// How a range treats a record whose timestamp cannot be parsed.
///
/// Dashboard screens disagree on this, so every caller states its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnparsedDate {
    MatchAll,
    MatchNone,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Whether the RFC 3339 (or plain `YYYY-MM-DD`) timestamp falls in range.
    pub fn contains(&self, timestamp: &str, unparsed: UnparsedDate) -> bool {
        if self.is_open() {
            return true;
        }
        match parse_day(timestamp) {
            Some(date) => self.contains_date(date),
            None => unparsed == UnparsedDate::MatchAll,
        }
    }
}

fn parse_day(timestamp: &str) -> Option<NaiveDate> {
    parse_timestamp(timestamp).map(|dt| dt.date_naive())
}

fn matches_text(haystacks: &[&str], needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

/// Complaint table filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ComplaintPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(flatten)]
    pub dates: DateRange,
}

impl ComplaintFilters {
    pub fn matches(&self, complaint: &Complaint, unparsed: UnparsedDate) -> bool {
        self.status.map_or(true, |status| complaint.status == status)
            && self
                .priority
                .map_or(true, |priority| complaint.priority == priority)
            && self.subcity_id.as_ref().map_or(true, |subcity| {
                complaint.subcity_id.as_deref() == Some(subcity.as_str())
            })
            && self.search.as_deref().map_or(true, |needle| {
                matches_text(
                    &[
                        complaint.tracking_number.as_str(),
                        complaint.title.as_str(),
                        complaint.complainant_name.as_str(),
                    ],
                    needle,
                )
            })
            && self.dates.contains(&complaint.created_at, unparsed)
    }
}

pub fn filter_complaints(
    complaints: &[Complaint],
    filters: &ComplaintFilters,
    unparsed: UnparsedDate,
) -> Vec<Complaint> {
    complaints
        .iter()
        .filter(|c| filters.matches(c, unparsed))
        .cloned()
        .collect()
}

/// Employee directory filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl EmployeeFilters {
    pub fn matches(&self, employee: &Employee) -> bool {
        let same = |wanted: &Option<String>, actual: &Option<String>| {
            wanted.is_none() || wanted.as_deref() == actual.as_deref()
        };
        same(&self.sector_id, &employee.sector_id)
            && same(&self.division_id, &employee.division_id)
            && same(&self.department_id, &employee.department_id)
            && same(&self.subcity_id, &employee.subcity_id)
            && self.is_active.map_or(true, |active| employee.is_active == active)
            && self.search.as_deref().map_or(true, |needle| {
                matches_text(
                    &[
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.full_name().as_str(),
                        employee.employee_id.as_str(),
                        employee.position.as_str(),
                    ],
                    needle,
                )
            })
    }
}

pub fn filter_employees(employees: &[Employee], filters: &EmployeeFilters) -> Vec<Employee> {
    employees
        .iter()
        .filter(|e| filters.matches(e))
        .cloned()
        .collect()
}

/// Feedback inbox filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedbackStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(flatten)]
    pub dates: DateRange,
}

impl FeedbackFilters {
    pub fn matches(&self, feedback: &Feedback, unparsed: UnparsedDate) -> bool {
        self.status.map_or(true, |status| feedback.status == status)
            && self.subcity_id.as_ref().map_or(true, |subcity| {
                feedback.subcity_id.as_deref() == Some(subcity.as_str())
            })
            && self.search.as_deref().map_or(true, |needle| {
                matches_text(
                    &[
                        feedback.name.as_str(),
                        feedback.subject.as_str(),
                        feedback.message.as_str(),
                    ],
                    needle,
                )
            })
            && self.dates.contains(&feedback.created_at, unparsed)
    }
}

pub fn filter_feedback(
    feedback: &[Feedback],
    filters: &FeedbackFilters,
    unparsed: UnparsedDate,
) -> Vec<Feedback> {
    feedback
        .iter()
        .filter(|f| filters.matches(f, unparsed))
        .cloned()
        .collect()
}

/// Rating list filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// Minimum average score, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(flatten)]
    pub dates: DateRange,
}

impl RatingFilters {
    pub fn matches(&self, rating: &Rating, unparsed: UnparsedDate) -> bool {
        self.employee_id
            .as_ref()
            .map_or(true, |id| &rating.employee_id == id)
            && self.min_score.map_or(true, |min| rating.average() >= min)
            && self.dates.contains(&rating.created_at, unparsed)
    }
}

pub fn filter_ratings(
    ratings: &[Rating],
    filters: &RatingFilters,
    unparsed: UnparsedDate,
) -> Vec<Rating> {
    ratings
        .iter()
        .filter(|r| filters.matches(r, unparsed))
        .cloned()
        .collect()
}

/// Statistics scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(flatten)]
    pub dates: DateRange,
}

/// Complaint table orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComplaintSort {
    #[default]
    NewestFirst,
    OldestFirst,
    PriorityDesc,
}

/// Sort in place. Records with unparseable dates go last; ties keep input order.
pub fn sort_complaints(complaints: &mut [Complaint], order: ComplaintSort) {
    match order {
        ComplaintSort::NewestFirst => {
            complaints.sort_by_key(|c| std::cmp::Reverse(c.created_at_utc()))
        }
        ComplaintSort::OldestFirst => complaints.sort_by_key(|c| {
            let created = c.created_at_utc();
            (created.is_none(), created)
        }),
        ComplaintSort::PriorityDesc => {
            complaints.sort_by_key(|c| std::cmp::Reverse(c.priority))
        }
    }
}
