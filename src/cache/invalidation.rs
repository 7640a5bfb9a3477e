//! Which cached resources each mutation makes stale.

use crate::models::OrgUnitKind;

/// Cacheable read resources. The names match the query keys the views use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Complaints,
    PublicComplaints,
    Complaint,
    Employees,
    Employee,
    Feedback,
    Ratings,
    EmployeeRatings,
    Subcities,
    Sectors,
    Divisions,
    Departments,
    Statistics,
    Notifications,
    UnreadNotifications,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Complaints => "complaints",
            Resource::PublicComplaints => "publicComplaints",
            Resource::Complaint => "complaint",
            Resource::Employees => "employees",
            Resource::Employee => "employee",
            Resource::Feedback => "feedback",
            Resource::Ratings => "ratings",
            Resource::EmployeeRatings => "employeeRatings",
            Resource::Subcities => "subcities",
            Resource::Sectors => "sectors",
            Resource::Divisions => "divisions",
            Resource::Departments => "departments",
            Resource::Statistics => "statistics",
            Resource::Notifications => "notifications",
            Resource::UnreadNotifications => "unreadNotifications",
        }
    }
}

/// Every write the hooks can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    SubmitComplaint,
    UpdateComplaintStatus,
    ResolveComplaint,
    AssignComplaint,
    DeleteComplaint,
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
    SubmitFeedback,
    RespondFeedback,
    DeleteFeedback,
    SubmitRating,
    DeleteRating,
    SaveOrgUnit(OrgUnitKind),
    DeleteOrgUnit(OrgUnitKind),
    MarkNotificationRead,
    MarkAllNotificationsRead,
}

impl Mutation {
    /// Human-readable operation name for logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::SubmitComplaint => "submit complaint",
            Mutation::UpdateComplaintStatus => "update complaint status",
            Mutation::ResolveComplaint => "resolve complaint",
            Mutation::AssignComplaint => "assign complaint",
            Mutation::DeleteComplaint => "delete complaint",
            Mutation::CreateEmployee => "create employee",
            Mutation::UpdateEmployee => "update employee",
            Mutation::DeleteEmployee => "delete employee",
            Mutation::SubmitFeedback => "submit feedback",
            Mutation::RespondFeedback => "respond to feedback",
            Mutation::DeleteFeedback => "delete feedback",
            Mutation::SubmitRating => "submit rating",
            Mutation::DeleteRating => "delete rating",
            Mutation::SaveOrgUnit(_) => "save organization unit",
            Mutation::DeleteOrgUnit(_) => "delete organization unit",
            Mutation::MarkNotificationRead => "mark notification read",
            Mutation::MarkAllNotificationsRead => "mark all notifications read",
        }
    }
}

/// Resources made stale by a successful mutation.
pub fn invalidated_by(mutation: Mutation) -> &'static [Resource] {
    use Resource::*;

    match mutation {
        Mutation::SubmitComplaint | Mutation::DeleteComplaint => {
            &[Complaints, PublicComplaints, Complaint, Statistics]
        }
        Mutation::UpdateComplaintStatus | Mutation::ResolveComplaint => &[
            Complaints,
            PublicComplaints,
            Complaint,
            Statistics,
            Notifications,
            UnreadNotifications,
        ],
        Mutation::AssignComplaint => &[Complaints, Complaint],
        Mutation::CreateEmployee | Mutation::UpdateEmployee | Mutation::DeleteEmployee => {
            &[Employees, Employee, Statistics]
        }
        Mutation::SubmitFeedback | Mutation::DeleteFeedback => &[Feedback, Statistics],
        Mutation::RespondFeedback => &[Feedback, Statistics, Notifications, UnreadNotifications],
        Mutation::SubmitRating | Mutation::DeleteRating => {
            &[Ratings, EmployeeRatings, Statistics]
        }
        Mutation::SaveOrgUnit(kind) | Mutation::DeleteOrgUnit(kind) => match kind {
            OrgUnitKind::Subcity => &[Subcities, Sectors, Divisions, Departments],
            OrgUnitKind::Sector => &[Sectors, Divisions],
            OrgUnitKind::Division => &[Divisions, Departments],
            OrgUnitKind::Department => &[Departments],
        },
        Mutation::MarkNotificationRead | Mutation::MarkAllNotificationsRead => {
            &[Notifications, UnreadNotifications]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_invalidates_complaint_views_and_statistics() {
        let stale = invalidated_by(Mutation::ResolveComplaint);
        for resource in [Resource::Complaints, Resource::PublicComplaints, Resource::Statistics] {
            assert!(stale.contains(&resource), "{:?}", resource);
        }
    }

    #[test]
    fn test_every_write_to_counted_data_refreshes_statistics() {
        let counted = [
            Mutation::SubmitComplaint,
            Mutation::DeleteComplaint,
            Mutation::CreateEmployee,
            Mutation::DeleteEmployee,
            Mutation::SubmitFeedback,
            Mutation::SubmitRating,
        ];
        for mutation in counted {
            assert!(
                invalidated_by(mutation).contains(&Resource::Statistics),
                "{}",
                mutation.label()
            );
        }
    }

    #[test]
    fn test_org_changes_cascade_downwards_only() {
        let sector = invalidated_by(Mutation::SaveOrgUnit(OrgUnitKind::Sector));
        assert!(sector.contains(&Resource::Divisions));
        assert!(!sector.contains(&Resource::Subcities));

        let department = invalidated_by(Mutation::DeleteOrgUnit(OrgUnitKind::Department));
        assert_eq!(department, &[Resource::Departments]);
    }

    #[test]
    fn test_notification_reads_touch_nothing_else() {
        assert_eq!(
            invalidated_by(Mutation::MarkAllNotificationsRead),
            &[Resource::Notifications, Resource::UnreadNotifications]
        );
    }
}
