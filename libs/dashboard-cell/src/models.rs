use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// A navigable action offered on a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardAction {
    pub label: String,
    pub target: String,
}

impl DashboardAction {
    pub fn new(label: &str, target: &str) -> Self {
        Self {
            label: label.to_string(),
            target: target.to_string(),
        }
    }
}

/// The capability every role dashboard provides: a one-line summary and
/// the actions it links to.
pub trait DashboardSummary {
    fn headline(&self) -> String;
    fn actions(&self) -> Vec<DashboardAction>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentBrief {
    pub appointment_date: NaiveDate,
    pub time_label: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDashboard {
    pub upcoming_appointments: i64,
    pub pending_appointments: i64,
    pub next_appointment: Option<AppointmentBrief>,
}

impl DashboardSummary for PatientDashboard {
    fn headline(&self) -> String {
        match &self.next_appointment {
            Some(next) => format!(
                "Next appointment {} at {}",
                next.appointment_date, next.time_label
            ),
            None => "No upcoming appointments".to_string(),
        }
    }

    fn actions(&self) -> Vec<DashboardAction> {
        vec![
            DashboardAction::new("Book an appointment", "/appointments"),
            DashboardAction::new("My reports", "/reports"),
            DashboardAction::new("Messages", "/messages"),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDashboard {
    pub todays_appointments: i64,
    pub pending_requests: i64,
}

impl DashboardSummary for DoctorDashboard {
    fn headline(&self) -> String {
        format!(
            "{} consultations today, {} requests waiting",
            self.todays_appointments, self.pending_requests
        )
    }

    fn actions(&self) -> Vec<DashboardAction> {
        vec![
            DashboardAction::new("Review requests", "/appointments"),
            DashboardAction::new("Set availability", "/availability"),
            DashboardAction::new("Messages", "/messages"),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_appointments: i64,
    pub pending_appointments: i64,
}

impl DashboardSummary for AdminDashboard {
    fn headline(&self) -> String {
        format!(
            "{} users, {} appointments on the platform",
            self.total_users, self.total_appointments
        )
    }

    fn actions(&self) -> Vec<DashboardAction> {
        vec![
            DashboardAction::new("Platform statistics", "/admin/stats"),
            DashboardAction::new("Manage users", "/admin/users"),
        ]
    }
}

/// One dashboard per role, tagged so clients dispatch on `role` instead
/// of re-deriving it from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    Patient(PatientDashboard),
    Doctor(DoctorDashboard),
    Admin(AdminDashboard),
}

impl DashboardSummary for DashboardView {
    fn headline(&self) -> String {
        match self {
            DashboardView::Patient(view) => view.headline(),
            DashboardView::Doctor(view) => view.headline(),
            DashboardView::Admin(view) => view.headline(),
        }
    }

    fn actions(&self) -> Vec<DashboardAction> {
        match self {
            DashboardView::Patient(view) => view.actions(),
            DashboardView::Doctor(view) => view.actions(),
            DashboardView::Admin(view) => view.actions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_serializes_with_role_tag() {
        let view = DashboardView::Doctor(DoctorDashboard {
            todays_appointments: 3,
            pending_requests: 2,
        });

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["role"], "doctor");
        assert_eq!(value["todays_appointments"], 3);
    }

    #[test]
    fn every_view_offers_actions() {
        let views = [
            DashboardView::Patient(PatientDashboard {
                upcoming_appointments: 0,
                pending_appointments: 0,
                next_appointment: None,
            }),
            DashboardView::Doctor(DoctorDashboard {
                todays_appointments: 0,
                pending_requests: 0,
            }),
            DashboardView::Admin(AdminDashboard {
                total_users: 0,
                total_appointments: 0,
                pending_appointments: 0,
            }),
        ];

        for view in views {
            assert!(!view.actions().is_empty());
            assert!(!view.headline().is_empty());
        }
    }
}
