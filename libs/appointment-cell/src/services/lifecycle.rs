use tracing::debug;

use crate::models::{AppointmentError, AppointmentStatus};

/// Status lifecycle: `pending` is the only entry state; doctors (or
/// admins) move it to `approved` or `rejected`, and an approved
/// consultation ends `completed`. Terminal states never move again.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_transition(
        &self,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        use AppointmentStatus::*;

        let allowed = matches!(
            (from, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Completed)
        );

        if allowed {
            debug!("Status transition {} -> {} accepted", from, to);
            Ok(())
        } else {
            Err(AppointmentError::InvalidTransition(from, to))
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
