// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::Role;

use crate::models::AppointmentError;

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !current_status.can_transition_to(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// Who may move `appointment` to `new_status`: its doctor may apply any
    /// valid transition, its patient may only cancel, admins may do anything valid.
    pub fn authorize_status_change(
        appointment: &Appointment,
        actor_id: uuid::Uuid,
        actor_role: Option<Role>,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        match actor_role {
            Some(Role::Admin) => Ok(()),
            Some(Role::Doctor) if appointment.doctor_id == actor_id => Ok(()),
            Some(Role::Patient) if appointment.patient_id == actor_id => {
                if new_status == AppointmentStatus::Cancelled {
                    Ok(())
                } else {
                    Err(AppointmentError::PatientMayOnlyCancel)
                }
            }
            _ => Err(AppointmentError::Unauthorized),
        }
    }

    pub fn can_view(appointment: &Appointment, actor_id: uuid::Uuid, actor_role: Option<Role>) -> bool {
        actor_role == Some(Role::Admin) || appointment.involves(actor_id)
    }
}
