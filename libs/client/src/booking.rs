use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::appointment::{
    Appointment, AppointmentMode, AppointmentType, CreateAppointmentRequest, TIME_SLOTS,
};

use crate::services::AppointmentApi;

pub const BOOKING_FAILED_MESSAGE: &str = "Failed to book appointment. Please try again.";

#[derive(Debug)]
pub enum BookingOutcome {
    Booked(Appointment),
    /// Validation or server failure, with the message to show.
    Rejected(String),
}

/// State of the "book appointment" dialog for one doctor.
#[derive(Debug, Clone)]
pub struct BookingForm {
    pub doctor_id: Uuid,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub appointment_type: AppointmentType,
    pub mode: AppointmentMode,
    pub reason: String,
    pub notes: String,
    is_open: bool,
    is_submitting: bool,
}

impl BookingForm {
    pub fn new(doctor_id: Uuid) -> Self {
        Self {
            doctor_id,
            date: None,
            time_slot: None,
            appointment_type: AppointmentType::default(),
            mode: AppointmentMode::default(),
            reason: String::new(),
            notes: String::new(),
            is_open: false,
            is_submitting: false,
        }
    }

    pub fn time_slots() -> &'static [&'static str] {
        &TIME_SLOTS
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Back to defaults, keeping the doctor and whether the dialog is open.
    pub fn reset(&mut self) {
        let is_open = self.is_open;
        *self = Self::new(self.doctor_id);
        self.is_open = is_open;
    }

    pub fn to_request(&self) -> CreateAppointmentRequest {
        let notes = self.notes.trim();
        CreateAppointmentRequest {
            doctor_id: self.doctor_id,
            appointment_date: self.date,
            appointment_time: self.time_slot.clone(),
            appointment_type: self.appointment_type,
            mode: self.mode,
            reason: self.reason.trim().to_string(),
            notes: if notes.is_empty() { None } else { Some(notes.to_string()) },
        }
    }

    /// First missing field wins: date, then time slot, then reason.
    pub fn validate(&self) -> Result<CreateAppointmentRequest, String> {
        let request = self.to_request();
        request.validate_required()?;
        Ok(request)
    }

    /// Validates locally, then books. On success the form resets, the dialog
    /// closes and `on_booked` runs; on failure the fields are left as they were.
    pub async fn submit<F>(&mut self, api: &AppointmentApi, on_booked: F) -> BookingOutcome
    where
        F: FnOnce(&Appointment),
    {
        let request = match self.validate() {
            Ok(request) => request,
            Err(message) => return BookingOutcome::Rejected(message),
        };

        self.is_submitting = true;
        let result = api.book(&request).await;
        self.is_submitting = false;

        match result {
            Ok(appointment) => {
                info!("Booked appointment {}", appointment.id);
                self.reset();
                self.close();
                on_booked(&appointment);
                BookingOutcome::Booked(appointment)
            }
            Err(e) => {
                warn!("Booking failed: {}", e);
                BookingOutcome::Rejected(e.user_message(BOOKING_FAILED_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::appointment::{MSG_MISSING_DATE, MSG_MISSING_REASON, MSG_MISSING_TIME};

    #[test]
    fn test_defaults() {
        let form = BookingForm::new(Uuid::new_v4());
        assert_eq!(form.appointment_type, AppointmentType::Consultation);
        assert_eq!(form.mode, AppointmentMode::InPerson);
        assert!(!form.is_open());
        assert_eq!(BookingForm::time_slots().len(), 12);
    }

    #[test]
    fn test_validate_in_field_order() {
        let mut form = BookingForm::new(Uuid::new_v4());
        assert_eq!(form.validate().unwrap_err(), MSG_MISSING_DATE);

        form.date = NaiveDate::from_ymd_opt(2026, 11, 2);
        assert_eq!(form.validate().unwrap_err(), MSG_MISSING_TIME);

        form.time_slot = Some("02:30 PM".to_string());
        assert_eq!(form.validate().unwrap_err(), MSG_MISSING_REASON);

        form.reason = "Checkup".to_string();
        form.notes = "   ".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_reset_keeps_doctor_and_dialog_state() {
        let doctor_id = Uuid::new_v4();
        let mut form = BookingForm::new(doctor_id);
        form.open();
        form.reason = "Back pain".to_string();
        form.mode = AppointmentMode::Video;

        form.reset();
        assert_eq!(form.doctor_id, doctor_id);
        assert!(form.is_open());
        assert!(form.reason.is_empty());
        assert_eq!(form.mode, AppointmentMode::InPerson);
    }
}
