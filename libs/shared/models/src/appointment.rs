use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::PersonSummary;

/// The bookable time slots offered for any day.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM",
    "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM", "04:00 PM", "04:30 PM",
];

pub fn is_valid_time_slot(slot: &str) -> bool {
    TIME_SLOTS.contains(&slot)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Scheduled => &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
            AppointmentStatus::Confirmed => &[AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    #[default]
    #[serde(alias = "general")]
    Consultation,
    #[serde(alias = "followup")]
    FollowUp,
    #[serde(alias = "check_up")]
    Checkup,
    #[serde(alias = "urgent")]
    Emergency,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentMode {
    #[default]
    #[serde(alias = "in-person")]
    InPerson,
    #[serde(alias = "video_call", alias = "virtual")]
    Video,
    Phone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub mode: AppointmentMode,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<PersonSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PersonSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.doctor_id == user_id || self.patient_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub mode: AppointmentMode,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const MSG_MISSING_DATE: &str = "Please select a date";
pub const MSG_MISSING_TIME: &str = "Please select a time slot";
pub const MSG_MISSING_REASON: &str = "Please provide a reason for the visit";

impl CreateAppointmentRequest {
    /// Field checks in display order: date, then time, then reason.
    pub fn validate_required(&self) -> Result<(), String> {
        if self.appointment_date.is_none() {
            return Err(MSG_MISSING_DATE.to_string());
        }
        match self.appointment_time.as_deref() {
            Some(slot) if !slot.trim().is_empty() => {}
            _ => return Err(MSG_MISSING_TIME.to_string()),
        }
        if self.reason.trim().is_empty() {
            return Err(MSG_MISSING_REASON.to_string());
        }
        Ok(())
    }

    /// Required fields plus slot membership and a no-past-dates rule.
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        self.validate_required()?;

        if let Some(slot) = self.appointment_time.as_deref() {
            if !is_valid_time_slot(slot) {
                return Err(format!("Invalid time slot: {}", slot));
            }
        }
        if let Some(date) = self.appointment_date {
            if date < today {
                return Err("Appointment date cannot be in the past".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}
