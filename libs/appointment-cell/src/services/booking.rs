// libs/appointment-cell/src/services/booking.rs
use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{eq, in_list, StoreClient};
use shared_models::appointment::{Appointment, AppointmentStatus, CreateAppointmentRequest};
use shared_models::auth::Role;
use shared_models::user::{PersonSummary, UserProfile};

use crate::models::{AppointmentError, AppointmentListQuery};
use crate::services::lifecycle::AppointmentLifecycleService;

const APPOINTMENTS: &str = "appointments";
const USERS: &str = "users";

pub struct AppointmentBookingService {
    store: StoreClient,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn decode(row: Value) -> Result<Appointment, AppointmentError> {
        serde_json::from_value(row)
            .map_err(|e| AppointmentError::Database(format!("Failed to decode appointment: {}", e)))
    }

    async fn fetch_doctor(&self, doctor_id: Uuid) -> Result<UserProfile, AppointmentError> {
        let query = format!("{}&role=eq.doctor", eq("id", &doctor_id.to_string()));
        let row = self
            .store
            .select_one(USERS, &query)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        serde_json::from_value(row)
            .map_err(|e| AppointmentError::Database(format!("Failed to decode doctor: {}", e)))
    }

    /// Book an appointment for `patient_id`. New bookings start out `scheduled`.
    pub async fn book_appointment(
        &self,
        patient_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Booking appointment for patient {} with doctor {}", patient_id, request.doctor_id);

        request
            .validate(Utc::now().date_naive())
            .map_err(AppointmentError::Validation)?;

        let doctor = self.fetch_doctor(request.doctor_id).await?;

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "id": Uuid::new_v4(),
            "doctor_id": request.doctor_id,
            "patient_id": patient_id,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time,
            "appointment_type": request.appointment_type,
            "mode": request.mode,
            "reason": request.reason.trim(),
            "notes": request.notes,
            "status": AppointmentStatus::Scheduled,
            "created_at": now,
            "updated_at": now,
        });

        let stored = self.store.insert(APPOINTMENTS, row).await?;
        let mut appointment = Self::decode(stored)?;
        appointment.doctor = Some(doctor.summary());

        info!("Appointment {} booked with doctor {}", appointment.id, appointment.doctor_id);
        Ok(appointment)
    }

    /// Appointments where the caller is the patient (or the doctor, for doctors),
    /// newest first, with the other party's summary attached.
    pub async fn my_appointments(
        &self,
        user_id: Uuid,
        role: Option<Role>,
        filter: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let owner_field = match role {
            Some(Role::Doctor) => "doctor_id",
            _ => "patient_id",
        };

        let mut query = eq(owner_field, &user_id.to_string());
        if let Some(status) = filter.status {
            query.push_str(&format!("&status=eq.{}", status));
        }
        if filter.upcoming.unwrap_or(false) {
            query.push_str(&format!("&appointment_date=gte.{}", Utc::now().date_naive()));
        }
        query.push_str("&order=appointment_date.desc");

        let rows = self.store.select(APPOINTMENTS, &query).await?;
        let mut appointments = rows
            .into_iter()
            .map(Self::decode)
            .collect::<Result<Vec<_>, _>>()?;

        self.attach_summaries(&mut appointments).await?;
        Ok(appointments)
    }

    async fn attach_summaries(&self, appointments: &mut [Appointment]) -> Result<(), AppointmentError> {
        if appointments.is_empty() {
            return Ok(());
        }

        let ids: BTreeSet<String> = appointments
            .iter()
            .flat_map(|a| [a.doctor_id.to_string(), a.patient_id.to_string()])
            .collect();

        let rows = self.store.select(USERS, &in_list("id", &ids)).await?;
        let people: HashMap<Uuid, PersonSummary> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<UserProfile>(row) {
                Ok(profile) => Some((profile.id, profile.summary())),
                Err(e) => {
                    warn!("Skipping undecodable user row: {}", e);
                    None
                }
            })
            .collect();

        for appointment in appointments.iter_mut() {
            appointment.doctor = people.get(&appointment.doctor_id).cloned();
            appointment.patient = people.get(&appointment.patient_id).cloned();
        }
        Ok(())
    }

    async fn fetch_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let row = self
            .store
            .select_one(APPOINTMENTS, &eq("id", &appointment_id.to_string()))
            .await?
            .ok_or(AppointmentError::NotFound)?;

        Self::decode(row)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        role: Option<Role>,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.fetch_appointment(appointment_id).await?;

        if !AppointmentLifecycleService::can_view(&appointment, user_id, role) {
            return Err(AppointmentError::Unauthorized);
        }

        Ok(appointment)
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        role: Option<Role>,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.fetch_appointment(appointment_id).await?;

        AppointmentLifecycleService::authorize_status_change(&appointment, user_id, role, new_status)?;
        AppointmentLifecycleService::validate_status_transition(appointment.status, new_status)?;

        let patch = json!({
            "status": new_status,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let rows = self
            .store
            .update(APPOINTMENTS, &eq("id", &appointment_id.to_string()), patch)
            .await?;
        let row = rows.into_iter().next().ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} moved from {} to {}", appointment_id, appointment.status, new_status);
        Self::decode(row)
    }
}
