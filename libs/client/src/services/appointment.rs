use serde::Deserialize;
use uuid::Uuid;

use shared_models::appointment::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, UpdateAppointmentStatusRequest,
};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct AppointmentList {
    appointments: Vec<Appointment>,
}

#[derive(Debug, Clone)]
pub struct AppointmentApi {
    api: ApiClient,
}

impl AppointmentApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn book(&self, request: &CreateAppointmentRequest) -> Result<Appointment, ClientError> {
        self.api.post("/appointments", request).await
    }

    /// The caller's appointments; an empty list when the server has none.
    pub async fn my_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        let list: Option<AppointmentList> = self.api.get_optional("/appointments/my-appointments").await?;
        Ok(list.map(|l| l.appointments).unwrap_or_default())
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Option<Appointment>, ClientError> {
        self.api.get_optional(&format!("/appointments/{}", appointment_id)).await
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        self.api
            .patch(
                &format!("/appointments/{}/status", appointment_id),
                &UpdateAppointmentStatusRequest { status },
            )
            .await
    }

    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, ClientError> {
        self.update_status(appointment_id, AppointmentStatus::Cancelled).await
    }
}
