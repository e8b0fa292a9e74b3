use chrono::NaiveDate;
use tracing::warn;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::health::{health_score, HealthMetric};
use shared_models::user::UserProfile;

use crate::http::ApiClient;
use crate::services::{AppointmentApi, DoctorApi, DoctorFilter, HealthMetricsApi, UserApi};

const FEATURED_DOCTORS: u32 = 6;

fn upcoming_of(appointments: &[Appointment], today: NaiveDate) -> Vec<&Appointment> {
    let mut upcoming: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.appointment_date >= today)
        .filter(|a| !matches!(a.status, AppointmentStatus::Cancelled | AppointmentStatus::Completed))
        .collect();
    upcoming.sort_by(|a, b| a.appointment_date.cmp(&b.appointment_date));
    upcoming
}

/// Everything the patient home screen shows. Each section loads on its own;
/// a failed section is left empty and noted in `errors`.
#[derive(Debug, Default)]
pub struct PatientDashboard {
    pub doctors: Vec<UserProfile>,
    pub appointments: Vec<Appointment>,
    pub latest_metric: Option<HealthMetric>,
    pub health_score: u8,
    pub errors: Vec<String>,
}

impl PatientDashboard {
    pub async fn load(api: &ApiClient, today: NaiveDate) -> Self {
        let doctor_api = DoctorApi::new(api);
        let appointment_api = AppointmentApi::new(api);
        let metrics_api = HealthMetricsApi::new(api);

        let filter = DoctorFilter {
            limit: Some(FEATURED_DOCTORS),
            ..DoctorFilter::default()
        };

        let (doctors, appointments, latest) = tokio::join!(
            doctor_api.list(&filter),
            appointment_api.my_appointments(),
            metrics_api.latest(),
        );

        let mut dashboard = Self::default();

        match doctors {
            Ok(doctors) => dashboard.doctors = doctors,
            Err(e) => {
                warn!("Failed to load doctors: {}", e);
                dashboard.errors.push("Failed to load doctors".to_string());
            }
        }
        match appointments {
            Ok(appointments) => dashboard.appointments = appointments,
            Err(e) => {
                warn!("Failed to load appointments: {}", e);
                dashboard.errors.push("Failed to load appointments".to_string());
            }
        }
        match latest {
            Ok(metric) => dashboard.latest_metric = metric,
            Err(e) => {
                warn!("Failed to load health metrics: {}", e);
                dashboard.errors.push("Failed to load health metrics".to_string());
            }
        }

        dashboard.health_score = health_score(dashboard.latest_metric.as_ref(), &dashboard.appointments, today);
        dashboard
    }

    /// Scheduled or confirmed visits from `today` on, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Appointment> {
        upcoming_of(&self.appointments, today)
    }
}

#[derive(Debug, Default)]
pub struct DoctorDashboard {
    pub appointments: Vec<Appointment>,
    pub patients: Vec<UserProfile>,
    pub errors: Vec<String>,
}

impl DoctorDashboard {
    pub async fn load(api: &ApiClient) -> Self {
        let appointment_api = AppointmentApi::new(api);
        let user_api = UserApi::new(api);

        let (appointments, patients) = tokio::join!(appointment_api.my_appointments(), user_api.patients());

        let mut dashboard = Self::default();

        match appointments {
            Ok(appointments) => dashboard.appointments = appointments,
            Err(e) => {
                warn!("Failed to load appointments: {}", e);
                dashboard.errors.push("Failed to load appointments".to_string());
            }
        }
        match patients {
            Ok(patients) => dashboard.patients = patients,
            Err(e) => {
                warn!("Failed to load patients: {}", e);
                dashboard.errors.push("Failed to load patients".to_string());
            }
        }

        dashboard
    }

    pub fn todays_appointments(&self, today: NaiveDate) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.appointment_date == today && a.status != AppointmentStatus::Cancelled)
            .collect()
    }

    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Appointment> {
        upcoming_of(&self.appointments, today)
    }

    /// Bookings still waiting for the doctor to confirm.
    pub fn pending_count(&self) -> usize {
        self.appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .count()
    }
}
