//! Vital-sign records and the derived health score shown on the patient dashboard.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::appointment::{Appointment, AppointmentStatus};

pub const BASE_HEALTH_SCORE: i32 = 75;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetric {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub bmi: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordHealthMetricRequest {
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Centimetres.
    #[serde(default)]
    pub height: Option<f64>,
}

impl RecordHealthMetricRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.blood_pressure.is_none()
            && self.heart_rate.is_none()
            && self.weight.is_none()
            && self.height.is_none()
        {
            return Err("At least one measurement is required".to_string());
        }
        if let Some(ref bp) = self.blood_pressure {
            parse_blood_pressure(bp)
                .ok_or_else(|| format!("Invalid blood pressure '{}', expected S/D", bp))?;
        }
        if let Some(hr) = self.heart_rate {
            if !(20..=250).contains(&hr) {
                return Err(format!("Heart rate {} is out of range", hr));
            }
        }
        if let Some(w) = self.weight {
            if !(w > 0.0 && w < 500.0) {
                return Err(format!("Weight {} is out of range", w));
            }
        }
        if let Some(h) = self.height {
            if !(h > 0.0 && h < 300.0) {
                return Err(format!("Height {} is out of range", h));
            }
        }
        Ok(())
    }

    pub fn bmi(&self) -> Option<f64> {
        match (self.weight, self.height) {
            (Some(w), Some(h)) => compute_bmi(w, h),
            _ => None,
        }
    }
}

/// Parses "120/80" into (systolic, diastolic).
pub fn parse_blood_pressure(value: &str) -> Option<(i32, i32)> {
    let (sys, dia) = value.trim().split_once('/')?;
    let systolic = sys.trim().parse::<i32>().ok()?;
    let diastolic = dia.trim().parse::<i32>().ok()?;
    if systolic <= 0 || diastolic <= 0 {
        return None;
    }
    Some((systolic, diastolic))
}

/// BMI rounded to one decimal, from kilograms and centimetres.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

fn blood_pressure_delta(reading: Option<&str>) -> i32 {
    match reading.and_then(parse_blood_pressure) {
        Some((s, d)) if (90..=120).contains(&s) && (60..=80).contains(&d) => 10,
        Some((s, d)) if s > 140 || d > 90 => -15,
        Some(_) => -5,
        None => 0,
    }
}

fn heart_rate_delta(heart_rate: Option<i32>) -> i32 {
    match heart_rate {
        Some(hr) if (60..=100).contains(&hr) => 5,
        Some(_) => -10,
        None => 0,
    }
}

fn bmi_delta(bmi: Option<f64>) -> i32 {
    match bmi {
        Some(b) if (18.5..=24.9).contains(&b) => 10,
        Some(b) if b >= 30.0 || b < 16.0 => -15,
        Some(_) => -5,
        None => 0,
    }
}

fn had_recent_checkup(appointments: &[Appointment], today: NaiveDate) -> bool {
    let window_start = today.checked_sub_months(Months::new(6)).unwrap_or(NaiveDate::MIN);
    appointments.iter().any(|a| {
        a.status != AppointmentStatus::Cancelled
            && a.appointment_date >= window_start
            && a.appointment_date <= today
    })
}

/// Summarises the latest vitals and checkup recency into 0..=100.
pub fn health_score(
    metric: Option<&HealthMetric>,
    appointments: &[Appointment],
    today: NaiveDate,
) -> u8 {
    let mut score = BASE_HEALTH_SCORE;

    if let Some(m) = metric {
        score += blood_pressure_delta(m.blood_pressure.as_deref());
        score += heart_rate_delta(m.heart_rate);
        let bmi = m.bmi.or_else(|| match (m.weight, m.height) {
            (Some(w), Some(h)) => compute_bmi(w, h),
            _ => None,
        });
        score += bmi_delta(bmi);
    }

    if had_recent_checkup(appointments, today) {
        score += 5;
    }

    score.clamp(0, 100) as u8
}
