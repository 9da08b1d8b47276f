use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{Appointment, AppointmentError, PatientSummary};
use crate::services::booking::BookingService;

/// The clinic has no standalone patient table; the directory is derived from
/// appointment history, keyed by national identity number.
pub struct PatientDirectoryService {
    booking: BookingService,
}

impl PatientDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            booking: BookingService::new(config),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientSummary>, AppointmentError> {
        let appointments = self.booking.list_appointments(Default::default()).await?;
        debug!("Aggregating {} appointments into patient directory", appointments.len());
        Ok(group_patients(appointments))
    }
}

/// Fold appointment rows into per-patient summaries. The most recently
/// created row for a given identity number supplies the displayed name and
/// phone; counts and date bounds accumulate across all rows. Output is sorted
/// by most recent appointment first.
pub fn group_patients(appointments: Vec<Appointment>) -> Vec<PatientSummary> {
    struct Entry {
        summary: PatientSummary,
        newest_row: DateTime<Utc>,
    }

    let mut by_tc: HashMap<String, Entry> = HashMap::new();

    for appointment in appointments {
        match by_tc.get_mut(&appointment.tc_number) {
            Some(entry) => {
                entry.summary.total_appointments += 1;
                if appointment.created_at > entry.newest_row {
                    entry.newest_row = appointment.created_at;
                    entry.summary.full_name = appointment.full_name;
                    entry.summary.phone = appointment.phone;
                }
                if appointment.created_at < entry.summary.first_seen {
                    entry.summary.first_seen = appointment.created_at;
                }
                if appointment.appointment_date > entry.summary.last_appointment_date {
                    entry.summary.last_appointment_date = appointment.appointment_date;
                }
            }
            None => {
                by_tc.insert(appointment.tc_number.clone(), Entry {
                    newest_row: appointment.created_at,
                    summary: PatientSummary {
                        full_name: appointment.full_name,
                        phone: appointment.phone,
                        tc_number: appointment.tc_number,
                        total_appointments: 1,
                        first_seen: appointment.created_at,
                        last_appointment_date: appointment.appointment_date,
                    },
                });
            }
        }
    }

    let mut patients: Vec<PatientSummary> = by_tc.into_values()
        .map(|entry| entry.summary)
        .collect();
    patients.sort_by(|a, b| b.last_appointment_date.cmp(&a.last_appointment_date));
    patients
}
