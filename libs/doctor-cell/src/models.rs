use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ==============================================================================
// TIME-OF-DAY VALUE
// ==============================================================================

/// A clock time with minute resolution. The data service stores appointment
/// times both as "HH:MM" and "HH:MM:SS" depending on the writer, so parsing is
/// tolerant and equality always compares hour:minute only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Advance by a number of minutes within the same day. Returns None when
    /// the result would cross midnight, which callers treat as "stop tiling".
    pub fn checked_add_minutes(self, minutes: i64) -> Option<Self> {
        let (advanced, wrapped) = self.0.overflowing_add_signed(chrono::Duration::minutes(minutes));
        if wrapped != 0 {
            return None;
        }
        Some(Self(advanced))
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split(':');

        let hour: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| ParseTimeOfDayError(raw.to_string()))?;
        let minute: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| ParseTimeOfDayError(raw.to_string()))?;
        // A trailing seconds component is accepted and discarded.

        TimeOfDay::from_hm(hour, minute).ok_or_else(|| ParseTimeOfDayError(raw.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone)]
pub struct ParseTimeOfDayError(String);

impl fmt::Display for ParseTimeOfDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid time of day: {}", self.0)
    }
}

impl std::error::Error for ParseTimeOfDayError {}

// ==============================================================================
// WEEKLY SCHEDULE
// ==============================================================================

/// One contiguous working interval on a weekday, e.g. 09:00-12:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPeriod {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Recurring weekly working hours. A day with no periods is a day off.
/// Periods keep their stored order; slot generation iterates them as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub sunday: Vec<WorkPeriod>,
    #[serde(default)]
    pub monday: Vec<WorkPeriod>,
    #[serde(default)]
    pub tuesday: Vec<WorkPeriod>,
    #[serde(default)]
    pub wednesday: Vec<WorkPeriod>,
    #[serde(default)]
    pub thursday: Vec<WorkPeriod>,
    #[serde(default)]
    pub friday: Vec<WorkPeriod>,
    #[serde(default)]
    pub saturday: Vec<WorkPeriod>,
}

impl WeeklySchedule {
    /// Day lookup follows the calendar-library convention: Sunday = 0 through
    /// Saturday = 6.
    pub fn periods_for(&self, weekday: Weekday) -> &[WorkPeriod] {
        match weekday {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }

    pub fn days(&self) -> [(&'static str, &[WorkPeriod]); 7] {
        [
            ("sunday", self.sunday.as_slice()),
            ("monday", self.monday.as_slice()),
            ("tuesday", self.tuesday.as_slice()),
            ("wednesday", self.wednesday.as_slice()),
            ("thursday", self.thursday.as_slice()),
            ("friday", self.friday.as_slice()),
            ("saturday", self.saturday.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.days().iter().all(|(_, periods)| periods.is_empty())
    }

    /// Every stored period must start strictly before it ends. New schedules
    /// are checked on create/update so malformed periods never reach the slot
    /// engine from the directory.
    pub fn validate(&self) -> Result<(), DoctorError> {
        for (day, periods) in self.days() {
            for period in periods {
                if period.start >= period.end {
                    return Err(DoctorError::InvalidSchedule(format!(
                        "{}: period {} - {} must start before it ends",
                        day, period.start, period.end
                    )));
                }
            }
        }
        Ok(())
    }
}

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub phone: String,
    pub address: String,
    pub working_hours: WeeklySchedule,
    pub appointment_duration: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    pub phone: String,
    pub address: String,
    pub working_hours: WeeklySchedule,
    pub appointment_duration: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<WeeklySchedule>,
    pub appointment_duration: Option<i32>,
    pub is_active: Option<bool>,
}

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// One offerable appointment time, classified against the booked set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: TimeOfDay,
    pub is_booked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub doctor_id: Uuid,
    pub date: chrono::NaiveDate,
    pub slots: Vec<Slot>,
}

// Error types specific to doctor operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DoctorError {
    NotFound,
    Inactive,
    InvalidSchedule(String),
    InvalidDuration(i32),
    ValidationError(String),
}

impl fmt::Display for DoctorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorError::NotFound => write!(f, "Doctor not found"),
            DoctorError::Inactive => write!(f, "Doctor is not accepting appointments"),
            DoctorError::InvalidSchedule(msg) => write!(f, "Invalid working hours: {}", msg),
            DoctorError::InvalidDuration(minutes) => {
                write!(f, "Appointment duration must be positive, got {}", minutes)
            }
            DoctorError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DoctorError {}

impl From<DoctorError> for shared_models::error::AppError {
    fn from(err: DoctorError) -> Self {
        use shared_models::error::AppError;
        match err {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::Inactive => AppError::BadRequest(err.to_string()),
            DoctorError::InvalidSchedule(_)
            | DoctorError::InvalidDuration(_)
            | DoctorError::ValidationError(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
