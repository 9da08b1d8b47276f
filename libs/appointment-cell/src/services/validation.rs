use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::models::AppointmentError;

/// How far ahead the public form may book, inclusive.
pub const BOOKING_WINDOW_DAYS: i64 = 30;

/// Normalize a Turkish mobile number to +90 form. Accepts bare 10-digit
/// input, a leading 0, a leading 90 country code, or an already-prefixed
/// +90 value; anything else is rejected.
pub fn normalize_phone(raw: &str) -> Result<String, AppointmentError> {
    let digits_only = Regex::new(r"\D").unwrap().replace_all(raw, "");
    let mut digits = digits_only.as_ref();

    if digits.len() == 12 && digits.starts_with("90") {
        digits = &digits[2..];
    } else if digits.len() == 11 && digits.starts_with('0') {
        digits = &digits[1..];
    }

    if digits.len() != 10 {
        return Err(AppointmentError::Validation(
            "Phone number must be 10 digits".to_string(),
        ));
    }

    Ok(format!("+90{}", digits))
}

/// National identity numbers are stored as the bare 11 digits.
pub fn normalize_tc_number(raw: &str) -> Result<String, AppointmentError> {
    let digits = Regex::new(r"\D").unwrap().replace_all(raw, "").into_owned();

    if digits.len() != 11 {
        return Err(AppointmentError::Validation(
            "Identity number must be 11 digits".to_string(),
        ));
    }

    Ok(digits)
}

pub fn validate_full_name(raw: &str) -> Result<String, AppointmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppointmentError::Validation(
            "Patient name is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// The booking form offers dates from today through today + 30 days.
pub fn validate_booking_window(
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppointmentError> {
    if date < today {
        return Err(AppointmentError::Validation(
            "Appointment date cannot be in the past".to_string(),
        ));
    }
    if date > today + Duration::days(BOOKING_WINDOW_DAYS) {
        return Err(AppointmentError::Validation(format!(
            "Appointments can be booked at most {} days ahead",
            BOOKING_WINDOW_DAYS
        )));
    }
    Ok(())
}
