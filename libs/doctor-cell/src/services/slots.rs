use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::models::{Slot, TimeOfDay, WeeklySchedule};

/// The set of times already taken for one doctor on one date. Built fresh for
/// every availability query from non-cancelled appointments; never persisted.
#[derive(Debug, Clone, Default)]
pub struct BookedTimes(HashSet<TimeOfDay>);

impl BookedTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect from raw time strings as stored by the data service. Values
    /// that do not parse as a clock time are skipped rather than rejected;
    /// a row the engine cannot interpret must not block the whole day.
    pub fn from_raw<'a, I>(times: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(times.into_iter().filter_map(|t| t.parse().ok()).collect())
    }

    pub fn insert(&mut self, time: TimeOfDay) {
        self.0.insert(time);
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.0.contains(&time)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TimeOfDay> for BookedTimes {
    fn from_iter<I: IntoIterator<Item = TimeOfDay>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tile a doctor's working hours for one date into offerable slots and mark
/// each as free or booked.
///
/// The date's weekday selects which periods apply; a day without periods
/// yields an empty list, the normal "not working that day" outcome. Within a
/// period, slots start at the period start and advance by the duration while
/// the slot *start* is before the period end — the last slot of a period may
/// run past the end when the remaining span is shorter than one duration.
/// Periods are consumed in stored order and the outputs concatenated without
/// re-sorting.
///
/// Pure and deterministic: no I/O, no clock access, inputs are not mutated.
pub fn generate_slots(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    duration_minutes: i32,
    booked: &BookedTimes,
) -> Vec<Slot> {
    // A non-positive stride cannot tile a period; callers validate the
    // doctor record before getting here.
    if duration_minutes <= 0 {
        return Vec::new();
    }

    let periods = schedule.periods_for(date.weekday());

    let mut slots = Vec::new();
    for period in periods {
        let mut current = period.start;
        while current < period.end {
            slots.push(Slot {
                time: current,
                is_booked: booked.contains(current),
            });

            match current.checked_add_minutes(duration_minutes as i64) {
                Some(next) => current = next,
                // The stride crossed midnight; the period is exhausted.
                None => break,
            }
        }
    }

    slots
}
