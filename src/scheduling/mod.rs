//! Weekday availability resolution for recurring class schedules.
//!
//! A proposed weekly schedule is a cross-product of selected timeslots and
//! candidate weekdays over a date range. For each weekday Monday-Saturday
//! this module decides whether any selected timeslot makes the day
//! assignable, given the instructor's availability policy and an injected
//! slot-status lookup that knows about booked sessions and holidays.

mod cache;
mod client;
mod config;
mod error;
mod types;

pub use cache::{CacheStats, CachedStatusLookup, StatusCache, StatusKey};
pub use client::SlotStatusClient;
pub use config::StatusClientConfig;
pub use error::ScheduleError;
pub use types::{
    AvailabilityQuery, DateRange, InstructorType, PartTimeAvailability, SlotId, SlotStatus,
    SlotStatusReport, Timeslot, Weekday,
};

use std::future::Future;

/// Port for querying an instructor's status in a (weekday, timeslot) window
/// over a date range.
///
/// The production implementation wraps a backend HTTP call
/// ([`SlotStatusClient`]); tests substitute in-memory fakes. Lookups are
/// expected to be cheap or memoized ([`CachedStatusLookup`]) because the
/// resolver runs on every UI interaction.
pub trait SlotStatusLookup {
    fn slot_status(
        &self,
        weekday: Weekday,
        slot: SlotId,
        range: &DateRange,
    ) -> impl Future<Output = Result<SlotStatusReport, ScheduleError>> + Send;
}

/// Full-time instructors are implicitly available Monday-Saturday, all
/// slots; only an explicit LOCKED status disqualifies a day.
pub fn default_fulltime_availability(_weekday: Weekday) -> bool {
    true
}

/// Computes which weekdays are assignable for a proposed recurring schedule.
pub struct AvailabilityResolver<L> {
    lookup: L,
}

impl<L: SlotStatusLookup> AvailabilityResolver<L> {
    /// Creates a resolver with the given slot-status lookup.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Returns the underlying lookup.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Computes the assignable weekdays for `query`, in ascending order.
    ///
    /// Rules, per weekday Monday-Saturday:
    /// - A day already committed in the current editing session is included
    ///   unconditionally and never re-validated.
    /// - Otherwise each selected timeslot is resolved against the catalog: a
    ///   day-specific entry with the same clock times is preferred, a
    ///   day-unrestricted one is the fallback, and no match means the slot
    ///   contributes nothing for that day.
    /// - Full-time instructors need the window to not be LOCKED; part-time
    ///   instructors additionally need the (weekday, timeslot) pair declared
    ///   in their availability before any lookup happens; with no instructor
    ///   assigned there is no constraint to enforce.
    /// - The first timeslot that qualifies a day ends its evaluation.
    ///
    /// An empty selection (and nothing already committed) yields an empty
    /// result, which is a valid state, not an error. Only lookup I/O
    /// failures produce `Err`.
    pub async fn compute_available_weekdays(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Weekday>, ScheduleError> {
        let mut eligible = Vec::new();

        for weekday in Weekday::ALL {
            if query.already_selected.contains(&weekday) {
                eligible.push(weekday);
                continue;
            }

            for &slot_id in &query.selected_slots {
                let Some(base) = query.catalog.iter().find(|t| t.id == slot_id) else {
                    continue;
                };
                let Some(day_slot) = resolve_day_slot(&query.catalog, base, weekday) else {
                    continue;
                };

                let qualified = match query.instructor {
                    Some(InstructorType::FullTime) => {
                        if !default_fulltime_availability(weekday) {
                            continue;
                        }
                        let report = self
                            .lookup
                            .slot_status(weekday, day_slot.id, &query.range)
                            .await?;
                        report.status != SlotStatus::Locked
                    }
                    Some(InstructorType::PartTime) => {
                        if !query.part_time_availability.contains(weekday, day_slot.id) {
                            continue;
                        }
                        let report = self
                            .lookup
                            .slot_status(weekday, day_slot.id, &query.range)
                            .await?;
                        report.status != SlotStatus::Locked
                    }
                    // No instructor assigned yet, nothing to enforce.
                    None => true,
                };

                if qualified {
                    eligible.push(weekday);
                    break;
                }
            }
        }

        Ok(eligible)
    }
}

/// Finds the catalog entry to evaluate for `base` on `weekday`: same clock
/// times, preferring a matching day restriction, falling back to an entry
/// with none. Entries with malformed times or day tokens never match.
fn resolve_day_slot<'a>(
    catalog: &'a [Timeslot],
    base: &Timeslot,
    weekday: Weekday,
) -> Option<&'a Timeslot> {
    let base_range = base.time_range()?;
    let mut fallback = None;

    for candidate in catalog {
        if candidate.time_range() != Some(base_range) {
            continue;
        }
        match &candidate.day {
            Some(token) => {
                if Weekday::from_catalog_token(token) == Some(weekday) {
                    return Some(candidate);
                }
            }
            None => {
                fallback.get_or_insert(candidate);
            }
        }
    }

    fallback
}
