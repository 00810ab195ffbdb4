//! Scheduling core for an education-management platform.
//!
//! Two pieces back the class-scheduling UI:
//!
//! - [`scheduling`]: decides which weekdays a proposed weekly recurring
//!   class can be assigned to, given the selected timeslots, the
//!   instructor's availability policy and an injected slot-status lookup
//!   (the backend's view of booked sessions and holidays).
//! - [`conflict`]: recovers structured fields from the backend's free-text
//!   conflict error when a submission collides anyway.
//!
//! Both are pure over their inputs; the only I/O is the status lookup,
//! which production code supplies as an HTTP client
//! ([`scheduling::SlotStatusClient`]) behind a memoizing cache
//! ([`scheduling::CachedStatusLookup`]).

pub mod conflict;
pub mod scheduling;

pub use conflict::{is_conflict_error, parse_conflict, ConflictInfo};
pub use scheduling::{
    AvailabilityQuery, AvailabilityResolver, DateRange, InstructorType, PartTimeAvailability,
    ScheduleError, SlotId, SlotStatus, SlotStatusLookup, SlotStatusReport, Timeslot, Weekday,
};
