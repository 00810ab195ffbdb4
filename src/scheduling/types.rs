/// Types for schedule availability resolution
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// A weekday in the recurring-schedule domain.
///
/// The domain is Monday through Saturday (codes 1-6). Sunday is not part of
/// the recurring-schedule domain and has no variant. The catalog encodes
/// weekdays as two-character tokens "T2".."T7" (T2 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in ascending code order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Returns the numeric code (1 = Monday .. 6 = Saturday).
    pub fn code(self) -> u8 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    /// Converts a numeric code to a weekday. Codes outside 1-6 yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Parses a catalog day token ("T2".."T7", case-insensitive).
    pub fn from_catalog_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "T2" => Some(Weekday::Monday),
            "T3" => Some(Weekday::Tuesday),
            "T4" => Some(Weekday::Wednesday),
            "T5" => Some(Weekday::Thursday),
            "T6" => Some(Weekday::Friday),
            "T7" => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Returns the catalog day token for this weekday.
    pub fn catalog_token(self) -> &'static str {
        match self {
            Weekday::Monday => "T2",
            Weekday::Tuesday => "T3",
            Weekday::Wednesday => "T4",
            Weekday::Thursday => "T5",
            Weekday::Friday => "T6",
            Weekday::Saturday => "T7",
        }
    }

    fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat => Some(Weekday::Saturday),
            chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// Upstream UI state carries weekday codes as either numbers or numeric
// strings; both forms deserialize to the same value.
impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WeekdayVisitor;

        impl Visitor<'_> for WeekdayVisitor {
            type Value = Weekday;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a weekday code 1-6 as a number or numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weekday, E> {
                Weekday::from_code(v)
                    .ok_or_else(|| E::custom(format!("weekday code out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weekday, E> {
                self.visit_i64(v as i64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Weekday, E> {
                let code: i64 = v
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("weekday code is not numeric: {v:?}")))?;
                self.visit_i64(code)
            }
        }

        deserializer.deserialize_any(WeekdayVisitor)
    }
}

/// Identifier of a catalog timeslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    /// Parses an id that may arrive as a numeric string.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse().ok().map(SlotId)
    }
}

impl From<u32> for SlotId {
    fn from(v: u32) -> Self {
        SlotId(v)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for SlotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotIdVisitor;

        impl Visitor<'_> for SlotIdVisitor {
            type Value = SlotId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a timeslot id as a number or numeric string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SlotId, E> {
                u32::try_from(v)
                    .map(SlotId)
                    .map_err(|_| E::custom(format!("timeslot id out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SlotId, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("timeslot id out of range: {v}")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SlotId, E> {
                SlotId::parse(v)
                    .ok_or_else(|| E::custom(format!("timeslot id is not numeric: {v:?}")))
            }
        }

        deserializer.deserialize_any(SlotIdVisitor)
    }
}

/// A catalog-defined time range, optionally restricted to one weekday.
///
/// Reference data maintained by an external system; this crate only reads it.
/// Times are "HH:MM:SS" clock strings; entries whose times do not parse are
/// treated as non-matching rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeslot {
    pub id: SlotId,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    /// Weekday token "T2".."T7"; absent means usable on any weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl Timeslot {
    /// Parses the start/end times. `None` if either is missing or malformed.
    pub fn time_range(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M:%S").ok()?;
        let end = NaiveTime::parse_from_str(self.end_time.trim(), "%H:%M:%S").ok()?;
        Some((start, end))
    }

    /// Returns the weekday restriction, if present and well-formed.
    pub fn weekday(&self) -> Option<Weekday> {
        self.day.as_deref().and_then(Weekday::from_catalog_token)
    }
}

/// Inclusive date range bounding a recurring schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "startDate")]
    pub start: NaiveDate,
    #[serde(rename = "endDate")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Expands the range into the concrete dates falling on the given
    /// weekdays, in ascending order. Used to preview the sessions a
    /// recurring schedule would generate.
    pub fn dates_on(&self, weekdays: &[Weekday]) -> Vec<NaiveDate> {
        let wanted: HashSet<Weekday> = weekdays.iter().copied().collect();
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| Weekday::from_chrono(d.weekday()).is_some_and(|w| wanted.contains(&w)))
            .collect()
    }
}

/// Status of an instructor for one (weekday, timeslot) window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "AVAILABLE")]
    Available,
    /// The instructor has a conflicting commitment (existing session or
    /// holiday) in this window. The only disqualifying status.
    #[serde(rename = "LOCKED")]
    Locked,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

/// Result of a slot-status lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatusReport {
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        rename = "reasonSource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reason_source: Option<String>,
}

impl SlotStatusReport {
    pub fn available() -> Self {
        Self {
            status: SlotStatus::Available,
            reason: None,
            reason_source: None,
        }
    }

    pub fn locked(reason: impl Into<String>) -> Self {
        Self {
            status: SlotStatus::Locked,
            reason: Some(reason.into()),
            reason_source: None,
        }
    }
}

/// Availability policy class of an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructorType {
    /// Implicitly available Monday-Saturday, all slots.
    #[serde(rename = "fulltime")]
    FullTime,
    /// Available only for explicitly declared (weekday, timeslot) pairs.
    #[serde(rename = "parttime")]
    PartTime,
}

/// Declared availability of a part-time instructor.
///
/// Upstream represents this as a set of composite keys
/// `"{weekday}-{timeslotId}"`; both halves may be numeric strings with
/// stray whitespace. Malformed keys are skipped, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartTimeAvailability {
    pairs: HashSet<(Weekday, SlotId)>,
}

impl PartTimeAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from composite keys.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs = keys
            .into_iter()
            .filter_map(|key| Self::parse_key(key.as_ref()))
            .collect();
        Self { pairs }
    }

    fn parse_key(key: &str) -> Option<(Weekday, SlotId)> {
        let (day, slot) = key.split_once('-')?;
        let weekday = Weekday::from_code(day.trim().parse().ok()?)?;
        let slot = SlotId::parse(slot)?;
        Some((weekday, slot))
    }

    pub fn insert(&mut self, weekday: Weekday, slot: SlotId) {
        self.pairs.insert((weekday, slot));
    }

    pub fn contains(&self, weekday: Weekday, slot: SlotId) -> bool {
        self.pairs.contains(&(weekday, slot))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Inputs to one availability computation.
///
/// All collections are owned, request-scoped data; callers pass defaulted
/// empty collections rather than omitting fields.
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    /// Timeslot ids currently chosen by the scheduler.
    pub selected_slots: Vec<SlotId>,
    /// The full timeslot catalog.
    pub catalog: Vec<Timeslot>,
    /// Weekdays already committed in the current editing session.
    pub already_selected: HashSet<Weekday>,
    /// Date range bounding the recurring schedule.
    pub range: DateRange,
    /// `None` means no instructor assigned yet, so no constraint applies.
    pub instructor: Option<InstructorType>,
    /// Ignored unless `instructor` is `Some(PartTime)`.
    pub part_time_availability: PartTimeAvailability,
}
