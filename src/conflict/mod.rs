//! Parsing of backend scheduling-conflict error messages.
//!
//! When a submitted schedule collides with an instructor's existing
//! commitments, the backend answers with a localized free-text message
//! rather than a structured payload. This module pattern-matches that prose
//! to recover the conflicting class, session, date and time range for
//! display. The patterns are a de facto protocol: any backend wording
//! change must be reflected here.
//!
//! Extraction strategies, first match wins per field group:
//! 1. Full labeled form `lớp <class> - <title> (<date> <start>-<end>)`
//! 2. The same form without the leading label
//! 3. Independent sub-extractions: a `Session:` marker (with an embedded
//!    date/time range split out of the captured title), a `Lớp:` marker or
//!    a standalone class code, and a generic date/time range
//!
//! Parsing never fails; unresolved fields keep their sentinel values and
//! callers fall back to showing the raw message.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Static patterns - compiled once
static FULL_LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)lớp\s+([^\s-]+)\s*-\s*(.+?)\s*\((\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})-(\d{2}:\d{2}:\d{2})\)",
    )
    .unwrap()
});
static FULL_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([^\s-]+)\s*-\s*(.+?)\s*\((\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})-(\d{2}:\d{2}:\d{2})\)",
    )
    .unwrap()
});
static SESSION_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)session:\s*([^\r\n]+)").unwrap());
static CLASS_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lớp:\s*(\S+)").unwrap());
static CLASS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z]\d+)\b").unwrap());
static DATE_TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})-(\d{2}:\d{2}:\d{2})").unwrap()
});

/// Phrases marking a message as a scheduling conflict (lowercase).
const CONFLICT_PHRASES: &[&str] = &[
    "trùng thời gian",
    "trùng lịch",
    "conflict",
    "đã có ca học",
];

/// Structured fields extracted from a conflict message.
///
/// Fields that could not be extracted hold the sentinel values
/// [`ConflictInfo::UNKNOWN`], [`ConflictInfo::UNKNOWN_DATE`] and
/// [`ConflictInfo::UNKNOWN_TIME`]; callers must treat those as absent, not
/// as real data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub class_name: String,
    pub session_title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl ConflictInfo {
    pub const UNKNOWN: &'static str = "Unknown";
    pub const UNKNOWN_DATE: &'static str = "Unknown Date";
    pub const UNKNOWN_TIME: &'static str = "Unknown Time";

    /// Returns true if nothing at all was extracted.
    pub fn is_fully_unknown(&self) -> bool {
        self == &ConflictInfo::default()
    }
}

impl Default for ConflictInfo {
    fn default() -> Self {
        Self {
            class_name: Self::UNKNOWN.to_string(),
            session_title: Self::UNKNOWN.to_string(),
            date: Self::UNKNOWN_DATE.to_string(),
            start_time: Self::UNKNOWN_TIME.to_string(),
            end_time: Self::UNKNOWN_TIME.to_string(),
        }
    }
}

/// Decides whether a backend error message describes a scheduling conflict
/// and should be routed through [`parse_conflict`], as opposed to being
/// shown as a plain error.
pub fn is_conflict_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    CONFLICT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Extracts structured conflict fields from a backend error message.
///
/// Never fails; in the worst case every field is a sentinel.
pub fn parse_conflict(message: &str) -> ConflictInfo {
    // Strategy 1 and 2: the full form, labeled then unlabeled.
    for re in [&FULL_LABELED_RE, &FULL_BARE_RE] {
        if let Some(caps) = re.captures(message) {
            return ConflictInfo {
                class_name: caps[1].to_string(),
                session_title: caps[2].trim().to_string(),
                date: caps[3].to_string(),
                start_time: caps[4].to_string(),
                end_time: caps[5].to_string(),
            };
        }
    }

    // Strategy 3: independent sub-extractions.
    let mut info = ConflictInfo::default();

    if let Some(caps) = SESSION_MARKER_RE.captures(message) {
        let captured = caps[1].trim();
        // The captured text may carry the date/time range itself; split it
        // out and keep only the leading title, minus a trailing comma.
        let title = match DATE_TIME_RANGE_RE.captures(captured) {
            Some(range) => {
                info.date = range[1].to_string();
                info.start_time = range[2].to_string();
                info.end_time = range[3].to_string();
                let cut = range.get(0).map_or(captured.len(), |m| m.start());
                captured[..cut].trim_end().trim_end_matches(',').trim_end()
            }
            None => captured,
        };
        if !title.is_empty() {
            info.session_title = title.to_string();
        }
    }

    if let Some(caps) = CLASS_MARKER_RE.captures(message) {
        info.class_name = caps[1].trim_end_matches([',', '.']).to_string();
    } else if let Some(caps) = CLASS_CODE_RE.captures(message) {
        info.class_name = caps[1].to_string();
    }

    if info.date == ConflictInfo::UNKNOWN_DATE {
        if let Some(caps) = DATE_TIME_RANGE_RE.captures(message) {
            info.date = caps[1].to_string();
            info.start_time = caps[2].to_string();
            info.end_time = caps[3].to_string();
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_labeled_message() {
        let info = parse_conflict(
            "lớp A2 - Bài 1: Giới thiệu Python & Anaconda (2025-11-04 09:00:00-11:00:00)",
        );
        assert_eq!(info.class_name, "A2");
        assert_eq!(info.session_title, "Bài 1: Giới thiệu Python & Anaconda");
        assert_eq!(info.date, "2025-11-04");
        assert_eq!(info.start_time, "09:00:00");
        assert_eq!(info.end_time, "11:00:00");
    }

    #[test]
    fn test_full_message_without_label() {
        let info = parse_conflict("B1 - Ôn tập giữa kỳ (2025-12-01 14:00:00-16:00:00)");
        assert_eq!(info.class_name, "B1");
        assert_eq!(info.session_title, "Ôn tập giữa kỳ");
        assert_eq!(info.date, "2025-12-01");
        assert_eq!(info.start_time, "14:00:00");
        assert_eq!(info.end_time, "16:00:00");
    }

    #[test]
    fn test_session_marker_with_embedded_range() {
        let info = parse_conflict(
            "Trùng thời gian với ca học khác.\nSession: Bài 3: Vòng lặp, 2025-11-05 14:00:00-16:00:00\nLớp: B1",
        );
        assert_eq!(info.session_title, "Bài 3: Vòng lặp");
        assert_eq!(info.date, "2025-11-05");
        assert_eq!(info.start_time, "14:00:00");
        assert_eq!(info.end_time, "16:00:00");
        assert_eq!(info.class_name, "B1");
    }

    #[test]
    fn test_session_marker_without_range() {
        let info = parse_conflict("Đã có ca học. Session: Thực hành cuối khóa");
        assert_eq!(info.session_title, "Thực hành cuối khóa");
        assert_eq!(info.date, ConflictInfo::UNKNOWN_DATE);
        assert_eq!(info.start_time, ConflictInfo::UNKNOWN_TIME);
    }

    #[test]
    fn test_standalone_class_code_and_generic_range() {
        let info = parse_conflict(
            "Giảng viên đã có ca học trùng với lớp C305 vào 2025-12-01 08:00:00-10:00:00",
        );
        assert_eq!(info.class_name, "C305");
        assert_eq!(info.session_title, ConflictInfo::UNKNOWN);
        assert_eq!(info.date, "2025-12-01");
        assert_eq!(info.start_time, "08:00:00");
        assert_eq!(info.end_time, "10:00:00");
    }

    #[test]
    fn test_unrelated_message_degrades_to_sentinels() {
        let info = parse_conflict("some unrelated backend failure");
        assert!(info.is_fully_unknown());
        assert_eq!(info.class_name, ConflictInfo::UNKNOWN);
        assert_eq!(info.session_title, ConflictInfo::UNKNOWN);
        assert_eq!(info.date, ConflictInfo::UNKNOWN_DATE);
        assert_eq!(info.start_time, ConflictInfo::UNKNOWN_TIME);
        assert_eq!(info.end_time, ConflictInfo::UNKNOWN_TIME);
    }

    #[test]
    fn test_is_conflict_error_matches_known_phrases() {
        assert!(is_conflict_error("Ca học bị TRÙNG THỜI GIAN với lớp khác"));
        assert!(is_conflict_error("Schedule CONFLICT detected"));
        assert!(is_conflict_error("Giảng viên đã có ca học vào khung giờ này"));
        assert!(is_conflict_error("Lịch dạy bị trùng lịch với ca khác"));
        assert!(!is_conflict_error("Internal server error"));
        assert!(!is_conflict_error("Validation failed: name is required"));
    }
}
