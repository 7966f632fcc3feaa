use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ── Buffer ──

/// Minimum lead time between "now" and a bookable slot on the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotBuffer(pub u32);

impl SlotBuffer {
    /// Lead time of the original booking page.
    pub const LEGACY: SlotBuffer = SlotBuffer(45);
    /// Lead time of the schedule and instant booking flows.
    pub const STANDARD: SlotBuffer = SlotBuffer(60);

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for SlotBuffer {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ── Time strings ──

/// "HH:MM" label of a slot, the format availability lists use.
pub fn slot_label(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse "HH:MM" (seconds optional) into a time of day.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

// ── Gate ──

/// Whether a customer may pick `candidate`.
///
/// - a slot whose "HH:MM" is listed in `unavailable` is never available
/// - today and later days require `candidate >= now + buffer`, so a buffer
///   running past midnight also closes the first slots of tomorrow
/// - past days and a missing candidate are unavailable
pub fn is_slot_available<S: AsRef<str>>(
    candidate: Option<NaiveDateTime>,
    unavailable: &[S],
    buffer: SlotBuffer,
    now: NaiveDateTime,
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };

    let label = slot_label(candidate.time());
    if unavailable.iter().any(|s| s.as_ref() == label) {
        return false;
    }

    if candidate.date() < now.date() {
        return false;
    }
    now.checked_add_signed(buffer.duration())
        .is_some_and(|min_allowed| candidate >= min_allowed)
}

// ── Slot grid ──

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Slot start times from `open` (inclusive) to `close` (exclusive) every
/// `step_minutes`. A zero step or `close <= open` gives no slots.
pub fn time_grid(open: NaiveTime, close: NaiveTime, step_minutes: u32) -> Vec<NaiveTime> {
    if step_minutes == 0 {
        return Vec::new();
    }
    let start = open.num_seconds_from_midnight() / 60;
    let end = (close.num_seconds_from_midnight() / 60).min(MINUTES_PER_DAY);

    (start..end)
        .step_by(step_minutes as usize)
        .filter_map(|m| NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub time: String,
    pub available: bool,
}

/// The day's grid with each slot run through [`is_slot_available`].
pub fn slot_board<S: AsRef<str>>(
    date: NaiveDate,
    grid: &[NaiveTime],
    unavailable: &[S],
    buffer: SlotBuffer,
    now: NaiveDateTime,
) -> Vec<SlotStatus> {
    grid.iter()
        .map(|time| SlotStatus {
            time: slot_label(*time),
            available: is_slot_available(Some(date.and_time(*time)), unavailable, buffer, now),
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn now() -> NaiveDateTime {
        at(2024, 1, 1, 10, 0, 0)
    }

    // ── Buffer boundary ──

    #[test]
    fn test_buffer_one_minute_short() {
        let c = at(2024, 1, 1, 10, 44, 0);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer::LEGACY, now()));
    }

    #[test]
    fn test_buffer_exact_boundary() {
        let c = at(2024, 1, 1, 10, 45, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer::LEGACY, now()));
    }

    #[test]
    fn test_buffer_one_second_short() {
        let c = at(2024, 1, 1, 10, 44, 59);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer::LEGACY, now()));
    }

    #[test]
    fn test_standard_buffer() {
        let c = at(2024, 1, 1, 10, 45, 0);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, now()));
        let c = at(2024, 1, 1, 11, 0, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, now()));
    }

    #[test]
    fn test_custom_buffer() {
        let c = at(2024, 1, 1, 10, 0, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer(0), now()));
    }

    #[test]
    fn test_buffer_past_midnight() {
        // 23:30 with a 60 minute lead pushes the minimum into tomorrow
        let late = at(2024, 1, 1, 23, 30, 0);
        let c = at(2024, 1, 1, 23, 45, 0);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, late));
    }

    #[test]
    fn test_buffer_spills_into_next_day() {
        let late = at(2024, 1, 1, 23, 30, 0);
        let midnight = at(2024, 1, 2, 0, 0, 0);
        assert!(!is_slot_available(Some(midnight), &NONE, SlotBuffer::STANDARD, late));
        let c = at(2024, 1, 2, 0, 29, 59);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, late));
        let c = at(2024, 1, 2, 0, 30, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, late));
        let c = at(2024, 1, 3, 0, 0, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, late));
    }

    // ── Day comparison ──

    #[test]
    fn test_next_day_clear_of_buffer() {
        let c = at(2024, 1, 2, 0, 0, 0);
        assert!(is_slot_available(Some(c), &NONE, SlotBuffer::STANDARD, now()));
    }

    #[test]
    fn test_past_day_unavailable() {
        let c = at(2023, 12, 31, 18, 0, 0);
        assert!(!is_slot_available(Some(c), &NONE, SlotBuffer(0), now()));
    }

    #[test]
    fn test_missing_candidate_fails_closed() {
        assert!(!is_slot_available(None, &NONE, SlotBuffer(0), now()));
    }

    // ── Unavailable list ──

    #[test]
    fn test_unavailable_slot_any_day() {
        let c = at(2024, 6, 1, 14, 0, 0);
        assert!(!is_slot_available(Some(c), &["14:00"], SlotBuffer::STANDARD, now()));
    }

    #[test]
    fn test_unavailable_exact_match_only() {
        let c = at(2024, 6, 1, 14, 0, 0);
        let list = vec!["14:30".to_string(), "4:00".to_string()];
        assert!(is_slot_available(Some(c), &list, SlotBuffer::STANDARD, now()));
    }

    // ── Time strings ──

    #[test]
    fn test_slot_label_zero_padded() {
        assert_eq!(slot_label(time(8, 5)), "08:05");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:30"), Some(time(9, 30)));
        assert_eq!(parse_time(" 18:00 "), Some(time(18, 0)));
        assert_eq!(parse_time("18:00:00"), Some(time(18, 0)));
    }

    #[test]
    fn test_parse_time_invalid() {
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("12:60"), None);
        assert_eq!(parse_time("noon"), None);
        assert_eq!(parse_time(""), None);
    }

    // ── Grid ──

    #[test]
    fn test_grid_half_hour() {
        let grid = time_grid(time(8, 0), time(10, 0), 30);
        let labels: Vec<String> = grid.into_iter().map(slot_label).collect();
        assert_eq!(labels, vec!["08:00", "08:30", "09:00", "09:30"]);
    }

    #[test]
    fn test_grid_uneven_step() {
        let grid = time_grid(time(8, 0), time(9, 0), 45);
        assert_eq!(grid, vec![time(8, 0), time(8, 45)]);
    }

    #[test]
    fn test_grid_empty_cases() {
        assert!(time_grid(time(8, 0), time(8, 0), 30).is_empty());
        assert!(time_grid(time(10, 0), time(8, 0), 30).is_empty());
        assert!(time_grid(time(8, 0), time(20, 0), 0).is_empty());
    }

    #[test]
    fn test_board_today() {
        let grid = time_grid(time(10, 0), time(12, 0), 30);
        let day = now().date();
        let board = slot_board(day, &grid, &["11:30"], SlotBuffer::LEGACY, now());
        let flags: Vec<(&str, bool)> = board
            .iter()
            .map(|s| (s.time.as_str(), s.available))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("10:00", false),
                ("10:30", false),
                ("11:00", true),
                ("11:30", false),
            ]
        );
    }

    #[test]
    fn test_board_tomorrow_all_open() {
        let grid = time_grid(time(8, 0), time(10, 0), 60);
        let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let board = slot_board(tomorrow, &grid, &NONE, SlotBuffer::STANDARD, now());
        assert!(board.iter().all(|s| s.available));
        assert_eq!(board.len(), 2);
    }
}
