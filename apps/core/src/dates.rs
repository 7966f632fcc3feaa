use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Weekday mask ──

/// Number of weekday indices (0 = Sunday .. 6 = Saturday).
pub const DAYS_PER_WEEK: u8 = 7;

/// Sunday-first weekday index of a calendar date (0 = Sunday .. 6 = Saturday).
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Set of weekdays a recurring booking visits on.
///
/// Stored as a 7-bit set and serialized as an array of Sunday-first indices.
/// Indices outside 0..=6 are dropped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    pub const EMPTY: WeekdayMask = WeekdayMask(0);
    pub const ALL: WeekdayMask = WeekdayMask(0b111_1111);

    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Self {
        let bits = indices
            .into_iter()
            .filter(|i| *i < DAYS_PER_WEEK)
            .fold(0u8, |acc, i| acc | (1 << i));
        Self(bits)
    }

    pub fn contains_index(&self, index: u8) -> bool {
        index < DAYS_PER_WEEK && self.0 & (1 << index) != 0
    }

    /// Whether `date` falls on one of the selected weekdays.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_index(weekday_index(date))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of selected weekdays, i.e. visits per week.
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn indices(&self) -> Vec<u8> {
        (0..DAYS_PER_WEEK).filter(|i| self.contains_index(*i)).collect()
    }
}

impl From<Vec<u8>> for WeekdayMask {
    fn from(indices: Vec<u8>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<WeekdayMask> for Vec<u8> {
    fn from(mask: WeekdayMask) -> Self {
        mask.indices()
    }
}

// ── Date selection ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingMode {
    Single,
    SpecificDates,
    #[serde(rename = "range")]
    RangeWithWeekdayMask,
}

/// What the customer picked on the scheduling screen.
///
/// Fields are optional where the picker can be half-filled; an incomplete
/// selection resolves to no dates instead of failing. Dates are read with
/// [`parse_calendar_day`], so full timestamps collapse to their day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DateSelection {
    Single {
        #[serde(default, deserialize_with = "calendar_day::optional")]
        date: Option<NaiveDate>,
    },
    SpecificDates {
        #[serde(default, deserialize_with = "calendar_day::list")]
        dates: Vec<NaiveDate>,
    },
    #[serde(rename = "range")]
    RangeWithWeekdayMask {
        #[serde(default, deserialize_with = "calendar_day::optional")]
        start: Option<NaiveDate>,
        #[serde(default, deserialize_with = "calendar_day::optional")]
        end: Option<NaiveDate>,
        #[serde(default)]
        weekdays: WeekdayMask,
    },
}

impl DateSelection {
    pub fn mode(&self) -> SchedulingMode {
        match self {
            DateSelection::Single { .. } => SchedulingMode::Single,
            DateSelection::SpecificDates { .. } => SchedulingMode::SpecificDates,
            DateSelection::RangeWithWeekdayMask { .. } => SchedulingMode::RangeWithWeekdayMask,
        }
    }
}

// ── Resolution ──

/// Turn a selection into the ascending, duplicate-free list of visit dates.
///
/// Range selections expect `start <= end`; see [`normalize_range`]. An
/// inverted range yields no dates.
pub fn resolve_dates(selection: &DateSelection) -> Vec<NaiveDate> {
    let dates = match selection {
        DateSelection::Single { date } => date.iter().copied().collect(),
        DateSelection::SpecificDates { dates } => {
            let mut unique = dates.clone();
            unique.sort_unstable();
            unique.dedup();
            unique
        }
        DateSelection::RangeWithWeekdayMask {
            start,
            end,
            weekdays,
        } => resolve_range(*start, *end, *weekdays),
    };

    tracing::debug!(mode = ?selection.mode(), visits = dates.len(), "resolved visit dates");
    dates
}

fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    weekdays: WeekdayMask,
) -> Vec<NaiveDate> {
    if weekdays.is_empty() {
        return Vec::new();
    }

    match (start, end) {
        // Only the first endpoint picked so far: still filtered by the mask
        (Some(start), None) if weekdays.contains(start) => vec![start],
        (Some(start), Some(end)) => start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| weekdays.contains(*day))
            .collect(),
        _ => Vec::new(),
    }
}

/// Order two picked endpoints so that the first is not after the second.
pub fn normalize_range(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parse a calendar day from `YYYY-MM-DD`, ignoring any time-of-day suffix
/// (`2024-03-05T10:00:00Z` and `2024-03-05 10:00` both give 2024-03-05).
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    let rest = &raw[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

mod calendar_day {
    use super::parse_calendar_day;
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer};

    fn parse<E: Error>(raw: &str) -> Result<NaiveDate, E> {
        parse_calendar_day(raw).ok_or_else(|| E::custom(format!("invalid date: {}", raw)))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .as_deref()
            .map(parse::<D::Error>)
            .transpose()
    }

    pub fn list<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| parse::<D::Error>(raw))
            .collect()
    }
}

// ── Tests ──
