use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Wallet,
}

/// Everything a booking carries besides its visit dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub service_id: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
    pub address_id: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// One visit as the booking submission endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingEntry {
    pub service_id: String,
    /// Serialized as RFC 3339, e.g. `2024-01-08T09:00:00+04:00`.
    pub scheduled_at: DateTime<FixedOffset>,
    pub duration_minutes: u32,
    pub add_on_ids: Vec<String>,
    pub address_id: String,
    pub payment_method: PaymentMethod,
}

/// One entry per visit date at the chosen time of day, stamped with `offset`.
pub fn build_booking_entries(
    dates: &[NaiveDate],
    time: NaiveTime,
    offset: FixedOffset,
    draft: &BookingDraft,
) -> Vec<BookingEntry> {
    dates
        .iter()
        .filter_map(|date| date.and_time(time).and_local_timezone(offset).single())
        .map(|scheduled_at| BookingEntry {
            service_id: draft.service_id.clone(),
            scheduled_at,
            duration_minutes: draft.duration_minutes,
            add_on_ids: draft.add_on_ids.clone(),
            address_id: draft.address_id.clone(),
            payment_method: draft.payment_method,
        })
        .collect()
}
