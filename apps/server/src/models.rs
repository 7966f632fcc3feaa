use chrono::NaiveDate;
use cleanbook_core::{
    AddOn, BillingCycle, BookingDraft, BookingEntry, DateSelection, DurationOption,
    PriceBreakdown, SchedulingMode, SlotStatus, SubscriptionPlan,
};
use serde::{Deserialize, Serialize};

// ── Catalog ──

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub visits: u32,
    pub base_price: f64,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub services: Vec<ServiceInfo>,
    pub durations: Vec<DurationOption>,
    pub default_duration_minutes: u32,
    pub add_ons: Vec<AddOn>,
    pub plans: Vec<SubscriptionPlan>,
    pub packages: Vec<Package>,
}

// ── Scheduling ──

#[derive(Debug, Serialize)]
pub struct ResolvedDatesResponse {
    pub mode: SchedulingMode,
    pub dates: Vec<NaiveDate>,
    pub visit_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AvailableTimesQuery {
    pub date: String,
    /// Comma-separated "HH:MM" list from the availability service.
    pub unavailable: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailableTimesResponse {
    pub date: NaiveDate,
    pub buffer_minutes: u32,
    pub times: Vec<SlotStatus>,
}

// ── Quotes ──

#[derive(Debug, Deserialize)]
pub struct RecurringQuoteRequest {
    pub selection: DateSelection,
    pub duration_hours: f64,
    /// Defaults to the weekday count of a range selection, else 1.
    pub visits_per_week: Option<u32>,
    #[serde(default)]
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub with_materials: bool,
}

#[derive(Debug, Deserialize)]
pub struct InstantQuoteRequest {
    pub duration_minutes: u32,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
    #[serde(default = "one_visit")]
    pub visit_count: u32,
}

fn one_visit() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PackageQuoteRequest {
    pub package_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionQuoteRequest {
    pub plan_id: String,
    #[serde(default)]
    pub billing_cycle: BillingCycle,
    pub duration_hours: f64,
    #[serde(default)]
    pub with_materials: bool,
}

// ── Booking preview ──

#[derive(Debug, Deserialize)]
pub struct BookingPreviewRequest {
    pub selection: DateSelection,
    /// Visit start time, "HH:MM".
    pub time: String,
    #[serde(default)]
    pub unavailable: Vec<String>,
    #[serde(flatten)]
    pub draft: BookingDraft,
}

#[derive(Debug, Serialize)]
pub struct BookingPreviewResponse {
    /// False when no visit survived; the page keeps submit disabled.
    pub ready: bool,
    pub dates: Vec<NaiveDate>,
    pub rejected_dates: Vec<NaiveDate>,
    pub price: PriceBreakdown,
    pub entries: Vec<BookingEntry>,
}

// ── Envelope ──

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
