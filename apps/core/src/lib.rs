//! Visit scheduling and pricing for cleaning bookings.
//!
//! Everything here is synchronous and pure: callers pass the current
//! selection (and the current local time where it matters) and get values
//! back. Calendar logic works on `chrono::NaiveDate`/`NaiveDateTime` in the
//! caller's local zone.

pub mod booking;
pub mod dates;
pub mod plans;
pub mod pricing;
pub mod slots;

pub use booking::{build_booking_entries, BookingDraft, BookingEntry, PaymentMethod};
pub use dates::{
    normalize_range, parse_calendar_day, resolve_dates, DateSelection, SchedulingMode,
    WeekdayMask,
};
pub use plans::{subscription_quote, SubscriptionPlan, VisitTerms};
pub use pricing::{
    catalog_price, package_price, recurring_price, AddOn, BillingCycle, DurationCatalog,
    DurationOption, PriceBreakdown, RecurringPriceInput,
};
pub use slots::{
    is_slot_available, parse_time, slot_board, slot_label, time_grid, SlotBuffer, SlotStatus,
};
