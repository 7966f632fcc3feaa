//! Visit pricing.
//!
//! Three independent strategies, one per booking flow:
//!
//! - [`recurring_price`]: recurring scheduled bookings and subscriptions.
//!   Duration, frequency and billing-cycle discounts multiply together.
//! - [`catalog_price`]: instant and scheduled bookings priced from a fixed
//!   duration catalog plus per-visit add-ons.
//! - [`package_price`]: multi-visit packages with one tier discount applied
//!   to the whole package.
//!
//! The strategies give different numbers for nominally equal discounts and
//! are kept apart on purpose. Nothing here rounds; formatting is left to the
//! presentation layer.

use serde::{Deserialize, Serialize};

// ── Discount tiers ──

/// Visits of at least this many hours get [`LONG_VISIT_DISCOUNT`].
pub const LONG_VISIT_HOURS: f64 = 2.0;
pub const LONG_VISIT_DISCOUNT: f64 = 0.05;

/// Quarterly billing discount when a plan does not carry its own.
pub const QUARTERLY_DISCOUNT: f64 = 0.05;

/// Package tiers as (minimum visits, discount), highest first.
pub const PACKAGE_TIERS: [(u32, f64); 4] = [(12, 0.25), (6, 0.20), (4, 0.15), (2, 0.10)];

pub fn duration_discount(duration_hours: f64) -> f64 {
    if duration_hours >= LONG_VISIT_HOURS {
        LONG_VISIT_DISCOUNT
    } else {
        0.0
    }
}

pub fn frequency_discount(visits_per_week: u32) -> f64 {
    match visits_per_week {
        n if n >= 3 => 0.10,
        2 => 0.05,
        _ => 0.0,
    }
}

/// Discount for a package of `visits`: the largest tier not above it.
pub fn package_discount(visits: u32) -> f64 {
    PACKAGE_TIERS
        .iter()
        .find(|(min_visits, _)| visits >= *min_visits)
        .map_or(0.0, |(_, discount)| *discount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Quarterly,
}

impl BillingCycle {
    pub fn months(self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Quarterly => 3,
        }
    }

    /// Standard cycle discount: quarterly billing is 5% off.
    pub fn discount(self) -> f64 {
        match self {
            BillingCycle::Monthly => 0.0,
            BillingCycle::Quarterly => QUARTERLY_DISCOUNT,
        }
    }
}

// ── Catalog ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationOption {
    pub minutes: u32,
    pub base_price: f64,
    pub original_price: f64,
    #[serde(default)]
    pub recommended: bool,
}

/// Duration tiers with an explicit fallback entry.
///
/// Lookups of an unlisted duration degrade to the default option, so a price
/// is always defined.
#[derive(Debug, Clone, Serialize)]
pub struct DurationCatalog {
    options: Vec<DurationOption>,
    default_minutes: u32,
}

impl DurationCatalog {
    /// Build a catalog; `default` replaces any listed option with the same
    /// minutes. Options are kept sorted by duration.
    pub fn new(options: Vec<DurationOption>, default: DurationOption) -> Self {
        let default_minutes = default.minutes;
        let mut options: Vec<DurationOption> = options
            .into_iter()
            .filter(|o| o.minutes != default_minutes)
            .collect();
        options.push(default);
        options.sort_by_key(|o| o.minutes);
        Self {
            options,
            default_minutes,
        }
    }

    pub fn options(&self) -> &[DurationOption] {
        &self.options
    }

    pub fn default_option(&self) -> &DurationOption {
        self.find(self.default_minutes)
            .unwrap_or(&self.options[0])
    }

    pub fn find(&self, minutes: u32) -> Option<&DurationOption> {
        self.options.iter().find(|o| o.minutes == minutes)
    }

    pub fn lookup(&self, minutes: u32) -> &DurationOption {
        match self.find(minutes) {
            Some(option) => option,
            None => {
                tracing::debug!(
                    minutes,
                    fallback = self.default_minutes,
                    "unknown duration, using default tier"
                );
                self.default_option()
            }
        }
    }

    pub fn recommended(&self) -> Option<&DurationOption> {
        self.options.iter().find(|o| o.recommended)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: f64,
}

// ── Result ──

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceBreakdown {
    pub price_per_visit: f64,
    /// Add-on charge included in each visit (catalog pricing only).
    pub add_ons_per_visit: f64,
    pub total_original: f64,
    pub total_price: f64,
    pub savings: f64,
    pub visit_count: u32,
}

// ── Strategy A: recurring / subscription ──

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringPriceInput {
    pub hourly_rate: f64,
    pub duration_hours: f64,
    #[serde(default)]
    pub materials_fee: f64,
    pub visits_per_week: u32,
    pub visit_count: u32,
    /// Cycle discount as a fraction, e.g. `BillingCycle::discount()`.
    #[serde(default)]
    pub cycle_discount: f64,
}

pub fn recurring_price(input: &RecurringPriceInput) -> PriceBreakdown {
    let raw = input.hourly_rate * input.duration_hours + input.materials_fee;
    let price_per_visit = raw
        * (1.0 - duration_discount(input.duration_hours))
        * (1.0 - frequency_discount(input.visits_per_week));
    let visits = f64::from(input.visit_count);
    let cycle_discount = input.cycle_discount.clamp(0.0, 1.0);

    let total_price = price_per_visit * visits * (1.0 - cycle_discount);
    let total_original = raw * visits;

    PriceBreakdown {
        price_per_visit,
        add_ons_per_visit: 0.0,
        total_original,
        total_price,
        savings: total_original - total_price,
        visit_count: input.visit_count,
    }
}

// ── Strategy B: catalog ──

pub fn catalog_price(
    catalog: &DurationCatalog,
    duration_minutes: u32,
    add_ons: &[AddOn],
    visit_count: u32,
) -> PriceBreakdown {
    let option = catalog.lookup(duration_minutes);
    let add_ons_total: f64 = add_ons.iter().map(|a| a.price).sum();
    let visits = f64::from(visit_count);

    // A catalog original below the sale price would report negative savings
    let original = option.original_price.max(option.base_price);

    let total_price = (option.base_price + add_ons_total) * visits;
    let total_original = (original + add_ons_total) * visits;

    PriceBreakdown {
        price_per_visit: option.base_price,
        add_ons_per_visit: add_ons_total,
        total_original,
        total_price,
        savings: total_original - total_price,
        visit_count,
    }
}

// ── Strategy C: package ──

pub fn package_price(base_price: f64, visits: u32) -> PriceBreakdown {
    let discount = package_discount(visits);
    let total_original = base_price * f64::from(visits);
    let savings = total_original * discount;
    let total_price = total_original * (1.0 - discount);

    PriceBreakdown {
        price_per_visit: if visits == 0 {
            0.0
        } else {
            total_price / f64::from(visits)
        },
        add_ons_per_visit: 0.0,
        total_original,
        total_price,
        savings,
        visit_count: visits,
    }
}

// ── Tests ──
