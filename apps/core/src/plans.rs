use serde::{Deserialize, Serialize};

use crate::pricing::{recurring_price, BillingCycle, PriceBreakdown, RecurringPriceInput};

/// Weeks counted per month when turning a plan into a weekly frequency.
const WEEKS_PER_MONTH: u32 = 4;

/// Subscription plan as published by the plan catalog.
///
/// `max_rollover_visits` is carried for display and for the backend that
/// tracks unused visits; pricing does not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub visits_per_month: u32,
    /// Published list price; [`subscription_quote`] prices from visit terms
    /// and never reads it.
    pub monthly_price: f64,
    pub max_rollover_visits: u32,
    /// Percentage off for longer billing cycles (5.0 = 5%).
    #[serde(default)]
    pub discount_percentage: f64,
}

impl SubscriptionPlan {
    pub fn visits_per_week(&self) -> u32 {
        self.visits_per_month / WEEKS_PER_MONTH
    }

    pub fn visits_per_cycle(&self, cycle: BillingCycle) -> u32 {
        self.visits_per_month * cycle.months()
    }

    /// Billing-cycle discount: none monthly, the plan's own percentage when
    /// billed quarterly, falling back to the standard quarterly rate.
    pub fn cycle_discount(&self, cycle: BillingCycle) -> f64 {
        match cycle {
            BillingCycle::Monthly => 0.0,
            BillingCycle::Quarterly if self.discount_percentage > 0.0 => {
                (self.discount_percentage / 100.0).min(1.0)
            }
            BillingCycle::Quarterly => cycle.discount(),
        }
    }
}

/// Inputs the checkout page collects on top of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisitTerms {
    pub hourly_rate: f64,
    pub duration_hours: f64,
    #[serde(default)]
    pub materials_fee: f64,
}

/// Price a subscription for one billing cycle.
pub fn subscription_quote(
    plan: &SubscriptionPlan,
    cycle: BillingCycle,
    terms: &VisitTerms,
) -> PriceBreakdown {
    recurring_price(&RecurringPriceInput {
        hourly_rate: terms.hourly_rate,
        duration_hours: terms.duration_hours,
        materials_fee: terms.materials_fee,
        visits_per_week: plan.visits_per_week(),
        visit_count: plan.visits_per_cycle(cycle),
        cycle_discount: plan.cycle_discount(cycle),
    })
}
