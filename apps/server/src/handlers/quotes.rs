use axum::{extract::State, Json};
use cleanbook_core::{
    catalog_price, package_price, recurring_price, resolve_dates, subscription_quote,
    DateSelection, PriceBreakdown, RecurringPriceInput, VisitTerms,
};
use std::sync::Arc;

use super::schedule::prepare_selection;
use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    models::{
        ApiResponse, InstantQuoteRequest, PackageQuoteRequest, RecurringQuoteRequest,
        SubscriptionQuoteRequest,
    },
    AppState,
};

/// Longest single visit that can be quoted.
const MAX_VISIT_HOURS: f64 = 12.0;
/// Most visits an instant quote may multiply.
const MAX_VISIT_COUNT: u32 = 366;

/// POST /api/quotes/recurring: scheduled recurring booking (multiplicative discounts).
pub async fn recurring(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RecurringQuoteRequest>,
) -> ApiResult<PriceBreakdown> {
    validate_hours(body.duration_hours)?;

    let selection = prepare_selection(body.selection)?;
    let visits_per_week = visits_per_week(&selection, body.visits_per_week);
    let dates = resolve_dates(&selection);

    let quote = recurring_price(&RecurringPriceInput {
        hourly_rate: state.config.hourly_rate,
        duration_hours: body.duration_hours,
        materials_fee: materials_fee(&state.config, body.with_materials),
        visits_per_week,
        visit_count: dates.len() as u32,
        cycle_discount: body.billing_cycle.discount(),
    });

    Ok(Json(ApiResponse::success(quote)))
}

/// POST /api/quotes/instant: catalog duration tier plus add-ons.
pub async fn instant(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<InstantQuoteRequest>,
) -> ApiResult<PriceBreakdown> {
    if body.visit_count > MAX_VISIT_COUNT {
        return Err(ApiError::BadRequest(format!(
            "At most {} visits per quote",
            MAX_VISIT_COUNT
        )));
    }
    let add_ons = state.catalog.add_ons(&body.add_on_ids)?;

    let quote = catalog_price(
        &state.catalog.durations,
        body.duration_minutes,
        &add_ons,
        body.visit_count,
    );

    Ok(Json(ApiResponse::success(quote)))
}

/// POST /api/quotes/package: multi-visit package with tier discount.
pub async fn package(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PackageQuoteRequest>,
) -> ApiResult<PriceBreakdown> {
    let package = state.catalog.package(&body.package_id)?;
    Ok(Json(ApiResponse::success(package_price(
        package.base_price,
        package.visits,
    ))))
}

/// POST /api/quotes/subscription: one billing cycle of a plan.
pub async fn subscription(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SubscriptionQuoteRequest>,
) -> ApiResult<PriceBreakdown> {
    validate_hours(body.duration_hours)?;
    let plan = state.catalog.plan(&body.plan_id)?;

    let terms = VisitTerms {
        hourly_rate: state.config.hourly_rate,
        duration_hours: body.duration_hours,
        materials_fee: materials_fee(&state.config, body.with_materials),
    };
    let quote = subscription_quote(plan, body.billing_cycle, &terms);

    tracing::debug!(
        plan = %plan.id,
        cycle = ?body.billing_cycle,
        total = quote.total_price,
        "subscription quote"
    );
    Ok(Json(ApiResponse::success(quote)))
}

// ── Helpers ──

/// Explicit frequency wins; a weekday range visits once per selected day.
fn visits_per_week(selection: &DateSelection, explicit: Option<u32>) -> u32 {
    explicit.unwrap_or(match selection {
        DateSelection::RangeWithWeekdayMask { weekdays, .. } => weekdays.len(),
        _ => 1,
    })
}

fn materials_fee(config: &Config, with_materials: bool) -> f64 {
    if with_materials {
        config.materials_fee
    } else {
        0.0
    }
}

fn validate_hours(hours: f64) -> Result<(), ApiError> {
    if hours.is_finite() && hours > 0.0 && hours <= MAX_VISIT_HOURS {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Duration must be between 0 and {} hours",
            MAX_VISIT_HOURS
        )))
    }
}
