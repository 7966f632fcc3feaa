use axum::{extract::State, Json};
use cleanbook_core::{
    normalize_range, parse_calendar_day, resolve_dates, slot_board, time_grid, DateSelection,
};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    models::{ApiResponse, AvailableTimesQuery, AvailableTimesResponse, ResolvedDatesResponse},
    AppState,
};

/// Longest range a single request may enumerate.
pub const MAX_RANGE_DAYS: i64 = 366;
/// Most explicit dates a single request may carry.
pub const MAX_SPECIFIC_DATES: usize = 366;

/// POST /api/schedule/dates: resolve a date selection into visit dates.
pub async fn resolve(
    ApiJson(selection): ApiJson<DateSelection>,
) -> ApiResult<ResolvedDatesResponse> {
    let selection = prepare_selection(selection)?;
    let dates = resolve_dates(&selection);

    Ok(Json(ApiResponse::success(ResolvedDatesResponse {
        mode: selection.mode(),
        visit_count: dates.len(),
        dates,
    })))
}

/// GET /api/available-times?date=YYYY-MM-DD&unavailable=HH:MM,HH:MM: slot board.
pub async fn available_times(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<AvailableTimesQuery>,
) -> ApiResult<AvailableTimesResponse> {
    let date = parse_calendar_day(&query.date)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date: {}", query.date)))?;
    let unavailable = split_slot_list(query.unavailable.as_deref());

    let config = &state.config;
    let grid = time_grid(
        config.opening_time,
        config.closing_time,
        config.slot_step_minutes,
    );
    let times = slot_board(
        date,
        &grid,
        &unavailable,
        config.slot_buffer,
        config.local_now(),
    );

    Ok(Json(ApiResponse::success(AvailableTimesResponse {
        date,
        buffer_minutes: config.slot_buffer.minutes(),
        times,
    })))
}

// ── Shared helpers (pub for quotes/booking) ──

/// Swap a backwards-dragged range and reject selections too large to
/// enumerate per request.
pub fn prepare_selection(selection: DateSelection) -> Result<DateSelection, ApiError> {
    match selection {
        DateSelection::RangeWithWeekdayMask {
            start: Some(a),
            end: Some(b),
            weekdays,
        } => {
            let (start, end) = normalize_range(a, b);
            if end.signed_duration_since(start).num_days() > MAX_RANGE_DAYS {
                return Err(ApiError::BadRequest(format!(
                    "Date range longer than {} days",
                    MAX_RANGE_DAYS
                )));
            }
            Ok(DateSelection::RangeWithWeekdayMask {
                start: Some(start),
                end: Some(end),
                weekdays,
            })
        }
        DateSelection::SpecificDates { dates } if dates.len() > MAX_SPECIFIC_DATES => {
            Err(ApiError::BadRequest(format!(
                "More than {} dates selected",
                MAX_SPECIFIC_DATES
            )))
        }
        other => Ok(other),
    }
}

/// Split "09:00, 14:30" into trimmed, non-empty labels.
pub fn split_slot_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

// ── Tests ──
