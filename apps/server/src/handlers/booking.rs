use axum::{extract::State, Json};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use cleanbook_core::{
    build_booking_entries, catalog_price, is_slot_available, parse_time, resolve_dates, AddOn,
    BookingDraft, DateSelection, DurationCatalog, SlotBuffer,
};
use std::sync::Arc;

use super::schedule::prepare_selection;
use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    models::{ApiResponse, BookingPreviewRequest, BookingPreviewResponse},
    AppState,
};

/// Clock and pricing inputs for a preview.
pub struct PreviewContext<'a> {
    pub durations: &'a DurationCatalog,
    pub buffer: SlotBuffer,
    pub now: NaiveDateTime,
    pub offset: FixedOffset,
}

/// POST /api/bookings/preview: resolve dates, gate the chosen time, price
/// the surviving visits and build the submission entries.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<BookingPreviewRequest>,
) -> ApiResult<BookingPreviewResponse> {
    let time = parse_time(&body.time)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid time: {}", body.time)))?;
    state.catalog.service(&body.draft.service_id)?;
    let add_ons = state.catalog.add_ons(&body.draft.add_on_ids)?;
    let selection = prepare_selection(body.selection)?;

    let ctx = PreviewContext {
        durations: &state.catalog.durations,
        buffer: state.config.slot_buffer,
        now: state.config.local_now(),
        offset: state.config.utc_offset,
    };
    let preview = build_preview(&selection, time, &body.unavailable, &body.draft, &add_ons, &ctx);

    tracing::info!(
        service = %body.draft.service_id,
        visits = preview.dates.len(),
        rejected = preview.rejected_dates.len(),
        total = preview.price.total_price,
        "booking preview"
    );
    Ok(Json(ApiResponse::success(preview)))
}

/// Pure core of the preview: dates that fail the slot gate are reported but
/// neither priced nor turned into entries.
pub fn build_preview(
    selection: &DateSelection,
    time: NaiveTime,
    unavailable: &[String],
    draft: &BookingDraft,
    add_ons: &[AddOn],
    ctx: &PreviewContext<'_>,
) -> BookingPreviewResponse {
    let (dates, rejected_dates): (Vec<NaiveDate>, Vec<NaiveDate>) = resolve_dates(selection)
        .into_iter()
        .partition(|date| {
            is_slot_available(Some(date.and_time(time)), unavailable, ctx.buffer, ctx.now)
        });

    let price = catalog_price(
        ctx.durations,
        draft.duration_minutes,
        add_ons,
        dates.len() as u32,
    );

    // Entries carry the duration actually priced
    let priced_draft = BookingDraft {
        duration_minutes: ctx.durations.lookup(draft.duration_minutes).minutes,
        ..draft.clone()
    };
    let entries = build_booking_entries(&dates, time, ctx.offset, &priced_draft);

    BookingPreviewResponse {
        ready: !entries.is_empty(),
        dates,
        rejected_dates,
        price,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use cleanbook_core::{PaymentMethod, WeekdayMask};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn draft(minutes: u32) -> BookingDraft {
        BookingDraft {
            service_id: "home-cleaning".into(),
            duration_minutes: minutes,
            add_on_ids: vec![],
            address_id: "addr-7".into(),
            payment_method: PaymentMethod::Card,
        }
    }

    fn ctx(catalog: &Catalog) -> PreviewContext<'_> {
        PreviewContext {
            durations: &catalog.durations,
            buffer: SlotBuffer::STANDARD,
            // Monday 2024-01-01 10:00
            now: date(2024, 1, 1).and_time(time(10, 0)),
            offset: FixedOffset::east_opt(4 * 3600).unwrap(),
        }
    }

    fn mon_wed() -> DateSelection {
        DateSelection::RangeWithWeekdayMask {
            start: Some(date(2024, 1, 1)),
            end: Some(date(2024, 1, 14)),
            weekdays: WeekdayMask::from_indices([1, 3]),
        }
    }

    #[test]
    fn test_today_inside_buffer_rejected() {
        let catalog = Catalog::standard(35.0);
        let p = build_preview(&mon_wed(), time(10, 30), &[], &draft(120), &[], &ctx(&catalog));

        assert_eq!(p.rejected_dates, vec![date(2024, 1, 1)]);
        assert_eq!(p.dates, vec![date(2024, 1, 3), date(2024, 1, 8), date(2024, 1, 10)]);
        assert_eq!(p.price.visit_count, 3);
        assert_eq!(p.price.total_price, 179.0 * 3.0);
        assert_eq!(p.entries.len(), 3);
        assert!(p.ready);
    }

    #[test]
    fn test_today_after_buffer_accepted() {
        let catalog = Catalog::standard(35.0);
        let p = build_preview(&mon_wed(), time(11, 0), &[], &draft(120), &[], &ctx(&catalog));
        assert!(p.rejected_dates.is_empty());
        assert_eq!(p.dates.len(), 4);
    }

    #[test]
    fn test_unavailable_time_rejects_all() {
        let catalog = Catalog::standard(35.0);
        let unavailable = vec!["14:00".to_string()];
        let p = build_preview(
            &mon_wed(),
            time(14, 0),
            &unavailable,
            &draft(120),
            &[],
            &ctx(&catalog),
        );
        assert!(p.dates.is_empty());
        assert_eq!(p.rejected_dates.len(), 4);
        assert_eq!(p.price.total_price, 0.0);
        assert!(!p.ready);
    }

    #[test]
    fn test_entries_use_priced_duration_and_offset() {
        let catalog = Catalog::standard(35.0);
        let sel = DateSelection::Single {
            date: Some(date(2024, 1, 2)),
        };
        let add_ons = catalog.add_ons(&["ironing".to_string()]).unwrap();
        let p = build_preview(&sel, time(9, 0), &[], &draft(75), &add_ons, &ctx(&catalog));

        assert_eq!(p.entries[0].duration_minutes, 90);
        assert_eq!(p.entries[0].scheduled_at.to_rfc3339(), "2024-01-02T09:00:00+04:00");
        assert_eq!(p.price.total_price, 139.0 + 35.0);
    }

    #[test]
    fn test_incomplete_selection_not_ready() {
        let catalog = Catalog::standard(35.0);
        let sel = DateSelection::Single { date: None };
        let p = build_preview(&sel, time(9, 0), &[], &draft(90), &[], &ctx(&catalog));
        assert!(!p.ready);
        assert_eq!(p.price.visit_count, 0);
    }
}
