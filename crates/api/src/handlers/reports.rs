//! Handlers for the `/reports` resource. Admin only, read-only.
//!
//! Range reports validate their dates before touching the database. Totals
//! cover the whole filtered range; only the detail rows are paged.

use axum::extract::State;
use parkhub_core::error::CoreError;
use parkhub_core::pagination::{PageRequest, Pagination};
use parkhub_core::reports::{
    self, DailyRevenueReport, DateRange, EnteredSummary, OutgoingSummary, UtilizationReport,
};
use parkhub_core::types::{DbId, Timestamp};
use parkhub_db::models::report::{EnteredCar, OutgoingCar, ReportFilter};
use parkhub_db::repositories::ReportRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub parking_id: Option<DbId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RangeParams {
    fn filter(&self) -> Result<ReportFilter, CoreError> {
        let (Some(start), Some(end)) = (self.start_date.as_deref(), self.end_date.as_deref())
        else {
            return Err(CoreError::Validation(
                "Start date and end date are required".into(),
            ));
        };
        Ok(ReportFilter {
            range: DateRange::parse(start, end)?,
            parking_id: self.parking_id,
        })
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DayParams {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingReport {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(flatten)]
    pub summary: OutgoingSummary,
    pub cars: Vec<OutgoingCar>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnteredReport {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(flatten)]
    pub summary: EnteredSummary,
    pub cars: Vec<EnteredCar>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(flatten)]
    pub revenue: DailyRevenueReport,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/reports/outgoing-cars
pub async fn outgoing_cars(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<RangeParams>,
) -> AppResult<ApiResponse<OutgoingReport>> {
    let filter = params.filter()?;
    let page = params.page();

    let charges = ReportRepo::charges(&state.pool, &filter).await?;
    let summary = reports::summarize_outgoing(&charges);
    let cars = ReportRepo::outgoing_cars(&state.pool, &filter, page).await?;
    let pagination = Pagination::new(page, summary.total_cars, cars.len());

    tracing::info!(
        start = %filter.range.start,
        end = %filter.range.end,
        parking_id = ?filter.parking_id,
        total_cars = summary.total_cars,
        "Outgoing cars report generated"
    );

    let report = OutgoingReport {
        start_date: filter.range.start,
        end_date: filter.range.end,
        summary,
        cars,
    };
    Ok(ApiResponse::ok("Outgoing cars report generated successfully", report)
        .with_pagination(pagination))
}

/// GET /api/reports/entered-cars
pub async fn entered_cars(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<RangeParams>,
) -> AppResult<ApiResponse<EnteredReport>> {
    let filter = params.filter()?;
    let page = params.page();

    let stats = ReportRepo::entry_stats(&state.pool, &filter).await?;
    let summary = reports::summarize_entered(&stats);
    let cars = ReportRepo::entered_cars(&state.pool, &filter, page).await?;
    let pagination = Pagination::new(page, summary.total_cars, cars.len());

    tracing::info!(
        start = %filter.range.start,
        end = %filter.range.end,
        parking_id = ?filter.parking_id,
        total_cars = summary.total_cars,
        "Entered cars report generated"
    );

    let report = EnteredReport {
        start_date: filter.range.start,
        end_date: filter.range.end,
        summary,
        cars,
    };
    Ok(ApiResponse::ok("Entered cars report generated successfully", report)
        .with_pagination(pagination))
}

/// GET /api/reports/daily-revenue
pub async fn daily_revenue(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<RangeParams>,
) -> AppResult<ApiResponse<RevenueReport>> {
    let filter = params.filter()?;

    let charges = ReportRepo::charges(&state.pool, &filter).await?;
    let revenue = reports::daily_revenue(&charges);

    tracing::info!(
        start = %filter.range.start,
        end = %filter.range.end,
        total_revenue = revenue.total_revenue,
        "Daily revenue report generated"
    );

    Ok(ApiResponse::ok(
        "Daily revenue report generated successfully",
        RevenueReport {
            start_date: filter.range.start,
            end_date: filter.range.end,
            revenue,
        },
    ))
}

/// GET /api/reports/parking-utilization
pub async fn parking_utilization(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<DayParams>,
) -> AppResult<ApiResponse<UtilizationReport>> {
    let raw = params
        .date
        .as_deref()
        .ok_or_else(|| CoreError::Validation("Date is required".into()))?;
    let date = reports::parse_report_day(raw)?;

    let records = ReportRepo::occupancy(&state.pool, date).await?;
    let report = reports::utilization_report(date, records);

    tracing::info!(
        %date,
        total_parkings = report.total_parkings,
        average_utilization = report.average_utilization,
        "Parking utilization report generated"
    );

    Ok(ApiResponse::ok(
        "Parking utilization report generated successfully",
        report,
    ))
}
