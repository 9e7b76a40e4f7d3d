use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;

use crate::core::{AppError, Result};
use crate::modules::stats::models::Granularity;
use crate::modules::stats::services::StatsService;

/// Query parameters for date-ranged stats endpoints
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// Start of the period (inclusive, format: YYYY-MM-DD)
    pub start_date: String,
    /// End of the period (inclusive, format: YYYY-MM-DD)
    pub end_date: String,
}

/// Query parameters for the revenue trend endpoint
#[derive(Debug, Deserialize)]
pub struct RevenueTrendQuery {
    pub start_date: String,
    pub end_date: String,
    /// Bucketing unit: daily, weekly or monthly
    #[serde(default = "default_granularity")]
    pub granularity: String,
}

fn default_granularity() -> String {
    "monthly".to_string()
}

/// Query parameters for the period comparison endpoint
#[derive(Debug, Deserialize)]
pub struct ComparePeriodsQuery {
    pub first_period_start: String,
    pub first_period_end: String,
    pub second_period_start: String,
    pub second_period_end: String,
}

/// Query parameters for the top performers endpoint
#[derive(Debug, Deserialize)]
pub struct TopStructuresQuery {
    /// Maximum entries to return; non-positive values fall back to 5
    #[serde(default = "default_top_limit")]
    pub limit: i64,
}

fn default_top_limit() -> i64 {
    5
}

/// GET /api/stats
///
/// Store-wide totals: transactions, revenue, structures, users.
pub async fn get_global_stats(stats: web::Data<StatsService>) -> Result<HttpResponse> {
    let result = stats.global_stats().await.inspect_err(|e| {
        error!("Failed to compute global stats: {}", e);
    })?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/by-date-range
///
/// Transaction count and revenue within an inclusive date range.
pub async fn get_stats_by_date_range(
    stats: web::Data<StatsService>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;

    let result = stats.stats_by_date_range(start, end).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/by-structure/{structure_id}
///
/// Lifetime stats for one structure; 404 when the id is unknown.
pub async fn get_stats_by_structure(
    stats: web::Data<StatsService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let structure_id = path.into_inner();
    let result = stats.stats_by_structure(structure_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/revenue-trend
///
/// Ordered revenue buckets over a date range at the requested granularity.
pub async fn get_revenue_trend(
    stats: web::Data<StatsService>,
    query: web::Query<RevenueTrendQuery>,
) -> Result<HttpResponse> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;
    let granularity: Granularity = query.granularity.parse()?;

    let result = stats.revenue_trend(start, end, granularity).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/compare-periods
///
/// Revenue and transaction deltas between two arbitrary date ranges.
pub async fn compare_periods(
    stats: web::Data<StatsService>,
    query: web::Query<ComparePeriodsQuery>,
) -> Result<HttpResponse> {
    let first_start = parse_date(&query.first_period_start, "first_period_start")?;
    let first_end = parse_date(&query.first_period_end, "first_period_end")?;
    let second_start = parse_date(&query.second_period_start, "second_period_start")?;
    let second_end = parse_date(&query.second_period_end, "second_period_end")?;

    let result = stats
        .compare_periods(first_start, first_end, second_start, second_end)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/top-structures
///
/// Structures ranked by lifetime revenue, zero-revenue tenants excluded.
pub async fn get_top_structures(
    stats: web::Data<StatsService>,
    query: web::Query<TopStructuresQuery>,
) -> Result<HttpResponse> {
    let result = stats.top_performing_structures(query.limit).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/stats/revenue-by-category
///
/// Revenue grouped by service category within a date range.
pub async fn get_revenue_by_category(
    stats: web::Data<StatsService>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;

    let result = stats.revenue_by_category(start, end).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/stats/clear-cache
///
/// Evicts all cached stats; the next queries recompute from the store.
pub async fn clear_stats_cache(stats: web::Data<StatsService>) -> HttpResponse {
    stats.clear_cache();
    HttpResponse::Ok().finish()
}

/// Register the stats routes under /api/stats
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/stats")
            .route("", web::get().to(get_global_stats))
            .route("/by-date-range", web::get().to(get_stats_by_date_range))
            .route(
                "/by-structure/{structure_id}",
                web::get().to(get_stats_by_structure),
            )
            .route("/revenue-trend", web::get().to(get_revenue_trend))
            .route("/compare-periods", web::get().to(compare_periods))
            .route("/top-structures", web::get().to(get_top_structures))
            .route(
                "/revenue-by-category",
                web::get().to(get_revenue_by_category),
            )
            .route("/clear-cache", web::post().to(clear_stats_cache)),
    );
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {}: '{}' (expected YYYY-MM-DD)",
            field, value
        ))
    })
}
