use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::AppError;

/// Bucketing unit for revenue trend aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(AppError::validation(format!(
                "Granularity must be 'daily', 'weekly' or 'monthly', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

/// Store-wide headline numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_transactions: i64,
    pub total_revenue: Decimal,
    pub total_structures: i64,
    pub total_users: i64,
}

/// Transaction activity within one inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transactions_in_period: i64,
    pub revenue_in_period: Decimal,
}

/// Lifetime activity of a single structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureStats {
    pub structure_id: i64,
    pub structure_name: String,
    pub total_transactions: i64,
    pub total_revenue: Decimal,
}

/// One bucket of a revenue trend, labeled by its period
///
/// Points are emitted in chronological order; the label format depends
/// on the granularity (ISO date, "Week of <date>", "<Month> <Year>").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub revenue: Decimal,
}

/// Period-over-period comparison of two date ranges
///
/// Percentage changes follow a fixed convention: 0 -> 0 is 0%, 0 -> x
/// is 100%. Not mathematically general, but stable for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub first_period: DateRangeStats,
    pub second_period: DateRangeStats,
    pub revenue_change_pct: Decimal,
    pub transaction_change_pct: Decimal,
}

/// One entry of the top-performer ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructurePerformance {
    pub id: i64,
    pub name: String,
    pub revenue: Decimal,
    pub transaction_count: i64,
}

/// Revenue grouped by service category over a date range
pub type CategoryRevenue = BTreeMap<String, Decimal>;

/// Cacheable stats result, stored in the process-wide result cache
///
/// Only the three low-cardinality queries are cached; trend, comparison,
/// ranking and category breakdowns are recomputed per call.
#[derive(Debug, Clone)]
pub enum StatsSnapshot {
    Global(GlobalStats),
    DateRange(DateRangeStats),
    Structure(StructureStats),
}
