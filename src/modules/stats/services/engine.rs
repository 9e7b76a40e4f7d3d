use std::sync::Arc;

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::stats::models::{
    CategoryRevenue, DateRangeStats, GlobalStats, Granularity, PeriodComparison,
    StructurePerformance, StructureStats, TrendPoint,
};
use crate::modules::structures::repositories::StructureRepository;
use crate::modules::transactions::repositories::TransactionStatsRepository;
use crate::modules::users::repositories::UserRepository;

/// Default ranking size when the caller passes a non-positive limit
const DEFAULT_TOP_LIMIT: usize = 5;

/// Stateless aggregation over the transaction/structure/user accessors
///
/// Every operation is a pure function of its inputs and the current
/// store state. Validation happens before any accessor call; accessor
/// failures propagate unchanged. Each accessor call observes an
/// independent snapshot of the store, so read skew across the calls of
/// one aggregate is possible and accepted.
pub struct StatsEngine {
    transactions: Arc<dyn TransactionStatsRepository>,
    structures: Arc<dyn StructureRepository>,
    users: Arc<dyn UserRepository>,
}

impl StatsEngine {
    pub fn new(
        transactions: Arc<dyn TransactionStatsRepository>,
        structures: Arc<dyn StructureRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            transactions,
            structures,
            users,
        }
    }

    /// Store-wide headline numbers; an empty store yields zeros
    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let total_transactions = self.transactions.total_count().await?;
        let total_revenue = self.transactions.total_revenue().await?;
        let total_structures = self.structures.count().await?;
        let total_users = self.users.count().await?;

        Ok(GlobalStats {
            total_transactions,
            total_revenue: round_money(total_revenue),
            total_structures,
            total_users,
        })
    }

    /// Transaction count and revenue within [start, end] inclusive
    pub async fn stats_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DateRangeStats> {
        validate_range(start, end)?;

        let transactions_in_period = self.transactions.count_in_range(start, end).await?;
        let revenue_in_period = self.transactions.revenue_in_range(start, end).await?;

        Ok(DateRangeStats {
            start_date: start,
            end_date: end,
            transactions_in_period,
            revenue_in_period: round_money(revenue_in_period),
        })
    }

    /// Lifetime stats for one structure; unknown ids are a not-found error
    pub async fn stats_by_structure(&self, structure_id: i64) -> Result<StructureStats> {
        let structure = self
            .structures
            .find_by_id(structure_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Structure not found with id {}", structure_id))
            })?;

        let total_transactions = self.transactions.count_by_structure(structure_id).await?;
        let total_revenue = self.transactions.revenue_by_structure(structure_id).await?;

        Ok(StructureStats {
            structure_id,
            structure_name: structure.name,
            total_transactions,
            total_revenue: round_money(total_revenue),
        })
    }

    /// Revenue bucketed over [start, end] at the requested granularity
    ///
    /// One ranged-sum query per bucket, so the cost is O(buckets) rather
    /// than O(transactions). Daily buckets with zero revenue are omitted;
    /// weekly and monthly buckets are always emitted. The asymmetry is
    /// long-standing dashboard behavior, kept until product says otherwise.
    pub async fn revenue_trend(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> Result<Vec<TrendPoint>> {
        validate_range(start, end)?;

        info!(
            "Computing revenue trend: start={}, end={}, granularity={}",
            start, end, granularity
        );

        let mut points = Vec::new();

        match granularity {
            Granularity::Daily => {
                let mut current = start;
                while current <= end {
                    let revenue = self.transactions.revenue_in_range(current, current).await?;
                    if revenue > Decimal::ZERO {
                        points.push(TrendPoint {
                            period: current.to_string(),
                            revenue: round_money(revenue),
                        });
                    }
                    current = current + Duration::days(1);
                }
            }
            Granularity::Weekly => {
                // 7-day buckets anchored at the range start, last one truncated
                let mut current = start;
                while current <= end {
                    let week_end = (current + Duration::days(6)).min(end);
                    let revenue = self.transactions.revenue_in_range(current, week_end).await?;
                    points.push(TrendPoint {
                        period: format!("Week of {}", current),
                        revenue: round_money(revenue),
                    });
                    current = current + Duration::days(7);
                }
            }
            Granularity::Monthly => {
                // Calendar-month buckets; the first starts at the range
                // start so days before it are never counted, the last is
                // truncated to the range end.
                let mut current = start;
                while current <= end {
                    let month_end = end_of_month(current);
                    let bucket_end = month_end.min(end);
                    let revenue = self
                        .transactions
                        .revenue_in_range(current, bucket_end)
                        .await?;
                    points.push(TrendPoint {
                        period: current.format("%B %Y").to_string(),
                        revenue: round_money(revenue),
                    });
                    current = month_end + Duration::days(1);
                }
            }
        }

        Ok(points)
    }

    /// Percentage delta of revenue and count between two date ranges
    pub async fn compare_periods(
        &self,
        first_start: NaiveDate,
        first_end: NaiveDate,
        second_start: NaiveDate,
        second_end: NaiveDate,
    ) -> Result<PeriodComparison> {
        // Both ranges are checked before any data access
        validate_range(first_start, first_end)?;
        validate_range(second_start, second_end)?;

        let first_period = self.stats_by_date_range(first_start, first_end).await?;
        let second_period = self.stats_by_date_range(second_start, second_end).await?;

        let revenue_change_pct = percentage_change(
            first_period.revenue_in_period,
            second_period.revenue_in_period,
        );
        let transaction_change_pct = percentage_change(
            Decimal::from(first_period.transactions_in_period),
            Decimal::from(second_period.transactions_in_period),
        );

        Ok(PeriodComparison {
            first_period,
            second_period,
            revenue_change_pct,
            transaction_change_pct,
        })
    }

    /// Structures ranked by lifetime revenue, descending
    ///
    /// Zero-revenue structures are dropped from the ranking; ties keep
    /// ascending id order (the sort is stable over `find_all`'s ordering).
    /// A non-positive limit falls back to the default of 5.
    pub async fn top_performing_structures(
        &self,
        limit: i64,
    ) -> Result<Vec<StructurePerformance>> {
        let limit = if limit > 0 {
            limit as usize
        } else {
            DEFAULT_TOP_LIMIT
        };

        let structures = self.structures.find_all().await?;
        let mut ranking = Vec::with_capacity(structures.len());

        for structure in structures {
            let revenue = self.transactions.revenue_by_structure(structure.id).await?;
            if revenue <= Decimal::ZERO {
                continue;
            }
            let transaction_count = self.transactions.count_by_structure(structure.id).await?;
            ranking.push(StructurePerformance {
                id: structure.id,
                name: structure.name,
                revenue: round_money(revenue),
                transaction_count,
            });
        }

        ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        ranking.truncate(limit);

        Ok(ranking)
    }

    /// Revenue grouped by service category within [start, end]
    ///
    /// Categories without revenue in the range are omitted.
    pub async fn revenue_by_category(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CategoryRevenue> {
        validate_range(start, end)?;

        let categories = self.transactions.categories_in_range(start, end).await?;
        let mut breakdown = CategoryRevenue::new();

        for category in categories {
            let revenue = self
                .transactions
                .revenue_by_category_in_range(&category, start, end)
                .await?;
            if revenue > Decimal::ZERO {
                breakdown.insert(category, round_money(revenue));
            }
        }

        Ok(breakdown)
    }
}

/// Reject inverted ranges before any accessor is touched
fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(AppError::validation(format!(
            "start_date ({}) must be before or equal to end_date ({})",
            start, end
        )));
    }
    Ok(())
}

/// HALF_UP rounding to 2 fractional digits, applied at output only
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Percentage change between two values, rounded to 2 digits
///
/// Fixed convention for a zero baseline: 0 -> 0 is 0%, 0 -> x is 100%.
fn percentage_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        if new.is_zero() {
            return Decimal::ZERO;
        }
        return Decimal::ONE_HUNDRED;
    }
    round_money((new - old) / old.abs() * Decimal::ONE_HUNDRED)
}

/// Last calendar day of the month containing `date`
fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_month = date
        .with_day(1)
        .expect("day 1 is valid for every month");
    first_of_month + Months::new(1) - Duration::days(1)
}
