use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::Result;
use crate::modules::stats::models::{
    CategoryRevenue, DateRangeStats, GlobalStats, Granularity, PeriodComparison, StatsSnapshot,
    StructurePerformance, StructureStats, TrendPoint,
};
use crate::modules::stats::services::cache::{cache_key, StatsCache};
use crate::modules::stats::services::engine::StatsEngine;

/// Reporting façade combining the aggregation engine and the result cache
///
/// The three low-cardinality queries (global, date range, per structure)
/// are memoized; trend, comparison, ranking and category breakdowns hit
/// the engine directly since their parameter space is effectively
/// unbounded. Validation failures surface before the cache is consulted,
/// so an inverted range never produces a cache entry.
pub struct StatsService {
    engine: StatsEngine,
    cache: Arc<StatsCache>,
}

impl StatsService {
    pub fn new(engine: StatsEngine, cache: Arc<StatsCache>) -> Self {
        Self { engine, cache }
    }

    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let key = cache_key::global_stats();
        if let Some(StatsSnapshot::Global(stats)) = self.cache.get(&key) {
            debug!("Stats cache hit: {}", key);
            return Ok(stats);
        }

        let stats = self.engine.global_stats().await?;
        self.cache.insert(key, StatsSnapshot::Global(stats.clone()));
        Ok(stats)
    }

    pub async fn stats_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DateRangeStats> {
        let key = cache_key::date_range_stats(start, end);
        if let Some(StatsSnapshot::DateRange(stats)) = self.cache.get(&key) {
            debug!("Stats cache hit: {}", key);
            return Ok(stats);
        }

        let stats = self.engine.stats_by_date_range(start, end).await?;
        self.cache
            .insert(key, StatsSnapshot::DateRange(stats.clone()));
        Ok(stats)
    }

    pub async fn stats_by_structure(&self, structure_id: i64) -> Result<StructureStats> {
        let key = cache_key::structure_stats(structure_id);
        if let Some(StatsSnapshot::Structure(stats)) = self.cache.get(&key) {
            debug!("Stats cache hit: {}", key);
            return Ok(stats);
        }

        let stats = self.engine.stats_by_structure(structure_id).await?;
        self.cache
            .insert(key, StatsSnapshot::Structure(stats.clone()));
        Ok(stats)
    }

    pub async fn revenue_trend(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> Result<Vec<TrendPoint>> {
        self.engine.revenue_trend(start, end, granularity).await
    }

    pub async fn compare_periods(
        &self,
        first_start: NaiveDate,
        first_end: NaiveDate,
        second_start: NaiveDate,
        second_end: NaiveDate,
    ) -> Result<PeriodComparison> {
        self.engine
            .compare_periods(first_start, first_end, second_start, second_end)
            .await
    }

    pub async fn top_performing_structures(
        &self,
        limit: i64,
    ) -> Result<Vec<StructurePerformance>> {
        self.engine.top_performing_structures(limit).await
    }

    pub async fn revenue_by_category(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CategoryRevenue> {
        self.engine.revenue_by_category(start, end).await
    }

    /// Evict every cached stats entry; subsequent queries recompute
    pub fn clear_cache(&self) {
        let evicted = self.cache.len();
        self.cache.clear();
        info!("Stats cache cleared ({} entries evicted)", evicted);
    }
}
