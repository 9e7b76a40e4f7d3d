mod stats;

pub use stats::{
    CategoryRevenue, DateRangeStats, GlobalStats, Granularity, PeriodComparison, StatsSnapshot,
    StructurePerformance, StructureStats, TrendPoint,
};
