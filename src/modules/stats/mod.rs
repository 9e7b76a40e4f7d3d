pub mod controllers;
pub mod models;
pub mod services;

pub use models::{
    CategoryRevenue, DateRangeStats, GlobalStats, Granularity, PeriodComparison,
    StructurePerformance, StructureStats, TrendPoint,
};
pub use services::{StatsCache, StatsEngine, StatsService};
