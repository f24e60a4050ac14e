//! Stats module - dashboard metric aggregation

mod aggregator;

pub use aggregator::{
    Aggregator, DashboardMetrics, DeviationEntry, LossPeriod, TOP_DEVIATIONS_LIMIT,
};
