use crate::domain_model::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SalesError {
    #[error("hour {0} is out of range 0..=23")]
    HourOutOfRange(u8),
    #[error("start hour {start} is after end hour {end}")]
    InvertedHours { start: u8, end: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesQuery {
    pub range: SalesRange,
    pub metric: SalesMetric,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl SalesQuery {
    pub fn new(range: SalesRange, metric: SalesMetric) -> Self {
        Self {
            range,
            metric,
            start_hour: 0,
            end_hour: 23,
        }
    }

    pub fn with_hours(mut self, start_hour: u8, end_hour: u8) -> Self {
        self.start_hour = start_hour;
        self.end_hour = end_hour;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub range: SalesRange,
    pub metric: SalesMetric,
    pub points: Vec<SalesPoint>,
    /// Totals for every metric over `points`, in `SalesMetric::ALL` order.
    pub totals: Vec<(SalesMetric, u64)>,
}

impl SalesReport {
    pub fn total(&self, metric: SalesMetric) -> u64 {
        self.totals
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

pub trait SalesPanel: Send + Sync {
    /// The hour filter applies to `today` only. An hour above 23 or a
    /// start after the end is rejected with an error rather than read as
    /// an empty series.
    fn report(&self, query: SalesQuery) -> Result<SalesReport, SalesError>;
}
