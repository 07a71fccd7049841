use crate::application_port::*;
use crate::domain_model::*;

/// Sales panel over the built-in figures. Only `today` is hourly, so the
/// hour filter applies to it alone.
#[derive(Debug, Default)]
pub struct StaticSalesPanel;

impl StaticSalesPanel {
    pub fn new() -> Self {
        Self
    }
}

impl SalesPanel for StaticSalesPanel {
    fn report(&self, query: SalesQuery) -> Result<SalesReport, SalesError> {
        for hour in [query.start_hour, query.end_hour] {
            if hour > 23 {
                return Err(SalesError::HourOutOfRange(hour));
            }
        }
        if query.start_hour > query.end_hour {
            return Err(SalesError::InvertedHours {
                start: query.start_hour,
                end: query.end_hour,
            });
        }

        let hours = query.start_hour..=query.end_hour;
        let points: Vec<SalesPoint> = query
            .range
            .points()
            .iter()
            .filter(|p| match query.range {
                SalesRange::Today => p.hour().is_some_and(|h| hours.contains(&h)),
                _ => true,
            })
            .copied()
            .collect();

        let totals = SalesMetric::ALL
            .iter()
            .map(|m| (*m, points.iter().map(|p| p.value(*m)).sum::<u64>()))
            .collect();

        Ok(SalesReport {
            range: query.range,
            metric: query.metric,
            points,
            totals,
        })
    }
}
