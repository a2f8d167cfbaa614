//! Rebins dated events into a dense per-day series for charting.
use crate::core::error::{DonateError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How events falling on the same calendar day are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Add every value for the day (donations).
    Sum,
    /// Keep the value with the latest timestamp for the day (progress updates).
    Last,
}

/// A value observed at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedEvent {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

impl DatedEvent {
    pub fn new(timestamp: DateTime<Utc>, value: Decimal) -> Self {
        Self { timestamp, value }
    }
}

/// One calendar day of an aggregated series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBin {
    pub day_index: i64,
    pub date: NaiveDate,
    pub y: Decimal,
}

impl DailyBin {
    /// `M/D/YYYY`, without zero padding.
    pub fn date_label(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }
}

/// Chart point as consumed by the client-side charting library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: i64,
    pub date_string: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub y: Decimal,
}

/// Bins `events` into one entry per day of `[start, end]`.
///
/// Every event must fall inside the window, an event outside it is reported as
/// [`DonateError::OutOfRangeEvent`] rather than dropped. In [`Aggregation::Last`]
/// mode a value only replaces the day's current one when its timestamp is
/// strictly later, so on an exact tie the first event seen wins.
pub fn aggregate_daily(
    events: &[DatedEvent],
    start: NaiveDate,
    end: NaiveDate,
    mode: Aggregation,
) -> Result<Vec<DailyBin>> {
    if end < start {
        return Err(DonateError::InvalidInput(format!(
            "aggregation window ends ({end}) before it starts ({start})"
        )));
    }

    let days = (end - start).num_days() + 1;
    let mut bins: Vec<DailyBin> = start
        .iter_days()
        .take(days as usize)
        .enumerate()
        .map(|(offset, date)| DailyBin {
            day_index: offset as i64,
            date,
            y: Decimal::ZERO,
        })
        .collect();
    let mut latest: Vec<Option<DateTime<Utc>>> = vec![None; bins.len()];

    for event in events {
        let date = event.timestamp.date_naive();
        let offset = (date - start).num_days();
        if offset < 0 || offset >= days {
            return Err(DonateError::OutOfRangeEvent { date, start, end });
        }
        let offset = offset as usize;
        let bin = &mut bins[offset];

        match mode {
            Aggregation::Sum => bin.y += event.value,
            Aggregation::Last => {
                let is_later = latest[offset].is_none_or(|seen| event.timestamp > seen);
                if is_later {
                    latest[offset] = Some(event.timestamp);
                    bin.y = event.value;
                }
            }
        }
    }

    debug!(
        ?mode,
        events = events.len(),
        bins = bins.len(),
        "Aggregated events into daily bins"
    );
    Ok(bins)
}

pub fn to_chart_points(bins: &[DailyBin]) -> Vec<ChartPoint> {
    bins.iter()
        .map(|bin| ChartPoint {
            x: bin.day_index,
            date_string: bin.date_label(),
            y: bin.y,
        })
        .collect()
}

/// Serializes bins as `[{"x": .., "date_string": .., "y": ..}, ..]`.
pub fn chart_json(bins: &[DailyBin]) -> serde_json::Result<String> {
    serde_json::to_string(&to_chart_points(bins))
}
