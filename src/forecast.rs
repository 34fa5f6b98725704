//! Short-horizon forecasting of aggregate monthly sales volume.
//!
//! Input is the two-column monthly series produced by
//! [`crate::aggregate::monthly_totals`]; output is a fixed number of future
//! months, each with a point forecast and lower/upper uncertainty bounds.
//! The model is a least-squares linear trend over the month index combined
//! with multiplicative monthly seasonal indices; bounds come from the
//! in-sample residual spread. Everything is clamped at zero, since negative
//! sales volume is meaningless.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::daterange::{add_months, months_between};
use crate::error::{Result, SalesInsightError};

/// Width of the uncertainty band in residual standard deviations (~95%).
const BOUND_Z: f64 = 1.96;

/// Trend values this close to zero are excluded from seasonal ratios.
const TREND_EPSILON: f64 = 1e-9;

/// One forecasted month.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub forecast: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecasts `periods` months beyond the last observed month.
///
/// Fails with [`SalesInsightError::InsufficientHistory`] when fewer than
/// `min_history` months were observed (and never runs on fewer than two,
/// which the trend fit needs). Gaps in the series are allowed; months are
/// indexed by calendar distance, not by position.
pub fn forecast_monthly(
    series: &BTreeMap<NaiveDate, f64>,
    periods: usize,
    min_history: usize,
) -> Result<Vec<ForecastPoint>> {
    let required = min_history.max(2);
    if series.len() < required {
        return Err(SalesInsightError::InsufficientHistory {
            required,
            available: series.len(),
        });
    }

    let first = *series.keys().next().unwrap();
    let last = *series.keys().next_back().unwrap();

    let observations: Vec<(f64, f64, u32)> = series
        .iter()
        .map(|(month, value)| (months_between(first, *month) as f64, *value, month.month()))
        .collect();

    let trend = fit_trend(&observations);
    let indices = seasonal_indices(&observations, &trend);

    let residual_sd = {
        let squared_sum: f64 = observations
            .iter()
            .map(|&(x, y, month)| {
                let fitted = trend.at(x) * indices[month as usize - 1];
                (y - fitted) * (y - fitted)
            })
            .sum();
        (squared_sum / (observations.len() - 1) as f64).sqrt()
    };
    let band = BOUND_Z * residual_sd;

    debug!(
        "Forecasting {periods} months from {} observations (slope {:.4}, residual sd {:.4})",
        observations.len(),
        trend.slope,
        residual_sd
    );

    let points = (1..=periods as u32)
        .map(|offset| {
            let month = add_months(last, offset);
            let x = months_between(first, month) as f64;
            let raw = trend.at(x) * indices[month.month() as usize - 1];
            let forecast = raw.max(0.0);
            ForecastPoint {
                month,
                forecast,
                lower: (raw - band).max(0.0),
                upper: (raw + band).max(0.0),
            }
        })
        .collect();

    Ok(points)
}

struct Trend {
    intercept: f64,
    slope: f64,
}

impl Trend {
    fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

fn fit_trend(observations: &[(f64, f64, u32)]) -> Trend {
    let n = observations.len() as f64;
    let mean_x: f64 = observations.iter().map(|o| o.0).sum::<f64>() / n;
    let mean_y: f64 = observations.iter().map(|o| o.1).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &(x, y, _) in observations {
        numerator += (x - mean_x) * (y - mean_y);
        denominator += (x - mean_x) * (x - mean_x);
    }

    // Distinct month keys guarantee distinct x values, so the denominator is
    // only zero for a single observation, which the caller rules out.
    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };

    Trend {
        intercept: mean_y - slope * mean_x,
        slope,
    }
}

/// One multiplicative index per calendar month: the mean observed ratio of
/// value to trend, 1.0 where a month was never observed, normalized to mean
/// 1.0 across the year.
fn seasonal_indices(observations: &[(f64, f64, u32)], trend: &Trend) -> [f64; 12] {
    let mut sums = [0.0_f64; 12];
    let mut counts = [0_u32; 12];

    for &(x, y, month) in observations {
        let base = trend.at(x);
        if base.abs() > TREND_EPSILON {
            sums[month as usize - 1] += y / base;
            counts[month as usize - 1] += 1;
        }
    }

    let mut indices = [1.0_f64; 12];
    for m in 0..12 {
        if counts[m] > 0 {
            indices[m] = sums[m] / counts[m] as f64;
        }
    }

    let sum: f64 = indices.iter().sum();
    if sum > 0.0 {
        let scale = 12.0 / sum;
        for index in &mut indices {
            *index *= scale;
        }
    }

    indices
}
