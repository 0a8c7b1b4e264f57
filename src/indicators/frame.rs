//! Indicator frame: price series extended with derived columns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{macd, rsi, sma};
use crate::config::IndicatorConfig;
use crate::data::PriceSeries;
use crate::error::{Error, Result};

/// One bar with every indicator defined. Fields are typed and fixed;
/// the scorer never does dynamic lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    pub ma_fast: f64,
    pub ma_slow: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
}

impl IndicatorRow {
    /// Feature vector for the classifier, ordered as
    /// [`IndicatorFrame::FEATURE_NAMES`]
    pub fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.rsi,
            self.ma_fast,
            self.ma_slow,
            self.macd_line,
            self.macd_signal,
        ]
    }
}

/// Post-warm-up rows of a price series with all five indicator columns.
///
/// Rows where any column is still NaN are dropped during construction,
/// so the frame is shorter than the input series by the warm-up span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub const FEATURE_NAMES: [&'static str; 5] =
        ["rsi", "ma_fast", "ma_slow", "macd_line", "macd_signal"];

    /// Compute all indicator columns and drop warm-up rows.
    ///
    /// Errors with [`Error::InsufficientHistory`] when no row survives.
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Result<Self> {
        let closes = series.closes();

        let rsi_col = rsi(&closes, config.rsi_period);
        let ma_fast_col = sma(&closes, config.ma_fast);
        let ma_slow_col = sma(&closes, config.ma_slow);
        let macd_cols = macd(
            &closes,
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
        );

        let mut rows = Vec::new();
        for (i, bar) in series.bars().iter().enumerate() {
            let row = IndicatorRow {
                date: bar.date,
                close: bar.close,
                rsi: rsi_col[i],
                ma_fast: ma_fast_col[i],
                ma_slow: ma_slow_col[i],
                macd_line: macd_cols.line[i],
                macd_signal: macd_cols.signal[i],
            };

            if row.feature_vector().iter().all(|v| v.is_finite()) {
                rows.push(row);
            }
        }

        if rows.is_empty() {
            return Err(Error::InsufficientHistory {
                required: config.min_history(),
                got: series.len(),
            });
        }

        debug!(
            input_bars = series.len(),
            frame_rows = rows.len(),
            "indicator frame computed"
        );

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use chrono::Duration;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.25).sin() * 8.0 + i as f64 * 0.02)
            .collect()
    }

    #[test]
    fn test_warmup_shrinkage() {
        let series = series(&wavy(250));
        let frame = IndicatorFrame::compute(&series, &IndicatorConfig::default()).unwrap();
        // Slow MA is the binding warm-up: first defined row is index 199
        assert_eq!(frame.len(), 51);
        assert!(frame
            .rows()
            .iter()
            .all(|r| r.feature_vector().iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_too_short_errors() {
        let series = series(&wavy(150));
        let err = IndicatorFrame::compute(&series, &IndicatorConfig::default()).unwrap_err();
        match err {
            Error::InsufficientHistory { required, got } => {
                assert_eq!(required, 200);
                assert_eq!(got, 150);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_small_windows_config() {
        let config = IndicatorConfig {
            rsi_period: 5,
            ma_fast: 3,
            ma_slow: 8,
            macd_fast: 3,
            macd_slow: 6,
            macd_signal: 3,
        };
        let series = series(&wavy(20));
        let frame = IndicatorFrame::compute(&series, &config).unwrap();
        assert_eq!(frame.len(), 20 - config.min_history() + 1);
    }
}
