//! Price series types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scoring::Signal;

/// One trading-day observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Chronologically ordered close-price history for one instrument.
///
/// Validated on construction: non-empty, strictly increasing unique
/// dates, positive finite closes. Never mutated after that; every
/// pipeline stage derives a new series from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::IndicatorComputation(
                "empty price series".to_string(),
            ));
        }

        for bar in &bars {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(Error::IndicatorComputation(format!(
                    "invalid close {} at {}",
                    bar.close, bar.date
                )));
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(Error::IndicatorComputation(format!(
                    "dates not strictly increasing: {} then {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: the constructor rejects empty input
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// One fully scored row of the output series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBar {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    pub ma_fast: f64,
    pub ma_slow: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    /// Rule-based score in [0, 0.30]
    pub technical_score: f64,
    /// Model probability of an up move next bar, in [0, 1]
    pub pred_prob: f64,
    /// Blended confidence, 0.5 * technical + 0.5 * pred_prob
    pub signal_score: f64,
    pub signal: Signal,
}

/// Output of one pipeline invocation: the post-warm-up rows of the input
/// series with scores and a discrete signal attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSeries {
    bars: Vec<ScoredBar>,
}

impl ScoredSeries {
    pub(crate) fn new(bars: Vec<ScoredBar>) -> Self {
        debug_assert!(!bars.is_empty());
        Self { bars }
    }

    pub fn bars(&self) -> &[ScoredBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, the one headline displays care about
    pub fn latest(&self) -> &ScoredBar {
        self.bars.last().expect("scored series is never empty")
    }

    /// How many bars carry the given signal
    pub fn count(&self, signal: Signal) -> usize {
        self.bars.iter().filter(|b| b.signal == signal).count()
    }
}
