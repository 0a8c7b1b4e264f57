//! Pipeline configuration
//!
//! The warm-up windows, rule weights, and classification thresholds are
//! configuration rather than hardcoded constants. The defaults below are
//! the canonical values: RSI 14, SMA 50/200, MACD 12/26/9, minimum 100
//! labeled rows before the classifier is trained.

use serde::{Deserialize, Serialize};

use crate::models::ForestConfig;

/// Warm-up windows for the indicator calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// RSI lookback window
    pub rsi_period: usize,
    /// Fast simple moving average window
    pub ma_fast: usize,
    /// Slow simple moving average window
    pub ma_slow: usize,
    /// MACD fast EMA window
    pub macd_fast: usize,
    /// MACD slow EMA window
    pub macd_slow: usize,
    /// MACD signal-line EMA window
    pub macd_signal: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_fast: 50,
            ma_slow: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorConfig {
    /// Minimum number of bars before at least one row has every
    /// indicator defined.
    ///
    /// RSI needs `period + 1` closes, a SMA needs its window, and the
    /// MACD signal line needs `slow + signal - 1` closes (the signal EMA
    /// seeds only after the slow EMA stabilizes).
    pub fn min_history(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.ma_fast)
            .max(self.ma_slow)
            .max(self.macd_slow + self.macd_signal - 1)
    }
}

/// Additive rule weights for the technical scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// RSI level below which a bar counts as oversold
    pub rsi_oversold: f64,
    /// Contribution when RSI < rsi_oversold
    pub oversold: f64,
    /// Contribution when MA_fast > MA_slow
    pub trend: f64,
    /// Contribution when MACD line > its signal line
    pub momentum: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            oversold: 0.10,
            trend: 0.15,
            momentum: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Largest score the rule set can produce
    pub fn max_score(&self) -> f64 {
        self.oversold + self.trend + self.momentum
    }
}

/// Weights for combining the technical score with the model probability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendWeights {
    pub technical: f64,
    pub model: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            technical: 0.5,
            model: 0.5,
        }
    }
}

/// Classification cutoffs over the blended score.
///
/// Comparisons are strict: a score exactly at a cutoff resolves to HOLD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub buy: f64,
    pub sell: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { buy: 0.7, sell: 0.4 }
    }
}

/// Top-level configuration for one pipeline invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub indicators: IndicatorConfig,
    pub score: ScoreWeights,
    pub blend: BlendWeights,
    pub thresholds: Thresholds,
    /// Fewer labeled training rows than this skips the classifier and
    /// assigns a neutral 0.5 probability to every bar.
    pub min_training_rows: usize,
    pub forest: ForestConfig,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            score: ScoreWeights::default(),
            blend: BlendWeights::default(),
            thresholds: Thresholds::default(),
            min_training_rows: 100,
            forest: ForestConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_history() {
        let config = IndicatorConfig::default();
        // Dominated by the 200-bar slow moving average
        assert_eq!(config.min_history(), 200);
    }

    #[test]
    fn test_min_history_without_slow_ma() {
        let config = IndicatorConfig {
            ma_fast: 5,
            ma_slow: 10,
            ..Default::default()
        };
        // MACD signal line now dominates: 26 + 9 - 1
        assert_eq!(config.min_history(), 34);
    }

    #[test]
    fn test_max_score() {
        let weights = ScoreWeights::default();
        assert!((weights.max_score() - 0.30).abs() < 1e-12);
    }
}
