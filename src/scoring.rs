//! Rule-based scoring and signal classification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{BlendWeights, ScoreWeights, Thresholds};
use crate::indicators::IndicatorRow;

/// Discrete trading recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Classify a blended score. Comparisons are strict, so a score
    /// sitting exactly on a cutoff resolves to Hold.
    pub fn from_score(score: f64, thresholds: &Thresholds) -> Self {
        if score > thresholds.buy {
            Signal::Buy
        } else if score < thresholds.sell {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Additive rule score over one indicator row.
///
/// Three independent contributions, no penalties: oversold RSI, fast MA
/// above slow MA, MACD line above its signal line. With default weights
/// the result lands in {0, 0.05, ..., 0.30}.
pub fn technical_score(row: &IndicatorRow, weights: &ScoreWeights) -> f64 {
    let mut score = 0.0;

    if row.rsi < weights.rsi_oversold {
        score += weights.oversold;
    }
    if row.ma_fast > row.ma_slow {
        score += weights.trend;
    }
    if row.macd_line > row.macd_signal {
        score += weights.momentum;
    }

    score
}

/// Blend the rule score with the model probability
pub fn blend(technical: f64, prob: f64, weights: &BlendWeights) -> f64 {
    weights.technical * technical + weights.model * prob
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(rsi: f64, ma_fast: f64, ma_slow: f64, macd_line: f64, macd_signal: f64) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            close: 100.0,
            rsi,
            ma_fast,
            ma_slow,
            macd_line,
            macd_signal,
        }
    }

    #[test]
    fn test_all_rule_combinations() {
        let weights = ScoreWeights::default();
        let expected = [0.0, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30];

        for oversold in [false, true] {
            for bullish_trend in [false, true] {
                for bullish_momentum in [false, true] {
                    let rsi = if oversold { 25.0 } else { 55.0 };
                    let (fast, slow) = if bullish_trend { (110.0, 100.0) } else { (90.0, 100.0) };
                    let (line, sig) = if bullish_momentum { (1.0, 0.5) } else { (0.5, 1.0) };

                    let score = technical_score(&row(rsi, fast, slow, line, sig), &weights);
                    assert!(
                        expected.iter().any(|e| (score - e).abs() < 1e-12),
                        "score {score} not in expected set"
                    );
                    assert!(score >= 0.0 && score <= weights.max_score() + 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_rsi_threshold_crossing_adds_oversold_weight() {
        let weights = ScoreWeights::default();
        let above = technical_score(&row(30.1, 110.0, 100.0, 1.0, 0.5), &weights);
        let below = technical_score(&row(29.9, 110.0, 100.0, 1.0, 0.5), &weights);
        assert!((below - above - 0.10).abs() < 1e-12);

        // Exactly at the threshold is not oversold
        let at = technical_score(&row(30.0, 110.0, 100.0, 1.0, 0.5), &weights);
        assert!((at - above).abs() < 1e-12);
    }

    #[test]
    fn test_equal_mas_contribute_nothing() {
        let weights = ScoreWeights::default();
        let score = technical_score(&row(55.0, 100.0, 100.0, 0.0, 0.0), &weights);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_blend_is_exact() {
        let weights = BlendWeights::default();
        for (t, p) in [(0.0, 0.5), (0.30, 1.0), (0.15, 0.42), (0.05, 0.0)] {
            assert_eq!(blend(t, p, &weights), 0.5 * t + 0.5 * p);
        }
    }

    #[test]
    fn test_classification_boundaries() {
        let thresholds = Thresholds::default();
        assert_eq!(Signal::from_score(0.7, &thresholds), Signal::Hold);
        assert_eq!(Signal::from_score(0.4, &thresholds), Signal::Hold);
        assert_eq!(Signal::from_score(0.71, &thresholds), Signal::Buy);
        assert_eq!(Signal::from_score(0.39, &thresholds), Signal::Sell);
        assert_eq!(Signal::from_score(0.55, &thresholds), Signal::Hold);
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Sell.to_string(), "SELL");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }
}
