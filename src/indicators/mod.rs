//! Technical indicator kernels
//!
//! Every kernel is causal: the value at index `i` depends only on closes
//! at indices `<= i`. Warm-up rows where an indicator is not yet defined
//! hold `f64::NAN`; the frame builder drops rows carrying any NaN so the
//! caller sees warm-up cost as series shrinkage.

mod frame;

pub use frame::{IndicatorFrame, IndicatorRow};

/// Simple Moving Average
pub fn sma(closes: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; closes.len()];

    if period == 0 || closes.len() < period {
        return result;
    }

    for i in (period - 1)..closes.len() {
        let window = &closes[(i + 1 - period)..=i];
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}

/// Exponential Moving Average
///
/// Seeds with the SMA of the first `period` finite values and recurses
/// from there. A leading NaN prefix (e.g. a MACD line fed back in) is
/// skipped rather than poisoning the whole output.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];

    if period == 0 {
        return result;
    }

    let start = match values.iter().position(|v| v.is_finite()) {
        Some(idx) => idx,
        None => return result,
    };

    if values.len() < start + period {
        return result;
    }

    let seed: f64 = values[start..start + period].iter().sum::<f64>() / period as f64;
    result[start + period - 1] = seed;

    let multiplier = 2.0 / (period as f64 + 1.0);
    for i in (start + period)..values.len() {
        result[i] = (values[i] - result[i - 1]) * multiplier + result[i - 1];
    }

    result
}

/// Relative Strength Index (Wilder smoothing)
///
/// Undefined for the first `period` bars. A window with no losses pins
/// RSI at 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / period as f64;

    for i in period..n {
        result[i] = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };

        // gains[i] is the change into bar i + 1
        if i < n - 1 {
            avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        }
    }

    result
}

/// MACD line and its signal line
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

/// MACD: fast EMA minus slow EMA, smoothed again for the signal line.
///
/// The line is defined once the slow EMA is, the signal line `signal - 1`
/// bars after that.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&line, signal);

    Macd {
        line,
        signal: signal_line,
    }
}
