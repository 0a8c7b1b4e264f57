//! # stock_signal - Buy/Sell/Hold signals for daily price series
//!
//! Turns a chronologically ordered close-price history into per-bar
//! trading signals with a blended confidence score: rule-based technical
//! scoring over RSI / moving averages / MACD, combined with the
//! up-probability of a random forest trained on the same indicators.
//!
//! ## Modules
//!
//! - `data` - price series, scored output, training set
//! - `indicators` - indicator kernels and the warm-up-trimmed frame
//! - `scoring` - technical scorer, score blending, signal classification
//! - `models` - decision tree and random forest classifier
//! - `pipeline` - the `generate_signal` entry point
//! - `config` - warm-up windows, rule weights, thresholds
//! - `error` - typed pipeline errors

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod scoring;

pub use config::SignalConfig;
pub use data::{Bar, PriceSeries, ScoredBar, ScoredSeries};
pub use error::{Error, Result};
pub use pipeline::generate_signal;
pub use scoring::Signal;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{IndicatorConfig, SignalConfig, Thresholds};
    pub use crate::data::{Bar, PriceSeries, ScoredBar, ScoredSeries, TrainingSet};
    pub use crate::error::{Error, Result};
    pub use crate::indicators::{IndicatorFrame, IndicatorRow};
    pub use crate::models::{ForestConfig, RandomForest};
    pub use crate::pipeline::generate_signal;
    pub use crate::scoring::Signal;
}
