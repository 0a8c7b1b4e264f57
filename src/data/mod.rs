//! Price series and training data structures
//!
//! All entities here are created, used, and discarded within a single
//! pipeline invocation; there is no cross-invocation state.

mod series;
mod training;

pub use series::{Bar, PriceSeries, ScoredBar, ScoredSeries};
pub use training::TrainingSet;
