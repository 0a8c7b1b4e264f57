//! Signal generation pipeline
//!
//! Sequential stages over one price series: indicators → technical
//! scores → labels → classifier (or neutral fallback) → blended score →
//! discrete signal. Forest training parallelizes internally but no stage
//! reads a downstream artifact.

use tracing::{debug, info, warn};

use crate::config::SignalConfig;
use crate::data::{PriceSeries, ScoredBar, ScoredSeries, TrainingSet};
use crate::error::{Error, Result};
use crate::indicators::IndicatorFrame;
use crate::models::RandomForest;
use crate::scoring::{blend, technical_score, Signal};

/// Run the full pipeline over a validated price series.
///
/// The returned series covers the post-warm-up rows of the input; a
/// series too short for any row to survive warm-up trimming errors with
/// [`Error::InsufficientHistory`].
///
/// Known limitation, kept deliberately: the classifier is fit and
/// evaluated on the same frame (in-sample, look-ahead bias). Probability
/// estimates are optimistic and must not be read as out-of-sample skill.
pub fn generate_signal(series: &PriceSeries, config: &SignalConfig) -> Result<ScoredSeries> {
    let frame = IndicatorFrame::compute(series, &config.indicators)?;

    let technical: Vec<f64> = frame
        .rows()
        .iter()
        .map(|row| technical_score(row, &config.score))
        .collect();

    let training = TrainingSet::from_frame(&frame);
    let probs = model_probabilities(&frame, &training, config)?;

    let bars: Vec<ScoredBar> = frame
        .rows()
        .iter()
        .zip(technical.iter().zip(probs.iter()))
        .map(|(row, (&tech, &prob))| {
            let score = blend(tech, prob, &config.blend);
            ScoredBar {
                date: row.date,
                close: row.close,
                rsi: row.rsi,
                ma_fast: row.ma_fast,
                ma_slow: row.ma_slow,
                macd_line: row.macd_line,
                macd_signal: row.macd_signal,
                technical_score: tech,
                pred_prob: prob,
                signal_score: score,
                signal: Signal::from_score(score, &config.thresholds),
            }
        })
        .collect();

    let scored = ScoredSeries::new(bars);
    info!(
        rows = scored.len(),
        latest_signal = %scored.latest().signal,
        latest_score = scored.latest().signal_score,
        "signal pipeline complete"
    );

    Ok(scored)
}

/// Up-probability per frame row: a freshly fit forest when there is
/// enough two-class training data, a flat 0.5 otherwise.
///
/// The forest scores every row of the frame it was fitted on, the final
/// unlabeled row included.
fn model_probabilities(
    frame: &IndicatorFrame,
    training: &TrainingSet,
    config: &SignalConfig,
) -> Result<Vec<f64>> {
    if training.n_samples() < config.min_training_rows {
        debug!(
            labeled = training.n_samples(),
            required = config.min_training_rows,
            "too few training rows, neutral probability"
        );
        return Ok(vec![0.5; frame.len()]);
    }

    if training.is_single_class() {
        debug!("single-class label set, neutral probability");
        return Ok(vec![0.5; frame.len()]);
    }

    let mut forest = RandomForest::new(config.forest.clone());
    if let Err(err) = forest.fit(training) {
        match err {
            Error::ModelFitting(msg) => {
                warn!(%msg, "model fitting failed, neutral probability");
                return Ok(vec![0.5; frame.len()]);
            }
            other => return Err(other),
        }
    }

    debug!(
        importances = ?forest.feature_importance_ranking(),
        "forest fitted"
    );

    let features: Vec<Vec<f64>> = frame.rows().iter().map(|r| r.feature_vector()).collect();
    Ok(forest.predict_proba(&features))
}
