//! Training data for the predictive model

use chrono::NaiveDate;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorFrame;

/// Labeled feature rows for classifier training.
///
/// Built fresh from the indicator frame on every invocation: one example
/// per fully defined row except the last, labeled 1.0 when the next
/// bar's close is higher and 0.0 otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSet {
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Binary labels, 1.0 = next bar up
    pub labels: Vec<f64>,
    /// Feature names
    pub feature_names: Vec<String>,
    /// Bar date for each sample
    pub dates: Vec<NaiveDate>,
}

impl TrainingSet {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
            dates: Vec::new(),
        }
    }

    /// Derive labeled examples from an indicator frame.
    ///
    /// The final row has no next-bar return and is excluded; it still
    /// receives a prediction from the fitted model later.
    pub fn from_frame(frame: &IndicatorFrame) -> Self {
        let mut set = Self::new(
            IndicatorFrame::FEATURE_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
        );

        let rows = frame.rows();
        for pair in rows.windows(2) {
            let label = if pair[1].close > pair[0].close { 1.0 } else { 0.0 };
            set.add_sample(pair[0].feature_vector(), label, pair[0].date);
        }

        set
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn add_sample(&mut self, features: Vec<f64>, label: f64, date: NaiveDate) {
        assert_eq!(features.len(), self.feature_names.len());
        self.features.push(features);
        self.labels.push(label);
        self.dates.push(date);
    }

    /// True when every label falls in the same class. A constant or
    /// one-way market produces this; the pipeline treats it as "no edge"
    /// rather than an error.
    pub fn is_single_class(&self) -> bool {
        let mut iter = self.labels.iter().map(|&l| l > 0.5);
        match iter.next() {
            Some(first) => iter.all(|c| c == first),
            None => true,
        }
    }

    /// Subset by sample indices
    pub fn subset(&self, indices: &[usize]) -> TrainingSet {
        TrainingSet {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
        }
    }

    /// Bootstrap sample (random draw with replacement), deterministic
    /// for a given seed
    pub fn bootstrap_sample(&self, seed: u64) -> TrainingSet {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();
        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
        self.subset(&indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_set() -> TrainingSet {
        let mut set = TrainingSet::new(vec!["f1".to_string(), "f2".to_string()]);
        set.add_sample(vec![1.0, 2.0], 1.0, date(1));
        set.add_sample(vec![3.0, 4.0], 0.0, date(2));
        set.add_sample(vec![5.0, 6.0], 1.0, date(3));
        set
    }

    #[test]
    fn test_dimensions() {
        let set = sample_set();
        assert_eq!(set.n_samples(), 3);
        assert_eq!(set.n_features(), 2);
    }

    #[test]
    fn test_single_class() {
        let mut set = TrainingSet::new(vec!["f".to_string()]);
        assert!(set.is_single_class());

        set.add_sample(vec![1.0], 0.0, date(1));
        set.add_sample(vec![2.0], 0.0, date(2));
        assert!(set.is_single_class());

        set.add_sample(vec![3.0], 1.0, date(3));
        assert!(!set.is_single_class());
    }

    #[test]
    fn test_subset() {
        let set = sample_set();
        let sub = set.subset(&[0, 2]);
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.labels, vec![1.0, 1.0]);
        assert_eq!(sub.features[1], vec![5.0, 6.0]);
    }

    #[test]
    fn test_bootstrap_deterministic() {
        let set = sample_set();
        let a = set.bootstrap_sample(7);
        let b = set.bootstrap_sample(7);
        assert_eq!(a.features, b.features);
        assert_eq!(a.labels, b.labels);

        let c = set.bootstrap_sample(8);
        assert_eq!(c.n_samples(), set.n_samples());
    }
}
