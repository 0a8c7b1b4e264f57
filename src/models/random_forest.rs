//! Bagged ensemble of decision trees

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decision_tree::{DecisionTree, TreeConfig};
use crate::data::TrainingSet;
use crate::error::Result;

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Max features per split (sqrt of total if None)
    pub max_features: Option<usize>,
    /// Base seed; tree i uses seed + i
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

/// Random forest classifier.
///
/// Trees are trained in parallel on bootstrap samples; the per-tree seed
/// is derived from the base seed, so a fixed seed gives bit-identical
/// probabilities across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Train the forest
    pub fn fit(&mut self, set: &TrainingSet) -> Result<()> {
        self.feature_names = set.feature_names.clone();
        let n_features = set.n_features();

        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize);

        let trees: Vec<Result<DecisionTree>> = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_config = TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: self.config.seed.wrapping_add(i as u64),
                };

                let mut tree = DecisionTree::new(tree_config);
                let sample = set.bootstrap_sample(self.config.seed.wrapping_add(i as u64));
                tree.fit(&sample)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees.into_iter().collect::<Result<Vec<_>>>()?;

        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }
        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }

        debug!(
            n_trees = self.trees.len(),
            n_samples = set.n_samples(),
            "random forest fitted"
        );

        Ok(())
    }

    /// Positive-class probability for one sample: mean leaf probability
    /// across trees
    pub fn predict_proba_one(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }

        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_proba_one(features))
            .sum();
        sum / self.trees.len() as f64
    }

    /// Positive-class probabilities for a batch of samples
    pub fn predict_proba(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features
            .par_iter()
            .map(|f| self.predict_proba_one(f))
            .collect()
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Feature names with importances, most important first
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(n, &i)| (n.as_str(), i))
            .collect();

        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("importances are finite"));
        ranking
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn separable_set(n: usize) -> TrainingSet {
        let mut set = TrainingSet::new(vec!["a".to_string(), "b".to_string()]);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for i in 0..n {
            let a = i as f64 / n as f64;
            let b = ((i * 7) % n) as f64 / n as f64;
            let y = if a > 0.5 { 1.0 } else { 0.0 };
            set.add_sample(vec![a, b], y, start + chrono::Duration::days(i as i64));
        }
        set
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 20,
            max_depth: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_and_predict() {
        let set = separable_set(200);
        let mut forest = RandomForest::new(small_config());
        forest.fit(&set).unwrap();

        assert_eq!(forest.n_trees(), 20);
        assert!(forest.predict_proba_one(&[0.9, 0.1]) > 0.7);
        assert!(forest.predict_proba_one(&[0.1, 0.9]) < 0.3);
    }

    #[test]
    fn test_probabilities_bounded() {
        let set = separable_set(150);
        let mut forest = RandomForest::new(small_config());
        forest.fit(&set).unwrap();

        let probs = forest.predict_proba(&set.features);
        assert_eq!(probs.len(), set.n_samples());
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_same_seed_same_predictions() {
        let set = separable_set(200);

        let mut a = RandomForest::new(small_config());
        a.fit(&set).unwrap();
        let mut b = RandomForest::new(small_config());
        b.fit(&set).unwrap();

        for row in &set.features {
            assert_eq!(a.predict_proba_one(row), b.predict_proba_one(row));
        }
    }

    #[test]
    fn test_unfit_forest_is_neutral() {
        let forest = RandomForest::new(small_config());
        assert_eq!(forest.predict_proba_one(&[0.5, 0.5]), 0.5);
    }

    #[test]
    fn test_importances_normalized() {
        let set = separable_set(200);
        let mut forest = RandomForest::new(small_config());
        forest.fit(&set).unwrap();

        let sum: f64 = forest.feature_importances().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        // Feature "a" fully determines the label
        assert_eq!(forest.feature_importance_ranking()[0].0, "a");
    }
}
