//! Binary classification decision tree

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::TrainingSet;
use crate::error::{Error, Result};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Maximum features to consider per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index for split
    pub feature_idx: Option<usize>,
    /// Threshold for split
    pub threshold: Option<f64>,
    /// Positive-class probability (meaningful for leaf nodes)
    pub prob_up: f64,
    /// Number of samples in this node
    pub n_samples: usize,
    /// Left child
    pub left: Option<Box<TreeNode>>,
    /// Right child
    pub right: Option<Box<TreeNode>>,
    /// Gini impurity at this node
    pub impurity: f64,
}

impl TreeNode {
    fn leaf(prob_up: f64, n_samples: usize, impurity: f64) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            prob_up,
            n_samples,
            left: None,
            right: None,
            impurity,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn depth(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            1 + self
                .left
                .as_ref()
                .map(|n| n.depth())
                .unwrap_or(0)
                .max(self.right.as_ref().map(|n| n.depth()).unwrap_or(0))
        }
    }
}

/// Decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// Train the tree.
    ///
    /// Malformed (non-finite) feature values surface as
    /// [`Error::IndicatorComputation`]; an empty set as
    /// [`Error::ModelFitting`].
    pub fn fit(&mut self, set: &TrainingSet) -> Result<()> {
        if set.n_samples() == 0 || set.n_features() == 0 {
            return Err(Error::ModelFitting("empty training set".to_string()));
        }
        for row in &set.features {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(Error::IndicatorComputation(
                    "non-finite feature value in training set".to_string(),
                ));
            }
        }

        self.feature_importances = vec![0.0; set.n_features()];

        let indices: Vec<usize> = (0..set.n_samples()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_tree(set, &indices, 0, &mut rng));

        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }

        Ok(())
    }

    fn build_tree(
        &mut self,
        set: &TrainingSet,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let labels: Vec<f64> = indices.iter().map(|&i| set.labels[i]).collect();
        let impurity = gini(&labels);

        if depth >= self.config.max_depth || n < self.config.min_samples_split || impurity < 1e-10 {
            return TreeNode::leaf(prob_up(&labels), n, impurity);
        }

        match self.find_best_split(set, indices, rng) {
            Some((feature_idx, threshold, left_indices, right_indices, importance)) => {
                if left_indices.len() < self.config.min_samples_leaf
                    || right_indices.len() < self.config.min_samples_leaf
                {
                    return TreeNode::leaf(prob_up(&labels), n, impurity);
                }

                self.feature_importances[feature_idx] += importance;

                let left = self.build_tree(set, &left_indices, depth + 1, rng);
                let right = self.build_tree(set, &right_indices, depth + 1, rng);

                TreeNode {
                    feature_idx: Some(feature_idx),
                    threshold: Some(threshold),
                    prob_up: prob_up(&labels),
                    n_samples: n,
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                    impurity,
                }
            }
            None => TreeNode::leaf(prob_up(&labels), n, impurity),
        }
    }

    /// Best Gini-gain split over a random feature subset, trying the
    /// midpoints between consecutive distinct values as thresholds
    fn find_best_split(
        &self,
        set: &TrainingSet,
        indices: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> {
        let n_features = set.n_features();
        let max_features = self.config.max_features.unwrap_or(n_features);

        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);

        let labels: Vec<f64> = indices.iter().map(|&i| set.labels[i]).collect();
        let parent_impurity = gini(&labels);

        let mut best_gain = 0.0;
        let mut best_split: Option<(usize, f64, Vec<usize>, Vec<usize>, f64)> = None;

        for &feature_idx in &feature_indices {
            let mut values: Vec<f64> = indices
                .iter()
                .map(|&i| set.features[i][feature_idx])
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).expect("features are finite"));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| set.features[i][feature_idx] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    continue;
                }

                let left_labels: Vec<f64> = left_idx.iter().map(|&i| set.labels[i]).collect();
                let right_labels: Vec<f64> = right_idx.iter().map(|&i| set.labels[i]).collect();

                let n_left = left_idx.len() as f64;
                let n_right = right_idx.len() as f64;
                let weighted = (n_left * gini(&left_labels) + n_right * gini(&right_labels))
                    / (n_left + n_right);
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    let importance = gain * indices.len() as f64;
                    best_split = Some((feature_idx, threshold, left_idx, right_idx, importance));
                }
            }
        }

        best_split
    }

    /// Positive-class probability for one sample
    pub fn predict_proba_one(&self, features: &[f64]) -> f64 {
        match &self.root {
            Some(node) => traverse(node, features),
            None => 0.5,
        }
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

fn traverse(node: &TreeNode, features: &[f64]) -> f64 {
    if node.is_leaf() {
        return node.prob_up;
    }

    let feature_idx = node.feature_idx.expect("internal node has a split");
    let threshold = node.threshold.expect("internal node has a threshold");

    if features[feature_idx] <= threshold {
        traverse(node.left.as_ref().expect("internal node"), features)
    } else {
        traverse(node.right.as_ref().expect("internal node"), features)
    }
}

fn prob_up(labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.5;
    }
    labels.iter().filter(|&&l| l > 0.5).count() as f64 / labels.len() as f64
}

fn gini(labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let p = prob_up(labels);
    2.0 * p * (1.0 - p)
}
