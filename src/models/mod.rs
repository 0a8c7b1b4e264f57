//! Predictive model
//!
//! A bagged ensemble of Gini decision trees estimating the probability
//! that the next bar closes higher. Fit once per pipeline invocation,
//! never persisted.

mod decision_tree;
mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig, TreeNode};
pub use random_forest::{ForestConfig, RandomForest};
