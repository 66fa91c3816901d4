use std::collections::BTreeMap;

use minilearn_core::{label_counts, majority_label, Matrix, MlError, MlResult};
use minilearn_metrics::TaskType;
use minilearn_model::{Lifecycle, Model};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binning::{compute_bin_edges, find_bin};

const NAME: &str = "Decision Tree (ID3)";

/// Hyperparameters of [`DecisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTreeParams {
    /// Depth at which nodes are forced to become leaves. `0` gives a single leaf.
    pub max_depth: usize,
    /// Number of equal-width bins per feature.
    pub n_bins: usize,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        DecisionTreeParams {
            max_depth: 5,
            n_bins: 16,
        }
    }
}

impl DecisionTreeParams {
    pub fn validate(&self) -> MlResult<()> {
        if self.n_bins == 0 {
            return Err(MlError::invalid_hyperparameter("n_bins", "must be at least 1"));
        }
        Ok(())
    }
}

/// A node in the decision tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Leaf: predicts a class label.
    Leaf { value: f64 },
    /// Internal node: one child per bin id observed during training.
    Split {
        feature_idx: usize,
        children: BTreeMap<usize, TreeNode>,
        /// Majority label of the samples that reached this node, returned
        /// for bin ids that have no child.
        fallback: f64,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { children, .. } => {
                1 + children.values().map(TreeNode::depth).max().unwrap_or(0)
            }
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { children, .. } => children.values().map(TreeNode::n_leaves).sum(),
        }
    }

    fn predict(&self, bins: &[usize]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature_idx,
                children,
                fallback,
            } => match children.get(&bins[*feature_idx]) {
                Some(child) => child.predict(bins),
                None => *fallback,
            },
        }
    }
}

/// Decision Tree Classifier using ID3 (information gain) over binned features.
///
/// Every feature is discretised into `n_bins` equal-width bins computed from
/// the training data; the same edges are reused at prediction time.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: DecisionTreeParams,
    root: Option<TreeNode>,
    bin_edges: Vec<Vec<f64>>,
    lifecycle: Lifecycle,
}

impl DecisionTree {
    pub fn new(max_depth: usize, n_bins: usize) -> MlResult<Self> {
        Self::from_params(DecisionTreeParams { max_depth, n_bins })
    }

    pub fn from_params(params: DecisionTreeParams) -> MlResult<Self> {
        params.validate()?;
        Ok(DecisionTree {
            params,
            root: None,
            bin_edges: Vec::new(),
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn params(&self) -> &DecisionTreeParams {
        &self.params
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Training-derived bin edges, one array per feature.
    pub fn bin_edges(&self) -> &[Vec<f64>] {
        &self.bin_edges
    }

    /// Longest root-to-leaf path; `None` before fitting.
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::n_leaves)
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        DecisionTree {
            params: DecisionTreeParams::default(),
            root: None,
            bin_edges: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }
}

// ─── Training ───────────────────────────────────────────────────────────────

/// Shannon entropy (bits) of the labels at `samples`.
fn entropy(y: &[f64], samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total = samples.len() as f64;
    label_counts(samples.iter().map(|&i| y[i]))
        .into_iter()
        .map(|(_, count)| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Group `samples` by their bin id on `feature`.
fn partition(bins: &[Vec<usize>], samples: &[usize], feature: usize) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &i in samples {
        groups.entry(bins[i][feature]).or_default().push(i);
    }
    groups
}

fn information_gain(bins: &[Vec<usize>], y: &[f64], samples: &[usize], feature: usize) -> f64 {
    let total = samples.len() as f64;
    let children: f64 = partition(bins, samples, feature)
        .values()
        .map(|group| group.len() as f64 / total * entropy(y, group))
        .sum();
    entropy(y, samples) - children
}

struct TreeBuilder<'a> {
    bins: &'a [Vec<usize>],
    y: &'a [f64],
    n_features: usize,
    max_depth: usize,
}

impl TreeBuilder<'_> {
    fn majority(&self, samples: &[usize]) -> f64 {
        majority_label(samples.iter().map(|&i| self.y[i])).unwrap_or(0.0)
    }

    fn build(&self, samples: &[usize], depth: usize) -> TreeNode {
        let Some(&first) = samples.first() else {
            return TreeNode::Leaf { value: 0.0 };
        };

        let first_label = self.y[first];
        let all_same = samples.iter().all(|&i| self.y[i] == first_label);
        if all_same || depth >= self.max_depth {
            return TreeNode::Leaf {
                value: self.majority(samples),
            };
        }

        // Strict comparison: the lowest feature index wins equal gains.
        let mut best_gain = -1.0;
        let mut best_feature = None;
        for feature in 0..self.n_features {
            let gain = information_gain(self.bins, self.y, samples, feature);
            if gain > best_gain {
                best_gain = gain;
                best_feature = Some(feature);
            }
        }

        let feature_idx = match best_feature {
            Some(f) if best_gain > 0.0 => f,
            _ => {
                return TreeNode::Leaf {
                    value: self.majority(samples),
                }
            }
        };

        let children = partition(self.bins, samples, feature_idx)
            .into_iter()
            .map(|(bin, subset)| (bin, self.build(&subset, depth + 1)))
            .collect();

        TreeNode::Split {
            feature_idx,
            children,
            fallback: self.majority(samples),
        }
    }
}

fn discretize(row: &[f64], edges: &[Vec<f64>]) -> Vec<usize> {
    row.iter().zip(edges).map(|(&v, e)| find_bin(v, e)).collect()
}

fn fit_tree(x: &Matrix, y: &[f64], params: DecisionTreeParams) -> (TreeNode, Vec<Vec<f64>>) {
    let edges: Vec<Vec<f64>> = (0..x.cols())
        .map(|j| compute_bin_edges(x.column(j), params.n_bins))
        .collect();
    let bins: Vec<Vec<usize>> = x.iter_rows().map(|row| discretize(row, &edges)).collect();

    let builder = TreeBuilder {
        bins: &bins,
        y,
        n_features: x.cols(),
        max_depth: params.max_depth,
    };
    let samples: Vec<usize> = (0..x.rows()).collect();
    (builder.build(&samples, 0), edges)
}

impl Model for DecisionTree {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()> {
        let params = self.params;
        let (root, edges) = self
            .lifecycle
            .fit(NAME, x, y, |x, y| Ok(fit_tree(x, y, params)))?;
        debug!(depth = root.depth(), leaves = root.n_leaves(), "decision tree built");
        self.root = Some(root);
        self.bin_edges = edges;
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.lifecycle.check_input("predict", x)?;
        let root = self.root.as_ref().ok_or(MlError::NotFitted("predict"))?;
        Ok(x
            .iter_rows()
            .map(|row| root.predict(&discretize(row, &self.bin_edges)))
            .collect())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn task(&self) -> TaskType {
        TaskType::Classification
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use minilearn_metrics::ACCURACY;

    #[test]
    fn test_entropy() {
        let y = [0.0, 0.0, 1.0, 1.0];
        assert_abs_diff_eq!(entropy(&y, &[0, 1, 2, 3]), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(entropy(&y, &[0, 1]), 0.0, epsilon = 1e-12);
        assert_eq!(entropy(&y, &[]), 0.0);
    }

    #[test]
    fn test_separable_training_accuracy() {
        let x = Matrix::from_rows(&[vec![0.0], vec![0.0], vec![10.0], vec![10.0]]).unwrap();
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let mut tree = DecisionTree::new(usize::MAX, 16).unwrap();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_abs_diff_eq!(tree.score(&x, &y).unwrap().get_metric(ACCURACY), 1.0, epsilon = 1e-12);
        assert_eq!(tree.depth(), Some(1));
        assert_eq!(tree.n_leaves(), Some(2));
    }

    #[test]
    fn test_unseen_bin_returns_node_majority() {
        // Edges 0,1,...,10: training values land in bins 0 and 9 only.
        let x = Matrix::from_rows(&[vec![0.0], vec![0.0], vec![0.0], vec![10.0]]).unwrap();
        let y = vec![1.0, 1.0, 1.0, 0.0];
        let mut tree = DecisionTree::new(5, 10).unwrap();
        tree.fit(&x, &y).unwrap();

        // 5.0 falls into bin 4, which has no child at the root.
        let pred = tree.predict(&Matrix::column_vector(&[5.0])).unwrap();
        assert_eq!(pred, vec![1.0]);
    }

    #[test]
    fn test_prediction_uses_training_bin_edges() {
        let x = Matrix::from_rows(&[vec![0.0], vec![0.0], vec![10.0], vec![10.0]]).unwrap();
        let mut tree = DecisionTree::new(usize::MAX, 16).unwrap();
        tree.fit(&x, &[0.0, 0.0, 1.0, 1.0]).unwrap();
        let edges = tree.bin_edges().to_vec();

        // Alone, 10.0 would be a constant column; training edges put it in the last bin.
        let pred = tree.predict(&Matrix::column_vector(&[10.0])).unwrap();
        assert_eq!(pred, vec![1.0]);
        assert_eq!(tree.bin_edges(), edges.as_slice());
    }

    #[test]
    fn test_constant_feature_never_split() {
        let x = Matrix::from_rows(&[
            vec![7.0, 0.0],
            vec![7.0, 1.0],
            vec![7.0, 9.0],
            vec![7.0, 10.0],
        ])
        .unwrap();
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let mut tree = DecisionTree::default();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.bin_edges()[0], vec![7.0]);
        match tree.root().unwrap() {
            TreeNode::Split { feature_idx, .. } => assert_eq!(*feature_idx, 1),
            leaf => panic!("expected a split, got {leaf:?}"),
        }
        assert_eq!(tree.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_only_constant_features_gives_majority_leaf() {
        let x = Matrix::from_rows(&[vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        let mut tree = DecisionTree::default();
        tree.fit(&x, &[2.0, 3.0, 3.0]).unwrap();
        assert_eq!(tree.root(), Some(&TreeNode::Leaf { value: 3.0 }));
    }

    #[test]
    fn test_max_depth_zero_is_single_leaf() {
        let x = Matrix::from_rows(&[vec![0.0], vec![0.0], vec![10.0]]).unwrap();
        let mut tree = DecisionTree::new(0, 4).unwrap();
        tree.fit(&x, &[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(tree.depth(), Some(0));
        assert_eq!(tree.predict(&x).unwrap(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_majority_leaf_tie_lowest_label() {
        let x = Matrix::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        let mut tree = DecisionTree::new(0, 4).unwrap();
        tree.fit(&x, &[1.0, 0.0]).unwrap();
        assert_eq!(tree.root(), Some(&TreeNode::Leaf { value: 0.0 }));
    }

    #[test]
    fn test_invalid_bins_rejected() {
        assert!(matches!(
            DecisionTree::new(3, 0),
            Err(MlError::InvalidHyperparameter { name: "n_bins", .. })
        ));
    }

    #[test]
    fn test_not_fitted() {
        let tree = DecisionTree::default();
        let x = Matrix::column_vector(&[1.0]);
        assert_eq!(tree.predict(&x), Err(MlError::NotFitted("predict")));
        assert_eq!(tree.depth(), None);
    }
}
