//! Random forest of axis-aligned decision trees

use crate::estimator::Estimator;
use crate::vectorizer::FeatureVector;
use reviewcheck_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// One node of a serialized decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes to `left`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },

    /// Per-class sample counts (or weights) that reached this leaf
    Leaf { value: Vec<f64> },
}

/// Serialized tree: node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Vec<f64>),
}

/// Validated decision tree with normalized leaf distributions
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Validate a tree. Children must come after their parent, which
    /// rules out cycles and guarantees traversal terminates.
    pub fn from_spec(spec: TreeSpec, n_features: usize, n_classes: usize) -> Result<Self> {
        if spec.nodes.is_empty() {
            return Err(Error::artifact("decision tree has no nodes"));
        }

        let len = spec.nodes.len();
        let mut nodes = Vec::with_capacity(len);

        for (idx, node) in spec.nodes.into_iter().enumerate() {
            let node = match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(Error::artifact(format!(
                            "node {idx} splits on feature {feature}, n_features = {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(Error::artifact(format!("node {idx} threshold is not finite")));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(Error::artifact(format!(
                                "node {idx} has invalid child index {child}"
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(Error::artifact(format!(
                            "leaf {idx} has {} values, expected {n_classes}",
                            value.len()
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(Error::artifact(format!(
                            "leaf {idx} has negative or non-finite values"
                        )));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(Error::artifact(format!("leaf {idx} is empty")));
                    }
                    Node::Leaf(value.iter().map(|v| v / total).collect())
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Class distribution of the leaf `x` lands in
    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(dist) => return dist,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Averaged ensemble of decision trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    pub fn new(trees: Vec<TreeSpec>, n_features: usize, n_classes: usize) -> Result<Self> {
        if trees.is_empty() {
            return Err(Error::artifact("random forest has no trees"));
        }
        let trees = trees
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                DecisionTree::from_spec(spec, n_features, n_classes)
                    .map_err(|e| Error::artifact(format!("tree {i}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { trees, n_classes })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Estimator for RandomForest {
    fn predict_index(&self, x: &FeatureVector) -> usize {
        let proba = self.predict_proba(x);
        // First maximum wins ties
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        best
    }

    fn predict_proba(&self, x: &FeatureVector) -> Vec<f64> {
        let dense = x.to_dense();
        let mut sum = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.leaf(&dense)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        sum.into_iter().map(|s| s / n).collect()
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{TfidfVectorizer, VectorizerSpec};

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer::from_spec(VectorizerSpec {
            vocabulary: [("bot".to_string(), 0), ("love".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: None,
            sublinear_tf: false,
            norm: None,
        })
        .unwrap()
    }

    fn stump(feature: usize, below: [f64; 2], above: [f64; 2]) -> TreeSpec {
        TreeSpec {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    value: below.to_vec(),
                },
                TreeNode::Leaf {
                    value: above.to_vec(),
                },
            ],
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForest::new(
            vec![
                stump(0, [1.0, 3.0], [8.0, 0.0]),
                stump(1, [2.0, 2.0], [0.0, 10.0]),
            ],
            2,
            2,
        )
        .unwrap();

        let x = vectorizer().transform(&["bot"]);
        // tree 0: [1, 0]; tree 1: [0.5, 0.5]
        assert_eq!(forest.predict_proba(&x), vec![0.75, 0.25]);
        assert_eq!(forest.predict_index(&x), 0);

        let x = vectorizer().transform(&["love"]);
        // tree 0: [0.25, 0.75]; tree 1: [0, 1]
        assert_eq!(forest.predict_proba(&x), vec![0.125, 0.875]);
        assert_eq!(forest.predict_index(&x), 1);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let forest = RandomForest::new(
            vec![TreeSpec {
                nodes: vec![TreeNode::Leaf {
                    value: vec![5.0, 5.0],
                }],
            }],
            2,
            2,
        )
        .unwrap();
        let x = vectorizer().transform::<&str>(&[]);
        assert_eq!(forest.predict_index(&x), 0);
    }

    #[test]
    fn test_rejects_backward_child() {
        let spec = TreeSpec {
            nodes: vec![
                TreeNode::Leaf {
                    value: vec![1.0, 0.0],
                },
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 0,
                    right: 0,
                },
            ],
        };
        assert!(DecisionTree::from_spec(spec, 2, 2).is_err());
    }

    #[test]
    fn test_rejects_bad_leaf_and_feature() {
        assert!(DecisionTree::from_spec(stump(5, [1.0, 0.0], [0.0, 1.0]), 2, 2).is_err());
        assert!(DecisionTree::from_spec(stump(0, [0.0, 0.0], [0.0, 1.0]), 2, 2).is_err());
        assert!(RandomForest::new(vec![], 2, 2).is_err());
    }
}
