use super::{
    ClassProbabilities, Classifier, ClassifierError, ParameterError, PlacementClass,
    ProbabilisticClassifier,
};
use crate::placement::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// One node of a flattened binary decision tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights `[negative, positive]` observed at this leaf.
    Leaf { value: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Result<Self, ParameterError> {
        let tree = Self { nodes };
        tree.validate()?;
        Ok(tree)
    }

    /// Children must point strictly forward, which also rules out cycles.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.nodes.is_empty() {
            return Err(ParameterError::EmptyTree);
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ParameterError::FeatureOutOfRange {
                            node: index,
                            feature: *feature,
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(ParameterError::NonFinite {
                            parameter: "threshold",
                        });
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(ParameterError::InvalidChild { node: index, child });
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let valid = value.iter().all(|weight| weight.is_finite() && *weight >= 0.0)
                        && value.iter().sum::<f64>() > 0.0;
                    if !valid {
                        return Err(ParameterError::InvalidLeaf(index));
                    }
                }
            }
        }

        Ok(())
    }

    fn leaf_for(&self, features: &FeatureVector) -> Result<[f64; 2], ClassifierError> {
        let values = features.as_slice();
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = values.get(*feature).ok_or(ClassifierError::DimensionMismatch {
                        expected: FEATURE_COUNT,
                        found: values.len(),
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => return Err(ClassifierError::MissingNode(index)),
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, features: &FeatureVector) -> Result<PlacementClass, ClassifierError> {
        Ok(self.predict_proba(features)?.most_likely())
    }
}

impl ProbabilisticClassifier for DecisionTree {
    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError> {
        let [negative, positive] = self.leaf_for(features)?;
        let total = negative + positive;
        Ok(ClassProbabilities::new(negative / total, positive / total))
    }
}
