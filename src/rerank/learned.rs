//! Gradient-boosted tree ensemble exported as JSON.
//!
//! ```json
//! {
//!   "feature_names": ["semantic_score", "blend_score", "..."],
//!   "base_score": -0.4,
//!   "trees": [
//!     { "nodes": [
//!       { "feature": 3, "threshold": 0.5, "left": 1, "right": 2, "missing_left": true },
//!       { "leaf": -0.21 },
//!       { "leaf": 0.37 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A sample goes left when its value is below `threshold`; NaN follows
//! `missing_left`. The score is `sigmoid(base_score + sum of reached leaves)`.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::features::{FEATURE_DIM, FeatureSchema, FeatureVector};

use super::error::RerankError;
use super::{RerankInput, ScoredCandidate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        leaf: f32,
    },
}

fn default_missing_left() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, tree_index: usize) -> Result<(), RerankError> {
        if self.nodes.is_empty() {
            return Err(RerankError::InvalidModel {
                reason: format!("tree {tree_index} has no nodes"),
            });
        }
        let count = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            let Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            else {
                continue;
            };
            if *feature >= FEATURE_DIM {
                return Err(RerankError::InvalidModel {
                    reason: format!("tree {tree_index} node {i}: feature {feature} out of range"),
                });
            }
            if !threshold.is_finite() {
                return Err(RerankError::InvalidModel {
                    reason: format!("tree {tree_index} node {i}: non-finite threshold"),
                });
            }
            // Children after their parent: every walk terminates.
            for child in [*left, *right] {
                if child <= i || child >= count {
                    return Err(RerankError::InvalidModel {
                        reason: format!("tree {tree_index} node {i}: child {child} out of range"),
                    });
                }
            }
        }
        Ok(())
    }

    fn predict(&self, features: &[f32]) -> f32 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let value = features[*feature];
                    let go_left = if value.is_nan() {
                        *missing_left
                    } else {
                        value < *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeEnsemble {
    pub feature_names: Vec<String>,
    /// Initial margin, before the sigmoid.
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), RerankError> {
        FeatureSchema.validate(self.feature_names.as_slice())?;
        if !self.base_score.is_finite() {
            return Err(RerankError::InvalidModel {
                reason: "non-finite base_score".to_string(),
            });
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }

    /// Relevance probability in (0, 1).
    pub fn predict(&self, features: &FeatureVector) -> f32 {
        let values = features.as_slice();
        let margin = self.base_score + self.trees.iter().map(|t| t.predict(values)).sum::<f32>();
        sigmoid(margin)
    }
}

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Scores candidates with a validated [`TreeEnsemble`].
#[derive(Debug, Clone)]
pub struct LearnedReranker {
    model: TreeEnsemble,
}

impl LearnedReranker {
    pub fn new(model: TreeEnsemble) -> Result<Self, RerankError> {
        model.validate()?;
        Ok(Self { model })
    }

    pub fn from_json(json: &str) -> Result<Self, RerankError> {
        let model: TreeEnsemble =
            serde_json::from_str(json).map_err(|e| RerankError::InvalidModel {
                reason: e.to_string(),
            })?;
        Self::new(model)
    }

    pub fn load(path: &Path) -> Result<Self, RerankError> {
        let bytes = std::fs::read(path).map_err(|source| RerankError::ModelIo {
            path: path.to_path_buf(),
            source,
        })?;
        let model: TreeEnsemble =
            serde_json::from_slice(&bytes).map_err(|source| RerankError::ModelParse {
                path: path.to_path_buf(),
                source,
            })?;
        let reranker = Self::new(model)?;
        info!(
            path = %path.display(),
            trees = reranker.model.trees.len(),
            "Loaded ranking model"
        );
        Ok(reranker)
    }

    pub fn model(&self) -> &TreeEnsemble {
        &self.model
    }

    pub fn score_all(&self, input: &RerankInput<'_>) -> Vec<ScoredCandidate> {
        input
            .items
            .iter()
            .map(|item| ScoredCandidate {
                candidate: item.candidate.clone(),
                score: self.model.predict(&item.features),
            })
            .collect()
    }
}
