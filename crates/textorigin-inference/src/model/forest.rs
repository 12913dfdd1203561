use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    #[error("failed to decode classifier artifact")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("failed to encode classifier artifact")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("forest has no trees")]
    Empty,
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },
    #[error("tree {tree} node {node}: distribution has {got} entries, expected {expected}")]
    DistributionWidth {
        tree: usize,
        node: usize,
        got: usize,
        expected: usize,
    },
    #[error("tree {tree} node {node}: feature index {feature} out of range for {n_features} features")]
    FeatureRange {
        tree: usize,
        node: usize,
        feature: u32,
        n_features: usize,
    },
    #[error("tree {tree} node {node}: child index {child} must point to a later node (tree has {len})")]
    ChildRange {
        tree: usize,
        node: usize,
        child: u32,
        len: usize,
    },
}

/// One node of a decision tree, stored flat. Children are indices into the
/// owning tree's node list.
#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum TreeNode {
    Split {
        feature: u32,
        threshold: f64,
        left: u32,
        right: u32,
        /// Class weights of the training samples that reached this node.
        distribution: Vec<f64>,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

impl TreeNode {
    fn distribution(&self) -> &[f64] {
        match self {
            Self::Split { distribution, .. } | Self::Leaf { distribution } => distribution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf. `x[feature] <= threshold` goes left.
    fn leaf_distribution(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if features[*feature as usize] <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
            }
        }
    }

    /// Decision-path attribution for one class: at every split on the way
    /// down, the change in the class's share between the node and the child
    /// taken is credited to the split feature.
    fn accumulate_path_attributions(&self, features: &[f64], class_idx: usize, acc: &mut [f64]) {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { .. } => return,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    distribution,
                } => {
                    let next = if features[*feature as usize] <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                    let before = class_share(distribution, class_idx);
                    let after = class_share(self.nodes[next].distribution(), class_idx);
                    acc[*feature as usize] += after - before;
                    idx = next;
                }
            }
        }
    }
}

/// Share of one class in a node's (unnormalised) class weights.
fn class_share(distribution: &[f64], class_idx: usize) -> f64 {
    let total: f64 = distribution.iter().sum();
    if total > 0.0 {
        distribution[class_idx] / total
    } else {
        0.0
    }
}

/// An ensemble of axis-aligned decision trees with per-node class weights.
///
/// `predict_proba` averages the normalised leaf distributions over all
/// trees. Because every node carries its class weights, the ensemble can
/// also explain itself through decision-path attribution, which the
/// explanation engine consumes.
#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl ForestClassifier {
    /// Validate and assemble an ensemble. Every child index must point to
    /// a later node in its tree, which makes traversal terminate and forces
    /// every path to end at a leaf.
    pub fn new(
        trees: Vec<DecisionTree>,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ForestError> {
        if trees.is_empty() {
            return Err(ForestError::Empty);
        }
        for (tree_idx, tree) in trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ForestError::EmptyTree { tree: tree_idx });
            }
            let len = tree.nodes.len();
            for (node_idx, node) in tree.nodes.iter().enumerate() {
                let distribution = node.distribution();
                if distribution.len() != n_classes {
                    return Err(ForestError::DistributionWidth {
                        tree: tree_idx,
                        node: node_idx,
                        got: distribution.len(),
                        expected: n_classes,
                    });
                }
                if let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature as usize >= n_features {
                        return Err(ForestError::FeatureRange {
                            tree: tree_idx,
                            node: node_idx,
                            feature: *feature,
                            n_features,
                        });
                    }
                    for &child in [left, right] {
                        if child as usize <= node_idx || child as usize >= len {
                            return Err(ForestError::ChildRange {
                                tree: tree_idx,
                                node: node_idx,
                                child,
                                len,
                            });
                        }
                    }
                }
            }
        }
        debug!(
            num_trees = trees.len(),
            n_features, n_classes, "ForestClassifier assembled"
        );
        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean of the normalised leaf distributions over all trees.
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut probs = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_distribution(features);
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (acc, weight) in probs.iter_mut().zip(leaf) {
                    *acc += weight / total;
                }
            }
        }
        let scale = 1.0 / self.trees.len() as f64;
        for p in &mut probs {
            *p *= scale;
        }
        probs
    }

    /// Per-feature decision-path attributions for `class_idx`, averaged
    /// over trees. `class_idx` must be below `n_classes`.
    pub fn class_attributions(&self, features: &[f64], class_idx: usize) -> Vec<f64> {
        let mut acc = vec![0.0; self.n_features];
        for tree in &self.trees {
            tree.accumulate_path_attributions(features, class_idx, &mut acc);
        }
        let scale = 1.0 / self.trees.len() as f64;
        for a in &mut acc {
            *a *= scale;
        }
        acc
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ForestError> {
        let (decoded, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        // Re-validate: the bytes may come from anywhere.
        Self::new(decoded.trees, decoded.n_features, decoded.n_classes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ForestError> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }
}
