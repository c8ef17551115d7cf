//! Isolation forest
//!
//! Outliers are easier to isolate with random axis-aligned splits, so they
//! end up with shorter average path lengths across the trees. Scores follow
//! the usual `2^(-E[h(x)] / c(psi))` normalization.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ForestConfig, OutlierModel};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Isolation forest trained on presumed-normal feature vectors.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    config: ForestConfig,
    trees: Vec<Tree>,
    /// Normalization factor c(psi) for the subsample size actually used.
    normalizer: f64,
    trained: bool,
}

impl IsolationForest {
    /// Create an unfitted forest.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            normalizer: 0.0,
            trained: false,
        }
    }

    /// Create an unfitted forest with default hyperparameters.
    pub fn with_defaults() -> Self {
        Self::new(ForestConfig::default())
    }

    /// Configured anomaly score threshold.
    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Number of fitted trees.
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Expected unsuccessful-search path length in a BST of `n` nodes.
    ///
    /// This is the c(n) term from the isolation forest paper, used both to
    /// normalize scores and to credit unexpanded leaves for the subtree they
    /// would have grown into.
    fn expected_path_length(n: usize) -> f64 {
        if n <= 1 {
            return 0.0;
        }
        let n = n as f64;
        2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl OutlierModel for IsolationForest {
    fn fit(&mut self, data: &[Vec<f64>]) {
        self.trees.clear();
        self.trained = false;

        if data.is_empty() || data[0].is_empty() {
            return;
        }

        let mut rng = self.rng();
        let n_features = data[0].len();
        let psi = self.config.sample_size.min(data.len());
        // Trees stop growing once a subsample of psi points would be
        // expected to be fully isolated.
        let max_depth = (psi as f64).log2().ceil() as usize;

        self.normalizer = Self::expected_path_length(psi);

        for _ in 0..self.config.num_trees {
            let subsample = rand::seq::index::sample(&mut rng, data.len(), psi).into_vec();
            self.trees
                .push(Tree::grow(data, subsample, n_features, max_depth, &mut rng));
        }

        self.trained = true;
    }

    fn score(&self, sample: &[f64]) -> f64 {
        if !self.trained || self.normalizer == 0.0 {
            return 0.5;
        }

        let total: f64 = self.trees.iter().map(|t| t.path_length(sample)).sum();
        let mean_path = total / self.trees.len() as f64;

        2.0_f64.powf(-mean_path / self.normalizer)
    }

    fn is_anomalous(&self, sample: &[f64]) -> bool {
        self.score(sample) >= self.config.threshold
    }

    fn is_trained(&self) -> bool {
        self.trained
    }

    fn name(&self) -> &str {
        "isolation_forest"
    }
}

/// A single isolation tree over a subsample of the training data.
#[derive(Debug, Clone)]
struct Tree {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

impl Tree {
    fn grow(
        data: &[Vec<f64>],
        subsample: Vec<usize>,
        n_features: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            root: Self::grow_node(data, subsample, n_features, 0, max_depth, rng),
        }
    }

    fn grow_node(
        data: &[Vec<f64>],
        indices: Vec<usize>,
        n_features: usize,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        if depth >= max_depth || indices.len() <= 1 {
            return Node::Leaf {
                size: indices.len(),
            };
        }

        // Only features with spread can be split; constant partitions
        // terminate early.
        let splittable: Vec<(usize, f64, f64)> = (0..n_features)
            .filter_map(|f| {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for &i in &indices {
                    let v = data[i][f];
                    min = min.min(v);
                    max = max.max(v);
                }
                (max > min).then_some((f, min, max))
            })
            .collect();

        if splittable.is_empty() {
            return Node::Leaf {
                size: indices.len(),
            };
        }
        let (feature, min, max) = splittable[rng.gen_range(0..splittable.len())];

        let value = rng.gen_range(min..max);
        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| data[i][feature] < value);

        Node::Split {
            feature,
            value,
            left: Box::new(Self::grow_node(data, left, n_features, depth + 1, max_depth, rng)),
            right: Box::new(Self::grow_node(
                data,
                right,
                n_features,
                depth + 1,
                max_depth,
                rng,
            )),
        }
    }

    fn path_length(&self, sample: &[f64]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;

        loop {
            match node {
                Node::Leaf { size } => {
                    return depth as f64 + IsolationForest::expected_path_length(*size);
                }
                Node::Split {
                    feature,
                    value,
                    left,
                    right,
                } => {
                    let v = sample.get(*feature).copied().unwrap_or(0.0);
                    node = if v < *value { left.as_ref() } else { right.as_ref() };
                    depth += 1;
                }
            }
        }
    }
}
