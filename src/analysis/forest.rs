use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use crate::analysis::AnalysisError;
#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Class distribution of the training samples that reached the leaf.
    Leaf { proba: Vec<f64> },
}
/// A single CART classification tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    n_classes: usize,
}
struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    n_classes: usize,
    max_features: usize,
    max_depth: Option<usize>,
    rng: StdRng,
}
impl TreeBuilder<'_> {
    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }
    fn build(&mut self, indices: &[usize], depth: usize) -> Node {
        let counts = self.class_counts(indices);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let at_limit = self.max_depth.is_some_and(|d| depth >= d);
        if pure || at_limit || indices.len() < 2 {
            return leaf(&counts);
        }
        let Some((feature, threshold)) = self.best_split(indices, &counts) else {
            return leaf(&counts);
        };
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[[i, feature]] <= threshold);
        if left.is_empty() || right.is_empty() {
            return leaf(&counts);
        }
        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(&left, depth + 1)),
            right: Box::new(self.build(&right, depth + 1)),
        }
    }
    /// Best `(feature, threshold)` over a random subset of features, or
    /// `None` when no split lowers the impurity. Keeps drawing features past
    /// `max_features` until at least one valid split is found.
    fn best_split(&mut self, indices: &[usize], counts: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let parent = gini(counts, indices.len());
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut self.rng);
        let mut best: Option<(usize, f64, f64)> = None;
        for (drawn, &feature) in features.iter().enumerate() {
            if drawn >= self.max_features && best.is_some() {
                break;
            }
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));
            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();
            for pos in 1..order.len() {
                let moved = self.y[order[pos - 1]];
                left[moved] += 1;
                right[moved] -= 1;
                let lo = self.x[[order[pos - 1], feature]];
                let hi = self.x[[order[pos], feature]];
                if hi <= lo {
                    continue;
                }
                let weighted = (pos as f64 * gini(&left, pos)
                    + (n - pos as f64) * gini(&right, order.len() - pos))
                    / n;
                let gain = parent - weighted;
                if gain > 1e-12 && best.map_or(true, |(_, _, g)| gain > g) {
                    best = Some((feature, lo + (hi - lo) / 2.0, gain));
                }
            }
        }
        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}
fn leaf(counts: &[usize]) -> Node {
    let total = counts.iter().sum::<usize>().max(1) as f64;
    Node::Leaf {
        proba: counts.iter().map(|&c| c as f64 / total).collect(),
    }
}
impl DecisionTree {
    fn proba(&self, sample: ArrayView1<f64>) -> &[f64] {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}
/// Ensemble of bootstrap-trained [`DecisionTree`]s.
///
/// CART trees split on Gini impurity with `sqrt(n_features)` candidate
/// features per split; prediction averages the leaf class distributions.
/// With warm start, [`RandomForest::fit`] after raising `n_estimators` keeps
/// the grown trees and only adds the missing ones. Tree `i` is seeded from
/// `random_state + i`, so growing one tree at a time matches a single fit.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_estimators: usize,
    random_state: u64,
    warm_start: bool,
    max_depth: Option<usize>,
    n_classes: usize,
}
impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            random_state: 0,
            warm_start: false,
            max_depth: None,
            n_classes: 0,
        }
    }
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
    pub fn set_n_estimators(&mut self, n_estimators: usize) {
        self.n_estimators = n_estimators;
    }
    /// Number of trees actually grown.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
    #[cfg(test)]
    fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<(), AnalysisError> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(AnalysisError::Training(format!(
                "{} feature rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        if n_samples == 0 {
            return Err(AnalysisError::Training("cannot fit on zero samples".into()));
        }
        let n_classes = y.iter().copied().max().unwrap_or(0) + 1;
        if !self.warm_start || n_classes != self.n_classes {
            self.trees.clear();
        }
        if self.n_estimators < self.trees.len() {
            return Err(AnalysisError::Training(format!(
                "n_estimators={} is below the {} trees already grown",
                self.n_estimators,
                self.trees.len()
            )));
        }
        if self.n_estimators == self.trees.len() {
            log::debug!("warm start: no new trees to grow");
        }
        self.n_classes = n_classes;
        let max_features = ((x.ncols() as f64).sqrt() as usize).max(1);
        for i in self.trees.len()..self.n_estimators {
            let mut rng = StdRng::seed_from_u64(self.random_state.wrapping_add(i as u64));
            let bootstrap: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let mut builder = TreeBuilder {
                x,
                y,
                n_classes,
                max_features,
                max_depth: self.max_depth,
                rng,
            };
            let root = builder.build(&bootstrap, 0);
            self.trees.push(DecisionTree { root, n_classes });
        }
        Ok(())
    }
    /// Mean class distribution across trees, one row per sample.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut proba = Array2::zeros((x.nrows(), self.n_classes));
        if self.trees.is_empty() {
            return proba;
        }
        for (i, sample) in x.outer_iter().enumerate() {
            for tree in &self.trees {
                for (c, p) in tree.proba(sample).iter().enumerate().take(tree.n_classes) {
                    proba[[i, c]] += p;
                }
            }
        }
        proba / self.trees.len() as f64
    }
    pub fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        self.predict_proba(x)
            .outer_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::MIN), |best, (c, &p)| if p > best.1 { (c, p) } else { best })
                    .0
            })
            .collect()
    }
    /// Fraction of samples predicted correctly.
    pub fn score(&self, x: &Array2<f64>, y: &[usize]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let correct = self
            .predict(x)
            .iter()
            .zip(y)
            .filter(|(pred, truth)| pred == truth)
            .count();
        correct as f64 / y.len() as f64
    }
}
