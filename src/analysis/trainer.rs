use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use crate::analysis::dataset::MergedDataset;
use crate::analysis::forest::RandomForest;
use crate::analysis::AnalysisError;
use crate::config::TrainingConfig;
/// Train/test partition of a merged dataset.
#[derive(Clone, Debug)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Vec<usize>,
    pub x_test: Array2<f64>,
    pub y_test: Vec<usize>,
}
/// Accuracy after each growth round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingHistory {
    pub trees: Vec<usize>,
    pub train: Vec<f64>,
    pub test: Vec<f64>,
}
impl TrainingHistory {
    pub fn len(&self) -> usize {
        self.trees.len()
    }
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
/// Shuffle row indices with `seed` and hold out `ceil(test_fraction * n)`.
pub fn train_test_split(
    data: &MergedDataset,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, AnalysisError> {
    if data.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    let n = data.len();
    let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n);
    if n_test == 0 || n_test == n {
        return Err(AnalysisError::Training(format!(
            "cannot hold out {n_test} of {n} rows"
        )));
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test_idx, train_idx) = order.split_at(n_test);
    Ok(Split {
        x_train: data.features.select(Axis(0), train_idx),
        y_train: train_idx.iter().map(|&i| data.labels[i]).collect(),
        x_test: data.features.select(Axis(0), test_idx),
        y_test: test_idx.iter().map(|&i| data.labels[i]).collect(),
    })
}
/// Grow a warm-started forest one tree per round, scoring after each.
///
/// `on_round` sees `(round, train_acc, test_acc)` as soon as a round ends.
pub fn train_incrementally<F>(
    split: &Split,
    config: &TrainingConfig,
    mut on_round: F,
) -> Result<TrainingHistory, AnalysisError>
where
    F: FnMut(usize, f64, f64),
{
    let mut forest = RandomForest::new(1)
        .with_random_state(config.seed)
        .with_warm_start(true);
    if let Some(depth) = config.max_depth {
        forest = forest.with_max_depth(depth);
    }
    let mut history = TrainingHistory::default();
    for round in 1..=config.rounds {
        forest.set_n_estimators(round);
        forest.fit(&split.x_train, &split.y_train)?;
        let train_acc = forest.score(&split.x_train, &split.y_train);
        let test_acc = forest.score(&split.x_test, &split.y_test);
        history.trees.push(forest.n_trees());
        history.train.push(train_acc);
        history.test.push(test_acc);
        on_round(round, train_acc, test_acc);
    }
    Ok(history)
}
/// Whether a round gets a row in the console table.
pub fn is_report_round(round: usize, every: usize) -> bool {
    round == 1 || (every > 0 && round % every == 0)
}
