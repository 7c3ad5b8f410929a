use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A helper type for holding train/test splits.
#[derive(Debug)]
pub struct DatasetSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffles a dataset with a seeded RNG and splits it into train and test sets.
///
/// The test set takes `ceil(len * test_ratio)` items, the train set the rest.
pub fn train_test_split<T: Clone>(data: &[T], test_ratio: f64, seed: u64) -> DatasetSplit<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = data.to_vec();
    data.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio).ceil() as usize;
    let train = data.split_off(test_size.min(data.len()));

    DatasetSplit { train, test: data }
}
