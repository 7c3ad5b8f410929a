use crate::network::{Adam, FitParams};
use crate::smote::Smote;
use serde::{Deserialize, Serialize};

/// Knobs of the training stage. The defaults reproduce the reference model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub test_ratio: f64,
    pub seed: u64,
    pub k_neighbors: usize,
    pub hidden_units: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            test_ratio: 0.3,
            seed: 42,
            k_neighbors: 5,
            hidden_units: 16,
            learning_rate: 0.001,
            epochs: 100,
            batch_size: 32,
        }
    }
}

impl PipelineConfig {
    /// Oversampler settings for the training partition.
    pub fn smote(&self) -> Smote {
        Smote {
            k_neighbors: self.k_neighbors,
            seed: self.seed,
        }
    }

    /// Network training settings.
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            epochs: self.epochs,
            batch_size: self.batch_size,
            optimizer: Adam {
                learning_rate: self.learning_rate,
                ..Adam::default()
            },
        }
    }
}
