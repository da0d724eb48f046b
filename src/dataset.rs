use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::linear_algebra::Vector;

/// A labeled training or test example: a normalized input vector paired
/// with a one-hot target. Immutable once created.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Sample {
    pub input: Vector,
    pub target: Vector,
}

impl Sample {
    pub fn new(input: Vector, target: Vector) -> Self {
        Self { input, target }
    }

    /// Builds a classification sample, one-hot encoding `class` out of
    /// `classes` as the target.
    pub fn labeled(input: Vector, class: usize, classes: usize) -> Result<Self, NetworkError> {
        Ok(Self {
            input,
            target: Vector::one_hot(classes, class)?,
        })
    }
}

/// Source of labeled samples. Implementations own loading and normalization;
/// shuffling and batching belong to the training loop.
pub trait DatasetProvider {
    fn training_set(&self) -> Vec<Sample>;
    fn test_set(&self) -> Vec<Sample>;
}

/// A provider over samples already held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataset {
    pub training: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl InMemoryDataset {
    pub fn new(training: Vec<Sample>, test: Vec<Sample>) -> Self {
        Self { training, test }
    }
}

impl DatasetProvider for InMemoryDataset {
    fn training_set(&self) -> Vec<Sample> {
        self.training.clone()
    }

    fn test_set(&self) -> Vec<Sample> {
        self.test.clone()
    }
}
