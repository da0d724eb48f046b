use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activation::{sigmoid, sigmoid_prime};
use crate::dataset::{DatasetProvider, Sample};
use crate::error::NetworkError;
use crate::evaluation::{evaluate, Accuracy};
use crate::linear_algebra::{Matrix, Value, Vector};

/// A fully-connected feedforward network. `weights[l]` is shaped
/// `sizes[l + 1] × sizes[l]` and `biases[l]` has length `sizes[l + 1]`;
/// the shapes are validated at construction and never change.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Network {
    sizes: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Vector>,
}

/// Per-parameter gradient sums for one mini-batch, accumulated apart from
/// the live parameters so a failed sample never leaves a partial update.
struct Gradients {
    weights: Vec<Matrix>,
    biases: Vec<Vector>,
}

impl Gradients {
    fn zeros_like(network: &Network) -> Self {
        Self {
            weights: network
                .weights
                .iter()
                .map(|w| Matrix::zeros(w.rows(), w.cols()))
                .collect(),
            biases: network.biases.iter().map(|b| Vector::zeros(b.len())).collect(),
        }
    }
}

impl Network {
    /// Builds a network with standard-normal initial weights and biases
    /// drawn from `rng`. Seed the generator for reproducible parameters.
    pub fn random(sizes: &[usize], rng: &mut impl Rng) -> Result<Self, NetworkError> {
        Self::check_topology(sizes)?;

        let normal = Normal::new(0.0, 1.0).unwrap();

        let mut weights = Vec::with_capacity(sizes.len() - 1);
        let mut biases = Vec::with_capacity(sizes.len() - 1);
        for boundary in sizes.windows(2) {
            let (inputs, outputs) = (boundary[0], boundary[1]);
            weights.push(Matrix::from_fn(outputs, inputs, || normal.sample(rng)));
            biases.push(Vector::from_values(
                (0..outputs).map(|_| normal.sample(rng)).collect(),
            ));
        }

        Ok(Self {
            sizes: sizes.to_vec(),
            weights,
            biases,
        })
    }

    /// Builds a network from explicit parameters, validating every shape
    /// against the topology.
    pub fn with_parameters(
        sizes: Vec<usize>,
        weights: Vec<Matrix>,
        biases: Vec<Vector>,
    ) -> Result<Self, NetworkError> {
        Self::check_topology(&sizes)?;

        if weights.len() != sizes.len() - 1 {
            return Err(NetworkError::ShapeMismatch {
                expected: sizes.len() - 1,
                actual: weights.len(),
            });
        }
        if biases.len() != sizes.len() - 1 {
            return Err(NetworkError::ShapeMismatch {
                expected: sizes.len() - 1,
                actual: biases.len(),
            });
        }

        for (l, (w, b)) in weights.iter().zip(&biases).enumerate() {
            if w.rows() != sizes[l + 1] {
                return Err(NetworkError::ShapeMismatch {
                    expected: sizes[l + 1],
                    actual: w.rows(),
                });
            }
            if w.cols() != sizes[l] {
                return Err(NetworkError::ShapeMismatch {
                    expected: sizes[l],
                    actual: w.cols(),
                });
            }
            if b.len() != sizes[l + 1] {
                return Err(NetworkError::ShapeMismatch {
                    expected: sizes[l + 1],
                    actual: b.len(),
                });
            }
        }

        Ok(Self {
            sizes,
            weights,
            biases,
        })
    }

    fn check_topology(sizes: &[usize]) -> Result<(), NetworkError> {
        if sizes.len() < 2 || sizes.iter().any(|&size| size == 0) {
            return Err(NetworkError::InvalidTopology);
        }
        Ok(())
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Forward inference: per layer boundary, `sigmoid(w · a + b)`. Pure
    /// with respect to the network; the final layer's activation is the
    /// output, one entry per class.
    pub fn infer(&self, input: &Vector) -> Result<Vector, NetworkError> {
        if input.len() != self.sizes[0] {
            return Err(NetworkError::ShapeMismatch {
                expected: self.sizes[0],
                actual: input.len(),
            });
        }

        let mut activation = input.clone();
        for (weights, biases) in self.weights.iter().zip(&self.biases) {
            activation = weights.mul_vector(&activation)?.add(biases)?.map(sigmoid);
        }

        Ok(activation)
    }

    /// Runs epochs of shuffled mini-batch SGD over `training_set`. After
    /// each epoch the network is evaluated against `test_set` when one is
    /// given; the last such evaluation is returned.
    ///
    /// Blocks until every epoch completes. The parameters are exclusively
    /// owned here for the duration; inference from another thread during
    /// training needs external synchronization to see a consistent
    /// snapshot.
    ///
    /// Shuffling consumes `rng`, so a seeded generator (together with a
    /// seeded initialization) makes the whole parameter trajectory
    /// reproducible.
    pub fn train(
        &mut self,
        training_set: &[Sample],
        epochs: usize,
        batch_size: usize,
        learning_rate: Value,
        test_set: Option<&[Sample]>,
        rng: &mut impl Rng,
    ) -> Result<Option<Accuracy>, NetworkError> {
        if batch_size == 0 {
            return Err(NetworkError::InvalidTrainingConfig {
                reason: "batch size must be positive",
            });
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(NetworkError::InvalidTrainingConfig {
                reason: "learning rate must be finite and positive",
            });
        }

        let mut accuracy = None;
        let mut working: Vec<&Sample> = training_set.iter().collect();

        for epoch in 1..=epochs {
            working.shuffle(rng);

            let batches = working.len().div_ceil(batch_size);
            debug!(epoch, batches, "starting epoch");

            for batch in working.chunks(batch_size) {
                self.train_batch(batch, learning_rate)?;
            }

            if let Some(test_set) = test_set {
                let result = evaluate(self, test_set)?;
                info!(
                    epoch,
                    correct = result.correct,
                    total = result.total,
                    "epoch complete"
                );
                accuracy = Some(result);
            }
        }

        Ok(accuracy)
    }

    /// Fetches both sets from `provider` and trains on them; an empty test
    /// set means no evaluation.
    pub fn train_from(
        &mut self,
        provider: &impl DatasetProvider,
        epochs: usize,
        batch_size: usize,
        learning_rate: Value,
        rng: &mut impl Rng,
    ) -> Result<Option<Accuracy>, NetworkError> {
        let training_set = provider.training_set();
        let test_set = provider.test_set();
        let test_set = (!test_set.is_empty()).then_some(test_set.as_slice());

        self.train(&training_set, epochs, batch_size, learning_rate, test_set, rng)
    }

    /// Accumulates every sample's gradients, then applies the summed step
    /// scaled by `learning_rate / batch.len()` in one pass. Any error is
    /// raised before the first parameter is touched.
    fn train_batch(&mut self, batch: &[&Sample], learning_rate: Value) -> Result<(), NetworkError> {
        let mut gradients = Gradients::zeros_like(self);
        for sample in batch {
            self.backpropagate(sample, &mut gradients)?;
        }

        let scale = learning_rate / batch.len() as Value;
        for (weights, gradient) in self.weights.iter_mut().zip(&gradients.weights) {
            weights.scaled_sub_assign(gradient, scale)?;
        }
        for (biases, gradient) in self.biases.iter_mut().zip(&gradients.biases) {
            biases.scaled_sub_assign(gradient, scale)?;
        }

        Ok(())
    }

    /// One sample's contribution to the batch gradients: a forward pass
    /// retaining per-layer pre- and post-activations, then the error signal
    /// propagated back from the squared-error gradient at the output.
    fn backpropagate(
        &self,
        sample: &Sample,
        gradients: &mut Gradients,
    ) -> Result<(), NetworkError> {
        let layers = self.weights.len();

        if sample.input.len() != self.sizes[0] {
            return Err(NetworkError::ShapeMismatch {
                expected: self.sizes[0],
                actual: sample.input.len(),
            });
        }
        if sample.target.len() != self.sizes[layers] {
            return Err(NetworkError::ShapeMismatch {
                expected: self.sizes[layers],
                actual: sample.target.len(),
            });
        }

        // Forward, keeping the whole activation trace.
        let mut pre_activations = Vec::with_capacity(layers);
        let mut activations = Vec::with_capacity(layers + 1);
        activations.push(sample.input.clone());
        for (l, (weights, biases)) in self.weights.iter().zip(&self.biases).enumerate() {
            let pre = weights.mul_vector(&activations[l])?.add(biases)?;
            activations.push(pre.map(sigmoid));
            pre_activations.push(pre);
        }

        // Output error: (a - y) ⊙ σ'(z).
        let mut delta = activations[layers]
            .sub(&sample.target)?
            .hadamard(&pre_activations[layers - 1].map(sigmoid_prime))?;

        // Walk backward, summing each layer's weight gradient (an outer
        // product with the previous activation) and bias gradient.
        for l in (0..layers).rev() {
            gradients.weights[l].add_assign(&Matrix::outer(&delta, &activations[l]))?;
            gradients.biases[l].add_assign(&delta)?;

            if l > 0 {
                delta = self.weights[l]
                    .transpose()
                    .mul_vector(&delta)?
                    .hadamard(&pre_activations[l - 1].map(sigmoid_prime))?;
            }
        }

        Ok(())
    }
}
