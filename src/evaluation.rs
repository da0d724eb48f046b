use std::fmt;

use crate::dataset::Sample;
use crate::error::NetworkError;
use crate::linear_algebra::Vector;
use crate::network::Network;

/// A classification score over a test set, kept as a raw count so callers
/// can choose between the count, a fraction, or a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        100.0 * self.fraction()
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.correct, self.total, self.percent())
    }
}

/// The index of the largest entry; ties resolve to the first occurrence.
pub fn argmax(values: &Vector) -> usize {
    let mut max_index = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[max_index] {
            max_index = index;
        }
    }
    max_index
}

/// Runs inference over every sample and counts how many predictions match
/// the target label. Targets must match the network's output length.
/// Read-only with respect to the network.
pub fn evaluate(network: &Network, test_set: &[Sample]) -> Result<Accuracy, NetworkError> {
    let mut correct = 0;
    for sample in test_set {
        let output = network.infer(&sample.input)?;
        if sample.target.len() != output.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: output.len(),
                actual: sample.target.len(),
            });
        }
        if argmax(&output) == argmax(&sample.target) {
            correct += 1;
        }
    }

    Ok(Accuracy {
        correct,
        total: test_set.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::linear_algebra::Matrix;

    #[test]
    fn argmax_first_occurrence_wins() {
        let v = Vector::from_values(vec![0.5, 0.5, 0.2]);
        assert_eq!(argmax(&v), 0);

        let v = Vector::from_values(vec![0.1, 0.3, 0.9, 0.2]);
        assert_eq!(argmax(&v), 2);
    }

    #[test]
    fn evaluate_counts_matches() {
        // A 2x2 network with strong identity weights classifies whichever
        // input entry is larger.
        let weights = Matrix::from_rows(vec![vec![6.0, 0.0], vec![0.0, 6.0]]).unwrap();
        let network =
            Network::with_parameters(vec![2, 2], vec![weights], vec![Vector::zeros(2)]).unwrap();

        let test_set = vec![
            Sample::labeled(Vector::from_values(vec![0.9, 0.1]), 0, 2).unwrap(),
            Sample::labeled(Vector::from_values(vec![0.2, 0.8]), 1, 2).unwrap(),
            Sample::labeled(Vector::from_values(vec![0.7, 0.3]), 1, 2).unwrap(),
        ];

        let accuracy = evaluate(&network, &test_set).unwrap();
        assert_eq!(accuracy.correct, 2);
        assert_eq!(accuracy.total, 3);
        assert!((accuracy.fraction() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_rejects_mismatched_targets() {
        let weights = Matrix::from_rows(vec![vec![6.0, 0.0], vec![0.0, 6.0]]).unwrap();
        let network =
            Network::with_parameters(vec![2, 2], vec![weights], vec![Vector::zeros(2)]).unwrap();

        // An empty target must not score as a match.
        let empty = vec![Sample::new(
            Vector::from_values(vec![0.9, 0.1]),
            Vector::zeros(0),
        )];
        assert_eq!(
            evaluate(&network, &empty),
            Err(NetworkError::ShapeMismatch {
                expected: 2,
                actual: 0
            })
        );

        let too_long = vec![Sample::new(
            Vector::from_values(vec![0.9, 0.1]),
            Vector::one_hot(5, 4).unwrap(),
        )];
        assert_eq!(
            evaluate(&network, &too_long),
            Err(NetworkError::ShapeMismatch {
                expected: 2,
                actual: 5
            })
        );
    }

    #[test]
    fn display_shows_count_and_percent() {
        let accuracy = Accuracy {
            correct: 3,
            total: 4,
        };
        assert_eq!(accuracy.to_string(), "3/4 (75.00%)");
    }
}
