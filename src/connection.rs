use itertools::multizip;

use crate::error::ConfigurationError;
use crate::layer::Layer;
use crate::math;
use crate::matrix::Mat;
use crate::weights::WeightSource;

/// The weighted edge between two adjacent layers.
///
/// A connection between a left layer of size `m` and a right layer of size
/// `n` owns an `m` by `n` weight matrix, a bias vector of length `n`, the
/// previous delta matrix (one step of momentum memory), and the error vector
/// it propagates to the left, valid after each [`Connection::optimize`]
/// call. All dimensions are fixed at construction.
///
/// Connections hold the *positions* of their layers in the network's layer
/// arena rather than the layers themselves; the network resolves them on
/// each pass.
#[derive(Debug)]
pub struct Connection {
    left: usize,
    right: usize,
    weights: Mat,
    biases: Vec<f64>,
    previous_delta: Mat,
    errors: Vec<f64>,
}

impl Connection {
    /// Creates a connection between the layers at positions `left` and
    /// `right`, with weights drawn from `source` at a fan-in of `left_len`.
    pub fn new(
        left: usize,
        right: usize,
        left_len: usize,
        right_len: usize,
        source: &mut WeightSource,
    ) -> Result<Connection, ConfigurationError> {
        Ok(Connection {
            left,
            right,
            weights: Mat::random(left_len, right_len, left_len, source)?,
            biases: vec![0.0; right_len],
            previous_delta: Mat::zeros(left_len, right_len),
            errors: vec![0.0; left_len],
        })
    }

    pub fn left_index(&self) -> usize {
        self.left
    }

    pub fn right_index(&self) -> usize {
        self.right
    }

    /// Feeds the left layer's activated values forward into the right layer.
    ///
    /// Each right unit receives the weighted sum of the left activations
    /// plus its bias; the right layer is then activated.
    pub fn compute(&self, left: &Layer, right: &mut Layer) {
        assert_eq!(left.len(), self.weights.rows());
        assert_eq!(right.len(), self.weights.cols());

        let inputs = left.values();
        let mut raw = vec![0.0; right.len()];
        for (column, slot) in raw.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (row, input) in inputs.iter().enumerate() {
                sum += input * self.weights[(row, column)];
            }
            *slot = sum + self.biases[column];
        }

        right.set_values(&raw);
        right.activate();
    }

    /// Feeds the right layer's propagated errors backwards, updating the
    /// weights and biases and recording the left layer's errors.
    pub fn optimize(
        &mut self,
        left: &Layer,
        right_errors: &[f64],
        learning_rate: f64,
        momentum: f64,
    ) {
        assert_eq!(left.len(), self.weights.rows());
        assert_eq!(right_errors.len(), self.weights.cols());

        self.propagate_error(left, right_errors);

        let inputs = left.values();
        for (input, weights, deltas) in multizip((
            inputs.iter(),
            self.weights.row_iter_mut(),
            self.previous_delta.row_iter_mut(),
        )) {
            for ((weight, last_delta), error) in
                weights.iter_mut().zip(deltas.iter_mut()).zip(right_errors)
            {
                let delta = learning_rate * input * error;
                *weight += delta + momentum * *last_delta;
                // Only the fresh term is remembered; momentum carries one
                // step of history and never compounds.
                *last_delta = delta;
            }
        }

        // Biases absorb the raw propagated error, without learning-rate
        // scaling.
        for (bias, error) in self.biases.iter_mut().zip(right_errors) {
            *bias += error;
        }
    }

    /// Computes the left layer's errors from the right layer's, through the
    /// transposed weight matrix and the derivative of the left layer's raw
    /// values.
    fn propagate_error(&mut self, left: &Layer, right_errors: &[f64]) {
        let transposed = self.weights.transposed();
        let raw = left.raw_values();
        for (row, (slot, raw)) in self.errors.iter_mut().zip(&raw).enumerate() {
            let mut gradient = 0.0;
            for (column, error) in right_errors.iter().enumerate() {
                gradient += transposed[(column, row)] * error;
            }
            *slot = gradient * math::sigmoid_derivative(*raw);
        }
    }

    /// The errors recorded for the left layer by the last `optimize` call.
    pub fn error(&self) -> &[f64] {
        &self.errors
    }
}
