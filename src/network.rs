//! A fully connected feedforward network trained with online
//! backpropagation.
//!
//! # Example
//!
//! Teach a small network the classic gate mapping, one sample at a time:
//!
//! ```
//! use backprop::Network;
//!
//! let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let targets = [1.0, 0.0, 0.0, 1.0];
//!
//! let mut network = Network::new(2, 1, &[3], 1, 0.1, 1.0).unwrap();
//! for cycle in 0..100 {
//!     let sample = cycle % 4;
//!     let result = network.compute_result(&inputs[sample]).unwrap();
//!     assert!(result[0] > 0.0 && result[0] < 1.0);
//!     network.learn(&[targets[sample]]).unwrap();
//! }
//! assert_eq!(network.training_cycle(), 101);
//! ```

use log::{debug, trace};

use crate::connection::Connection;
use crate::error::{ConfigurationError, ShapeMismatchError};
use crate::layer::Layer;
use crate::math;
use crate::utils::{Back, Front};
use crate::weights::WeightSource;

/// The default trainer threshold a new network starts with.
const DEFAULT_TRAINER_THRESHOLD: f64 = 0.001;

/// A multilayer perceptron: an ordered chain of layers joined by weighted
/// connections, evaluated forward and trained backward one sample at a time.
///
/// Topology and hyperparameters are fixed at construction. Evaluation
/// overwrites unit values in place; training additionally moves weights and
/// biases and advances the cumulative error statistics. A
/// [`Network::compute_result`] call must precede each [`Network::learn`]
/// call, since learning reads the unit state the forward pass leaves behind.
#[derive(Debug)]
pub struct Network {
    input_count: usize,
    output_count: usize,
    /// Layers in forward order: input, hidden layers, output.
    layers: Vec<Layer>,
    /// Connections in construction order; position `i` joins layers `i` and
    /// `i + 1`. The reverse order is the backward-propagation order.
    connections: Vec<Connection>,
    momentum: f64,
    learning_rate: f64,
    trainer_threshold: f64,
    /// Sum over all cycles of the squared L1 norm of the output cost.
    error_history: f64,
    /// `error_history / (2 * training_cycle)`, as of the last `learn` call.
    error_coefficient: f64,
    training_cycle: usize,
    is_trained: bool,
}

impl Network {
    /// Creates a network with entropy-seeded initial weights.
    ///
    /// The network has `input_count` input neurons, `hidden_layer_count`
    /// hidden layers sized by the leading entries of `hidden_sizes` (extra
    /// entries are ignored), and `output_count` output neurons. `momentum`
    /// must lie in `[0, 1)` and `learning_rate` in `(0, 1]`.
    pub fn new(
        input_count: usize,
        hidden_layer_count: usize,
        hidden_sizes: &[usize],
        output_count: usize,
        momentum: f64,
        learning_rate: f64,
    ) -> Result<Network, ConfigurationError> {
        Network::with_source(
            input_count,
            hidden_layer_count,
            hidden_sizes,
            output_count,
            momentum,
            learning_rate,
            WeightSource::new(),
        )
    }

    /// Creates a network drawing its initial weights from `source`.
    ///
    /// A seeded source makes the initial weights reproducible.
    pub fn with_source(
        input_count: usize,
        hidden_layer_count: usize,
        hidden_sizes: &[usize],
        output_count: usize,
        momentum: f64,
        learning_rate: f64,
        mut source: WeightSource,
    ) -> Result<Network, ConfigurationError> {
        if input_count == 0 || output_count == 0 {
            return Err(ConfigurationError::EmptyLayer);
        }
        if hidden_sizes.len() < hidden_layer_count {
            return Err(ConfigurationError::NotEnoughHiddenSizes {
                declared: hidden_layer_count,
                supplied: hidden_sizes.len(),
            });
        }
        if !(momentum >= 0.0 && momentum < 1.0) {
            return Err(ConfigurationError::MomentumOutOfRange(momentum));
        }
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(ConfigurationError::LearningRateOutOfRange(learning_rate));
        }

        let mut layers = Vec::with_capacity(hidden_layer_count + 2);
        layers.push(Layer::new(input_count)?);
        for &size in &hidden_sizes[..hidden_layer_count] {
            layers.push(Layer::new(size)?);
        }
        layers.push(Layer::new(output_count)?);

        let mut connections = Vec::with_capacity(layers.len() - 1);
        for right in 1..layers.len() {
            let left = right - 1;
            connections.push(Connection::new(
                left,
                right,
                layers[left].len(),
                layers[right].len(),
                &mut source,
            )?);
        }

        debug!(
            "assembled network: {} inputs, {} hidden layers, {} outputs",
            input_count, hidden_layer_count, output_count
        );

        Ok(Network {
            input_count,
            output_count,
            layers,
            connections,
            momentum,
            learning_rate,
            trainer_threshold: DEFAULT_TRAINER_THRESHOLD,
            error_history: 0.0,
            error_coefficient: 0.0,
            training_cycle: 1,
            is_trained: false,
        })
    }

    /// Returns the size of the input layer.
    pub fn input_len(&self) -> usize {
        self.layers.front().len()
    }

    /// Returns the size of the output layer.
    pub fn output_len(&self) -> usize {
        self.layers.back().len()
    }

    /// Feeds `inputs` through the network and returns the output layer's
    /// activated values.
    ///
    /// The input layer takes the values as-is; activation starts with the
    /// first connection. The result is deterministic for fixed weights, and
    /// the unit state it leaves behind is what a following [`Network::learn`]
    /// call trains against.
    pub fn compute_result(&mut self, inputs: &[f64]) -> Result<Vec<f64>, ShapeMismatchError> {
        if inputs.len() != self.input_count {
            return Err(ShapeMismatchError::InputLength {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }

        self.layers.mut_front().set_values(inputs);
        for connection in &self.connections {
            let (left, right) = self.layers.split_at_mut(connection.right_index());
            connection.compute(&left[connection.left_index()], &mut right[0]);
        }

        Ok(self.layers.back().values())
    }

    /// Trains the network against the `expected` output of the preceding
    /// [`Network::compute_result`] call.
    ///
    /// Computes the output cost, folds its squared norm into the running
    /// error coefficient, then walks the connections backwards, letting each
    /// one update its weights and hand its propagated error to the next.
    /// Finally the trained flag is refreshed and the cycle count advances.
    pub fn learn(&mut self, expected: &[f64]) -> Result<(), ShapeMismatchError> {
        if expected.len() != self.output_count {
            return Err(ShapeMismatchError::ExpectedLength {
                expected: self.output_count,
                actual: expected.len(),
            });
        }

        let mut cost = self.output_cost(expected);

        self.error_history += math::norm(&cost).powi(2);
        self.error_coefficient = self.error_history / (2.0 * self.training_cycle as f64);

        for connection in self.connections.iter_mut().rev() {
            let left = &self.layers[connection.left_index()];
            connection.optimize(left, &cost, self.learning_rate, self.momentum);
            cost = connection.error().to_vec();
        }

        self.is_trained = self.error_coefficient < self.trainer_threshold;
        trace!(
            "cycle {}: error coefficient {}",
            self.training_cycle,
            self.error_coefficient
        );
        self.training_cycle += 1;

        Ok(())
    }

    /// Computes the cost of the output layer against `expected`.
    fn output_cost(&self, expected: &[f64]) -> Vec<f64> {
        // The derivative here is taken of the activated output value; the
        // per-connection backward step takes it of raw values instead.
        let actual = self.layers.back().values();
        expected
            .iter()
            .zip(&actual)
            .map(|(expected, actual)| (expected - actual) * math::sigmoid_derivative(*actual))
            .collect()
    }

    /// Returns the network error coefficient: the cumulative squared cost
    /// norm divided by twice the cycle count, as of the last `learn` call.
    /// Lower is better; a fresh network reads 0.
    pub fn error_coefficient(&self) -> f64 {
        self.error_coefficient
    }

    /// Sets the threshold the error coefficient is compared against after
    /// each training cycle. Lower thresholds demand more precision and more
    /// cycles. Defaults to 0.001.
    pub fn set_trainer_threshold(&mut self, trainer_threshold: f64) {
        self.trainer_threshold = trainer_threshold;
    }

    /// Whether the error coefficient fell below the trainer threshold at
    /// the end of the most recent cycle. Not a latch: a later cycle can
    /// flip the flag back.
    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    /// Returns the current training cycle, counted from 1.
    pub fn training_cycle(&self) -> usize {
        self.training_cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_network() -> Network {
        Network::with_source(2, 1, &[3], 1, 0.1, 1.0, WeightSource::from_seed(11)).unwrap()
    }

    #[test]
    fn layer_counts_match_the_arguments() {
        let network = Network::new(4, 2, &[5, 6], 3, 0.2, 0.7).unwrap();
        assert_eq!(network.input_len(), 4);
        assert_eq!(network.output_len(), 3);
        assert_eq!(network.layers.len(), 4);
        assert_eq!(network.connections.len(), 3);
    }

    #[test]
    fn zero_input_count_is_rejected() {
        let result = Network::new(0, 1, &[3], 1, 0.1, 1.0);
        assert_eq!(result.unwrap_err(), ConfigurationError::EmptyLayer);
    }

    #[test]
    fn zero_output_count_is_rejected() {
        let result = Network::new(2, 1, &[3], 0, 0.1, 1.0);
        assert_eq!(result.unwrap_err(), ConfigurationError::EmptyLayer);
    }

    #[test]
    fn zero_hidden_size_is_rejected() {
        let result = Network::new(2, 1, &[0], 1, 0.1, 1.0);
        assert_eq!(result.unwrap_err(), ConfigurationError::EmptyLayer);
    }

    #[test]
    fn insufficient_hidden_sizes_are_rejected() {
        let result = Network::new(2, 2, &[3], 1, 0.1, 1.0);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::NotEnoughHiddenSizes {
                declared: 2,
                supplied: 1,
            }
        );
    }

    #[test]
    fn extra_hidden_sizes_are_ignored() {
        let network = Network::new(2, 1, &[3, 9, 9], 1, 0.1, 1.0).unwrap();
        assert_eq!(network.layers.len(), 3);
        assert_eq!(network.layers[1].len(), 3);
    }

    #[test]
    fn momentum_bounds_are_enforced() {
        assert_eq!(
            Network::new(2, 1, &[3], 1, -0.1, 1.0).unwrap_err(),
            ConfigurationError::MomentumOutOfRange(-0.1)
        );
        assert_eq!(
            Network::new(2, 1, &[3], 1, 1.0, 1.0).unwrap_err(),
            ConfigurationError::MomentumOutOfRange(1.0)
        );
        assert!(matches!(
            Network::new(2, 1, &[3], 1, f64::NAN, 1.0),
            Err(ConfigurationError::MomentumOutOfRange(_))
        ));
        assert!(Network::new(2, 1, &[3], 1, 0.0, 1.0).is_ok());
        assert!(Network::new(2, 1, &[3], 1, 0.999, 1.0).is_ok());
    }

    #[test]
    fn learning_rate_bounds_are_enforced() {
        assert_eq!(
            Network::new(2, 1, &[3], 1, 0.1, 0.0).unwrap_err(),
            ConfigurationError::LearningRateOutOfRange(0.0)
        );
        assert_eq!(
            Network::new(2, 1, &[3], 1, 0.1, 1.5).unwrap_err(),
            ConfigurationError::LearningRateOutOfRange(1.5)
        );
        assert!(matches!(
            Network::new(2, 1, &[3], 1, 0.1, f64::NAN),
            Err(ConfigurationError::LearningRateOutOfRange(_))
        ));
        assert!(Network::new(2, 1, &[3], 1, 0.1, 1.0).is_ok());
    }

    #[test]
    fn fresh_network_starts_untrained_at_cycle_one() {
        let network = seeded_network();
        assert!(!network.is_trained());
        assert_eq!(network.training_cycle(), 1);
        assert_eq!(network.error_coefficient(), 0.0);
        assert_eq!(network.trainer_threshold, 0.001);
    }

    #[test]
    fn input_length_mismatch_leaves_the_network_untouched() {
        let mut network = seeded_network();
        let result = network.compute_result(&[1.0]);
        assert_eq!(
            result.unwrap_err(),
            ShapeMismatchError::InputLength {
                expected: 2,
                actual: 1,
            }
        );
        assert_eq!(network.training_cycle(), 1);
        assert_eq!(network.error_coefficient(), 0.0);
    }

    #[test]
    fn expected_length_mismatch_leaves_the_network_untouched() {
        let mut network = seeded_network();
        let before = network.compute_result(&[0.5, 0.5]).unwrap();

        let result = network.learn(&[1.0, 0.0]);
        assert_eq!(
            result.unwrap_err(),
            ShapeMismatchError::ExpectedLength {
                expected: 1,
                actual: 2,
            }
        );
        assert_eq!(network.training_cycle(), 1);
        assert_eq!(network.error_coefficient(), 0.0);
        // Weights did not move either: the forward pass still reproduces
        // the exact same output.
        assert_eq!(network.compute_result(&[0.5, 0.5]).unwrap(), before);
    }

    #[test]
    fn forward_pass_is_deterministic() {
        let mut network = seeded_network();
        let first = network.compute_result(&[0.3, 0.9]).unwrap();
        let second = network.compute_result(&[0.3, 0.9]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_layer_takes_values_unactivated() {
        let mut network = seeded_network();
        network.compute_result(&[0.25, -1.5]).unwrap();
        assert_eq!(network.layers.front().values(), vec![0.25, -1.5]);
    }

    #[test]
    fn output_stays_in_the_unit_interval() {
        let mut network = seeded_network();
        let result = network.compute_result(&[0.0, 0.0]).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0] > 0.0 && result[0] < 1.0);
    }

    #[test]
    fn learning_advances_the_cycle_and_the_coefficient() {
        let mut network = seeded_network();
        network.compute_result(&[0.0, 1.0]).unwrap();
        network.learn(&[1.0]).unwrap();
        assert_eq!(network.training_cycle(), 2);
        assert!(network.error_coefficient() > 0.0);
    }

    #[test]
    fn trained_flag_follows_the_threshold_and_is_not_a_latch() {
        let mut network = seeded_network();

        // A generous threshold marks the network trained after one cycle.
        network.set_trainer_threshold(10.0);
        network.compute_result(&[0.0, 1.0]).unwrap();
        network.learn(&[1.0]).unwrap();
        assert!(network.is_trained());

        // Tightening it flips the flag right back.
        network.set_trainer_threshold(0.0);
        network.compute_result(&[0.0, 1.0]).unwrap();
        network.learn(&[1.0]).unwrap();
        assert!(!network.is_trained());
    }

    #[test]
    fn trains_the_gate_mapping_below_the_threshold() {
        let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let targets = [1.0, 0.0, 0.0, 1.0];

        // Gate training is nonconvex, so a handful of seeded restarts keeps
        // this deterministic without hinging on one lucky draw. The cycle
        // cap bounds the test either way.
        for &seed in &[7, 23, 101, 419, 1009, 4021, 9001, 31337] {
            let mut network = Network::with_source(
                2,
                1,
                &[3],
                1,
                0.1,
                1.0,
                WeightSource::from_seed(seed),
            )
            .unwrap();

            for cycle in 0..150_000 {
                let sample = cycle % 4;
                network.compute_result(&inputs[sample]).unwrap();
                network.learn(&[targets[sample]]).unwrap();
                if network.is_trained() {
                    assert!(network.error_coefficient() < 0.001);
                    return;
                }
            }
        }
        panic!("gate training never crossed the trainer threshold");
    }
}
