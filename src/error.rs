//! Error kinds reported at the network API boundary.
//!
//! Every check is performed eagerly, at construction or call time. A failed
//! call leaves the network untouched: no weights move, no cycle is counted.

use thiserror::Error;

/// A rejected network or weight-source configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    /// A layer was declared with no neurons in it.
    #[error("a layer must contain at least one neuron")]
    EmptyLayer,

    /// Fewer hidden layer sizes were supplied than hidden layers declared.
    #[error("{supplied} hidden layer sizes supplied for {declared} declared hidden layers")]
    NotEnoughHiddenSizes { declared: usize, supplied: usize },

    /// Momentum must lie in `[0, 1)`.
    #[error("momentum {0} is outside [0, 1)")]
    MomentumOutOfRange(f64),

    /// Learning rate must lie in `(0, 1]`.
    #[error("learning rate {0} is outside (0, 1]")]
    LearningRateOutOfRange(f64),

    /// A weight was requested for a neuron with no inputs feeding it.
    #[error("weight fan-in must be at least 1")]
    InvalidFanIn,
}

/// A vector handed to the network does not match the declared layer width.
///
/// Lengths must match exactly; excess elements are never silently ignored.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ShapeMismatchError {
    /// The input vector length differs from the input layer width.
    #[error("expected {expected} input values, got {actual}")]
    InputLength { expected: usize, actual: usize },

    /// The expected-output vector length differs from the output layer width.
    #[error("expected {expected} target values, got {actual}")]
    ExpectedLength { expected: usize, actual: usize },
}
