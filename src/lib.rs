//! A minimal multilayer perceptron engine.
//!
//! Networks are fully connected feedforward stacks of sigmoid neurons,
//! trained one sample at a time with backpropagation and momentum-assisted
//! gradient descent. See [`network::Network`] for the API and a worked
//! example.

pub mod error;
pub mod network;
pub mod weights;

mod connection;
mod layer;
mod math;
mod matrix;
mod utils;

pub use crate::error::{ConfigurationError, ShapeMismatchError};
pub use crate::network::Network;
pub use crate::weights::WeightSource;
