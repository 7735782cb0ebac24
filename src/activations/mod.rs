//! # Activation Functions Module
//!
//! Hidden-layer non-linearities for the action-value network. The output
//! layer of a Q-network is always [`Activation::Linear`] so that raw
//! action-values are unbounded.
//!
//! - **ReLU**: `max(0, x)` - the conventional default for hidden layers
//! - **LeakyReLU**: ReLU with a small negative slope
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//! - **Linear**: identity, used for the output layer
//!
//! ```rust
//! use cartpole_dqn::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
