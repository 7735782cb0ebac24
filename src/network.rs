//! # Action-Value Network
//!
//! [`QNetwork`] is a feed-forward approximator of `Q(s, ·; θ)`: input width is
//! the state dimensionality, output width is the action count, hidden layers
//! use a configurable activation (ReLU by default) and the output layer is
//! linear so Q-values are raw.
//!
//! ```rust
//! use cartpole_dqn::activations::Activation;
//! use cartpole_dqn::network::QNetwork;
//! use cartpole_dqn::optimizer::{OptimizerWrapper, SGD};
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let network = QNetwork::new(4, &[16, 16], Activation::Relu, 2, OptimizerWrapper::SGD(SGD::new()), 1e-3, &mut rng).unwrap();
//! let q_values = network.predict(array![0.0, 0.1, -0.2, 0.3].view()).unwrap();
//! assert_eq!(q_values.len(), 2);
//! ```

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::DenseLayer;
use crate::loss::{masked_mse, masked_mse_gradient};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// Serialized form of θ: per-layer weight matrices and bias vectors.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct Parameters {
    layers: Vec<(Array2<f32>, Array1<f32>)>,
}

/// A feed-forward Q-network with its own optimizer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    pub learning_rate: f32,
}

impl QNetwork {
    /// Build a network `state_dim -> hidden_layers... -> num_actions`. Every
    /// hidden layer uses `hidden_activation`; the output layer is linear.
    pub fn new<R: Rng + ?Sized>(
        state_dim: usize,
        hidden_layers: &[usize],
        hidden_activation: Activation,
        num_actions: usize,
        optimizer: OptimizerWrapper,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if state_dim == 0 || num_actions == 0 || hidden_layers.contains(&0) {
            return Err(DqnError::invalid_configuration(
                "layer_sizes".to_string(),
                format!("all layer widths must be positive, got {} -> {:?} -> {}", state_dim, hidden_layers, num_actions),
            ));
        }

        let mut sizes = Vec::with_capacity(hidden_layers.len() + 2);
        sizes.push(state_dim);
        sizes.extend_from_slice(hidden_layers);
        sizes.push(num_actions);

        let last = sizes.len() - 2;
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, window)| {
                let activation = if i == last { Activation::Linear } else { hidden_activation };
                DenseLayer::new(window[0], window[1], activation, &mut *rng)
            })
            .collect();

        Ok(QNetwork { layers, optimizer, learning_rate })
    }

    /// Width of the expected state vector.
    pub fn state_dim(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    /// Number of actions, i.e. the width of the output.
    pub fn num_actions(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.state_dim() {
            return Err(DqnError::shape_mismatch(
                format!("state of width {}", self.state_dim()),
                format!("state of width {}", width),
            ));
        }
        Ok(())
    }

    /// Q-values of every action for a single state.
    pub fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.check_width(state.len())?;
        let batch = self.predict_batch(state.insert_axis(Axis(0)))?;
        Ok(batch.index_axis_move(Axis(0), 0))
    }

    /// Q-values for a batch of states, one row per state.
    pub fn predict_batch(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_width(states.ncols())?;
        let mut current = states.to_owned();
        for layer in &self.layers {
            current = layer.predict_batch(current.view());
        }
        Ok(current)
    }

    fn forward_batch(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut current = states.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view());
        }
        current
    }

    fn backward_batch(&self, output_errors: Array2<f32>) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors;

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// One optimization step on the masked MSE between `Q(states[i], actions[i])`
    /// and `targets[i]`. Returns the loss measured before the step.
    pub fn update(&mut self, states: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> Result<f32> {
        self.check_width(states.ncols())?;
        let batch_size = states.nrows();
        if actions.len() != batch_size || targets.len() != batch_size {
            return Err(DqnError::shape_mismatch(
                format!("{} actions and targets", batch_size),
                format!("{} actions, {} targets", actions.len(), targets.len()),
            ));
        }
        let num_actions = self.num_actions();
        if let Some(&action) = actions.iter().find(|&&a| a >= num_actions) {
            return Err(DqnError::InvalidAction { action, num_actions });
        }

        let predictions = self.forward_batch(states);
        let loss = masked_mse(predictions.view(), actions, targets);
        let output_errors = masked_mse_gradient(predictions.view(), actions, targets);
        let gradients = self.backward_batch(output_errors);

        for layer in &mut self.layers {
            layer.clear_cache();
        }
        let gradients = gradients?;

        self.optimizer.begin_step();
        for (i, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(i, &mut layer.weights, &weight_gradients, self.learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &bias_gradients, self.learning_rate);
        }

        Ok(loss)
    }

    /// Opaque, round-trippable snapshot of θ.
    pub fn export_parameters(&self) -> Result<Vec<u8>> {
        let params = Parameters {
            layers: self
                .layers
                .iter()
                .map(|layer| (layer.weights.clone(), layer.biases.clone()))
                .collect(),
        };
        Ok(bincode::serialize(&params)?)
    }

    /// Replace θ with a snapshot from [`export_parameters`](Self::export_parameters).
    /// The architecture must match exactly; otherwise nothing is changed.
    pub fn load_parameters(&mut self, blob: &[u8]) -> Result<()> {
        let params: Parameters = bincode::deserialize(blob)?;
        if params.layers.len() != self.layers.len() {
            return Err(DqnError::shape_mismatch(
                format!("{} layers", self.layers.len()),
                format!("{} layers", params.layers.len()),
            ));
        }
        for (i, (layer, (weights, biases))) in self.layers.iter().zip(&params.layers).enumerate() {
            if layer.weights.dim() != weights.dim() || layer.biases.len() != biases.len() {
                return Err(DqnError::shape_mismatch(
                    format!("layer {} weights {:?}, biases {}", i, layer.weights.dim(), layer.biases.len()),
                    format!("layer {} weights {:?}, biases {}", i, weights.dim(), biases.len()),
                ));
            }
        }
        for (layer, (weights, biases)) in self.layers.iter_mut().zip(params.layers) {
            layer.weights = weights;
            layer.biases = biases;
        }
        Ok(())
    }

    /// Write the exported parameters to a file.
    pub fn save_parameters<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.export_parameters()?)?;
        Ok(())
    }

    /// Read parameters written by [`save_parameters`](Self::save_parameters).
    pub fn load_parameters_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = fs::read(path)?;
        self.load_parameters(&data)
    }
}
