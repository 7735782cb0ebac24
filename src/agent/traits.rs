use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::Result;
use crate::network::QNetwork;

/// Anything that can stand in for `Q(s, ·; θ)` inside a [`DqnAgent`](super::DqnAgent).
pub trait ActionValueFunction {
    /// Width of the expected state vector.
    fn state_dim(&self) -> usize;

    /// Number of discrete actions.
    fn num_actions(&self) -> usize;

    /// Q-values of every action for a single state. Must not mutate θ.
    fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>>;

    /// Q-values for a batch of states, one row per state.
    fn predict_batch(&self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// One gradient step pulling `Q(states[i], actions[i])` toward `targets[i]`.
    /// Returns the mean squared error of the batch.
    fn update(&mut self, states: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> Result<f32>;

    fn export_parameters(&self) -> Result<Vec<u8>>;

    fn load_parameters(&mut self, blob: &[u8]) -> Result<()>;
}

impl ActionValueFunction for QNetwork {
    fn state_dim(&self) -> usize {
        QNetwork::state_dim(self)
    }

    fn num_actions(&self) -> usize {
        QNetwork::num_actions(self)
    }

    fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        QNetwork::predict(self, state)
    }

    fn predict_batch(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        QNetwork::predict_batch(self, states)
    }

    fn update(&mut self, states: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> Result<f32> {
        QNetwork::update(self, states, actions, targets)
    }

    fn export_parameters(&self) -> Result<Vec<u8>> {
        QNetwork::export_parameters(self)
    }

    fn load_parameters(&mut self, blob: &[u8]) -> Result<()> {
        QNetwork::load_parameters(self, blob)
    }
}
