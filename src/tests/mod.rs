pub mod test_config;
pub mod test_edge_cases;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::agent::ActionValueFunction;
use crate::error::{DqnError, Result};

/// Approximator that returns the same Q-values for every state and records updates.
#[derive(Clone, Debug)]
pub struct FixedQ {
    pub state_dim: usize,
    pub values: Array1<f32>,
    pub updates: Vec<(Array2<f32>, Vec<usize>, Array1<f32>)>,
}

impl FixedQ {
    pub fn new(state_dim: usize, values: Array1<f32>) -> Self {
        FixedQ { state_dim, values, updates: Vec::new() }
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.state_dim {
            return Err(DqnError::shape_mismatch(self.state_dim.to_string(), width.to_string()));
        }
        Ok(())
    }
}

impl ActionValueFunction for FixedQ {
    fn state_dim(&self) -> usize {
        self.state_dim
    }

    fn num_actions(&self) -> usize {
        self.values.len()
    }

    fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.check_width(state.len())?;
        Ok(self.values.clone())
    }

    fn predict_batch(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_width(states.ncols())?;
        Ok(Array2::from_shape_fn((states.nrows(), self.values.len()), |(_, a)| self.values[a]))
    }

    fn update(&mut self, states: ArrayView2<f32>, actions: &[usize], targets: ArrayView1<f32>) -> Result<f32> {
        self.updates.push((states.to_owned(), actions.to_vec(), targets.to_owned()));
        Ok(0.0)
    }

    fn export_parameters(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.values)?)
    }

    fn load_parameters(&mut self, blob: &[u8]) -> Result<()> {
        self.values = bincode::deserialize(blob)?;
        Ok(())
    }
}
