//! Hyperparameters for [`DqnAgent`](crate::agent::DqnAgent).
//!
//! ```rust
//! use cartpole_dqn::config::DqnConfig;
//!
//! let config = DqnConfig::new(4, 2)
//!     .buffer_capacity(1000)
//!     .batch_size(32)
//!     .discount(0.99)
//!     .eps_decay(0.98);
//! assert!(config.validate().is_ok());
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::optimizer::OptimizerKind;

/// Immutable agent configuration, checked once at agent construction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DqnConfig {
    /// Width of the state vector.
    pub state_dim: usize,

    /// Size of the discrete action set.
    pub num_actions: usize,

    /// Maximum number of transitions kept for replay.
    pub buffer_capacity: usize,

    /// Transitions per learning step.
    pub batch_size: usize,

    /// Discount factor γ, in `(0, 1]`.
    pub discount: f32,

    /// Hidden layer widths, input side first.
    pub hidden_layers: Vec<usize>,

    /// Activation of every hidden layer. The output layer is always linear.
    pub hidden_activation: Activation,

    pub learning_rate: f32,

    pub optimizer: OptimizerKind,

    pub eps_start: f32,
    pub eps_end: f32,
    pub eps_decay: f32,

    /// Attempt a learning step every this many observed transitions.
    pub learn_every: usize,

    /// When set, bootstrap targets come from a frozen copy of the network
    /// synced every this many learning steps. `None` uses the online network.
    pub target_update_freq: Option<usize>,

    /// Seed for exploration, sampling and weight init. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            state_dim: 4,
            num_actions: 2,
            buffer_capacity: 10_000,
            batch_size: 64,
            discount: 0.99,
            hidden_layers: vec![64, 64],
            hidden_activation: Activation::Relu,
            learning_rate: 1e-3,
            optimizer: OptimizerKind::Adam,
            eps_start: 1.0,
            eps_end: 0.01,
            eps_decay: 0.995,
            learn_every: 1,
            target_update_freq: None,
            seed: None,
        }
    }
}

impl DqnConfig {
    pub fn new(state_dim: usize, num_actions: usize) -> Self {
        DqnConfig {
            state_dim,
            num_actions,
            ..Default::default()
        }
    }

    pub fn buffer_capacity(mut self, v: usize) -> Self {
        self.buffer_capacity = v;
        self
    }

    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    pub fn hidden_layers(mut self, v: &[usize]) -> Self {
        self.hidden_layers = v.to_vec();
        self
    }

    pub fn hidden_activation(mut self, v: Activation) -> Self {
        self.hidden_activation = v;
        self
    }

    pub fn learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = v;
        self
    }

    pub fn optimizer(mut self, v: OptimizerKind) -> Self {
        self.optimizer = v;
        self
    }

    pub fn eps_start(mut self, v: f32) -> Self {
        self.eps_start = v;
        self
    }

    pub fn eps_end(mut self, v: f32) -> Self {
        self.eps_end = v;
        self
    }

    pub fn eps_decay(mut self, v: f32) -> Self {
        self.eps_decay = v;
        self
    }

    pub fn learn_every(mut self, v: usize) -> Self {
        self.learn_every = v;
        self
    }

    pub fn target_update_freq(mut self, v: Option<usize>) -> Self {
        self.target_update_freq = v;
        self
    }

    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Reject out-of-range hyperparameters.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &str, reason: String) -> Result<()> {
            Err(DqnError::invalid_configuration(name.to_string(), reason))
        }

        if self.state_dim == 0 {
            return invalid("state_dim", "must be positive".into());
        }
        if self.num_actions == 0 {
            return invalid("num_actions", "must be positive".into());
        }
        if self.buffer_capacity == 0 {
            return invalid("buffer_capacity", "must be positive".into());
        }
        if self.batch_size == 0 {
            return invalid("batch_size", "must be positive".into());
        }
        if self.batch_size > self.buffer_capacity {
            return invalid(
                "batch_size",
                format!("{} exceeds buffer_capacity {}", self.batch_size, self.buffer_capacity),
            );
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return invalid("discount", format!("{} is outside (0, 1]", self.discount));
        }
        if self.hidden_layers.contains(&0) {
            return invalid("hidden_layers", format!("{:?} contains a zero width", self.hidden_layers));
        }
        if let Activation::LeakyRelu { alpha } = self.hidden_activation {
            if !alpha.is_finite() {
                return invalid("hidden_activation", format!("leaky ReLU slope {} must be finite", alpha));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid("learning_rate", format!("{} must be positive and finite", self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.eps_start) || !(0.0..=1.0).contains(&self.eps_end) {
            return invalid(
                "eps_start",
                format!("eps_start {} and eps_end {} must lie in [0, 1]", self.eps_start, self.eps_end),
            );
        }
        if self.eps_end > self.eps_start {
            return invalid(
                "eps_end",
                format!("{} is greater than eps_start {}", self.eps_end, self.eps_start),
            );
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return invalid("eps_decay", format!("{} is outside (0, 1]", self.eps_decay));
        }
        if self.learn_every == 0 {
            return invalid("learn_every", "must be positive".into());
        }
        if self.target_update_freq == Some(0) {
            return invalid("target_update_freq", "must be positive when set".into());
        }
        Ok(())
    }

    /// Read a JSON configuration; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        info!("Loaded DQN config from {:?}", path);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
