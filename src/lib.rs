//! # cartpole_dqn - Deep Q-Learning core for discrete-action control
//!
//! A compact DQN learner: an experience-replay buffer, a feed-forward
//! action-value network, an epsilon-greedy policy and the agent that turns a
//! stream of `(state, action, reward, next_state, done)` transitions into an
//! improving Q-function. Environments such as CartPole plug in through the
//! [`env::Environment`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cartpole_dqn::agent::DqnAgent;
//! use cartpole_dqn::config::DqnConfig;
//! use ndarray::array;
//!
//! let config = DqnConfig::new(4, 2)
//!     .buffer_capacity(10_000)
//!     .batch_size(64)
//!     .hidden_layers(&[64, 64]);
//! let mut agent = DqnAgent::new(config).unwrap();
//!
//! let state = array![0.01, -0.02, 0.03, 0.0];
//! let action = agent.act_scheduled(state.view()).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Hidden/output activation functions
//! - [`agent`] - The DQN agent and the approximator trait it is generic over
//! - [`config`] - Hyperparameters and their validation
//! - [`env`] - Environment boundary trait and an episode driver
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Masked mean-squared error
//! - [`network`] - The feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`policy`] - Epsilon-greedy selection and epsilon decay
//! - [`replay_buffer`] - Experience replay

pub mod activations;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod policy;
pub mod replay_buffer;

pub use agent::{ActionValueFunction, DqnAgent};
pub use config::DqnConfig;
pub use error::{DqnError, Result};

#[cfg(test)]
mod tests;
