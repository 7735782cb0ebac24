//! # Learning Agent
//!
//! [`DqnAgent`] ties the replay buffer, the epsilon-greedy policy and an
//! [`ActionValueFunction`] together. The outer loop calls [`DqnAgent::act`]
//! to pick an action and [`DqnAgent::step`] with the resulting transition;
//! the agent stores it and, once the buffer holds a full batch, performs one
//! Q-learning update.
//!
//! By default the same network selects actions and produces bootstrap
//! targets. Setting `target_update_freq` in [`DqnConfig`](crate::config::DqnConfig)
//! adds a frozen copy that is synced periodically.
//!
//! ```rust
//! use cartpole_dqn::agent::DqnAgent;
//! use cartpole_dqn::config::DqnConfig;
//! use ndarray::array;
//!
//! let config = DqnConfig::new(4, 2).batch_size(2).hidden_layers(&[8]).seed(1);
//! let mut agent = DqnAgent::new(config).unwrap();
//!
//! let state = array![0.0, 0.1, 0.0, -0.1];
//! let action = agent.act(state.view(), 0.5).unwrap();
//! let next_state = array![0.01, 0.1, 0.0, -0.1];
//! agent.step(state.view(), action, 1.0, next_state.view(), false).unwrap();
//! assert_eq!(agent.buffer().len(), 1);
//! ```

mod dqn;
pub mod traits;

pub use dqn::{td_targets, AgentStats, DqnAgent};
pub use traits::ActionValueFunction;
