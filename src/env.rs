//! Boundary contract with the environment that produces transitions.
//!
//! The agent never looks inside an environment; it only sees states,
//! rewards and terminal flags through [`Environment`].

use log::{info, trace};
use ndarray::Array1;
use std::collections::HashMap;

use crate::agent::{ActionValueFunction, DqnAgent};
use crate::error::Result;

/// Result of one environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
    /// Environment-specific diagnostics. The agent never reads them.
    pub info: HashMap<String, f32>,
}

impl StepResult {
    /// A step with no diagnostics attached.
    pub fn new(next_state: Array1<f32>, reward: f32, done: bool) -> Self {
        StepResult {
            next_state,
            reward,
            done,
            info: HashMap::new(),
        }
    }

    pub fn with_info<K: Into<String>>(mut self, key: K, value: f32) -> Self {
        self.info.insert(key.into(), value);
        self
    }
}

/// A discrete-action environment such as CartPole.
pub trait Environment {
    /// Start a new episode and return its first state.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply `action` and advance one step.
    fn step(&mut self, action: usize) -> Result<StepResult>;

    fn state_dimension(&self) -> usize;

    fn action_count(&self) -> usize;
}

/// Summary of one episode played by [`run_episode`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub total_reward: f32,
    /// Mean loss over the updates made during the episode.
    pub mean_loss: Option<f32>,
    /// Exploration rate after the end-of-episode decay.
    pub epsilon: f32,
}

/// Play one episode: act with the agent's scheduled epsilon, feed every
/// transition to [`DqnAgent::step`], then decay epsilon once.
///
/// `max_steps` bounds episodes that never report `done`.
pub fn run_episode<E, Q>(env: &mut E, agent: &mut DqnAgent<Q>, max_steps: usize) -> Result<EpisodeSummary>
where
    E: Environment + ?Sized,
    Q: ActionValueFunction + Clone,
{
    let mut state = env.reset()?;
    let mut summary = EpisodeSummary::default();
    let mut loss_sum = 0.0;
    let mut loss_count = 0usize;

    while summary.steps < max_steps {
        let action = agent.act_scheduled(state.view())?;
        let StepResult { next_state, reward, done, info } = env.step(action)?;
        if !info.is_empty() {
            trace!("step {} info: {:?}", summary.steps, info);
        }

        if let Some(loss) = agent.step(state.view(), action, reward, next_state.view(), done)? {
            loss_sum += loss;
            loss_count += 1;
        }

        summary.steps += 1;
        summary.total_reward += reward;
        state = next_state;
        if done {
            break;
        }
    }

    summary.mean_loss = (loss_count > 0).then(|| loss_sum / loss_count as f32);
    summary.epsilon = agent.decay_epsilon();
    info!(
        "Episode finished: {} steps, reward = {:.1}, epsilon = {:.3}",
        summary.steps, summary.total_reward, summary.epsilon
    );
    Ok(summary)
}
