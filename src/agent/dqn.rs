use log::{debug, info, warn};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use super::traits::ActionValueFunction;
use crate::config::DqnConfig;
use crate::error::{DqnError, Result};
use crate::network::QNetwork;
use crate::optimizer::OptimizerWrapper;
use crate::policy::{EpsilonGreedy, EpsilonSchedule};
use crate::replay_buffer::{ReplayBuffer, Transition, TransitionBatch};

/// TD targets: `reward` for terminal rows, otherwise
/// `reward + gamma * max_a' next_q_values[i, a']`.
///
/// `dones` and the rows of `next_q_values` must line up with `rewards`.
pub fn td_targets(
    rewards: ArrayView1<f32>,
    dones: &[bool],
    next_q_values: ArrayView2<f32>,
    gamma: f32,
) -> Result<Array1<f32>> {
    let batch_size = rewards.len();
    if dones.len() != batch_size || next_q_values.nrows() != batch_size {
        return Err(DqnError::shape_mismatch(
            format!("{} done flags and next-state rows", batch_size),
            format!("{} done flags, {} next-state rows", dones.len(), next_q_values.nrows()),
        ));
    }

    Ok(Array1::from_shape_fn(batch_size, |i| {
        if dones[i] {
            rewards[i]
        } else {
            let max_next_q = next_q_values
                .row(i)
                .iter()
                .fold(f32::NEG_INFINITY, |max, &val| max.max(val));
            rewards[i] + gamma * max_next_q
        }
    }))
}

/// Counters exposed for monitoring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentStats {
    /// Transitions passed to [`DqnAgent::step`].
    pub steps: usize,
    /// Completed approximator updates.
    pub learn_steps: usize,
    pub last_loss: Option<f32>,
}

/// Deep Q-learning agent with experience replay.
///
/// The agent exclusively owns its approximator, replay buffer and random
/// source. With `target_update_freq = None` the online approximator also
/// produces the bootstrap term of every target.
pub struct DqnAgent<Q = QNetwork> {
    config: DqnConfig,
    q_network: Q,
    target_network: Option<Q>,
    buffer: ReplayBuffer,
    epsilon: EpsilonSchedule,
    rng: StdRng,
    stats: AgentStats,
}

impl DqnAgent<QNetwork> {
    /// Validate `config` and build an agent around a freshly initialized [`QNetwork`].
    pub fn new(config: DqnConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = Self::make_rng(&config);
        let q_network = QNetwork::new(
            config.state_dim,
            &config.hidden_layers,
            config.hidden_activation,
            config.num_actions,
            OptimizerWrapper::from_kind(config.optimizer),
            config.learning_rate,
            &mut rng,
        )?;
        Self::build(config, q_network, rng)
    }
}

impl<Q: ActionValueFunction + Clone> DqnAgent<Q> {
    /// Build an agent around a caller-supplied approximator whose shape must match `config`.
    pub fn with_approximator(config: DqnConfig, q_network: Q) -> Result<Self> {
        config.validate()?;
        let rng = Self::make_rng(&config);
        Self::build(config, q_network, rng)
    }

    fn make_rng(config: &DqnConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn build(config: DqnConfig, q_network: Q, rng: StdRng) -> Result<Self> {
        if q_network.state_dim() != config.state_dim || q_network.num_actions() != config.num_actions {
            return Err(DqnError::shape_mismatch(
                format!("approximator {} -> {}", config.state_dim, config.num_actions),
                format!("approximator {} -> {}", q_network.state_dim(), q_network.num_actions()),
            ));
        }

        let buffer = ReplayBuffer::new(config.buffer_capacity)?;
        let epsilon = EpsilonSchedule::new(config.eps_start, config.eps_end, config.eps_decay);
        let target_network = config.target_update_freq.map(|_| q_network.clone());

        debug!(
            "DQN agent: state_dim={}, num_actions={}, capacity={}, batch_size={}, target network={}",
            config.state_dim,
            config.num_actions,
            buffer.capacity(),
            config.batch_size,
            target_network.is_some()
        );

        Ok(DqnAgent {
            config,
            q_network,
            target_network,
            buffer,
            epsilon,
            rng,
            stats: AgentStats::default(),
        })
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn approximator(&self) -> &Q {
        &self.q_network
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    /// Current exploration rate from the agent's schedule.
    pub fn epsilon(&self) -> f32 {
        self.epsilon.value()
    }

    /// Apply one decay of the exploration rate, typically at the end of an episode.
    pub fn decay_epsilon(&mut self) -> f32 {
        self.epsilon.step()
    }

    fn check_state(&self, state: ArrayView1<f32>) -> Result<()> {
        if state.len() != self.config.state_dim {
            return Err(DqnError::shape_mismatch(
                format!("state of width {}", self.config.state_dim),
                format!("state of width {}", state.len()),
            ));
        }
        Ok(())
    }

    /// Epsilon-greedy action for `state` with an explicit exploration rate.
    pub fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        self.check_state(state)?;
        EpsilonGreedy::select_action(state, epsilon, &self.q_network, &mut self.rng)
    }

    /// Epsilon-greedy action using the agent's own schedule.
    pub fn act_scheduled(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        let epsilon = self.epsilon.value();
        self.act(state, epsilon)
    }

    /// Record one transition and, on the learning cadence, run one update.
    ///
    /// Returns the batch loss when an update happened. While the buffer holds
    /// fewer than `batch_size` transitions no update is made and `Ok(None)`
    /// is returned.
    pub fn step(
        &mut self,
        state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        next_state: ArrayView1<f32>,
        done: bool,
    ) -> Result<Option<f32>> {
        self.check_state(state)?;
        self.check_state(next_state)?;
        if action >= self.config.num_actions {
            return Err(DqnError::InvalidAction {
                action,
                num_actions: self.config.num_actions,
            });
        }

        self.buffer
            .insert(Transition::new(state.to_owned(), action, reward, next_state.to_owned(), done));
        self.stats.steps += 1;

        if self.stats.steps % self.config.learn_every != 0 {
            return Ok(None);
        }
        self.learn()
    }

    /// Sample a batch and perform one update, or `Ok(None)` during warm-up.
    pub fn learn(&mut self) -> Result<Option<f32>> {
        let batch = match self.buffer.sample(self.config.batch_size, &mut self.rng) {
            Ok(transitions) => TransitionBatch::from_transitions(&transitions, self.config.state_dim)?,
            Err(DqnError::InsufficientData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let targets = self.compute_targets(&batch)?;
        let loss = self
            .q_network
            .update(batch.states.view(), &batch.actions, targets.view())?;

        self.stats.learn_steps += 1;
        self.stats.last_loss = Some(loss);
        if !loss.is_finite() {
            warn!("Non-finite loss {} at learn step {}", loss, self.stats.learn_steps);
        }
        debug!("learn step {}: loss = {:.6}", self.stats.learn_steps, loss);

        if let Some(freq) = self.config.target_update_freq {
            if self.stats.learn_steps % freq == 0 {
                self.sync_target_network();
            }
        }

        Ok(Some(loss))
    }

    /// TD targets for a batch, bootstrapped from the target network when one
    /// is configured and from the online network otherwise.
    pub fn compute_targets(&self, batch: &TransitionBatch) -> Result<Array1<f32>> {
        let bootstrap = self.target_network.as_ref().unwrap_or(&self.q_network);
        let next_q_values = bootstrap.predict_batch(batch.next_states.view())?;
        td_targets(batch.rewards.view(), &batch.dones, next_q_values.view(), self.config.discount)
    }

    /// Copy the online parameters into the frozen target network, if any.
    pub fn sync_target_network(&mut self) {
        if let Some(target) = self.target_network.as_mut() {
            *target = self.q_network.clone();
            info!("Synced target network at learn step {}", self.stats.learn_steps);
        }
    }

    /// Opaque snapshot of the online parameters.
    pub fn export_parameters(&self) -> Result<Vec<u8>> {
        self.q_network.export_parameters()
    }

    /// Restore parameters from [`export_parameters`](Self::export_parameters).
    /// A configured target network is synced to the loaded values.
    pub fn load_parameters(&mut self, blob: &[u8]) -> Result<()> {
        self.q_network.load_parameters(blob)?;
        self.sync_target_network();
        Ok(())
    }

    pub fn save_parameters<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.export_parameters()?)?;
        Ok(())
    }

    pub fn load_parameters_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = fs::read(path)?;
        self.load_parameters(&data)
    }
}
