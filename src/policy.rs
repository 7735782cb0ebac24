//! Epsilon-greedy action selection and the exploration-rate schedule.
//!
//! Greedy ties resolve to the lowest action index. NaN Q-values never win
//! the argmax unless every value is NaN, in which case action 0 is returned.

use log::trace;
use ndarray::ArrayView1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::ActionValueFunction;
use crate::error::{DqnError, Result};

/// Index of the largest value, first one on ties.
pub fn greedy_action(q_values: ArrayView1<f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &v) in q_values.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Stateless epsilon-greedy selector. The caller owns epsilon.
#[derive(Clone, Copy, Debug, Default)]
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    /// With probability `epsilon` pick uniformly from all actions, otherwise
    /// the argmax of `approximator.predict(state)`.
    pub fn select_action<Q, R>(
        state: ArrayView1<f32>,
        epsilon: f32,
        approximator: &Q,
        rng: &mut R,
    ) -> Result<usize>
    where
        Q: ActionValueFunction + ?Sized,
        R: Rng + ?Sized,
    {
        let num_actions = approximator.num_actions();
        if num_actions == 0 {
            return Err(DqnError::InvalidAction { action: 0, num_actions });
        }

        if rng.gen::<f32>() < epsilon {
            let action = rng.gen_range(0..num_actions);
            trace!("explore: action {}", action);
            Ok(action)
        } else {
            let q_values = approximator.predict(state)?;
            let action = greedy_action(q_values.view());
            trace!("exploit: action {} from {:?}", action, q_values);
            Ok(action)
        }
    }
}

/// Multiplicative epsilon decay clamped at `end`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EpsilonSchedule {
    pub start: f32,
    pub end: f32,
    pub decay: f32,
    current: f32,
}

impl EpsilonSchedule {
    pub fn new(start: f32, end: f32, decay: f32) -> Self {
        EpsilonSchedule { start, end, decay, current: start }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// `ε ← max(end, ε · decay)`; returns the new value.
    pub fn step(&mut self) -> f32 {
        self.current = (self.current * self.decay).max(self.end);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.start;
    }
}
