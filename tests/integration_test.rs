use cartpole_dqn::{
    agent::DqnAgent,
    config::DqnConfig,
    env::{run_episode, Environment, StepResult},
    error::{DqnError, Result},
    optimizer::OptimizerKind,
};
use ndarray::{array, Array1};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two-action corridor: action 1 moves right, action 0 moves left. Reaching
/// the right end pays 1 and ends the episode; every other step pays 0.
struct Corridor {
    length: usize,
    position: usize,
}

impl Corridor {
    fn new(length: usize) -> Self {
        Corridor { length, position: 0 }
    }

    fn observe(&self) -> Array1<f32> {
        let mut state = Array1::zeros(self.length);
        state[self.position] = 1.0;
        state
    }
}

impl Environment for Corridor {
    fn reset(&mut self) -> Result<Array1<f32>> {
        self.position = 0;
        Ok(self.observe())
    }

    fn step(&mut self, action: usize) -> Result<StepResult> {
        match action {
            0 => self.position = self.position.saturating_sub(1),
            1 => self.position += 1,
            _ => return Err(DqnError::InvalidAction { action, num_actions: 2 }),
        }
        let done = self.position == self.length - 1;
        let reward = if done { 1.0 } else { 0.0 };
        Ok(StepResult::new(self.observe(), reward, done).with_info("position", self.position as f32))
    }

    fn state_dimension(&self) -> usize {
        self.length
    }

    fn action_count(&self) -> usize {
        2
    }
}

fn corridor_agent(env: &Corridor, seed: u64) -> DqnAgent {
    let config = DqnConfig::new(env.state_dimension(), env.action_count())
        .buffer_capacity(2000)
        .batch_size(32)
        .discount(0.9)
        .hidden_layers(&[32])
        .learning_rate(5e-3)
        .optimizer(OptimizerKind::Adam)
        .eps_decay(0.9)
        .eps_end(0.05)
        .seed(seed);
    DqnAgent::new(config).unwrap()
}

#[test]
fn test_step_result_carries_info() {
    let mut env = Corridor::new(3);
    env.reset().unwrap();
    let result = env.step(1).unwrap();
    assert_eq!(result.next_state, array![0.0, 1.0, 0.0]);
    assert!(!result.done);
    assert_eq!(result.info.get("position"), Some(&1.0));

    let result = env.step(1).unwrap();
    assert!(result.done);
    assert_eq!(result.reward, 1.0);
    assert_eq!(result.info.get("position"), Some(&2.0));
    assert!(StepResult::new(array![0.0], 0.0, false).info.is_empty());
}

#[test]
fn test_run_episode_feeds_agent() {
    init_logger();
    let mut env = Corridor::new(5);
    let mut agent = corridor_agent(&env, 1);

    let summary = run_episode(&mut env, &mut agent, 50).unwrap();
    assert!(summary.steps >= 4 && summary.steps <= 50);
    assert_eq!(agent.buffer().len(), summary.steps);
    assert_eq!(agent.stats().steps, summary.steps);
    assert!((summary.epsilon - 0.9).abs() < 1e-6);
    if summary.steps < 50 {
        assert_eq!(summary.total_reward, 1.0);
    }
}

#[test]
fn test_run_episode_respects_step_limit() {
    init_logger();
    let mut env = Corridor::new(1000);
    let mut agent = corridor_agent(&env, 2);
    let summary = run_episode(&mut env, &mut agent, 10).unwrap();
    assert_eq!(summary.steps, 10);
    assert_eq!(summary.total_reward, 0.0);
}

#[test]
fn test_agent_learns_corridor() {
    init_logger();
    let mut env = Corridor::new(5);
    let mut agent = corridor_agent(&env, 7);

    for _ in 0..150 {
        run_episode(&mut env, &mut agent, 100).unwrap();
    }
    assert!(agent.stats().learn_steps > 0);

    // Greedy rollout should walk straight to the goal.
    let mut state = env.reset().unwrap();
    let mut steps = 0;
    let mut reached_goal = false;
    while steps < 20 {
        let action = agent.act(state.view(), 0.0).unwrap();
        let result = env.step(action).unwrap();
        steps += 1;
        state = result.next_state;
        if result.done {
            reached_goal = true;
            break;
        }
    }
    assert!(reached_goal, "greedy policy did not reach the goal in {} steps", steps);
    assert_eq!(steps, 4);
}

#[test]
fn test_parameters_transfer_between_agents() {
    init_logger();
    let mut env = Corridor::new(4);
    let mut trained = corridor_agent(&env, 3);
    for _ in 0..5 {
        run_episode(&mut env, &mut trained, 50).unwrap();
    }

    let mut fresh = corridor_agent(&env, 4);
    fresh.load_parameters(&trained.export_parameters().unwrap()).unwrap();

    let query_state = array![0.0, 1.0, 0.0, 0.0];
    let a = trained.approximator().predict(query_state.view()).unwrap();
    let b = fresh.approximator().predict(query_state.view()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_target_network_variant_runs() {
    init_logger();
    let mut env = Corridor::new(5);
    let config = DqnConfig::new(5, 2)
        .batch_size(16)
        .hidden_layers(&[16, 16])
        .target_update_freq(Some(10))
        .seed(11);
    let mut agent = DqnAgent::new(config).unwrap();
    for _ in 0..5 {
        let summary = run_episode(&mut env, &mut agent, 100).unwrap();
        assert!(summary.mean_loss.map_or(true, |l| l.is_finite()));
    }
}
